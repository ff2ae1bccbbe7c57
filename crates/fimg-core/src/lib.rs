//! Core types for the fimg3d FIMG-3DSE driver
//!
//! This crate provides the error taxonomy, configuration, and logging
//! infrastructure shared by the register access layer and the pipeline
//! encoders.

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{FimgError, HwError, MmioError, Result, SurfaceError};
