//! Error types for the fimg3d driver

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the driver
#[derive(Error, Debug)]
pub enum FimgError {
    #[error("MMIO error: {0}")]
    Mmio(#[from] MmioError),

    #[error("Hardware error: {0}")]
    Hw(#[from] HwError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Errors raised while mapping or accessing the register window
#[derive(Error, Debug)]
pub enum MmioError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to map 0x{size:x} bytes at 0x{base:08x}: {source}")]
    Map {
        base: u64,
        size: usize,
        source: std::io::Error,
    },

    #[error("Offset 0x{offset:05x} outside the 0x{size:x} byte register window")]
    OutOfWindow { offset: u32, size: usize },

    #[error("Unaligned register offset: 0x{0:05x}")]
    Unaligned(u32),

    #[error("Register window size must be non-zero")]
    EmptyWindow,
}

/// Errors raised by the pipeline encoders and the global block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HwError {
    #[error("Invalid texture unit: {0}")]
    InvalidTextureUnit(usize),

    #[error("Invalid vertex texture unit: {0}")]
    InvalidVertexTextureUnit(usize),

    #[error("Pipeline still busy after {spins} polls (status 0x{status:08x})")]
    FlushTimeout { spins: u32, status: u32 },

    #[error("Cache operation 0x{request:08x} still pending after {spins} polls")]
    CacheTimeout { spins: u32, request: u32 },
}

/// Surface errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Surface is not valid")]
    Invalid,

    #[error("Surface is already locked")]
    AlreadyLocked,

    #[error("Surface is not locked")]
    NotLocked,

    #[error("Surface allocation of {0} bytes failed")]
    AllocationFailed(usize),

    #[error("Flush failed: {0}")]
    Flush(String),
}

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, FimgError>;
