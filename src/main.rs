//! fimg3d - FIMG-3DSE bring-up tool
//!
//! Maps the accelerator, resets it and programs a fresh rendering context.
//! With the recording back-end the register traffic can be dumped as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use fimg_core::config::{Config, DeviceBackend};
use fimg_core::logging;
use fimg_hw::global::{self, PipelineStatus};
use fimg_hw::FimgContext;
use fimg_mmio::{RecordingDevice, RegisterIo, TracingDevice};

#[cfg(unix)]
fn open_mmio(config: &Config) -> Result<Box<dyn RegisterIo>> {
    let device = fimg_mmio::MmioDevice::open(
        &config.device.path,
        config.device.phys_base,
        config.device.map_size,
    )
    .context("Failed to map FIMG-3DSE registers")?;
    Ok(Box::new(device))
}

#[cfg(not(unix))]
fn open_mmio(_config: &Config) -> Result<Box<dyn RegisterIo>> {
    anyhow::bail!("MMIO back-end is only available on unix targets")
}

fn main() -> Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load_from(Path::new(&path))
            .with_context(|| format!("Failed to load {}", Path::new(&path).display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    logging::init(config.debug.log_level);
    tracing::info!("Starting fimg3d ({:?} back-end)", config.device.backend);

    let recorder = RecordingDevice::new();
    let device: Box<dyn RegisterIo> = match config.device.backend {
        DeviceBackend::Mmio => open_mmio(&config)?,
        DeviceBackend::Recording => Box::new(recorder.clone()),
    };
    let mut device: Box<dyn RegisterIo> = if config.debug.trace_register_writes {
        Box::new(TracingDevice::new(device))
    } else {
        device
    };

    let version = global::version(&mut device);
    tracing::info!("FIMG-3DSE version {}", version);

    if config.context.soft_reset_on_start {
        global::soft_reset(&mut device);
    }

    let ctx = FimgContext::new();
    if config.context.restore_on_start {
        ctx.restore(&mut device);
        global::flush(
            &mut device,
            PipelineStatus::all(),
            config.context.flush_timeout_spins,
        )
        .context("Pipeline did not go idle after restore")?;
    }

    if let Some(path) = &config.debug.dump_writes {
        if config.device.backend != DeviceBackend::Recording {
            tracing::warn!("Register dump is only available with the Recording back-end");
        } else {
            let writes = recorder.writes();
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &writes)
                .context("Failed to write register dump")?;
            tracing::info!("Dumped {} register writes to {}", writes.len(), path.display());
        }
    }

    Ok(())
}
