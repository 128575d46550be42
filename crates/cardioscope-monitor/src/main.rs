use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use cardioscope_engine::device::GpuInit;
use cardioscope_engine::logging::{init_logging, LoggingConfig};
use cardioscope_engine::plot::PlotConfig;
use cardioscope_engine::window::{Runtime, RuntimeConfig};
use cardioscope_signal::{spawn, ReplaySource, SampleSlot};

mod app;

use app::ScopeApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/ecg_sample.txt"));

    // Standard ECG strip calibration: 10 px ticks worth 0.04 s / 0.1 mV,
    // ±5 mV visible range, 6 s window.
    let config = PlotConfig::new(10, 0.04, 0.1, 5.0, 6.0)?;

    let slot = Arc::new(SampleSlot::new());
    let source = ReplaySource::open(&path)
        .with_context(|| format!("failed to open recording {}", path.display()))?;
    let acquisition =
        spawn(source, Arc::clone(&slot)).context("failed to start acquisition thread")?;

    log::info!("replaying {}", path.display());

    let scope = ScopeApp::new(config, slot, acquisition);

    Runtime::run(
        RuntimeConfig {
            title: "cardioscope".to_string(),
            initial_size: LogicalSize::new(800.0, 500.0),
        },
        GpuInit::default(),
        scope,
    )
}
