use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use cardioscope_engine::coords::Viewport;
use cardioscope_engine::core::{App, AppControl, FrameCtx};
use cardioscope_engine::plot::{time_grid, voltage_grid, PlotConfig, TraceBuilder};
use cardioscope_engine::render::{GpuGeometry, LineRenderer};
use cardioscope_signal::{AcquisitionHandle, Sample, SampleSlot};

/// Paper-white background, like a printed ECG strip.
const CLEAR_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// The strip-chart application: drains the acquisition slot each frame,
/// keeps the grids and waveform geometry current, and draws them.
///
/// Grid geometry is regenerated only on viewport changes; the waveform only
/// when samples arrived or the viewport changed. A frame with no changes
/// redraws from the buffers already resident on the GPU.
pub struct ScopeApp {
    config: PlotConfig,
    slot: Arc<SampleSlot>,
    trace: TraceBuilder,
    pending: Vec<Sample>,

    renderer: LineRenderer,
    time_grid_gpu: GpuGeometry,
    voltage_grid_gpu: GpuGeometry,
    waveform_gpu: GpuGeometry,

    viewport: Viewport,
    grids_dirty: bool,
    waveform_dirty: bool,

    samples_since_report: u64,
    last_report: Option<Instant>,

    // Keeps the producer alive; dropping it stops and joins the thread.
    _acquisition: AcquisitionHandle,
}

/// Interval between samples-per-second diagnostics.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

impl ScopeApp {
    pub fn new(config: PlotConfig, slot: Arc<SampleSlot>, acquisition: AcquisitionHandle) -> Self {
        Self {
            trace: TraceBuilder::new(config.clone()),
            config,
            slot,
            pending: Vec::new(),
            renderer: LineRenderer::new(),
            time_grid_gpu: GpuGeometry::new("cardioscope time grid vbo"),
            voltage_grid_gpu: GpuGeometry::new("cardioscope voltage grid vbo"),
            waveform_gpu: GpuGeometry::new("cardioscope waveform vbo"),
            viewport: Viewport::default(),
            grids_dirty: true,
            waveform_dirty: true,
            samples_since_report: 0,
            last_report: None,
            _acquisition: acquisition,
        }
    }
}

impl App for ScopeApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
            ..
        } = event
        {
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // Ingest before the viewport check so a minimized window still keeps
        // the trace history moving.
        self.slot.drain(&mut self.pending);
        if !self.pending.is_empty() {
            self.samples_since_report += self.pending.len() as u64;
            self.trace.extend(self.pending.drain(..));
            self.waveform_dirty = true;
        }

        let now = ctx.time.now;
        let last = *self.last_report.get_or_insert(now);
        let elapsed = now.duration_since(last);
        if elapsed >= REPORT_INTERVAL {
            log::debug!(
                "samples per second: {:.1}",
                self.samples_since_report as f64 / elapsed.as_secs_f64()
            );
            self.samples_since_report = 0;
            self.last_report = Some(now);
        }

        let viewport = ctx.window.viewport();
        if !viewport.is_valid() {
            // Zero-sized surface; nothing to draw or upload.
            return AppControl::Continue;
        }
        if viewport != self.viewport {
            self.viewport = viewport;
            self.grids_dirty = true;
            self.waveform_dirty = true;
        }

        let time_geom = self.grids_dirty.then(|| time_grid(&self.config, viewport));
        let voltage_geom = self.grids_dirty.then(|| voltage_grid(&self.config));
        let waveform_geom = self.waveform_dirty.then(|| self.trace.build(viewport));

        // Uploads happen inside the render callback; if the surface was lost
        // this frame the callback never runs and the dirty flags stay set.
        let mut uploaded = false;
        let control = ctx.render(CLEAR_COLOR, |rctx, target| {
            if let Some(geometry) = &time_geom {
                self.time_grid_gpu.upload(rctx, geometry);
            }
            if let Some(geometry) = &voltage_geom {
                self.voltage_grid_gpu.upload(rctx, geometry);
            }
            if let Some(geometry) = &waveform_geom {
                self.waveform_gpu.upload(rctx, geometry);
            }
            uploaded = true;

            // Grids first, trace last, so the trace paints on top.
            self.renderer.render(
                rctx,
                target,
                &[
                    &self.time_grid_gpu,
                    &self.voltage_grid_gpu,
                    &self.waveform_gpu,
                ],
            );
        });

        if uploaded {
            self.grids_dirty = false;
            self.waveform_dirty = false;
        }

        control
    }
}
