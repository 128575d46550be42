//! Plot geometry: calibrated grids and the scrolling waveform trace.
//!
//! Everything here is CPU-side math over [`PlotConfig`]; GPU residency lives
//! in `render`. The one correctness property that ties the module together:
//! the trace uses the same tick-size/tick-value ratios as the grids, so one
//! gridline always spans `time_tick_value` seconds (or `voltage_tick_value`
//! units) of data.

mod config;
mod grid;
mod trace;
mod vertex;

pub use config::{ConfigError, PlotConfig};
pub use grid::{time_grid, voltage_grid};
pub use trace::TraceBuilder;
pub use vertex::{GeometryBuffer, LineVertex, GRID_HIGHLIGHT, GRID_MINOR, TRACE_COLOR};
