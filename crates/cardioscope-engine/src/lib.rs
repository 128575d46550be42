//! Cardioscope engine crate.
//!
//! Owns the plot geometry (calibrated grids, scrolling trace) and the
//! platform + GPU runtime pieces the monitor binary drives every frame.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod plot;
pub mod render;
