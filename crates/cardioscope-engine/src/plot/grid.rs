use crate::coords::Viewport;

use super::{GeometryBuffer, PlotConfig, GRID_HIGHLIGHT, GRID_MINOR};

fn tick_color(index: u32) -> [f32; 3] {
    if index % 5 == 0 {
        GRID_HIGHLIGHT
    } else {
        GRID_MINOR
    }
}

/// Vertical time gridlines across the full viewport width.
///
/// Emits exactly `viewport.width / tick_size + 1` two-point segments with
/// x monotone increasing from -1. Must be re-run (and the GPU buffer
/// re-uploaded) whenever the viewport changes.
pub fn time_grid(config: &PlotConfig, viewport: Viewport) -> GeometryBuffer {
    debug_assert!(viewport.is_valid());

    let tick_count = viewport.width / config.tick_size_px() + 1;
    let tick_step = config.tick_step_x(viewport.width);

    let mut buffer = GeometryBuffer::with_capacity("time grid", tick_count as usize * 2);
    for i in 0..tick_count {
        let x = -1.0 + i as f32 * tick_step;
        buffer.push_segment([x, -1.0], [x, 1.0], tick_color(i));
    }
    buffer
}

/// Horizontal voltage gridlines spanning the full viewport width.
///
/// Both axes derive their tick counts from configuration; the voltage scale
/// covers the symmetric ±`max_voltage_range` span, one gridline per
/// `voltage_tick_value`, consistent with the trace's value mapping.
pub fn voltage_grid(config: &PlotConfig) -> GeometryBuffer {
    let tick_count = config.voltage_tick_count();
    let pixel_weight_y = 2.0 / config.reference_height_px();
    let tick_step = config.tick_size_px() as f32 * pixel_weight_y;

    let mut buffer = GeometryBuffer::with_capacity("voltage grid", tick_count as usize * 2);
    for i in 0..tick_count {
        let y = -1.0 + i as f32 * tick_step;
        buffer.push_segment([-1.0, y], [1.0, y], tick_color(i));
    }
    buffer
}
