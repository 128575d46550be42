use std::collections::VecDeque;

use cardioscope_signal::Sample;

use crate::coords::Viewport;

use super::{GeometryBuffer, PlotConfig, TRACE_COLOR};

/// Bounded sample history plus its conversion to the waveform geometry.
///
/// History spans at most `visible_time_window` seconds; older samples are
/// pruned as new ones arrive. `build` is deterministic: the same history and
/// viewport always produce byte-identical vertices, so a frame with no new
/// samples can reuse the previous geometry unchanged.
pub struct TraceBuilder {
    config: PlotConfig,
    history: VecDeque<Sample>,
}

impl TraceBuilder {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
        }
    }

    /// Appends one sample and prunes history older than the visible window.
    pub fn push(&mut self, sample: Sample) {
        debug_assert!(
            self.history
                .back()
                .is_none_or(|last| sample.timestamp >= last.timestamp),
            "sources produce samples in timestamp order"
        );
        self.history.push_back(sample);

        let horizon = sample.timestamp - self.config.visible_time_window();
        while self
            .history
            .front()
            .is_some_and(|oldest| oldest.timestamp < horizon)
        {
            self.history.pop_front();
        }
    }

    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) {
        for sample in samples {
            self.push(sample);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Converts the current history into the waveform line list.
    ///
    /// Time maps through the same tick ratio as the time grid: one gridline
    /// is always `time_tick_value` seconds of data. The drawn span is capped
    /// at what the viewport fits (`width / tick_size` ticks), so when the
    /// configured window is wider than the screen the newest samples stay
    /// pinned to the right edge and the oldest scroll off the left. Values
    /// map through [`PlotConfig::volts_to_ndc`], clipping (never dropping)
    /// out-of-range samples. Fewer than two samples yield an empty, valid
    /// zero-length buffer. Every emitted vertex lies in NDC `[-1, 1]`.
    pub fn build(&self, viewport: Viewport) -> GeometryBuffer {
        let mut buffer =
            GeometryBuffer::with_capacity("waveform", self.history.len().saturating_sub(1) * 2);
        let (Some(first), Some(newest)) = (self.history.front(), self.history.back()) else {
            return buffer;
        };

        // Until the window fills, the trace grows rightwards from the oldest
        // sample; afterwards it scrolls.
        let capacity = f64::from(viewport.width / self.config.tick_size_px())
            * self.config.time_tick_value();
        let span = self.config.visible_time_window().min(capacity);
        let window_start = newest.timestamp - span;
        let t0 = if first.timestamp > window_start {
            first.timestamp
        } else {
            window_start
        };

        let tick_step = self.config.tick_step_x(viewport.width);
        let to_vertex = |sample: &Sample| {
            let ticks = (sample.timestamp - t0) / self.config.time_tick_value();
            [
                (-1.0 + ticks as f32 * tick_step).clamp(-1.0, 1.0),
                self.config.volts_to_ndc(sample.value),
            ]
        };

        // Samples older than t0 sit left of the screen; they stay in history
        // (a wider viewport brings them back) but are not drawn.
        let mut iter = self.history.iter().skip_while(|s| s.timestamp < t0);
        let mut prev = match iter.next() {
            Some(s) => to_vertex(s),
            None => return buffer,
        };
        for sample in iter {
            let next = to_vertex(sample);
            buffer.push_segment(prev, next, TRACE_COLOR);
            prev = next;
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlotConfig {
        PlotConfig::new(10, 0.04, 0.1, 5.0, 6.0).unwrap()
    }

    const VIEWPORT: Viewport = Viewport::new(800, 500);

    fn builder_with(samples: &[(f64, f32)]) -> TraceBuilder {
        let mut trace = TraceBuilder::new(config());
        trace.extend(samples.iter().map(|&(t, v)| Sample::new(t, v)));
        trace
    }

    // ── geometry shape ────────────────────────────────────────────────────

    #[test]
    fn empty_history_builds_an_empty_buffer() {
        let trace = TraceBuilder::new(config());
        assert!(trace.build(VIEWPORT).is_empty());
    }

    #[test]
    fn single_sample_has_no_segment_yet() {
        let trace = builder_with(&[(0.0, 1.0)]);
        assert!(trace.build(VIEWPORT).is_empty());
    }

    #[test]
    fn n_samples_build_n_minus_one_segments() {
        let trace = builder_with(&[(0.0, 0.1), (0.01, 0.2), (0.02, 0.3), (0.03, 0.2)]);
        assert_eq!(trace.build(VIEWPORT).len(), 3 * 2);
    }

    // ── mapping ───────────────────────────────────────────────────────────

    #[test]
    fn round_trip_recovers_time_and_value() {
        let samples: Vec<(f64, f32)> = (0..64)
            .map(|i| (f64::from(i) / 256.0, (f64::from(i) * 0.3).sin() as f32))
            .collect();
        let trace = builder_with(&samples);
        let buffer = trace.build(VIEWPORT);

        let cfg = config();
        let tick_step = f64::from(cfg.tick_step_x(VIEWPORT.width));
        // History is shorter than the window, so t0 is the first timestamp.
        let t0 = samples[0].0;

        // Second vertex of segment i corresponds to sample i + 1.
        for (i, pair) in buffer.vertices.chunks_exact(2).enumerate() {
            let (t, v) = samples[i + 1];
            let x = f64::from(pair[1].position[0]);
            let y = pair[1].position[1];
            let recovered_t = t0 + (x + 1.0) / tick_step * cfg.time_tick_value();
            let recovered_v = y * cfg.max_voltage_range();
            assert!((recovered_t - t).abs() < 1e-4, "segment {i} time");
            assert!((recovered_v - v).abs() < 1e-4, "segment {i} value");
        }
    }

    #[test]
    fn values_at_range_bounds_hit_ndc_extremes() {
        let trace = builder_with(&[(0.0, 5.0), (0.01, -5.0)]);
        let buffer = trace.build(VIEWPORT);
        assert_eq!(buffer.vertices[0].position[1], 1.0);
        assert_eq!(buffer.vertices[1].position[1], -1.0);
    }

    #[test]
    fn out_of_range_values_clip_instead_of_escaping_ndc() {
        let trace = builder_with(&[(0.0, 80.0), (0.01, -33.0)]);
        let buffer = trace.build(VIEWPORT);
        for vertex in &buffer.vertices {
            assert!(vertex.position[1].abs() <= 1.0);
        }
        assert_eq!(buffer.vertices[0].position[1], 1.0);
        assert_eq!(buffer.vertices[1].position[1], -1.0);
    }

    #[test]
    fn trace_uses_the_same_tick_ratio_as_the_grid() {
        // Two samples exactly one time tick apart must sit one gridline
        // apart: 0.04 s at 10 px ticks on 800 px is 0.025 NDC.
        let trace = builder_with(&[(0.0, 0.0), (0.04, 0.0)]);
        let buffer = trace.build(VIEWPORT);
        let dx = buffer.vertices[1].position[0] - buffer.vertices[0].position[0];
        assert!((dx - 0.025).abs() < 1e-6);
    }

    #[test]
    fn trace_color_is_uniform_and_distinct_from_grid() {
        let trace = builder_with(&[(0.0, 0.1), (0.01, 0.2), (0.02, 0.3)]);
        for vertex in &trace.build(VIEWPORT).vertices {
            assert_eq!(vertex.color, TRACE_COLOR);
        }
    }

    // ── history window ────────────────────────────────────────────────────

    #[test]
    fn history_older_than_the_window_is_pruned() {
        let mut trace = TraceBuilder::new(config());
        for i in 0..2048 {
            // 8 s of data at 256 Hz against a 6 s window.
            trace.push(Sample::new(f64::from(i) / 256.0, 0.0));
        }
        assert!(trace.len() <= 6 * 256 + 1);
        let buffer = trace.build(VIEWPORT);
        assert!(!buffer.is_empty());
        assert!(buffer
            .vertices
            .iter()
            .all(|v| (-1.0..=1.0).contains(&v.position[0])));
    }

    #[test]
    fn newest_sample_stays_on_screen_with_a_full_window() {
        // 6 s of history at 256 Hz; the 800 px viewport only fits 3.2 s
        // (80 ticks of 0.04 s), so the oldest samples must scroll off the
        // left while the live edge stays at the right.
        let mut trace = TraceBuilder::new(config());
        for i in 0..=(6 * 256) {
            trace.push(Sample::new(f64::from(i) / 256.0, 0.5));
        }
        let buffer = trace.build(VIEWPORT);
        assert!(!buffer.is_empty());
        for vertex in &buffer.vertices {
            assert!(
                vertex.position[0].abs() <= 1.0,
                "vertex left NDC: x = {}",
                vertex.position[0]
            );
        }
        let newest_x = buffer.vertices.last().unwrap().position[0];
        assert!(
            newest_x > 0.99,
            "newest sample must reach the right edge, got x = {newest_x}"
        );
    }

    #[test]
    fn short_history_still_grows_from_the_left_edge() {
        // Under the viewport's capacity nothing is dropped or shifted.
        let trace = builder_with(&[(0.0, 0.1), (0.04, 0.2), (0.08, 0.3)]);
        let buffer = trace.build(VIEWPORT);
        assert_eq!(buffer.len(), 2 * 2);
        assert_eq!(buffer.vertices[0].position[0], -1.0);
    }

    #[test]
    fn rebuild_without_new_samples_is_byte_identical() {
        let trace = builder_with(&[(0.0, 0.1), (0.01, 0.2), (0.02, 0.15)]);
        let a = trace.build(VIEWPORT);
        let b = trace.build(VIEWPORT);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}
