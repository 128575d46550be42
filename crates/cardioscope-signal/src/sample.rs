/// One timestamped scalar measurement.
///
/// Timestamps are seconds and are monotone non-decreasing within a single
/// source; exactly one source produces samples at a time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    /// Acquisition time in seconds (source-relative).
    pub timestamp: f64,
    /// Measured value in physical units (millivolts for the ECG front end).
    pub value: f32,
}

impl Sample {
    #[inline]
    pub const fn new(timestamp: f64, value: f32) -> Self {
        Self { timestamp, value }
    }
}
