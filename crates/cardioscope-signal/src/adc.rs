use std::time::Duration;

use log::debug;

use crate::{Sample, SampleSource, SourceError};

/// Full-scale conversion factor for a 16-bit converter at the ±4.096 V range.
pub const VOLTS_PER_STEP: f32 = 4.096 / 32768.0;

/// Diagnostic rate window, in hardware timestamp ticks (µs).
const RATE_WINDOW_TICKS: u32 = 1_000_000;

/// Register-protocol access the event-driven source needs from the converter.
///
/// Implementations own the bus details (addressing, configuration registers,
/// the ready line); the source only consumes rising edges and 2-byte
/// conversion results. Keeping the chip programming behind this trait lets
/// the source run against a mock in tests.
pub trait ConversionPort {
    /// Blocks until the next conversion-ready rising edge.
    ///
    /// Returns the edge's hardware timestamp in ticks (µs), or `None` if no
    /// edge arrived within `timeout`.
    fn wait_ready(&mut self, timeout: Duration) -> Result<Option<u32>, SourceError>;

    /// Reads the 2-byte conversion register, low byte first.
    fn read_conversion(&mut self) -> Result<[u8; 2], SourceError>;
}

/// Event-driven hardware source: one sample per conversion-ready edge.
///
/// The conversion register is read low byte first (`value = high << 8 | low`).
/// Small negative results are sign-bit noise from the ±LSB band and clamp to
/// zero before scaling by [`VOLTS_PER_STEP`]. Timestamps are edge ticks
/// relative to the first observed edge.
///
/// A rolling conversions-per-second counter is kept for diagnostics only,
/// reset every 1 000 000 ticks and reported at debug level.
pub struct EventSource<P> {
    port: P,
    timeout: Duration,
    start_tick: Option<u32>,
    window_start: u32,
    window_count: u32,
}

impl<P: ConversionPort> EventSource<P> {
    pub fn new(port: P) -> Self {
        Self::with_timeout(port, Duration::from_secs(1))
    }

    /// `timeout` bounds how long one poll may wait for a ready edge; a silent
    /// ready line past the timeout is treated as a device failure.
    pub fn with_timeout(port: P, timeout: Duration) -> Self {
        Self {
            port,
            timeout,
            start_tick: None,
            window_start: 0,
            window_count: 0,
        }
    }

    fn track_rate(&mut self, tick: u32) {
        self.window_count += 1;
        if tick.wrapping_sub(self.window_start) > RATE_WINDOW_TICKS {
            debug!("conversions per second: {}", self.window_count);
            self.window_start = tick;
            self.window_count = 0;
        }
    }
}

impl<P: ConversionPort> SampleSource for EventSource<P> {
    fn next(&mut self) -> Result<Option<Sample>, SourceError> {
        let Some(tick) = self.port.wait_ready(self.timeout)? else {
            return Err(SourceError::Device(format!(
                "no conversion-ready edge within {:?}",
                self.timeout
            )));
        };

        let start = *self.start_tick.get_or_insert_with(|| {
            self.window_start = tick;
            tick
        });
        self.track_rate(tick);

        let [low, high] = self.port.read_conversion()?;
        let raw = i16::from_le_bytes([low, high]);
        let steps = raw.max(0);

        Ok(Some(Sample::new(
            f64::from(tick.wrapping_sub(start)) * 1e-6,
            f32::from(steps) * VOLTS_PER_STEP,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted port: each entry is one ready edge plus its register bytes.
    struct MockPort {
        events: VecDeque<(u32, [u8; 2])>,
        fail_read: bool,
    }

    impl MockPort {
        fn new(events: Vec<(u32, [u8; 2])>) -> Self {
            Self {
                events: events.into(),
                fail_read: false,
            }
        }
    }

    impl ConversionPort for MockPort {
        fn wait_ready(&mut self, _timeout: Duration) -> Result<Option<u32>, SourceError> {
            Ok(self.events.front().map(|(tick, _)| *tick))
        }

        fn read_conversion(&mut self) -> Result<[u8; 2], SourceError> {
            if self.fail_read {
                return Err(SourceError::Device("bus read failed".into()));
            }
            self.events
                .pop_front()
                .map(|(_, bytes)| bytes)
                .ok_or_else(|| SourceError::Device("no conversion pending".into()))
        }
    }

    #[test]
    fn register_bytes_are_low_then_high() {
        // 0x1234 steps arrives as [0x34, 0x12].
        let mut source = EventSource::new(MockPort::new(vec![(0, [0x34, 0x12])]));
        let sample = source.next().unwrap().unwrap();
        assert_eq!(sample.value, 0x1234 as f32 * VOLTS_PER_STEP);
    }

    #[test]
    fn negative_conversions_clamp_to_zero() {
        // -1 (0xFFFF) is ±LSB noise, not a real reading.
        let mut source = EventSource::new(MockPort::new(vec![(0, [0xFF, 0xFF])]));
        let sample = source.next().unwrap().unwrap();
        assert_eq!(sample.value, 0.0);
    }

    #[test]
    fn timestamps_are_relative_to_first_edge() {
        let mut source = EventSource::new(MockPort::new(vec![
            (500, [0x01, 0x00]),
            (4406, [0x02, 0x00]),
        ]));
        let first = source.next().unwrap().unwrap();
        let second = source.next().unwrap().unwrap();
        assert_eq!(first.timestamp, 0.0);
        assert!((second.timestamp - 3.906e-3).abs() < 1e-9);
    }

    #[test]
    fn rate_window_counts_the_closing_conversion() {
        let mut source = EventSource::new(MockPort::new(vec![
            (0, [0x01, 0x00]),
            (100, [0x01, 0x00]),
            (2_000_000, [0x01, 0x00]),
        ]));
        source.next().unwrap();
        source.next().unwrap();
        assert_eq!(source.window_count, 2, "every conversion is counted");
        source.next().unwrap();
        assert_eq!(
            source.window_count, 0,
            "the conversion that closes the window belongs to the reported count"
        );
        assert_eq!(source.window_start, 2_000_000);
    }

    #[test]
    fn silent_ready_line_is_a_device_error() {
        let mut source =
            EventSource::with_timeout(MockPort::new(vec![]), Duration::from_millis(1));
        assert!(matches!(source.next(), Err(SourceError::Device(_))));
    }

    #[test]
    fn bus_failure_propagates() {
        let mut port = MockPort::new(vec![(0, [0x00, 0x00])]);
        port.fail_read = true;
        let mut source = EventSource::new(port);
        assert!(matches!(source.next(), Err(SourceError::Device(_))));
    }
}
