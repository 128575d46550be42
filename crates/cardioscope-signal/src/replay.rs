use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::Duration;

use log::warn;

use crate::{Sample, SampleSource, SourceError};

/// Nominal converter rate the bundled recordings were captured at.
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 256.0;

/// Replays a two-column `time value` recording, one record per line.
///
/// Playback is paced by sleeping one inter-sample interval between records
/// (≈3.906 ms at the default 256 Hz) so wall-clock cadence approximates the
/// original capture. Malformed or short lines substitute `(0, 0)` and
/// continue; only I/O failures are fatal. On end-of-file the source reports
/// end-of-stream once and never loops.
pub struct ReplaySource<R> {
    reader: R,
    interval: Duration,
    line: String,
    line_no: u64,
    exhausted: bool,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_rate(reader, DEFAULT_SAMPLE_RATE_HZ)
    }

    /// A non-positive rate disables pacing entirely (useful in tests).
    pub fn with_rate(reader: R, sample_rate_hz: f64) -> Self {
        let interval = if sample_rate_hz > 0.0 {
            Duration::from_secs_f64(1.0 / sample_rate_hz)
        } else {
            Duration::ZERO
        };
        Self {
            reader,
            interval,
            line: String::new(),
            line_no: 0,
            exhausted: false,
        }
    }

    fn parse_record(line: &str, line_no: u64) -> Sample {
        let mut fields = line.split_whitespace();
        let timestamp = fields.next().and_then(|f| f.parse::<f64>().ok());
        let value = fields.next().and_then(|f| f.parse::<f32>().ok());
        match (timestamp, value) {
            (Some(timestamp), Some(value)) => Sample::new(timestamp, value),
            _ => {
                warn!("recording line {line_no} is malformed; substituting (0, 0)");
                Sample::new(0.0, 0.0)
            }
        }
    }
}

impl ReplaySource<BufReader<File>> {
    /// Opens a recording file at the default rate.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> SampleSource for ReplaySource<R> {
    fn next(&mut self) -> Result<Option<Sample>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }

        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        self.line_no += 1;

        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }

        Ok(Some(Self::parse_record(self.line.trim(), self.line_no)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn unpaced(input: &str) -> ReplaySource<Cursor<&str>> {
        ReplaySource::with_rate(Cursor::new(input), 0.0)
    }

    fn collect(source: &mut impl SampleSource) -> Vec<Sample> {
        let mut out = Vec::new();
        while let Some(sample) = source.next().unwrap() {
            out.push(sample);
        }
        out
    }

    #[test]
    fn replays_records_in_order() {
        let mut source = unpaced("0.0 0.123\n0.01 0.345\n0.02 0.5\n");
        assert_eq!(
            collect(&mut source),
            vec![
                Sample::new(0.0, 0.123),
                Sample::new(0.01, 0.345),
                Sample::new(0.02, 0.5),
            ]
        );
    }

    #[test]
    fn malformed_line_substitutes_zero_and_continues() {
        let mut source = unpaced("0.0 0.123\n0.01 0.345\ngarbage\n0.02 0.5\n");
        assert_eq!(
            collect(&mut source),
            vec![
                Sample::new(0.0, 0.123),
                Sample::new(0.01, 0.345),
                Sample::new(0.0, 0.0),
                Sample::new(0.02, 0.5),
            ]
        );
    }

    #[test]
    fn short_line_substitutes_zero() {
        let mut source = unpaced("0.25\n");
        assert_eq!(collect(&mut source), vec![Sample::new(0.0, 0.0)]);
    }

    #[test]
    fn exhaustion_is_sticky() {
        let mut source = unpaced("0.0 1.0\n");
        assert!(source.next().unwrap().is_some());
        assert!(source.next().unwrap().is_none());
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn empty_input_is_immediately_exhausted() {
        let mut source = unpaced("");
        assert!(source.next().unwrap().is_none());
    }
}
