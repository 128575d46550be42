use std::collections::VecDeque;

use crate::{Sample, SourceError};

/// Blocking pull contract for sample producers.
///
/// `Ok(None)` signals end-of-stream; a source that returned `None` stays
/// exhausted on subsequent polls. Sources pace themselves (sleeping between
/// records or waiting on a hardware edge) — callers run them on a dedicated
/// thread and must never poll from the frame loop.
pub trait SampleSource {
    fn next(&mut self) -> Result<Option<Sample>, SourceError>;
}

/// In-memory source for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Sample>,
}

impl ManualSource {
    pub fn new(samples: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            queue: samples.into_iter().collect(),
        }
    }
}

impl SampleSource for ManualSource {
    fn next(&mut self) -> Result<Option<Sample>, SourceError> {
        Ok(self.queue.pop_front())
    }
}
