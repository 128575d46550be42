use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info};

use crate::{SampleSlot, SampleSource};

/// Runs `source` on its own thread, publishing into `slot` until end-of-stream,
/// a device failure, or an explicit stop.
///
/// Source errors terminate the producer only; the consumer side degrades to a
/// frozen trace and keeps running.
pub fn spawn<S>(mut source: S, slot: Arc<SampleSlot>) -> io::Result<AcquisitionHandle>
where
    S: SampleSource + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name("cardioscope-acquire".into())
        .spawn(move || {
            let mut produced: u64 = 0;
            while !thread_stop.load(Ordering::Relaxed) {
                match source.next() {
                    Ok(Some(sample)) => {
                        slot.publish(sample);
                        produced += 1;
                    }
                    Ok(None) => {
                        info!("sample source exhausted after {produced} samples");
                        break;
                    }
                    Err(err) => {
                        error!("sample source failed after {produced} samples: {err}");
                        break;
                    }
                }
            }
            debug!("acquisition thread stopped");
        })?;

    Ok(AcquisitionHandle {
        stop,
        thread: Some(thread),
    })
}

/// Owner handle for the acquisition thread.
///
/// Dropping the handle stops and joins the producer, so holding it in the
/// frame-loop application guarantees no publish can happen after consumer
/// teardown begins.
pub struct AcquisitionHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl AcquisitionHandle {
    /// Signals the producer to stop and joins it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("acquisition thread panicked");
            }
        }
    }

    /// True once the producer thread has terminated (exhaustion, failure, or
    /// stop).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }
}

impl Drop for AcquisitionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualSource, Sample, SourceError};
    use std::time::Duration;

    #[test]
    fn finite_source_drains_into_slot_and_joins() {
        let slot = Arc::new(SampleSlot::new());
        let source = ManualSource::new(vec![
            Sample::new(0.0, 0.1),
            Sample::new(0.01, 0.2),
            Sample::new(0.02, 0.3),
        ]);

        let mut handle = spawn(source, Arc::clone(&slot)).unwrap();

        // The producer finishes on its own; stop() then only joins.
        let mut out = Vec::new();
        for _ in 0..200 {
            slot.drain(&mut out);
            if out.len() == 3 {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        handle.stop();

        assert_eq!(out.len(), 3);
        assert_eq!(out[2], Sample::new(0.02, 0.3));
        assert!(handle.is_finished());
    }

    #[test]
    fn stop_interrupts_an_endless_source() {
        struct Endless;
        impl SampleSource for Endless {
            fn next(&mut self) -> Result<Option<Sample>, SourceError> {
                std::thread::sleep(Duration::from_millis(1));
                Ok(Some(Sample::new(0.0, 0.0)))
            }
        }

        let slot = Arc::new(SampleSlot::new());
        let mut handle = spawn(Endless, Arc::clone(&slot)).unwrap();
        std::thread::sleep(Duration::from_millis(10));
        handle.stop();
        assert!(handle.is_finished());
    }

    #[test]
    fn failing_source_stops_producer_without_poisoning_consumer() {
        struct Broken;
        impl SampleSource for Broken {
            fn next(&mut self) -> Result<Option<Sample>, SourceError> {
                Err(SourceError::Device("ready line stuck".into()))
            }
        }

        let slot = Arc::new(SampleSlot::new());
        let handle = spawn(Broken, Arc::clone(&slot)).unwrap();
        for _ in 0..200 {
            if handle.is_finished() {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(handle.is_finished());
        // Consumer side still works.
        assert_eq!(slot.take_latest(), None);
    }
}
