use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::Sample;

/// Hand-off point between the acquisition thread and the frame loop.
///
/// Exactly one producer publishes and exactly one consumer reads; the two
/// roles never call the same operation. `publish` never blocks on a slow
/// consumer: once the backlog is full the oldest unread sample is dropped —
/// a missed read is a skipped visual update, not an error. The only ordering
/// promise is that a read observes samples published before it began, whole
/// (no torn timestamp/value pairs).
pub struct SampleSlot {
    backlog: Mutex<VecDeque<Sample>>,
    capacity: usize,
}

impl SampleSlot {
    /// Roughly four seconds of backlog at the nominal 256 Hz rate.
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            backlog: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Producer side: appends `sample`, overwriting the oldest unread one if
    /// the consumer has fallen behind.
    pub fn publish(&self, sample: Sample) {
        let mut backlog = self.lock();
        if backlog.len() == self.capacity {
            backlog.pop_front();
        }
        backlog.push_back(sample);
    }

    /// Consumer side: returns the most recent sample and clears the backlog.
    pub fn take_latest(&self) -> Option<Sample> {
        let mut backlog = self.lock();
        let latest = backlog.back().copied();
        backlog.clear();
        latest
    }

    /// Consumer side: moves every pending sample into `out` in publish order
    /// and clears the backlog. Preserves bursts that `take_latest` would drop.
    pub fn drain(&self, out: &mut Vec<Sample>) {
        let mut backlog = self.lock();
        out.extend(backlog.drain(..));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Sample>> {
        // A panic mid-push cannot leave a half-written Sample (it is Copy),
        // so a poisoned queue is still usable.
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SampleSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn take_latest_returns_newest_and_clears() {
        let slot = SampleSlot::new();
        slot.publish(Sample::new(0.0, 1.0));
        slot.publish(Sample::new(0.01, 2.0));
        assert_eq!(slot.take_latest(), Some(Sample::new(0.01, 2.0)));
        assert_eq!(slot.take_latest(), None);
    }

    #[test]
    fn empty_slot_yields_nothing() {
        let slot = SampleSlot::new();
        assert_eq!(slot.take_latest(), None);
    }

    #[test]
    fn full_backlog_drops_oldest() {
        let slot = SampleSlot::with_capacity(2);
        slot.publish(Sample::new(0.0, 1.0));
        slot.publish(Sample::new(0.01, 2.0));
        slot.publish(Sample::new(0.02, 3.0));
        let mut out = Vec::new();
        slot.drain(&mut out);
        assert_eq!(out, vec![Sample::new(0.01, 2.0), Sample::new(0.02, 3.0)]);
    }

    #[test]
    fn drain_preserves_publish_order() {
        let slot = SampleSlot::new();
        for i in 0..5 {
            slot.publish(Sample::new(f64::from(i) * 0.01, f32::from(i as u8)));
        }
        let mut out = Vec::new();
        slot.drain(&mut out);
        let times: Vec<f64> = out.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![0.0, 0.01, 0.02, 0.03, 0.04]);
        slot.drain(&mut out);
        assert_eq!(out.len(), 5, "second drain must find an empty backlog");
    }

    #[test]
    fn concurrent_publish_and_take_never_tears_a_sample() {
        // Producer publishes pairs where value == timestamp * 2; any torn
        // read would break that relation.
        let slot = Arc::new(SampleSlot::new());
        let producer_slot = Arc::clone(&slot);

        let producer = thread::spawn(move || {
            for i in 0..10_000u32 {
                let t = f64::from(i);
                producer_slot.publish(Sample::new(t, (t * 2.0) as f32));
            }
        });

        let mut last_seen = -1.0f64;
        for _ in 0..10_000 {
            if let Some(sample) = slot.take_latest() {
                assert_eq!(sample.value, (sample.timestamp * 2.0) as f32);
                assert!(sample.timestamp > last_seen, "reads must move forward");
                last_seen = sample.timestamp;
            }
        }

        producer.join().unwrap();
    }
}
