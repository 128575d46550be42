//! Sample acquisition core for the cardioscope.
//!
//! Deliberately graphics-free: sample sources, the producer/consumer hand-off
//! slot, and the acquisition thread live here so the whole pipeline can be
//! tested without a window or a GPU.

mod acquire;
mod adc;
mod error;
mod replay;
mod sample;
mod slot;
mod source;

pub use acquire::{spawn, AcquisitionHandle};
pub use adc::{ConversionPort, EventSource, VOLTS_PER_STEP};
pub use error::SourceError;
pub use replay::{ReplaySource, DEFAULT_SAMPLE_RATE_HZ};
pub use sample::Sample;
pub use slot::SampleSlot;
pub use source::{ManualSource, SampleSource};
