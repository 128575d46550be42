use thiserror::Error;

/// Producer-side failure.
///
/// These stop the producer thread; they are never propagated synchronously
/// into the frame loop. The consumer keeps rendering the last-known trace.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the replay recording failed.
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    /// The converter hardware (or its bus) failed.
    #[error("converter device failure: {0}")]
    Device(String),
}
