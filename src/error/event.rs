use thiserror::Error;

/// Failures decoding cross-process events.
#[derive(Error, Debug)]
pub enum EventError {
    /// The payload did not have the expected shape.
    #[error("Malformed auth event payload '{payload}': {reason}")]
    MalformedPayload { payload: String, reason: String },
}
