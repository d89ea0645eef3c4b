use thiserror::Error;

/// A protocol line that could not be interpreted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unparseable protocol line {line:?}: {reason}")]
    Unparseable { line: String, reason: String },

    #[error("Request payload does not describe a decision: {0}")]
    MalformedRequest(String),
}
