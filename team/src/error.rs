use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TeamError {
    /// Input that cannot become a playable team
    #[error("Invalid team: {0}")]
    Validation(String),

    #[error("Malformed packed slot {index}: {reason}")]
    Packed { index: usize, reason: String },
}
