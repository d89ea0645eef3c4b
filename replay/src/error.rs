use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Transcript contains no usable protocol lines")]
    Empty,

    #[error("Frame {index} is out of range ({len} frames)")]
    OutOfRange { index: usize, len: usize },
}
