use std::time::Duration;

use arena_battle::ActionError;
use arena_team::TeamError;
use thiserror::Error;

use crate::stream::StreamError;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error(transparent)]
    Validation(#[from] TeamError),

    /// The engine failed or went away before the battle could proceed
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid action: {0}")]
    InvalidAction(#[from] ActionError),

    #[error("Invalid lead order: {0}")]
    InvalidLead(String),

    /// The engine refused a choice that passed local validation
    #[error("Choice rejected by the engine: {0}")]
    Rejected(String),

    #[error("Not allowed while the battle is {0}")]
    Phase(&'static str),

    #[error("Battle is closed")]
    Closed,
}

impl From<StreamError> for BattleError {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Closed => BattleError::Closed,
            other => BattleError::Engine(other.to_string()),
        }
    }
}
