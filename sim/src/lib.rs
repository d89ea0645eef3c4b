//! Live battles, AI-vs-AI batches and engine transports.
//!
//! # Main Types
//!
//! - [`BattleManager`] - drives one battle over a [`ProtocolStream`], auto-playing AI sides
//! - [`run_batch_simulation`] - many AI-vs-AI battles with bounded concurrency
//! - [`LocalEngine`] / [`ProcessStream`] - in-process engine and external simulator transport
//! - [`BattleRecord`] - persistable summary of a finished battle
//!
//! # Example Usage
//!
//! ```no_run
//! use arena_ai::GreedyAi;
//! use arena_battle::{Action, GameType, Player};
//! use arena_sim::{BattleManager, LocalEngine, LocalEngineConfig, ManagerConfig, TurnOutcome};
//! use arena_team::TeamInput;
//!
//! # async fn run() -> Result<(), arena_sim::BattleError> {
//! let mine = TeamInput::detect("Garchomp @ Choice Scarf\n- Earthquake\n");
//! let theirs = TeamInput::detect("Heatran\n- Flash Cannon\n");
//! let manager = BattleManager::new(
//!     "gen9customgame",
//!     GameType::Singles,
//!     mine,
//!     theirs,
//!     ManagerConfig::default(),
//! )
//! .with_ai(Player::P2, Box::new(GreedyAi::new()));
//!
//! let mut outcome = manager.start(LocalEngine::new(LocalEngineConfig::default())).await?;
//! while outcome == TurnOutcome::AwaitingInput {
//!     outcome = manager.submit_action(Action::Move { index: 1, tera: false }).await?;
//! }
//! println!("winner: {:?}", manager.winner());
//! # Ok(())
//! # }
//! ```

pub mod batch;
mod error;
pub mod manager;
pub mod record;
pub mod stream;

pub use batch::{
    BatchConfig, BatchError, BatchProgress, BatchSummary, EngineKind, run_batch_simulation,
};
pub use error::BattleError;
pub use manager::{BattleManager, ManagerConfig, TurnOutcome};
pub use record::BattleRecord;
pub use stream::{
    LocalEngine, LocalEngineConfig, ProcessConfig, ProcessStream, ProtocolStream, StreamError,
};
