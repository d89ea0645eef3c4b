//! Battle state rebuilt from protocol lines

mod interpreter;
mod log;
mod state;

pub use interpreter::{Interpreted, ProtocolInterpreter};
pub use log::{BattleLogEntry, LogCategory};
pub use state::{BattleState, Phase, Winner};
