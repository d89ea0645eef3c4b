//! Battle state, domain types and decision support for Showdown-style battles.
//!
//! `arena-battle` sits between `arena-protocol` (wire format) and the crates
//! that drive or inspect battles:
//!
//! ```text
//! arena-protocol (wire format)
//!        │
//!        ▼
//! arena-battle (domain types + interpreter)
//!        │
//!        ├─> arena-ai (decision strategies)
//!        ├─> arena-replay (finished transcripts)
//!        └─> arena-sim (live battles and batches)
//! ```
//!
//! # Main Types
//!
//! - [`BattleState`] - everything known about one battle
//! - [`ProtocolInterpreter`] - applies protocol lines to a state, producing [`BattleLogEntry`]s
//! - [`BattleActionSet`] / [`Action`] - legal choices for one side and the choice made
//! - [`Type`], [`Status`], [`StatStages`], [`Weather`], [`SideCondition`] - domain types
//! - [`dex`] - built-in species and move data
//! - [`query`] - type matchups and damage estimates
//!
//! # Example Usage
//!
//! ```
//! use arena_battle::{BattleState, Player, ProtocolInterpreter};
//!
//! let mut state = BattleState::new();
//! let mut interpreter = ProtocolInterpreter::new();
//! for line in ["|player|p1|Alice|", "|switch|p1a: Garchomp|Garchomp, M|357/357", "|turn|1"] {
//!     interpreter.feed(&mut state, line).unwrap();
//! }
//! assert_eq!(state.turn, 1);
//! assert_eq!(state.active(Player::P1).unwrap().hp_max, 357);
//! ```

pub mod actions;
pub mod dex;
pub mod error;
pub mod query;
pub mod tracking;
pub mod types;

pub use actions::{Action, ActionError, BattleActionSet, MoveOption, SwitchOption};
pub use error::ProtocolError;
pub use tracking::{
    BattleLogEntry, BattleState, Interpreted, LogCategory, Phase, ProtocolInterpreter, Winner,
};
pub use types::{
    FieldState, PokemonState, SideCondition, SideState, StatStages, StatTable, Status, Terrain,
    Type, Volatile, Weather, TYPE_CHART, type_effectiveness,
};

// Re-export commonly used protocol types
pub use arena_protocol::{GameType, Player, Stat};
