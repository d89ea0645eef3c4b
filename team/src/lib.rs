//! Team formats for Showdown-style battles.
//!
//! Converts between [`TeamSlotData`] lists, the engine's packed team string and
//! the human paste format. [`TeamInput`] accepts any of them and produces the
//! packed string the engine needs.
//!
//! ```
//! use arena_team::{TeamSlotData, pack_one_slot};
//!
//! let mut slot = TeamSlotData::new("Pikachu").with_moves(&["Thunderbolt"]);
//! slot.level = 50;
//! assert_eq!(pack_one_slot(&slot), "Pikachu||||thunderbolt||||||50|");
//! ```

mod error;
mod input;
mod packed;
mod paste;
mod slot;

pub use error::TeamError;
pub use input::TeamInput;
pub use packed::{pack_one_slot, pack_team, unpack_one_slot, unpack_team};
pub use paste::{parse_paste, team_to_showdown_paste};
pub use slot::{
    MAX_EV, MAX_EV_TOTAL, MAX_IV, MAX_LEVEL, TeamSlotData, display_species,
};
