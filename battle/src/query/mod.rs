//! Read-only helpers for decision making
//!
//! Type matchups and damage estimates over tracked state. Used by the AI
//! players and the local engine.

mod damage;
mod matchup;

pub use damage::{
    AVERAGE_ROLL, Combatant, DamageContext, estimate_damage, expected_fraction, hit_damage,
};
pub use matchup::{is_immune_to, matchup_ratio, offensive_multiplier, weaknesses};
