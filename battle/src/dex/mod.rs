//! Built-in species and move data
//!
//! A compact dex covering common competitive species and moves. Lookups are by
//! protocol id, so "Great Tusk", "greattusk" and "Great-Tusk" all resolve.

mod moves;
mod species;

use std::collections::HashMap;
use std::sync::LazyLock;

use arena_protocol::to_id;

pub use moves::{MoveCategory, MoveData, MoveEffect};
pub use species::SpeciesData;

use crate::types::StatTable;

static SPECIES_BY_ID: LazyLock<HashMap<String, &'static SpeciesData>> = LazyLock::new(|| {
    species::SPECIES
        .iter()
        .map(|s| (to_id(s.name), s))
        .collect()
});

static MOVES_BY_ID: LazyLock<HashMap<String, &'static MoveData>> =
    LazyLock::new(|| moves::MOVES.iter().map(|m| (to_id(m.name), m)).collect());

/// IVs assumed when nothing else is known
pub const DEFAULT_IVS: StatTable = StatTable::uniform(31);

/// EVs assumed for unknown spreads
pub const DEFAULT_EVS: StatTable = StatTable::uniform(84);

pub fn species(name: &str) -> Option<&'static SpeciesData> {
    SPECIES_BY_ID.get(&to_id(name)).copied()
}

pub fn move_data(name: &str) -> Option<&'static MoveData> {
    MOVES_BY_ID.get(&to_id(name)).copied()
}

pub fn all_species() -> &'static [SpeciesData] {
    species::SPECIES
}

pub fn all_moves() -> &'static [MoveData] {
    moves::MOVES
}

/// Base stats used for species missing from the table
pub const FALLBACK_BASE_STATS: StatTable = StatTable::uniform(80);

/// Nature multipliers in stat-table order (hp is always 1.0)
pub fn nature_modifiers(nature: &str) -> [f32; 6] {
    // (raised, lowered) as indexes into atk/def/spa/spd/spe
    let shift = match to_id(nature).as_str() {
        "lonely" => Some((1, 2)),
        "brave" => Some((1, 5)),
        "adamant" => Some((1, 3)),
        "naughty" => Some((1, 4)),
        "bold" => Some((2, 1)),
        "relaxed" => Some((2, 5)),
        "impish" => Some((2, 3)),
        "lax" => Some((2, 4)),
        "timid" => Some((5, 1)),
        "hasty" => Some((5, 2)),
        "jolly" => Some((5, 3)),
        "naive" => Some((5, 4)),
        "modest" => Some((3, 1)),
        "mild" => Some((3, 2)),
        "quiet" => Some((3, 5)),
        "rash" => Some((3, 4)),
        "calm" => Some((4, 1)),
        "gentle" => Some((4, 2)),
        "sassy" => Some((4, 5)),
        "careful" => Some((4, 3)),
        _ => None,
    };

    let mut mods = [1.0; 6];
    if let Some((up, down)) = shift {
        mods[up] = 1.1;
        mods[down] = 0.9;
    }
    mods
}

/// Compute battle stats from base stats and a spread
pub fn calc_stats(
    base: &StatTable,
    level: u8,
    evs: &StatTable,
    ivs: &StatTable,
    nature: &str,
) -> StatTable {
    let level = u32::from(level.clamp(1, 100));
    let base = base.to_array();
    let evs = evs.to_array();
    let ivs = ivs.to_array();
    let mods = nature_modifiers(nature);

    let mut out = [0u16; 6];
    for i in 0..6 {
        let core = (2 * u32::from(base[i]) + u32::from(ivs[i]) + u32::from(evs[i]) / 4) * level / 100;
        out[i] = if i == 0 {
            (core + level + 10) as u16
        } else {
            ((core + 5) as f32 * mods[i]).floor() as u16
        };
    }
    StatTable::from_array(out)
}

/// Stats for a species at `level` with the default spread
pub fn default_stats(species_name: &str, level: u8) -> StatTable {
    let base = species(species_name).map_or(FALLBACK_BASE_STATS, |s| s.base_stats);
    calc_stats(&base, level, &DEFAULT_EVS, &DEFAULT_IVS, "Serious")
}
