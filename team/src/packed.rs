//! Showdown packed team format
//!
//! One member per `]`-separated slot:
//! `NAME|SPECIES|ITEM|ABILITY|MOVES|NATURE|EVS|GENDER|IVS|SHINY|LEVEL|MISC`

use arena_battle::{StatTable, dex};
use arena_protocol::to_id;

use crate::error::TeamError;
use crate::slot::{MAX_IV, MAX_LEVEL, TeamSlotData, display_species};

const FIELD_COUNT: usize = 12;

fn join_stats(stats: &StatTable) -> String {
    stats
        .to_array()
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Encode one team member
pub fn pack_one_slot(slot: &TeamSlotData) -> String {
    let species = display_species(&slot.species);
    let name = slot.display_name();
    let species_field = if to_id(&species) == to_id(&name) {
        String::new()
    } else {
        species
    };

    let moves = slot.move_names().map(to_id).collect::<Vec<_>>().join(",");
    let evs = if slot.evs.is_uniform(0) {
        String::new()
    } else {
        join_stats(&slot.evs)
    };
    let ivs = if slot.ivs.is_uniform(MAX_IV) {
        String::new()
    } else {
        join_stats(&slot.ivs)
    };
    let level = if slot.level == MAX_LEVEL {
        String::new()
    } else {
        slot.level.to_string()
    };
    let misc = match slot.tera_type.as_deref().map(str::trim) {
        Some(tera) if !tera.is_empty() => format!(",,,,,{tera}"),
        _ => String::new(),
    };

    [
        name,
        species_field,
        to_id(&slot.item),
        to_id(&slot.ability),
        moves,
        slot.nature.trim().to_string(),
        evs,
        slot.gender.map(String::from).unwrap_or_default(),
        ivs,
        if slot.shiny { "S".to_string() } else { String::new() },
        level,
        misc,
    ]
    .join("|")
}

/// Encode a whole team, members joined by `]`
pub fn pack_team(slots: &[TeamSlotData]) -> String {
    slots.iter().map(pack_one_slot).collect::<Vec<_>>().join("]")
}

fn parse_stats(field: &str, empty_value: u16, index: usize) -> Result<StatTable, TeamError> {
    if field.is_empty() {
        return Ok(StatTable::uniform(empty_value));
    }
    let values: Vec<&str> = field.split(',').collect();
    if values.len() != 6 {
        return Err(TeamError::Packed {
            index,
            reason: format!("expected six stat values, got {:?}", field),
        });
    }
    let mut out = [0u16; 6];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = if value.is_empty() {
            empty_value
        } else {
            value.parse().map_err(|_| TeamError::Packed {
                index,
                reason: format!("bad stat value {:?}", value),
            })?
        };
    }
    Ok(StatTable::from_array(out))
}

/// Decode one packed member
pub fn unpack_one_slot(packed: &str, index: usize) -> Result<TeamSlotData, TeamError> {
    let fields: Vec<&str> = packed.split('|').collect();
    if fields.len() < FIELD_COUNT - 1 {
        return Err(TeamError::Packed {
            index,
            reason: format!("expected {FIELD_COUNT} fields, got {}", fields.len()),
        });
    }
    let name = fields[0].trim();
    let species = if fields[1].is_empty() { name } else { fields[1] };
    if species.is_empty() {
        return Err(TeamError::Packed {
            index,
            reason: "missing species".to_string(),
        });
    }

    let mut slot = TeamSlotData::new(display_species(species));
    if to_id(name) != to_id(&slot.species) {
        slot.nickname = Some(name.to_string());
    }
    slot.item = fields[2].to_string();
    slot.ability = fields[3].to_string();
    let moves: Vec<String> = fields[4]
        .split(',')
        .filter(|m| !m.is_empty())
        .map(|m| dex::move_data(m).map_or_else(|| m.to_string(), |d| d.name.to_string()))
        .collect();
    slot = slot.with_moves(&moves);
    slot.nature = fields[5].to_string();
    slot.evs = parse_stats(fields[6], 0, index)?;
    slot.gender = fields[7].chars().next();
    slot.ivs = parse_stats(fields[8], MAX_IV, index)?;
    slot.shiny = fields[9] == "S";
    slot.level = if fields[10].is_empty() {
        MAX_LEVEL
    } else {
        fields[10].parse().map_err(|_| TeamError::Packed {
            index,
            reason: format!("bad level {:?}", fields[10]),
        })?
    };
    slot.tera_type = fields
        .get(11)
        .and_then(|misc| misc.split(',').nth(5))
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    Ok(slot)
}

/// Decode a packed team; empty input yields an empty team
pub fn unpack_team(packed: &str) -> Result<Vec<TeamSlotData>, TeamError> {
    packed
        .trim()
        .split(']')
        .filter(|s| !s.trim().is_empty())
        .enumerate()
        .map(|(i, s)| unpack_one_slot(s, i))
        .collect()
}
