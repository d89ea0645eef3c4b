//! Major battle action message parsers
//!
//! Moves, switches, faints: the events that drive a turn.

use super::battle::{details_at, hp_status_at, pokemon_at, text_at, PokemonIdent};
use super::ServerMessage;
use anyhow::Result;

/// Parse |move|POKEMON|MOVE|TARGET with optional [miss]/[still] tags
pub fn parse_move(parts: &[&str]) -> Result<ServerMessage> {
    let tags = parts.get(5..).unwrap_or_default();

    Ok(ServerMessage::Move {
        pokemon: pokemon_at(parts, 2)?,
        move_name: text_at(parts, 3),
        target: parts.get(4).and_then(|s| PokemonIdent::parse(s)),
        miss: tags.contains(&"[miss]"),
        still: tags.contains(&"[still]"),
    })
}

/// Parse |switch|POKEMON|DETAILS|HP STATUS (and |drag| with the same shape)
pub fn parse_switch(parts: &[&str], drag: bool) -> Result<ServerMessage> {
    Ok(ServerMessage::Switch {
        pokemon: pokemon_at(parts, 2)?,
        details: details_at(parts, 3),
        hp_status: hp_status_at(parts, 4),
        drag,
    })
}

/// Parse |detailschange|POKEMON|DETAILS|HP STATUS or |-formechange|POKEMON|SPECIES|HP STATUS
pub fn parse_detailschange(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::DetailsChange {
        pokemon: pokemon_at(parts, 2)?,
        species: details_at(parts, 3).species,
        hp_status: hp_status_at(parts, 4),
    })
}

/// Parse |cant|POKEMON|REASON or |cant|POKEMON|REASON|MOVE
pub fn parse_cant(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Cant {
        pokemon: pokemon_at(parts, 2)?,
        reason: text_at(parts, 3),
        move_name: parts.get(4).map(|s| s.to_string()),
    })
}

/// Parse |faint|POKEMON
pub fn parse_faint(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Faint(pokemon_at(parts, 2)?))
}
