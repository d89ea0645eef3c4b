//! Minor battle action message parsers
//!
//! Secondary effects: damage, stat changes, status, field and side conditions.

use super::battle::{from_tag, hp_status_at, pokemon_at, text_at, PokemonIdent, SideRef, Stat};
use super::ServerMessage;
use anyhow::{Result, anyhow};

/// Parse |-damage|POKEMON|HP STATUS with optional [from] EFFECT
pub fn parse_damage(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Damage {
        pokemon: pokemon_at(parts, 2)?,
        hp_status: hp_status_at(parts, 3),
        from: from_tag(parts),
    })
}

/// Parse |-heal|POKEMON|HP STATUS with optional [from] EFFECT
pub fn parse_heal(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Heal {
        pokemon: pokemon_at(parts, 2)?,
        hp_status: hp_status_at(parts, 3),
        from: from_tag(parts),
    })
}

/// Parse |-sethp|POKEMON|HP
pub fn parse_sethp(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::SetHp {
        pokemon: pokemon_at(parts, 2)?,
        hp_status: hp_status_at(parts, 3),
    })
}

/// Parse |-status|POKEMON|STATUS
pub fn parse_status(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Status {
        pokemon: pokemon_at(parts, 2)?,
        status: text_at(parts, 3),
    })
}

/// Parse |-curestatus|POKEMON|STATUS
pub fn parse_curestatus(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::CureStatus {
        pokemon: pokemon_at(parts, 2)?,
        status: text_at(parts, 3),
    })
}

/// Parse |-cureteam|POKEMON
pub fn parse_cureteam(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::CureTeam(pokemon_at(parts, 2)?))
}

/// Parse |-boost|, |-unboost| and |-setboost| (POKEMON|STAT|AMOUNT)
pub fn parse_boost(parts: &[&str], command: &str) -> Result<ServerMessage> {
    let pokemon = pokemon_at(parts, 2)?;
    let stat = parts
        .get(3)
        .and_then(|s| Stat::parse(s))
        .ok_or_else(|| anyhow!("Missing stat"))?;
    let amount = parts
        .get(4)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow!("Missing amount"))?;

    Ok(match command {
        "-unboost" => ServerMessage::Unboost {
            pokemon,
            stat,
            amount,
        },
        "-setboost" => ServerMessage::SetBoost {
            pokemon,
            stat,
            amount,
        },
        _ => ServerMessage::Boost {
            pokemon,
            stat,
            amount,
        },
    })
}

/// Parse |-clearboost|, |-clearnegativeboost| and |-invertboost| (POKEMON)
pub fn parse_boost_reset(parts: &[&str], command: &str) -> Result<ServerMessage> {
    let pokemon = pokemon_at(parts, 2)?;
    Ok(match command {
        "-clearnegativeboost" => ServerMessage::ClearNegativeBoost(pokemon),
        "-invertboost" => ServerMessage::InvertBoost(pokemon),
        _ => ServerMessage::ClearBoost(pokemon),
    })
}

/// Parse |-weather|WEATHER with optional [upkeep]
pub fn parse_weather(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Weather {
        weather: parts.get(2).copied().unwrap_or("none").to_string(),
        upkeep: parts.contains(&"[upkeep]"),
    })
}

/// Parse |-sidestart|SIDE|CONDITION and |-sideend|SIDE|CONDITION
pub fn parse_side_condition(parts: &[&str], command: &str) -> Result<ServerMessage> {
    let side = parts
        .get(2)
        .and_then(|s| SideRef::parse(s))
        .ok_or_else(|| anyhow!("Missing side"))?;
    let condition = text_at(parts, 3);

    Ok(if command == "-sideend" {
        ServerMessage::SideEnd { side, condition }
    } else {
        ServerMessage::SideStart { side, condition }
    })
}

/// Parse |-start|POKEMON|EFFECT and |-end|POKEMON|EFFECT
pub fn parse_volatile(parts: &[&str], command: &str) -> Result<ServerMessage> {
    let pokemon = pokemon_at(parts, 2)?;
    let effect = text_at(parts, 3);

    Ok(if command == "-end" {
        ServerMessage::VolatileEnd { pokemon, effect }
    } else {
        ServerMessage::VolatileStart { pokemon, effect }
    })
}

/// Parse |-crit|, |-supereffective|, |-resisted|, |-immune| (POKEMON)
pub fn parse_hit_note(parts: &[&str], command: &str) -> Result<ServerMessage> {
    let pokemon = pokemon_at(parts, 2)?;
    Ok(match command {
        "-crit" => ServerMessage::Crit(pokemon),
        "-supereffective" => ServerMessage::SuperEffective(pokemon),
        "-resisted" => ServerMessage::Resisted(pokemon),
        _ => ServerMessage::Immune(pokemon),
    })
}

/// Parse |-miss|SOURCE|TARGET
pub fn parse_miss(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Miss {
        source: pokemon_at(parts, 2)?,
        target: parts.get(3).and_then(|s| PokemonIdent::parse(s)),
    })
}

/// Parse |-fail|POKEMON|ACTION
pub fn parse_fail(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Fail {
        pokemon: pokemon_at(parts, 2)?,
        action: parts.get(3).map(|s| s.to_string()),
    })
}

/// Parse |-item|POKEMON|ITEM and |-enditem|POKEMON|ITEM
pub fn parse_item(parts: &[&str], command: &str) -> Result<ServerMessage> {
    let pokemon = pokemon_at(parts, 2)?;
    let item = text_at(parts, 3);

    Ok(if command == "-enditem" {
        ServerMessage::EndItem { pokemon, item }
    } else {
        ServerMessage::Item { pokemon, item }
    })
}

/// Parse |-ability|POKEMON|ABILITY
pub fn parse_ability(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Ability {
        pokemon: pokemon_at(parts, 2)?,
        ability: text_at(parts, 3),
    })
}

/// Parse |-transform|POKEMON|SPECIES
pub fn parse_transform(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Transform {
        pokemon: pokemon_at(parts, 2)?,
        species: text_at(parts, 3),
    })
}

/// Parse |-terastallize|POKEMON|TYPE
pub fn parse_terastallize(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Terastallize {
        pokemon: pokemon_at(parts, 2)?,
        tera_type: text_at(parts, 3),
    })
}

/// Parse |-activate|EFFECT or |-activate|POKEMON|EFFECT
pub fn parse_activate(parts: &[&str]) -> Result<ServerMessage> {
    let pokemon = parts.get(2).and_then(|s| PokemonIdent::parse(s));
    let effect_index = if pokemon.is_some() { 3 } else { 2 };

    Ok(ServerMessage::Activate {
        pokemon,
        effect: text_at(parts, effect_index),
    })
}
