//! Battle initialization message parsers
//!
//! Sent once at the start of a battle, before the first turn.

use super::battle::{details_at, player_at, text_at};
use super::{GameType, ServerMessage};
use anyhow::{Result, anyhow};

/// Parse |player|PLAYER|USERNAME|AVATAR|RATING
///
/// A bare |player|PLAYER| line (player leaving) yields an empty username.
pub fn parse_player(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Player {
        player: player_at(parts, 2)?,
        username: text_at(parts, 3),
        rating: parts.get(5).and_then(|s| s.parse().ok()),
    })
}

/// Parse |teamsize|PLAYER|NUMBER
pub fn parse_teamsize(parts: &[&str]) -> Result<ServerMessage> {
    let player = player_at(parts, 2)?;
    let size = parts
        .get(3)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow!("Missing team size"))?;

    Ok(ServerMessage::TeamSize { player, size })
}

/// Parse |gametype|GAMETYPE
pub fn parse_gametype(parts: &[&str]) -> Result<ServerMessage> {
    parts
        .get(2)
        .and_then(|s| GameType::parse(s))
        .map(ServerMessage::GameType)
        .ok_or_else(|| anyhow!("Unsupported game type: {}", text_at(parts, 2)))
}

/// Parse |gen|GENNUM
pub fn parse_gen(parts: &[&str]) -> Result<ServerMessage> {
    parts
        .get(2)
        .and_then(|s| s.parse().ok())
        .map(ServerMessage::Gen)
        .ok_or_else(|| anyhow!("Missing generation"))
}

/// Parse |tier|FORMATNAME
pub fn parse_tier(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Tier(text_at(parts, 2)))
}

/// Parse |rule|RULE: DESCRIPTION
pub fn parse_rule(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Rule(parts[2..].join("|")))
}

/// Parse |poke|PLAYER|DETAILS|ITEM
pub fn parse_poke(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Poke {
        player: player_at(parts, 2)?,
        details: details_at(parts, 3),
    })
}

/// Parse |teampreview or |teampreview|NUMBER
pub fn parse_teampreview(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::TeamPreview(
        parts.get(2).and_then(|s| s.parse().ok()),
    ))
}
