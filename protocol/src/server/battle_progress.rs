//! Battle progress message parsers

use super::battle::{player_at, text_at};
use super::ServerMessage;
use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// Parse the JSON payload of |request|REQUEST
///
/// An empty payload is sent by some engines to clear a pending request.
pub fn parse_request(json: &str) -> Result<ServerMessage> {
    if json.trim().is_empty() {
        return Ok(ServerMessage::Request(Value::Null));
    }
    let request: Value = serde_json::from_str(json).context("Malformed request JSON")?;
    Ok(ServerMessage::Request(request))
}

/// Parse |turn|NUMBER
pub fn parse_turn(parts: &[&str]) -> Result<ServerMessage> {
    parts
        .get(2)
        .and_then(|s| s.parse().ok())
        .map(ServerMessage::Turn)
        .ok_or_else(|| anyhow!("Missing turn number"))
}

/// Parse |win|USER
pub fn parse_win(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Win(text_at(parts, 2)))
}

/// Parse |split|PLAYER
pub fn parse_split(parts: &[&str]) -> Result<ServerMessage> {
    Ok(ServerMessage::Split(player_at(parts, 2)?))
}
