//! Persistable summary of a finished battle

use serde::{Deserialize, Serialize};

use arena_battle::{GameType, Winner};

/// Everything needed to store a battle and replay it later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRecord {
    pub format_id: String,
    pub game_type: GameType,
    pub players: [String; 2],
    /// Showdown paste per side
    pub teams: [String; 2],
    /// Member display names per side
    pub team_names: [Vec<String>; 2],
    pub winner: Option<Winner>,
    pub turns: u32,
    /// Public protocol log, one line per entry
    pub protocol_log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<serde_json::Value>,
}

impl BattleRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Name of the winning player, if a side won
    pub fn winner_name(&self) -> Option<&str> {
        let player = self.winner?.player()?;
        Some(&self.players[player.index()])
    }
}
