//! Human-readable battle log

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Move,
    Switch,
    Damage,
    Heal,
    Faint,
    Status,
    Boost,
    Weather,
    Field,
    Side,
    Turn,
    Win,
    Tie,
    Other,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Move => "move",
            LogCategory::Switch => "switch",
            LogCategory::Damage => "damage",
            LogCategory::Heal => "heal",
            LogCategory::Faint => "faint",
            LogCategory::Status => "status",
            LogCategory::Boost => "boost",
            LogCategory::Weather => "weather",
            LogCategory::Field => "field",
            LogCategory::Side => "side",
            LogCategory::Turn => "turn",
            LogCategory::Win => "win",
            LogCategory::Tie => "tie",
            LogCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One categorized line derived from one protocol message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLogEntry {
    pub category: LogCategory,
    pub message: String,
    /// Turn the event happened on (0 before the first turn)
    pub turn: u32,
}

impl BattleLogEntry {
    pub fn new(category: LogCategory, message: impl Into<String>, turn: u32) -> Self {
        Self {
            category,
            message: message.into(),
            turn,
        }
    }
}

impl std::fmt::Display for BattleLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}
