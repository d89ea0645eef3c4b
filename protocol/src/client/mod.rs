//! Commands written to the engine's input stream

use crate::server::Player;
use serde_json::json;

/// One side's decision for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// `move N` or `move N terastallize` (1-based slot)
    Move { index: usize, tera: bool },
    /// `switch N` (1-based team position)
    Switch { index: usize },
    /// `team 312...` lead order for team preview (1-based positions)
    Team(Vec<usize>),
    /// Let the engine pick
    Default,
}

impl Choice {
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::Move { index, tera: false } => format!("move {}", index),
            Self::Move { index, tera: true } => format!("move {} terastallize", index),
            Self::Switch { index } => format!("switch {}", index),
            Self::Team(order) => {
                let order: Vec<String> = order.iter().map(|i| i.to_string()).collect();
                format!("team {}", order.join(","))
            }
            Self::Default => "default".to_string(),
        }
    }
}

/// Commands accepted by a battle engine's stream interface
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// >start {"formatid":"..."}
    Start { format_id: String, seed: Option<[u32; 4]> },

    /// >player p1 {"name":"...","team":"..."}
    Player {
        player: Player,
        name: String,
        packed_team: String,
    },

    /// >p1 move 1
    Choose { player: Player, choice: Choice },

    /// >forcewin p1
    ForceWin(Player),

    /// >forcetie
    ForceTie,
}

impl EngineCommand {
    /// Serialize to the engine's input line format
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::Start { format_id, seed } => {
                let mut options = json!({ "formatid": format_id });
                if let Some(seed) = seed {
                    options["seed"] = json!(seed);
                }
                format!(">start {}", options)
            }
            Self::Player {
                player,
                name,
                packed_team,
            } => format!(
                ">player {} {}",
                player,
                json!({ "name": name, "team": packed_team })
            ),
            Self::Choose { player, choice } => {
                format!(">{} {}", player, choice.to_protocol_string())
            }
            Self::ForceWin(player) => format!(">forcewin {}", player),
            Self::ForceTie => ">forcetie".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_strings() {
        assert_eq!(Choice::Move { index: 2, tera: false }.to_protocol_string(), "move 2");
        assert_eq!(
            Choice::Move { index: 1, tera: true }.to_protocol_string(),
            "move 1 terastallize"
        );
        assert_eq!(Choice::Switch { index: 4 }.to_protocol_string(), "switch 4");
        assert_eq!(Choice::Team(vec![3, 1, 2]).to_protocol_string(), "team 3,1,2");
    }

    #[test]
    fn test_engine_commands() {
        let start = EngineCommand::Start {
            format_id: "gen9customgame".to_string(),
            seed: None,
        };
        assert_eq!(start.to_protocol_string(), r#">start {"formatid":"gen9customgame"}"#);

        let choose = EngineCommand::Choose {
            player: Player::P2,
            choice: Choice::Switch { index: 2 },
        };
        assert_eq!(choose.to_protocol_string(), ">p2 switch 2");

        let player = EngineCommand::Player {
            player: Player::P1,
            name: "Alice".to_string(),
            packed_team: "Pikachu|||static|thunderbolt||||||".to_string(),
        };
        let line = player.to_protocol_string();
        assert!(line.starts_with(">player p1 {"));
        let json: serde_json::Value = serde_json::from_str(&line[">player p1 ".len()..]).unwrap();
        assert_eq!(json["name"], "Alice");

        assert_eq!(EngineCommand::ForceWin(Player::P1).to_protocol_string(), ">forcewin p1");
        assert_eq!(EngineCommand::ForceTie.to_protocol_string(), ">forcetie");
    }
}
