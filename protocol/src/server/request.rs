//! Battle request types
//!
//! JSON payload of `|request|` lines: what one side may do next.

use super::battle::{HpStatus, Player};
use serde::{Deserialize, Deserializer, Serialize};

/// A request asking one side to make a decision
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    /// Request ID for synchronization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rqid: Option<u64>,

    /// Active pokemon and their available moves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Vec<RequestActive>>,

    /// The requesting side's full team
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<RequestSide>,

    /// Which active slots must switch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_switch: Option<Vec<bool>>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub team_preview: bool,

    /// Nothing to choose; the opponent is deciding
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wait: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_cancel: bool,
}

impl BattleRequest {
    /// Deserialize from the JSON value carried by `ServerMessage::Request`
    pub fn parse(json: &serde_json::Value) -> Option<Self> {
        if json.is_null() {
            return None;
        }
        serde_json::from_value(json.clone()).ok()
    }

    /// The side this request is addressed to
    pub fn player(&self) -> Option<Player> {
        self.side.as_ref().and_then(|s| Player::parse(&s.id))
    }

    /// Whether this request requires a decision
    pub fn needs_decision(&self) -> bool {
        !self.wait && (self.team_preview || self.force_switch.is_some() || self.active.is_some())
    }

    pub fn is_force_switch(&self) -> bool {
        self.force_switch
            .as_ref()
            .is_some_and(|fs| fs.iter().any(|&b| b))
    }

    /// Team members that can be switched in, with their 1-based slot
    pub fn available_switches(&self) -> Vec<(usize, &RequestPokemon)> {
        self.side
            .as_ref()
            .map(|s| {
                s.pokemon
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !p.active && !p.is_fainted())
                    .map(|(i, p)| (i + 1, p))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// An active pokemon's options
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestActive {
    #[serde(default)]
    pub moves: Vec<MoveSlot>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trapped: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub maybe_trapped: bool,

    /// Tera type on offer, if terastallization is still available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_terastallize: Option<String>,
}

impl RequestActive {
    /// Usable moves with their 1-based slot
    pub fn available_moves(&self) -> Vec<(usize, &MoveSlot)> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_usable())
            .map(|(i, m)| (i + 1, m))
            .collect()
    }

    pub fn can_switch(&self) -> bool {
        !self.trapped
    }
}

/// A move slot on an active pokemon
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MoveSlot {
    /// Display name
    #[serde(rename = "move")]
    pub name: String,

    pub id: String,

    /// Struggle and locked moves may omit PP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pp: Option<u32>,

    #[serde(rename = "maxpp", default, skip_serializing_if = "Option::is_none")]
    pub max_pp: Option<u32>,

    #[serde(default)]
    pub target: String,

    /// Engines send either a bool or the name of the disabling effect
    #[serde(default, deserialize_with = "bool_or_source")]
    pub disabled: bool,
}

impl MoveSlot {
    pub fn is_usable(&self) -> bool {
        !self.disabled && self.pp.is_none_or(|pp| pp > 0)
    }
}

fn bool_or_source<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Source(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Source(s) => !s.is_empty(),
    })
}

/// The requesting player's side
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct RequestSide {
    pub name: String,

    /// "p1" or "p2"
    pub id: String,

    #[serde(default)]
    pub pokemon: Vec<RequestPokemon>,
}

/// A team member as described in a request
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPokemon {
    /// e.g. "p1: Garchomp"
    pub ident: String,

    /// e.g. "Garchomp, L50, M"
    pub details: String,

    /// e.g. "245/357 par"
    pub condition: String,

    #[serde(default)]
    pub active: bool,

    /// Move ids
    #[serde(default)]
    pub moves: Vec<String>,

    #[serde(default)]
    pub ability: String,

    #[serde(default)]
    pub item: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teratype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terastallized: Option<String>,
}

impl RequestPokemon {
    pub fn hp_status(&self) -> Option<HpStatus> {
        HpStatus::parse(&self.condition)
    }

    pub fn is_fainted(&self) -> bool {
        self.hp_status().is_none_or(|hp| hp.is_fainted())
    }

    /// Current and maximum HP (max is 0 when fainted)
    pub fn hp(&self) -> (u32, u32) {
        self.hp_status()
            .map(|hp| (hp.current, hp.max.unwrap_or(0)))
            .unwrap_or((0, 0))
    }

    pub fn species(&self) -> &str {
        self.details.split(',').next().unwrap_or(&self.details)
    }

    /// Name part of the ident ("p1: Chompy" -> "Chompy")
    pub fn name(&self) -> &str {
        self.ident
            .split_once(": ")
            .map(|(_, name)| name)
            .unwrap_or(&self.ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVE_REQUEST: &str = r#"{
        "active": [{"moves": [
            {"move": "Earthquake", "id": "earthquake", "pp": 16, "maxpp": 16, "target": "allAdjacent", "disabled": false},
            {"move": "Dragon Claw", "id": "dragonclaw", "pp": 0, "maxpp": 24, "target": "normal", "disabled": false},
            {"move": "Swords Dance", "id": "swordsdance", "pp": 32, "maxpp": 32, "target": "self", "disabled": "Taunt"}
        ], "canTerastallize": "Steel"}],
        "side": {"name": "Alice", "id": "p1", "pokemon": [
            {"ident": "p1: Garchomp", "details": "Garchomp, L50, M", "condition": "150/183", "active": true, "moves": ["earthquake"]},
            {"ident": "p1: Chompy", "details": "Gible, F", "condition": "0 fnt", "active": false},
            {"ident": "p1: Rotom", "details": "Rotom-Wash", "condition": "50/50 par", "active": false}
        ]},
        "rqid": 3
    }"#;

    #[test]
    fn test_parse_move_request() {
        let json: serde_json::Value = serde_json::from_str(MOVE_REQUEST).unwrap();
        let request = BattleRequest::parse(&json).unwrap();

        assert_eq!(request.rqid, Some(3));
        assert_eq!(request.player(), Some(Player::P1));
        assert!(request.needs_decision());
        assert!(!request.is_force_switch());

        let active = &request.active.as_ref().unwrap()[0];
        assert_eq!(active.can_terastallize.as_deref(), Some("Steel"));
        let usable: Vec<usize> = active.available_moves().iter().map(|(i, _)| *i).collect();
        assert_eq!(usable, vec![1]);
        assert!(active.moves[2].disabled);

        let switches: Vec<usize> = request.available_switches().iter().map(|(i, _)| *i).collect();
        assert_eq!(switches, vec![3]);
    }

    #[test]
    fn test_request_pokemon_helpers() {
        let json: serde_json::Value = serde_json::from_str(MOVE_REQUEST).unwrap();
        let request = BattleRequest::parse(&json).unwrap();
        let side = request.side.unwrap();

        assert_eq!(side.pokemon[0].hp(), (150, 183));
        assert_eq!(side.pokemon[0].species(), "Garchomp");
        assert_eq!(side.pokemon[1].name(), "Chompy");
        assert!(side.pokemon[1].is_fainted());
        assert_eq!(side.pokemon[1].hp(), (0, 0));
    }

    #[test]
    fn test_wait_request() {
        let json = serde_json::json!({"wait": true, "side": {"name": "Bob", "id": "p2", "pokemon": []}});
        let request = BattleRequest::parse(&json).unwrap();
        assert!(!request.needs_decision());
        assert_eq!(request.player(), Some(Player::P2));
    }

    #[test]
    fn test_null_request() {
        assert!(BattleRequest::parse(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn test_struggle_without_pp() {
        let json = serde_json::json!({"move": "Struggle", "id": "struggle", "target": "randomNormal"});
        let slot: MoveSlot = serde_json::from_value(json).unwrap();
        assert!(slot.is_usable());
        assert_eq!(slot.pp, None);
    }
}
