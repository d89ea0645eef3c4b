//! Legal choices for one side, built from a `|request|`

use arena_protocol::{BattleRequest, Choice, Player};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dex;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOption {
    /// 1-based move slot
    pub index: usize,
    pub id: String,
    pub name: String,
    pub pp: Option<u32>,
    pub max_pp: Option<u32>,
    pub disabled: bool,
    pub move_type: Option<Type>,
    pub target: String,
}

impl MoveOption {
    pub fn is_usable(&self) -> bool {
        !self.disabled && self.pp.is_none_or(|pp| pp > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchOption {
    /// 1-based party position
    pub index: usize,
    pub species: String,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub fainted: bool,
    /// Already on the field
    pub active: bool,
}

impl SwitchOption {
    pub fn hp_fraction(&self) -> f32 {
        if self.fainted || self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    pub fn is_eligible(&self) -> bool {
        !self.fainted && !self.active
    }
}

/// Snapshot of what one side may do right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleActionSet {
    pub player: Player,
    pub moves: Vec<MoveOption>,
    /// Whole party in request order, including fainted and active members
    pub switches: Vec<SwitchOption>,
    pub can_tera: bool,
    pub force_switch: bool,
    pub team_preview: bool,
    pub trapped: bool,
}

/// A side's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    Move { index: usize, tera: bool },
    Switch { index: usize },
}

impl Action {
    pub fn to_choice(&self) -> Choice {
        match *self {
            Action::Move { index, tera } => Choice::Move { index, tera },
            Action::Switch { index } => Choice::Switch { index },
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_choice().to_protocol_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("No decision is pending")]
    NoPendingRequest,

    #[error("Move {0} does not exist")]
    MoveOutOfRange(usize),

    #[error("Move {0} is disabled")]
    MoveDisabled(usize),

    #[error("Switch target {0} does not exist")]
    SwitchOutOfRange(usize),

    #[error("Switch target {0} has fainted")]
    SwitchFainted(usize),

    #[error("Switch target {0} is already active")]
    SwitchActive(usize),

    #[error("Terastallization is not available")]
    TeraUnavailable,

    #[error("A switch is required")]
    MustSwitch,

    #[error("The active pokemon is trapped")]
    Trapped,
}

impl BattleActionSet {
    /// Build from a request; `None` for wait requests or requests without a side
    pub fn from_request(request: &BattleRequest) -> Option<Self> {
        if request.wait {
            return None;
        }
        let player = request.player()?;
        let active = request.active.as_ref().and_then(|a| a.first());

        let moves = active
            .map(|a| {
                a.moves
                    .iter()
                    .enumerate()
                    .map(|(i, slot)| MoveOption {
                        index: i + 1,
                        id: slot.id.clone(),
                        name: slot.name.clone(),
                        pp: slot.pp,
                        max_pp: slot.max_pp,
                        disabled: !slot.is_usable(),
                        move_type: dex::move_data(&slot.id)
                            .or_else(|| dex::move_data(&slot.name))
                            .map(|m| m.move_type),
                        target: slot.target.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let switches = request
            .side
            .as_ref()
            .map(|side| {
                side.pokemon
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let (hp, max_hp) = p.hp();
                        SwitchOption {
                            index: i + 1,
                            species: p.species().to_string(),
                            name: p.name().to_string(),
                            hp,
                            max_hp,
                            fainted: p.is_fainted(),
                            active: p.active,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let force_switch = request.is_force_switch();
        Some(Self {
            player,
            moves: if force_switch { Vec::new() } else { moves },
            switches,
            can_tera: !force_switch && active.is_some_and(|a| a.can_terastallize.is_some()),
            force_switch,
            team_preview: request.team_preview,
            trapped: active.is_some_and(|a| a.trapped),
        })
    }

    pub fn usable_moves(&self) -> impl Iterator<Item = &MoveOption> {
        self.moves.iter().filter(|m| m.is_usable())
    }

    pub fn eligible_switches(&self) -> impl Iterator<Item = &SwitchOption> {
        self.switches.iter().filter(|s| s.is_eligible())
    }

    /// Whether a move may be chosen at all this turn
    pub fn can_move(&self) -> bool {
        !self.force_switch && !self.team_preview
    }

    pub fn can_switch(&self) -> bool {
        !self.trapped || self.force_switch
    }

    /// Every legal action: usable moves (or Struggle), then eligible switches
    pub fn legal_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.can_move() {
            let usable: Vec<usize> = self.usable_moves().map(|m| m.index).collect();
            if usable.is_empty() {
                actions.push(Action::Move {
                    index: 1,
                    tera: false,
                });
            }
            for index in usable {
                actions.push(Action::Move { index, tera: false });
            }
        }
        if self.can_switch() && !self.team_preview {
            actions.extend(self.eligible_switches().map(|s| Action::Switch { index: s.index }));
        }
        actions
    }

    /// Check an action against this set
    ///
    /// Move 1 is accepted when no move is usable, since the engine turns it
    /// into Struggle.
    pub fn validate(&self, action: &Action) -> Result<(), ActionError> {
        if self.team_preview {
            return Err(ActionError::NoPendingRequest);
        }
        match *action {
            Action::Move { index, tera } => {
                if self.force_switch {
                    return Err(ActionError::MustSwitch);
                }
                if tera && !self.can_tera {
                    return Err(ActionError::TeraUnavailable);
                }
                let struggling = self.usable_moves().next().is_none();
                if struggling && index == 1 {
                    return Ok(());
                }
                let slot = self
                    .moves
                    .iter()
                    .find(|m| m.index == index)
                    .ok_or(ActionError::MoveOutOfRange(index))?;
                if !slot.is_usable() {
                    return Err(ActionError::MoveDisabled(index));
                }
                Ok(())
            }
            Action::Switch { index } => {
                if !self.can_switch() {
                    return Err(ActionError::Trapped);
                }
                let target = self
                    .switches
                    .iter()
                    .find(|s| s.index == index)
                    .ok_or(ActionError::SwitchOutOfRange(index))?;
                if target.fainted {
                    return Err(ActionError::SwitchFainted(index));
                }
                if target.active {
                    return Err(ActionError::SwitchActive(index));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> BattleRequest {
        BattleRequest::parse(&value).unwrap()
    }

    fn move_request() -> BattleRequest {
        request(json!({
            "active": [{
                "moves": [
                    {"move": "Earthquake", "id": "earthquake", "pp": 16, "maxpp": 16, "target": "allAdjacent", "disabled": false},
                    {"move": "Outrage", "id": "outrage", "pp": 0, "maxpp": 16, "target": "randomNormal", "disabled": false},
                    {"move": "Swords Dance", "id": "swordsdance", "pp": 32, "maxpp": 32, "target": "self", "disabled": true}
                ],
                "canTerastallize": "Steel"
            }],
            "side": {"name": "Alice", "id": "p1", "pokemon": [
                {"ident": "p1: Garchomp", "details": "Garchomp, M", "condition": "300/357", "active": true, "moves": []},
                {"ident": "p1: Toxapex", "details": "Toxapex", "condition": "0 fnt", "active": false, "moves": []},
                {"ident": "p1: Corviknight", "details": "Corviknight", "condition": "200/399", "active": false, "moves": []}
            ]},
            "rqid": 3
        }))
    }

    #[test]
    fn test_from_request() {
        let set = BattleActionSet::from_request(&move_request()).unwrap();
        assert_eq!(set.player, Player::P1);
        assert_eq!(set.moves.len(), 3);
        assert_eq!(set.moves[0].move_type, Some(Type::Ground));
        assert!(set.moves[1].disabled);
        assert!(set.can_tera);
        assert!(!set.force_switch);
        assert_eq!(set.switches[2].max_hp, 399);
        assert!(set.switches[1].fainted);
    }

    #[test]
    fn test_wait_request_has_no_actions() {
        let wait = request(json!({"wait": true, "side": {"name": "A", "id": "p2", "pokemon": []}}));
        assert!(BattleActionSet::from_request(&wait).is_none());
    }

    #[test]
    fn test_validate() {
        let set = BattleActionSet::from_request(&move_request()).unwrap();
        assert!(set.validate(&Action::Move { index: 1, tera: true }).is_ok());
        assert_eq!(
            set.validate(&Action::Move { index: 2, tera: false }),
            Err(ActionError::MoveDisabled(2))
        );
        assert_eq!(
            set.validate(&Action::Move { index: 5, tera: false }),
            Err(ActionError::MoveOutOfRange(5))
        );
        assert_eq!(
            set.validate(&Action::Switch { index: 1 }),
            Err(ActionError::SwitchActive(1))
        );
        assert_eq!(
            set.validate(&Action::Switch { index: 2 }),
            Err(ActionError::SwitchFainted(2))
        );
        assert!(set.validate(&Action::Switch { index: 3 }).is_ok());
        assert_eq!(
            set.validate(&Action::Switch { index: 9 }),
            Err(ActionError::SwitchOutOfRange(9))
        );
    }

    #[test]
    fn test_forced_switch() {
        let req = request(json!({
            "forceSwitch": [true],
            "side": {"name": "Bob", "id": "p2", "pokemon": [
                {"ident": "p2: Dragapult", "details": "Dragapult", "condition": "0 fnt", "active": true},
                {"ident": "p2: Kingambit", "details": "Kingambit", "condition": "100/100", "active": false}
            ]}
        }));
        let set = BattleActionSet::from_request(&req).unwrap();
        assert!(set.force_switch);
        assert!(set.moves.is_empty());
        assert_eq!(
            set.validate(&Action::Move { index: 1, tera: false }),
            Err(ActionError::MustSwitch)
        );
        assert_eq!(set.legal_actions(), vec![Action::Switch { index: 2 }]);
    }

    #[test]
    fn test_struggle_accepts_move_one() {
        let req = request(json!({
            "active": [{"moves": [{"move": "Tackle", "id": "tackle", "pp": 0, "maxpp": 56, "target": "normal"}]}],
            "side": {"name": "A", "id": "p1", "pokemon": [
                {"ident": "p1: Snorlax", "details": "Snorlax", "condition": "100/100", "active": true}
            ]}
        }));
        let set = BattleActionSet::from_request(&req).unwrap();
        assert!(set.validate(&Action::Move { index: 1, tera: false }).is_ok());
        assert_eq!(set.legal_actions(), vec![Action::Move { index: 1, tera: false }]);
    }

    #[test]
    fn test_trapped_blocks_switching() {
        let mut set = BattleActionSet::from_request(&move_request()).unwrap();
        set.trapped = true;
        assert_eq!(set.validate(&Action::Switch { index: 3 }), Err(ActionError::Trapped));
        assert!(set.legal_actions().iter().all(|a| matches!(a, Action::Move { .. })));
    }

    #[test]
    fn test_action_to_choice() {
        let action = Action::Move { index: 2, tera: true };
        assert_eq!(action.to_string(), "move 2 terastallize");
        assert_eq!(Action::Switch { index: 3 }.to_choice(), Choice::Switch { index: 3 });
    }
}
