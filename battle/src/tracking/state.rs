//! BattleState - omniscient view of one battle

use arena_protocol::{GameType, Player, to_id};
use serde::{Deserialize, Serialize};

use crate::types::{FieldState, PokemonState, SideState};

/// Lifecycle of a battle; only ever moves forward
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Setup,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    P1,
    P2,
    Draw,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::P1 => "p1",
            Winner::P2 => "p2",
            Winner::Draw => "draw",
        }
    }

    pub fn player(&self) -> Option<Player> {
        match self {
            Winner::P1 => Some(Player::P1),
            Winner::P2 => Some(Player::P2),
            Winner::Draw => None,
        }
    }
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::P1 => Winner::P1,
            Player::P2 => Winner::P2,
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about a battle, rebuilt from protocol lines
#[derive(Debug, Clone, PartialEq)]
pub struct BattleState {
    pub phase: Phase,
    pub game_type: GameType,
    pub generation: u8,
    pub tier: String,
    /// Current turn (0 before the first `|turn|`)
    pub turn: u32,
    pub field: FieldState,
    /// Indexed by [`Player::index`]
    pub sides: [SideState; 2],
    /// Sides that must replace a fainted active pokemon
    pub forced_switch: [bool; 2],
    /// Lead selection is pending
    pub team_preview: bool,
    pub winner: Option<Winner>,
    /// Raw name from `|win|`
    pub winner_name: Option<String>,
}

impl BattleState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            game_type: GameType::Singles,
            generation: 9,
            tier: String::new(),
            turn: 0,
            field: FieldState::new(),
            sides: [SideState::new(Player::P1), SideState::new(Player::P2)],
            forced_switch: [false; 2],
            team_preview: false,
            winner: None,
            winner_name: None,
        }
    }

    /// Move to `next` if it is later than the current phase
    pub fn advance_phase(&mut self, next: Phase) -> bool {
        if next > self.phase {
            self.phase = next;
            true
        } else {
            false
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn side(&self, player: Player) -> &SideState {
        &self.sides[player.index()]
    }

    pub fn side_mut(&mut self, player: Player) -> &mut SideState {
        &mut self.sides[player.index()]
    }

    pub fn active(&self, player: Player) -> Option<&PokemonState> {
        self.side(player).active_pokemon()
    }

    pub fn set_game_type(&mut self, game_type: GameType) {
        self.game_type = game_type;
        for side in self.sides.iter_mut() {
            side.set_active_slots(game_type.active_slots());
        }
    }

    /// Record a `|win|` line
    ///
    /// The name is matched against side usernames; if no side or both sides
    /// match, a side whose whole team has fainted is taken to be the loser.
    pub fn record_win(&mut self, name: &str) {
        let id = to_id(name);
        let matches = Player::BOTH.map(|p| {
            let username = &self.side(p).username;
            !username.is_empty() && to_id(username) == id
        });
        let by_name = match matches {
            [true, false] => Some(Player::P1),
            [false, true] => Some(Player::P2),
            _ => None,
        };

        let by_faints = || match (self.sides[0].all_fainted(), self.sides[1].all_fainted()) {
            (true, false) => Some(Player::P2),
            (false, true) => Some(Player::P1),
            _ => None,
        };

        self.winner = by_name.or_else(by_faints).map(Winner::from);
        self.winner_name = Some(name.to_string());
        self.finish();
    }

    pub fn record_tie(&mut self) {
        self.winner = Some(Winner::Draw);
        self.finish();
    }

    fn finish(&mut self) {
        self.advance_phase(Phase::Ended);
        self.forced_switch = [false; 2];
        self.team_preview = false;
    }
}

impl Default for BattleState {
    fn default() -> Self {
        Self::new()
    }
}
