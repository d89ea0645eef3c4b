//! Shared value types that appear inside battle protocol lines

use crate::ParseError;
use serde::{Deserialize, Serialize};

/// One of the two sides of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::P1, Player::P2];

    /// Parse "p1"/"p2", also accepting position-suffixed forms like "p1a" or "p2: Name"
    pub fn parse(s: &str) -> Option<Self> {
        if s.starts_with("p1") {
            Some(Player::P1)
        } else if s.starts_with("p2") {
            Some(Player::P2)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
        }
    }

    pub fn opponent(&self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Array index for per-side storage
    pub fn index(&self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pokemon identifier in the form "POSITION: NAME" (e.g., "p1a: Garchomp")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonIdent {
    pub player: Player,
    /// Active slot letter (a, b, c), absent for bench references like "p1: Name"
    pub position: Option<char>,
    pub name: String,
}

impl PokemonIdent {
    pub fn parse(s: &str) -> Option<Self> {
        let (pos_part, name) = s.split_once(": ")?;
        let player = Player::parse(pos_part)?;
        let position = pos_part.chars().nth(2).filter(|c| c.is_ascii_lowercase());

        Some(PokemonIdent {
            player,
            position,
            name: name.to_string(),
        })
    }

    /// Active slot index (0 for "a", 1 for "b", ...)
    pub fn slot(&self) -> usize {
        match self.position {
            Some(c) if c.is_ascii_lowercase() => (c as u8 - b'a') as usize,
            _ => 0,
        }
    }
}

impl std::fmt::Display for PokemonIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{}{}: {}", self.player, pos, self.name),
            None => write!(f, "{}: {}", self.player, self.name),
        }
    }
}

/// Details string: "Garchomp, L50, M, shiny, tera:Ground"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PokemonDetails {
    pub species: String,
    pub level: Option<u8>,
    pub gender: Option<char>,
    pub shiny: bool,
    pub tera_type: Option<String>,
}

impl PokemonDetails {
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split(", ");
        let mut details = PokemonDetails {
            species: parts.next().unwrap_or_default().to_string(),
            ..Default::default()
        };

        for part in parts {
            match part {
                "M" | "F" => details.gender = part.chars().next(),
                "shiny" => details.shiny = true,
                _ => {
                    if let Some(level) = part.strip_prefix('L') {
                        details.level = level.parse().ok();
                    } else if let Some(tera) = part.strip_prefix("tera:") {
                        details.tera_type = Some(tera.to_string());
                    }
                }
            }
        }

        details
    }
}

impl std::fmt::Display for PokemonDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.species)?;
        if let Some(level) = self.level.filter(|l| *l != 100) {
            write!(f, ", L{}", level)?;
        }
        if let Some(gender) = self.gender {
            write!(f, ", {}", gender)?;
        }
        if self.shiny {
            f.write_str(", shiny")?;
        }
        if let Some(tera) = &self.tera_type {
            write!(f, ", tera:{}", tera)?;
        }
        Ok(())
    }
}

/// HP and status condition ("100/100", "50/100 slp", "0 fnt")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HpStatus {
    pub current: u32,
    /// Absent for the "0 fnt" form
    pub max: Option<u32>,
    /// slp, par, brn, psn, tox, frz, fnt
    pub status: Option<String>,
}

impl HpStatus {
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let hp_part = parts.next()?;
        let status = parts.next().map(str::to_string);

        let (current, max) = match hp_part.split_once('/') {
            Some((cur, max)) => (cur.parse().ok()?, Some(max.parse().ok()?)),
            None => (hp_part.parse().ok()?, None),
        };

        Some(HpStatus {
            current,
            max,
            status,
        })
    }

    pub fn is_fainted(&self) -> bool {
        self.status.as_deref() == Some("fnt") || self.current == 0
    }
}

impl std::fmt::Display for HpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) if self.current > 0 => write!(f, "{}/{}", self.current, max)?,
            _ if self.current == 0 => return f.write_str("0 fnt"),
            _ => write!(f, "{}", self.current)?,
        }
        if let Some(status) = &self.status {
            write!(f, " {}", status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    #[default]
    Singles,
    Doubles,
    Triples,
}

impl GameType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "singles" => Some(GameType::Singles),
            "doubles" => Some(GameType::Doubles),
            "triples" => Some(GameType::Triples),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Singles => "singles",
            GameType::Doubles => "doubles",
            GameType::Triples => "triples",
        }
    }

    /// Active slots per side
    pub fn active_slots(&self) -> usize {
        match self {
            GameType::Singles => 1,
            GameType::Doubles => 2,
            GameType::Triples => 3,
        }
    }
}

/// Boostable stat abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Atk),
            "def" => Some(Stat::Def),
            "spa" => Some(Stat::Spa),
            "spd" => Some(Stat::Spd),
            "spe" => Some(Stat::Spe),
            "accuracy" => Some(Stat::Accuracy),
            "evasion" => Some(Stat::Evasion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Atk => "Attack",
            Stat::Def => "Defense",
            Stat::Spa => "Sp. Atk",
            Stat::Spd => "Sp. Def",
            Stat::Spe => "Speed",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasiveness",
        }
    }
}

/// Side reference in side-condition messages ("p1: Alice")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideRef {
    pub player: Player,
    pub raw: String,
}

impl SideRef {
    pub fn parse(s: &str) -> Option<Self> {
        Some(SideRef {
            player: Player::parse(s)?,
            raw: s.to_string(),
        })
    }
}

pub(crate) fn pokemon_at(parts: &[&str], index: usize) -> anyhow::Result<PokemonIdent> {
    parts
        .get(index)
        .and_then(|s| PokemonIdent::parse(s))
        .ok_or_else(|| ParseError::MissingField("pokemon".to_string()).into())
}

pub(crate) fn player_at(parts: &[&str], index: usize) -> anyhow::Result<Player> {
    parts
        .get(index)
        .and_then(|s| Player::parse(s))
        .ok_or_else(|| ParseError::MissingField("player".to_string()).into())
}

pub(crate) fn text_at(parts: &[&str], index: usize) -> String {
    parts.get(index).copied().unwrap_or_default().to_string()
}

pub(crate) fn details_at(parts: &[&str], index: usize) -> PokemonDetails {
    parts
        .get(index)
        .map(|s| PokemonDetails::parse(s))
        .unwrap_or_default()
}

pub(crate) fn hp_status_at(parts: &[&str], index: usize) -> Option<HpStatus> {
    parts.get(index).and_then(|s| HpStatus::parse(s))
}

/// Value of a trailing "[from] EFFECT" tag, if any
pub(crate) fn from_tag(parts: &[&str]) -> Option<String> {
    parts
        .iter()
        .find_map(|p| p.strip_prefix("[from] ").map(str::to_string))
}
