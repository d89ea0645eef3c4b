//! One team member as supplied by the caller

use arena_battle::{StatTable, dex};
use serde::{Deserialize, Serialize};

use crate::error::TeamError;

pub const MAX_LEVEL: u8 = 100;
pub const MAX_EV: u16 = 252;
pub const MAX_EV_TOTAL: u32 = 510;
pub const MAX_IV: u16 = 31;

fn default_level() -> u8 {
    MAX_LEVEL
}

fn default_ivs() -> StatTable {
    StatTable::uniform(MAX_IV)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSlotData {
    /// Species name or id ("Great Tusk", "greattusk")
    pub species: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub ability: String,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub nature: String,
    #[serde(default)]
    pub tera_type: Option<String>,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub moves: [Option<String>; 4],
    #[serde(default)]
    pub evs: StatTable,
    #[serde(default = "default_ivs")]
    pub ivs: StatTable,
    /// 'M' or 'F'
    #[serde(default)]
    pub gender: Option<char>,
    #[serde(default)]
    pub shiny: bool,
}

impl TeamSlotData {
    /// Level 100 member with no moves and default spreads
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            nickname: None,
            ability: String::new(),
            item: String::new(),
            nature: String::new(),
            tera_type: None,
            level: MAX_LEVEL,
            moves: Default::default(),
            evs: StatTable::default(),
            ivs: default_ivs(),
            gender: None,
            shiny: false,
        }
    }

    /// Fill move slots in order; extra moves beyond four are ignored
    pub fn with_moves<S: AsRef<str>>(mut self, moves: &[S]) -> Self {
        for (slot, name) in self.moves.iter_mut().zip(moves) {
            *slot = Some(name.as_ref().to_string());
        }
        self
    }

    /// Species as a display name
    pub fn species_name(&self) -> String {
        display_species(&self.species)
    }

    /// Nickname if set, otherwise the species display name
    pub fn display_name(&self) -> String {
        match self.nickname.as_deref().map(str::trim) {
            Some(nick) if !nick.is_empty() => nick.to_string(),
            _ => self.species_name(),
        }
    }

    /// Non-empty move names in slot order
    pub fn move_names(&self) -> impl Iterator<Item = &str> {
        self.moves
            .iter()
            .flatten()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
    }

    pub fn validate(&self) -> Result<(), TeamError> {
        let name = self.display_name();
        if self.species.trim().is_empty() {
            return Err(TeamError::Validation("species is required".to_string()));
        }
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return Err(TeamError::Validation(format!(
                "{name}: level {} is outside 1-{MAX_LEVEL}",
                self.level
            )));
        }
        if let Some(ev) = self.evs.to_array().into_iter().find(|ev| *ev > MAX_EV) {
            return Err(TeamError::Validation(format!(
                "{name}: EV {ev} exceeds {MAX_EV}"
            )));
        }
        if self.evs.total() > MAX_EV_TOTAL {
            return Err(TeamError::Validation(format!(
                "{name}: EV total {} exceeds {MAX_EV_TOTAL}",
                self.evs.total()
            )));
        }
        if let Some(iv) = self.ivs.to_array().into_iter().find(|iv| *iv > MAX_IV) {
            return Err(TeamError::Validation(format!(
                "{name}: IV {iv} exceeds {MAX_IV}"
            )));
        }
        if let Some(gender) = self.gender
            && !matches!(gender, 'M' | 'F')
        {
            return Err(TeamError::Validation(format!(
                "{name}: unknown gender {gender:?}"
            )));
        }
        Ok(())
    }
}

/// Display name for a species id
///
/// Known species use the dex name. Anything else is treated as camelCase and
/// split into Title Case words ("fakeMonster" becomes "Fake Monster").
pub fn display_species(species: &str) -> String {
    let species = species.trim();
    if let Some(data) = dex::species(species) {
        return data.name.to_string();
    }

    let mut out = String::with_capacity(species.len() + 4);
    let mut prev: Option<char> = None;
    for c in species.chars() {
        match prev {
            None => out.extend(c.to_uppercase()),
            Some(p) if c.is_uppercase() && p.is_lowercase() => {
                out.push(' ');
                out.push(c);
            }
            Some(' ') | Some('-') => out.extend(c.to_uppercase()),
            Some(_) => out.push(c),
        }
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_species() {
        assert_eq!(display_species("greattusk"), "Great Tusk");
        assert_eq!(display_species("Garchomp"), "Garchomp");
        assert_eq!(display_species("fakeMonster"), "Fake Monster");
        assert_eq!(display_species("someOtherFakeMon"), "Some Other Fake Mon");
        assert_eq!(display_species("missingno"), "Missingno");
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let mut slot = TeamSlotData::new("garchomp");
        assert_eq!(slot.display_name(), "Garchomp");
        slot.nickname = Some("Chompy".into());
        assert_eq!(slot.display_name(), "Chompy");
        slot.nickname = Some("  ".into());
        assert_eq!(slot.display_name(), "Garchomp");
    }

    #[test]
    fn test_validate_ranges() {
        let ok = TeamSlotData::new("Pikachu");
        assert!(ok.validate().is_ok());

        let mut low = ok.clone();
        low.level = 0;
        assert!(matches!(low.validate(), Err(TeamError::Validation(_))));

        let mut evs = ok.clone();
        evs.evs = StatTable::from_array([252, 252, 252, 0, 0, 0]);
        assert!(evs.validate().is_err());

        let mut one_ev = ok.clone();
        one_ev.evs.atk = 300;
        assert!(one_ev.validate().is_err());

        let mut ivs = ok.clone();
        ivs.ivs.spe = 32;
        assert!(ivs.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let slot: TeamSlotData =
            serde_json::from_str(r#"{"species": "Garchomp", "moves": ["Earthquake", null, null, null]}"#)
                .unwrap();
        assert_eq!(slot.level, 100);
        assert!(slot.ivs.is_uniform(31));
        assert!(slot.evs.is_uniform(0));
        assert_eq!(slot.move_names().collect::<Vec<_>>(), vec!["Earthquake"]);
    }
}
