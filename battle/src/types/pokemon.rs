//! Per-pokemon battle state

use std::collections::HashSet;

use arena_protocol::{HpStatus, PokemonDetails, to_id};

use super::pokemon_type::Type;
use super::stats::StatStages;
use super::status::{Status, Volatile};
use crate::dex;

/// One team member as seen from the protocol
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonState {
    /// Name used in protocol idents (nickname, or species when none)
    pub name: String,
    /// Species including forme ("Landorus-Therian")
    pub species: String,
    pub level: u8,
    pub gender: Option<char>,
    pub shiny: bool,

    pub hp_current: u32,
    /// Denominator of the last HP report; 100 when only percentages are known
    pub hp_max: u32,
    pub status: Option<Status>,
    pub fainted: bool,
    pub active: bool,

    // Cleared on switch-out
    pub boosts: StatStages,
    pub volatiles: HashSet<Volatile>,

    pub base_types: Vec<Type>,
    pub tera_type: Option<Type>,
    pub terastallized: bool,

    /// Move ids, revealed or from requests
    pub moves: Vec<String>,
    pub ability: Option<String>,
    pub item: Option<String>,
    pub item_consumed: bool,
    pub transformed: Option<String>,
}

impl PokemonState {
    pub fn new(name: impl Into<String>, species: impl Into<String>, level: u8) -> Self {
        let species = species.into();
        let base_types = dex::species(&species)
            .map(|s| s.types.to_vec())
            .unwrap_or_default();

        Self {
            name: name.into(),
            species,
            level,
            gender: None,
            shiny: false,
            hp_current: 100,
            hp_max: 100,
            status: None,
            fainted: false,
            active: false,
            boosts: StatStages::new(),
            volatiles: HashSet::new(),
            base_types,
            tera_type: None,
            terastallized: false,
            moves: Vec::new(),
            ability: None,
            item: None,
            item_consumed: false,
            transformed: None,
        }
    }

    /// Build from an ident name and a details string
    pub fn from_details(name: &str, details: &PokemonDetails) -> Self {
        let mut state = Self::new(name, details.species.clone(), details.level.unwrap_or(100));
        state.gender = details.gender;
        state.shiny = details.shiny;
        state.tera_type = details.tera_type.as_deref().and_then(Type::parse);
        state
    }

    /// Update species-derived fields after a forme change
    pub fn set_species(&mut self, species: &str) {
        if to_id(species) == to_id(&self.species) {
            return;
        }
        self.species = species.to_string();
        if let Some(data) = dex::species(species) {
            self.base_types = data.types.to_vec();
        }
    }

    /// Remaining HP as a fraction of max, 0.0..=1.0
    pub fn hp_fraction(&self) -> f32 {
        if self.fainted || self.hp_max == 0 {
            return 0.0;
        }
        (self.hp_current as f32 / self.hp_max as f32).clamp(0.0, 1.0)
    }

    pub fn hp_percent(&self) -> u32 {
        (self.hp_fraction() * 100.0).round() as u32
    }

    /// Defensive types, accounting for terastallization
    pub fn types(&self) -> Vec<Type> {
        match (self.terastallized, self.tera_type) {
            (true, Some(tera)) => vec![tera],
            _ => self.base_types.clone(),
        }
    }

    /// Types that earn STAB: the original types plus an active tera type
    pub fn stab_types(&self) -> Vec<Type> {
        let mut types = self.base_types.clone();
        if let (true, Some(tera)) = (self.terastallized, self.tera_type)
            && !types.contains(&tera)
        {
            types.push(tera);
        }
        types
    }

    pub fn apply_hp_status(&mut self, hp: &HpStatus) {
        self.hp_current = hp.current;
        if let Some(max) = hp.max {
            self.hp_max = max;
        }

        match hp.status.as_deref() {
            Some("fnt") => self.faint(),
            Some(code) => self.status = Status::from_protocol(code),
            None if hp.current == 0 => self.faint(),
            None => {}
        }
    }

    pub fn faint(&mut self) {
        self.fainted = true;
        self.hp_current = 0;
        self.status = None;
    }

    pub fn record_move(&mut self, move_name: &str) {
        let id = to_id(move_name);
        if !id.is_empty() && !self.moves.contains(&id) {
            self.moves.push(id);
        }
    }

    pub fn terastallize(&mut self, tera_type: &str) {
        if let Some(t) = Type::parse(tera_type) {
            self.tera_type = Some(t);
        }
        self.terastallized = true;
    }

    pub fn switch_out(&mut self) {
        self.active = false;
        self.boosts.clear();
        self.volatiles.clear();
        self.transformed = None;
    }

    pub fn switch_in(&mut self) {
        self.active = true;
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted && self.hp_current > 0
    }

    pub fn can_switch_to(&self) -> bool {
        self.is_alive() && !self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_looks_up_types() {
        let chomp = PokemonState::new("Chompy", "Garchomp", 100);
        assert_eq!(chomp.base_types, vec![Type::Dragon, Type::Ground]);
        assert_eq!(chomp.name, "Chompy");

        let unknown = PokemonState::new("Fakemon", "Fakemon", 50);
        assert!(unknown.base_types.is_empty());
        assert!(unknown.types().is_empty());
    }

    #[test]
    fn test_from_details() {
        let details = PokemonDetails::parse("Gholdengo, L50, tera:Fairy");
        let state = PokemonState::from_details("Gholdengo", &details);
        assert_eq!(state.level, 50);
        assert_eq!(state.tera_type, Some(Type::Fairy));
        assert!(!state.terastallized);
    }

    #[test]
    fn test_hp_fraction() {
        let mut state = PokemonState::new("Blissey", "Blissey", 100);
        state.apply_hp_status(&HpStatus::parse("177/708").unwrap());
        assert_eq!(state.hp_percent(), 25);

        state.apply_hp_status(&HpStatus::parse("50/100 par").unwrap());
        assert_eq!(state.hp_percent(), 50);
        assert_eq!(state.status, Some(Status::Paralysis));

        state.apply_hp_status(&HpStatus::parse("0 fnt").unwrap());
        assert!(state.fainted);
        assert_eq!(state.hp_fraction(), 0.0);
        assert!(state.status.is_none());
    }

    #[test]
    fn test_tera_changes_types() {
        let mut state = PokemonState::new("Dragonite", "Dragonite", 100);
        state.terastallize("Normal");
        assert_eq!(state.types(), vec![Type::Normal]);
        assert_eq!(
            state.stab_types(),
            vec![Type::Dragon, Type::Flying, Type::Normal]
        );
    }

    #[test]
    fn test_switch_out_clears_volatile_state() {
        let mut state = PokemonState::new("Scizor", "Scizor", 100);
        state.switch_in();
        state.boosts.atk = 2;
        state.volatiles.insert(Volatile::Confusion);
        state.status = Some(Status::Burn);

        state.switch_out();
        assert!(!state.active);
        assert!(state.boosts.is_clear());
        assert!(state.volatiles.is_empty());
        assert_eq!(state.status, Some(Status::Burn));
        assert!(state.can_switch_to());
    }

    #[test]
    fn test_record_move_dedupes_ids() {
        let mut state = PokemonState::new("Garchomp", "Garchomp", 100);
        state.record_move("Earthquake");
        state.record_move("earthquake");
        state.record_move("Swords Dance");
        assert_eq!(state.moves, vec!["earthquake", "swordsdance"]);
    }

    #[test]
    fn test_forme_change_updates_types() {
        let mut state = PokemonState::new("Rotom", "Rotom", 100);
        state.set_species("Rotom-Wash");
        assert_eq!(state.base_types, vec![Type::Electric, Type::Water]);
    }
}
