//! One player's side of the field

use std::collections::HashMap;

use arena_protocol::{Player, PokemonDetails, RequestSide, to_id};

use super::conditions::SideCondition;
use super::pokemon::PokemonState;
use super::pokemon_type::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct SideState {
    pub player: Player,
    pub username: String,
    /// Team in party order as first revealed
    pub pokemon: Vec<PokemonState>,
    /// Party index per active slot
    pub active_indices: Vec<Option<usize>>,
    /// Active conditions and their layer count
    pub conditions: HashMap<SideCondition, u8>,
    /// Announced team size, if any
    pub team_size: Option<u8>,
}

impl SideState {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            username: String::new(),
            pokemon: Vec::new(),
            active_indices: vec![None],
            conditions: HashMap::new(),
            team_size: None,
        }
    }

    pub fn set_active_slots(&mut self, count: usize) {
        self.active_indices.resize(count.max(1), None);
    }

    pub fn active(&self, slot: usize) -> Option<&PokemonState> {
        let index = (*self.active_indices.get(slot)?)?;
        self.pokemon.get(index)
    }

    pub fn active_mut(&mut self, slot: usize) -> Option<&mut PokemonState> {
        let index = (*self.active_indices.get(slot)?)?;
        self.pokemon.get_mut(index)
    }

    /// First active pokemon (the only one in singles)
    pub fn active_pokemon(&self) -> Option<&PokemonState> {
        self.active(0)
    }

    /// Non-fainted, non-active team members with their party index
    pub fn bench(&self) -> impl Iterator<Item = (usize, &PokemonState)> {
        self.pokemon
            .iter()
            .enumerate()
            .filter(|(_, p)| p.can_switch_to())
    }

    pub fn alive_count(&self) -> usize {
        self.pokemon.iter().filter(|p| p.is_alive()).count()
    }

    /// Every known member has fainted and none are still unrevealed
    pub fn all_fainted(&self) -> bool {
        let revealed_all = self
            .team_size
            .is_none_or(|size| self.pokemon.len() >= usize::from(size));
        revealed_all && !self.pokemon.is_empty() && self.pokemon.iter().all(|p| p.fainted)
    }

    pub fn find_pokemon(&self, name: &str) -> Option<usize> {
        self.pokemon
            .iter()
            .position(|p| p.name == name)
            .or_else(|| {
                let id = to_id(name);
                self.pokemon.iter().position(|p| to_id(&p.species) == id)
            })
    }

    pub fn find_pokemon_mut(&mut self, name: &str) -> Option<&mut PokemonState> {
        let index = self.find_pokemon(name)?;
        self.pokemon.get_mut(index)
    }

    /// Index of the named pokemon, adding it to the roster if new
    pub fn find_or_insert(&mut self, name: &str, details: &PokemonDetails) -> usize {
        match self.find_pokemon(name) {
            Some(index) => index,
            None => {
                self.pokemon.push(PokemonState::from_details(name, details));
                self.pokemon.len() - 1
            }
        }
    }

    /// Put a party member into an active slot, switching out the previous occupant
    pub fn set_active(&mut self, slot: usize, index: usize) {
        if slot >= self.active_indices.len() {
            self.set_active_slots(slot + 1);
        }
        if let Some(previous) = self.active_indices[slot].take()
            && let Some(old) = self.pokemon.get_mut(previous)
        {
            old.switch_out();
        }
        if let Some(new) = self.pokemon.get_mut(index) {
            new.switch_in();
            self.active_indices[slot] = Some(index);
        }
    }

    pub fn layers(&self, cond: SideCondition) -> u8 {
        self.conditions.get(&cond).copied().unwrap_or(0)
    }

    pub fn has_condition(&self, cond: SideCondition) -> bool {
        self.layers(cond) > 0
    }

    /// Add a layer; false once the condition is at its maximum
    pub fn add_condition(&mut self, cond: SideCondition) -> bool {
        let layers = self.conditions.entry(cond).or_insert(0);
        if *layers >= cond.max_layers() {
            return false;
        }
        *layers += 1;
        true
    }

    pub fn remove_condition(&mut self, cond: SideCondition) -> bool {
        self.conditions.remove(&cond).is_some()
    }

    pub fn hazards(&self) -> impl Iterator<Item = (SideCondition, u8)> + '_ {
        self.conditions
            .iter()
            .filter(|(c, _)| c.is_hazard())
            .map(|(c, layers)| (*c, *layers))
    }

    pub fn has_screen(&self) -> bool {
        self.conditions.keys().any(|c| c.is_screen())
    }

    /// Reconcile the roster with the authoritative view in a request
    pub fn sync_from_request(&mut self, side: &RequestSide) {
        if !side.name.is_empty() {
            self.username = side.name.clone();
        }
        self.team_size = Some(side.pokemon.len() as u8);

        for (slot, entry) in side.pokemon.iter().enumerate() {
            let details = PokemonDetails::parse(&entry.details);
            let index = self.find_or_insert(entry.name(), &details);
            let poke = &mut self.pokemon[index];

            poke.set_species(&details.species);
            if let Some(hp) = entry.hp_status() {
                poke.apply_hp_status(&hp);
                if hp.status.is_none() && hp.current > 0 {
                    poke.status = None;
                }
            }
            poke.moves = entry.moves.iter().map(|m| to_id(m)).collect();
            if !entry.ability.is_empty() {
                poke.ability = Some(entry.ability.clone());
            }
            poke.item = (!entry.item.is_empty()).then(|| entry.item.clone());
            if let Some(tera) = entry.teratype.as_deref() {
                poke.tera_type = Type::parse(tera).or(poke.tera_type);
            }
            if let Some(tera) = entry.terastallized.as_deref().filter(|t| !t.is_empty()) {
                poke.terastallize(tera);
            }

            // Keep roster order aligned with the engine's party order
            if index != slot && slot < self.pokemon.len() {
                self.pokemon.swap(index, slot);
                for active in self.active_indices.iter_mut().flatten() {
                    if *active == index {
                        *active = slot;
                    } else if *active == slot {
                        *active = index;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> SideState {
        let mut side = SideState::new(Player::P1);
        side.pokemon.push(PokemonState::new("Pikachu", "Pikachu", 50));
        side.pokemon.push(PokemonState::new("Zard", "Charizard", 50));
        let mut fainted = PokemonState::new("Blastoise", "Blastoise", 50);
        fainted.faint();
        side.pokemon.push(fainted);
        side
    }

    #[test]
    fn test_find_by_name_then_species() {
        let side = roster();
        assert_eq!(side.find_pokemon("Zard"), Some(1));
        assert_eq!(side.find_pokemon("Charizard"), Some(1));
        assert_eq!(side.find_pokemon("Mew"), None);
    }

    #[test]
    fn test_set_active_switches_out_previous() {
        let mut side = roster();
        side.set_active(0, 0);
        side.pokemon[0].boosts.atk = 1;
        side.set_active(0, 1);

        assert!(!side.pokemon[0].active);
        assert!(side.pokemon[0].boosts.is_clear());
        assert_eq!(side.active_pokemon().unwrap().name, "Zard");

        let bench: Vec<usize> = side.bench().map(|(i, _)| i).collect();
        assert_eq!(bench, vec![0]);
    }

    #[test]
    fn test_condition_layers() {
        let mut side = SideState::new(Player::P2);
        assert!(side.add_condition(SideCondition::StealthRock));
        assert!(!side.add_condition(SideCondition::StealthRock));
        for _ in 0..3 {
            assert!(side.add_condition(SideCondition::Spikes));
        }
        assert!(!side.add_condition(SideCondition::Spikes));
        assert_eq!(side.layers(SideCondition::Spikes), 3);
        assert_eq!(side.hazards().count(), 2);
        assert!(!side.has_screen());

        assert!(side.remove_condition(SideCondition::Spikes));
        assert!(!side.has_condition(SideCondition::Spikes));
    }

    #[test]
    fn test_all_fainted_waits_for_unrevealed_members() {
        let mut side = roster();
        for p in side.pokemon.iter_mut() {
            p.faint();
        }
        side.team_size = Some(6);
        assert!(!side.all_fainted());
        side.team_size = Some(3);
        assert!(side.all_fainted());
    }

    #[test]
    fn test_sync_from_request_orders_party() {
        let json = serde_json::json!({
            "name": "Alice",
            "id": "p1",
            "pokemon": [
                {"ident": "p1: Zard", "details": "Charizard, L50", "condition": "120/153", "active": true,
                 "moves": ["flamethrower", "airslash"], "ability": "blaze", "item": "heavydutyboots"},
                {"ident": "p1: Pikachu", "details": "Pikachu, L50", "condition": "95/95 par", "active": false,
                 "moves": ["thunderbolt"], "ability": "static", "item": ""}
            ]
        });
        let request_side: RequestSide = serde_json::from_value(json).unwrap();

        let mut side = SideState::new(Player::P1);
        side.pokemon.push(PokemonState::new("Pikachu", "Pikachu", 50));
        side.pokemon.push(PokemonState::new("Zard", "Charizard", 50));
        side.set_active(0, 1);

        side.sync_from_request(&request_side);

        assert_eq!(side.username, "Alice");
        assert_eq!(side.pokemon[0].name, "Zard");
        assert_eq!(side.pokemon[0].hp_current, 120);
        assert_eq!(side.pokemon[0].moves, vec!["flamethrower", "airslash"]);
        assert_eq!(side.pokemon[0].item.as_deref(), Some("heavydutyboots"));
        assert_eq!(side.pokemon[1].item, None);
        assert_eq!(side.active_pokemon().unwrap().name, "Zard");
        assert_eq!(side.team_size, Some(2));
    }
}
