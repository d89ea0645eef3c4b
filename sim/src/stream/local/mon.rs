//! Pokemon and sides as the local engine sees them

use std::collections::HashMap;

use arena_battle::dex::{self, MoveCategory, MoveData, MoveEffect};
use arena_battle::query::Combatant;
use arena_battle::{Player, SideCondition, Stat, StatStages, StatTable, Status, Type};
use arena_protocol::to_id;
use arena_team::TeamSlotData;
use serde_json::{Value, json};

/// Stand-in for moves missing from the dex
static UNKNOWN_MOVE: MoveData = MoveData {
    name: "Unknown Move",
    move_type: Type::Normal,
    category: MoveCategory::Physical,
    power: 60,
    accuracy: Some(100),
    pp: 16,
    priority: 0,
    hits: (1, 1),
    effect: MoveEffect::None,
};

pub(super) fn struggle() -> &'static MoveData {
    dex::move_data("struggle").unwrap_or(&UNKNOWN_MOVE)
}

pub(super) fn stat_id(stat: Stat) -> &'static str {
    match stat {
        Stat::Atk => "atk",
        Stat::Def => "def",
        Stat::Spa => "spa",
        Stat::Spd => "spd",
        Stat::Spe => "spe",
        Stat::Accuracy => "accuracy",
        Stat::Evasion => "evasion",
    }
}

#[derive(Debug, Clone)]
pub(super) struct MoveSlot {
    pub name: String,
    pub id: String,
    pub data: &'static MoveData,
    pub pp: u32,
    pub max_pp: u32,
}

impl MoveSlot {
    fn new(name: &str) -> Self {
        let data = dex::move_data(name).unwrap_or(&UNKNOWN_MOVE);
        let display = if std::ptr::eq(data, &UNKNOWN_MOVE) {
            name.to_string()
        } else {
            data.name.to_string()
        };
        // PP ups are assumed on every move
        let max_pp = u32::from(data.pp) * 8 / 5;
        Self {
            id: to_id(&display),
            name: display,
            data,
            pp: max_pp,
            max_pp,
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct Mon {
    pub name: String,
    pub species: String,
    pub level: u8,
    pub gender: Option<char>,
    pub shiny: bool,
    pub stats: StatTable,
    pub hp: u32,
    pub max_hp: u32,
    pub status: Option<Status>,
    pub boosts: StatStages,
    pub base_types: Vec<Type>,
    pub tera_type: Option<Type>,
    pub terastallized: bool,
    pub moves: Vec<MoveSlot>,
    pub ability: String,
    pub item: String,
    /// Protect succeeded last turn
    pub protected_last: bool,
}

impl Mon {
    pub fn from_slot(slot: &TeamSlotData) -> Self {
        let species = slot.species_name();
        let entry = dex::species(&species);
        let base = entry.map_or(dex::FALLBACK_BASE_STATS, |s| s.base_stats);
        let stats = dex::calc_stats(&base, slot.level, &slot.evs, &slot.ivs, &slot.nature);
        let base_types = entry.map_or_else(|| vec![Type::Normal], |s| s.types.to_vec());
        let mut moves: Vec<MoveSlot> = slot.move_names().map(MoveSlot::new).collect();
        if moves.is_empty() {
            moves.push(MoveSlot::new("struggle"));
        }

        Self {
            name: slot.display_name(),
            species,
            level: slot.level,
            gender: slot.gender,
            shiny: slot.shiny,
            hp: u32::from(stats.hp),
            max_hp: u32::from(stats.hp),
            stats,
            status: None,
            boosts: StatStages::new(),
            tera_type: slot.tera_type.as_deref().and_then(Type::parse),
            base_types,
            terastallized: false,
            moves,
            ability: to_id(&slot.ability),
            item: to_id(&slot.item),
            protected_last: false,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn types(&self) -> Vec<Type> {
        match (self.terastallized, self.tera_type) {
            (true, Some(tera)) => vec![tera],
            _ => self.base_types.clone(),
        }
    }

    pub fn stab_types(&self) -> Vec<Type> {
        let mut types = self.base_types.clone();
        if let (true, Some(tera)) = (self.terastallized, self.tera_type)
            && !types.contains(&tera)
        {
            types.push(tera);
        }
        types
    }

    pub fn combatant(&self) -> Combatant {
        Combatant {
            level: self.level,
            stats: self.stats,
            types: self.types(),
            stab_types: self.stab_types(),
            boosts: self.boosts.clone(),
            status: self.status,
        }
    }

    pub fn speed(&self) -> f32 {
        let paralysis = if self.status == Some(Status::Paralysis) { 0.5 } else { 1.0 };
        f32::from(self.stats.spe) * StatStages::multiplier(self.boosts.spe) * paralysis
    }

    pub fn details(&self) -> String {
        let mut details = self.species.clone();
        if self.level != 100 {
            details.push_str(&format!(", L{}", self.level));
        }
        if let Some(gender) = self.gender {
            details.push_str(&format!(", {gender}"));
        }
        if self.shiny {
            details.push_str(", shiny");
        }
        details
    }

    /// HP as the protocol prints it ("250/357 brn", "0 fnt")
    pub fn condition(&self) -> String {
        if self.is_fainted() {
            return "0 fnt".to_string();
        }
        match self.status {
            Some(status) => format!("{}/{} {}", self.hp, self.max_hp, status.to_protocol()),
            None => format!("{}/{}", self.hp, self.max_hp),
        }
    }

    pub fn usable_moves(&self) -> impl Iterator<Item = (usize, &MoveSlot)> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.pp > 0)
            .map(|(i, m)| (i + 1, m))
    }

    pub fn is_struggling(&self) -> bool {
        self.usable_moves().next().is_none()
    }

    /// Lose `amount` HP; returns what was actually lost
    pub fn damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Gain `amount` HP; returns what was actually gained
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp - self.hp);
        self.hp += gained;
        gained
    }

    /// Whether `status` can land on this pokemon
    pub fn can_take_status(&self, status: Status) -> bool {
        if self.is_fainted() || self.status.is_some() {
            return false;
        }
        let types = self.types();
        let immune = match status {
            Status::Burn => types.contains(&Type::Fire),
            Status::Paralysis => types.contains(&Type::Electric),
            Status::Freeze => types.contains(&Type::Ice),
            Status::Poison | Status::Toxic => {
                types.contains(&Type::Poison) || types.contains(&Type::Steel)
            }
            Status::Sleep => false,
        };
        !immune
    }

    /// Reset what does not survive switching out
    pub fn switch_out(&mut self) {
        self.boosts.clear();
        self.protected_last = false;
    }

    fn request_entry(&self, player: Player, active: bool) -> Value {
        json!({
            "ident": format!("{player}: {}", self.name),
            "details": self.details(),
            "condition": self.condition(),
            "active": active,
            "moves": self.moves.iter().map(|m| m.id.clone()).collect::<Vec<_>>(),
            "ability": self.ability,
            "item": self.item,
            "teratype": self.tera_type.map(|t| t.as_str()),
            "terastallized": self.tera_type.filter(|_| self.terastallized).map(|t| t.as_str()),
        })
    }
}

#[derive(Debug, Clone)]
pub(super) struct Side {
    pub player: Player,
    pub name: String,
    /// Request order; the active pokemon is always first once the battle starts
    pub team: Vec<Mon>,
    pub hazards: HashMap<SideCondition, u8>,
    /// Screens and other timed conditions with turns remaining
    pub timed: HashMap<SideCondition, u8>,
    pub tera_used: bool,
}

impl Side {
    pub fn new(player: Player, name: String, team: Vec<Mon>) -> Self {
        Self {
            player,
            name,
            team,
            hazards: HashMap::new(),
            timed: HashMap::new(),
            tera_used: false,
        }
    }

    pub fn ident(&self) -> String {
        format!("{}: {}", self.player, self.name)
    }

    pub fn active(&self) -> &Mon {
        &self.team[0]
    }

    pub fn active_mut(&mut self) -> &mut Mon {
        &mut self.team[0]
    }

    /// Position string of the active pokemon ("p1a: Garchomp")
    pub fn active_ident(&self) -> String {
        format!("{}a: {}", self.player, self.active().name)
    }

    pub fn all_fainted(&self) -> bool {
        self.team.iter().all(Mon::is_fainted)
    }

    pub fn has_replacement(&self) -> bool {
        self.team.iter().skip(1).any(|m| !m.is_fainted())
    }

    /// Whether the 1-based request slot may come in
    pub fn can_switch_to(&self, slot: usize) -> bool {
        slot >= 2 && self.team.get(slot - 1).is_some_and(|m| !m.is_fainted())
    }

    pub fn first_replacement(&self) -> Option<usize> {
        (2..=self.team.len()).find(|&slot| self.can_switch_to(slot))
    }

    pub fn can_tera(&self) -> bool {
        !self.tera_used && self.active().tera_type.is_some() && !self.active().terastallized
    }

    pub fn has_timed(&self, condition: SideCondition) -> bool {
        self.timed.contains_key(&condition)
    }

    /// `side` object of a request
    pub fn request_side(&self, started: bool) -> Value {
        json!({
            "name": self.name,
            "id": self.player.to_string(),
            "pokemon": self
                .team
                .iter()
                .enumerate()
                .map(|(i, m)| m.request_entry(self.player, started && i == 0))
                .collect::<Vec<_>>(),
        })
    }

    /// `active` entry of a move request
    pub fn request_active(&self) -> Value {
        let mon = self.active();
        let moves: Vec<Value> = if mon.is_struggling() {
            vec![json!({"move": "Struggle", "id": "struggle", "target": "randomNormal", "disabled": false})]
        } else {
            mon.moves
                .iter()
                .map(|m| {
                    json!({
                        "move": m.name,
                        "id": m.id,
                        "pp": m.pp,
                        "maxpp": m.max_pp,
                        "target": "normal",
                        "disabled": m.pp == 0,
                    })
                })
                .collect()
        };
        let mut active = json!({ "moves": moves });
        if self.can_tera()
            && let Some(tera) = mon.tera_type
        {
            active["canTerastallize"] = json!(tera.as_str());
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garchomp() -> Mon {
        let mut slot = TeamSlotData::new("Garchomp").with_moves(&["Earthquake", "Made Up Move"]);
        slot.level = 50;
        slot.gender = Some('M');
        slot.tera_type = Some("Steel".to_string());
        Mon::from_slot(&slot)
    }

    #[test]
    fn test_from_slot() {
        let mon = garchomp();
        assert_eq!(mon.details(), "Garchomp, L50, M");
        assert_eq!(mon.hp, mon.max_hp);
        assert_eq!(mon.base_types, vec![Type::Dragon, Type::Ground]);
        assert_eq!(mon.moves[0].name, "Earthquake");
        assert_eq!(mon.moves[0].max_pp, 16);
        assert_eq!(mon.moves[1].name, "Made Up Move");
        assert_eq!(mon.moves[1].data.power, 60);
    }

    #[test]
    fn test_condition_strings() {
        let mut mon = garchomp();
        mon.damage(10);
        mon.status = Some(Status::Burn);
        assert_eq!(mon.condition(), format!("{}/{} brn", mon.max_hp - 10, mon.max_hp));
        mon.damage(u32::MAX);
        assert_eq!(mon.condition(), "0 fnt");
    }

    #[test]
    fn test_tera_changes_typing() {
        let mut mon = garchomp();
        mon.terastallized = true;
        assert_eq!(mon.types(), vec![Type::Steel]);
        assert!(mon.stab_types().contains(&Type::Ground));
        assert!(mon.stab_types().contains(&Type::Steel));
        assert!(!mon.can_take_status(Status::Toxic));
    }

    #[test]
    fn test_struggle_when_out_of_pp() {
        let mut side = Side::new(Player::P1, "Alice".to_string(), vec![garchomp()]);
        for slot in &mut side.active_mut().moves {
            slot.pp = 0;
        }
        let active = side.request_active();
        assert_eq!(active["moves"].as_array().unwrap().len(), 1);
        assert_eq!(active["moves"][0]["id"], "struggle");
        assert_eq!(active["canTerastallize"], "Steel");
    }
}
