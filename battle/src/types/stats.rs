//! Stat tables and in-battle stat stages

use arena_protocol::Stat;
use serde::{Deserialize, Serialize};

/// One value per permanent stat, in hp/atk/def/spa/spd/spe order
///
/// Used for EV and IV spreads as well as computed stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatTable {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

impl StatTable {
    /// Paste-format abbreviations, in table order
    pub const NAMES: [&'static str; 6] = ["HP", "Atk", "Def", "SpA", "SpD", "Spe"];

    pub const fn uniform(value: u16) -> Self {
        Self {
            hp: value,
            atk: value,
            def: value,
            spa: value,
            spd: value,
            spe: value,
        }
    }

    pub const fn from_array(values: [u16; 6]) -> Self {
        Self {
            hp: values[0],
            atk: values[1],
            def: values[2],
            spa: values[3],
            spd: values[4],
            spe: values[5],
        }
    }

    pub fn to_array(&self) -> [u16; 6] {
        [self.hp, self.atk, self.def, self.spa, self.spd, self.spe]
    }

    pub fn total(&self) -> u32 {
        self.to_array().iter().map(|v| u32::from(*v)).sum()
    }

    pub fn is_uniform(&self, value: u16) -> bool {
        self.to_array().iter().all(|v| *v == value)
    }

    /// Set a stat by its paste abbreviation ("SpA", "spe", "HP")
    pub fn set_named(&mut self, name: &str, value: u16) -> bool {
        let slot = match name.to_ascii_lowercase().as_str() {
            "hp" => &mut self.hp,
            "atk" => &mut self.atk,
            "def" => &mut self.def,
            "spa" => &mut self.spa,
            "spd" => &mut self.spd,
            "spe" => &mut self.spe,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Stat stages, each clamped to -6..=+6
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, stat: Stat) -> &mut i8 {
        match stat {
            Stat::Atk => &mut self.atk,
            Stat::Def => &mut self.def,
            Stat::Spa => &mut self.spa,
            Stat::Spd => &mut self.spd,
            Stat::Spe => &mut self.spe,
            Stat::Accuracy => &mut self.accuracy,
            Stat::Evasion => &mut self.evasion,
        }
    }

    fn slots_mut(&mut self) -> [&mut i8; 7] {
        [
            &mut self.atk,
            &mut self.def,
            &mut self.spa,
            &mut self.spd,
            &mut self.spe,
            &mut self.accuracy,
            &mut self.evasion,
        ]
    }

    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i8) {
        *self.slot_mut(stat) = value.clamp(-6, 6);
    }

    /// Apply a stage change, returning the change actually applied
    pub fn boost(&mut self, stat: Stat, amount: i8) -> i8 {
        let slot = self.slot_mut(stat);
        let before = *slot;
        *slot = before.saturating_add(amount).clamp(-6, 6);
        *slot - before
    }

    pub fn unboost(&mut self, stat: Stat, amount: i8) -> i8 {
        self.boost(stat, -amount)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn clear_negative(&mut self) {
        for slot in self.slots_mut() {
            *slot = (*slot).max(0);
        }
    }

    pub fn invert(&mut self) {
        for slot in self.slots_mut() {
            *slot = -*slot;
        }
    }

    /// Sum of the five battle stats, ignoring accuracy and evasion
    pub fn net(&self) -> i32 {
        [self.atk, self.def, self.spa, self.spd, self.spe]
            .iter()
            .map(|s| i32::from(*s))
            .sum()
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    /// Multiplier for atk/def/spa/spd/spe: +1 = 1.5x, -1 = 0.67x, +6 = 4x
    pub fn multiplier(stage: i8) -> f32 {
        let stage = i32::from(stage.clamp(-6, 6));
        if stage >= 0 {
            (2 + stage) as f32 / 2.0
        } else {
            2.0 / (2 - stage) as f32
        }
    }

    /// Multiplier for accuracy/evasion: +1 = 1.33x, -1 = 0.75x
    pub fn accuracy_multiplier(stage: i8) -> f32 {
        let stage = i32::from(stage.clamp(-6, 6));
        if stage >= 0 {
            (3 + stage) as f32 / 3.0
        } else {
            3.0 / (3 - stage) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_table_named() {
        let mut evs = StatTable::default();
        assert!(evs.set_named("SpA", 252));
        assert!(evs.set_named("spe", 252));
        assert!(evs.set_named("HP", 4));
        assert!(!evs.set_named("luck", 1));
        assert_eq!(evs.to_array(), [4, 0, 0, 252, 0, 252]);
        assert_eq!(evs.total(), 508);
        assert!(StatTable::uniform(31).is_uniform(31));
    }

    #[test]
    fn test_boost_clamps_and_reports_change() {
        let mut stages = StatStages::new();
        assert_eq!(stages.boost(Stat::Atk, 2), 2);
        stages.atk = 5;
        assert_eq!(stages.boost(Stat::Atk, 3), 1);
        assert_eq!(stages.boost(Stat::Atk, 1), 0);
        assert_eq!(stages.atk, 6);

        assert_eq!(stages.unboost(Stat::Def, 8), -6);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_set_clamps() {
        let mut stages = StatStages::new();
        stages.set(Stat::Spe, 9);
        assert_eq!(stages.get(Stat::Spe), 6);
        stages.set(Stat::Evasion, -9);
        assert_eq!(stages.get(Stat::Evasion), -6);
    }

    #[test]
    fn test_clear_negative_and_invert() {
        let mut stages = StatStages {
            atk: 2,
            def: -1,
            spe: -3,
            ..Default::default()
        };
        stages.invert();
        assert_eq!((stages.atk, stages.def, stages.spe), (-2, 1, 3));

        stages.clear_negative();
        assert_eq!((stages.atk, stages.def, stages.spe), (0, 1, 3));
        assert_eq!(stages.net(), 4);

        stages.clear();
        assert!(stages.is_clear());
    }

    #[test]
    fn test_multipliers() {
        assert!((StatStages::multiplier(0) - 1.0).abs() < 1e-6);
        assert!((StatStages::multiplier(2) - 2.0).abs() < 1e-6);
        assert!((StatStages::multiplier(-1) - 2.0 / 3.0).abs() < 1e-6);
        assert!((StatStages::multiplier(-6) - 0.25).abs() < 1e-6);
        assert!((StatStages::accuracy_multiplier(1) - 4.0 / 3.0).abs() < 1e-6);
        assert!((StatStages::accuracy_multiplier(-1) - 0.75).abs() < 1e-6);
    }
}
