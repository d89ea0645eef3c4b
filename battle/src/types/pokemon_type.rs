//! Elemental types and the effectiveness chart

use arena_protocol::to_id;
use serde::{Deserialize, Serialize};

/// The eighteen elemental types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Type {
    Normal = 0,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Type {
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
    ];

    /// Multiplier against a single defending type
    pub fn effectiveness(&self, defender: Type) -> f32 {
        TYPE_CHART[*self as usize][defender as usize]
    }

    /// Multiplier against every defending type, stacked multiplicatively
    ///
    /// An empty defender list is neutral.
    pub fn effectiveness_multi(&self, defenders: &[Type]) -> f32 {
        defenders.iter().map(|t| self.effectiveness(*t)).product()
    }

    /// Parse a type name in any casing ("Fire", "fire", "FIRE")
    pub fn parse(s: &str) -> Option<Self> {
        let id = to_id(s);
        Type::ALL.into_iter().find(|t| to_id(t.as_str()) == id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effectiveness of a named attacking type against named defending types
///
/// Unknown attacking types are neutral (x1). Unknown defending types contribute
/// nothing, so an empty or unrecognized defender list is also neutral.
pub fn type_effectiveness(attacking: &str, defending: &[&str]) -> f32 {
    let Some(attacker) = Type::parse(attacking) else {
        return 1.0;
    };
    let defenders: Vec<Type> = defending.iter().filter_map(|t| Type::parse(t)).collect();
    attacker.effectiveness_multi(&defenders)
}

/// Effectiveness multipliers indexed `[attacking][defending]` in [`Type::ALL`] order.
///
/// Process-wide and immutable.
#[rustfmt::skip]
pub static TYPE_CHART: [[f32; 18]; 18] = [
    // Normal
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.0, 1.0, 1.0, 0.5, 1.0],
    // Fire
    [1.0, 0.5, 0.5, 1.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 0.5, 1.0, 2.0, 1.0],
    // Water
    [1.0, 2.0, 0.5, 1.0, 0.5, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 1.0, 1.0],
    // Electric
    [1.0, 1.0, 2.0, 0.5, 0.5, 1.0, 1.0, 1.0, 0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0, 1.0, 1.0],
    // Grass
    [1.0, 0.5, 2.0, 1.0, 0.5, 1.0, 1.0, 0.5, 2.0, 0.5, 1.0, 0.5, 2.0, 1.0, 0.5, 1.0, 0.5, 1.0],
    // Ice
    [1.0, 0.5, 0.5, 1.0, 2.0, 0.5, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0],
    // Fighting
    [2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 0.5, 0.5, 0.5, 2.0, 0.0, 1.0, 2.0, 2.0, 0.5],
    // Poison
    [1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 0.5, 0.5, 1.0, 1.0, 1.0, 0.5, 0.5, 1.0, 1.0, 0.0, 2.0],
    // Ground
    [1.0, 2.0, 1.0, 2.0, 0.5, 1.0, 1.0, 2.0, 1.0, 0.0, 1.0, 0.5, 2.0, 1.0, 1.0, 1.0, 2.0, 1.0],
    // Flying
    [1.0, 1.0, 1.0, 0.5, 2.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 1.0, 1.0, 0.5, 1.0],
    // Psychic
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 0.5, 1.0, 1.0, 1.0, 1.0, 0.0, 0.5, 1.0],
    // Bug
    [1.0, 0.5, 1.0, 1.0, 2.0, 1.0, 0.5, 0.5, 1.0, 0.5, 2.0, 1.0, 1.0, 0.5, 1.0, 2.0, 0.5, 0.5],
    // Rock
    [1.0, 2.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 0.5, 2.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0],
    // Ghost
    [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 1.0],
    // Dragon
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.5, 0.0],
    // Dark
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 1.0, 0.5, 1.0, 0.5],
    // Steel
    [1.0, 0.5, 0.5, 0.5, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 0.5, 2.0],
    // Fairy
    [1.0, 0.5, 1.0, 1.0, 1.0, 1.0, 2.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 0.5, 1.0],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_type_matchups() {
        assert_eq!(Type::Water.effectiveness(Type::Fire), 2.0);
        assert_eq!(Type::Fire.effectiveness(Type::Water), 0.5);
        assert_eq!(Type::Normal.effectiveness(Type::Ghost), 0.0);
        assert_eq!(Type::Dragon.effectiveness(Type::Fairy), 0.0);
        assert_eq!(Type::Ground.effectiveness(Type::Flying), 0.0);
        assert_eq!(Type::Fighting.effectiveness(Type::Steel), 2.0);
    }

    #[test]
    fn test_dual_types_stack() {
        assert_eq!(Type::Ice.effectiveness_multi(&[Type::Dragon, Type::Ground]), 4.0);
        assert_eq!(Type::Fire.effectiveness_multi(&[Type::Water, Type::Rock]), 0.25);
        assert_eq!(Type::Electric.effectiveness_multi(&[Type::Ground, Type::Flying]), 0.0);
        assert_eq!(Type::Fire.effectiveness_multi(&[]), 1.0);
    }

    #[test]
    fn test_named_effectiveness() {
        assert_eq!(type_effectiveness("Ice", &["Dragon", "Flying"]), 4.0);
        assert_eq!(type_effectiveness("Grass", &["water", "ground"]), 4.0);
        assert_eq!(type_effectiveness("Shadow", &["Dragon", "Flying"]), 1.0);
        assert_eq!(type_effectiveness("Ice", &[]), 1.0);
        assert_eq!(type_effectiveness("Ice", &["???"]), 1.0);
    }

    #[test]
    fn test_parse_round_trip() {
        for t in Type::ALL {
            assert_eq!(Type::parse(t.as_str()), Some(t));
        }
        assert_eq!(Type::parse("FAIRY"), Some(Type::Fairy));
        assert_eq!(Type::parse("Stellar"), None);
    }
}
