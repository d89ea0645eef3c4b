//! Field and side conditions

use arena_protocol::to_id;

use super::pokemon_type::Type;

/// Strip "move: " style prefixes and reduce to a protocol id
fn condition_id(s: &str) -> String {
    let clean = s
        .strip_prefix("move: ")
        .or_else(|| s.strip_prefix("ability: "))
        .unwrap_or(s);
    to_id(clean)
}

/// Weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Snow,
    HarshSun,
    HeavyRain,
    StrongWinds,
}

impl Weather {
    pub fn from_protocol(s: &str) -> Option<Self> {
        match condition_id(s).as_str() {
            "sunnyday" | "sun" => Some(Weather::Sun),
            "raindance" | "rain" => Some(Weather::Rain),
            "sandstorm" | "sand" => Some(Weather::Sand),
            "snow" | "snowscape" | "hail" => Some(Weather::Snow),
            "desolateland" => Some(Weather::HarshSun),
            "primordialsea" => Some(Weather::HeavyRain),
            "deltastream" => Some(Weather::StrongWinds),
            _ => None,
        }
    }

    /// Protocol name used in `-weather` lines
    pub fn to_protocol(&self) -> &'static str {
        match self {
            Weather::Sun => "SunnyDay",
            Weather::Rain => "RainDance",
            Weather::Sand => "Sandstorm",
            Weather::Snow => "Snow",
            Weather::HarshSun => "DesolateLand",
            Weather::HeavyRain => "PrimordialSea",
            Weather::StrongWinds => "DeltaStream",
        }
    }

    /// Damage multiplier this weather applies to moves of `move_type`
    pub fn damage_modifier(&self, move_type: Type) -> f32 {
        match (self, move_type) {
            (Weather::Sun | Weather::HarshSun, Type::Fire) => 1.5,
            (Weather::Sun, Type::Water) => 0.5,
            (Weather::HarshSun, Type::Water) => 0.0,
            (Weather::Rain | Weather::HeavyRain, Type::Water) => 1.5,
            (Weather::Rain, Type::Fire) => 0.5,
            (Weather::HeavyRain, Type::Fire) => 0.0,
            _ => 1.0,
        }
    }

    /// Whether a pokemon of these types takes end-of-turn weather chip damage
    pub fn chips(&self, types: &[Type]) -> bool {
        match self {
            Weather::Sand => !types
                .iter()
                .any(|t| matches!(t, Type::Rock | Type::Ground | Type::Steel)),
            _ => false,
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Weather::Sun => "Sun",
            Weather::Rain => "Rain",
            Weather::Sand => "Sandstorm",
            Weather::Snow => "Snow",
            Weather::HarshSun => "Harsh Sun",
            Weather::HeavyRain => "Heavy Rain",
            Weather::StrongWinds => "Strong Winds",
        })
    }
}

/// Terrain conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl Terrain {
    pub fn from_protocol(s: &str) -> Option<Self> {
        match condition_id(s).as_str() {
            "electricterrain" => Some(Terrain::Electric),
            "grassyterrain" => Some(Terrain::Grassy),
            "mistyterrain" => Some(Terrain::Misty),
            "psychicterrain" => Some(Terrain::Psychic),
            _ => None,
        }
    }

    /// Damage multiplier for grounded attackers using `move_type`
    pub fn damage_modifier(&self, move_type: Type) -> f32 {
        match (self, move_type) {
            (Terrain::Electric, Type::Electric)
            | (Terrain::Grassy, Type::Grass)
            | (Terrain::Psychic, Type::Psychic) => 1.3,
            (Terrain::Misty, Type::Dragon) => 0.5,
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Terrain::Electric => "Electric Terrain",
            Terrain::Grassy => "Grassy Terrain",
            Terrain::Misty => "Misty Terrain",
            Terrain::Psychic => "Psychic Terrain",
        })
    }
}

/// Side conditions (hazards, screens, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    AuroraVeil,
    Spikes,
    ToxicSpikes,
    StealthRock,
    StickyWeb,
    Tailwind,
    Safeguard,
}

impl SideCondition {
    pub fn from_protocol(s: &str) -> Option<Self> {
        match condition_id(s).as_str() {
            "reflect" => Some(SideCondition::Reflect),
            "lightscreen" => Some(SideCondition::LightScreen),
            "auroraveil" => Some(SideCondition::AuroraVeil),
            "spikes" => Some(SideCondition::Spikes),
            "toxicspikes" => Some(SideCondition::ToxicSpikes),
            "stealthrock" => Some(SideCondition::StealthRock),
            "stickyweb" => Some(SideCondition::StickyWeb),
            "tailwind" => Some(SideCondition::Tailwind),
            "safeguard" => Some(SideCondition::Safeguard),
            _ => None,
        }
    }

    pub fn max_layers(&self) -> u8 {
        match self {
            SideCondition::Spikes => 3,
            SideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }

    pub fn is_screen(&self) -> bool {
        matches!(
            self,
            SideCondition::Reflect | SideCondition::LightScreen | SideCondition::AuroraVeil
        )
    }

    pub fn is_hazard(&self) -> bool {
        matches!(
            self,
            SideCondition::Spikes
                | SideCondition::ToxicSpikes
                | SideCondition::StealthRock
                | SideCondition::StickyWeb
        )
    }

    /// Fraction of max HP lost on switch-in for a pokemon with `types`
    pub fn entry_damage(&self, layers: u8, types: &[Type]) -> f32 {
        let grounded = !types.contains(&Type::Flying);
        match self {
            SideCondition::StealthRock => Type::Rock.effectiveness_multi(types) / 8.0,
            SideCondition::Spikes if grounded => match layers {
                0 => 0.0,
                1 => 1.0 / 8.0,
                2 => 1.0 / 6.0,
                _ => 1.0 / 4.0,
            },
            _ => 0.0,
        }
    }
}

impl std::fmt::Display for SideCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SideCondition::Reflect => "Reflect",
            SideCondition::LightScreen => "Light Screen",
            SideCondition::AuroraVeil => "Aurora Veil",
            SideCondition::Spikes => "Spikes",
            SideCondition::ToxicSpikes => "Toxic Spikes",
            SideCondition::StealthRock => "Stealth Rock",
            SideCondition::StickyWeb => "Sticky Web",
            SideCondition::Tailwind => "Tailwind",
            SideCondition::Safeguard => "Safeguard",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_from_protocol() {
        assert_eq!(Weather::from_protocol("SunnyDay"), Some(Weather::Sun));
        assert_eq!(Weather::from_protocol("RainDance"), Some(Weather::Rain));
        assert_eq!(Weather::from_protocol("Hail"), Some(Weather::Snow));
        assert_eq!(Weather::from_protocol("DesolateLand"), Some(Weather::HarshSun));
        assert_eq!(Weather::from_protocol("none"), None);
    }

    #[test]
    fn test_weather_damage_modifier() {
        assert_eq!(Weather::Rain.damage_modifier(Type::Water), 1.5);
        assert_eq!(Weather::Rain.damage_modifier(Type::Fire), 0.5);
        assert_eq!(Weather::HarshSun.damage_modifier(Type::Water), 0.0);
        assert_eq!(Weather::Sand.damage_modifier(Type::Rock), 1.0);
    }

    #[test]
    fn test_sand_chip() {
        assert!(Weather::Sand.chips(&[Type::Water]));
        assert!(!Weather::Sand.chips(&[Type::Dragon, Type::Ground]));
        assert!(!Weather::Rain.chips(&[Type::Water]));
    }

    #[test]
    fn test_terrain_from_protocol() {
        assert_eq!(Terrain::from_protocol("Electric Terrain"), Some(Terrain::Electric));
        assert_eq!(Terrain::from_protocol("move: Grassy Terrain"), Some(Terrain::Grassy));
        assert_eq!(Terrain::from_protocol("Trick Room"), None);
    }

    #[test]
    fn test_side_condition_from_protocol() {
        assert_eq!(
            SideCondition::from_protocol("move: Stealth Rock"),
            Some(SideCondition::StealthRock)
        );
        assert_eq!(SideCondition::from_protocol("Reflect"), Some(SideCondition::Reflect));
        assert_eq!(SideCondition::from_protocol("Wish"), None);
        assert!(SideCondition::Spikes.is_hazard());
        assert!(SideCondition::LightScreen.is_screen());
    }

    #[test]
    fn test_entry_damage() {
        let rocks = SideCondition::StealthRock;
        assert_eq!(rocks.entry_damage(1, &[Type::Fire, Type::Flying]), 0.5);
        assert_eq!(rocks.entry_damage(1, &[Type::Ground]), 1.0 / 16.0);
        assert_eq!(SideCondition::Spikes.entry_damage(3, &[Type::Normal]), 0.25);
        assert_eq!(SideCondition::Spikes.entry_damage(3, &[Type::Flying]), 0.0);
    }
}
