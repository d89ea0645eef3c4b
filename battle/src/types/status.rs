//! Status conditions (volatile and non-volatile)

/// Non-volatile status conditions (persist through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    Toxic,
    Sleep,
}

impl Status {
    /// Parse from protocol string ("brn", "frz", "par", "psn", "tox", "slp")
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s {
            "brn" => Some(Status::Burn),
            "frz" => Some(Status::Freeze),
            "par" => Some(Status::Paralysis),
            "psn" => Some(Status::Poison),
            "tox" => Some(Status::Toxic),
            "slp" => Some(Status::Sleep),
            _ => None,
        }
    }

    pub fn to_protocol(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::Toxic => "tox",
            Status::Sleep => "slp",
        }
    }

    /// Verb phrase for battle log lines ("was burned")
    pub fn inflicted_text(&self) -> &'static str {
        match self {
            Status::Burn => "was burned",
            Status::Freeze => "was frozen solid",
            Status::Paralysis => "is paralyzed",
            Status::Poison => "was poisoned",
            Status::Toxic => "was badly poisoned",
            Status::Sleep => "fell asleep",
        }
    }

    /// Rough cost of carrying this status, 0.0 (harmless) to 1.0 (crippling)
    pub fn severity(&self) -> f32 {
        match self {
            Status::Sleep | Status::Freeze => 0.8,
            Status::Toxic => 0.6,
            Status::Paralysis => 0.5,
            Status::Burn => 0.45,
            Status::Poison => 0.3,
        }
    }

    /// End-of-turn damage as a fraction of max HP (Toxic uses its first-turn value)
    pub fn residual_fraction(&self) -> f32 {
        match self {
            Status::Burn => 1.0 / 16.0,
            Status::Poison => 1.0 / 8.0,
            Status::Toxic => 1.0 / 16.0,
            _ => 0.0,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Burn => "Burn",
            Status::Freeze => "Freeze",
            Status::Paralysis => "Paralysis",
            Status::Poison => "Poison",
            Status::Toxic => "Toxic",
            Status::Sleep => "Sleep",
        })
    }
}

/// Volatile conditions (cleared on switching)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Volatile {
    Confusion,
    Taunt,
    Encore,
    LeechSeed,
    Substitute,
    Protect,
    Trapped,
    Recharging,
    Charging,
    Other(String),
}

impl Volatile {
    /// Parse from a -start/-end effect ("move: Taunt", "confusion", "Substitute")
    pub fn from_protocol(s: &str) -> Self {
        let clean = s
            .strip_prefix("move: ")
            .or_else(|| s.strip_prefix("ability: "))
            .unwrap_or(s);

        match arena_protocol::to_id(clean).as_str() {
            "confusion" | "confused" => Volatile::Confusion,
            "taunt" => Volatile::Taunt,
            "encore" => Volatile::Encore,
            "leechseed" => Volatile::LeechSeed,
            "substitute" => Volatile::Substitute,
            "protect" | "detect" | "kingsshield" | "spikyshield" | "banefulbunker"
            | "silktrap" | "burningbulwark" => Volatile::Protect,
            "trapped" | "meanlook" | "block" | "partiallytrapped" => Volatile::Trapped,
            "mustrecharge" | "recharging" => Volatile::Recharging,
            "twoturnmove" | "charging" => Volatile::Charging,
            _ => Volatile::Other(clean.to_string()),
        }
    }

    /// Whether this condition hinders the pokemon carrying it
    pub fn is_harmful(&self) -> bool {
        matches!(
            self,
            Volatile::Confusion
                | Volatile::Taunt
                | Volatile::Encore
                | Volatile::LeechSeed
                | Volatile::Trapped
                | Volatile::Recharging
        )
    }
}
