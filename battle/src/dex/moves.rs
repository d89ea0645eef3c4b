//! Move table

use arena_protocol::Stat;

use crate::types::{SideCondition, Status, Type, Weather};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Secondary behaviour a move carries beyond its direct damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveEffect {
    None,
    /// Inflict a status on the target with `chance` percent
    Inflict { status: Status, chance: u8 },
    /// Stage changes applied to the user
    SelfBoost(&'static [(Stat, i8)]),
    /// Heal the user by this fraction of its max HP
    Heal(f32),
    /// Heal the user by this fraction of damage dealt
    Drain(f32),
    /// User takes this fraction of damage dealt
    Recoil(f32),
    /// Set an entry hazard on the opposing side
    Hazard(SideCondition),
    /// Set a screen on the user's side
    Screen(SideCondition),
    Weather(Weather),
    Protect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveData {
    pub name: &'static str,
    pub move_type: Type,
    pub category: MoveCategory,
    pub power: u16,
    /// `None` never misses
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub priority: i8,
    /// Minimum and maximum hit count
    pub hits: (u8, u8),
    pub effect: MoveEffect,
}

impl MoveData {
    const fn new(
        name: &'static str,
        move_type: Type,
        category: MoveCategory,
        power: u16,
        accuracy: Option<u8>,
        pp: u8,
    ) -> Self {
        Self {
            name,
            move_type,
            category,
            power,
            accuracy,
            pp,
            priority: 0,
            hits: (1, 1),
            effect: MoveEffect::None,
        }
    }

    const fn priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    const fn hits(mut self, min: u8, max: u8) -> Self {
        self.hits = (min, max);
        self
    }

    const fn effect(mut self, effect: MoveEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }

    /// Hit count used for estimates: fixed counts as-is, 2-5 hitters as 3
    pub fn representative_hits(&self) -> u8 {
        match self.hits {
            (min, max) if min == max => min,
            (2, 5) => 3,
            (min, max) => (min + max).div_ceil(2),
        }
    }

    /// Hit chance in 0.0..=1.0 before stage modifiers
    pub fn hit_chance(&self) -> f32 {
        self.accuracy.map_or(1.0, |acc| f32::from(acc) / 100.0)
    }
}

use MoveCategory::{Physical, Special, Status as Other};
use Type::*;

const fn inflict(status: Status, chance: u8) -> MoveEffect {
    MoveEffect::Inflict { status, chance }
}

#[rustfmt::skip]
pub(super) static MOVES: &[MoveData] = &[
    MoveData::new("Earthquake", Ground, Physical, 100, Some(100), 10),
    MoveData::new("Headlong Rush", Ground, Physical, 120, Some(100), 5),
    MoveData::new("Dragon Claw", Dragon, Physical, 80, Some(100), 15),
    MoveData::new("Outrage", Dragon, Physical, 120, Some(100), 10),
    MoveData::new("Draco Meteor", Dragon, Special, 130, Some(90), 5)
        .effect(MoveEffect::SelfBoost(&[(Stat::Spa, -2)])),
    MoveData::new("Dragon Darts", Dragon, Physical, 50, Some(100), 10).hits(2, 2),
    MoveData::new("Shadow Ball", Ghost, Special, 80, Some(100), 15),
    MoveData::new("Shadow Sneak", Ghost, Physical, 40, Some(100), 30).priority(1),
    MoveData::new("Make It Rain", Steel, Special, 120, Some(100), 5)
        .effect(MoveEffect::SelfBoost(&[(Stat::Spa, -1)])),
    MoveData::new("Flash Cannon", Steel, Special, 80, Some(100), 10),
    MoveData::new("Iron Head", Steel, Physical, 80, Some(100), 15),
    MoveData::new("Bullet Punch", Steel, Physical, 40, Some(100), 30).priority(1),
    MoveData::new("Close Combat", Fighting, Physical, 120, Some(100), 5)
        .effect(MoveEffect::SelfBoost(&[(Stat::Def, -1), (Stat::Spd, -1)])),
    MoveData::new("Aura Sphere", Fighting, Special, 80, None, 20),
    MoveData::new("Rapid Spin", Normal, Physical, 50, Some(100), 40)
        .effect(MoveEffect::SelfBoost(&[(Stat::Spe, 1)])),
    MoveData::new("Kowtow Cleave", Dark, Physical, 85, None, 10),
    MoveData::new("Sucker Punch", Dark, Physical, 70, Some(100), 5).priority(1),
    MoveData::new("Knock Off", Dark, Physical, 65, Some(100), 20),
    MoveData::new("Dark Pulse", Dark, Special, 80, Some(100), 15),
    MoveData::new("Crunch", Dark, Physical, 80, Some(100), 15),
    MoveData::new("Moonblast", Fairy, Special, 95, Some(100), 15),
    MoveData::new("Play Rough", Fairy, Physical, 90, Some(90), 10),
    MoveData::new("Spirit Break", Fairy, Physical, 75, Some(100), 15),
    MoveData::new("Surf", Water, Special, 90, Some(100), 15),
    MoveData::new("Hydro Pump", Water, Special, 110, Some(80), 5),
    MoveData::new("Waterfall", Water, Physical, 80, Some(100), 15),
    MoveData::new("Aqua Jet", Water, Physical, 40, Some(100), 20).priority(1),
    MoveData::new("Scald", Water, Special, 80, Some(100), 15)
        .effect(inflict(Status::Burn, 30)),
    MoveData::new("Flamethrower", Fire, Special, 90, Some(100), 15)
        .effect(inflict(Status::Burn, 10)),
    MoveData::new("Fire Blast", Fire, Special, 110, Some(85), 5)
        .effect(inflict(Status::Burn, 10)),
    MoveData::new("Flare Blitz", Fire, Physical, 120, Some(100), 15)
        .effect(MoveEffect::Recoil(0.33)),
    MoveData::new("Will-O-Wisp", Fire, Other, 0, Some(85), 15)
        .effect(inflict(Status::Burn, 100)),
    MoveData::new("Thunderbolt", Electric, Special, 90, Some(100), 15)
        .effect(inflict(Status::Paralysis, 10)),
    MoveData::new("Volt Switch", Electric, Special, 70, Some(100), 20),
    MoveData::new("Thunder Wave", Electric, Other, 0, Some(90), 20)
        .effect(inflict(Status::Paralysis, 100)),
    MoveData::new("Giga Drain", Grass, Special, 75, Some(100), 10)
        .effect(MoveEffect::Drain(0.5)),
    MoveData::new("Leaf Storm", Grass, Special, 130, Some(90), 5)
        .effect(MoveEffect::SelfBoost(&[(Stat::Spa, -2)])),
    MoveData::new("Wood Hammer", Grass, Physical, 120, Some(100), 15)
        .effect(MoveEffect::Recoil(0.33)),
    MoveData::new("Power Whip", Grass, Physical, 120, Some(85), 10),
    MoveData::new("Bullet Seed", Grass, Physical, 25, Some(100), 30).hits(2, 5),
    MoveData::new("Ice Beam", Ice, Special, 90, Some(100), 10)
        .effect(inflict(Status::Freeze, 10)),
    MoveData::new("Ice Shard", Ice, Physical, 40, Some(100), 30).priority(1),
    MoveData::new("Icicle Spear", Ice, Physical, 25, Some(100), 30).hits(2, 5),
    MoveData::new("Sludge Bomb", Poison, Special, 90, Some(100), 10)
        .effect(inflict(Status::Poison, 30)),
    MoveData::new("Toxic", Poison, Other, 0, Some(90), 10)
        .effect(inflict(Status::Toxic, 100)),
    MoveData::new("Psychic", Psychic, Special, 90, Some(100), 10),
    MoveData::new("Psyshock", Psychic, Special, 80, Some(100), 10),
    MoveData::new("Zen Headbutt", Psychic, Physical, 80, Some(90), 15),
    MoveData::new("Brave Bird", Flying, Physical, 120, Some(100), 15)
        .effect(MoveEffect::Recoil(0.33)),
    MoveData::new("Air Slash", Flying, Special, 75, Some(95), 15),
    MoveData::new("Hurricane", Flying, Special, 110, Some(70), 10),
    MoveData::new("Stone Edge", Rock, Physical, 100, Some(80), 5),
    MoveData::new("Rock Slide", Rock, Physical, 75, Some(90), 10),
    MoveData::new("U-turn", Bug, Physical, 70, Some(100), 20),
    MoveData::new("Bug Buzz", Bug, Special, 90, Some(100), 10),
    MoveData::new("Body Slam", Normal, Physical, 85, Some(100), 15)
        .effect(inflict(Status::Paralysis, 30)),
    MoveData::new("Double-Edge", Normal, Physical, 120, Some(100), 15)
        .effect(MoveEffect::Recoil(0.33)),
    MoveData::new("Extreme Speed", Normal, Physical, 80, Some(100), 5).priority(2),
    MoveData::new("Tackle", Normal, Physical, 40, Some(100), 35),
    MoveData::new("Splash", Normal, Other, 0, None, 40),
    MoveData::new("Swords Dance", Normal, Other, 0, None, 20)
        .effect(MoveEffect::SelfBoost(&[(Stat::Atk, 2)])),
    MoveData::new("Nasty Plot", Dark, Other, 0, None, 20)
        .effect(MoveEffect::SelfBoost(&[(Stat::Spa, 2)])),
    MoveData::new("Dragon Dance", Dragon, Other, 0, None, 20)
        .effect(MoveEffect::SelfBoost(&[(Stat::Atk, 1), (Stat::Spe, 1)])),
    MoveData::new("Quiver Dance", Bug, Other, 0, None, 20)
        .effect(MoveEffect::SelfBoost(&[(Stat::Spa, 1), (Stat::Spd, 1), (Stat::Spe, 1)])),
    MoveData::new("Calm Mind", Psychic, Other, 0, None, 20)
        .effect(MoveEffect::SelfBoost(&[(Stat::Spa, 1), (Stat::Spd, 1)])),
    MoveData::new("Recover", Normal, Other, 0, None, 5).effect(MoveEffect::Heal(0.5)),
    MoveData::new("Roost", Flying, Other, 0, None, 5).effect(MoveEffect::Heal(0.5)),
    MoveData::new("Soft-Boiled", Normal, Other, 0, None, 5).effect(MoveEffect::Heal(0.5)),
    MoveData::new("Slack Off", Normal, Other, 0, None, 5).effect(MoveEffect::Heal(0.5)),
    MoveData::new("Stealth Rock", Rock, Other, 0, None, 20)
        .effect(MoveEffect::Hazard(SideCondition::StealthRock)),
    MoveData::new("Spikes", Ground, Other, 0, None, 20)
        .effect(MoveEffect::Hazard(SideCondition::Spikes)),
    MoveData::new("Reflect", Psychic, Other, 0, None, 20)
        .effect(MoveEffect::Screen(SideCondition::Reflect)),
    MoveData::new("Light Screen", Psychic, Other, 0, None, 30)
        .effect(MoveEffect::Screen(SideCondition::LightScreen)),
    MoveData::new("Rain Dance", Water, Other, 0, None, 5)
        .effect(MoveEffect::Weather(Weather::Rain)),
    MoveData::new("Sunny Day", Fire, Other, 0, None, 5)
        .effect(MoveEffect::Weather(Weather::Sun)),
    MoveData::new("Sandstorm", Rock, Other, 0, None, 10)
        .effect(MoveEffect::Weather(Weather::Sand)),
    MoveData::new("Protect", Normal, Other, 0, None, 10).priority(4).effect(MoveEffect::Protect),
    MoveData::new("Struggle", Normal, Physical, 50, None, 1)
        .effect(MoveEffect::Recoil(0.25)),
];
