//! Damage estimation
//!
//! A compact version of the standard damage formula. It covers stats, stages,
//! STAB, type effectiveness, burn, weather, terrain, screens and criticals.
//! Abilities and items are not modelled.

use crate::dex::{self, MoveCategory, MoveData};
use crate::types::{
    FieldState, PokemonState, SideCondition, SideState, StatStages, StatTable, Status, Terrain,
    Type, Weather,
};

/// Average of the 85%..100% damage roll
pub const AVERAGE_ROLL: f32 = 0.925;

/// One side of a damage calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub level: u8,
    pub stats: StatTable,
    /// Defensive typing
    pub types: Vec<Type>,
    pub stab_types: Vec<Type>,
    pub boosts: StatStages,
    pub status: Option<Status>,
}

impl Combatant {
    /// Combatant for a tracked pokemon, assuming the default spread
    pub fn from_state(pokemon: &PokemonState) -> Self {
        Self {
            level: pokemon.level,
            stats: dex::default_stats(&pokemon.species, pokemon.level),
            types: pokemon.types(),
            stab_types: pokemon.stab_types(),
            boosts: pokemon.boosts.clone(),
            status: pokemon.status,
        }
    }
}

/// Field conditions relevant to one attack
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageContext {
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
    pub reflect: bool,
    pub light_screen: bool,
}

impl DamageContext {
    /// Context for an attack landing on `defender_side`
    pub fn against(field: &FieldState, defender_side: &SideState) -> Self {
        let veil = defender_side.has_condition(SideCondition::AuroraVeil);
        Self {
            weather: field.weather,
            terrain: field.terrain,
            reflect: veil || defender_side.has_condition(SideCondition::Reflect),
            light_screen: veil || defender_side.has_condition(SideCondition::LightScreen),
        }
    }
}

/// Damage of one hit in HP points; `roll` is the 0.85..=1.0 random factor
pub fn hit_damage(
    attacker: &Combatant,
    defender: &Combatant,
    mv: &MoveData,
    ctx: &DamageContext,
    roll: f32,
    crit: bool,
) -> u32 {
    if !mv.is_damaging() {
        return 0;
    }
    let effectiveness = mv.move_type.effectiveness_multi(&defender.types);
    if effectiveness == 0.0 {
        return 0;
    }

    let physical = mv.category == MoveCategory::Physical;
    let (attack, mut atk_stage, defense, mut def_stage) = if physical {
        (attacker.stats.atk, attacker.boosts.atk, defender.stats.def, defender.boosts.def)
    } else {
        (attacker.stats.spa, attacker.boosts.spa, defender.stats.spd, defender.boosts.spd)
    };
    if crit {
        atk_stage = atk_stage.max(0);
        def_stage = def_stage.min(0);
    }
    let attack = f32::from(attack.max(1)) * StatStages::multiplier(atk_stage);
    let defense = f32::from(defense.max(1)) * StatStages::multiplier(def_stage);

    let level_factor = (2.0 * f32::from(attacker.level) / 5.0).floor() + 2.0;
    let mut damage = (level_factor * f32::from(mv.power) * attack / defense).floor() / 50.0 + 2.0;

    if let Some(weather) = ctx.weather {
        damage *= weather.damage_modifier(mv.move_type);
    }
    if let Some(terrain) = ctx.terrain {
        damage *= terrain.damage_modifier(mv.move_type);
    }
    if crit {
        damage *= 1.5;
    }
    damage *= roll.clamp(0.85, 1.0);
    if attacker.stab_types.contains(&mv.move_type) {
        damage *= 1.5;
    }
    damage *= effectiveness;
    if physical && attacker.status == Some(Status::Burn) {
        damage *= 0.5;
    }
    if !crit && ((physical && ctx.reflect) || (!physical && ctx.light_screen)) {
        damage *= 0.5;
    }

    (damage.floor() as u32).max(1)
}

/// Expected damage as a fraction of the defender's max HP
///
/// Uses the average roll, a representative hit count for multi-hit moves and
/// weights by accuracy. Not capped at 1.0.
pub fn expected_fraction(
    attacker: &Combatant,
    defender: &Combatant,
    mv: &MoveData,
    ctx: &DamageContext,
) -> f32 {
    let per_hit = hit_damage(attacker, defender, mv, ctx, AVERAGE_ROLL, false) as f32;
    let hits = f32::from(mv.representative_hits());
    let accuracy = mv.hit_chance()
        * StatStages::accuracy_multiplier(attacker.boosts.accuracy - defender.boosts.evasion);
    per_hit * hits * accuracy.min(1.0) / f32::from(defender.stats.hp.max(1))
}

/// Expected damage fraction of `mv` between two tracked pokemon
pub fn estimate_damage(
    attacker: &PokemonState,
    defender: &PokemonState,
    mv: &MoveData,
    ctx: &DamageContext,
) -> f32 {
    expected_fraction(
        &Combatant::from_state(attacker),
        &Combatant::from_state(defender),
        mv,
        ctx,
    )
}
