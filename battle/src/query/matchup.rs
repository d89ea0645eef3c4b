//! Type matchup helpers for decision making

use crate::types::Type;

/// Best multiplier any of the attacker's types achieves against the defender
///
/// Neutral when the attacker has no known types.
pub fn offensive_multiplier(attacker_types: &[Type], defender_types: &[Type]) -> f32 {
    attacker_types
        .iter()
        .map(|t| t.effectiveness_multi(defender_types))
        .reduce(f32::max)
        .unwrap_or(1.0)
}

/// How well `ours` matches up against `theirs`: our best hit divided by theirs
///
/// Above 1.0 favours us.
pub fn matchup_ratio(ours: &[Type], theirs: &[Type]) -> f32 {
    let dealt = offensive_multiplier(ours, theirs);
    let taken = offensive_multiplier(theirs, ours);
    (dealt + 0.25) / (taken + 0.25)
}

pub fn is_immune_to(defender_types: &[Type], attacking_type: Type) -> bool {
    attacking_type.effectiveness_multi(defender_types) == 0.0
}

/// Types that hit the defender super effectively
pub fn weaknesses(defender_types: &[Type]) -> Vec<Type> {
    Type::ALL
        .into_iter()
        .filter(|t| t.effectiveness_multi(defender_types) > 1.0)
        .collect()
}
