//! Shared inputs for the scoring strategies

use arena_battle::dex::{self, MoveData};
use arena_battle::query::{DamageContext, estimate_damage};
use arena_battle::{
    BattleActionSet, BattleState, MoveOption, Player, PokemonState, SideState, Status,
    SwitchOption, Type,
};

/// The two active pokemon and the field from one side's point of view
pub(crate) struct Matchup<'a> {
    pub me: Option<&'a PokemonState>,
    pub foe: Option<&'a PokemonState>,
    pub my_side: &'a SideState,
    pub foe_side: &'a SideState,
    /// Context for our attacks landing on the foe
    pub ctx: DamageContext,
}

impl<'a> Matchup<'a> {
    pub fn new(state: &'a BattleState, player: Player) -> Self {
        let my_side = state.side(player);
        let foe_side = state.side(player.opponent());
        Self {
            me: my_side.active_pokemon().filter(|p| p.is_alive()),
            foe: foe_side.active_pokemon().filter(|p| p.is_alive()),
            my_side,
            foe_side,
            ctx: DamageContext::against(&state.field, foe_side),
        }
    }

    pub fn my_hp(&self) -> f32 {
        self.me.map_or(1.0, PokemonState::hp_fraction)
    }

    pub fn foe_hp(&self) -> f32 {
        self.foe.map_or(1.0, PokemonState::hp_fraction)
    }

    /// Expected damage of `mv` as a fraction of the foe's max HP
    ///
    /// Without a known attacker and target this falls back to a power based
    /// guess on the same scale.
    pub fn damage(&self, mv: &MoveData) -> f32 {
        match (self.me, self.foe) {
            (Some(me), Some(foe)) => estimate_damage(me, foe, mv, &self.ctx),
            _ => {
                if !mv.is_damaging() {
                    return 0.0;
                }
                let stab = self
                    .me
                    .is_some_and(|p| p.stab_types().contains(&mv.move_type));
                let stab = if stab { 1.5 } else { 1.0 };
                f32::from(mv.power) * f32::from(mv.representative_hits()) * mv.hit_chance() * stab
                    / 300.0
            }
        }
    }
}

pub(crate) fn move_data(option: &MoveOption) -> Option<&'static MoveData> {
    dex::move_data(&option.id).or_else(|| dex::move_data(&option.name))
}

/// Tracked state for a switch candidate, if the roster knows it
pub(crate) fn candidate<'a>(
    state: &'a BattleState,
    player: Player,
    option: &SwitchOption,
) -> Option<&'a PokemonState> {
    let side = state.side(player);
    side.find_pokemon(&option.name).map(|i| &side.pokemon[i])
}

pub(crate) fn candidate_types(state: &BattleState, player: Player, option: &SwitchOption) -> Vec<Type> {
    candidate(state, player, option)
        .map(PokemonState::types)
        .or_else(|| dex::species(&option.species).map(|s| s.types.to_vec()))
        .unwrap_or_default()
}

/// Whether `status` cannot be inflicted on `target`
pub(crate) fn status_blocked(status: Status, target: &PokemonState, target_side: &SideState) -> bool {
    if target.status.is_some() || target_side.has_condition(arena_battle::SideCondition::Safeguard) {
        return true;
    }
    let types = target.types();
    match status {
        Status::Burn => types.contains(&Type::Fire),
        Status::Paralysis => types.contains(&Type::Electric),
        Status::Freeze => types.contains(&Type::Ice),
        Status::Poison | Status::Toxic => {
            types.contains(&Type::Poison) || types.contains(&Type::Steel)
        }
        Status::Sleep => false,
    }
}

/// First item with the highest score; NaN scores never win
pub(crate) fn best_by_score<T>(items: impl IntoIterator<Item = (T, f32)>) -> Option<(T, f32)> {
    items.into_iter().fold(None, |best, (item, score)| match best {
        Some((_, best_score)) if best_score >= score || score.is_nan() => best,
        _ if score.is_nan() => None,
        _ => Some((item, score)),
    })
}

/// Whether the strategy has any move to score this turn
pub(crate) fn must_switch(actions: &BattleActionSet) -> bool {
    !actions.can_move()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_by_score_keeps_first_max() {
        let best = best_by_score([("a", 1.0), ("b", 3.0), ("c", 3.0), ("d", 2.0)]);
        assert_eq!(best, Some(("b", 3.0)));
        assert_eq!(best_by_score(Vec::<(u8, f32)>::new()), None);
        assert_eq!(best_by_score([(1, f32::NAN), (2, 0.5)]), Some((2, 0.5)));
    }

    #[test]
    fn test_status_immunities() {
        let side = SideState::new(Player::P2);
        let heatran = PokemonState::new("Heatran", "Heatran", 100);
        assert!(status_blocked(Status::Burn, &heatran, &side));
        assert!(status_blocked(Status::Toxic, &heatran, &side));
        assert!(!status_blocked(Status::Paralysis, &heatran, &side));

        let mut jolteon = PokemonState::new("Jolteon", "Jolteon", 100);
        assert!(status_blocked(Status::Paralysis, &jolteon, &side));
        jolteon.status = Some(Status::Sleep);
        assert!(status_blocked(Status::Burn, &jolteon, &side));
    }
}
