//! Simplified forward model used by search playouts
//!
//! Resolves one turn at a time directly on a cloned [`BattleState`]: switches
//! first, then moves by priority and speed, then end-of-turn chip damage and
//! replacement of fainted actives. Abilities, items and volatiles are ignored.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use arena_battle::dex::{self, MoveCategory, MoveData, MoveEffect};
use arena_battle::query::{Combatant, DamageContext, estimate_damage, hit_damage};
use arena_battle::{
    Action, BattleActionSet, BattleState, Phase, Player, PokemonState, StatStages, Status, Type,
    Winner,
};

use crate::scoring::status_blocked;

/// Base power assumed for attacks a pokemon has not revealed yet
const UNREVEALED_POWER: u16 = 80;

/// Chance a playout policy deviates from its best damage move
const EXPLORE_CHANCE: f64 = 0.3;

const CRIT_CHANCE: f64 = 1.0 / 24.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SimAction {
    Move(MoveData),
    /// Party index on the acting side
    Switch(usize),
    Pass,
}

/// Where a playout turn left the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepResult {
    Continue,
    Ended,
    /// A side has no known member left to send in; the rest of its team is unrevealed
    Stalled,
}

fn unrevealed_attack(pokemon: &PokemonState) -> MoveData {
    let stats = dex::default_stats(&pokemon.species, pokemon.level);
    MoveData {
        name: "Unrevealed Attack",
        move_type: pokemon.types().first().copied().unwrap_or(Type::Normal),
        category: if stats.atk >= stats.spa {
            MoveCategory::Physical
        } else {
            MoveCategory::Special
        },
        power: UNREVEALED_POWER,
        accuracy: Some(100),
        pp: 16,
        priority: 0,
        hits: (1, 1),
        effect: MoveEffect::None,
    }
}

fn known_moves(pokemon: &PokemonState) -> Vec<MoveData> {
    let moves: Vec<MoveData> = pokemon
        .moves
        .iter()
        .filter_map(|id| dex::move_data(id))
        .cloned()
        .collect();
    if moves.is_empty() {
        vec![unrevealed_attack(pokemon)]
    } else {
        moves
    }
}

/// Translate a decision from an action set into the model's terms
pub(crate) fn from_action(
    state: &BattleState,
    actions: &BattleActionSet,
    action: &Action,
) -> SimAction {
    let side = state.side(actions.player);
    match *action {
        Action::Move { index, .. } => {
            let mv = actions
                .moves
                .iter()
                .find(|m| m.index == index && m.is_usable())
                .and_then(|m| dex::move_data(&m.id).or_else(|| dex::move_data(&m.name)))
                .or_else(|| {
                    actions
                        .usable_moves()
                        .next()
                        .is_none()
                        .then(|| dex::move_data("struggle"))
                        .flatten()
                });
            match (mv, side.active_pokemon()) {
                (Some(mv), _) => SimAction::Move(mv.clone()),
                (None, Some(active)) => SimAction::Move(unrevealed_attack(active)),
                (None, None) => SimAction::Pass,
            }
        }
        Action::Switch { index } => actions
            .switches
            .iter()
            .find(|s| s.index == index)
            .and_then(|s| side.find_pokemon(&s.name))
            .map_or(SimAction::Pass, SimAction::Switch),
    }
}

/// Options the model considers for a side it has no request for
pub(crate) fn options(state: &BattleState, player: Player) -> Vec<SimAction> {
    let side = state.side(player);
    let mut out: Vec<SimAction> = side
        .active_pokemon()
        .filter(|p| p.is_alive())
        .map(|p| known_moves(p).into_iter().map(SimAction::Move).collect())
        .unwrap_or_default();
    out.extend(side.bench().map(|(i, _)| SimAction::Switch(i)));
    if out.is_empty() {
        out.push(SimAction::Pass);
    }
    out
}

/// Mostly the hardest-hitting move, sometimes anything
pub(crate) fn rollout_policy(state: &BattleState, player: Player, rng: &mut StdRng) -> SimAction {
    let choices = options(state, player);
    if rng.gen_bool(EXPLORE_CHANCE) {
        return choices.choose(rng).cloned().unwrap_or(SimAction::Pass);
    }

    let me = state.active(player);
    let foe = state.active(player.opponent());
    let ctx = DamageContext::against(&state.field, state.side(player.opponent()));
    let mut best: Option<(&SimAction, f32)> = None;
    for choice in &choices {
        let SimAction::Move(mv) = choice else {
            continue;
        };
        let damage = match (me, foe) {
            (Some(me), Some(foe)) => estimate_damage(me, foe, mv, &ctx),
            _ => f32::from(mv.power),
        };
        if best.is_none_or(|(_, b)| damage > b) {
            best = Some((choice, damage));
        }
    }
    best.map(|(c, _)| c.clone())
        .or_else(|| choices.choose(rng).cloned())
        .unwrap_or(SimAction::Pass)
}

fn lose_hp(pokemon: &mut PokemonState, fraction: f32) {
    let loss = (fraction * pokemon.hp_max as f32).ceil().max(0.0) as u32;
    pokemon.hp_current = pokemon.hp_current.saturating_sub(loss);
    if pokemon.hp_current == 0 {
        pokemon.faint();
    }
}

fn gain_hp(pokemon: &mut PokemonState, fraction: f32) {
    let gain = (fraction * pokemon.hp_max as f32).floor().max(0.0) as u32;
    pokemon.hp_current = (pokemon.hp_current + gain).min(pokemon.hp_max);
}

fn switch_in(state: &mut BattleState, player: Player, index: usize) {
    let side = state.side_mut(player);
    if side.pokemon.get(index).is_none_or(|p| !p.can_switch_to()) {
        return;
    }
    side.set_active(0, index);
    let types = side.pokemon[index].types();
    let entry: f32 = side
        .hazards()
        .map(|(hazard, layers)| hazard.entry_damage(layers, &types))
        .sum();
    if entry > 0.0 {
        lose_hp(&mut side.pokemon[index], entry);
    }
}

fn speed(pokemon: &PokemonState) -> f32 {
    let base = f32::from(dex::default_stats(&pokemon.species, pokemon.level).spe);
    let paralysis = if pokemon.status == Some(Status::Paralysis) { 0.5 } else { 1.0 };
    base * StatStages::multiplier(pokemon.boosts.spe) * paralysis
}

/// Whether a status keeps the pokemon from acting this turn
fn immobilized(pokemon: &mut PokemonState, rng: &mut StdRng) -> bool {
    match pokemon.status {
        Some(Status::Paralysis) => rng.gen_bool(0.25),
        Some(Status::Sleep) if rng.gen_bool(1.0 / 3.0) => {
            pokemon.status = None;
            false
        }
        Some(Status::Freeze) if rng.gen_bool(0.2) => {
            pokemon.status = None;
            false
        }
        Some(Status::Sleep | Status::Freeze) => true,
        _ => false,
    }
}

fn use_move(
    state: &mut BattleState,
    player: Player,
    mv: &MoveData,
    protected: bool,
    rng: &mut StdRng,
) -> bool {
    let foe_player = player.opponent();
    let ctx = DamageContext::against(&state.field, state.side(foe_player));
    let (Some(me), Some(foe)) = (state.active(player), state.active(foe_player)) else {
        return false;
    };
    let attacker = Combatant::from_state(me);
    let defender = Combatant::from_state(foe);
    let foe_alive = foe.is_alive();

    // Self-targeted effects resolve even when the foe is protected
    match mv.effect {
        MoveEffect::Protect => return true,
        MoveEffect::SelfBoost(changes) if !mv.is_damaging() => {
            if let Some(me) = state.side_mut(player).active_mut(0) {
                for &(stat, amount) in changes {
                    me.boosts.boost(stat, amount);
                }
            }
            return false;
        }
        MoveEffect::Heal(fraction) => {
            if let Some(me) = state.side_mut(player).active_mut(0) {
                gain_hp(me, fraction);
            }
            return false;
        }
        MoveEffect::Screen(screen) => {
            state.side_mut(player).add_condition(screen);
            return false;
        }
        MoveEffect::Weather(weather) => {
            state.field.weather = Some(weather);
            return false;
        }
        _ => {}
    }
    if protected || !foe_alive {
        return false;
    }

    let accuracy = mv.accuracy.map_or(1.0, |_| {
        mv.hit_chance()
            * StatStages::accuracy_multiplier(attacker.boosts.accuracy - defender.boosts.evasion)
    });
    if !rng.gen_bool(f64::from(accuracy.clamp(0.0, 1.0))) {
        return false;
    }

    let mut dealt = 0.0;
    if mv.is_damaging() {
        let hits = rng.gen_range(mv.hits.0..=mv.hits.1.max(mv.hits.0));
        let points: u32 = (0..hits)
            .map(|_| {
                let roll = rng.gen_range(0.85..=1.0);
                let crit = rng.gen_bool(CRIT_CHANCE);
                hit_damage(&attacker, &defender, mv, &ctx, roll, crit)
            })
            .sum();
        dealt = (points as f32 / f32::from(defender.stats.hp.max(1))).min(1.0);
        if let Some(foe) = state.side_mut(foe_player).active_mut(0) {
            dealt = dealt.min(foe.hp_fraction());
            lose_hp(foe, dealt);
        }
    }

    let share = dealt * f32::from(defender.stats.hp) / f32::from(attacker.stats.hp.max(1));
    match mv.effect {
        MoveEffect::Inflict { status, chance } => {
            let foe_side = state.side(foe_player);
            let blocked = foe_side
                .active_pokemon()
                .is_none_or(|foe| !foe.is_alive() || status_blocked(status, foe, foe_side));
            if !blocked && rng.gen_bool(f64::from(chance.min(100)) / 100.0)
                && let Some(foe) = state.side_mut(foe_player).active_mut(0)
            {
                foe.status = Some(status);
            }
        }
        MoveEffect::SelfBoost(changes) => {
            if let Some(me) = state.side_mut(player).active_mut(0) {
                for &(stat, amount) in changes {
                    me.boosts.boost(stat, amount);
                }
            }
        }
        MoveEffect::Drain(fraction) => {
            if let Some(me) = state.side_mut(player).active_mut(0) {
                gain_hp(me, fraction * share);
            }
        }
        MoveEffect::Recoil(fraction) => {
            if let Some(me) = state.side_mut(player).active_mut(0) {
                lose_hp(me, fraction * share);
            }
        }
        MoveEffect::Hazard(hazard) => {
            state.side_mut(foe_player).add_condition(hazard);
        }
        _ => {}
    }
    false
}

fn residual(state: &mut BattleState) {
    let weather = state.field.weather;
    for player in Player::BOTH {
        let Some(pokemon) = state.side_mut(player).active_mut(0) else {
            continue;
        };
        if !pokemon.is_alive() {
            continue;
        }
        if let Some(status) = pokemon.status {
            lose_hp(pokemon, status.residual_fraction());
        }
        if pokemon.is_alive() && weather.is_some_and(|w| w.chips(&pokemon.types())) {
            lose_hp(pokemon, 1.0 / 16.0);
        }
    }
}

fn has_unrevealed(state: &BattleState, player: Player) -> bool {
    let side = state.side(player);
    side.team_size
        .is_some_and(|size| usize::from(size) > side.pokemon.len())
}

fn check_end(state: &mut BattleState) -> Option<StepResult> {
    let out = Player::BOTH.map(|p| state.side(p).alive_count() == 0);
    let stalled = Player::BOTH
        .into_iter()
        .zip(out)
        .any(|(p, out)| out && has_unrevealed(state, p));
    if stalled {
        return Some(StepResult::Stalled);
    }
    let winner = match out {
        [true, true] => Winner::Draw,
        [true, false] => Winner::P2,
        [false, true] => Winner::P1,
        [false, false] => return None,
    };
    state.winner = Some(winner);
    state.advance_phase(Phase::Ended);
    Some(StepResult::Ended)
}

fn replace_fainted(state: &mut BattleState) {
    for player in Player::BOTH {
        let side = state.side(player);
        if side.active_pokemon().is_some_and(|p| p.is_alive()) {
            continue;
        }
        let healthiest = side
            .bench()
            .fold(None::<(usize, f32)>, |best, (i, p)| match best {
                Some((_, hp)) if hp >= p.hp_fraction() => best,
                _ => Some((i, p.hp_fraction())),
            });
        if let Some((index, _)) = healthiest {
            switch_in(state, player, index);
        }
    }
}

/// Resolve one turn with `choices[i]` for `Player::BOTH[i]`
pub(crate) fn step(state: &mut BattleState, choices: [SimAction; 2], rng: &mut StdRng) -> StepResult {
    for (player, choice) in Player::BOTH.into_iter().zip(&choices) {
        if let SimAction::Switch(index) = *choice {
            switch_in(state, player, index);
        }
    }

    let mut order: Vec<(Player, &MoveData, (i8, f32, f32))> = Player::BOTH
        .into_iter()
        .zip(&choices)
        .filter_map(|(player, choice)| match choice {
            SimAction::Move(mv) => {
                let spe = state.active(player).map_or(0.0, speed);
                Some((player, mv, (mv.priority, spe, rng.r#gen::<f32>())))
            }
            _ => None,
        })
        .collect();
    order.sort_by(|a, b| {
        b.2.0
            .cmp(&a.2.0)
            .then(b.2.1.total_cmp(&a.2.1))
            .then(b.2.2.total_cmp(&a.2.2))
    });

    let mut protected = [false; 2];
    for (player, mv, _) in order {
        let Some(me) = state.side_mut(player).active_mut(0) else {
            continue;
        };
        if !me.is_alive() || immobilized(me, rng) {
            continue;
        }
        if use_move(state, player, mv, protected[player.opponent().index()], rng) {
            protected[player.index()] = true;
        }
    }

    residual(state);
    if let Some(result) = check_end(state) {
        return result;
    }
    replace_fainted(state);
    state.turn += 1;
    StepResult::Continue
}
