//! Static position evaluation

use arena_battle::query::matchup_ratio;
use arena_battle::{BattleState, Player, SideState};

/// Steepness of the evaluation-to-probability curve
const WIN_PROBABILITY_SCALE: f32 = 4.0;

fn side_score(side: &SideState) -> f32 {
    let known = side.pokemon.len();
    let size = side
        .team_size
        .map_or(known, usize::from)
        .max(known)
        .max(1);
    // Unrevealed members are assumed healthy
    let unrevealed = (size - known) as f32;
    let size = size as f32;

    let hp: f32 = side.pokemon.iter().map(|p| p.hp_fraction()).sum::<f32>() + unrevealed;
    let alive = side.alive_count() as f32 + unrevealed;
    let status: f32 = side
        .pokemon
        .iter()
        .filter(|p| p.is_alive())
        .filter_map(|p| p.status)
        .map(|s| s.severity())
        .sum();
    let boosts = side
        .active_pokemon()
        .filter(|p| p.is_alive())
        .map_or(0.0, |p| (p.boosts.net() as f32 * 0.02).clamp(-0.15, 0.15));
    let hazards: f32 = side.hazards().map(|(_, layers)| f32::from(layers) * 0.02).sum();

    0.6 * hp / size + 0.4 * alive / size - 0.1 * status / size + boosts - hazards
}

/// Position value for `player`, from -1.0 (lost) to 1.0 (won)
pub fn evaluate(state: &BattleState, player: Player) -> f32 {
    if let Some(winner) = state.winner {
        return match winner.player() {
            Some(p) if p == player => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        };
    }

    let mut score = side_score(state.side(player)) - side_score(state.side(player.opponent()));
    if let (Some(me), Some(foe)) = (state.active(player), state.active(player.opponent()))
        && me.is_alive()
        && foe.is_alive()
    {
        score += 0.05 * matchup_ratio(&me.types(), &foe.types()).ln();
    }
    score.clamp(-1.0, 1.0)
}

/// Estimated chance that side 1 wins
pub fn win_probability(state: &BattleState) -> f32 {
    if state.winner.is_some() {
        return (evaluate(state, Player::P1) + 1.0) / 2.0;
    }
    let value = evaluate(state, Player::P1);
    1.0 / (1.0 + (-WIN_PROBABILITY_SCALE * value).exp())
}
