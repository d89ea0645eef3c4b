use tracing::debug;

use arena_battle::{Action, BattleActionSet, BattleState};

use crate::AiPlayer;
use crate::fallback::{fallback_move, pick_healthiest_switch};
use crate::scoring::{Matchup, best_by_score, move_data, must_switch};

/// Always picks the move with the highest expected damage
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAi;

impl GreedyAi {
    pub fn new() -> Self {
        Self
    }
}

impl AiPlayer for GreedyAi {
    fn decide(&mut self, state: &BattleState, actions: &BattleActionSet) -> Action {
        if must_switch(actions) {
            return pick_healthiest_switch(actions);
        }

        let matchup = Matchup::new(state, actions.player);
        let scored = actions.usable_moves().map(|option| {
            let damage = move_data(option).map_or(0.0, |mv| matchup.damage(mv));
            (option.index, damage)
        });

        match best_by_score(scored) {
            Some((index, damage)) if damage > 0.0 => {
                debug!(player = %actions.player, index, damage, "greedy pick");
                Action::Move { index, tera: false }
            }
            _ => fallback_move(actions),
        }
    }

    fn name(&self) -> &str {
        "greedy"
    }
}
