//! Bounded forward search
//!
//! Flat Monte-Carlo search with UCB1 selection over the legal root actions.
//! Each iteration clones the state, plays the root action against a sampled
//! reply, continues with the playout policy for a few turns and scores the
//! result with the static evaluator.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use arena_battle::{Action, BattleActionSet, BattleState, Player};

use crate::AiPlayer;
use crate::eval::evaluate;
use crate::forward::{SimAction, StepResult, from_action, rollout_policy, step};
use crate::heuristic::HeuristicAi;

/// Limits for one decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Simulated turns across all playouts
    pub max_nodes: u32,
    pub time_limit_ms: u64,
    /// Turns simulated per playout, including the root turn
    pub playout_depth: u32,
    /// UCB1 exploration constant
    pub exploration: f32,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_nodes: 2000,
            time_limit_ms: 150,
            playout_depth: 3,
            exploration: 1.4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RootStats {
    visits: u32,
    total: f32,
}

impl RootStats {
    fn mean(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.total / self.visits as f32
        }
    }

    fn ucb(&self, parent_visits: u32, exploration: f32) -> f32 {
        if self.visits == 0 {
            return f32::INFINITY;
        }
        self.mean() + exploration * ((parent_visits as f32).ln() / self.visits as f32).sqrt()
    }
}

/// Search-based player that falls back to [`HeuristicAi`]
#[derive(Debug, Clone)]
pub struct ExpertAi {
    budget: SearchBudget,
    heuristic: HeuristicAi,
    rng: StdRng,
}

impl ExpertAi {
    pub fn new(budget: SearchBudget) -> Self {
        Self {
            budget,
            heuristic: HeuristicAi::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(budget: SearchBudget, seed: u64) -> Self {
        Self {
            budget,
            heuristic: HeuristicAi::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// One playout from `state`; returns its value in 0.0..=1.0 and the turns simulated
    fn playout(&mut self, state: &BattleState, player: Player, first: &SimAction) -> (f32, u32) {
        let mut sim = state.clone();
        let mut turns = 0;
        while turns < self.budget.playout_depth.max(1) {
            let mine = if turns == 0 {
                first.clone()
            } else {
                rollout_policy(&sim, player, &mut self.rng)
            };
            let theirs = rollout_policy(&sim, player.opponent(), &mut self.rng);
            let choices = match player {
                Player::P1 => [mine, theirs],
                Player::P2 => [theirs, mine],
            };
            turns += 1;
            if step(&mut sim, choices, &mut self.rng) != StepResult::Continue {
                break;
            }
        }
        ((evaluate(&sim, player) + 1.0) / 2.0, turns)
    }

    /// Root action with the best mean playout value, or `None` if no playout finished
    fn search(&mut self, state: &BattleState, actions: &BattleActionSet, roots: &[Action]) -> Option<Action> {
        let sims: Vec<SimAction> = roots.iter().map(|a| from_action(state, actions, a)).collect();
        let mut stats = vec![RootStats::default(); roots.len()];
        let deadline = Instant::now() + Duration::from_millis(self.budget.time_limit_ms);
        let mut nodes = 0;
        let mut playouts = 0;

        while nodes < self.budget.max_nodes && Instant::now() < deadline {
            let exploration = self.budget.exploration;
            let Some(pick) = (0..stats.len()).max_by(|&a, &b| {
                stats[a]
                    .ucb(playouts, exploration)
                    .total_cmp(&stats[b].ucb(playouts, exploration))
                    // Earlier roots win ties
                    .then(b.cmp(&a))
            }) else {
                return None;
            };
            let (value, turns) = self.playout(state, actions.player, &sims[pick]);
            stats[pick].visits += 1;
            stats[pick].total += value;
            nodes += turns;
            playouts += 1;
        }

        if playouts == 0 {
            return None;
        }
        let best = (0..roots.len())
            .filter(|&i| stats[i].visits > 0)
            .max_by(|&a, &b| {
                stats[a]
                    .mean()
                    .total_cmp(&stats[b].mean())
                    .then(stats[a].visits.cmp(&stats[b].visits))
                    .then(b.cmp(&a))
            })?;
        debug!(
            player = %actions.player,
            playouts,
            nodes,
            action = %roots[best],
            visits = stats[best].visits,
            value = stats[best].mean(),
            "search finished"
        );
        Some(roots[best])
    }
}

impl Default for ExpertAi {
    fn default() -> Self {
        Self::new(SearchBudget::default())
    }
}

impl AiPlayer for ExpertAi {
    fn decide(&mut self, state: &BattleState, actions: &BattleActionSet) -> Action {
        if actions.force_switch || actions.team_preview {
            return self.heuristic.decide(state, actions);
        }
        let roots = actions.legal_actions();
        if roots.len() <= 1 {
            return roots
                .first()
                .copied()
                .unwrap_or_else(|| self.heuristic.decide(state, actions));
        }

        let Some(action) = self.search(state, actions, &roots) else {
            debug!(player = %actions.player, "no playout finished, using heuristic");
            return self.heuristic.decide(state, actions);
        };

        // Take tera when the heuristic would for the same move
        match action {
            Action::Move { index, .. } => {
                let tera = self
                    .heuristic
                    .score_actions(state, actions)
                    .iter()
                    .any(|(a, _)| *a == Action::Move { index, tera: true });
                Action::Move { index, tera }
            }
            switch => switch,
        }
    }

    fn choose_lead(&mut self, state: &BattleState, actions: &BattleActionSet) -> Vec<usize> {
        self.heuristic.choose_lead(state, actions)
    }

    fn name(&self) -> &str {
        "expert"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn quick() -> SearchBudget {
        SearchBudget {
            max_nodes: 600,
            time_limit_ms: 5_000,
            ..SearchBudget::default()
        }
    }

    #[test]
    fn test_expert_returns_a_legal_action() {
        let (state, actions) = Fixture {
            bench: &[("Toxapex", "304/304")],
            ..Fixture::default()
        }
        .build();
        let mut ai = ExpertAi::with_seed(quick(), 11);
        let action = ai.decide(&state, &actions);
        assert!(actions.validate(&action).is_ok(), "{action:?}");
    }

    #[test]
    fn test_expert_avoids_useless_moves() {
        // Earthquake does nothing to Corviknight; Stone Edge hits
        let (state, actions) = Fixture {
            foe: "Corviknight",
            foe_hp: "374/374",
            moves: &["Earthquake", "Stone Edge"],
            ..Fixture::default()
        }
        .build();
        let mut ai = ExpertAi::with_seed(quick(), 5);
        assert_eq!(ai.decide(&state, &actions), Action::Move { index: 2, tera: false });
    }

    #[test]
    fn test_zero_budget_matches_heuristic() {
        let (state, actions) = Fixture {
            bench: &[("Toxapex", "304/304")],
            ..Fixture::default()
        }
        .build();
        let budget = SearchBudget {
            max_nodes: 0,
            ..SearchBudget::default()
        };
        let mut expert = ExpertAi::with_seed(budget, 1);
        let mut heuristic = HeuristicAi::new();
        assert_eq!(expert.decide(&state, &actions), heuristic.decide(&state, &actions));
    }

    #[test]
    fn test_forced_switch_defers_to_heuristic() {
        let (state, actions) = Fixture {
            me: "Pikachu",
            me_hp: "0 fnt",
            foe: "Garchomp",
            bench: &[("Heatran", "386/386"), ("Corviknight", "399/399")],
            force_switch: true,
            ..Fixture::default()
        }
        .build();
        let mut ai = ExpertAi::with_seed(quick(), 2);
        assert_eq!(ai.decide(&state, &actions), Action::Switch { index: 3 });
    }

    #[test]
    fn test_budget_deserializes_with_defaults() {
        let budget: SearchBudget = serde_json::from_str(r#"{"playout_depth": 5}"#).unwrap();
        assert_eq!(budget.playout_depth, 5);
        assert_eq!(budget.max_nodes, 2000);
    }
}
