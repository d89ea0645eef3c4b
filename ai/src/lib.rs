//! Decision strategies for Showdown-style battles.
//!
//! Every strategy implements [`AiPlayer`]: given the tracked [`BattleState`]
//! and the side's [`BattleActionSet`], return one [`Action`].
//!
//! | Strategy        | Approach                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`RandomAi`]    | uniform over the legal actions                             |
//! | [`GreedyAi`]    | highest expected damage                                    |
//! | [`HeuristicAi`] | weighted score of damage, effects, matchup and field       |
//! | [`ExpertAi`]    | bounded Monte-Carlo search, heuristic when out of budget   |
//!
//! When scoring produces nothing usable, strategies fall back on
//! [`fallback_move`] and [`pick_healthiest_switch`].
//!
//! # Example
//!
//! ```
//! use arena_ai::{AiKind, AiPlayer};
//!
//! let ai = "greedy".parse::<AiKind>().unwrap().build(None);
//! assert_eq!(ai.name(), "greedy");
//! ```

mod eval;
mod expert;
mod fallback;
mod forward;
mod greedy;
mod heuristic;
mod kind;
mod random;
mod scoring;

#[cfg(test)]
mod testing;

use arena_battle::{Action, BattleActionSet, BattleState};

pub use eval::{evaluate, win_probability};
pub use expert::{ExpertAi, SearchBudget};
pub use fallback::{fallback_move, pick_healthiest_switch};
pub use greedy::GreedyAi;
pub use heuristic::{HeuristicAi, HeuristicWeights};
pub use kind::{AiKind, UnknownAiKind};
pub use random::RandomAi;

/// A decision strategy for one side of a battle
pub trait AiPlayer: Send {
    /// Pick an action for the pending request
    fn decide(&mut self, state: &BattleState, actions: &BattleActionSet) -> Action;

    /// Lead order for team preview as 1-based party positions
    fn choose_lead(&mut self, _state: &BattleState, actions: &BattleActionSet) -> Vec<usize> {
        (1..=actions.switches.len()).collect()
    }

    fn name(&self) -> &str;
}

impl<T: AiPlayer + ?Sized> AiPlayer for Box<T> {
    fn decide(&mut self, state: &BattleState, actions: &BattleActionSet) -> Action {
        (**self).decide(state, actions)
    }

    fn choose_lead(&mut self, state: &BattleState, actions: &BattleActionSet) -> Vec<usize> {
        (**self).choose_lead(state, actions)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
