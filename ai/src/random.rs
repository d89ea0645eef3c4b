use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use arena_battle::{Action, BattleActionSet, BattleState};

use crate::AiPlayer;
use crate::fallback::{fallback_move, pick_healthiest_switch};

/// Picks uniformly among the legal actions
#[derive(Debug, Clone)]
pub struct RandomAi {
    rng: StdRng,
}

impl RandomAi {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAi {
    fn default() -> Self {
        Self::new()
    }
}

impl AiPlayer for RandomAi {
    fn decide(&mut self, _state: &BattleState, actions: &BattleActionSet) -> Action {
        match actions.legal_actions().choose(&mut self.rng) {
            Some(action) => *action,
            None if actions.can_move() => fallback_move(actions),
            None => pick_healthiest_switch(actions),
        }
    }

    fn choose_lead(&mut self, _state: &BattleState, actions: &BattleActionSet) -> Vec<usize> {
        let mut order: Vec<usize> = (1..=actions.switches.len()).collect();
        if let Some(lead) = (!order.is_empty()).then(|| self.rng.gen_range(0..order.len())) {
            order.swap(0, lead);
        }
        order
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[test]
    fn test_random_only_returns_legal_indices() {
        let (state, actions) = Fixture {
            bench: &[("Pikachu", "0 fnt"), ("Toxapex", "304/304"), ("Heatran", "150/386")],
            ..Fixture::default()
        }
        .build();
        let legal = actions.legal_actions();
        let mut ai = RandomAi::with_seed(7);
        for _ in 0..200 {
            let action = ai.decide(&state, &actions);
            assert!(legal.contains(&action), "{action:?} not legal");
            assert!(actions.validate(&action).is_ok());
            assert_ne!(action, Action::Switch { index: 2 });
        }
    }

    #[test]
    fn test_random_covers_every_choice() {
        let (state, actions) = Fixture {
            bench: &[("Toxapex", "304/304")],
            ..Fixture::default()
        }
        .build();
        let mut ai = RandomAi::with_seed(1);
        let seen: std::collections::HashSet<Action> =
            (0..500).map(|_| ai.decide(&state, &actions)).collect();
        assert_eq!(seen.len(), actions.legal_actions().len());
    }

    #[test]
    fn test_random_forced_switch() {
        let (state, actions) = Fixture {
            me_hp: "0 fnt",
            bench: &[("Toxapex", "304/304")],
            force_switch: true,
            ..Fixture::default()
        }
        .build();
        let mut ai = RandomAi::with_seed(3);
        assert_eq!(ai.decide(&state, &actions), Action::Switch { index: 2 });
    }

    #[test]
    fn test_seeded_players_agree() {
        let (state, actions) = Fixture {
            bench: &[("Toxapex", "304/304"), ("Heatran", "386/386")],
            ..Fixture::default()
        }
        .build();
        let mut a = RandomAi::with_seed(99);
        let mut b = RandomAi::with_seed(99);
        for _ in 0..20 {
            assert_eq!(a.decide(&state, &actions), b.decide(&state, &actions));
        }
    }

    #[test]
    fn test_lead_is_a_permutation() {
        let (state, actions) = Fixture {
            bench: &[("Toxapex", "304/304"), ("Heatran", "386/386")],
            ..Fixture::default()
        }
        .build();
        let mut order = RandomAi::with_seed(5).choose_lead(&state, &actions);
        order.sort_unstable();
        assert_eq!(order, vec![1, 2, 3]);
    }
}
