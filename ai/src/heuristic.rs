//! Weighted scoring over moves and switches
//!
//! Moves are scored by expected damage plus the value of their secondary
//! effect. Staying in and switching out are compared on the same scale through
//! a position term: type matchup against the foe, remaining HP and status.

use serde::{Deserialize, Serialize};
use tracing::debug;

use arena_battle::dex::{MoveData, MoveEffect};
use arena_battle::query::matchup_ratio;
use arena_battle::{Action, BattleActionSet, BattleState, PokemonState, SwitchOption, Type};

use crate::AiPlayer;
use crate::fallback::{fallback_move, pick_healthiest_switch};
use crate::scoring::{
    Matchup, best_by_score, candidate, candidate_types, move_data, must_switch, status_blocked,
};

/// Tunable weights for [`HeuristicAi`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Per unit of expected damage (fraction of the foe's max HP)
    pub damage: f32,
    pub ko_bonus: f32,
    /// Extra on top of `ko_bonus` for priority moves
    pub priority_ko_bonus: f32,
    pub recoil: f32,
    pub drain: f32,
    /// Scaled by status severity and hit chance
    pub status: f32,
    /// Per stage gained while healthy
    pub boost: f32,
    pub heal: f32,
    pub hazard: f32,
    pub screen: f32,
    pub weather: f32,
    pub protect: f32,
    /// Applied to the log of the type matchup ratio
    pub matchup: f32,
    pub hp: f32,
    /// Paid for leaving the field voluntarily
    pub switch_cost: f32,
    /// Expected damage a matching-type attack needs before tera is spent
    pub tera_threshold: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            damage: 1.0,
            ko_bonus: 0.5,
            priority_ko_bonus: 0.3,
            recoil: 0.8,
            drain: 0.5,
            status: 0.4,
            boost: 0.15,
            heal: 0.8,
            hazard: 0.25,
            screen: 0.2,
            weather: 0.15,
            protect: 0.05,
            matchup: 0.3,
            hp: 0.3,
            switch_cost: 0.25,
            tera_threshold: 0.4,
        }
    }
}

/// Scores every legal action and plays the best one
#[derive(Debug, Clone, Default)]
pub struct HeuristicAi {
    weights: HeuristicWeights,
}

impl HeuristicAi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Value of the move itself, before the position term
    fn score_move(&self, state: &BattleState, m: &Matchup, mv: &MoveData) -> f32 {
        let w = &self.weights;
        let foe_hp = m.foe_hp();
        let missing = 1.0 - m.my_hp();

        let mut dealt = 0.0;
        let mut score = 0.0;
        if mv.is_damaging() {
            let damage = m.damage(mv);
            dealt = damage.min(foe_hp);
            score += w.damage * dealt;
            if m.foe.is_some() && damage >= foe_hp {
                score += w.ko_bonus;
                if mv.priority > 0 {
                    score += w.priority_ko_bonus;
                }
            }
        }

        score += match mv.effect {
            MoveEffect::None => 0.0,
            MoveEffect::Inflict { status, chance } => match m.foe {
                Some(foe) if !status_blocked(status, foe, m.foe_side) => {
                    w.status * status.severity() * f32::from(chance) / 100.0 * mv.hit_chance()
                }
                _ => 0.0,
            },
            MoveEffect::SelfBoost(changes) => changes
                .iter()
                .map(|&(stat, amount)| {
                    let stage = m.me.map_or(0, |p| p.boosts.get(stat));
                    if amount < 0 {
                        -w.boost * 0.5 * f32::from(amount.unsigned_abs())
                    } else if m.my_hp() > 0.5 && stage < 2 {
                        w.boost * f32::from(amount)
                    } else {
                        0.0
                    }
                })
                .sum(),
            MoveEffect::Heal(fraction) => w.heal * fraction.min(missing),
            MoveEffect::Drain(fraction) => w.drain * (fraction * dealt).min(missing),
            MoveEffect::Recoil(fraction) => -w.recoil * fraction * dealt,
            MoveEffect::Hazard(hazard) => {
                let remaining = m.foe_side.alive_count().max(1) as f32;
                if m.foe_side.layers(hazard) < hazard.max_layers() && remaining > 1.0 {
                    w.hazard
                } else {
                    0.0
                }
            }
            MoveEffect::Screen(screen) if !m.my_side.has_condition(screen) => w.screen,
            MoveEffect::Screen(_) => 0.0,
            MoveEffect::Weather(weather) if state.field.weather != Some(weather) => w.weather,
            MoveEffect::Weather(_) => 0.0,
            MoveEffect::Protect => w.protect,
        };
        score
    }

    /// How good it is to have `pokemon` facing the current foe
    fn position(&self, m: &Matchup, types: &[Type], hp: f32, pokemon: Option<&PokemonState>) -> f32 {
        let w = &self.weights;
        let matchup = match m.foe {
            Some(foe) if !types.is_empty() => matchup_ratio(types, &foe.types()).ln(),
            _ => 0.0,
        };
        let status = pokemon
            .and_then(|p| p.status)
            .map_or(0.0, |s| s.severity());
        w.matchup * matchup + w.hp * hp - w.status * status
    }

    fn score_switch(
        &self,
        state: &BattleState,
        m: &Matchup,
        option: &SwitchOption,
        voluntary: bool,
    ) -> f32 {
        let types = candidate_types(state, m.my_side.player, option);
        let entry: f32 = m
            .my_side
            .hazards()
            .map(|(hazard, layers)| hazard.entry_damage(layers, &types))
            .sum();
        let hp = (option.hp_fraction() - entry).max(0.0);
        let cost = if voluntary { self.weights.switch_cost } else { 0.0 };
        self.position(m, &types, hp, candidate(state, m.my_side.player, option)) - entry - cost
    }

    /// Every candidate action with its score, in legal-action order
    pub fn score_actions(&self, state: &BattleState, actions: &BattleActionSet) -> Vec<(Action, f32)> {
        let m = Matchup::new(state, actions.player);
        let voluntary = !actions.force_switch;
        let mut scored = Vec::new();

        if actions.can_move() {
            let stay = self.position(
                &m,
                &m.me.map(PokemonState::types).unwrap_or_default(),
                m.my_hp(),
                m.me,
            );
            let tera_type = m
                .me
                .filter(|p| actions.can_tera && !p.terastallized)
                .and_then(|p| p.tera_type);

            for option in actions.usable_moves() {
                let Some(mv) = move_data(option) else {
                    scored.push((Action::Move { index: option.index, tera: false }, stay));
                    continue;
                };
                let tera = tera_type == Some(mv.move_type)
                    && mv.is_damaging()
                    && m.damage(mv) >= self.weights.tera_threshold;
                let action = Action::Move { index: option.index, tera };
                scored.push((action, stay + self.score_move(state, &m, mv)));
            }
            if scored.is_empty() {
                scored.push((fallback_move(actions), stay));
            }
        }

        if actions.can_switch() && !actions.team_preview {
            for option in actions.eligible_switches() {
                let score = self.score_switch(state, &m, option, voluntary);
                scored.push((Action::Switch { index: option.index }, score));
            }
        }
        scored
    }
}

impl AiPlayer for HeuristicAi {
    fn decide(&mut self, state: &BattleState, actions: &BattleActionSet) -> Action {
        match best_by_score(self.score_actions(state, actions)) {
            Some((action, score)) => {
                debug!(player = %actions.player, %action, score, "heuristic pick");
                action
            }
            None if must_switch(actions) => pick_healthiest_switch(actions),
            None => fallback_move(actions),
        }
    }

    /// Lead with the member that matches up best against the revealed team
    fn choose_lead(&mut self, state: &BattleState, actions: &BattleActionSet) -> Vec<usize> {
        let foes: Vec<Vec<Type>> = state
            .side(actions.player.opponent())
            .pokemon
            .iter()
            .map(PokemonState::types)
            .filter(|t| !t.is_empty())
            .collect();

        let mut ranked: Vec<(usize, f32)> = actions
            .switches
            .iter()
            .map(|option| {
                let types = candidate_types(state, actions.player, option);
                let score = if foes.is_empty() || types.is_empty() {
                    0.0
                } else {
                    foes.iter()
                        .map(|foe| matchup_ratio(&types, foe).ln())
                        .sum::<f32>()
                        / foes.len() as f32
                };
                (option.index, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.into_iter().map(|(index, _)| index).collect()
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn decide(fixture: Fixture) -> Action {
        let (state, actions) = fixture.build();
        HeuristicAi::new().decide(&state, &actions)
    }

    #[test]
    fn test_heuristic_takes_the_strong_hit() {
        assert_eq!(decide(Fixture::default()), Action::Move { index: 2, tera: false });
    }

    #[test]
    fn test_heuristic_does_not_burn_fire_types() {
        let (state, actions) = Fixture {
            me: "Gengar",
            me_hp: "261/261",
            foe: "Heatran",
            foe_hp: "386/386",
            moves: &["Will-O-Wisp", "Toxic", "Thunder Wave"],
            ..Fixture::default()
        }
        .build();
        let scores = HeuristicAi::new().score_actions(&state, &actions);
        assert_eq!(scores.len(), 3);
        // Fire and Steel block burn and poison; only paralysis lands
        assert!(scores[2].1 > scores[0].1);
        assert!(scores[2].1 > scores[1].1);
        assert_eq!(HeuristicAi::new().decide(&state, &actions), Action::Move { index: 3, tera: false });
    }

    #[test]
    fn test_heuristic_switches_out_of_a_hopeless_matchup() {
        // Pikachu cannot touch Garchomp; Corviknight walls it
        let action = decide(Fixture {
            me: "Pikachu",
            me_hp: "211/211",
            foe: "Garchomp",
            foe_hp: "357/357",
            moves: &["Thunderbolt"],
            bench: &[("Corviknight", "399/399")],
            ..Fixture::default()
        });
        assert_eq!(action, Action::Switch { index: 2 });
    }

    #[test]
    fn test_switch_cost_keeps_it_in() {
        let (state, actions) = Fixture {
            me: "Pikachu",
            me_hp: "211/211",
            foe: "Garchomp",
            foe_hp: "357/357",
            moves: &["Thunderbolt"],
            bench: &[("Corviknight", "399/399")],
            ..Fixture::default()
        }
        .build();
        let ai = HeuristicAi::with_weights(HeuristicWeights {
            switch_cost: 1_000.0,
            ..HeuristicWeights::default()
        });
        assert_eq!(ai.weights().switch_cost, 1_000.0);
        let mut ai = ai;
        assert!(matches!(ai.decide(&state, &actions), Action::Move { .. }));
    }

    #[test]
    fn test_heuristic_heals_when_low() {
        let action = decide(Fixture {
            me: "Toxapex",
            me_hp: "60/304",
            foe: "Snorlax",
            foe_hp: "460/460",
            moves: &["Scald", "Recover"],
            ..Fixture::default()
        });
        assert_eq!(action, Action::Move { index: 2, tera: false });
    }

    #[test]
    fn test_forced_switch_prefers_resist() {
        // Both healthy; Corviknight is immune to Garchomp's Ground moves
        let action = decide(Fixture {
            me: "Pikachu",
            me_hp: "0 fnt",
            foe: "Garchomp",
            bench: &[("Heatran", "386/386"), ("Corviknight", "399/399")],
            force_switch: true,
            ..Fixture::default()
        });
        assert_eq!(action, Action::Switch { index: 3 });
    }

    #[test]
    fn test_weights_deserialize_with_defaults() {
        let weights: HeuristicWeights = serde_json::from_str(r#"{"switch_cost": 1.5}"#).unwrap();
        assert_eq!(weights.switch_cost, 1.5);
        assert_eq!(weights.damage, HeuristicWeights::default().damage);
    }

    #[test]
    fn test_lead_against_revealed_team() {
        let (mut state, actions) = Fixture {
            me: "Pikachu",
            me_hp: "211/211",
            bench: &[("Magikarp", "200/200"), ("Garchomp", "357/357")],
            ..Fixture::default()
        }
        .build();
        state.side_mut(arena_battle::Player::P2).pokemon =
            vec![PokemonState::new("Corviknight", "Corviknight", 100)];
        let order = HeuristicAi::new().choose_lead(&state, &actions);
        assert_eq!(order.len(), 3);
        // Electric hits Corviknight super effectively
        assert_eq!(order[0], 1);
    }
}
