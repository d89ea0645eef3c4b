//! Choices every strategy falls back on when its own scoring finds nothing

use arena_battle::{Action, BattleActionSet, SwitchOption};

/// First usable move, or move 1 (Struggle) when none is usable
pub fn fallback_move(actions: &BattleActionSet) -> Action {
    let index = actions.usable_moves().next().map_or(1, |m| m.index);
    Action::Move { index, tera: false }
}

fn healthiest<'a>(candidates: impl Iterator<Item = &'a SwitchOption>) -> Option<&'a SwitchOption> {
    candidates.fold(None, |best, s| match best {
        Some(b) if b.hp_fraction() >= s.hp_fraction() => Some(b),
        _ => Some(s),
    })
}

/// Healthiest member that can come in, or switch 1 when nobody can
///
/// Ties keep party order.
pub fn pick_healthiest_switch(actions: &BattleActionSet) -> Action {
    let index = healthiest(actions.eligible_switches())
        .or_else(|| healthiest(actions.switches.iter().filter(|s| !s.fainted)))
        .map_or(1, |s| s.index);
    Action::Switch { index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_battle::{MoveOption, Player};

    fn slot(index: usize, disabled: bool) -> MoveOption {
        MoveOption {
            index,
            id: format!("move{index}"),
            name: format!("Move {index}"),
            pp: Some(5),
            max_pp: Some(5),
            disabled,
            move_type: None,
            target: "normal".into(),
        }
    }

    fn member(index: usize, hp: u32, fainted: bool, active: bool) -> SwitchOption {
        SwitchOption {
            index,
            species: "Pikachu".into(),
            name: format!("Mon{index}"),
            hp,
            max_hp: 100,
            fainted,
            active,
        }
    }

    fn set(moves: Vec<MoveOption>, switches: Vec<SwitchOption>) -> BattleActionSet {
        BattleActionSet {
            player: Player::P1,
            moves,
            switches,
            can_tera: false,
            force_switch: false,
            team_preview: false,
            trapped: false,
        }
    }

    #[test]
    fn test_fallback_move_skips_disabled() {
        let actions = set(vec![slot(1, true), slot(2, false), slot(3, false)], vec![]);
        assert_eq!(fallback_move(&actions), Action::Move { index: 2, tera: false });
    }

    #[test]
    fn test_fallback_move_struggles() {
        let empty = set(vec![], vec![]);
        assert_eq!(fallback_move(&empty), Action::Move { index: 1, tera: false });
        let disabled = set(vec![slot(1, true), slot(2, true)], vec![]);
        assert_eq!(fallback_move(&disabled), Action::Move { index: 1, tera: false });
    }

    #[test]
    fn test_healthiest_switch_skips_fainted() {
        let actions = set(
            vec![],
            vec![
                member(1, 100, false, true),
                member(2, 0, true, false),
                member(3, 40, false, false),
                member(4, 75, false, false),
                member(5, 75, false, false),
            ],
        );
        assert_eq!(pick_healthiest_switch(&actions), Action::Switch { index: 4 });
    }

    #[test]
    fn test_healthiest_switch_defaults_to_one() {
        let fainted = set(vec![], vec![member(1, 0, true, false), member(2, 0, true, false)]);
        assert_eq!(pick_healthiest_switch(&fainted), Action::Switch { index: 1 });
        assert_eq!(pick_healthiest_switch(&set(vec![], vec![])), Action::Switch { index: 1 });
    }

    #[test]
    fn test_healthiest_switch_never_fainted_when_alive_exists() {
        let actions = set(vec![], vec![member(1, 0, true, false), member(2, 10, false, true)]);
        assert_eq!(pick_healthiest_switch(&actions), Action::Switch { index: 2 });
    }
}
