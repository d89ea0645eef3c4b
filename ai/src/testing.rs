//! Battle fixtures for strategy tests

use arena_battle::{BattleActionSet, BattleState, ProtocolInterpreter};
use arena_protocol::to_id;
use serde_json::json;

pub(crate) struct Fixture<'a> {
    pub me: &'a str,
    pub me_hp: &'a str,
    pub foe: &'a str,
    pub foe_hp: &'a str,
    pub moves: &'a [&'a str],
    /// Bench members as (species, condition)
    pub bench: &'a [(&'a str, &'a str)],
    pub force_switch: bool,
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self {
            me: "Garchomp",
            me_hp: "357/357",
            foe: "Dragapult",
            foe_hp: "317/317",
            moves: &["Earthquake", "Dragon Claw", "Swords Dance", "Stone Edge"],
            bench: &[],
            force_switch: false,
        }
    }
}

impl Fixture<'_> {
    /// State after turn 1 began, plus side 1's action set
    pub fn build(&self) -> (BattleState, BattleActionSet) {
        let mut state = BattleState::new();
        let mut interpreter = ProtocolInterpreter::new();

        let mut pokemon = vec![json!({
            "ident": format!("p1: {}", self.me),
            "details": self.me,
            "condition": self.me_hp,
            "active": true,
            "moves": self.moves.iter().map(|m| to_id(m)).collect::<Vec<_>>(),
        })];
        for (species, condition) in self.bench {
            pokemon.push(json!({
                "ident": format!("p1: {species}"),
                "details": species,
                "condition": condition,
                "active": false,
                "moves": [],
            }));
        }
        let moves: Vec<_> = self
            .moves
            .iter()
            .map(|m| {
                json!({"move": m, "id": to_id(m), "pp": 8, "maxpp": 8, "target": "normal", "disabled": false})
            })
            .collect();

        let mut request = json!({
            "side": {"name": "Alice", "id": "p1", "pokemon": pokemon},
            "rqid": 1,
        });
        if self.force_switch {
            request["forceSwitch"] = json!([true]);
        } else {
            request["active"] = json!([{"moves": moves}]);
        }

        let lines = [
            "|player|p1|Alice|".to_string(),
            "|player|p2|Bob|".to_string(),
            "|gametype|singles".to_string(),
            "|start".to_string(),
            format!("|switch|p1a: {}|{}|{}", self.me, self.me, self.me_hp),
            format!("|switch|p2a: {}|{}|{}", self.foe, self.foe, self.foe_hp),
            "|turn|1".to_string(),
            format!("|request|{request}"),
        ];
        let mut actions = None;
        for line in &lines {
            let done = interpreter
                .feed(&mut state, line)
                .expect("fixture lines parse");
            if let Some((_, request)) = done.and_then(|d| d.request) {
                actions = BattleActionSet::from_request(&request);
            }
        }
        (state, actions.expect("fixture produces a request"))
    }
}
