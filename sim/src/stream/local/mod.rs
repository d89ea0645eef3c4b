//! Built-in simplified singles engine
//!
//! Speaks the same line protocol as the external simulator so battles can run
//! without a Node install. The rules are a reduced ruleset: stats, typing,
//! STAB, stat stages, major status, weather, screens, entry hazards, Protect
//! and terastallization. Abilities and items are carried but have no effect.

mod mon;
mod turn;

use std::collections::VecDeque;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use arena_battle::{Player, Weather};
use arena_team::unpack_team;

use self::mon::{Mon, Side};
use super::{ProtocolStream, StreamError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalEngineConfig {
    /// Seed used when `>start` carries none; entropy when both are absent
    pub seed: Option<u64>,
    /// The battle is called a tie once this many turns have been played
    pub max_turns: u32,
    /// Ask both sides for a lead order before the battle starts
    pub team_preview: bool,
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_turns: 200,
            team_preview: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Setup,
    Preview,
    Battle,
    Ended,
}

/// What a side has been asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Nothing,
    Move,
    Switch,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Decision {
    /// 1-based move slot
    Move { slot: usize, tera: bool },
    /// 1-based request slot
    Switch(usize),
    Team(Vec<usize>),
}

pub struct LocalEngine {
    config: LocalEngineConfig,
    rng: StdRng,
    format_id: String,
    entrants: [Option<Side>; 2],
    /// Both sides in player order once the battle has begun
    sides: Vec<Side>,
    stage: Stage,
    turn: u32,
    rqid: u64,
    weather: Option<(Weather, u8)>,
    pending: [Pending; 2],
    decisions: [Option<Decision>; 2],
    /// Lines of the update chunk being built
    chunk: Vec<String>,
    output: VecDeque<String>,
    destroyed: bool,
}

fn seed_from_words(words: &[u64]) -> u64 {
    words
        .chunks(2)
        .map(|pair| (pair[0] << 32) | pair.get(1).copied().unwrap_or(0))
        .fold(0, |acc, word| acc ^ word)
}

/// Generation number from a format id ("gen9customgame" -> 9)
fn generation(format_id: &str) -> u8 {
    format_id
        .strip_prefix("gen")
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(9)
}

impl LocalEngine {
    pub fn new(config: LocalEngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            format_id: String::new(),
            entrants: [None, None],
            sides: Vec::new(),
            stage: Stage::Setup,
            turn: 0,
            rqid: 0,
            weather: None,
            pending: [Pending::Nothing; 2],
            decisions: [None, None],
            chunk: Vec::new(),
            output: VecDeque::new(),
            destroyed: false,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(LocalEngineConfig {
            seed: Some(seed),
            ..LocalEngineConfig::default()
        })
    }

    /// Apply one command line, queueing whatever output it produces
    fn handle(&mut self, line: &str) {
        let line = line.trim();
        let Some(command) = line.strip_prefix('>') else {
            debug!(line, "ignoring input that is not a command");
            return;
        };
        let (head, rest) = command.split_once(' ').unwrap_or((command, ""));
        match head {
            "start" => self.start(rest),
            "player" => self.add_player(rest),
            "forcewin" => match Player::parse(rest.trim()) {
                Some(player) => self.force_end(Some(player)),
                None => debug!(rest, "forcewin without a side"),
            },
            "forcetie" => self.force_end(None),
            _ => match Player::parse(head) {
                Some(player) => self.choose(player, rest.trim()),
                None => debug!(command = head, "ignoring unsupported command"),
            },
        }
    }

    fn start(&mut self, options: &str) {
        if !self.format_id.is_empty() {
            debug!("battle already started");
            return;
        }
        let options: Value = serde_json::from_str(options).unwrap_or(Value::Null);
        self.format_id = options["formatid"]
            .as_str()
            .unwrap_or("gen9customgame")
            .to_string();
        if let Some(words) = options["seed"].as_array() {
            let words: Vec<u64> = words.iter().filter_map(Value::as_u64).collect();
            if !words.is_empty() {
                self.rng = StdRng::seed_from_u64(seed_from_words(&words));
            }
        }
    }

    fn add_player(&mut self, rest: &str) {
        let (slot, options) = rest.split_once(' ').unwrap_or((rest, "{}"));
        let Some(player) = Player::parse(slot) else {
            self.error_line(None, format!("[Invalid player] {slot}"));
            return;
        };
        if self.stage != Stage::Setup || self.entrants[player.index()].is_some() {
            self.error_line(Some(player), "[Invalid player] side is already set".to_string());
            return;
        }

        let options: Value = serde_json::from_str(options).unwrap_or(Value::Null);
        let name = options["name"].as_str().unwrap_or(match player {
            Player::P1 => "Player 1",
            Player::P2 => "Player 2",
        });
        let team = match unpack_team(options["team"].as_str().unwrap_or_default()) {
            Ok(slots) if !slots.is_empty() => slots,
            Ok(_) => {
                self.error_line(Some(player), "[Invalid team] team is empty".to_string());
                return;
            }
            Err(e) => {
                self.error_line(Some(player), format!("[Invalid team] {e}"));
                return;
            }
        };

        let team = team.iter().map(Mon::from_slot).collect();
        self.entrants[player.index()] = Some(Side::new(player, name.to_string(), team));
        if self.entrants.iter().all(Option::is_some) {
            self.begin();
        }
    }

    fn begin(&mut self) {
        self.sides = self.entrants.iter_mut().filter_map(Option::take).collect();
        if self.format_id.is_empty() {
            self.format_id = "gen9customgame".to_string();
        }

        let mut lines = Vec::new();
        for side in &self.sides {
            lines.push(format!("|player|{}|{}|", side.player, side.name));
        }
        for side in &self.sides {
            lines.push(format!("|teamsize|{}|{}", side.player, side.team.len()));
        }
        lines.push("|gametype|singles".to_string());
        lines.push(format!("|gen|{}", generation(&self.format_id)));
        lines.push(format!("|tier|{}", self.format_id));
        self.chunk.extend(lines);

        if self.config.team_preview {
            self.emit("|clearpoke");
            let pokes: Vec<String> = self
                .sides
                .iter()
                .flat_map(|side| {
                    side.team
                        .iter()
                        .map(move |mon| format!("|poke|{}|{}|", side.player, mon.details()))
                })
                .collect();
            self.chunk.extend(pokes);
            self.emit("|teampreview");
            self.flush();
            self.stage = Stage::Preview;
            self.pending = [Pending::Preview; 2];
            self.send_requests();
        } else {
            self.start_battle();
        }
    }

    fn start_battle(&mut self) {
        self.stage = Stage::Battle;
        self.emit("|start");
        for i in 0..self.sides.len() {
            let side = &self.sides[i];
            let line = format!(
                "|switch|{}|{}|{}",
                side.active_ident(),
                side.active().details(),
                side.active().condition()
            );
            self.emit(line);
        }
        self.turn = 1;
        self.emit("|turn|1");
        self.flush();
        self.pending = [Pending::Move; 2];
        self.send_requests();
    }

    fn force_end(&mut self, winner: Option<Player>) {
        if self.stage == Stage::Setup || self.stage == Stage::Ended {
            debug!("nothing to end");
            return;
        }
        match winner {
            Some(player) => {
                let name = self.sides[player.index()].name.clone();
                self.emit(format!("|win|{name}"));
            }
            None => self.emit("|tie"),
        }
        self.finish();
    }

    /// Close out the battle after a `|win|` or `|tie|` line
    fn finish(&mut self) {
        self.stage = Stage::Ended;
        self.pending = [Pending::Nothing; 2];
        self.decisions = [None, None];
        self.flush();
    }

    fn choose(&mut self, player: Player, choice: &str) {
        let pending = self.pending[player.index()];
        if pending == Pending::Nothing {
            self.error_line(
                Some(player),
                "[Invalid choice] Can't do anything: It's not your turn".to_string(),
            );
            return;
        }
        match self.parse_decision(player, pending, choice) {
            Ok(decision) => self.decisions[player.index()] = Some(decision),
            Err(reason) => {
                self.error_line(Some(player), format!("[Invalid choice] {reason}"));
                return;
            }
        }

        let ready = Player::BOTH.into_iter().all(|p| {
            self.pending[p.index()] == Pending::Nothing || self.decisions[p.index()].is_some()
        });
        if !ready {
            return;
        }
        let decisions = [self.decisions[0].take(), self.decisions[1].take()];
        match self.stage {
            Stage::Preview => self.apply_team_orders(decisions),
            Stage::Battle if self.pending.contains(&Pending::Move) => self.run_turn(decisions),
            Stage::Battle => self.run_replacements(decisions),
            Stage::Setup | Stage::Ended => {}
        }
    }

    fn parse_decision(
        &self,
        player: Player,
        pending: Pending,
        choice: &str,
    ) -> Result<Decision, String> {
        let side = &self.sides[player.index()];
        let mut words = choice.split_whitespace();
        let kind = words.next().unwrap_or("default");
        let arg = words.next();

        match (pending, kind) {
            (Pending::Preview, "default") => Ok(Decision::Team((1..=side.team.len()).collect())),
            (Pending::Preview, "team") => {
                parse_team_order(arg.unwrap_or_default(), side.team.len()).map(Decision::Team)
            }
            (Pending::Switch, "default") => side
                .first_replacement()
                .map(Decision::Switch)
                .ok_or_else(|| "Can't switch: no pokemon left".to_string()),
            (Pending::Move, "default") => Ok(Decision::Move {
                slot: side.active().usable_moves().next().map_or(1, |(slot, _)| slot),
                tera: false,
            }),
            (Pending::Move, "move") => {
                let slot: usize = arg
                    .and_then(|a| a.parse().ok())
                    .ok_or_else(|| format!("Can't move: invalid move slot {arg:?}"))?;
                let tera = words.next() == Some("terastallize");
                let mon = side.active();
                let usable = if mon.is_struggling() {
                    slot == 1
                } else {
                    mon.moves.get(slot.wrapping_sub(1)).is_some_and(|m| m.pp > 0)
                };
                if !usable {
                    return Err(format!("Can't move: move {slot} is not usable"));
                }
                if tera && !side.can_tera() {
                    return Err("Can't move: can't terastallize".to_string());
                }
                Ok(Decision::Move { slot, tera })
            }
            (Pending::Move | Pending::Switch, "switch") => {
                let slot: usize = arg
                    .and_then(|a| a.parse().ok())
                    .ok_or_else(|| format!("Can't switch: invalid slot {arg:?}"))?;
                if side.can_switch_to(slot) {
                    Ok(Decision::Switch(slot))
                } else {
                    Err(format!("Can't switch: slot {slot} can't come in"))
                }
            }
            _ => Err(format!("Can't {kind} now")),
        }
    }

    fn apply_team_orders(&mut self, decisions: [Option<Decision>; 2]) {
        for (side, decision) in self.sides.iter_mut().zip(decisions) {
            let Some(Decision::Team(order)) = decision else {
                continue;
            };
            let mut team: Vec<Mon> = order.iter().map(|&slot| side.team[slot - 1].clone()).collect();
            team.extend(
                side.team
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !order.contains(&(i + 1)))
                    .map(|(_, mon)| mon.clone()),
            );
            side.team = team;
        }
        self.start_battle();
    }

    fn emit(&mut self, line: impl Into<String>) {
        self.chunk.push(line.into());
    }

    /// Move the pending lines out as one `update` chunk
    fn flush(&mut self) {
        if self.chunk.is_empty() {
            return;
        }
        self.output.push_back("update".to_string());
        self.output.extend(self.chunk.drain(..));
        self.output.push_back(String::new());
    }

    fn side_update(&mut self, player: Player, line: String) {
        self.output.push_back("sideupdate".to_string());
        self.output.push_back(player.to_string());
        self.output.push_back(line);
        self.output.push_back(String::new());
    }

    fn error_line(&mut self, player: Option<Player>, message: String) {
        debug!(?player, %message, "rejected command");
        match player {
            Some(player) => self.side_update(player, format!("|error|{message}")),
            None => {
                self.output.push_back(format!("|error|{message}"));
                self.output.push_back(String::new());
            }
        }
    }

    fn send_requests(&mut self) {
        for player in Player::BOTH {
            self.rqid += 1;
            let side = &self.sides[player.index()];
            let started = self.stage == Stage::Battle;
            let request = match self.pending[player.index()] {
                Pending::Move => json!({
                    "active": [side.request_active()],
                    "side": side.request_side(started),
                    "rqid": self.rqid,
                }),
                Pending::Switch => json!({
                    "forceSwitch": [true],
                    "side": side.request_side(started),
                    "rqid": self.rqid,
                }),
                Pending::Preview => json!({
                    "teamPreview": true,
                    "side": side.request_side(false),
                    "rqid": self.rqid,
                }),
                Pending::Nothing => json!({
                    "wait": true,
                    "side": side.request_side(started),
                    "rqid": self.rqid,
                }),
            };
            self.side_update(player, format!("|request|{request}"));
        }
    }
}

/// Lead order from "3,1,2" or "312", completed with the unnamed slots
fn parse_team_order(order: &str, team_size: usize) -> Result<Vec<usize>, String> {
    let parts: Vec<&str> = if order.contains(',') {
        order.split(',').collect()
    } else {
        order
            .char_indices()
            .map(|(i, c)| &order[i..i + c.len_utf8()])
            .collect()
    };

    let mut slots = Vec::new();
    for part in parts.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        let slot: usize = part
            .parse()
            .map_err(|_| format!("Can't choose team order: {part:?} is not a slot"))?;
        if slot == 0 || slot > team_size {
            return Err(format!("Can't choose team order: slot {slot} does not exist"));
        }
        if slots.contains(&slot) {
            return Err(format!("Can't choose team order: slot {slot} is repeated"));
        }
        slots.push(slot);
    }
    if slots.is_empty() {
        return Err("Can't choose team order: no slots given".to_string());
    }
    Ok(slots)
}

#[async_trait]
impl ProtocolStream for LocalEngine {
    async fn write(&mut self, line: &str) -> Result<(), StreamError> {
        if self.destroyed {
            return Err(StreamError::Closed);
        }
        self.handle(line);
        Ok(())
    }

    /// Waits for the next command once everything produced so far is read
    async fn next_line(&mut self) -> Option<String> {
        if self.destroyed {
            return None;
        }
        match self.output.pop_front() {
            Some(line) => Some(line),
            None => std::future::pending().await,
        }
    }

    async fn destroy(&mut self) {
        self.destroyed = true;
        self.output.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_team::{TeamSlotData, pack_team};

    fn team(species: &[(&str, &[&str])]) -> String {
        let slots: Vec<TeamSlotData> = species
            .iter()
            .map(|(name, moves)| {
                let mut slot = TeamSlotData::new(*name).with_moves(*moves);
                slot.level = 50;
                slot
            })
            .collect();
        pack_team(&slots)
    }

    fn player_line(player: &str, name: &str, team: &str) -> String {
        format!(">player {player} {}", json!({"name": name, "team": team}))
    }

    fn drain(engine: &mut LocalEngine) -> Vec<String> {
        engine.output.drain(..).collect()
    }

    fn requests(lines: &[String]) -> Vec<Value> {
        lines
            .iter()
            .filter_map(|l| l.strip_prefix("|request|"))
            .map(|json| serde_json::from_str(json).unwrap())
            .collect()
    }

    fn setup(config: LocalEngineConfig, p1: &str, p2: &str) -> (LocalEngine, Vec<String>) {
        let mut engine = LocalEngine::new(config);
        engine.handle(r#">start {"formatid":"gen9customgame","seed":[1,2,3,4]}"#);
        engine.handle(&player_line("p1", "Alice", p1));
        engine.handle(&player_line("p2", "Bob", p2));
        let lines = drain(&mut engine);
        (engine, lines)
    }

    #[test]
    fn test_battle_opens_with_requests() {
        let (engine, lines) = setup(
            LocalEngineConfig::default(),
            &team(&[("Garchomp", &["Earthquake"]), ("Corviknight", &["Brave Bird"])]),
            &team(&[("Dragapult", &["Shadow Ball"])]),
        );
        assert_eq!(lines[0], "update");
        assert!(lines.contains(&"|player|p1|Alice|".to_string()));
        assert!(lines.contains(&"|teamsize|p1|2".to_string()));
        assert!(lines.contains(&"|gen|9".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("|switch|p2a: Dragapult|Dragapult, L50|")));
        assert!(lines.contains(&"|turn|1".to_string()));

        let requests = requests(&lines);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["side"]["id"], "p1");
        assert_eq!(requests[0]["active"][0]["moves"][0]["id"], "earthquake");
        assert_eq!(requests[0]["side"]["pokemon"][0]["active"], true);
        assert_eq!(requests[0]["side"]["pokemon"][1]["active"], false);
        assert_eq!(engine.turn, 1);
    }

    #[test]
    fn test_invalid_choice_is_reported_to_that_side() {
        let (mut engine, _) = setup(
            LocalEngineConfig::default(),
            &team(&[("Garchomp", &["Earthquake"])]),
            &team(&[("Dragapult", &["Shadow Ball"])]),
        );
        engine.handle(">p1 move 4");
        engine.handle(">p1 switch 2");
        let lines = drain(&mut engine);
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("|error|[Invalid choice]")).count(),
            2
        );
        assert_eq!(lines[1], "p1");
        assert_eq!(engine.turn, 1);
    }

    #[test]
    fn test_turn_resolves_once_both_sides_choose() {
        let (mut engine, _) = setup(
            LocalEngineConfig::default(),
            &team(&[("Garchomp", &["Dragon Claw"])]),
            &team(&[("Dragapult", &["Dragon Darts"])]),
        );
        engine.handle(">p1 move 1");
        assert!(drain(&mut engine).is_empty());
        engine.handle(">p2 move 1");
        let lines = drain(&mut engine);
        assert!(lines.iter().any(|l| l.starts_with("|move|p1a: Garchomp|Dragon Claw|")));
        assert!(lines.iter().any(|l| l.starts_with("|move|p2a: Dragapult|Dragon Darts|")));
        assert!(lines.iter().any(|l| l == "|-supereffective|p1a: Garchomp"));
        assert!(lines.iter().any(|l| l.starts_with("|-damage|p2a: Dragapult|")));
        let ended = lines.iter().any(|l| l.starts_with("|win|"));
        assert!(ended || lines.contains(&"|turn|2".to_string()));
    }

    #[test]
    fn test_one_pokemon_each_ends_with_a_winner() {
        let (mut engine, _) = setup(
            LocalEngineConfig::default(),
            &team(&[("Garchomp", &["Earthquake"])]),
            &team(&[("Heatran", &["Flash Cannon"])]),
        );
        let mut transcript = Vec::new();
        for _ in 0..20 {
            engine.handle(">p1 move 1");
            engine.handle(">p2 move 1");
            transcript.extend(drain(&mut engine));
            if engine.stage == Stage::Ended {
                break;
            }
        }
        assert_eq!(engine.stage, Stage::Ended);
        assert!(transcript.contains(&"|faint|p2a: Heatran".to_string()));
        assert!(transcript.contains(&"|win|Alice".to_string()));
    }

    #[test]
    fn test_forced_switch_after_a_faint() {
        let (mut engine, _) = setup(
            LocalEngineConfig::default(),
            &team(&[("Heatran", &["Flash Cannon"])]),
            &team(&[("Garchomp", &["Earthquake"]), ("Corviknight", &["Brave Bird"])]),
        );
        engine.sides[0].active_mut().hp = 1;
        engine.sides[1].team[0].stats.spe = 1;
        engine.sides[1].active_mut().hp = 1;
        engine.handle(">p1 move 1");
        engine.handle(">p2 move 1");
        let lines = drain(&mut engine);
        assert!(lines.contains(&"|faint|p2a: Garchomp".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("|turn|")));

        let requests = requests(&lines);
        assert_eq!(requests[0]["wait"], true);
        assert_eq!(requests[1]["forceSwitch"][0], true);

        engine.handle(">p2 switch 2");
        let lines = drain(&mut engine);
        assert!(lines.iter().any(|l| l.starts_with("|switch|p2a: Corviknight|")));
        assert!(lines.contains(&"|turn|2".to_string()));
    }

    #[test]
    fn test_team_preview_reorders_leads() {
        let (mut engine, lines) = setup(
            LocalEngineConfig {
                team_preview: true,
                ..LocalEngineConfig::default()
            },
            &team(&[("Garchomp", &["Earthquake"]), ("Corviknight", &["Brave Bird"])]),
            &team(&[("Dragapult", &["Shadow Ball"])]),
        );
        assert!(lines.contains(&"|teampreview".to_string()));
        assert_eq!(requests(&lines)[0]["teamPreview"], true);

        engine.handle(">p1 team 21");
        engine.handle(">p2 default");
        let lines = drain(&mut engine);
        assert!(lines.iter().any(|l| l.starts_with("|switch|p1a: Corviknight|")));
        assert!(lines.contains(&"|turn|1".to_string()));
    }

    #[test]
    fn test_turn_cap_forces_a_tie() {
        let (mut engine, _) = setup(
            LocalEngineConfig {
                max_turns: 2,
                ..LocalEngineConfig::default()
            },
            &team(&[("Blissey", &["Protect"])]),
            &team(&[("Toxapex", &["Protect"])]),
        );
        for _ in 0..2 {
            engine.handle(">p1 move 1");
            engine.handle(">p2 move 1");
        }
        let lines = drain(&mut engine);
        assert_eq!(lines.iter().filter(|l| *l == "|tie").count(), 1);
        assert_eq!(engine.stage, Stage::Ended);
    }

    #[test]
    fn test_forcewin_and_bad_teams() {
        let (mut engine, _) = setup(
            LocalEngineConfig::default(),
            &team(&[("Garchomp", &["Earthquake"])]),
            &team(&[("Dragapult", &["Shadow Ball"])]),
        );
        engine.handle(">forcewin p2");
        assert!(drain(&mut engine).contains(&"|win|Bob".to_string()));

        let mut engine = LocalEngine::with_seed(7);
        engine.handle(&player_line("p1", "Alice", ""));
        let lines = drain(&mut engine);
        assert!(lines.iter().any(|l| l.starts_with("|error|[Invalid team]")));
        assert!(engine.entrants[0].is_none());
    }

    #[test]
    fn test_team_order_parsing() {
        assert_eq!(parse_team_order("3,1", 3), Ok(vec![3, 1]));
        assert_eq!(parse_team_order("213", 3), Ok(vec![2, 1, 3]));
        assert!(parse_team_order("4", 3).is_err());
        assert!(parse_team_order("1,1", 3).is_err());
        assert!(parse_team_order("", 3).is_err());
    }

    #[test]
    fn test_seed_words_and_generation() {
        assert_eq!(seed_from_words(&[0, 5]), 5);
        assert_eq!(seed_from_words(&[1, 0, 0, 0]), 1 << 32);
        assert_eq!(generation("gen8ou"), 8);
        assert_eq!(generation("customgame"), 9);
    }

    #[tokio::test]
    async fn test_stream_yields_lines_until_destroyed() {
        let mut engine = LocalEngine::with_seed(3);
        engine
            .write(r#">start {"formatid":"gen9customgame"}"#)
            .await
            .unwrap();
        engine
            .write(&player_line("p1", "Alice", &team(&[("Garchomp", &["Earthquake"])])))
            .await
            .unwrap();
        engine
            .write(&player_line("p2", "Bob", &team(&[("Dragapult", &["Shadow Ball"])])))
            .await
            .unwrap();
        assert_eq!(engine.next_line().await.as_deref(), Some("update"));
        engine.destroy().await;
        assert_eq!(engine.next_line().await, None);
        assert!(engine.write(">p1 move 1").await.is_err());
    }
}
