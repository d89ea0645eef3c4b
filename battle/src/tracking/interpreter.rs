//! Shared protocol interpreter
//!
//! Turns one engine output line into state deltas on a [`BattleState`] plus at
//! most one [`BattleLogEntry`]. Live battles and replays both drive battles
//! through this type.

use arena_protocol::{
    BattleRequest, Player, PokemonIdent, ServerMessage, Stat, parse_server_message,
};

use super::log::{BattleLogEntry, LogCategory};
use super::state::{BattleState, Phase};
use crate::error::ProtocolError;
use crate::types::{PokemonState, SideCondition, Status, Volatile};

/// Result of feeding one line
#[derive(Debug, Clone, PartialEq)]
pub struct Interpreted {
    pub message: ServerMessage,
    pub entry: Option<BattleLogEntry>,
    /// Decoded `|request|` and the side it is addressed to
    pub request: Option<(Player, BattleRequest)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Split {
    #[default]
    None,
    /// Next line is the private copy; apply it
    Secret,
    /// Next line is the public copy; skip it
    Public,
}

#[derive(Debug, Clone, Default)]
pub struct ProtocolInterpreter {
    split: Split,
    usable_lines: usize,
    rejected_lines: usize,
}

impl ProtocolInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that parsed into a protocol message
    pub fn usable_lines(&self) -> usize {
        self.usable_lines
    }

    /// Lines that failed to parse
    pub fn rejected_lines(&self) -> usize {
        self.rejected_lines
    }

    /// Apply one line of engine output
    ///
    /// Returns `Ok(None)` for lines that carry nothing (blank lines and the
    /// public half of a `|split|` pair). Errors leave `state` untouched.
    pub fn feed(
        &mut self,
        state: &mut BattleState,
        line: &str,
    ) -> Result<Option<Interpreted>, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        match self.split {
            Split::Public => {
                self.split = Split::None;
                return Ok(None);
            }
            Split::Secret => self.split = Split::Public,
            Split::None => {}
        }

        let message = parse_server_message(line).map_err(|e| {
            self.rejected_lines += 1;
            ProtocolError::Unparseable {
                line: line.to_string(),
                reason: format!("{e:#}"),
            }
        })?;

        if matches!(message, ServerMessage::Raw(_)) {
            return Ok(Some(Interpreted {
                message,
                entry: None,
                request: None,
            }));
        }
        self.usable_lines += 1;

        if let ServerMessage::Split(_) = message {
            self.split = Split::Secret;
        }

        let request = match &message {
            ServerMessage::Request(json) => decode_request(json)?,
            _ => None,
        };
        apply(state, &message, request.as_ref());
        let entry = describe(state, &message)
            .map(|(category, text)| BattleLogEntry::new(category, text, state.turn));

        Ok(Some(Interpreted {
            message,
            entry,
            request,
        }))
    }
}

fn decode_request(
    json: &serde_json::Value,
) -> Result<Option<(Player, BattleRequest)>, ProtocolError> {
    if json.is_null() {
        return Ok(None);
    }
    let request = BattleRequest::parse(json)
        .ok_or_else(|| ProtocolError::MalformedRequest(json.to_string()))?;
    let player = request
        .player()
        .ok_or_else(|| ProtocolError::MalformedRequest("request has no side id".to_string()))?;
    Ok(Some((player, request)))
}

fn pokemon_mut<'a>(state: &'a mut BattleState, ident: &PokemonIdent) -> Option<&'a mut PokemonState> {
    state.side_mut(ident.player).find_pokemon_mut(&ident.name)
}

fn apply(state: &mut BattleState, msg: &ServerMessage, request: Option<&(Player, BattleRequest)>) {
    match msg {
        ServerMessage::Player {
            player, username, ..
        } => {
            if !username.is_empty() {
                state.side_mut(*player).username = username.clone();
            }
            state.advance_phase(Phase::Setup);
        }
        ServerMessage::TeamSize { player, size } => {
            state.side_mut(*player).team_size = Some(*size);
        }
        ServerMessage::GameType(game_type) => {
            state.set_game_type(*game_type);
            state.advance_phase(Phase::Setup);
        }
        ServerMessage::Gen(generation) => state.generation = *generation,
        ServerMessage::Tier(tier) => state.tier = tier.clone(),
        ServerMessage::Poke { player, details } => {
            state
                .side_mut(*player)
                .find_or_insert(&details.species, details);
        }
        ServerMessage::TeamPreview(_) => state.team_preview = true,
        ServerMessage::Start => {
            state.advance_phase(Phase::Setup);
            state.team_preview = false;
        }

        ServerMessage::Request(_) => {
            if let Some((player, request)) = request {
                if let Some(side) = &request.side {
                    state.side_mut(*player).sync_from_request(side);
                }
                state.forced_switch[player.index()] = request.is_force_switch();
                if request.team_preview {
                    state.team_preview = true;
                }
            }
        }
        ServerMessage::Turn(turn) => {
            state.turn = *turn;
            state.advance_phase(Phase::Active);
            state.forced_switch = [false; 2];
            state.team_preview = false;
        }
        ServerMessage::Win(name) => state.record_win(name),
        ServerMessage::Tie => state.record_tie(),

        ServerMessage::Move {
            pokemon, move_name, ..
        } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.record_move(move_name);
            }
        }
        ServerMessage::Switch {
            pokemon,
            details,
            hp_status,
            ..
        } => {
            let side = state.side_mut(pokemon.player);
            let index = side.find_or_insert(&pokemon.name, details);
            let poke = &mut side.pokemon[index];
            poke.set_species(&details.species);
            if let Some(hp) = hp_status {
                poke.apply_hp_status(hp);
            }
            side.set_active(pokemon.slot(), index);
            state.forced_switch[pokemon.player.index()] = false;
        }
        ServerMessage::DetailsChange {
            pokemon,
            species,
            hp_status,
        } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.set_species(species);
                if let Some(hp) = hp_status {
                    poke.apply_hp_status(hp);
                }
            }
        }
        // The fainted pokemon keeps its slot until a switch replaces it
        ServerMessage::Faint(pokemon) => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.faint();
            }
        }

        ServerMessage::Damage {
            pokemon, hp_status, ..
        }
        | ServerMessage::Heal {
            pokemon, hp_status, ..
        }
        | ServerMessage::SetHp { pokemon, hp_status } => {
            if let (Some(poke), Some(hp)) = (pokemon_mut(state, pokemon), hp_status) {
                poke.apply_hp_status(hp);
            }
        }
        ServerMessage::Status { pokemon, status } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.status = Status::from_protocol(status);
            }
        }
        ServerMessage::CureStatus { pokemon, .. } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.status = None;
            }
        }
        ServerMessage::CureTeam(pokemon) => {
            for poke in state.side_mut(pokemon.player).pokemon.iter_mut() {
                poke.status = None;
            }
        }

        ServerMessage::Boost {
            pokemon,
            stat,
            amount,
        } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.boosts.boost(*stat, *amount);
            }
        }
        ServerMessage::Unboost {
            pokemon,
            stat,
            amount,
        } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.boosts.unboost(*stat, *amount);
            }
        }
        ServerMessage::SetBoost {
            pokemon,
            stat,
            amount,
        } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.boosts.set(*stat, *amount);
            }
        }
        ServerMessage::ClearBoost(pokemon) => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.boosts.clear();
            }
        }
        ServerMessage::ClearNegativeBoost(pokemon) => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.boosts.clear_negative();
            }
        }
        ServerMessage::InvertBoost(pokemon) => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.boosts.invert();
            }
        }
        ServerMessage::ClearAllBoost => {
            for side in state.sides.iter_mut() {
                for poke in side.pokemon.iter_mut().filter(|p| p.active) {
                    poke.boosts.clear();
                }
            }
        }

        ServerMessage::Weather { weather, upkeep } => {
            if !upkeep {
                state.field.set_weather(weather);
            }
        }
        ServerMessage::FieldStart(condition) => state.field.start(condition),
        ServerMessage::FieldEnd(condition) => state.field.end(condition),
        ServerMessage::SideStart { side, condition } => {
            if let Some(cond) = SideCondition::from_protocol(condition) {
                state.side_mut(side.player).add_condition(cond);
            }
        }
        ServerMessage::SideEnd { side, condition } => {
            if let Some(cond) = SideCondition::from_protocol(condition) {
                state.side_mut(side.player).remove_condition(cond);
            }
        }
        ServerMessage::VolatileStart { pokemon, effect } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.volatiles.insert(Volatile::from_protocol(effect));
            }
        }
        ServerMessage::VolatileEnd { pokemon, effect } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.volatiles.remove(&Volatile::from_protocol(effect));
            }
        }

        ServerMessage::Item { pokemon, item } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.item = Some(item.clone());
                poke.item_consumed = false;
            }
        }
        ServerMessage::EndItem { pokemon, .. } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.item_consumed = true;
            }
        }
        ServerMessage::Ability { pokemon, ability } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.ability = Some(ability.clone());
            }
        }
        ServerMessage::Transform { pokemon, species } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.transformed = Some(species.clone());
            }
        }
        ServerMessage::Terastallize { pokemon, tera_type } => {
            if let Some(poke) = pokemon_mut(state, pokemon) {
                poke.terastallize(tera_type);
            }
        }

        _ => {}
    }
}

fn hp_note(state: &BattleState, ident: &PokemonIdent) -> String {
    state
        .side(ident.player)
        .find_pokemon(&ident.name)
        .map(|i| format!(" ({}% left)", state.side(ident.player).pokemon[i].hp_percent()))
        .unwrap_or_default()
}

fn boost_phrase(amount: i8, rose: bool) -> String {
    let verb = if rose { "rose" } else { "fell" };
    match amount.unsigned_abs() {
        0 => format!("won't go any {}!", if rose { "higher" } else { "lower" }),
        1 => format!("{verb}!"),
        2 => format!("{verb} sharply!"),
        _ => format!("{verb} drastically!"),
    }
}

fn stat_name(stat: &Stat) -> &'static str {
    stat.as_str()
}

fn side_label(state: &BattleState, player: Player) -> String {
    let username = &state.side(player).username;
    if username.is_empty() {
        player.to_string()
    } else {
        username.clone()
    }
}

fn describe(state: &BattleState, msg: &ServerMessage) -> Option<(LogCategory, String)> {
    let entry = match msg {
        ServerMessage::Start => (
            LogCategory::Other,
            format!(
                "Battle started between {} and {}!",
                side_label(state, Player::P1),
                side_label(state, Player::P2)
            ),
        ),
        ServerMessage::Turn(turn) => (LogCategory::Turn, format!("Turn {turn}")),
        ServerMessage::Win(name) => (LogCategory::Win, format!("{name} won the battle!")),
        ServerMessage::Tie => (LogCategory::Tie, "The battle ended in a tie.".to_string()),

        ServerMessage::Move {
            pokemon,
            move_name,
            miss,
            ..
        } => {
            let suffix = if *miss { " It missed!" } else { "" };
            (
                LogCategory::Move,
                format!("{} used {}!{}", pokemon.name, move_name, suffix),
            )
        }
        ServerMessage::Switch { pokemon, drag, .. } => {
            let text = if *drag {
                format!("{} was dragged out!", pokemon.name)
            } else {
                format!("{} sent out {}!", side_label(state, pokemon.player), pokemon.name)
            };
            (LogCategory::Switch, text)
        }
        ServerMessage::Faint(pokemon) => (LogCategory::Faint, format!("{} fainted!", pokemon.name)),
        ServerMessage::Cant { pokemon, reason, .. } => (
            LogCategory::Other,
            format!("{} can't move ({}).", pokemon.name, reason),
        ),

        ServerMessage::Damage { pokemon, from, .. } => {
            let text = match from {
                Some(source) => format!("{} was hurt by {}", pokemon.name, source),
                None => format!("{} took damage", pokemon.name),
            };
            (LogCategory::Damage, text + &hp_note(state, pokemon))
        }
        ServerMessage::Heal { pokemon, from, .. } => {
            let text = match from {
                Some(source) => format!("{} restored HP using {}", pokemon.name, source),
                None => format!("{} restored HP", pokemon.name),
            };
            (LogCategory::Heal, text + &hp_note(state, pokemon))
        }
        ServerMessage::Status { pokemon, status } => {
            let text = match Status::from_protocol(status) {
                Some(s) => format!("{} {}!", pokemon.name, s.inflicted_text()),
                None => format!("{} was afflicted with {}!", pokemon.name, status),
            };
            (LogCategory::Status, text)
        }
        ServerMessage::CureStatus { pokemon, status } => (
            LogCategory::Status,
            format!("{} was cured of {}.", pokemon.name, status),
        ),
        ServerMessage::CureTeam(pokemon) => (
            LogCategory::Status,
            format!("{}'s team was cured.", side_label(state, pokemon.player)),
        ),

        ServerMessage::Boost {
            pokemon,
            stat,
            amount,
        } => (
            LogCategory::Boost,
            format!("{}'s {} {}", pokemon.name, stat_name(stat), boost_phrase(*amount, true)),
        ),
        ServerMessage::Unboost {
            pokemon,
            stat,
            amount,
        } => (
            LogCategory::Boost,
            format!("{}'s {} {}", pokemon.name, stat_name(stat), boost_phrase(*amount, false)),
        ),
        ServerMessage::SetBoost {
            pokemon,
            stat,
            amount,
        } => (
            LogCategory::Boost,
            format!("{}'s {} was set to {:+}.", pokemon.name, stat_name(stat), amount),
        ),
        ServerMessage::ClearBoost(pokemon)
        | ServerMessage::ClearNegativeBoost(pokemon)
        | ServerMessage::InvertBoost(pokemon) => (
            LogCategory::Boost,
            format!("{}'s stat changes were altered.", pokemon.name),
        ),
        ServerMessage::ClearAllBoost => (
            LogCategory::Boost,
            "All stat changes were eliminated!".to_string(),
        ),

        ServerMessage::Weather { upkeep: true, .. } => return None,
        ServerMessage::Weather { weather, .. } => {
            let text = match state.field.weather {
                Some(w) => format!("{w} started."),
                None if weather == "none" => "The weather cleared.".to_string(),
                None => format!("{weather} started."),
            };
            (LogCategory::Weather, text)
        }
        ServerMessage::FieldStart(condition) => {
            (LogCategory::Field, format!("{} started.", strip_effect(condition)))
        }
        ServerMessage::FieldEnd(condition) => {
            (LogCategory::Field, format!("{} ended.", strip_effect(condition)))
        }
        ServerMessage::SideStart { side, condition } => (
            LogCategory::Side,
            format!(
                "{} began on {}'s side.",
                strip_effect(condition),
                side_label(state, side.player)
            ),
        ),
        ServerMessage::SideEnd { side, condition } => (
            LogCategory::Side,
            format!(
                "{} ended on {}'s side.",
                strip_effect(condition),
                side_label(state, side.player)
            ),
        ),

        ServerMessage::Crit(_) => (LogCategory::Other, "A critical hit!".to_string()),
        ServerMessage::SuperEffective(_) => {
            (LogCategory::Other, "It's super effective!".to_string())
        }
        ServerMessage::Resisted(_) => {
            (LogCategory::Other, "It's not very effective...".to_string())
        }
        ServerMessage::Immune(pokemon) => (
            LogCategory::Other,
            format!("It doesn't affect {}...", pokemon.name),
        ),
        ServerMessage::Miss { target, source } => {
            let who = target.as_ref().unwrap_or(source);
            (LogCategory::Other, format!("{} avoided the attack!", who.name))
        }
        ServerMessage::Fail { .. } => (LogCategory::Other, "But it failed!".to_string()),
        ServerMessage::Terastallize { pokemon, tera_type } => (
            LogCategory::Other,
            format!("{} terastallized into the {} type!", pokemon.name, tera_type),
        ),
        ServerMessage::Message(text) => (LogCategory::Other, text.clone()),

        _ => return None,
    };
    Some(entry)
}

fn strip_effect(condition: &str) -> &str {
    condition
        .strip_prefix("move: ")
        .or_else(|| condition.strip_prefix("ability: "))
        .unwrap_or(condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Weather;
    use crate::tracking::Winner;

    fn feed_all(lines: &[&str]) -> (BattleState, Vec<BattleLogEntry>, ProtocolInterpreter) {
        let mut state = BattleState::new();
        let mut interpreter = ProtocolInterpreter::new();
        let mut log = Vec::new();
        for line in lines {
            if let Ok(Some(done)) = interpreter.feed(&mut state, line) {
                log.extend(done.entry);
            }
        }
        (state, log, interpreter)
    }

    const OPENING: &[&str] = &[
        "update",
        "|player|p1|Alice|",
        "|player|p2|Bob|",
        "|teamsize|p1|1",
        "|teamsize|p2|1",
        "|gametype|singles",
        "|gen|9",
        "|tier|[Gen 9] Custom Game",
        "|start",
        "|split|p1",
        "|switch|p1a: Garchomp|Garchomp, M|357/357",
        "|switch|p1a: Garchomp|Garchomp, M|100/100",
        "|split|p2",
        "|switch|p2a: Dragapult|Dragapult|317/317",
        "|switch|p2a: Dragapult|Dragapult|100/100",
        "|turn|1",
    ];

    #[test]
    fn test_opening_builds_state() {
        let (state, log, interpreter) = feed_all(OPENING);

        assert_eq!(state.phase, Phase::Active);
        assert_eq!(state.turn, 1);
        assert_eq!(state.tier, "[Gen 9] Custom Game");
        assert_eq!(state.side(Player::P1).username, "Alice");

        let chomp = state.active(Player::P1).unwrap();
        assert_eq!(chomp.name, "Garchomp");
        assert_eq!((chomp.hp_current, chomp.hp_max), (357, 357));
        assert_eq!(state.active(Player::P2).unwrap().hp_max, 317);

        let categories: Vec<LogCategory> = log.iter().map(|e| e.category).collect();
        assert_eq!(
            categories,
            vec![
                LogCategory::Other,
                LogCategory::Switch,
                LogCategory::Switch,
                LogCategory::Turn
            ]
        );
        assert_eq!(log[1].message, "Alice sent out Garchomp!");
        assert!(interpreter.usable_lines() > 10);
    }

    #[test]
    fn test_split_skips_public_copy() {
        let mut lines = OPENING.to_vec();
        lines.extend([
            "|move|p2a: Dragapult|Dragon Darts|p1a: Garchomp",
            "|split|p1",
            "|-damage|p1a: Garchomp|200/357",
            "|-damage|p1a: Garchomp|56/100",
        ]);
        let (state, log, _) = feed_all(&lines);

        let chomp = state.active(Player::P1).unwrap();
        assert_eq!(chomp.hp_current, 200);
        assert_eq!(chomp.hp_max, 357);

        let damage: Vec<&BattleLogEntry> = log
            .iter()
            .filter(|e| e.category == LogCategory::Damage)
            .collect();
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].message, "Garchomp took damage (56% left)");
        assert_eq!(damage[0].turn, 1);
    }

    #[test]
    fn test_faint_and_win() {
        let mut lines = OPENING.to_vec();
        lines.extend([
            "|move|p1a: Garchomp|Earthquake|p2a: Dragapult",
            "|-damage|p2a: Dragapult|0 fnt",
            "|faint|p2a: Dragapult",
            "|win|Alice",
        ]);
        let (state, log, _) = feed_all(&lines);

        assert!(state.is_ended());
        assert_eq!(state.winner, Some(Winner::P1));
        let dragapult = &state.side(Player::P2).pokemon[0];
        assert!(dragapult.fainted);
        let active = state.active(Player::P2).unwrap();
        assert!(active.fainted && active.active);
        assert!(log.iter().any(|e| e.category == LogCategory::Faint));
        assert_eq!(log.last().unwrap().category, LogCategory::Win);
    }

    #[test]
    fn test_fainted_pokemon_holds_its_slot_until_replaced() {
        let mut lines = OPENING.to_vec();
        lines.extend([
            "|-damage|p2a: Dragapult|0 fnt",
            "|faint|p2a: Dragapult",
            "|upkeep",
        ]);
        let (mut state, _, mut interpreter) = feed_all(&lines);
        assert_eq!(state.active(Player::P2).unwrap().name, "Dragapult");
        assert!(state.active(Player::P2).unwrap().fainted);
        assert_eq!(state.side(Player::P2).bench().count(), 0);

        interpreter
            .feed(&mut state, "|switch|p2a: Toxapex|Toxapex, F|304/304")
            .unwrap();
        let side = state.side(Player::P2);
        assert_eq!(side.active_pokemon().unwrap().name, "Toxapex");
        let dragapult = side.find_pokemon("Dragapult").unwrap();
        assert!(!side.pokemon[dragapult].active);
        assert!(side.pokemon[dragapult].fainted);
    }

    #[test]
    fn test_request_syncs_side_and_forced_switch() {
        let mut state = BattleState::new();
        let mut interpreter = ProtocolInterpreter::new();
        let line = r#"|request|{"forceSwitch":[true],"side":{"name":"Alice","id":"p1","pokemon":[{"ident":"p1: Garchomp","details":"Garchomp","condition":"0 fnt","active":true,"moves":["earthquake"]},{"ident":"p1: Toxapex","details":"Toxapex","condition":"304/304","active":false,"moves":["scald","recover"]}]},"rqid":7}"#;

        let done = interpreter.feed(&mut state, line).unwrap().unwrap();
        let (player, request) = done.request.unwrap();
        assert_eq!(player, Player::P1);
        assert_eq!(request.rqid, Some(7));
        assert!(done.entry.is_none());
        assert!(state.forced_switch[0]);

        let side = state.side(Player::P1);
        assert_eq!(side.pokemon.len(), 2);
        assert!(side.pokemon[0].fainted);
        assert_eq!(side.pokemon[1].moves, vec!["scald", "recover"]);
    }

    #[test]
    fn test_malformed_request_is_an_error() {
        let mut state = BattleState::new();
        let mut interpreter = ProtocolInterpreter::new();
        let result = interpreter.feed(&mut state, r#"|request|{"side": 5}"#);
        assert!(matches!(result, Err(ProtocolError::MalformedRequest(_))));

        let result = interpreter.feed(&mut state, "|request|{not json");
        assert!(matches!(result, Err(ProtocolError::Unparseable { .. })));
        assert_eq!(interpreter.rejected_lines(), 1);
    }

    #[test]
    fn test_field_and_side_conditions() {
        let mut lines = OPENING.to_vec();
        lines.extend([
            "|-weather|RainDance",
            "|-weather|RainDance|[upkeep]",
            "|-sidestart|p2: Bob|move: Stealth Rock",
            "|-fieldstart|move: Trick Room",
            "|-boost|p1a: Garchomp|atk|2",
        ]);
        let (state, log, _) = feed_all(&lines);

        assert_eq!(state.field.weather, Some(Weather::Rain));
        assert!(state.field.trick_room);
        assert!(state.side(Player::P2).has_condition(SideCondition::StealthRock));
        assert_eq!(state.active(Player::P1).unwrap().boosts.atk, 2);

        let weather: Vec<&str> = log
            .iter()
            .filter(|e| e.category == LogCategory::Weather)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(weather, vec!["Rain started."]);
        assert!(log.iter().any(|e| e.message == "Stealth Rock began on Bob's side."));
        assert!(log.iter().any(|e| e.message == "Garchomp's Attack rose sharply!"));
    }

    #[test]
    fn test_chunk_headers_are_not_usable() {
        let (_, log, interpreter) = feed_all(&["update", "sideupdate", "p1", ""]);
        assert!(log.is_empty());
        assert_eq!(interpreter.usable_lines(), 0);
    }

    #[test]
    fn test_tie_marks_draw() {
        let mut lines = OPENING.to_vec();
        lines.push("|tie");
        let (state, log, _) = feed_all(&lines);
        assert_eq!(state.winner, Some(Winner::Draw));
        assert_eq!(log.last().unwrap().category, LogCategory::Tie);
    }
}
