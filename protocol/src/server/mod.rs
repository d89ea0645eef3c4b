//! Engine output: one protocol line becomes one [`ServerMessage`]

mod battle;
mod battle_init;
mod battle_major;
mod battle_minor;
mod battle_progress;
mod request;
mod tests;

pub use battle::{GameType, HpStatus, Player, PokemonDetails, PokemonIdent, SideRef, Stat};
pub use request::{BattleRequest, MoveSlot, RequestActive, RequestPokemon, RequestSide};

use anyhow::Result;
use serde_json::Value;

/// A parsed battle protocol line
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    // === Initialization ===
    Player {
        player: Player,
        username: String,
        rating: Option<u32>,
    },
    TeamSize {
        player: Player,
        size: u8,
    },
    GameType(GameType),
    Gen(u8),
    Tier(String),
    Rule(String),
    ClearPoke,
    Poke {
        player: Player,
        details: PokemonDetails,
    },
    TeamPreview(Option<u8>),
    Start,

    // === Progress ===
    Request(Value),
    Upkeep,
    Turn(u32),
    Win(String),
    Tie,
    /// Next line is private to this player, the one after it is the public copy
    Split(Player),

    // === Major actions ===
    Move {
        pokemon: PokemonIdent,
        move_name: String,
        target: Option<PokemonIdent>,
        miss: bool,
        still: bool,
    },
    Switch {
        pokemon: PokemonIdent,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
        /// Forced out by the opponent (|drag|)
        drag: bool,
    },
    DetailsChange {
        pokemon: PokemonIdent,
        species: String,
        hp_status: Option<HpStatus>,
    },
    Cant {
        pokemon: PokemonIdent,
        reason: String,
        move_name: Option<String>,
    },
    Faint(PokemonIdent),

    // === Minor actions ===
    Damage {
        pokemon: PokemonIdent,
        hp_status: Option<HpStatus>,
        from: Option<String>,
    },
    Heal {
        pokemon: PokemonIdent,
        hp_status: Option<HpStatus>,
        from: Option<String>,
    },
    SetHp {
        pokemon: PokemonIdent,
        hp_status: Option<HpStatus>,
    },
    Status {
        pokemon: PokemonIdent,
        status: String,
    },
    CureStatus {
        pokemon: PokemonIdent,
        status: String,
    },
    CureTeam(PokemonIdent),
    Boost {
        pokemon: PokemonIdent,
        stat: Stat,
        amount: i8,
    },
    Unboost {
        pokemon: PokemonIdent,
        stat: Stat,
        amount: i8,
    },
    SetBoost {
        pokemon: PokemonIdent,
        stat: Stat,
        amount: i8,
    },
    ClearBoost(PokemonIdent),
    ClearAllBoost,
    ClearNegativeBoost(PokemonIdent),
    InvertBoost(PokemonIdent),
    Weather {
        weather: String,
        upkeep: bool,
    },
    FieldStart(String),
    FieldEnd(String),
    SideStart {
        side: SideRef,
        condition: String,
    },
    SideEnd {
        side: SideRef,
        condition: String,
    },
    VolatileStart {
        pokemon: PokemonIdent,
        effect: String,
    },
    VolatileEnd {
        pokemon: PokemonIdent,
        effect: String,
    },
    Crit(PokemonIdent),
    SuperEffective(PokemonIdent),
    Resisted(PokemonIdent),
    Immune(PokemonIdent),
    Miss {
        source: PokemonIdent,
        target: Option<PokemonIdent>,
    },
    Fail {
        pokemon: PokemonIdent,
        action: Option<String>,
    },
    Item {
        pokemon: PokemonIdent,
        item: String,
    },
    EndItem {
        pokemon: PokemonIdent,
        item: String,
    },
    Ability {
        pokemon: PokemonIdent,
        ability: String,
    },
    Transform {
        pokemon: PokemonIdent,
        species: String,
    },
    Terastallize {
        pokemon: PokemonIdent,
        tera_type: String,
    },
    Activate {
        pokemon: Option<PokemonIdent>,
        effect: String,
    },
    Message(String),

    /// Anything else: timestamps, chat, chunk headers, unknown commands
    Raw(String),
}

impl ServerMessage {
    /// Messages that end the battle
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServerMessage::Win(_) | ServerMessage::Tie)
    }
}

/// Parse a single line of engine output
///
/// Lines not starting with `|` (chunk headers such as `update` or `sideupdate`)
/// and unknown commands come back as [`ServerMessage::Raw`]. Known commands with
/// malformed arguments are errors.
pub fn parse_server_message(line: &str) -> Result<ServerMessage> {
    let line = line.trim_end_matches(['\r', '\n']);

    let Some(body) = line.strip_prefix('|') else {
        return Ok(ServerMessage::Raw(line.to_string()));
    };

    // |request| carries JSON that may itself contain '|'
    if let Some(json) = body.strip_prefix("request|") {
        return battle_progress::parse_request(json);
    }

    let parts: Vec<&str> = line.split('|').collect();
    let command = parts.get(1).copied().unwrap_or_default();

    match command {
        "player" => battle_init::parse_player(&parts),
        "teamsize" => battle_init::parse_teamsize(&parts),
        "gametype" => battle_init::parse_gametype(&parts),
        "gen" => battle_init::parse_gen(&parts),
        "tier" => battle_init::parse_tier(&parts),
        "rule" => battle_init::parse_rule(&parts),
        "clearpoke" => Ok(ServerMessage::ClearPoke),
        "poke" => battle_init::parse_poke(&parts),
        "teampreview" => battle_init::parse_teampreview(&parts),
        "start" => Ok(ServerMessage::Start),

        "upkeep" => Ok(ServerMessage::Upkeep),
        "turn" => battle_progress::parse_turn(&parts),
        "win" => battle_progress::parse_win(&parts),
        "tie" => Ok(ServerMessage::Tie),
        "split" => battle_progress::parse_split(&parts),

        "move" => battle_major::parse_move(&parts),
        "switch" => battle_major::parse_switch(&parts, false),
        "drag" => battle_major::parse_switch(&parts, true),
        "detailschange" | "-formechange" => battle_major::parse_detailschange(&parts),
        "cant" => battle_major::parse_cant(&parts),
        "faint" => battle_major::parse_faint(&parts),

        "-damage" => battle_minor::parse_damage(&parts),
        "-heal" => battle_minor::parse_heal(&parts),
        "-sethp" => battle_minor::parse_sethp(&parts),
        "-status" => battle_minor::parse_status(&parts),
        "-curestatus" => battle_minor::parse_curestatus(&parts),
        "-cureteam" => battle_minor::parse_cureteam(&parts),
        "-boost" | "-unboost" | "-setboost" => battle_minor::parse_boost(&parts, command),
        "-clearboost" | "-clearnegativeboost" | "-invertboost" => {
            battle_minor::parse_boost_reset(&parts, command)
        }
        "-clearallboost" => Ok(ServerMessage::ClearAllBoost),
        "-weather" => battle_minor::parse_weather(&parts),
        "-fieldstart" => Ok(ServerMessage::FieldStart(battle::text_at(&parts, 2))),
        "-fieldend" => Ok(ServerMessage::FieldEnd(battle::text_at(&parts, 2))),
        "-sidestart" | "-sideend" => battle_minor::parse_side_condition(&parts, command),
        "-start" | "-end" => battle_minor::parse_volatile(&parts, command),
        "-crit" | "-supereffective" | "-resisted" | "-immune" => {
            battle_minor::parse_hit_note(&parts, command)
        }
        "-miss" => battle_minor::parse_miss(&parts),
        "-fail" => battle_minor::parse_fail(&parts),
        "-item" | "-enditem" => battle_minor::parse_item(&parts, command),
        "-ability" => battle_minor::parse_ability(&parts),
        "-transform" => battle_minor::parse_transform(&parts),
        "-terastallize" => battle_minor::parse_terastallize(&parts),
        "-activate" => battle_minor::parse_activate(&parts),
        "-message" => Ok(ServerMessage::Message(battle::text_at(&parts, 2))),

        _ => Ok(ServerMessage::Raw(line.to_string())),
    }
}
