//! Wire grammar shared by live battles and replays.
//!
//! Engine output is parsed line by line with [`parse_server_message`]; input to
//! the engine is produced by [`EngineCommand`] and [`Choice`].

use thiserror::Error;

pub mod client;
pub mod server;

pub use client::{Choice, EngineCommand};
pub use server::{
    BattleRequest, GameType, HpStatus, MoveSlot, Player, PokemonDetails, PokemonIdent,
    RequestActive, RequestSide, RequestPokemon, ServerMessage, SideRef, Stat,
    parse_server_message,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,
}

/// Normalize a display name to a protocol id ("Choice Scarf" -> "choicescarf")
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
