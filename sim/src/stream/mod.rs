//! Line transport between a battle and its rules engine
//!
//! A [`ProtocolStream`] carries command lines (`>start ...`, `>p1 move 1`) to
//! an engine and hands back its output one line at a time. Two transports are
//! provided: [`ProcessStream`] talks to an external simulator process and
//! [`LocalEngine`] resolves battles in-process.

mod local;
mod process;

use async_trait::async_trait;
use thiserror::Error;

pub use local::{LocalEngine, LocalEngineConfig};
pub use process::{ProcessConfig, ProcessStream};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Stream is closed")]
    Closed,

    #[error("Failed to spawn engine process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Duplex line transport to a rules engine.
///
/// Output lines are yielded in the order the engine produced them and are
/// never dropped. `next_line` must be cancel safe: the battle driver races it
/// against incoming commands.
///
/// # Example
///
/// ```ignore
/// let mut stream = LocalEngine::new(LocalEngineConfig::default());
/// stream.write(">start {\"formatid\":\"gen9customgame\"}").await?;
/// while let Some(line) = stream.next_line().await {
///     println!("{line}");
/// }
/// ```
#[async_trait]
pub trait ProtocolStream: Send {
    /// Send one command line to the engine
    async fn write(&mut self, line: &str) -> Result<(), StreamError>;

    /// Next output line; `None` once the stream is closed
    async fn next_line(&mut self) -> Option<String>;

    /// Close the stream. Calling it again does nothing.
    async fn destroy(&mut self);
}

#[async_trait]
impl<S: ProtocolStream + ?Sized> ProtocolStream for Box<S> {
    async fn write(&mut self, line: &str) -> Result<(), StreamError> {
        (**self).write(line).await
    }

    async fn next_line(&mut self) -> Option<String> {
        (**self).next_line().await
    }

    async fn destroy(&mut self) {
        (**self).destroy().await
    }
}
