//! Replays of recorded battle transcripts.
//!
//! A transcript is parsed once into a list of [`Frame`]s, one for the lead-in
//! and one per turn. Each frame holds a full [`BattleState`] snapshot, the log
//! entries of that turn and optionally side 1's win probability, so scrubbing
//! is plain indexing.
//!
//! ```
//! use arena_replay::ReplayEngine;
//!
//! let log = "|player|p1|Alice|\n|player|p2|Bob|\n|start\n|turn|1\n|turn|2\n|win|Alice\n";
//! let mut replay = ReplayEngine::from_log(log).unwrap();
//! assert_eq!(replay.len(), 3);
//! assert_eq!(replay.next_frame().unwrap().turn, 1);
//! ```
//!
//! [`BattleState`]: arena_battle::BattleState

mod engine;
mod error;
mod frame;
mod playback;

pub use engine::{ReplayEngine, ReplayOptions};
pub use error::ReplayError;
pub use frame::Frame;
pub use playback::{DEFAULT_FRAME_INTERVAL, MAX_SPEED, MIN_SPEED, Playback};
