//! Transcript parsing and frame navigation

use tracing::{debug, warn};

use arena_ai::win_probability;
use arena_battle::{BattleLogEntry, BattleState, ProtocolInterpreter, Winner};

use crate::error::ReplayError;
use crate::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Annotate each frame with side 1's win probability
    pub win_probability: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            win_probability: true,
        }
    }
}

/// A finished (or truncated) transcript materialized as per-turn frames
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    options: ReplayOptions,
    frames: Vec<Frame>,
    current: usize,
    rejected_lines: usize,
}

fn turn_marker(line: &str) -> Option<u32> {
    line.trim()
        .strip_prefix("|turn|")
        .and_then(|n| n.trim().parse().ok())
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReplayOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Parse a transcript in one go
    pub fn from_log(log: &str) -> Result<Self, ReplayError> {
        let mut engine = Self::new();
        engine.parse(log)?;
        Ok(engine)
    }

    /// Replace the frame list with the frames of `log`
    ///
    /// The first frame covers everything before the first `|turn|`; every turn
    /// marker after that starts a new frame. Requests are private to one side
    /// and are skipped. Unparseable lines are skipped and counted.
    pub fn parse(&mut self, log: &str) -> Result<(), ReplayError> {
        let mut state = BattleState::new();
        let mut interpreter = ProtocolInterpreter::new();
        let mut frames = Vec::new();
        let mut pending: Vec<BattleLogEntry> = Vec::new();

        for line in log.lines() {
            if line.starts_with("|request|") {
                continue;
            }
            if let Some(turn) = turn_marker(line)
                && turn > state.turn
            {
                let log = std::mem::take(&mut pending);
                frames.push(self.snapshot(frames.len(), &state, log));
            }
            match interpreter.feed(&mut state, line) {
                Ok(Some(interpreted)) => pending.extend(interpreted.entry),
                Ok(None) => {}
                Err(e) => debug!("skipping replay line: {e}"),
            }
        }

        if interpreter.usable_lines() == 0 {
            return Err(ReplayError::Empty);
        }
        frames.push(self.snapshot(frames.len(), &state, pending));

        self.rejected_lines = interpreter.rejected_lines();
        if self.rejected_lines > 0 {
            warn!(rejected = self.rejected_lines, "replay contained unparseable lines");
        }
        debug!(frames = frames.len(), winner = ?state.winner, "replay parsed");
        self.frames = frames;
        self.current = 0;
        Ok(())
    }

    fn snapshot(&self, index: usize, state: &BattleState, log: Vec<BattleLogEntry>) -> Frame {
        Frame {
            index,
            turn: state.turn,
            state: state.clone(),
            log,
            win_probability: self.options.win_probability.then(|| win_probability(state)),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get_frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn get_all_frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.current)
    }

    pub fn set_current_index(&mut self, index: usize) -> Result<&Frame, ReplayError> {
        if index >= self.frames.len() {
            return Err(ReplayError::OutOfRange {
                index,
                len: self.frames.len(),
            });
        }
        self.current = index;
        Ok(&self.frames[index])
    }

    /// Advance one frame; `None` when already at the last frame
    pub fn next_frame(&mut self) -> Option<&Frame> {
        if self.current + 1 >= self.frames.len() {
            return None;
        }
        self.current += 1;
        self.frames.get(self.current)
    }

    /// Step back one frame; `None` when already at the first frame
    pub fn prev_frame(&mut self) -> Option<&Frame> {
        if self.current == 0 || self.frames.is_empty() {
            return None;
        }
        self.current -= 1;
        self.frames.get(self.current)
    }

    pub fn at_end(&self) -> bool {
        self.current + 1 >= self.frames.len()
    }

    /// Outcome recorded in the last frame
    pub fn winner(&self) -> Option<Winner> {
        self.frames.last().and_then(Frame::winner)
    }

    /// Whether the transcript reached a `|win|` or `|tie|`
    pub fn is_complete(&self) -> bool {
        self.frames.last().is_some_and(Frame::is_final)
    }

    pub fn rejected_lines(&self) -> usize {
        self.rejected_lines
    }
}
