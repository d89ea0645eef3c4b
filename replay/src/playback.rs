//! Timed playback over a parsed replay

use std::time::Duration;

use crate::engine::ReplayEngine;

pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;

/// Time one frame stays on screen at 1x speed
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(1500);

/// Play/pause state and speed for stepping through frames on a clock
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    interval: Duration,
    speed: f32,
    playing: bool,
    /// Time accumulated toward the next frame
    elapsed: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl Playback {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            speed: 1.0,
            playing: false,
            elapsed: Duration::ZERO,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Clamped to `MIN_SPEED..=MAX_SPEED`; non-finite values are ignored
    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
    }

    /// Wall time between frames at the current speed
    pub fn frame_interval(&self) -> Duration {
        let nanos = self.interval.as_nanos() as f64 / f64::from(self.speed);
        Duration::from_nanos(nanos.round() as u64)
    }

    /// Advance the clock by `dt`, moving `replay` forward as frames elapse
    ///
    /// Returns the number of frames advanced. Playback pauses at the last frame.
    pub fn tick(&mut self, replay: &mut ReplayEngine, dt: Duration) -> usize {
        if !self.playing {
            return 0;
        }
        self.elapsed += dt;
        let interval = self.frame_interval();
        let mut advanced = 0;
        while self.elapsed >= interval {
            self.elapsed -= interval;
            if replay.next_frame().is_none() {
                self.pause();
                self.elapsed = Duration::ZERO;
                break;
            }
            advanced += 1;
        }
        if replay.at_end() {
            self.pause();
        }
        advanced
    }

    /// Jump back to the first frame and stop
    pub fn rewind(&mut self, replay: &mut ReplayEngine) {
        self.pause();
        self.elapsed = Duration::ZERO;
        if !replay.is_empty() {
            let _ = replay.set_current_index(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(turns: u32) -> ReplayEngine {
        let mut log = String::from("|player|p1|Alice|\n|player|p2|Bob|\n|start\n");
        for turn in 1..=turns {
            log.push_str(&format!("|turn|{turn}\n"));
        }
        ReplayEngine::from_log(&log).unwrap()
    }

    #[test]
    fn test_paused_playback_does_nothing() {
        let mut replay = replay(3);
        let mut playback = Playback::new(Duration::from_millis(100));
        assert_eq!(playback.tick(&mut replay, Duration::from_secs(10)), 0);
        assert_eq!(replay.current_index(), 0);

        playback.toggle();
        assert!(playback.is_playing());
        assert_eq!(playback.tick(&mut replay, Duration::from_millis(100)), 1);
        assert_eq!(replay.current_frame().map(|f| f.turn), Some(1));
        playback.toggle();
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_tick_advances_by_elapsed_frames() {
        let mut replay = replay(5);
        let mut playback = Playback::new(Duration::from_millis(100));
        playback.play();
        assert_eq!(playback.tick(&mut replay, Duration::from_millis(250)), 2);
        assert_eq!(replay.current_index(), 2);
        assert_eq!(playback.tick(&mut replay, Duration::from_millis(50)), 1);
        assert_eq!(replay.current_index(), 3);
    }

    #[test]
    fn test_speed_scales_interval() {
        let mut replay = replay(5);
        let mut playback = Playback::new(Duration::from_millis(100));
        playback.set_speed(2.0);
        playback.play();
        assert_eq!(playback.frame_interval(), Duration::from_millis(50));
        assert_eq!(playback.tick(&mut replay, Duration::from_millis(100)), 2);

        playback.set_speed(100.0);
        assert_eq!(playback.speed(), MAX_SPEED);
        playback.set_speed(f32::NAN);
        assert_eq!(playback.speed(), MAX_SPEED);
    }

    #[test]
    fn test_stops_at_the_end() {
        let mut replay = replay(2);
        let mut playback = Playback::new(Duration::from_millis(100));
        playback.play();
        assert_eq!(playback.tick(&mut replay, Duration::from_secs(5)), 2);
        assert!(replay.at_end());
        assert!(!playback.is_playing());

        playback.rewind(&mut replay);
        assert_eq!(replay.current_index(), 0);
    }
}
