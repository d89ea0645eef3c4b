//! AI-vs-AI batches for win-rate analysis
//!
//! Each game gets its own [`BattleManager`], engine and pair of AIs, so games
//! share nothing but the counters. At most `concurrency` games run at once.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use arena_ai::AiKind;
use arena_battle::{GameType, Player, Winner};
use arena_team::TeamInput;

use crate::error::BattleError;
use crate::manager::{BattleManager, ManagerConfig};
use crate::stream::{LocalEngine, LocalEngineConfig, ProcessConfig, ProcessStream};

/// Which engine each game runs on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Local,
    Process(ProcessConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub total_games: u32,
    /// Games in flight at once
    pub concurrency: usize,
    pub team1: TeamInput,
    pub team2: TeamInput,
    pub team1_ai: AiKind,
    pub team2_ai: AiKind,
    pub format_id: String,
    /// Game `i` is seeded with `seed + i`
    pub seed: Option<u64>,
    /// Report progress every this many completed games
    pub progress_every: u32,
    /// Games still running after this many turns are ties
    pub max_turns: u32,
    pub turn_timeout_ms: u64,
    pub game_timeout_ms: u64,
    /// Collect a turn-count histogram
    pub histogram: bool,
    pub engine: EngineKind,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            total_games: 100,
            concurrency: 4,
            team1: TeamInput::Paste(String::new()),
            team2: TeamInput::Paste(String::new()),
            team1_ai: AiKind::Heuristic,
            team2_ai: AiKind::Heuristic,
            format_id: "gen9customgame".to_string(),
            seed: None,
            progress_every: 1,
            max_turns: 200,
            turn_timeout_ms: 30_000,
            game_timeout_ms: 600_000,
            histogram: false,
            engine: EngineKind::Local,
        }
    }
}

impl BatchConfig {
    pub fn new(team1: TeamInput, team2: TeamInput, total_games: u32) -> Self {
        Self {
            team1,
            team2,
            total_games,
            ..Default::default()
        }
    }

    pub fn with_ais(mut self, team1_ai: AiKind, team2_ai: AiKind) -> Self {
        self.team1_ai = team1_ai;
        self.team2_ai = team2_ai;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    fn validate(&self) -> Result<(), BatchError> {
        if self.total_games == 0 {
            return Err(BatchError::Config("total_games must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(BatchError::Config("concurrency must be at least 1".to_string()));
        }
        self.team1
            .resolve()
            .map_err(|e| BatchError::Config(format!("team 1: {e}")))?;
        self.team2
            .resolve()
            .map_err(|e| BatchError::Config(format!("team 2: {e}")))?;
        Ok(())
    }

    fn game_seed(&self, index: u32) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(u64::from(index)))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Invalid batch configuration: {0}")]
    Config(String),
}

/// Counters handed to the progress callback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub total: u32,
    pub completed: u32,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub draws: u32,
    pub errors: u32,
}

impl BatchProgress {
    pub fn percentage(&self) -> f64 {
        f64::from(self.completed) / f64::from(self.total.max(1)) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_games: u32,
    pub completed: u32,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub draws: u32,
    /// Games that failed; also counted as draws
    pub errors: u32,
    pub team1_win_rate: f64,
    pub team2_win_rate: f64,
    pub draw_rate: f64,
    /// Over games that finished without error
    pub avg_turns: f64,
    pub min_turns: u32,
    pub max_turns: u32,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_histogram: Option<BTreeMap<u32, u32>>,
}

#[derive(Debug)]
struct GameResult {
    winner: Option<Winner>,
    turns: u32,
}

#[derive(Debug, Default)]
struct BatchCounters {
    progress: BatchProgress,
    turns: Vec<u32>,
    last_reported: u32,
}

impl BatchCounters {
    fn record(&mut self, index: Option<u32>, result: Result<GameResult, String>) {
        match result {
            Ok(game) => {
                match game.winner {
                    Some(Winner::P1) => self.progress.team1_wins += 1,
                    Some(Winner::P2) => self.progress.team2_wins += 1,
                    Some(Winner::Draw) | None => self.progress.draws += 1,
                }
                self.turns.push(game.turns);
                debug!(game = ?index, winner = ?game.winner, turns = game.turns, "game finished");
            }
            Err(e) => {
                warn!(game = ?index, error = %e, "game failed, counting it as a draw");
                self.progress.draws += 1;
                self.progress.errors += 1;
            }
        }
        self.progress.completed += 1;
    }

    fn summary(&self, histogram: bool, elapsed_ms: u64) -> BatchSummary {
        let p = self.progress;
        let rate = |n: u32| {
            if p.completed == 0 {
                0.0
            } else {
                f64::from(n) / f64::from(p.completed)
            }
        };
        let avg_turns = if self.turns.is_empty() {
            0.0
        } else {
            self.turns.iter().map(|&t| f64::from(t)).sum::<f64>() / self.turns.len() as f64
        };
        let turn_histogram = histogram.then(|| {
            let mut buckets = BTreeMap::new();
            for &turns in &self.turns {
                *buckets.entry(turns).or_insert(0) += 1;
            }
            buckets
        });

        BatchSummary {
            total_games: p.total,
            completed: p.completed,
            team1_wins: p.team1_wins,
            team2_wins: p.team2_wins,
            draws: p.draws,
            errors: p.errors,
            team1_win_rate: rate(p.team1_wins),
            team2_win_rate: rate(p.team2_wins),
            draw_rate: rate(p.draws),
            avg_turns,
            min_turns: self.turns.iter().copied().min().unwrap_or(0),
            max_turns: self.turns.iter().copied().max().unwrap_or(0),
            elapsed_ms,
            turn_histogram,
        }
    }
}

type ProgressFn = dyn Fn(BatchProgress) + Send + Sync;

/// A panicking progress callback must not cost the batch its counts
fn lock(counters: &Mutex<BatchCounters>) -> MutexGuard<'_, BatchCounters> {
    counters.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record one game and report progress when due
fn finish_game(
    counters: &Mutex<BatchCounters>,
    every: u32,
    on_progress: &ProgressFn,
    index: Option<u32>,
    result: Result<GameResult, String>,
) {
    let mut counters = lock(counters);
    counters.record(index, result);
    let progress = counters.progress;
    if progress.completed % every == 0 {
        counters.last_reported = progress.completed;
        on_progress(progress);
    }
}

/// Run `config.total_games` AI-vs-AI battles
///
/// Failed games never abort the batch; they are counted as draws and in
/// `errors`. Only configuration problems are returned as errors.
pub async fn run_batch_simulation<F>(
    config: BatchConfig,
    on_progress: F,
) -> Result<BatchSummary, BatchError>
where
    F: Fn(BatchProgress) + Send + Sync + 'static,
{
    config.validate()?;
    let started = Instant::now();
    let every = config.progress_every.max(1);
    info!(
        games = config.total_games,
        concurrency = config.concurrency,
        team1_ai = config.team1_ai.as_str(),
        team2_ai = config.team2_ai.as_str(),
        "starting batch"
    );

    let counters = Arc::new(Mutex::new(BatchCounters {
        progress: BatchProgress {
            total: config.total_games,
            ..Default::default()
        },
        ..Default::default()
    }));
    let on_progress: Arc<ProgressFn> = Arc::new(on_progress);
    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let config = Arc::new(config);
    let mut games = JoinSet::new();

    for index in 0..config.total_games {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        let config = Arc::clone(&config);
        let counters = Arc::clone(&counters);
        let on_progress = Arc::clone(&on_progress);
        games.spawn(async move {
            let result = play_game(&config, index).await.map_err(|e| e.to_string());
            drop(permit);
            finish_game(&counters, every, on_progress.as_ref(), Some(index), result);
        });
    }

    while let Some(joined) = games.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "game task failed");
        }
    }

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut counters = lock(&counters);
    // Tasks that panicked before recording their game
    while counters.progress.completed < config.total_games {
        counters.record(None, Err("game task failed".to_string()));
    }
    if counters.last_reported != counters.progress.completed {
        on_progress(counters.progress);
    }
    let summary = counters.summary(config.histogram, elapsed_ms);
    info!(
        completed = summary.completed,
        team1_wins = summary.team1_wins,
        team2_wins = summary.team2_wins,
        draws = summary.draws,
        errors = summary.errors,
        elapsed_ms,
        "batch finished"
    );
    Ok(summary)
}

async fn play_game(config: &BatchConfig, index: u32) -> Result<GameResult, BattleError> {
    let seed = config.game_seed(index);
    let manager_config = ManagerConfig {
        player: Player::P1,
        names: ["Team 1".to_string(), "Team 2".to_string()],
        turn_timeout_ms: config.turn_timeout_ms,
        start_timeout_ms: config.turn_timeout_ms,
        battle_timeout_ms: config.game_timeout_ms,
        seed,
        max_turns: Some(config.max_turns),
    };
    let manager = BattleManager::new(
        config.format_id.clone(),
        GameType::Singles,
        config.team1.clone(),
        config.team2.clone(),
        manager_config,
    )
    .with_ai(Player::P1, config.team1_ai.build(seed))
    .with_ai(Player::P2, config.team2_ai.build(seed.map(|s| !s)));

    let outcome = match &config.engine {
        EngineKind::Local => {
            let engine = LocalEngine::new(LocalEngineConfig {
                seed,
                max_turns: config.max_turns,
                team_preview: false,
            });
            manager.start(engine).await
        }
        EngineKind::Process(process) => match ProcessStream::spawn(process) {
            Ok(stream) => manager.start(stream).await,
            Err(e) => Err(e.into()),
        },
    };
    let result = match outcome {
        Ok(_) => manager.finished().await,
        Err(e) => Err(e),
    };
    manager.destroy();

    Ok(GameResult {
        winner: result?,
        turns: manager.turn(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_team::TeamSlotData;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn team(members: &[(&str, &[&str])]) -> TeamInput {
        TeamInput::Slots(
            members
                .iter()
                .map(|(species, moves)| TeamSlotData::new(*species).with_moves(*moves))
                .collect(),
        )
    }

    fn config(games: u32) -> BatchConfig {
        BatchConfig::new(
            team(&[("Garchomp", &["Earthquake", "Dragon Claw"])]),
            team(&[("Heatran", &["Flash Cannon", "Flamethrower"])]),
            games,
        )
        .with_ais(AiKind::Greedy, AiKind::Greedy)
        .with_seed(11)
    }

    #[test]
    fn test_config_is_validated() {
        let zero_games = BatchConfig {
            total_games: 0,
            ..config(1)
        };
        assert!(matches!(zero_games.validate(), Err(BatchError::Config(_))));
        assert!(matches!(
            config(1).with_concurrency(0).validate(),
            Err(BatchError::Config(_))
        ));
        let no_team = BatchConfig {
            team2: TeamInput::Paste(String::new()),
            ..config(1)
        };
        assert!(matches!(no_team.validate(), Err(BatchError::Config(_))));
        assert!(config(1).validate().is_ok());
    }

    #[test]
    fn test_game_seeds_follow_the_base_seed() {
        let config = config(3);
        assert_eq!(config.game_seed(0), Some(11));
        assert_eq!(config.game_seed(2), Some(13));
        let wrapping = config.with_seed(u64::MAX);
        assert_eq!(wrapping.game_seed(1), Some(0));
        assert_eq!(BatchConfig::default().game_seed(5), None);
    }

    #[test]
    fn test_counters_and_summary() {
        let mut counters = BatchCounters {
            progress: BatchProgress {
                total: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        counters.record(Some(0), Ok(GameResult { winner: Some(Winner::P1), turns: 10 }));
        counters.record(Some(1), Ok(GameResult { winner: Some(Winner::P2), turns: 20 }));
        counters.record(Some(2), Ok(GameResult { winner: None, turns: 30 }));
        counters.record(Some(3), Err("engine went away".to_string()));

        let summary = counters.summary(true, 5);
        assert_eq!(summary.completed, 4);
        assert_eq!((summary.team1_wins, summary.team2_wins, summary.draws), (1, 1, 2));
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.draw_rate, 0.5);
        assert_eq!(summary.avg_turns, 20.0);
        assert_eq!((summary.min_turns, summary.max_turns), (10, 30));
        let histogram = summary.turn_histogram.unwrap();
        assert_eq!(histogram.get(&20), Some(&1));
        assert_eq!(histogram.values().sum::<u32>(), 3);
    }

    #[tokio::test]
    async fn test_batch_reports_progress() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let mut config = config(5);
        config.progress_every = 2;

        let summary = run_batch_simulation(config, move |progress| {
            assert!(progress.completed <= progress.total);
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .await
        .unwrap();

        assert_eq!(summary.completed, 5);
        assert_eq!(summary.team1_wins + summary.team2_wins + summary.draws, 5);
        assert_eq!(summary.errors, 0);
        // After games 2 and 4, then once more at the end
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_panicking_progress_callback_keeps_every_game() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let mut config = config(4);
        config.concurrency = 1;

        let summary = run_batch_simulation(config, move |progress| {
            assert_eq!(
                progress.completed,
                progress.team1_wins + progress.team2_wins + progress.draws
            );
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("progress sink failed");
            }
        })
        .await
        .unwrap();

        assert_eq!(summary.completed, 4);
        assert_eq!(summary.team1_wins + summary.team2_wins + summary.draws, 4);
        assert_eq!(summary.errors, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_poisoned_counters_still_record() {
        let counters = Arc::new(Mutex::new(BatchCounters::default()));
        let poisoner = Arc::clone(&counters);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the counters");
        })
        .join();
        assert!(counters.is_poisoned());

        finish_game(&counters, 1, &|_| {}, Some(0), Err("engine went away".to_string()));
        let counters = lock(&counters);
        assert_eq!(counters.progress.completed, 1);
        assert_eq!(counters.progress.errors, 1);
    }

    #[tokio::test]
    async fn test_engine_that_cannot_start_counts_as_draws() {
        let config = BatchConfig {
            engine: EngineKind::Process(ProcessConfig {
                program: "/nonexistent/arena-engine".to_string(),
                args: Vec::new(),
                cwd: None,
            }),
            ..config(3)
        };
        let summary = run_batch_simulation(config, |_| {}).await.unwrap();
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.draws, 3);
        assert_eq!(summary.errors, 3);
        assert_eq!(summary.team1_wins + summary.team2_wins, 0);
        assert_eq!(summary.avg_turns, 0.0);
    }

    #[test]
    fn test_engine_kind_config() {
        let json = r#"{"total_games":2,"team1_ai":"random"}"#;
        let config: BatchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.total_games, 2);
        assert_eq!(config.team1_ai, AiKind::Random);
        assert_eq!(config.engine, EngineKind::Local);
        let json = r#"{"engine":{"kind":"process","program":"node","args":["sim"]}}"#;
        let config: BatchConfig = serde_json::from_str(json).unwrap();
        match config.engine {
            EngineKind::Process(process) => {
                assert_eq!(process.args, vec!["sim".to_string()]);
                assert_eq!(process.cwd, None);
            }
            EngineKind::Local => panic!("expected a process engine"),
        }
    }
}
