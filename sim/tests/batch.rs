use std::sync::{Arc, Mutex};

use arena_ai::AiKind;
use arena_sim::{
    BatchConfig, BatchError, BatchProgress, BatchSummary, EngineKind, ProcessConfig,
    run_batch_simulation,
};
use arena_team::{TeamInput, TeamSlotData};

fn team(members: &[(&str, &[&str])]) -> TeamInput {
    TeamInput::Slots(
        members
            .iter()
            .map(|(species, moves)| TeamSlotData::new(*species).with_moves(*moves))
            .collect(),
    )
}

fn teams() -> (TeamInput, TeamInput) {
    (
        team(&[
            ("Garchomp", &["Earthquake", "Dragon Claw", "Stone Edge", "Swords Dance"]),
            ("Corviknight", &["Brave Bird", "Iron Head", "Roost", "Stealth Rock"]),
            ("Rotom-Wash", &["Hydro Pump", "Thunderbolt", "Will-O-Wisp", "Protect"]),
        ]),
        team(&[
            ("Heatran", &["Flash Cannon", "Flamethrower", "Stealth Rock", "Protect"]),
            ("Dragapult", &["Dragon Darts", "Shadow Ball", "Will-O-Wisp", "U-turn"]),
            ("Tyranitar", &["Stone Edge", "Crunch", "Earthquake", "Sandstorm"]),
        ]),
    )
}

fn seeded(games: u32) -> BatchConfig {
    let (team1, team2) = teams();
    let mut config = BatchConfig::new(team1, team2, games)
        .with_ais(AiKind::Greedy, AiKind::Heuristic)
        .with_seed(2024)
        .with_concurrency(3);
    config.max_turns = 100;
    config.histogram = true;
    config
}

fn without_timing(mut summary: BatchSummary) -> BatchSummary {
    summary.elapsed_ms = 0;
    summary
}

fn assert_invariant(progress: &BatchProgress) {
    assert_eq!(
        progress.completed,
        progress.team1_wins + progress.team2_wins + progress.draws
    );
    assert!(progress.errors <= progress.draws);
    assert!(progress.completed <= progress.total);
}

#[tokio::test]
async fn test_ten_game_deterministic_batch() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let first = run_batch_simulation(seeded(10), move |progress| {
        sink.lock().unwrap().push(progress);
    })
    .await
    .unwrap();

    assert_eq!(first.total_games, 10);
    assert_eq!(first.completed, 10);
    assert_eq!(first.team1_wins + first.team2_wins + first.draws, 10);
    assert_eq!(first.errors, 0);
    assert!(first.min_turns >= 1);
    assert!(first.max_turns <= 100);
    assert!(first.avg_turns >= f64::from(first.min_turns));
    let histogram = first.turn_histogram.clone().unwrap();
    assert_eq!(histogram.values().sum::<u32>(), 10);
    let rates = first.team1_win_rate + first.team2_win_rate + first.draw_rate;
    assert!((rates - 1.0).abs() < 1e-9);

    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 10);
    reports.iter().for_each(assert_invariant);
    assert_eq!(reports.last().unwrap().completed, 10);

    let second = run_batch_simulation(seeded(10), |_| {}).await.unwrap();
    assert_eq!(without_timing(first), without_timing(second));
}

#[tokio::test]
async fn test_failing_games_keep_the_counters_consistent() {
    let mut config = seeded(6);
    config.engine = EngineKind::Process(ProcessConfig {
        program: "/definitely/not/an/engine".to_string(),
        args: Vec::new(),
        cwd: None,
    });
    config.progress_every = 4;

    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let summary = run_batch_simulation(config, move |progress| {
        assert_invariant(&progress);
        sink.lock().unwrap().push(progress.completed);
    })
    .await
    .unwrap();

    assert_eq!(summary.completed, 6);
    assert_eq!(summary.draws, 6);
    assert_eq!(summary.errors, 6);
    assert_eq!(summary.draw_rate, 1.0);
    assert_eq!(*reports.lock().unwrap(), vec![4, 6]);
}

#[tokio::test]
async fn test_configuration_errors() {
    let mut config = seeded(0);
    assert!(matches!(
        run_batch_simulation(config.clone(), |_| {}).await,
        Err(BatchError::Config(_))
    ));

    config.total_games = 2;
    config.concurrency = 0;
    assert!(matches!(
        run_batch_simulation(config.clone(), |_| {}).await,
        Err(BatchError::Config(_))
    ));

    config.concurrency = 1;
    config.team1 = TeamInput::Paste("   \n".to_string());
    assert!(matches!(
        run_batch_simulation(config, |_| {}).await,
        Err(BatchError::Config(_))
    ));
}

#[tokio::test]
async fn test_random_ais_finish_every_game() {
    let mut config = seeded(4);
    config.team1_ai = AiKind::Random;
    config.team2_ai = AiKind::Random;
    config.concurrency = 4;

    let summary = run_batch_simulation(config, |_| {}).await.unwrap();
    assert_eq!(summary.completed, 4);
    assert_eq!(summary.errors, 0);
}
