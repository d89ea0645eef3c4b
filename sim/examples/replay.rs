//! Replay Example
//!
//! Steps through a saved battle record frame by frame. Without an argument a
//! short Greedy-vs-Heuristic battle is played first and replayed instead.
//!
//! ```text
//! cargo run -p arena-sim --example replay -- battle.json
//! ```

use anyhow::{Context, Result};
use arena_ai::{GreedyAi, HeuristicAi};
use arena_battle::{GameType, Player};
use arena_replay::{ReplayEngine, ReplayOptions};
use arena_sim::{BattleManager, BattleRecord, LocalEngine, LocalEngineConfig, ManagerConfig};
use arena_team::TeamInput;
use tracing_subscriber::EnvFilter;

async fn play() -> Result<BattleRecord> {
    let manager = BattleManager::new(
        "gen9customgame",
        GameType::Singles,
        TeamInput::detect("Garchomp\n- Earthquake\n- Dragon Claw\n\nCorviknight\n- Brave Bird\n- Roost\n"),
        TeamInput::detect("Heatran\n- Flash Cannon\n- Flamethrower\n\nDragapult\n- Dragon Darts\n- Shadow Ball\n"),
        ManagerConfig {
            seed: Some(7),
            ..Default::default()
        },
    )
    .with_ai(Player::P1, Box::new(GreedyAi::new()))
    .with_ai(Player::P2, Box::new(HeuristicAi::new()));

    manager
        .start(LocalEngine::new(LocalEngineConfig::default()))
        .await?;
    manager.finished().await?;
    let record = manager.to_record()?;
    manager.destroy();
    Ok(record)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let record = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            BattleRecord::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => play().await?,
    };

    let mut replay = ReplayEngine::with_options(ReplayOptions {
        win_probability: true,
    });
    replay.parse(&record.protocol_log)?;

    println!("{} vs {} ({} frames)", record.players[0], record.players[1], replay.len());
    for frame in replay.get_all_frames() {
        let odds = frame
            .win_probability
            .map(|p| format!("{:>5.1}%", p * 100.0))
            .unwrap_or_default();
        println!("-- turn {} {odds}", frame.turn);
        for entry in &frame.log {
            println!("   {}", entry.message);
        }
    }
    if let Some(winner) = replay.winner() {
        println!("Winner: {winner}");
    }
    Ok(())
}
