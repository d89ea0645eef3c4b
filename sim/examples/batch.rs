//! Batch Example
//!
//! Runs AI-vs-AI battles on the built-in engine and prints the summary as JSON.
//!
//! ```text
//! cargo run -p arena-sim --example batch -- 200 greedy heuristic
//! ```

use anyhow::Result;
use arena_ai::AiKind;
use arena_sim::{BatchConfig, run_batch_simulation};
use arena_team::TeamInput;
use tracing_subscriber::EnvFilter;

const TEAM1: &str = "Garchomp|||roughskin|earthquake,dragonclaw,stoneedge,swordsdance|Jolly|,252,,,4,252|||||]Corviknight|||pressure|bravebird,ironhead,roost,stealthrock|Impish|252,,168,,88,|||||]Rotom-Wash|||levitate|hydropump,thunderbolt,willowisp,protect|Modest|252,,,252,4,|||||";
const TEAM2: &str = "Heatran|||flashfire|flashcannon,flamethrower,stealthrock,protect|Calm|252,,,4,252,|||||]Dragapult|||infiltrator|dracometeor,shadowball,willowisp,uturn|Timid|,,,252,4,252|||||]Tyranitar|||sandstream|stoneedge,crunch,earthquake,sandstorm|Adamant|252,252,,,4,|||||";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut args = std::env::args().skip(1);
    let games: u32 = args.next().map(|n| n.parse()).transpose()?.unwrap_or(100);
    let team1_ai: AiKind = args.next().map(|k| k.parse()).transpose()?.unwrap_or(AiKind::Greedy);
    let team2_ai: AiKind = args.next().map(|k| k.parse()).transpose()?.unwrap_or(AiKind::Heuristic);

    let mut config = BatchConfig::new(TeamInput::detect(TEAM1), TeamInput::detect(TEAM2), games)
        .with_ais(team1_ai, team2_ai)
        .with_seed(42)
        .with_concurrency(8);
    config.progress_every = (games / 10).max(1);
    config.histogram = true;

    let summary = run_batch_simulation(config, |progress| {
        eprintln!(
            "{:>5.1}%  {}-{}-{} ({} errors)",
            progress.percentage(),
            progress.team1_wins,
            progress.team2_wins,
            progress.draws,
            progress.errors
        );
    })
    .await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
