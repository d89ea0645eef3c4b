//! Single Battle Example
//!
//! Plays one battle on the built-in engine: a heuristic "player" drives p1
//! through the manager's action API while an AI of your choice plays p2.
//!
//! ```text
//! cargo run -p arena-sim --example single_battle -- expert
//! RUST_LOG=arena_sim=debug cargo run -p arena-sim --example single_battle
//! ```

use anyhow::{Context, Result};
use arena_ai::{AiKind, AiPlayer, HeuristicAi};
use arena_battle::{GameType, Player};
use arena_sim::{BattleManager, LocalEngine, LocalEngineConfig, ManagerConfig, TurnOutcome};
use arena_team::TeamInput;
use tracing_subscriber::EnvFilter;

const ALICE: &str = "\
Garchomp @ Rocky Helmet
Ability: Rough Skin
Tera Type: Steel
EVs: 252 Atk / 4 SpD / 252 Spe
Jolly Nature
- Earthquake
- Dragon Claw
- Stone Edge
- Swords Dance

Corviknight @ Leftovers
Ability: Pressure
EVs: 252 HP / 168 Def / 88 SpD
Impish Nature
- Brave Bird
- Iron Head
- Roost
- Stealth Rock

Rotom-Wash @ Leftovers
Ability: Levitate
EVs: 252 HP / 252 SpA / 4 SpD
Modest Nature
- Hydro Pump
- Thunderbolt
- Will-O-Wisp
- Protect
";

const BOB: &str = "\
Heatran @ Leftovers
Ability: Flash Fire
EVs: 252 HP / 4 SpA / 252 SpD
Calm Nature
- Flash Cannon
- Flamethrower
- Stealth Rock
- Protect

Dragapult @ Choice Specs
Ability: Infiltrator
EVs: 252 SpA / 4 SpD / 252 Spe
Timid Nature
- Draco Meteor
- Shadow Ball
- Will-O-Wisp
- U-turn

Tyranitar @ Leftovers
Ability: Sand Stream
EVs: 252 HP / 252 Atk / 4 SpD
Adamant Nature
- Stone Edge
- Crunch
- Earthquake
- Sandstorm
";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opponent: AiKind = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(AiKind::Heuristic);

    let config = ManagerConfig {
        names: ["Alice".to_string(), format!("Bob ({})", opponent.as_str())],
        ..Default::default()
    };
    let manager = BattleManager::new(
        "gen9customgame",
        GameType::Singles,
        TeamInput::detect(ALICE),
        TeamInput::detect(BOB),
        config,
    )
    .with_ai(Player::P2, opponent.build(None));

    let mut me = HeuristicAi::new();
    let mut outcome = manager
        .start(LocalEngine::new(LocalEngineConfig::default()))
        .await
        .context("battle did not start")?;

    while outcome == TurnOutcome::AwaitingInput {
        let Some(actions) = manager.actions() else {
            outcome = manager.wait_for_decision().await?;
            continue;
        };
        let action = me.decide(&manager.get_state(), &actions);
        println!("Turn {}: {}", manager.turn(), action);
        outcome = manager.submit_action(action).await?;
    }

    println!();
    for entry in manager.log() {
        println!("[turn {:>3}] {:<8} {}", entry.turn, entry.category.as_str(), entry.message);
    }
    match manager.winner() {
        Some(winner) => println!("\nResult: {} after {} turns", winner, manager.turn()),
        None => println!("\nNo result ({outcome:?})"),
    }

    manager.destroy();
    Ok(())
}
