//! One live battle against a rules engine
//!
//! [`BattleManager`] hands its [`ProtocolStream`] to a driver task. The driver
//! interprets engine output into the shared [`BattleState`], answers requests
//! for AI-controlled sides and publishes progress that the manager's async
//! methods wait on. Every wait is bounded, so a caller is never left hanging on
//! an engine that stops talking.

mod driver;

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use arena_ai::AiPlayer;
use arena_battle::{
    Action, ActionError, BattleActionSet, BattleLogEntry, BattleState, GameType, Phase, Player,
    Winner,
};
use arena_protocol::{Choice, EngineCommand};
use arena_team::TeamInput;

use self::driver::{Command, Driver, Progress, Shared, lock, read};
use crate::error::BattleError;
use crate::record::BattleRecord;
use crate::stream::ProtocolStream;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Side driven through [`BattleManager::submit_action`]
    pub player: Player,
    pub names: [String; 2],
    pub turn_timeout_ms: u64,
    pub start_timeout_ms: u64,
    /// Upper bound for [`BattleManager::finished`]
    pub battle_timeout_ms: u64,
    /// Passed to the engine; entropy when absent
    pub seed: Option<u64>,
    /// Force a tie once the battle runs past this turn
    pub max_turns: Option<u32>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            player: Player::P1,
            names: ["Player 1".to_string(), "Player 2".to_string()],
            turn_timeout_ms: 30_000,
            start_timeout_ms: 30_000,
            battle_timeout_ms: 600_000,
            seed: None,
            max_turns: None,
        }
    }
}

impl ManagerConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    pub fn battle_timeout(&self) -> Duration {
        Duration::from_millis(self.battle_timeout_ms)
    }

    /// Engine seed words for a 64-bit seed
    fn seed_words(&self) -> Option<[u32; 4]> {
        self.seed
            .map(|seed| [(seed >> 32) as u32, seed as u32, 0, 0])
    }
}

/// How a wait for the engine ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// A new request arrived
    AwaitingInput,
    Ended,
    /// Nothing arrived in time; the state is the best known so far
    TimedOut,
    Closed,
}

pub struct BattleManager {
    format_id: String,
    game_type: GameType,
    teams: [TeamInput; 2],
    config: ManagerConfig,
    ais: Mutex<[Option<Box<dyn AiPlayer>>; 2]>,
    shared: Arc<Shared>,
    commands: OnceLock<mpsc::UnboundedSender<Command>>,
}

impl BattleManager {
    pub fn new(
        format_id: impl Into<String>,
        game_type: GameType,
        team1: TeamInput,
        team2: TeamInput,
        config: ManagerConfig,
    ) -> Self {
        Self {
            format_id: format_id.into(),
            game_type,
            teams: [team1, team2],
            config,
            ais: Mutex::new([None, None]),
            shared: Arc::new(Shared::new()),
            commands: OnceLock::new(),
        }
    }

    /// Let `ai` play `player`'s side
    pub fn with_ai(self, player: Player, ai: Box<dyn AiPlayer>) -> Self {
        lock(&self.ais)[player.index()] = Some(ai);
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn format_id(&self) -> &str {
        &self.format_id
    }

    /// Start the battle on `stream`
    ///
    /// Teams are validated before the engine sees anything. Resolves once the
    /// first request arrives, or with [`TurnOutcome::Ended`] if the battle is
    /// over before anyone is asked to act.
    pub async fn start(
        &self,
        stream: impl ProtocolStream + 'static,
    ) -> Result<TurnOutcome, BattleError> {
        if self.commands.get().is_some() {
            return Err(BattleError::Phase("already started"));
        }
        let packed = [self.teams[0].to_packed()?, self.teams[1].to_packed()?];

        let (tx, rx) = mpsc::unbounded_channel();
        if self.commands.set(tx).is_err() {
            return Err(BattleError::Phase("already started"));
        }
        driver::write(&self.shared.state).set_game_type(self.game_type);

        let ais = std::mem::take(&mut *lock(&self.ais));
        let driver = Driver::new(
            Box::new(stream),
            rx,
            Arc::clone(&self.shared),
            ais,
            self.config.max_turns,
        );
        tokio::spawn(driver.run());

        info!(format = %self.format_id, game_type = self.game_type.as_str(), "starting battle");
        self.send(EngineCommand::Start {
            format_id: self.format_id.clone(),
            seed: self.config.seed_words(),
        })?;
        for player in Player::BOTH {
            self.send(EngineCommand::Player {
                player,
                name: self.config.names[player.index()].clone(),
                packed_team: packed[player.index()].clone(),
            })?;
        }

        let timeout = self.config.start_timeout();
        let progress = self
            .wait_until(timeout, |p| {
                p.requests > 0 || p.ended || p.closed || p.errors.iter().any(|&n| n > 0)
            })
            .await
            .ok_or(BattleError::Timeout(timeout))?;

        if progress.ended {
            return Ok(TurnOutcome::Ended);
        }
        if progress.requests > 0 {
            return Ok(TurnOutcome::AwaitingInput);
        }
        if progress.closed {
            let reason = if progress.usable_lines == 0 {
                "stream closed without producing any output".to_string()
            } else {
                "stream closed before the first request".to_string()
            };
            return Err(BattleError::Engine(reason));
        }
        Err(BattleError::Engine(self.last_error()))
    }

    /// Submit the lead order during team preview (1-based team positions)
    pub async fn choose_lead(&self, order: Vec<usize>) -> Result<TurnOutcome, BattleError> {
        self.ensure_running()?;
        let actions = self.pending_actions()?;
        if !actions.team_preview {
            return Err(BattleError::InvalidLead("no team preview is pending".to_string()));
        }
        if order.is_empty() {
            return Err(BattleError::InvalidLead("order is empty".to_string()));
        }
        let size = actions.switches.len();
        for (i, &slot) in order.iter().enumerate() {
            if slot == 0 || slot > size {
                return Err(BattleError::InvalidLead(format!("slot {slot} does not exist")));
            }
            if order[..i].contains(&slot) {
                return Err(BattleError::InvalidLead(format!("slot {slot} is repeated")));
            }
        }
        self.choose(Choice::Team(order)).await
    }

    /// Validate and send the player's action, then wait for the engine
    ///
    /// An illegal action is refused without touching the engine. Otherwise
    /// resolves when either side receives a new request, the battle ends, the
    /// stream closes or the turn timeout passes.
    pub async fn submit_action(&self, action: Action) -> Result<TurnOutcome, BattleError> {
        self.ensure_running()?;
        let actions = self.pending_actions()?;
        actions.validate(&action)?;
        self.choose(action.to_choice()).await
    }

    /// Wait until the player has to act or the battle is over
    pub async fn wait_for_decision(&self) -> Result<TurnOutcome, BattleError> {
        if self.commands.get().is_none() {
            return Err(BattleError::Phase("not started"));
        }
        let i = self.config.player.index();
        let progress = self
            .wait_until(self.config.turn_timeout(), |p| p.awaiting[i] || p.ended || p.closed)
            .await;
        Ok(match progress {
            None => TurnOutcome::TimedOut,
            Some(p) if p.ended => TurnOutcome::Ended,
            Some(p) if p.awaiting[i] => TurnOutcome::AwaitingInput,
            Some(_) => TurnOutcome::Closed,
        })
    }

    /// Wait for the battle to end; `None` means a draw without a winner line
    pub async fn finished(&self) -> Result<Option<Winner>, BattleError> {
        if self.commands.get().is_none() {
            return Err(BattleError::Phase("not started"));
        }
        let timeout = self.config.battle_timeout();
        let progress = self
            .wait_until(timeout, |p| p.ended || p.closed)
            .await
            .ok_or(BattleError::Timeout(timeout))?;
        if progress.ended {
            Ok(self.winner())
        } else {
            Err(BattleError::Closed)
        }
    }

    /// Concede the battle to the opponent
    pub async fn forfeit(&self) -> Result<TurnOutcome, BattleError> {
        self.ensure_running()?;
        let opponent = self.config.player.opponent();
        info!(player = %self.config.player, "forfeiting");
        self.send(EngineCommand::ForceWin(opponent))?;
        let progress = self
            .wait_until(self.config.turn_timeout(), |p| p.ended || p.closed)
            .await;
        Ok(match progress {
            None => TurnOutcome::TimedOut,
            Some(p) if p.ended => TurnOutcome::Ended,
            Some(_) => TurnOutcome::Closed,
        })
    }

    /// Stop the engine; pending waits settle immediately
    pub fn destroy(&self) {
        self.shared.progress.send_modify(|p| {
            p.closed = true;
            p.awaiting = [false; 2];
        });
        if let Some(tx) = self.commands.get() {
            let _ = tx.send(Command::Destroy);
        }
        debug!("battle destroyed");
    }

    /// Called with the new state after every protocol line that changes it
    pub fn on_update<F>(&self, callback: F)
    where
        F: Fn(&BattleState) + Send + Sync + 'static,
    {
        driver::write(&self.shared.listeners).push(Box::new(callback));
    }

    pub fn get_state(&self) -> BattleState {
        read(&self.shared.state).clone()
    }

    pub fn phase(&self) -> Phase {
        read(&self.shared.state).phase
    }

    pub fn winner(&self) -> Option<Winner> {
        read(&self.shared.state).winner
    }

    pub fn turn(&self) -> u32 {
        read(&self.shared.state).turn
    }

    pub fn is_closed(&self) -> bool {
        self.shared.progress.borrow().closed
    }

    pub fn log(&self) -> Vec<BattleLogEntry> {
        read(&self.shared.log).clone()
    }

    /// Public protocol lines seen so far, newline separated
    pub fn transcript(&self) -> String {
        read(&self.shared.transcript).join("\n")
    }

    /// The player's options, while a decision is pending
    pub fn actions(&self) -> Option<BattleActionSet> {
        let i = self.config.player.index();
        if !self.shared.progress.borrow().awaiting[i] {
            return None;
        }
        read(&self.shared.actions)[i].clone()
    }

    pub fn to_record(&self) -> Result<BattleRecord, BattleError> {
        let state = read(&self.shared.state);
        Ok(BattleRecord {
            format_id: self.format_id.clone(),
            game_type: self.game_type,
            players: self.config.names.clone(),
            teams: [self.teams[0].to_paste()?, self.teams[1].to_paste()?],
            team_names: [self.teams[0].names()?, self.teams[1].names()?],
            winner: state.winner,
            turns: state.turn,
            protocol_log: self.transcript(),
            commentary: None,
        })
    }

    fn send(&self, command: EngineCommand) -> Result<(), BattleError> {
        let tx = self.commands.get().ok_or(BattleError::Phase("not started"))?;
        tx.send(Command::Write(command.to_protocol_string()))
            .map_err(|_| BattleError::Closed)
    }

    fn ensure_running(&self) -> Result<(), BattleError> {
        if self.commands.get().is_none() {
            return Err(BattleError::Phase("not started"));
        }
        let progress = *self.shared.progress.borrow();
        if progress.ended {
            return Err(BattleError::Phase("over"));
        }
        if progress.closed {
            return Err(BattleError::Closed);
        }
        Ok(())
    }

    fn pending_actions(&self) -> Result<BattleActionSet, BattleError> {
        let i = self.config.player.index();
        if !self.shared.progress.borrow().awaiting[i] {
            return Err(ActionError::NoPendingRequest.into());
        }
        read(&self.shared.actions)[i]
            .clone()
            .ok_or_else(|| ActionError::NoPendingRequest.into())
    }

    async fn choose(&self, choice: Choice) -> Result<TurnOutcome, BattleError> {
        let player = self.config.player;
        let i = player.index();
        let before = *self.shared.progress.borrow();
        self.shared.progress.send_modify(|p| p.awaiting[i] = false);
        self.send(EngineCommand::Choose { player, choice })?;

        let timeout = self.config.turn_timeout();
        let progress = self
            .wait_until(timeout, |p| {
                p.requests > before.requests || p.errors[i] > before.errors[i] || p.ended || p.closed
            })
            .await;

        match progress {
            None => {
                warn!(%player, ?timeout, turn = self.turn(), "no response from the engine");
                Ok(TurnOutcome::TimedOut)
            }
            Some(p) if p.ended => Ok(TurnOutcome::Ended),
            Some(p) if p.requests > before.requests => Ok(TurnOutcome::AwaitingInput),
            Some(p) if p.closed => Ok(TurnOutcome::Closed),
            Some(_) => {
                self.shared.progress.send_modify(|p| p.awaiting[i] = true);
                Err(BattleError::Rejected(self.last_error()))
            }
        }
    }

    /// Latest progress satisfying `done`, or `None` on timeout
    async fn wait_until(
        &self,
        timeout: Duration,
        mut done: impl FnMut(&Progress) -> bool,
    ) -> Option<Progress> {
        let mut rx = self.shared.progress.subscribe();
        match tokio::time::timeout(timeout, rx.wait_for(|p| done(p))).await {
            Ok(Ok(progress)) => Some(*progress),
            // The sender lives in `shared`, so this only happens on teardown
            Ok(Err(_)) => Some(*self.shared.progress.borrow()),
            Err(_) => None,
        }
    }

    fn last_error(&self) -> String {
        read(&self.shared.last_error)
            .clone()
            .unwrap_or_else(|| "engine reported an error".to_string())
    }
}

impl Drop for BattleManager {
    fn drop(&mut self) {
        if let Some(tx) = self.commands.get() {
            let _ = tx.send(Command::Destroy);
        }
    }
}
