//! The task that owns a battle's engine stream

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_util::FutureExt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use arena_ai::AiPlayer;
use arena_battle::{BattleActionSet, BattleLogEntry, BattleState, Player, ProtocolInterpreter};
use arena_protocol::{Choice, EngineCommand};

use crate::stream::ProtocolStream;

pub(crate) type UpdateCallback = Box<dyn Fn(&BattleState) + Send + Sync>;

pub(crate) enum Command {
    Write(String),
    Destroy,
}

/// What waiters watch for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Progress {
    /// Requests seen for either side
    pub requests: u64,
    /// Sides with an unanswered request
    pub awaiting: [bool; 2],
    /// Engine errors addressed to each side
    pub errors: [u64; 2],
    pub ended: bool,
    pub closed: bool,
    pub usable_lines: usize,
}

/// State shared between a manager and its driver
pub(crate) struct Shared {
    pub state: RwLock<BattleState>,
    pub log: RwLock<Vec<BattleLogEntry>>,
    pub transcript: RwLock<Vec<String>>,
    pub actions: RwLock<[Option<BattleActionSet>; 2]>,
    pub last_error: RwLock<Option<String>>,
    pub listeners: RwLock<Vec<UpdateCallback>>,
    pub progress: watch::Sender<Progress>,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BattleState::new()),
            log: RwLock::new(Vec::new()),
            transcript: RwLock::new(Vec::new()),
            actions: RwLock::new([None, None]),
            last_error: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
            progress: watch::Sender::new(Progress::default()),
        }
    }
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Where the current line sits in the engine's chunk framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk {
    Public,
    SideHeader,
    Side(Option<Player>),
}

/// Changes collected over one burst of lines
#[derive(Debug, Default)]
struct Burst {
    requests: u64,
    /// `Some(needs_decision)` for sides that received a request
    requested: [Option<bool>; 2],
    errors: [u64; 2],
}

pub(crate) struct Driver {
    stream: Box<dyn ProtocolStream>,
    commands: mpsc::UnboundedReceiver<Command>,
    shared: Arc<Shared>,
    interpreter: ProtocolInterpreter,
    ais: [Option<Box<dyn AiPlayer>>; 2],
    /// Sides the driver answers for, even if their AI was lost
    automatic: [bool; 2],
    /// A default choice was already sent after an engine error
    retried: [bool; 2],
    max_turns: Option<u32>,
    tie_forced: bool,
    chunk: Chunk,
    hide_next: bool,
}

impl Driver {
    pub fn new(
        stream: Box<dyn ProtocolStream>,
        commands: mpsc::UnboundedReceiver<Command>,
        shared: Arc<Shared>,
        ais: [Option<Box<dyn AiPlayer>>; 2],
        max_turns: Option<u32>,
    ) -> Self {
        let automatic = [ais[0].is_some(), ais[1].is_some()];
        Self {
            stream,
            commands,
            shared,
            interpreter: ProtocolInterpreter::new(),
            ais,
            automatic,
            retried: [false; 2],
            max_turns,
            tie_forced: false,
            chunk: Chunk::Public,
            hide_next: false,
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Write(line)) => {
                        debug!(%line, "to engine");
                        if let Err(e) = self.stream.write(&line).await {
                            warn!(error = %e, "engine write failed");
                            break;
                        }
                    }
                    Some(Command::Destroy) | None => break,
                },
                line = self.stream.next_line() => match line {
                    Some(line) => {
                        if !self.burst(line).await {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        self.stream.destroy().await;
        self.shared.progress.send_modify(|p| {
            p.closed = true;
            p.awaiting = [false; 2];
        });
        debug!(usable = self.interpreter.usable_lines(), "battle driver stopped");
    }

    /// Apply `first` and every line already waiting behind it, then act on the result
    ///
    /// Engines may send a turn's requests ahead of its log, so nothing is
    /// published until the whole burst has been applied. Returns false once the
    /// stream has closed.
    async fn burst(&mut self, first: String) -> bool {
        let mut burst = Burst::default();
        self.apply(&first, &mut burst);

        let mut open = true;
        loop {
            match self.stream.next_line().now_or_never() {
                Some(Some(line)) => self.apply(&line, &mut burst),
                Some(None) => {
                    open = false;
                    break;
                }
                None => break,
            }
        }

        self.settle(burst).await;
        open
    }

    fn apply(&mut self, line: &str, burst: &mut Burst) {
        match line {
            "update" | "" => {
                self.chunk = Chunk::Public;
                return;
            }
            "sideupdate" => {
                self.chunk = Chunk::SideHeader;
                return;
            }
            _ => {}
        }
        if self.chunk == Chunk::SideHeader {
            let player = Player::parse(line);
            self.chunk = Chunk::Side(player);
            if player.is_some() {
                return;
            }
        }

        if let Some(message) = line.strip_prefix("|error|") {
            let side = match self.chunk {
                Chunk::Side(player) => player,
                _ => None,
            };
            warn!(player = ?side, %message, "engine error");
            *write(&self.shared.last_error) = Some(message.to_string());
            match side {
                Some(player) => burst.errors[player.index()] += 1,
                None => burst.errors.iter_mut().for_each(|n| *n += 1),
            }
            return;
        }

        self.record_transcript(line);

        let usable_before = self.interpreter.usable_lines();
        let result = {
            let mut state = write(&self.shared.state);
            self.interpreter.feed(&mut state, line)
        };
        let interpreted = match result {
            Ok(Some(interpreted)) => interpreted,
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "skipping line");
                return;
            }
        };
        let applied = self.interpreter.usable_lines() > usable_before;

        if let Some(entry) = interpreted.entry {
            write(&self.shared.log).push(entry);
        }
        if let Some((player, request)) = interpreted.request {
            let actions = BattleActionSet::from_request(&request);
            let needs_decision = request.needs_decision() && actions.is_some();
            write(&self.shared.actions)[player.index()] = actions;
            burst.requests += 1;
            burst.requested[player.index()] = Some(needs_decision);
            self.retried[player.index()] = false;
        }
        if applied {
            self.notify();
        }
    }

    /// Hand the state to every `on_update` listener
    fn notify(&self) {
        let state = read(&self.shared.state);
        for listener in read(&self.shared.listeners).iter() {
            listener(&state);
        }
    }

    /// Public lines only: no requests and only the public half of split pairs
    fn record_transcript(&mut self, line: &str) {
        if !line.starts_with('|') || line.starts_with("|request|") {
            return;
        }
        if self.hide_next {
            self.hide_next = false;
            return;
        }
        if line.starts_with("|split|") {
            self.hide_next = true;
            return;
        }
        write(&self.shared.transcript).push(line.to_string());
    }

    async fn settle(&mut self, burst: Burst) {
        let (ended, turn) = {
            let state = read(&self.shared.state);
            (state.is_ended(), state.turn)
        };

        if !ended && !self.tie_forced && self.max_turns.is_some_and(|max| turn > max) {
            self.tie_forced = true;
            info!(turn, "turn limit reached, forcing a tie");
            let line = EngineCommand::ForceTie.to_protocol_string();
            if let Err(e) = self.stream.write(&line).await {
                warn!(error = %e, "could not force a tie");
            }
        }

        let mut answered = [false; 2];
        if !ended && !self.tie_forced {
            for player in Player::BOTH {
                let i = player.index();
                if !self.automatic[i] {
                    continue;
                }
                if burst.requested[i] == Some(true) {
                    answered[i] = self.play(player).await;
                } else if burst.errors[i] > 0 && !self.retried[i] {
                    self.retried[i] = true;
                    self.send_choice(player, Choice::Default).await;
                }
            }
        }

        let usable_lines = self.interpreter.usable_lines();
        self.shared.progress.send_modify(|p| {
            p.requests += burst.requests;
            for i in 0..2 {
                if let Some(needs_decision) = burst.requested[i] {
                    p.awaiting[i] = needs_decision && !answered[i];
                }
                p.errors[i] += burst.errors[i];
            }
            if ended {
                p.ended = true;
                p.awaiting = [false; 2];
            }
            p.usable_lines = usable_lines;
        });
    }

    /// Answer a machine side's request; true once a choice is on its way
    async fn play(&mut self, player: Player) -> bool {
        let i = player.index();
        let Some(actions) = read(&self.shared.actions)[i].clone() else {
            return false;
        };
        let choice = match self.ais[i].take() {
            Some(mut ai) => {
                let state = read(&self.shared.state).clone();
                let decided = tokio::task::spawn_blocking(move || {
                    let choice = decide(ai.as_mut(), &state, &actions);
                    (ai, choice)
                })
                .await;
                match decided {
                    Ok((ai, choice)) => {
                        self.ais[i] = Some(ai);
                        choice
                    }
                    Err(e) => {
                        error!(%player, error = %e, "AI failed, the engine chooses for this side from now on");
                        Choice::Default
                    }
                }
            }
            None => Choice::Default,
        };
        self.send_choice(player, choice).await
    }

    async fn send_choice(&mut self, player: Player, choice: Choice) -> bool {
        let line = EngineCommand::Choose { player, choice }.to_protocol_string();
        debug!(%line, "AI choice");
        match self.stream.write(&line).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%player, error = %e, "could not send AI choice");
                false
            }
        }
    }
}

/// Ask the strategy, falling back to the engine's default on an illegal pick
fn decide(ai: &mut dyn AiPlayer, state: &BattleState, actions: &BattleActionSet) -> Choice {
    if actions.team_preview {
        return Choice::Team(ai.choose_lead(state, actions));
    }
    let action = ai.decide(state, actions);
    match actions.validate(&action) {
        Ok(()) => action.to_choice(),
        Err(e) => {
            warn!(ai = ai.name(), %action, error = %e, "illegal AI action, using the default choice");
            Choice::Default
        }
    }
}
