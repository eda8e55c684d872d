//! Match state and authoritative tick loop

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info};
use uuid::Uuid;

use crate::util::time::{tick_duration, unix_millis, FrameClock};
use crate::ws::protocol::ServerMsg;

use super::character::Character;
use super::combat::{Attack, CombatSystem, GameEvent, Projectile};
use super::lifecycle;
use super::round::{decide_winner, RoundClock, RoundEndCause, RoundPhase};
use super::snapshot::MatchSnapshot;
use super::spawner::Spawned;
use super::{MatchCommand, PlayerId, PlayerInput, TickInput};

/// Match state (owned by the match task)
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub id: Uuid,
    pub phase: RoundPhase,
    pub tick: u64,
    pub round: u32,
    pub fighters: [Character; 2],
    pub attacks: Vec<Attack>,
    pub projectiles: Vec<Projectile>,
    pub clock: RoundClock,
    pub winner: Option<PlayerId>,
    pub end_cause: Option<RoundEndCause>,
}

impl MatchState {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            phase: RoundPhase::NotStarted,
            tick: 0,
            round: 1,
            fighters: [
                Character::spawn(PlayerId::Player1),
                Character::spawn(PlayerId::Player2),
            ],
            attacks: Vec::new(),
            projectiles: Vec::new(),
            clock: RoundClock::default(),
            winner: None,
            end_cause: None,
        }
    }

    pub fn fighter(&self, player: PlayerId) -> &Character {
        &self.fighters[player.index()]
    }

    pub fn fighter_mut(&mut self, player: PlayerId) -> &mut Character {
        &mut self.fighters[player.index()]
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::RoundOver
    }

    /// NotStarted -> Running. Returns false if the round was already started.
    pub fn start(&mut self) -> bool {
        if self.phase != RoundPhase::NotStarted {
            return false;
        }
        self.phase = RoundPhase::Running;
        true
    }

    /// Rebuild fighters at spawn and clear entities, clock, round and winner.
    /// A started match comes back Running; an unstarted one stays NotStarted.
    pub fn reset(&mut self) {
        let phase = match self.phase {
            RoundPhase::NotStarted => RoundPhase::NotStarted,
            RoundPhase::Running | RoundPhase::RoundOver => RoundPhase::Running,
        };
        *self = Self {
            phase,
            tick: self.tick,
            ..Self::new(self.id)
        };
    }

    /// Advance one tick. `dt` is the wall-clock time since the previous
    /// tick and only feeds the round clock.
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != RoundPhase::Running {
            return events;
        }

        self.tick += 1;

        if self.clock.advance(dt) {
            self.end_round(RoundEndCause::TimeUp, &mut events);
            return events;
        }

        // Player 2 sees player 1's position after player 1 has moved
        let opponent_x = self.fighters[1].x;
        if let Some(spawned) = self.fighters[0].update(&input.player1, opponent_x) {
            self.push_spawned(spawned, &mut events);
        }
        let opponent_x = self.fighters[0].x;
        if let Some(spawned) = self.fighters[1].update(&input.player2, opponent_x) {
            self.push_spawned(spawned, &mut events);
        }

        lifecycle::advance_attacks(&mut self.attacks);
        lifecycle::advance_projectiles(&mut self.projectiles);

        let knockout = CombatSystem::resolve(
            &mut self.fighters,
            &mut self.attacks,
            &mut self.projectiles,
            &mut events,
        );
        lifecycle::sweep(&mut self.attacks, &mut self.projectiles);

        if let Some(loser) = knockout {
            info!(match_id = %self.id, loser = %loser, "Knockout");
            self.end_round(RoundEndCause::Knockout, &mut events);
        }

        events
    }

    fn push_spawned(&mut self, spawned: Spawned, events: &mut Vec<GameEvent>) {
        match spawned {
            Spawned::Attack(attack) => {
                events.push(GameEvent::AttackStarted {
                    player: attack.owner,
                    kind: attack.kind,
                    x: attack.x,
                    y: attack.y,
                });
                self.attacks.push(attack);
            }
            Spawned::Projectile(projectile) => {
                events.push(GameEvent::ProjectileLaunched {
                    player: projectile.owner,
                    kind: projectile.kind,
                    x: projectile.x,
                    y: projectile.y,
                    vel_x: projectile.vel_x,
                });
                self.projectiles.push(projectile);
            }
        }
    }

    fn end_round(&mut self, cause: RoundEndCause, events: &mut Vec<GameEvent>) {
        if self.is_over() {
            return;
        }

        let winner = decide_winner(self.fighter(PlayerId::Player1), self.fighter(PlayerId::Player2));
        self.phase = RoundPhase::RoundOver;
        self.winner = Some(winner);
        self.end_cause = Some(cause);
        events.push(GameEvent::RoundOver { winner, cause });

        info!(
            match_id = %self.id,
            winner = %winner,
            cause = ?cause,
            player1_health = self.fighters[0].health,
            player2_health = self.fighters[1].health,
            time_left = self.clock.seconds_left(),
            "Round over"
        );
    }
}

/// Host errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Match host is not running")]
    Closed,
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub tick_rate: u32,
    pub input_tx: mpsc::Sender<PlayerInput>,
    pub snapshot_tx: broadcast::Sender<ServerMsg>,
    latest: Arc<RwLock<MatchSnapshot>>,
}

impl MatchHandle {
    /// Queue a command for the next tick
    pub async fn send(&self, connection_id: Uuid, command: MatchCommand) -> Result<(), HostError> {
        self.input_tx
            .send(PlayerInput {
                connection_id,
                command,
                received_at: unix_millis(),
            })
            .await
            .map_err(|_| HostError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMsg> {
        self.snapshot_tx.subscribe()
    }

    /// Most recent snapshot published by the tick loop
    pub fn latest_snapshot(&self) -> MatchSnapshot {
        self.latest.read().clone()
    }
}

/// The authoritative match host
pub struct GameMatch {
    state: MatchState,
    input_rx: mpsc::Receiver<PlayerInput>,
    snapshot_tx: broadcast::Sender<ServerMsg>,
    latest: Arc<RwLock<MatchSnapshot>>,
    tick_rate: u32,
    /// Held controls, replaced whole by each controls command
    held: TickInput,
    /// Connection that last wrote each player's controls
    holders: [Option<Uuid>; 2],
    frame_clock: FrameClock,
}

impl GameMatch {
    /// Create a new match host
    pub fn new(tick_rate: u32, auto_start: bool) -> (Self, MatchHandle) {
        let id = Uuid::new_v4();
        let (input_tx, input_rx) = mpsc::channel(256);
        let (snapshot_tx, _) = broadcast::channel(64);

        let mut state = MatchState::new(id);
        if auto_start {
            state.start();
        }
        let latest = Arc::new(RwLock::new(MatchSnapshot::capture(&state, Vec::new())));

        let handle = MatchHandle {
            id,
            tick_rate,
            input_tx,
            snapshot_tx: snapshot_tx.clone(),
            latest: latest.clone(),
        };

        let game_match = Self {
            state,
            input_rx,
            snapshot_tx,
            latest,
            tick_rate,
            held: TickInput::default(),
            holders: [None, None],
            frame_clock: FrameClock::new(),
        };

        (game_match, handle)
    }

    /// Run the authoritative tick loop until every command sender is gone
    pub async fn run(mut self) {
        info!(match_id = %self.state.id, tick_rate = self.tick_rate, "Match host started");

        let mut tick_interval = interval(tick_duration(self.tick_rate));
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        self.frame_clock.reset();

        loop {
            tick_interval.tick().await;

            // Drain commands so the tick sees one consistent input snapshot
            if !self.process_inputs() {
                info!(match_id = %self.state.id, "All command senders dropped, stopping host");
                break;
            }

            let dt = self.frame_clock.delta_secs();
            let was_over = self.state.is_over();
            let events = self.state.step(&self.held, dt);

            let snapshot = MatchSnapshot::capture(&self.state, events);
            *self.latest.write() = snapshot.clone();

            if !was_over && self.state.is_over() {
                if let (Some(winner), Some(cause)) = (self.state.winner, self.state.end_cause) {
                    let _ = self.snapshot_tx.send(ServerMsg::RoundOver {
                        winner,
                        cause,
                        player1_health: self.state.fighters[0].health,
                        player2_health: self.state.fighters[1].health,
                    });
                }
            }

            // No subscribers is fine; the latest snapshot is still readable
            let _ = self.snapshot_tx.send(ServerMsg::Snapshot(snapshot));
        }
    }

    /// Apply pending commands. Returns false once the channel is closed.
    fn process_inputs(&mut self) -> bool {
        loop {
            match self.input_rx.try_recv() {
                Ok(input) => self.handle_command(input),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn handle_command(&mut self, input: PlayerInput) {
        match input.command {
            MatchCommand::Controls { player, controls } => {
                *self.held.for_player_mut(player) = controls;
                self.holders[player.index()] = Some(input.connection_id);
            }
            MatchCommand::Start => {
                if self.state.start() {
                    info!(match_id = %self.state.id, round = self.state.round, "Round started");
                    let _ = self.snapshot_tx.send(ServerMsg::RoundStarted {
                        round: self.state.round,
                    });
                } else {
                    debug!(match_id = %self.state.id, phase = ?self.state.phase, "Start ignored");
                }
            }
            MatchCommand::Reset => {
                self.state.reset();
                info!(match_id = %self.state.id, phase = ?self.state.phase, "Match reset");
                if self.state.phase == RoundPhase::Running {
                    let _ = self.snapshot_tx.send(ServerMsg::RoundStarted {
                        round: self.state.round,
                    });
                }
            }
            MatchCommand::Disconnect => {
                for player in PlayerId::ALL {
                    if self.holders[player.index()] == Some(input.connection_id) {
                        *self.held.for_player_mut(player) = Default::default();
                        self.holders[player.index()] = None;
                        debug!(connection_id = %input.connection_id, player = %player, "Released controls");
                    }
                }
            }
        }
    }
}
