//! Async driver for an [`Engine`].
//!
//! [`spawn_engine`] moves the engine into a single actor task. Frontends talk
//! to it through a cloneable [`EngineHandle`]; everything the engine emits is
//! forwarded to an [`EventStream`]. Once a run starts, three interval timers
//! feed day, vitality and enemy pulses into the same command channel, so
//! player inputs and pulses are applied strictly one at a time in arrival
//! order.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use ds_core::Direction;

use crate::engine::{Engine, Input, Phase, Pulse};
use crate::error::{SimError, SimResult};
use crate::event::{RunSummary, SimEvent};
use crate::player::PlayerState;

/// A message to the engine actor.
#[derive(Debug)]
pub enum Command {
    /// Apply an input to the engine.
    Input(Input),
    /// Reply with a [`Snapshot`] of the current state.
    Snapshot(oneshot::Sender<Snapshot>),
    /// Stop the timers and exit.
    Shutdown,
}

/// A point-in-time copy of the engine state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Lifecycle phase of the run.
    pub phase: Phase,
    /// Operations processed so far.
    pub tick: u64,
    /// The survivor's counters and position.
    pub player: PlayerState,
    /// Whether a creature currently blocks the player.
    pub hazard: bool,
    /// Simulated time covered by vitality pulses so far.
    pub elapsed: Duration,
    /// Rooms carved by the generator, home excluded.
    pub rooms_carved: usize,
    /// Final tally once the run has ended.
    pub summary: Option<RunSummary>,
    /// ASCII map with the player marked.
    pub map: String,
}

impl Snapshot {
    fn of(engine: &Engine) -> Self {
        let player = engine.player().clone();
        Self {
            phase: engine.phase(),
            tick: engine.clock().tick(),
            hazard: engine.hazard_present(),
            elapsed: engine.clock().elapsed(),
            rooms_carved: engine.world().room_count(),
            summary: engine.summary(),
            map: engine.world().render_ascii(Some((player.x, player.y))),
            player,
        }
    }
}

/// Cloneable sender side of a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    /// Begin the run and arm the timers.
    pub fn start(&self) -> SimResult<()> {
        self.input(Input::Start)
    }

    /// Try to walk through the door in `direction`.
    pub fn move_player(&self, direction: Direction) -> SimResult<()> {
        self.input(Input::Move(direction))
    }

    /// Search the current room for supplies.
    pub fn search(&self) -> SimResult<()> {
        self.input(Input::Search)
    }

    /// Report a shake strong enough to escape a creature.
    pub fn escape(&self) -> SimResult<()> {
        self.input(Input::Escape)
    }

    /// Report a microphone amplitude sample.
    pub fn noise(&self, amplitude: u32) -> SimResult<()> {
        self.input(Input::Noise(amplitude))
    }

    /// Inject a pulse by hand, independent of the timers.
    pub fn pulse(&self, pulse: Pulse) -> SimResult<()> {
        self.input(Input::Pulse(pulse))
    }

    /// Ask the actor for a copy of the current state.
    pub async fn snapshot(&self) -> SimResult<Snapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        rx.await.map_err(|_| SimError::ChannelClosed)
    }

    /// Stop the timers and the actor. Queued commands ahead of this one still apply.
    pub fn shutdown(&self) -> SimResult<()> {
        self.send(Command::Shutdown)
    }

    /// Whether the actor has exited.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn input(&self, input: Input) -> SimResult<()> {
        self.send(Command::Input(input))
    }

    fn send(&self, command: Command) -> SimResult<()> {
        self.tx.send(command).map_err(|_| SimError::ChannelClosed)
    }
}

/// Receiver side for everything the engine emits.
///
/// Ends (yields `None`) after the actor exits; a finished run's last event is
/// always its `GameOver`.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<SimEvent>,
}

impl EventStream {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<SimEvent> {
        self.rx.recv().await
    }

    /// Take an event if one is already queued.
    pub fn try_recv(&mut self) -> Option<SimEvent> {
        self.rx.try_recv().ok()
    }
}

/// Move `engine` into an actor task on the current tokio runtime.
///
/// Timer periods and the shutdown grace come from the engine's config.
pub fn spawn_engine(engine: Engine) -> (EngineHandle, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let actor = Actor {
        rx,
        events_tx,
        pulses: tx.downgrade(),
        timers: Vec::new(),
        engine,
    };
    tokio::spawn(actor.run());
    (EngineHandle { tx }, EventStream { rx: events_rx })
}

struct Actor {
    rx: mpsc::UnboundedReceiver<Command>,
    events_tx: mpsc::UnboundedSender<SimEvent>,
    /// Weak so that timers alone never keep the actor alive.
    pulses: mpsc::WeakUnboundedSender<Command>,
    timers: Vec<JoinHandle<()>>,
    engine: Engine,
}

impl Actor {
    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Input(input) => {
                    let events = self.engine.apply(input);
                    if input == Input::Start && !events.is_empty() {
                        self.arm_timers();
                    }
                    if self.forward(events).await {
                        break;
                    }
                }
                Command::Snapshot(reply) => {
                    // The requester may have given up waiting.
                    let _ = reply.send(Snapshot::of(&self.engine));
                }
                Command::Shutdown => {
                    log::debug!("engine actor shutting down");
                    break;
                }
            }
        }
        self.stop_timers().await;
    }

    /// Forward events in order. Returns `true` once the run is over; the
    /// terminal event is held back until the timers have stopped.
    async fn forward(&mut self, events: Vec<SimEvent>) -> bool {
        for event in events {
            if event.summary().is_some() {
                self.stop_timers().await;
                let _ = self.events_tx.send(event);
                return true;
            }
            if self.events_tx.send(event).is_err() {
                log::trace!("event stream dropped; discarding event");
            }
        }
        false
    }

    fn arm_timers(&mut self) {
        let config = self.engine.config();
        let periods = [
            (Pulse::Day, config.day_period()),
            (Pulse::Vitality, config.vitality_period()),
            (Pulse::Enemy, config.enemy_period()),
        ];
        for (pulse, period) in periods {
            self.timers
                .push(spawn_timer(self.pulses.clone(), pulse, period));
        }
        log::debug!("armed {} timers", self.timers.len());
    }

    async fn stop_timers(&mut self) {
        let grace = self.engine.config().shutdown_grace();
        for timer in self.timers.drain(..) {
            timer.abort();
            if tokio::time::timeout(grace, timer).await.is_err() {
                log::warn!("timer did not stop within {grace:?}; continuing shutdown");
            }
        }
    }
}

fn spawn_timer(
    pulses: mpsc::WeakUnboundedSender<Command>,
    pulse: Pulse,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(tx) = pulses.upgrade() else {
                break;
            };
            if tx.send(Command::Input(Input::Pulse(pulse))).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::event::{EndCause, SimEventKind};
    use ds_core::{NarrativeKey, World};

    /// 3x3 world: home in the middle, a creature's den to the east.
    fn den_world() -> World {
        let mut world = World::closed(3);
        world.connect(1, 1, Direction::East);
        for (x, y) in [(1, 1), (2, 1)] {
            let room = world.room_mut(x, y).unwrap();
            room.has_been_pathed = true;
            room.description = Some(NarrativeKey::Room(2));
        }
        world.room_mut(2, 1).unwrap().has_enemy = true;
        world
    }

    fn spawn(config: SimConfig) -> (EngineHandle, EventStream) {
        spawn_engine(Engine::new(den_world(), config).unwrap())
    }

    async fn drain_until_game_over(stream: &mut EventStream) -> RunSummary {
        while let Some(event) = stream.recv().await {
            if let Some(summary) = event.summary() {
                return summary;
            }
        }
        panic!("stream ended without a game over");
    }

    #[tokio::test(start_paused = true)]
    async fn start_events_are_forwarded() {
        let (handle, mut stream) = spawn(SimConfig::default());
        handle.start().unwrap();
        let first = stream.recv().await.unwrap();
        assert_eq!(
            first.kind,
            SimEventKind::Narrated {
                key: NarrativeKey::Home
            }
        );
        for _ in 0..3 {
            assert!(stream.recv().await.unwrap().kind.is_hud());
        }
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.rooms_carved, 0);
        assert!(snapshot.map.contains('@'));
    }

    #[tokio::test(start_paused = true)]
    async fn timers_wait_for_start() {
        let (handle, _stream) = spawn(SimConfig::default());
        tokio::time::sleep(Duration::from_secs(5)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, Phase::NotStarted);
        assert_eq!(snapshot.player.vitality, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn first_pulse_after_one_full_period() {
        let (handle, _stream) = spawn(SimConfig::default());
        handle.start().unwrap();

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(handle.snapshot().await.unwrap().player.vitality, 100);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(handle.snapshot().await.unwrap().player.vitality, 99);

        tokio::time::sleep(Duration::from_secs(29)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.player.vitality, 70);
        assert_eq!(snapshot.player.days_passed, 2);
        assert_eq!(snapshot.elapsed, Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn vitality_timer_ends_run_and_closes_stream() {
        let config = SimConfig {
            starting_vitality: 5,
            ..SimConfig::default()
        };
        let (handle, mut stream) = spawn(config);
        handle.start().unwrap();

        let summary = drain_until_game_over(&mut stream).await;
        assert_eq!(summary.cause, EndCause::Exhaustion);
        assert_eq!(summary.score, 1);

        assert!(stream.recv().await.is_none());
        assert!(handle.is_closed());
        assert!(matches!(handle.search(), Err(SimError::ChannelClosed)));
        assert!(matches!(
            handle.snapshot().await,
            Err(SimError::ChannelClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn enemy_timer_overruns_player() {
        let config = SimConfig {
            enemy_meter_max: 3,
            ..SimConfig::default()
        };
        let (handle, mut stream) = spawn(config);
        handle.start().unwrap();
        handle.move_player(Direction::East).unwrap();

        let summary = drain_until_game_over(&mut stream).await;
        assert_eq!(summary.cause, EndCause::Overrun);
        assert_eq!(summary.rooms_visited, 2);
        assert_eq!(summary.score, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn escape_refills_meter_between_pulses() {
        let config = SimConfig {
            enemy_meter_max: 3,
            ..SimConfig::default()
        };
        let (handle, _stream) = spawn(config);
        handle.start().unwrap();
        handle.move_player(Direction::East).unwrap();

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.hazard);
        assert_eq!(snapshot.player.enemy_meter, 1);

        handle.escape().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.hazard);
        assert_eq!(snapshot.player.enemy_meter, 3);
        assert_eq!(snapshot.phase, Phase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_pulses_apply_in_order() {
        let config = SimConfig {
            vitality_period_ms: 3_600_000,
            day_period_ms: 3_600_000,
            ..SimConfig::default()
        };
        let (handle, _stream) = spawn(config);
        handle.start().unwrap();
        handle.pulse(Pulse::Day).unwrap();
        handle.pulse(Pulse::Vitality).unwrap();
        handle.pulse(Pulse::Vitality).unwrap();
        handle.noise(10).unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.player.days_passed, 2);
        assert_eq!(snapshot.player.vitality, 98);
        assert_eq!(snapshot.tick, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_actor() {
        let (handle, mut stream) = spawn(SimConfig::default());
        handle.start().unwrap();
        handle.shutdown().unwrap();
        // Start events were sent before shutdown was processed
        let mut received = 0;
        while stream.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 4);
        assert!(matches!(handle.start(), Err(SimError::ChannelClosed)));
    }
}
