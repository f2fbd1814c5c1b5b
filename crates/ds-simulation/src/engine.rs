//! The survival state machine.
//!
//! An [`Engine`] owns the world and the player for one run and applies
//! discrete inputs to them: movement, searching, sensor signals and periodic
//! pulses. Every input is a short, non-blocking transition that returns the
//! events it produced and appends them to the event log. Inputs that arrive
//! before [`Engine::start`] or after the run has ended change nothing.

use rand::SeedableRng;
use rand::rngs::StdRng;

use ds_core::narrative::BLOCKED_DESCRIPTION_COUNT;
use ds_core::{Direction, NarrativeKey, RandomSource, World, WorldGenerator};

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::error::SimResult;
use crate::event::{EndCause, EventLog, RunSummary, SimEvent, SimEventKind};
use crate::player::PlayerState;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Generated but not yet started.
    NotStarted,
    /// Accepting inputs.
    Running,
    /// Game over; terminal.
    Ended,
}

/// A periodic timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pulse {
    /// Advance the day counter (every 30 s by default).
    Day,
    /// Drain one point of vitality (every second by default).
    Vitality,
    /// Drain one point of the enemy meter while a creature is present.
    Enemy,
}

/// A discrete input from the collaborator layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Begin the run.
    Start,
    /// Try to walk through a door.
    Move(Direction),
    /// Search the current room for resources.
    Search,
    /// The player shook hard enough to escape a creature.
    Escape,
    /// A microphone amplitude sample.
    Noise(u32),
    /// A periodic timer fired.
    Pulse(Pulse),
}

/// Runs one game of Desolate against a generated world.
pub struct Engine {
    world: World,
    player: PlayerState,
    config: SimConfig,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    pending: Vec<SimEvent>,
    phase: Phase,
    hazard: bool,
    outcome: Option<RunSummary>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("phase", &self.phase)
            .field("tick", &self.clock.tick())
            .field("player", &self.player)
            .field("hazard", &self.hazard)
            .field("events", &self.events.len())
            .finish()
    }
}

impl Engine {
    /// Validate `config` and create an engine for an existing world.
    pub fn new(world: World, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let (cx, cy) = world.center();
        let player = PlayerState::new(cx, cy, config.starting_vitality, config.enemy_meter_max);
        let rng = StdRng::seed_from_u64(config.seed);
        let events = EventLog::new(config.max_events);
        Ok(Self {
            world,
            player,
            config,
            clock: SimClock::new(),
            rng,
            events,
            pending: Vec::new(),
            phase: Phase::NotStarted,
            hazard: false,
            outcome: None,
        })
    }

    /// Validate `config`, generate a world from its seed, and wrap it in an engine.
    pub fn generate(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let world = WorldGenerator::new(config.generation.clone())?.generate_seeded(config.seed);
        Self::new(world, config)
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Apply any input. Returns the events it produced.
    pub fn apply(&mut self, input: Input) -> Vec<SimEvent> {
        match input {
            Input::Start => self.start(),
            Input::Move(dir) => self.move_player(dir),
            Input::Search => self.search(),
            Input::Escape => self.escape(),
            Input::Noise(amplitude) => self.noise_signal(amplitude),
            Input::Pulse(Pulse::Day) => self.tick_day(),
            Input::Pulse(Pulse::Vitality) => self.tick_vitality(),
            Input::Pulse(Pulse::Enemy) => self.tick_enemy(),
        }
    }

    /// Begin the run: place the survivor at home and reset every counter.
    pub fn start(&mut self) -> Vec<SimEvent> {
        if self.phase != Phase::NotStarted {
            log::debug!("start ignored: run is {:?}", self.phase);
            return Vec::new();
        }
        self.clock.advance();
        self.phase = Phase::Running;
        self.hazard = false;

        let (cx, cy) = self.world.center();
        self.player = PlayerState::new(
            cx,
            cy,
            self.config.starting_vitality,
            self.config.enemy_meter_max,
        );
        if let Some(home) = self.world.room_mut(cx, cy) {
            home.has_been_visited = true;
        }
        log::info!(
            "run started on a {0}x{0} world ({1} rooms carved)",
            self.world.size(),
            self.world.room_count()
        );

        self.emit_narration(NarrativeKey::Home);
        self.emit_day();
        self.emit_vitality();
        self.emit_position();
        self.finish()
    }

    /// Walk through the door in `dir`, or report that the way is blocked.
    pub fn move_player(&mut self, dir: Direction) -> Vec<SimEvent> {
        if !self.accepts_actions("move") {
            return Vec::new();
        }
        self.clock.advance();

        let (x, y) = (self.player.x, self.player.y);
        let open = self.world.room(x, y).is_some_and(|r| r.has_door(dir));
        let target = dir.step(x, y, self.world.size()).filter(|_| open);

        let Some((nx, ny)) = target else {
            let pick = self.rng.pick(BLOCKED_DESCRIPTION_COUNT as usize) as u8 + 1;
            let key = NarrativeKey::Blocked(pick);
            log::debug!("blocked going {dir} from ({x}, {y})");
            self.emit(
                SimEventKind::Blocked { direction: dir, key },
                key.english(),
            );
            return self.finish();
        };

        self.player.step(dir, nx, ny);
        let mut description = NarrativeKey::Room(1);
        let mut enemy = false;
        if let Some(room) = self.world.room_mut(nx, ny) {
            room.has_been_visited = true;
            description = room.description.unwrap_or(description);
            enemy = room.has_enemy;
        }
        log::debug!("moved {dir} to ({nx}, {ny})");

        self.emit_narration(description);
        self.emit_position();
        if enemy {
            self.hazard = true;
            log::debug!("creature at ({nx}, {ny})");
            self.emit(
                SimEventKind::HazardChanged { present: true },
                NarrativeKey::EnemyAppeared.english(),
            );
        }
        self.finish()
    }

    /// Collect the resource cache in the current room, if there is one.
    pub fn search(&mut self) -> Vec<SimEvent> {
        if !self.accepts_actions("search") {
            return Vec::new();
        }
        self.clock.advance();

        let found = match self.world.room_mut(self.player.x, self.player.y) {
            Some(room) if room.has_resources => {
                room.has_resources = false;
                true
            }
            _ => false,
        };

        if found {
            self.player
                .restore(self.config.resource_bonus, self.config.vitality_cap);
            self.emit(
                SimEventKind::ResourcesFound,
                NarrativeKey::ResourcesFound.english(),
            );
            self.emit_vitality();
        } else {
            self.emit(
                SimEventKind::ResourcesNotFound,
                NarrativeKey::ResourcesNotFound.english(),
            );
        }
        self.finish()
    }

    /// Advance the day counter. Never ends the run.
    pub fn tick_day(&mut self) -> Vec<SimEvent> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        self.clock.advance();
        self.player.days_passed += 1;
        self.emit_day();
        self.finish()
    }

    /// Drain one point of vitality; the run ends when it reaches zero.
    pub fn tick_vitality(&mut self) -> Vec<SimEvent> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        self.clock.advance();
        self.clock.add_elapsed(self.config.vitality_period());
        self.player.vitality -= 1;

        if self.player.vitality <= 0 {
            self.end(EndCause::Exhaustion);
        } else {
            self.emit_vitality();
        }
        self.finish()
    }

    /// Drain one point of the enemy meter while a creature is present; the
    /// run ends when it reaches zero.
    pub fn tick_enemy(&mut self) -> Vec<SimEvent> {
        if self.phase != Phase::Running || !self.hazard {
            return Vec::new();
        }
        self.clock.advance();
        self.player.enemy_meter -= 1;

        if self.player.enemy_meter <= 0 {
            self.end(EndCause::Overrun);
        } else {
            let meter = self.player.enemy_meter;
            self.emit(
                SimEventKind::EnemyMeterChanged { meter },
                format!("Enemy meter {meter}"),
            );
        }
        self.finish()
    }

    /// Shake off the current creature, refilling the enemy meter.
    ///
    /// The creature stays in its room; walking back in triggers it again.
    pub fn escape(&mut self) -> Vec<SimEvent> {
        if self.phase != Phase::Running || !self.hazard {
            return Vec::new();
        }
        self.clock.advance();
        self.hazard = false;
        self.player.enemy_meter = self.config.enemy_meter_max;
        let meter = self.player.enemy_meter;

        self.emit(
            SimEventKind::HazardChanged { present: false },
            NarrativeKey::EnemyEscaped.english(),
        );
        self.emit(
            SimEventKind::EnemyMeterChanged { meter },
            format!("Enemy meter {meter}"),
        );
        self.finish()
    }

    /// A microphone sample. Loud enough samples draw creatures.
    pub fn noise_signal(&mut self, amplitude: u32) -> Vec<SimEvent> {
        if amplitude > self.config.noise_threshold {
            log::debug!("noise detected with amplitude {amplitude}");
            self.on_loud_noise()
        } else {
            Vec::new()
        }
    }

    /// Every room in the world independently gains a creature with the
    /// configured chance, regardless of distance from the player.
    pub fn on_loud_noise(&mut self) -> Vec<SimEvent> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        self.clock.advance();

        let chance = self.config.noise_spawn_chance;
        let mut spawned = 0;
        for room in self.world.rooms_mut() {
            if self.rng.chance(chance) && !room.has_enemy {
                room.has_enemy = true;
                spawned += 1;
            }
        }
        log::debug!("loud noise spawned creatures in {spawned} rooms");

        self.emit(
            SimEventKind::EnemiesSpread { rooms: spawned },
            NarrativeKey::CreaturesHeard.english(),
        );
        self.finish()
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the engine accepts inputs.
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Whether a creature currently blocks movement and searching.
    pub fn hazard_present(&self) -> bool {
        self.hazard
    }

    /// The world being played.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The survivor's current state.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// The run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Operation tick and simulated elapsed time.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Every event emitted so far, subject to `max_events`.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The final tally once the run has ended.
    pub fn summary(&self) -> Option<RunSummary> {
        self.outcome
    }

    /// Extract the world, consuming the engine.
    pub fn into_world(self) -> World {
        self.world
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn accepts_actions(&self, action: &str) -> bool {
        match (self.phase, self.hazard) {
            (Phase::Running, false) => true,
            (Phase::Running, true) => {
                log::debug!("{action} ignored: a creature blocks the way");
                false
            }
            (phase, _) => {
                log::debug!("{action} ignored: run is {phase:?}");
                false
            }
        }
    }

    fn end(&mut self, cause: EndCause) {
        self.phase = Phase::Ended;
        self.hazard = false;
        let summary = self.build_summary(cause);
        self.outcome = Some(summary);
        log::info!(
            "game over ({cause}): score {} = {} days x {} rooms",
            summary.score,
            summary.days_passed,
            summary.rooms_visited
        );
        self.emit(
            SimEventKind::GameOver(summary),
            format!(
                "Game over after {} days and {} rooms. Score: {}",
                summary.days_passed, summary.rooms_visited, summary.score
            ),
        );
    }

    fn build_summary(&self, cause: EndCause) -> RunSummary {
        RunSummary {
            score: self.player.score(),
            days_passed: self.player.days_passed,
            rooms_visited: self.player.rooms_visited,
            cause,
        }
    }

    fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.pending
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    fn emit_narration(&mut self, key: NarrativeKey) {
        self.emit(SimEventKind::Narrated { key }, key.english());
    }

    fn emit_day(&mut self) {
        let days_passed = self.player.days_passed;
        self.emit(
            SimEventKind::DayChanged { days_passed },
            format!("Day {days_passed}"),
        );
    }

    fn emit_vitality(&mut self) {
        let vitality = self.player.vitality;
        self.emit(
            SimEventKind::VitalityChanged { vitality },
            format!("Vitality {vitality}"),
        );
    }

    fn emit_position(&mut self) {
        let (display_x, display_y) = (self.player.display_x, self.player.display_y);
        self.emit(
            SimEventKind::PositionChanged {
                display_x,
                display_y,
            },
            format!("Coordinates ({display_x}, {display_y})"),
        );
    }

    /// Move pending events into the log and hand them back to the caller.
    fn finish(&mut self) -> Vec<SimEvent> {
        let emitted = std::mem::take(&mut self.pending);
        for event in &emitted {
            self.events.push(event.clone());
        }
        emitted
    }
}
