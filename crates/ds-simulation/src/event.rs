use ds_core::{Direction, NarrativeKey};
use serde::{Deserialize, Serialize};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Vitality ran out.
    Exhaustion,
    /// The enemy meter ran out while a creature was present.
    Overrun,
}

impl std::fmt::Display for EndCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhaustion => write!(f, "exhaustion"),
            Self::Overrun => write!(f, "overrun"),
        }
    }
}

/// Final tally handed to the collaborator when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// `days_passed * rooms_visited`.
    pub score: u32,
    /// Days survived, starting from 1.
    pub days_passed: u32,
    /// Successful moves plus the starting room.
    pub rooms_visited: u32,
    /// What ended the run.
    pub cause: EndCause,
}

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEventKind {
    // Narration
    /// The player entered a room; show its description.
    Narrated {
        /// Description of the room the player is now in.
        key: NarrativeKey,
    },
    /// A move was refused because no door opens that way.
    Blocked {
        /// The direction the player tried.
        direction: Direction,
        /// One of the blocked-path texts.
        key: NarrativeKey,
    },
    /// A resource cache was collected.
    ResourcesFound,
    /// Searching found nothing.
    ResourcesNotFound,

    // HUD
    /// The day counter advanced.
    DayChanged {
        /// Days passed so far.
        days_passed: u32,
    },
    /// Vitality changed.
    VitalityChanged {
        /// Current vitality.
        vitality: i32,
    },
    /// The enemy meter changed.
    EnemyMeterChanged {
        /// Current meter value.
        meter: i32,
    },
    /// The player-facing coordinates changed.
    PositionChanged {
        /// Signed offset east of the start.
        display_x: i32,
        /// Signed offset north of the start.
        display_y: i32,
    },

    // Hazards
    /// A creature appeared (`present: true`) or was escaped (`present: false`).
    HazardChanged {
        /// Whether the hazard sub-state is now active.
        present: bool,
    },
    /// A loud noise drew creatures into rooms across the world.
    EnemiesSpread {
        /// How many rooms gained a creature.
        rooms: usize,
    },

    // Lifecycle
    /// The run is over.
    GameOver(RunSummary),
}

impl SimEventKind {
    /// The narrative key a frontend should show for this event, if any.
    pub fn narrative(&self) -> Option<NarrativeKey> {
        match self {
            Self::Narrated { key } | Self::Blocked { key, .. } => Some(*key),
            Self::ResourcesFound => Some(NarrativeKey::ResourcesFound),
            Self::ResourcesNotFound => Some(NarrativeKey::ResourcesNotFound),
            Self::HazardChanged { present: true } => Some(NarrativeKey::EnemyAppeared),
            Self::HazardChanged { present: false } => Some(NarrativeKey::EnemyEscaped),
            Self::EnemiesSpread { .. } => Some(NarrativeKey::CreaturesHeard),
            _ => None,
        }
    }

    /// Whether this event only refreshes a HUD counter.
    pub fn is_hud(&self) -> bool {
        matches!(
            self,
            Self::DayChanged { .. }
                | Self::VitalityChanged { .. }
                | Self::EnemyMeterChanged { .. }
                | Self::PositionChanged { .. }
        )
    }
}

/// A record of something that happened during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// The engine tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }

    /// The run summary if this is the terminal event.
    pub fn summary(&self) -> Option<RunSummary> {
        match self.kind {
            SimEventKind::GameOver(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Accumulates events during a run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all narration-bearing events, oldest first.
    pub fn narration(&self) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.narrative().is_some())
            .collect()
    }

    /// The terminal summary, if the run has ended and it is still in the log.
    pub fn summary(&self) -> Option<RunSummary> {
        self.events.iter().rev().find_map(SimEvent::summary)
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
