//! Tick-driven survival simulation for Desolate.
//!
//! An [`Engine`] runs one game against a [`ds_core::World`]: it moves the
//! survivor between rooms, drains vitality and the enemy meter on periodic
//! pulses, and reacts to shake and noise signals. The engine itself is
//! synchronous; [`runtime::spawn_engine`] wraps it in a tokio actor with real
//! interval timers for frontends that want a live game.

/// Simulation clock for tracking ticks and elapsed run time.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// The survival state machine.
pub mod engine;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Per-run survivor state.
pub mod player;
/// Async actor and timers driving an engine.
pub mod runtime;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of the engine and its input types.
pub use engine::{Engine, Input, Phase, Pulse};
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of event types.
pub use event::{EndCause, EventLog, RunSummary, SimEvent, SimEventKind};
/// Re-export of [`player::PlayerState`].
pub use player::PlayerState;
/// Re-exports of the async runtime surface.
pub use runtime::{EngineHandle, EventStream, Snapshot, spawn_engine};
