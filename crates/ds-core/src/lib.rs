//! Core types for Desolate: rooms, directions, the world grid, and the maze generator.
//!
//! This crate owns the static shape of a run. It knows nothing about vitality,
//! timers or players; you can generate a [`World`] with any random source and
//! inspect it, render it, or serialize it to JSON.

/// Cardinal directions and the offset table shared by carving and movement.
pub mod direction;
/// Error types used throughout the crate.
pub mod error;
/// Randomized maze carving that builds a [`World`].
pub mod generator;
/// Localizable narrative keys for room descriptions and outcomes.
pub mod narrative;
/// A single grid cell.
pub mod room;
/// The grid of rooms produced by the generator.
pub mod world;

/// Re-export direction types.
pub use direction::Direction;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export generator types.
pub use generator::{GenConfig, RandomSource, WorldGenerator};
/// Re-export narrative keys.
pub use narrative::NarrativeKey;
/// Re-export the room type.
pub use room::Room;
/// Re-export the world model.
pub use world::World;
