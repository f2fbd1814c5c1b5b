//! Randomized maze carving.
//!
//! The home room sits at the center of the grid with all four doors open.
//! Each of its neighbors is seeded with a single door facing home, then the
//! carver walks depth-first from every seed. A room being carved rolls for
//! resources and an enemy, picks a description, and then considers its doors
//! north, east, south, west in that order: an in-bounds door opens on a coin
//! flip, and an uncarved room behind a freshly opened door is carved before
//! the next direction is tried. Declined coin flips leave maze walls, so the
//! result is usually not fully connected.
//!
//! The walk keeps its own stack of frames instead of recursing, which bounds
//! memory by the number of cells while drawing random numbers in exactly the
//! same order a recursive walk would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::narrative::{NarrativeKey, ROOM_DESCRIPTION_COUNT};
use crate::world::World;

/// Smallest grid that fits the home room and its four neighbors.
pub const MIN_GRID_SIZE: usize = 3;

/// Source of the random decisions made while carving.
///
/// Implemented for every [`rand::Rng`]; tests can script outcomes directly.
pub trait RandomSource {
    /// Return `true` with the given probability (`0.0..=1.0`).
    fn chance(&mut self, probability: f64) -> bool;

    /// Pick an index uniformly from `0..len`. Returns 0 when `len` is 0.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn chance(&mut self, probability: f64) -> bool {
        self.random_bool(probability)
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.random_range(0..len)
    }
}

/// Configuration for world generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Chance that a carved room holds a resource cache.
    pub resource_chance: f64,
    /// Chance that a carved room holds a creature.
    pub enemy_chance: f64,
    /// Chance that an in-bounds door is opened.
    pub door_chance: f64,
    /// How many room descriptions to draw from.
    pub description_pool: u8,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            resource_chance: 0.25,
            enemy_chance: 0.25,
            door_chance: 0.5,
            description_pool: ROOM_DESCRIPTION_COUNT,
        }
    }
}

impl GenConfig {
    /// Set the side length of the grid.
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the chance of a resource cache per carved room.
    pub fn with_resource_chance(mut self, chance: f64) -> Self {
        self.resource_chance = chance;
        self
    }

    /// Set the chance of a creature per carved room.
    pub fn with_enemy_chance(mut self, chance: f64) -> Self {
        self.enemy_chance = chance;
        self
    }

    /// Set the chance of opening an in-bounds door.
    pub fn with_door_chance(mut self, chance: f64) -> Self {
        self.door_chance = chance;
        self
    }

    /// Check every setting before any room is allocated.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(CoreError::InvalidGridSize {
                size: self.grid_size,
                min: MIN_GRID_SIZE,
            });
        }
        for (name, value) in [
            ("resource_chance", self.resource_chance),
            ("enemy_chance", self.enemy_chance),
            ("door_chance", self.door_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::InvalidProbability { name, value });
            }
        }
        if self.description_pool == 0 || self.description_pool > ROOM_DESCRIPTION_COUNT {
            return Err(CoreError::InvalidPool {
                size: self.description_pool,
                max: ROOM_DESCRIPTION_COUNT,
            });
        }
        Ok(())
    }
}

/// Builds worlds from a validated [`GenConfig`].
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: GenConfig,
}

/// A room on the carving stack and the next door it will consider.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: usize,
    y: usize,
    next: usize,
}

impl WorldGenerator {
    /// Validate the configuration and create a generator.
    pub fn new(config: GenConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated settings this generator uses.
    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Generate a world using an RNG seeded from `seed`.
    pub fn generate_seeded(&self, seed: u64) -> World {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }

    /// Generate a world, drawing every random decision from `rng`.
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> World {
        let size = self.config.grid_size;
        let mut world = World::closed(size);
        let (cx, cy) = world.center();

        if let Some(home) = world.room_mut(cx, cy) {
            home.doors = [true; 4];
            home.has_been_visited = true;
            home.has_been_pathed = true;
            home.description = Some(NarrativeKey::Home);
        }

        let mut seeds = Vec::with_capacity(Direction::ALL.len());
        for dir in Direction::ALL {
            if let Some((sx, sy)) = dir.step(cx, cy, size) {
                if let Some(seed) = world.room_mut(sx, sy) {
                    seed.open_door(dir.opposite());
                }
                seeds.push((sx, sy));
            }
        }

        let mut carved = 0;
        for (sx, sy) in seeds {
            // A seed reached through another seed's walk is already carved.
            if world.room(sx, sy).is_some_and(|r| r.has_been_pathed) {
                continue;
            }
            carved += self.carve_from(&mut world, sx, sy, rng);
        }

        world.set_room_count(carved);
        log::info!(
            "generated {size}x{size} world: {carved} rooms carved, {} reachable from home",
            world.reachable_from(cx, cy).len()
        );
        world
    }

    /// Depth-first carve starting at `(x, y)`. Returns the number of rooms carved.
    fn carve_from<R: RandomSource + ?Sized>(
        &self,
        world: &mut World,
        x: usize,
        y: usize,
        rng: &mut R,
    ) -> usize {
        let size = world.size();
        let mut carved = 1;
        self.enter(world, x, y, rng);
        let mut stack = vec![Frame { x, y, next: 0 }];

        while let Some(frame) = stack.last_mut() {
            let Some(&dir) = Direction::ALL.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let (x, y) = (frame.x, frame.y);

            if world.room(x, y).is_some_and(|r| r.has_door(dir)) {
                continue;
            }
            let Some((nx, ny)) = dir.step(x, y, size) else {
                continue;
            };
            if !rng.chance(self.config.door_chance) {
                continue;
            }

            world.connect(x, y, dir);
            if world.room(nx, ny).is_some_and(|r| !r.has_been_pathed) {
                self.enter(world, nx, ny, rng);
                carved += 1;
                stack.push(Frame {
                    x: nx,
                    y: ny,
                    next: 0,
                });
            }
        }
        carved
    }

    /// Roll contents for a room and mark it carved.
    fn enter<R: RandomSource + ?Sized>(&self, world: &mut World, x: usize, y: usize, rng: &mut R) {
        let resources = rng.chance(self.config.resource_chance);
        let enemy = rng.chance(self.config.enemy_chance);
        let pick = rng.pick(self.config.description_pool as usize);

        if let Some(room) = world.room_mut(x, y) {
            room.has_resources |= resources;
            room.has_enemy |= enemy;
            room.has_been_pathed = true;
            room.description = Some(NarrativeKey::Room(pick as u8 + 1));
            log::debug!(
                "carved ({x}, {y}): resources={resources} enemy={enemy} description={}",
                pick + 1
            );
        }
    }
}

/// Validate `config` and generate a world from `rng` in one step.
pub fn generate<R: RandomSource + ?Sized>(config: GenConfig, rng: &mut R) -> CoreResult<World> {
    Ok(WorldGenerator::new(config)?.generate(rng))
}
