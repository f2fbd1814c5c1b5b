use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::narrative::NarrativeKey;

/// One cell of the world grid.
///
/// A default room is closed on all sides and has never been carved. Cells the
/// generator never reaches stay that way for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Open passages, indexed by [`Direction::index`].
    pub doors: [bool; 4],
    /// Column on the grid.
    pub x: usize,
    /// Row on the grid.
    pub y: usize,
    /// Set once carving has expanded this room.
    pub has_been_pathed: bool,
    /// Narrative key assigned at carve time.
    pub description: Option<NarrativeKey>,
    /// Set once the player has stood in this room.
    pub has_been_visited: bool,
    /// An uncollected resource cache is here.
    pub has_resources: bool,
    /// A creature lurks here.
    pub has_enemy: bool,
}

impl Room {
    /// A closed, uncarved room at the given coordinates.
    pub fn at(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Whether the passage toward `dir` is open.
    pub fn has_door(&self, dir: Direction) -> bool {
        self.doors[dir.index()]
    }

    /// Open the passage toward `dir` on this side only.
    pub fn open_door(&mut self, dir: Direction) {
        self.doors[dir.index()] = true;
    }

    /// Directions with an open door, in north-east-south-west order.
    pub fn open_doors(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.has_door(*d))
    }

    /// Number of open doors.
    pub fn door_count(&self) -> usize {
        self.doors.iter().filter(|open| **open).count()
    }
}
