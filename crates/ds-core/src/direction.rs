//! Cardinal directions.
//!
//! Every place that needs to know "which way is north" goes through
//! [`Direction::spec`]: carving uses it to find neighbors and mirror doors,
//! the engine uses it to move the player and update display coordinates.

use serde::{Deserialize, Serialize};

/// One of the four compass directions a door can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0 of the grid.
    North,
    /// Toward the last column of the grid.
    East,
    /// Toward the last row of the grid.
    South,
    /// Toward column 0 of the grid.
    West,
}

/// Offsets and mirror data for a single direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionSpec {
    /// Column delta on the grid.
    pub grid_dx: i32,
    /// Row delta on the grid.
    pub grid_dy: i32,
    /// Delta applied to the player-facing x coordinate.
    pub display_dx: i32,
    /// Delta applied to the player-facing y coordinate.
    pub display_dy: i32,
    /// The direction the neighbor's matching door faces.
    pub opposite: Direction,
}

static SPECS: [DirectionSpec; 4] = [
    DirectionSpec {
        grid_dx: 0,
        grid_dy: -1,
        display_dx: 0,
        display_dy: 1,
        opposite: Direction::South,
    },
    DirectionSpec {
        grid_dx: 1,
        grid_dy: 0,
        display_dx: 1,
        display_dy: 0,
        opposite: Direction::West,
    },
    DirectionSpec {
        grid_dx: 0,
        grid_dy: 1,
        display_dx: 0,
        display_dy: -1,
        opposite: Direction::North,
    },
    DirectionSpec {
        grid_dx: -1,
        grid_dy: 0,
        display_dx: -1,
        display_dy: 0,
        opposite: Direction::East,
    },
];

impl Direction {
    /// All directions in door-index order: north, east, south, west.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Index into a room's door array.
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Offset and mirror data for this direction.
    pub fn spec(self) -> &'static DirectionSpec {
        &SPECS[self.index()]
    }

    /// The direction facing back the way we came.
    pub fn opposite(self) -> Direction {
        self.spec().opposite
    }

    /// Step one cell from `(x, y)` on a `size`×`size` grid.
    ///
    /// Returns `None` when the step would leave the grid.
    pub fn step(self, x: usize, y: usize, size: usize) -> Option<(usize, usize)> {
        let spec = self.spec();
        let nx = x.checked_add_signed(spec.grid_dx as isize)?;
        let ny = y.checked_add_signed(spec.grid_dy as isize)?;
        (nx < size && ny < size).then_some((nx, ny))
    }

    /// Parse a direction from user input like "n", "north", "E".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" | "north" => Some(Self::North),
            "e" | "east" => Some(Self::East),
            "s" | "south" => Some(Self::South),
            "w" | "west" => Some(Self::West),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::North => write!(f, "north"),
            Self::East => write!(f, "east"),
            Self::South => write!(f, "south"),
            Self::West => write!(f, "west"),
        }
    }
}
