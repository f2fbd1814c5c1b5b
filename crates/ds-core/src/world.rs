use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::room::Room;

/// The generated grid. Owns every room for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    size: usize,
    rooms: Vec<Room>,
    room_count: usize,
}

/// A door that is open on one side of an edge but not the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorViolation {
    /// Column of the room whose door is open.
    pub x: usize,
    /// Row of the room whose door is open.
    pub y: usize,
    /// Direction of the offending door.
    pub direction: Direction,
}

impl World {
    /// A grid of closed, uncarved rooms, each stamped with its coordinates.
    pub fn closed(size: usize) -> Self {
        let rooms = (0..size * size)
            .map(|i| Room::at(i % size, i / size))
            .collect();
        Self {
            size,
            rooms,
            room_count: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Coordinates of the home room.
    pub fn center(&self) -> (usize, usize) {
        (self.size / 2, self.size / 2)
    }

    /// Number of rooms carved by the generator (home excluded).
    pub fn room_count(&self) -> usize {
        self.room_count
    }

    pub(crate) fn set_room_count(&mut self, count: usize) {
        self.room_count = count;
    }

    /// The room at `(x, y)`, or `None` off the grid.
    pub fn room(&self, x: usize, y: usize) -> Option<&Room> {
        self.index(x, y).map(|i| &self.rooms[i])
    }

    /// Mutable access to the room at `(x, y)`.
    pub fn room_mut(&mut self, x: usize, y: usize) -> Option<&mut Room> {
        self.index(x, y).map(|i| &mut self.rooms[i])
    }

    /// The room one step away in `dir`, if that step stays on the grid.
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<&Room> {
        let (nx, ny) = dir.step(x, y, self.size)?;
        self.room(nx, ny)
    }

    /// All rooms in row-major order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// All rooms in row-major order, mutably.
    ///
    /// Doors are not meant to be edited through this; use [`World::connect`].
    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.iter_mut()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    // -----------------------------------------------------------------------
    // Doors
    // -----------------------------------------------------------------------

    /// Open the door from `(x, y)` toward `dir` and its mirror on the neighbor.
    ///
    /// Returns `false` (and changes nothing) when the neighbor is off the grid.
    pub fn connect(&mut self, x: usize, y: usize, dir: Direction) -> bool {
        let Some((nx, ny)) = dir.step(x, y, self.size) else {
            return false;
        };
        if let Some(room) = self.room_mut(x, y) {
            room.open_door(dir);
        }
        if let Some(other) = self.room_mut(nx, ny) {
            other.open_door(dir.opposite());
        }
        true
    }

    /// First door that is open toward the grid edge or lacks its mirror.
    pub fn check_door_symmetry(&self) -> Option<DoorViolation> {
        for room in &self.rooms {
            for dir in room.open_doors() {
                let mirrored = self
                    .neighbor(room.x, room.y, dir)
                    .is_some_and(|n| n.has_door(dir.opposite()));
                if !mirrored {
                    return Some(DoorViolation {
                        x: room.x,
                        y: room.y,
                        direction: dir,
                    });
                }
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Rooms the carver has expanded, home included.
    pub fn pathed_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.has_been_pathed).count()
    }

    /// Rooms still holding a resource cache.
    pub fn resource_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.has_resources).count()
    }

    /// Rooms currently harboring a creature.
    pub fn enemy_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.has_enemy).count()
    }

    /// Rooms the player has entered.
    pub fn visited_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.has_been_visited).count()
    }

    /// Coordinates of every room reachable from `(x, y)` through open doors,
    /// in breadth-first order. Includes the start room.
    pub fn reachable_from(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let Some(start) = self.index(x, y) else {
            return Vec::new();
        };
        let mut seen = vec![false; self.rooms.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        seen[start] = true;
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            order.push((cx, cy));
            let room = &self.rooms[cy * self.size + cx];
            for dir in room.open_doors() {
                if let Some((nx, ny)) = dir.step(cx, cy, self.size) {
                    let i = ny * self.size + nx;
                    if !seen[i] {
                        seen[i] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        order
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Draw the maze with `#` walls. Rooms show as `H` (home), `E` (enemy),
    /// `R` (resources) or `.`; `@` marks `player` when given. Uncarved cells
    /// are solid wall.
    pub fn render_ascii(&self, player: Option<(usize, usize)>) -> String {
        let width = self.size * 2 + 1;
        let mut canvas = vec![vec!['#'; width]; width];

        for room in &self.rooms {
            if !room.has_been_pathed {
                continue;
            }
            let (cx, cy) = (room.x * 2 + 1, room.y * 2 + 1);
            canvas[cy][cx] = if player == Some((room.x, room.y)) {
                '@'
            } else if (room.x, room.y) == self.center() {
                'H'
            } else if room.has_enemy {
                'E'
            } else if room.has_resources {
                'R'
            } else {
                '.'
            };
            if room.has_door(Direction::East) {
                canvas[cy][cx + 1] = ' ';
            }
            if room.has_door(Direction::South) {
                canvas[cy + 1][cx] = ' ';
            }
        }

        let mut out = String::with_capacity(width * (width + 1));
        for row in canvas {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_world_stamps_coordinates() {
        let world = World::closed(4);
        assert_eq!(world.size(), 4);
        assert_eq!(world.rooms().count(), 16);
        let room = world.room(3, 1).unwrap();
        assert_eq!((room.x, room.y), (3, 1));
        assert!(world.room(4, 0).is_none());
        assert_eq!(world.center(), (2, 2));
    }

    #[test]
    fn connect_opens_both_sides() {
        let mut world = World::closed(3);
        assert!(world.connect(1, 1, Direction::North));
        assert!(world.room(1, 1).unwrap().has_door(Direction::North));
        assert!(world.room(1, 0).unwrap().has_door(Direction::South));
        assert!(world.check_door_symmetry().is_none());
    }

    #[test]
    fn connect_refuses_edge() {
        let mut world = World::closed(3);
        assert!(!world.connect(0, 0, Direction::West));
        assert_eq!(world.room(0, 0).unwrap().door_count(), 0);
    }

    #[test]
    fn symmetry_check_reports_one_sided_door() {
        let mut world = World::closed(3);
        world.room_mut(1, 1).unwrap().open_door(Direction::East);
        let violation = world.check_door_symmetry().unwrap();
        assert_eq!((violation.x, violation.y), (1, 1));
        assert_eq!(violation.direction, Direction::East);
    }

    #[test]
    fn symmetry_check_reports_edge_door() {
        let mut world = World::closed(3);
        world.room_mut(0, 0).unwrap().open_door(Direction::North);
        assert!(world.check_door_symmetry().is_some());
    }

    #[test]
    fn reachable_follows_open_doors_only() {
        let mut world = World::closed(3);
        world.connect(0, 0, Direction::East);
        world.connect(1, 0, Direction::South);
        world.connect(2, 2, Direction::North);

        let reach = world.reachable_from(0, 0);
        assert_eq!(reach, vec![(0, 0), (1, 0), (1, 1)]);
        assert!(world.reachable_from(9, 9).is_empty());
    }

    #[test]
    fn render_marks_player_and_walls() {
        let mut world = World::closed(3);
        for room in world.rooms_mut() {
            room.has_been_pathed = true;
        }
        world.connect(1, 1, Direction::East);
        world.room_mut(0, 0).unwrap().has_resources = true;
        world.room_mut(2, 2).unwrap().has_enemy = true;

        let map = world.render_ascii(Some((2, 1)));
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "#######");
        assert_eq!(lines[1], "#R#.#.#");
        assert_eq!(lines[3], "#.#H @#");
        assert_eq!(lines[5], "#.#.#E#");
    }
}
