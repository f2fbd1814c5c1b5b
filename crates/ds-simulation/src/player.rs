use ds_core::Direction;
use serde::{Deserialize, Serialize};

/// The survivor's position and counters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Column on the grid.
    pub x: usize,
    /// Row on the grid.
    pub y: usize,
    /// Signed offset east of the start, for display only.
    pub display_x: i32,
    /// Signed offset north of the start, for display only.
    pub display_y: i32,
    /// Drains one point per vitality pulse; the run ends at zero.
    pub vitality: i32,
    /// Drains only while a creature is present; the run ends at zero.
    pub enemy_meter: i32,
    /// Starts at 1.
    pub days_passed: u32,
    /// Starts at 1 for the home room; +1 per successful move.
    pub rooms_visited: u32,
}

impl PlayerState {
    /// A fresh survivor standing at `(x, y)`.
    pub fn new(x: usize, y: usize, vitality: i32, enemy_meter: i32) -> Self {
        Self {
            x,
            y,
            display_x: 0,
            display_y: 0,
            vitality,
            enemy_meter,
            days_passed: 1,
            rooms_visited: 1,
        }
    }

    /// Step to `(x, y)` in `dir`, updating display coordinates and the visit count.
    pub fn step(&mut self, dir: Direction, x: usize, y: usize) {
        let spec = dir.spec();
        self.x = x;
        self.y = y;
        self.display_x += spec.display_dx;
        self.display_y += spec.display_dy;
        self.rooms_visited += 1;
    }

    /// Restore vitality, clamped to `cap` when one is set.
    pub fn restore(&mut self, amount: i32, cap: Option<i32>) {
        let restored = self.vitality.saturating_add(amount);
        self.vitality = match cap {
            Some(cap) => restored.min(cap.max(self.vitality)),
            None => restored,
        };
    }

    /// `days_passed * rooms_visited`.
    pub fn score(&self) -> u32 {
        self.days_passed.saturating_mul(self.rooms_visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_player_counters() {
        let player = PlayerState::new(10, 10, 100, 100);
        assert_eq!((player.x, player.y), (10, 10));
        assert_eq!((player.display_x, player.display_y), (0, 0));
        assert_eq!(player.days_passed, 1);
        assert_eq!(player.rooms_visited, 1);
        assert_eq!(player.score(), 1);
    }

    #[test]
    fn step_tracks_display_offsets() {
        let mut player = PlayerState::new(5, 5, 100, 100);
        player.step(Direction::North, 5, 4);
        player.step(Direction::North, 5, 3);
        player.step(Direction::West, 4, 3);
        assert_eq!((player.display_x, player.display_y), (-1, 2));
        assert_eq!((player.x, player.y), (4, 3));
        assert_eq!(player.rooms_visited, 4);
    }

    #[test]
    fn restore_respects_cap() {
        let mut player = PlayerState::new(0, 0, 80, 100);
        player.restore(33, Some(100));
        assert_eq!(player.vitality, 100);

        let mut player = PlayerState::new(0, 0, 80, 100);
        player.restore(33, None);
        assert_eq!(player.vitality, 113);
    }

    #[test]
    fn score_is_days_times_rooms() {
        let mut player = PlayerState::new(0, 0, 1, 1);
        player.days_passed = 4;
        player.rooms_visited = 7;
        assert_eq!(player.score(), 28);
    }
}
