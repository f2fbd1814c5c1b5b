//! Local high score table.
//!
//! Ten slots keyed by rank, persisted as a flat JSON object
//! (`{"1": 420, "2": 300, ...}`). Empty slots hold 0.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of ranked slots.
pub const LEADERBOARD_SIZE: usize = 10;

/// File used when no `--file` is given.
pub const DEFAULT_FILE: &str = "desolate-scores.json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    scores: [u32; LEADERBOARD_SIZE],
}

impl Leaderboard {
    /// Load from `path`. A missing file is an empty board.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Parse the rank-keyed JSON form. Unknown ranks are ignored and the
    /// result is re-sorted, so hand-edited files still load.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let raw: BTreeMap<String, u32> =
            serde_json::from_str(json).map_err(|e| format!("invalid leaderboard: {e}"))?;
        let mut board = Self::default();
        for (rank, score) in raw {
            match rank.parse::<usize>() {
                Ok(r) if (1..=LEADERBOARD_SIZE).contains(&r) => board.scores[r - 1] = score,
                _ => log::warn!("ignoring leaderboard entry with rank {rank:?}"),
            }
        }
        board.scores.sort_unstable_by(|a, b| b.cmp(a));
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String, String> {
        let map: BTreeMap<String, u32> = self
            .scores
            .iter()
            .enumerate()
            .map(|(i, score)| ((i + 1).to_string(), *score))
            .collect();
        serde_json::to_string_pretty(&map).map_err(|e| e.to_string())
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        fs::write(path, self.to_json()?)
            .map_err(|e| format!("cannot write {}: {e}", path.display()))
    }

    /// Place `score` on the board. Returns its 1-based rank, or `None` when
    /// it does not beat the lowest entry. Ties rank below existing scores.
    pub fn insert(&mut self, score: u32) -> Option<usize> {
        let slot = self.scores.iter().position(|&s| score > s)?;
        self.scores[slot..].rotate_right(1);
        self.scores[slot] = score;
        Some(slot + 1)
    }

    /// Scores in rank order, highest first.
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }
}

/// Resolve the leaderboard path from an optional override.
pub fn resolve_path(file: Option<&Path>) -> PathBuf {
    file.map_or_else(|| PathBuf::from(DEFAULT_FILE), Path::to_path_buf)
}
