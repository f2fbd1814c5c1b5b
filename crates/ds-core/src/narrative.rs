//! Narrative text identifiers.
//!
//! The core never produces prose. It hands out [`NarrativeKey`]s and leaves
//! localization to whoever renders them; [`NarrativeKey::english`] is a
//! fallback table for terminal frontends.

use serde::{Deserialize, Serialize};

/// Number of distinct room descriptions the generator draws from.
pub const ROOM_DESCRIPTION_COUNT: u8 = 20;

/// Number of distinct "the way is blocked" texts.
pub const BLOCKED_DESCRIPTION_COUNT: u8 = 4;

/// A localizable piece of narrative text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NarrativeKey {
    /// Shown before the run begins.
    GameStart,
    /// Description of the home room at the center of the grid.
    Home,
    /// One of the carved-room descriptions, numbered from 1.
    Room(u8),
    /// One of the blocked-path texts, numbered from 1.
    Blocked(u8),
    /// A resource cache was found and collected.
    ResourcesFound,
    /// Searching turned up nothing.
    ResourcesNotFound,
    /// A loud noise drew more creatures into the world.
    CreaturesHeard,
    /// A creature is in the room with the player.
    EnemyAppeared,
    /// The player shook the creature off.
    EnemyEscaped,
}

const ROOM_TEXT: [&str; ROOM_DESCRIPTION_COUNT as usize] = [
    "Ash drifts through a collapsed stairwell.",
    "A rusted bus lies on its side, windows dark.",
    "Dead vines choke the frame of a greenhouse.",
    "The floor of this office gave way long ago.",
    "Shopping carts are piled into a barricade.",
    "A radio tower hums with no one listening.",
    "Water drips steadily from a cracked ceiling.",
    "Rows of empty shelves stretch into shadow.",
    "A playground stands silent under grey skies.",
    "Tattered tents circle a long-dead fire.",
    "A flooded underpass reflects a flickering sign.",
    "Paper notices flutter on a police station wall.",
    "Bones of a market stall lean against each other.",
    "A church bell lies cracked in the courtyard.",
    "The smell of smoke clings to a gutted kitchen.",
    "Train cars rust in a silent rail yard.",
    "A hospital corridor is lined with empty beds.",
    "Broken glass glitters across a parking lot.",
    "Wind moans through the ribs of a warehouse.",
    "A library's books have swollen with rain.",
];

const BLOCKED_TEXT: [&str; BLOCKED_DESCRIPTION_COUNT as usize] = [
    "Rubble blocks the way.",
    "A wall of twisted metal stands in your path.",
    "The ground drops away into a dark pit.",
    "A locked gate will not budge.",
];

impl NarrativeKey {
    /// English fallback text for terminal frontends.
    pub fn english(self) -> &'static str {
        match self {
            Self::GameStart => "The world has gone quiet. Press start when you are ready.",
            Self::Home => "Your shelter. Four doors lead out into the desolation.",
            Self::Room(n) => pool_text(&ROOM_TEXT, n),
            Self::Blocked(n) => pool_text(&BLOCKED_TEXT, n),
            Self::ResourcesFound => "You find supplies and feel your strength return.",
            Self::ResourcesNotFound => "You search but find nothing useful.",
            Self::CreaturesHeard => "The creatures hear you. More appear.",
            Self::EnemyAppeared => "Something shrieks in the dark! Shake it off!",
            Self::EnemyEscaped => "You shake the creature loose and slip away.",
        }
    }

    /// Whether this key is a carved-room description.
    pub fn is_room(self) -> bool {
        matches!(self, Self::Room(n) if (1..=ROOM_DESCRIPTION_COUNT).contains(&n))
    }

    /// Whether this key is one of the blocked-path texts.
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked(n) if (1..=BLOCKED_DESCRIPTION_COUNT).contains(&n))
    }
}

fn pool_text(pool: &[&'static str], n: u8) -> &'static str {
    (n as usize)
        .checked_sub(1)
        .and_then(|i| pool.get(i))
        .copied()
        .unwrap_or("...")
}

impl std::fmt::Display for NarrativeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameStart => write!(f, "game_start"),
            Self::Home => write!(f, "room_description0"),
            Self::Room(n) => write!(f, "room_description{n}"),
            Self::Blocked(n) => write!(f, "room_blocked{n}"),
            Self::ResourcesFound => write!(f, "resources_found"),
            Self::ResourcesNotFound => write!(f, "resources_not_found"),
            Self::CreaturesHeard => write!(f, "creatures_heard"),
            Self::EnemyAppeared => write!(f, "enemy_appeared"),
            Self::EnemyEscaped => write!(f, "enemy_escaped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_as_resource_names() {
        assert_eq!(NarrativeKey::Home.to_string(), "room_description0");
        assert_eq!(NarrativeKey::Room(7).to_string(), "room_description7");
        assert_eq!(NarrativeKey::Blocked(2).to_string(), "room_blocked2");
        assert_eq!(NarrativeKey::ResourcesNotFound.to_string(), "resources_not_found");
    }

    #[test]
    fn every_pool_entry_has_text() {
        for n in 1..=ROOM_DESCRIPTION_COUNT {
            assert_ne!(NarrativeKey::Room(n).english(), "...");
            assert!(NarrativeKey::Room(n).is_room());
        }
        for n in 1..=BLOCKED_DESCRIPTION_COUNT {
            assert_ne!(NarrativeKey::Blocked(n).english(), "...");
            assert!(NarrativeKey::Blocked(n).is_blocked());
        }
    }

    #[test]
    fn out_of_pool_keys_fall_back() {
        assert_eq!(NarrativeKey::Room(0).english(), "...");
        assert_eq!(NarrativeKey::Blocked(9).english(), "...");
        assert!(!NarrativeKey::Blocked(5).is_blocked());
        assert!(!NarrativeKey::Home.is_room());
    }

    #[test]
    fn keys_serialize_as_json() {
        let json = serde_json::to_string(&NarrativeKey::Room(3)).unwrap();
        assert_eq!(json, r#"{"Room":3}"#);
        let back: NarrativeKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NarrativeKey::Room(3));
    }
}
