//! Shared Game State
//!
//! The single mutable aggregate read and written by the quest and dialogue
//! engines. Owned by the session; engines borrow it per call.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Facing direction of the player on the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Status of a quest for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Quest has never been started
    NotStarted,
    /// Quest is active, pointing at a current step
    InProgress,
    /// Quest finished and rewards applied
    Completed,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::NotStarted => "not_started",
            QuestStatus::InProgress => "in_progress",
            QuestStatus::Completed => "completed",
        }
    }
}

/// Runtime progress of a single quest.
///
/// `step_id` is present exactly while the quest is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRuntimeState {
    pub status: QuestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
}

impl QuestRuntimeState {
    pub fn not_started() -> Self {
        Self {
            status: QuestStatus::NotStarted,
            step_id: None,
        }
    }

    pub fn in_progress(step_id: &str) -> Self {
        Self {
            status: QuestStatus::InProgress,
            step_id: Some(step_id.to_string()),
        }
    }

    pub fn completed() -> Self {
        Self {
            status: QuestStatus::Completed,
            step_id: None,
        }
    }
}

/// Player position on the tile grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub map_id: String,
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
}

/// The canonical in-memory game state.
///
/// A quest absent from `quests` is implicitly not started; a flag absent
/// from `flags` is implicitly false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub player: PlayerState,
    pub quests: HashMap<String, QuestRuntimeState>,
    pub flags: HashMap<String, bool>,
}

impl GameState {
    /// Create a fresh state at the given spawn tile
    pub fn new(map_id: &str, x: i32, y: i32) -> Self {
        Self {
            player: PlayerState {
                map_id: map_id.to_string(),
                x,
                y,
                direction: Direction::Down,
            },
            quests: HashMap::new(),
            flags: HashMap::new(),
        }
    }

    /// Runtime state for a quest, defaulting to not started
    pub fn quest_state(&self, quest_id: &str) -> QuestRuntimeState {
        self.quests
            .get(quest_id)
            .cloned()
            .unwrap_or_else(QuestRuntimeState::not_started)
    }

    /// Value of a world flag, defaulting to false
    pub fn flag(&self, flag_id: &str) -> bool {
        self.flags.get(flag_id).copied().unwrap_or(false)
    }

    /// Set a world flag
    pub fn set_flag(&mut self, flag_id: &str, value: bool) {
        self.flags.insert(flag_id.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_quest_is_not_started() {
        let state = GameState::new("town", 2, 2);
        let quest = state.quest_state("lost_apple");
        assert_eq!(quest.status, QuestStatus::NotStarted);
        assert!(quest.step_id.is_none());
    }

    #[test]
    fn test_absent_flag_is_false() {
        let mut state = GameState::new("town", 2, 2);
        assert!(!state.flag("elder_helped"));

        state.set_flag("elder_helped", true);
        assert!(state.flag("elder_helped"));
    }
}
