//! World Event Surface
//!
//! The discrete interaction events the presentation layer fires at the
//! session. The host decides when an event happens (facing tile, trigger
//! zone); the session decides what it means.

use serde::{Deserialize, Serialize};

/// Immediate quest action carried by a world event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QuestAction {
    /// Start a quest by id
    Start { quest_id: String },
    /// Advance a specific quest with a trigger
    Advance { quest_id: String, trigger: String },
}

/// A discrete interaction event resolved against the engines.
///
/// All parts are optional; an NPC might only open a dialogue, a trigger
/// tile might only fire a bare trigger, and a scripted interaction may
/// combine all three.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Dialogue to open, if any
    pub dialogue_id: Option<String>,
    /// Quest action to apply, if any
    pub quest_action: Option<QuestAction>,
    /// Bare trigger broadcast to every in-progress quest
    pub trigger: Option<String>,
}

impl WorldEvent {
    /// Event that only opens a dialogue
    pub fn dialogue(dialogue_id: &str) -> Self {
        Self {
            dialogue_id: Some(dialogue_id.to_string()),
            ..Default::default()
        }
    }

    /// Event that only fires a bare trigger
    pub fn trigger(trigger: &str) -> Self {
        Self {
            trigger: Some(trigger.to_string()),
            ..Default::default()
        }
    }

    /// True when the event carries no quest effects at all
    pub fn has_effects(&self) -> bool {
        self.quest_action.is_some() || self.trigger.is_some()
    }
}
