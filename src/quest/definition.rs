//! Quest Definition Structures
//!
//! These structures are deserialized from TOML quest files.

use serde::Deserialize;
use tracing::warn;

/// A quest definition file as loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestFile {
    pub quest: RawQuest,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub steps: Vec<RawQuestStep>,
    #[serde(default)]
    pub rewards: Vec<RawReward>,
}

/// Raw step as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestStep {
    pub id: String,
    /// World-event token that advances past this step
    pub trigger: String,
    /// Successor step id; absent on the final step
    pub next: Option<String>,
}

/// Raw reward as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawReward {
    #[serde(rename = "type")]
    pub reward_type: String,
    pub id: String,
    #[serde(default = "default_reward_value")]
    pub value: bool,
}

fn default_reward_value() -> bool {
    true
}

// ============================================================================
// Resolved Quest Structures (after parsing)
// ============================================================================

/// Reward applied when a quest completes.
///
/// Closed set: adding a kind means updating every match on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reward {
    /// Write a boolean world flag
    Flag { id: String, value: bool },
}

impl Reward {
    /// Resolve a raw reward; unrecognized types yield None
    pub fn from_raw(raw: &RawReward) -> Option<Self> {
        match raw.reward_type.as_str() {
            "flag" => Some(Reward::Flag {
                id: raw.id.clone(),
                value: raw.value,
            }),
            _ => None,
        }
    }
}

/// A single step in a quest's chain
#[derive(Debug, Clone)]
pub struct QuestStep {
    pub id: String,
    /// Exact trigger string this step waits for (case-sensitive)
    pub trigger: String,
    /// Successor step id; None marks the final step
    pub next: Option<String>,
}

/// A fully resolved quest definition
#[derive(Debug, Clone)]
pub struct QuestDefinition {
    pub id: String,
    pub title: String,
    /// Steps in authored order; steps[0] is where the quest starts.
    /// Successors are referenced by id rather than index so authored
    /// chains need not follow declaration order.
    pub steps: Vec<QuestStep>,
    pub rewards: Vec<Reward>,
}

impl QuestDefinition {
    /// Create a QuestDefinition from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Self {
        let rewards = raw
            .rewards
            .iter()
            .filter_map(|r| {
                let reward = Reward::from_raw(r);
                if reward.is_none() {
                    warn!(
                        "Quest '{}' has reward with unknown type '{}', skipping",
                        raw.id, r.reward_type
                    );
                }
                reward
            })
            .collect();

        Self {
            id: raw.id.clone(),
            title: raw.title.clone(),
            steps: raw
                .steps
                .iter()
                .map(|s| QuestStep {
                    id: s.id.clone(),
                    trigger: s.trigger.clone(),
                    next: s.next.clone(),
                })
                .collect(),
            rewards,
        }
    }

    /// First step of the quest, if any steps exist
    pub fn first_step(&self) -> Option<&QuestStep> {
        self.steps.first()
    }

    /// Get a step by id
    pub fn get_step(&self, step_id: &str) -> Option<&QuestStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }
}
