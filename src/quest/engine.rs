//! Quest Engine
//!
//! Advances per-quest runtime state through an ordered step chain in
//! response to named triggers and applies rewards on completion.
//!
//! Every operation either performs a full transition or leaves the game
//! state untouched; precondition failures are signaled by `false`, never
//! by an error.

use std::collections::HashMap;
use tracing::debug;

use crate::state::{GameState, QuestRuntimeState, QuestStatus};
use super::definition::{QuestDefinition, Reward};

/// State machine over the quest runtime map of a [`GameState`]
pub struct QuestEngine {
    definitions: HashMap<String, QuestDefinition>,
}

impl QuestEngine {
    pub fn new(definitions: Vec<QuestDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
        }
    }

    /// Get a quest definition by id
    pub fn definition(&self, quest_id: &str) -> Option<&QuestDefinition> {
        self.definitions.get(quest_id)
    }

    /// Runtime state for a quest, defaulting to not started
    pub fn quest_state(&self, state: &GameState, quest_id: &str) -> QuestRuntimeState {
        state.quest_state(quest_id)
    }

    /// Start a quest.
    ///
    /// Returns false without mutating if the quest is unknown, has no
    /// steps, or is not currently in the not-started state. Repeated calls
    /// on a started quest are no-ops.
    pub fn start_quest(&self, state: &mut GameState, quest_id: &str) -> bool {
        let Some(definition) = self.definitions.get(quest_id) else {
            return false;
        };
        let Some(first_step) = definition.first_step() else {
            return false;
        };

        if state.quest_state(quest_id).status != QuestStatus::NotStarted {
            return false;
        }

        state.quests.insert(
            quest_id.to_string(),
            QuestRuntimeState::in_progress(&first_step.id),
        );
        debug!("Quest '{}' started at step '{}'", quest_id, first_step.id);

        true
    }

    /// Advance a quest past its current step.
    ///
    /// The supplied trigger must exactly equal the current step's trigger
    /// (case-sensitive). On the final step the quest completes, the step
    /// pointer clears and every reward is applied. Returns true iff a
    /// transition occurred.
    pub fn advance_quest(&self, state: &mut GameState, quest_id: &str, trigger: &str) -> bool {
        let Some(definition) = self.definitions.get(quest_id) else {
            return false;
        };

        let runtime = state.quest_state(quest_id);
        if runtime.status != QuestStatus::InProgress {
            return false;
        }
        let Some(current_step_id) = runtime.step_id else {
            return false;
        };

        let Some(step) = definition.get_step(&current_step_id) else {
            return false;
        };
        if step.trigger != trigger {
            return false;
        }

        if let Some(next_id) = &step.next {
            state.quests.insert(
                quest_id.to_string(),
                QuestRuntimeState::in_progress(next_id),
            );
            debug!("Quest '{}' advanced to step '{}'", quest_id, next_id);
            return true;
        }

        state
            .quests
            .insert(quest_id.to_string(), QuestRuntimeState::completed());

        for reward in &definition.rewards {
            match reward {
                Reward::Flag { id, value } => state.set_flag(id, *value),
            }
        }
        debug!("Quest '{}' completed", quest_id);

        true
    }

    /// Advance every in-progress quest whose current step matches the
    /// trigger.
    ///
    /// Returns the ids of the quests that transitioned. Iteration order
    /// over the runtime map is unspecified; callers must not rely on it.
    pub fn advance_by_trigger(&self, state: &mut GameState, trigger: &str) -> Vec<String> {
        let candidates: Vec<String> = state
            .quests
            .iter()
            .filter(|(_, runtime)| runtime.status == QuestStatus::InProgress)
            .map(|(quest_id, _)| quest_id.clone())
            .collect();

        let mut progressed = Vec::new();
        for quest_id in candidates {
            if self.advance_quest(state, &quest_id, trigger) {
                progressed.push(quest_id);
            }
        }

        progressed
    }
}
