//! Dialogue Engine
//!
//! Selects a starting conversation branch by evaluating conditions against
//! the game state, then walks the node graph in response to player
//! choices. Unknown ids and dangling references resolve to None; the
//! validator should have excluded them, the engine stays defensive anyway.

use std::collections::HashMap;

use crate::state::GameState;
use super::definition::{DialogueCondition, DialogueDefinition, DialogueNode};

/// A conversation opened by [`DialogueEngine::start`]
#[derive(Debug)]
pub struct ActiveDialogue<'a> {
    pub definition: &'a DialogueDefinition,
    pub node: &'a DialogueNode,
}

/// Evaluate a branch condition against the live game state.
///
/// Every specified sub-condition must hold. An empty condition is
/// vacuously satisfied. Absent flags read as false.
pub fn evaluate_condition(condition: &DialogueCondition, state: &GameState) -> bool {
    if let Some(quest_id) = &condition.quest_id {
        let quest_state = state.quest_state(quest_id);
        if let Some(required_status) = condition.quest_status {
            if quest_state.status != required_status {
                return false;
            }
        }
        if let Some(required_step) = &condition.quest_step_id {
            if quest_state.step_id.as_ref() != Some(required_step) {
                return false;
            }
        }
    }

    if let Some(flag_id) = &condition.flag_id {
        let actual = state.flag(flag_id);
        if actual != condition.flag_value.unwrap_or(true) {
            return false;
        }
    }

    true
}

/// Branch selection and node traversal over the dialogue definitions
pub struct DialogueEngine {
    definitions: HashMap<String, DialogueDefinition>,
}

impl DialogueEngine {
    pub fn new(definitions: Vec<DialogueDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
        }
    }

    /// Get a dialogue definition by id
    pub fn definition(&self, dialogue_id: &str) -> Option<&DialogueDefinition> {
        self.definitions.get(dialogue_id)
    }

    /// Open a conversation.
    ///
    /// Branches are tried in authored order and the first one whose
    /// condition holds wins, so priority is authored by position (for
    /// example a "quest completed" branch ahead of an unconditional
    /// fallback). Returns None when the dialogue id is unknown, no branch
    /// matches, or the matched start node does not resolve.
    pub fn start<'a>(&'a self, state: &GameState, dialogue_id: &str) -> Option<ActiveDialogue<'a>> {
        let definition = self.definitions.get(dialogue_id)?;

        let branch = definition
            .branches
            .iter()
            .find(|b| evaluate_condition(&b.condition, state))?;

        let node = definition.node(&branch.start_node)?;

        Some(ActiveDialogue { definition, node })
    }

    /// Resolve the follow-up node from the current one.
    ///
    /// With an option index that lands on a populated option, that
    /// option's `next` reference is followed; otherwise the node's
    /// unconditional `next` is. A missing reference ends the conversation
    /// (None). Unknown dialogue or node ids also yield None.
    pub fn next(
        &self,
        dialogue_id: &str,
        current_node_id: &str,
        option_index: Option<usize>,
    ) -> Option<&DialogueNode> {
        let definition = self.definitions.get(dialogue_id)?;
        let current = definition.node(current_node_id)?;

        if let Some(index) = option_index {
            if let Some(option) = current.options.get(index) {
                return definition.node(option.next.as_deref()?);
            }
        }

        definition.node(current.next.as_deref()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::definition::RawDialogueFile;
    use crate::state::{QuestRuntimeState, QuestStatus};

    fn elder_dialogue() -> DialogueDefinition {
        let raw: RawDialogueFile = toml::from_str(
            r#"
[dialogue]
id = "elder"

[[dialogue.branches]]
quest_id = "lost_apple"
quest_status = "completed"
start_node = "thanks"

[[dialogue.branches]]
quest_id = "lost_apple"
quest_status = "in_progress"
quest_step_id = "return_elder"
start_node = "eager"

[[dialogue.branches]]
start_node = "greeting"

[[dialogue.nodes]]
id = "greeting"
text = "Have you seen my apple?"

[[dialogue.nodes.options]]
text = "I'll look for it."
next = "farewell"

[[dialogue.nodes.options]]
text = "Not now."
close = true

[[dialogue.nodes]]
id = "farewell"
text = "Thank you, traveler."
close = true

[[dialogue.nodes]]
id = "eager"
text = "Did you find it?"
next = "farewell"

[[dialogue.nodes]]
id = "thanks"
text = "Bless you for finding it!"
close = true
"#,
        )
        .unwrap();
        DialogueDefinition::from_raw(&raw.dialogue)
    }

    fn base_state() -> GameState {
        let mut state = GameState::new("town", 2, 2);
        state.quests.insert(
            "lost_apple".to_string(),
            QuestRuntimeState::in_progress("return_elder"),
        );
        state
    }

    #[test]
    fn test_empty_condition_is_vacuously_true() {
        let condition = DialogueCondition::default();
        assert!(evaluate_condition(&condition, &GameState::new("town", 0, 0)));
        assert!(evaluate_condition(&condition, &base_state()));
    }

    #[test]
    fn test_condition_matches_quest_status_and_step() {
        let state = base_state();
        let condition = DialogueCondition {
            quest_id: Some("lost_apple".to_string()),
            quest_status: Some(QuestStatus::InProgress),
            quest_step_id: Some("return_elder".to_string()),
            ..Default::default()
        };
        assert!(evaluate_condition(&condition, &state));

        let wrong_step = DialogueCondition {
            quest_step_id: Some("find_tree".to_string()),
            ..condition.clone()
        };
        assert!(!evaluate_condition(&wrong_step, &state));
    }

    #[test]
    fn test_absent_flag_reads_false() {
        let state = base_state();
        let condition = DialogueCondition {
            flag_id: Some("elder_helped".to_string()),
            flag_value: Some(true),
            ..Default::default()
        };
        // Default false != required true
        assert!(!evaluate_condition(&condition, &state));

        let wants_false = DialogueCondition {
            flag_value: Some(false),
            ..condition
        };
        assert!(evaluate_condition(&wants_false, &state));
    }

    #[test]
    fn test_start_picks_first_matching_branch() {
        let engine = DialogueEngine::new(vec![elder_dialogue()]);

        // in_progress at return_elder: second branch wins
        let state = base_state();
        let active = engine.start(&state, "elder").unwrap();
        assert_eq!(active.node.id, "eager");

        // completed: first branch wins
        let mut state = base_state();
        state
            .quests
            .insert("lost_apple".to_string(), QuestRuntimeState::completed());
        let active = engine.start(&state, "elder").unwrap();
        assert_eq!(active.node.id, "thanks");

        // fresh state: unconditional fallback
        let state = GameState::new("town", 2, 2);
        let active = engine.start(&state, "elder").unwrap();
        assert_eq!(active.node.id, "greeting");
    }

    #[test]
    fn test_start_returns_none_when_nothing_matches() {
        let raw: RawDialogueFile = toml::from_str(
            r#"
[dialogue]
id = "guard"

[[dialogue.branches]]
flag_id = "gate_open"
start_node = "pass"

[[dialogue.nodes]]
id = "pass"
text = "Go on through."
"#,
        )
        .unwrap();
        let engine = DialogueEngine::new(vec![DialogueDefinition::from_raw(&raw.dialogue)]);

        let state = GameState::new("town", 2, 2);
        assert!(engine.start(&state, "guard").is_none());
        assert!(engine.start(&state, "unknown").is_none());
    }

    #[test]
    fn test_next_follows_options_and_fallthrough() {
        let engine = DialogueEngine::new(vec![elder_dialogue()]);

        // Option 0 follows its next reference
        let node = engine.next("elder", "greeting", Some(0)).unwrap();
        assert_eq!(node.id, "farewell");

        // Option 1 has no next: conversation ends
        assert!(engine.next("elder", "greeting", Some(1)).is_none());

        // No option supplied on an option-less node: unconditional next
        let node = engine.next("elder", "eager", None).unwrap();
        assert_eq!(node.id, "farewell");

        // Terminal node ends the conversation
        assert!(engine.next("elder", "farewell", None).is_none());

        // Defensive paths
        assert!(engine.next("unknown", "greeting", None).is_none());
        assert!(engine.next("elder", "missing_node", None).is_none());
    }
}
