//! Definition Validation
//!
//! Load-time static checks over the authored quest and dialogue
//! definitions. Produces an ordered list of human-readable errors; an
//! empty list means the content is safe to hand to the engines. Never
//! mutates its input and never fails part-way: every problem is reported,
//! not just the first.

use std::collections::HashSet;

use crate::dialogue::DialogueDefinition;
use crate::quest::QuestDefinition;

/// Validate both definition sets. Empty result = valid.
pub fn validate_definitions(
    quests: &[QuestDefinition],
    dialogues: &[DialogueDefinition],
) -> Vec<String> {
    let mut errors = validate_quests(quests);
    errors.extend(validate_dialogues(dialogues));
    errors
}

/// Structural checks on quest definitions
pub fn validate_quests(quests: &[QuestDefinition]) -> Vec<String> {
    let mut errors = Vec::new();

    for quest in quests {
        if quest.id.is_empty() {
            errors.push("Quest id is missing".to_string());
        }
        if quest.title.is_empty() {
            errors.push(format!("Quest {} has no title", quest.id));
        }
        if quest.steps.is_empty() {
            errors.push(format!("Quest {} has no steps", quest.id));
            continue;
        }

        let mut step_ids = HashSet::new();
        for step in &quest.steps {
            if step.id.is_empty() {
                errors.push(format!("Quest {} has a step without id", quest.id));
            }
            if !step_ids.insert(step.id.as_str()) {
                errors.push(format!(
                    "Quest {} has duplicated step id {}",
                    quest.id, step.id
                ));
            }
            if step.trigger.is_empty() {
                errors.push(format!(
                    "Quest {} step {} has invalid trigger",
                    quest.id, step.id
                ));
            }
            if let Some(next) = &step.next {
                if quest.get_step(next).is_none() {
                    errors.push(format!(
                        "Quest {} step {} has unknown next step {}",
                        quest.id, step.id, next
                    ));
                }
            }
        }
    }

    errors
}

/// Structural checks on dialogue definitions; every node reference must
/// resolve within the same definition
pub fn validate_dialogues(dialogues: &[DialogueDefinition]) -> Vec<String> {
    let mut errors = Vec::new();

    for dialogue in dialogues {
        if dialogue.id.is_empty() {
            errors.push("Dialogue id is missing".to_string());
            continue;
        }

        if dialogue.nodes.is_empty() {
            errors.push(format!("Dialogue {} has no nodes", dialogue.id));
            continue;
        }

        for branch in &dialogue.branches {
            if dialogue.node(&branch.start_node).is_none() {
                errors.push(format!(
                    "Dialogue {} has unknown branch start {}",
                    dialogue.id, branch.start_node
                ));
            }
        }

        for node in &dialogue.nodes {
            if let Some(next) = &node.next {
                if dialogue.node(next).is_none() {
                    errors.push(format!(
                        "Dialogue {} node {} has unknown next {}",
                        dialogue.id, node.id, next
                    ));
                }
            }
            for option in &node.options {
                if let Some(next) = &option.next {
                    if dialogue.node(next).is_none() {
                        errors.push(format!(
                            "Dialogue {} node {} has option with unknown next {}",
                            dialogue.id, node.id, next
                        ));
                    }
                }
            }
        }
    }

    errors
}
