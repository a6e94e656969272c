//! Dialogue Definition Structures
//!
//! These structures are deserialized from TOML dialogue files. A dialogue
//! is a set of branches (condition + starting node) over a node graph;
//! resolution builds a node id lookup table so engine traversal never
//! scans.

use std::collections::HashMap;
use serde::Deserialize;

use crate::state::QuestStatus;

/// A dialogue definition file as loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawDialogueFile {
    pub dialogue: RawDialogue,
}

/// Raw dialogue data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawDialogue {
    pub id: String,
    #[serde(default)]
    pub branches: Vec<RawBranch>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
}

/// Raw branch: condition fields inlined next to the start node
#[derive(Debug, Clone, Deserialize)]
pub struct RawBranch {
    pub start_node: String,
    pub quest_id: Option<String>,
    pub quest_status: Option<QuestStatus>,
    pub quest_step_id: Option<String>,
    pub flag_id: Option<String>,
    pub flag_value: Option<bool>,
}

/// Raw node as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<RawOption>,
    pub next: Option<String>,
    #[serde(default)]
    pub close: bool,
}

/// Raw option as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawOption {
    pub text: String,
    pub next: Option<String>,
    #[serde(default)]
    pub close: bool,
}

// ============================================================================
// Resolved Dialogue Structures (after parsing)
// ============================================================================

/// Predicate gating a dialogue branch.
///
/// All specified sub-conditions must hold; an empty condition is
/// vacuously true. Alternation is authored as multiple branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueCondition {
    pub quest_id: Option<String>,
    pub quest_status: Option<QuestStatus>,
    pub quest_step_id: Option<String>,
    pub flag_id: Option<String>,
    /// Required flag value; defaults to true when a flag_id is set
    pub flag_value: Option<bool>,
}

/// A (condition, starting node) pair; the first satisfied branch in
/// authored order decides where the conversation begins
#[derive(Debug, Clone)]
pub struct DialogueBranch {
    pub condition: DialogueCondition,
    pub start_node: String,
}

/// A selectable answer on a dialogue node
#[derive(Debug, Clone)]
pub struct DialogueOption {
    pub text: String,
    /// Follow-up node; None ends the conversation
    pub next: Option<String>,
    /// Authoring hint for the presentation layer; never required
    pub close: bool,
}

/// A single piece of conversation
#[derive(Debug, Clone)]
pub struct DialogueNode {
    pub id: String,
    pub text: String,
    pub options: Vec<DialogueOption>,
    /// Unconditional follow-up, used when the node has no options
    pub next: Option<String>,
    pub close: bool,
}

/// A fully resolved dialogue definition
#[derive(Debug, Clone)]
pub struct DialogueDefinition {
    pub id: String,
    pub branches: Vec<DialogueBranch>,
    pub nodes: Vec<DialogueNode>,
    node_index: HashMap<String, usize>,
}

impl DialogueDefinition {
    /// Create a DialogueDefinition from raw TOML data
    pub fn from_raw(raw: &RawDialogue) -> Self {
        let nodes: Vec<DialogueNode> = raw
            .nodes
            .iter()
            .map(|n| DialogueNode {
                id: n.id.clone(),
                text: n.text.clone(),
                options: n
                    .options
                    .iter()
                    .map(|o| DialogueOption {
                        text: o.text.clone(),
                        next: o.next.clone(),
                        close: o.close,
                    })
                    .collect(),
                next: n.next.clone(),
                close: n.close,
            })
            .collect();

        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        Self {
            id: raw.id.clone(),
            branches: raw
                .branches
                .iter()
                .map(|b| DialogueBranch {
                    condition: DialogueCondition {
                        quest_id: b.quest_id.clone(),
                        quest_status: b.quest_status,
                        quest_step_id: b.quest_step_id.clone(),
                        flag_id: b.flag_id.clone(),
                        flag_value: b.flag_value,
                    },
                    start_node: b.start_node.clone(),
                })
                .collect(),
            nodes,
            node_index,
        }
    }

    /// Look up a node by id
    pub fn node(&self, node_id: &str) -> Option<&DialogueNode> {
        self.node_index.get(node_id).map(|&i| &self.nodes[i])
    }
}
