//! Dialogue System Module
//!
//! Condition-gated conversation trees: branches pick a starting node from
//! the live game state, options and next references walk the graph.

pub mod definition;
pub mod engine;
pub mod registry;

pub use definition::{
    DialogueBranch, DialogueCondition, DialogueDefinition, DialogueNode, DialogueOption,
};
pub use engine::{ActiveDialogue, DialogueEngine, evaluate_condition};
pub use registry::DialogueRegistry;
