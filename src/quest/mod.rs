//! Quest System Module
//!
//! Data-driven quest progression: definitions are TOML, runtime state is a
//! step pointer per quest that moves in response to named triggers.

pub mod definition;
pub mod engine;
pub mod registry;

pub use definition::{QuestDefinition, QuestStep, Reward};
pub use engine::QuestEngine;
pub use registry::QuestRegistry;
