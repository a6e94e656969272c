//! Narrative-progression core for a tile-based adventure game.
//!
//! Quest progression, condition-gated dialogue and versioned save slots
//! over a single shared game state. The presentation layer (rendering,
//! input, tilemaps) lives elsewhere and talks to this crate through
//! [`session::GameSession`] and [`event::WorldEvent`].

pub mod dialogue;
pub mod event;
pub mod quest;
pub mod save;
pub mod session;
pub mod state;
pub mod validation;

pub use dialogue::{DialogueDefinition, DialogueEngine, DialogueRegistry};
pub use event::{QuestAction, WorldEvent};
pub use quest::{QuestDefinition, QuestEngine, QuestRegistry};
pub use save::{SaveRecord, SaveStore, SAVE_VERSION};
pub use session::{GameSession, InteractionOutcome};
pub use state::{Direction, GameState, QuestRuntimeState, QuestStatus};
pub use validation::validate_definitions;
