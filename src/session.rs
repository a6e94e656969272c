//! Game Session
//!
//! Owns the shared game state and wires the quest and dialogue engines to
//! it. Construction is gated on definition validation: no engine runs
//! against invalid content. The session also tracks the active
//! conversation and holds an interaction's quest effects back until that
//! conversation closes, so dialogue branches resolve against the state
//! the player saw when they started talking.

use std::path::Path;
use tracing::{error, info};

use crate::dialogue::{DialogueDefinition, DialogueEngine, DialogueNode};
use crate::event::{QuestAction, WorldEvent};
use crate::quest::{QuestDefinition, QuestEngine};
use crate::save::{SaveRecord, SaveStore};
use crate::state::{Direction, GameState, PlayerState, QuestRuntimeState};
use crate::validation::validate_definitions;

/// Map the player starts on when no save is adopted
pub const DEFAULT_MAP_ID: &str = "town";
/// Default spawn tile on the starting map
pub const DEFAULT_SPAWN: (i32, i32) = (2, 2);

/// Quest effects applied by an interaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedEffects {
    /// Whether the event's direct quest action transitioned
    pub action_applied: bool,
    /// Quests advanced by the event's bare trigger
    pub progressed: Vec<String>,
}

/// What an interaction did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// A conversation opened; its quest effects are deferred until it
    /// closes. Content is readable via [`GameSession::current_dialogue`].
    DialogueOpened,
    /// Effects were applied immediately
    Effects(AppliedEffects),
}

/// Result of advancing the active conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueTurn {
    /// Moved to a follow-up node
    Continued,
    /// Conversation ended; any deferred effects were applied
    Ended,
}

struct ActiveConversation {
    dialogue_id: String,
    node_id: String,
    /// Interaction event whose effects wait for the conversation to close
    pending: Option<WorldEvent>,
}

/// The active game session: state model, engines, save store
pub struct GameSession {
    state: GameState,
    quests: QuestEngine,
    dialogues: DialogueEngine,
    saves: SaveStore,
    active: Option<ActiveConversation>,
}

impl GameSession {
    /// Build a session from validated definitions.
    ///
    /// Validation failure is fatal: the full error list is returned and
    /// no engine is constructed.
    pub fn new(
        quest_definitions: Vec<QuestDefinition>,
        dialogue_definitions: Vec<DialogueDefinition>,
        save_root: &Path,
    ) -> Result<Self, Vec<String>> {
        let errors = validate_definitions(&quest_definitions, &dialogue_definitions);
        if !errors.is_empty() {
            for e in &errors {
                error!("Definition error: {}", e);
            }
            return Err(errors);
        }

        info!(
            "Session ready: {} quests, {} dialogues",
            quest_definitions.len(),
            dialogue_definitions.len()
        );

        Ok(Self {
            state: GameState::new(DEFAULT_MAP_ID, DEFAULT_SPAWN.0, DEFAULT_SPAWN.1),
            quests: QuestEngine::new(quest_definitions),
            dialogues: DialogueEngine::new(dialogue_definitions),
            saves: SaveStore::new(save_root),
            active: None,
        })
    }

    // ========================================================================
    // Read-only query surface for the presentation layer
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &PlayerState {
        &self.state.player
    }

    /// Runtime state for a quest, defaulting to not started
    pub fn quest_state(&self, quest_id: &str) -> QuestRuntimeState {
        self.state.quest_state(quest_id)
    }

    /// Value of a world flag, defaulting to false
    pub fn flag(&self, flag_id: &str) -> bool {
        self.state.flag(flag_id)
    }

    /// Definition and current node of the open conversation, if any
    pub fn current_dialogue(&self) -> Option<(&DialogueDefinition, &DialogueNode)> {
        let active = self.active.as_ref()?;
        let definition = self.dialogues.definition(&active.dialogue_id)?;
        let node = definition.node(&active.node_id)?;
        Some((definition, node))
    }

    pub fn in_dialogue(&self) -> bool {
        self.active.is_some()
    }

    // ========================================================================
    // Session boundary: new game / player movement
    // ========================================================================

    /// Reset to a fresh game at the given spawn tile
    pub fn new_game(&mut self, spawn_x: i32, spawn_y: i32) {
        self.state = GameState::new(DEFAULT_MAP_ID, spawn_x, spawn_y);
        self.active = None;
    }

    /// Record the player's tile position and facing
    pub fn set_player_tile(&mut self, x: i32, y: i32, direction: Direction) {
        self.state.player.x = x;
        self.state.player.y = y;
        self.state.player.direction = direction;
    }

    /// Record a map transition
    pub fn set_current_map(&mut self, map_id: &str) {
        self.state.player.map_id = map_id.to_string();
    }

    // ========================================================================
    // Interaction handling
    // ========================================================================

    /// Resolve a world event.
    ///
    /// If the event names a dialogue and a branch matches the current
    /// state, the conversation opens and the event's quest effects wait
    /// for it to close. In every other case the effects apply right away.
    pub fn interact(&mut self, event: WorldEvent) -> InteractionOutcome {
        if let Some(dialogue_id) = &event.dialogue_id {
            if let Some(active) = self.dialogues.start(&self.state, dialogue_id) {
                let conversation = ActiveConversation {
                    dialogue_id: active.definition.id.clone(),
                    node_id: active.node.id.clone(),
                    pending: event.has_effects().then(|| event.clone()),
                };
                self.active = Some(conversation);
                return InteractionOutcome::DialogueOpened;
            }
        }

        InteractionOutcome::Effects(self.apply_effects(&event))
    }

    /// Advance the open conversation, following the chosen option if one
    /// is given. Returns None when no conversation is open.
    pub fn choose(&mut self, option_index: Option<usize>) -> Option<DialogueTurn> {
        let mut active = self.active.take()?;

        match self
            .dialogues
            .next(&active.dialogue_id, &active.node_id, option_index)
        {
            Some(node) => {
                active.node_id = node.id.clone();
                self.active = Some(active);
                Some(DialogueTurn::Continued)
            }
            None => {
                if let Some(event) = active.pending {
                    self.apply_effects(&event);
                }
                Some(DialogueTurn::Ended)
            }
        }
    }

    /// Apply an event's quest effects: the direct action first, then the
    /// bare trigger broadcast
    fn apply_effects(&mut self, event: &WorldEvent) -> AppliedEffects {
        let mut effects = AppliedEffects::default();

        if let Some(action) = &event.quest_action {
            effects.action_applied = match action {
                QuestAction::Start { quest_id } => self.quests.start_quest(&mut self.state, quest_id),
                QuestAction::Advance { quest_id, trigger } => {
                    self.quests.advance_quest(&mut self.state, quest_id, trigger)
                }
            };
        }

        if let Some(trigger) = &event.trigger {
            effects.progressed = self.quests.advance_by_trigger(&mut self.state, trigger);
        }

        effects
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Snapshot the current state into a slot
    pub fn save_game(&self, slot: &str) -> Result<(), String> {
        let record = SaveRecord::capture(&self.state);
        self.saves.save(slot, &record)
    }

    /// Adopt the save stored in a slot.
    ///
    /// Returns false, leaving the live state untouched, when the slot is
    /// absent, malformed or version-mismatched.
    pub fn load_game(&mut self, slot: &str) -> bool {
        let Some(record) = self.saves.load(slot) else {
            return false;
        };

        self.state = record.into_state();
        self.active = None;
        true
    }

    /// True iff the slot holds a record, usable or not
    pub fn has_save(&self, slot: &str) -> bool {
        self.saves.has_save(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::definition::RawDialogueFile;
    use crate::quest::definition::RawQuestFile;
    use crate::state::QuestStatus;
    use tempfile::TempDir;

    fn lost_apple() -> QuestDefinition {
        let raw: RawQuestFile = toml::from_str(
            r#"
[quest]
id = "lost_apple"
title = "Lost Apple"

[[quest.steps]]
id = "find_tree"
trigger = "found_apple"
next = "return_elder"

[[quest.steps]]
id = "return_elder"
trigger = "talk_elder"

[[quest.rewards]]
type = "flag"
id = "elder_helped"
value = true
"#,
        )
        .unwrap();
        QuestDefinition::from_raw(&raw.quest)
    }

    fn elder_dialogue() -> DialogueDefinition {
        let raw: RawDialogueFile = toml::from_str(
            r#"
[dialogue]
id = "elder"

[[dialogue.branches]]
flag_id = "elder_helped"
start_node = "thanks"

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
id = "thanks"
text = "Bless you for finding it!"
close = true
"#,
        )
        .unwrap();
        DialogueDefinition::from_raw(&raw.dialogue)
    }

    fn session(temp_dir: &TempDir) -> GameSession {
        GameSession::new(
            vec![lost_apple()],
            vec![elder_dialogue()],
            temp_dir.path(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_definitions_block_construction() {
        let temp_dir = TempDir::new().unwrap();
        let mut quest = lost_apple();
        quest.steps.clear();
        quest.title.clear();

        let errors = GameSession::new(vec![quest], vec![elder_dialogue()], temp_dir.path())
            .err()
            .unwrap();
        // Every problem is surfaced, not just the first
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_interaction_without_dialogue_applies_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);

        let outcome = session.interact(WorldEvent {
            quest_action: Some(QuestAction::Start {
                quest_id: "lost_apple".to_string(),
            }),
            ..Default::default()
        });
        assert_eq!(
            outcome,
            InteractionOutcome::Effects(AppliedEffects {
                action_applied: true,
                progressed: vec![],
            })
        );

        let outcome = session.interact(WorldEvent::trigger("found_apple"));
        assert_eq!(
            outcome,
            InteractionOutcome::Effects(AppliedEffects {
                action_applied: false,
                progressed: vec!["lost_apple".to_string()],
            })
        );
        assert_eq!(
            session.quest_state("lost_apple").step_id.as_deref(),
            Some("return_elder")
        );
    }

    #[test]
    fn test_dialogue_defers_effects_until_close() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        session.interact(WorldEvent {
            quest_action: Some(QuestAction::Start {
                quest_id: "lost_apple".to_string(),
            }),
            ..Default::default()
        });
        session.interact(WorldEvent::trigger("found_apple"));

        // Talking to the elder both opens the dialogue and carries the
        // final quest trigger
        let outcome = session.interact(WorldEvent {
            dialogue_id: Some("elder".to_string()),
            trigger: Some("talk_elder".to_string()),
            ..Default::default()
        });
        assert_eq!(outcome, InteractionOutcome::DialogueOpened);

        // The quest has not advanced while the conversation is open, so
        // the greeting branch (not the thanks branch) was selected
        let (_, node) = session.current_dialogue().unwrap();
        assert_eq!(node.id, "greeting");
        assert_eq!(
            session.quest_state("lost_apple").status,
            QuestStatus::InProgress
        );

        // Pick "I'll look for it." -> farewell -> close
        assert_eq!(session.choose(Some(0)), Some(DialogueTurn::Continued));
        assert_eq!(session.choose(None), Some(DialogueTurn::Ended));
        assert!(!session.in_dialogue());

        // Deferred effects ran on close
        assert_eq!(
            session.quest_state("lost_apple").status,
            QuestStatus::Completed
        );
        assert!(session.flag("elder_helped"));

        // Next visit takes the flag-gated branch
        session.interact(WorldEvent::dialogue("elder"));
        let (_, node) = session.current_dialogue().unwrap();
        assert_eq!(node.id, "thanks");
    }

    #[test]
    fn test_choose_with_no_open_dialogue_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);
        assert_eq!(session.choose(None), None);
    }

    #[test]
    fn test_unknown_dialogue_still_applies_effects() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = session(&temp_dir);

        let outcome = session.interact(WorldEvent {
            dialogue_id: Some("missing".to_string()),
            quest_action: Some(QuestAction::Start {
                quest_id: "lost_apple".to_string(),
            }),
            ..Default::default()
        });
        assert!(matches!(outcome, InteractionOutcome::Effects(ref e) if e.action_applied));
        assert!(!session.in_dialogue());
    }

    #[test]
    fn test_save_load_round_trip_and_new_game() {
        let temp_dir = TempDir::new().unwrap();
        let save_dir = temp_dir.path().join("saves");
        let mut session =
            GameSession::new(vec![lost_apple()], vec![elder_dialogue()], &save_dir).unwrap();

        session.interact(WorldEvent {
            quest_action: Some(QuestAction::Start {
                quest_id: "lost_apple".to_string(),
            }),
            ..Default::default()
        });
        session.set_player_tile(5, 7, Direction::Left);
        session.save_game("slot1").unwrap();
        assert!(session.has_save("slot1"));

        let saved_state = session.state().clone();

        session.new_game(DEFAULT_SPAWN.0, DEFAULT_SPAWN.1);
        assert_eq!(
            session.quest_state("lost_apple").status,
            QuestStatus::NotStarted
        );
        assert_eq!(session.player().x, DEFAULT_SPAWN.0);

        assert!(session.load_game("slot1"));
        assert_eq!(session.state(), &saved_state);

        // Absent slot leaves the restored state alone
        assert!(!session.load_game("slot2"));
        assert_eq!(session.state(), &saved_state);
    }
}
