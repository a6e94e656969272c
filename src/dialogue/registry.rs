//! Dialogue Registry
//!
//! Loads dialogue definitions from TOML files under `<data>/dialogues`.

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::quest::registry::collect_toml_files;
use super::definition::{DialogueDefinition, RawDialogueFile};

/// Registry for all dialogue definitions
pub struct DialogueRegistry {
    dialogues: HashMap<String, DialogueDefinition>,
}

impl DialogueRegistry {
    pub fn new() -> Self {
        Self {
            dialogues: HashMap::new(),
        }
    }

    /// Load all dialogue definitions from the data directory
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), String> {
        let dialogues_dir = data_dir.join("dialogues");

        if !dialogues_dir.exists() {
            warn!("Dialogue directory does not exist: {:?}", dialogues_dir);
            return Ok(());
        }

        let mut paths = Vec::new();
        collect_toml_files(&dialogues_dir, &mut paths)?;

        for path in paths {
            if let Err(e) = self.load_dialogue_file(&path) {
                warn!("Failed to load dialogue {:?}: {}", path, e);
            }
        }

        info!("Loaded {} dialogue definitions", self.dialogues.len());

        Ok(())
    }

    /// Load a single dialogue file
    fn load_dialogue_file(&mut self, path: &Path) -> Result<(), String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

        let raw: RawDialogueFile = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        let dialogue = DialogueDefinition::from_raw(&raw.dialogue);
        if self.dialogues.contains_key(&dialogue.id) {
            warn!(
                "Duplicate dialogue ID '{}' in {:?}, overwriting",
                dialogue.id, path
            );
        }
        self.dialogues.insert(dialogue.id.clone(), dialogue);

        Ok(())
    }

    /// Get a dialogue definition by ID
    pub fn get(&self, dialogue_id: &str) -> Option<&DialogueDefinition> {
        self.dialogues.get(dialogue_id)
    }

    /// Get the number of loaded dialogues
    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// Consume the registry, yielding the definitions for engine construction
    pub fn into_definitions(self) -> Vec<DialogueDefinition> {
        self.dialogues.into_values().collect()
    }
}

impl Default for DialogueRegistry {
    fn default() -> Self {
        Self::new()
    }
}
