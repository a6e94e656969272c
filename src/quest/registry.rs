//! Quest Registry
//!
//! Loads quest definitions from TOML files under `<data>/quests`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::definition::{QuestDefinition, RawQuestFile};

/// Registry for all quest definitions
pub struct QuestRegistry {
    quests: HashMap<String, QuestDefinition>,
}

impl QuestRegistry {
    pub fn new() -> Self {
        Self {
            quests: HashMap::new(),
        }
    }

    /// Load all quest definitions from the data directory
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), String> {
        let quests_dir = data_dir.join("quests");

        if !quests_dir.exists() {
            warn!("Quest directory does not exist: {:?}", quests_dir);
            return Ok(());
        }

        let mut paths = Vec::new();
        collect_toml_files(&quests_dir, &mut paths)?;

        for path in paths {
            if let Err(e) = self.load_quest_file(&path) {
                warn!("Failed to load quest {:?}: {}", path, e);
            }
        }

        info!("Loaded {} quest definitions", self.quests.len());

        Ok(())
    }

    /// Load a single quest file
    fn load_quest_file(&mut self, path: &Path) -> Result<(), String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

        let raw: RawQuestFile = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        let quest = QuestDefinition::from_raw(&raw.quest);
        if self.quests.contains_key(&quest.id) {
            warn!("Duplicate quest ID '{}' in {:?}, overwriting", quest.id, path);
        }
        self.quests.insert(quest.id.clone(), quest);

        Ok(())
    }

    /// Get a quest definition by ID
    pub fn get(&self, quest_id: &str) -> Option<&QuestDefinition> {
        self.quests.get(quest_id)
    }

    /// Get the number of loaded quests
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Consume the registry, yielding the definitions for engine construction
    pub fn into_definitions(self) -> Vec<QuestDefinition> {
        self.quests.into_values().collect()
    }
}

impl Default for QuestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively collect .toml file paths under a directory
pub(crate) fn collect_toml_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {:?}: {}", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() {
            collect_toml_files(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}
