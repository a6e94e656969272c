//! Save System
//!
//! Serializes the game state to versioned JSON records keyed by slot name
//! and restores them. A record only loads if it decodes cleanly and passes
//! the validity check; anything else is treated as "no usable save" so
//! callers have a single fallback path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::{GameState, PlayerState, QuestRuntimeState};

/// Current save format version. Records with any other version are
/// rejected outright; there is no migration between versions.
pub const SAVE_VERSION: u32 = 1;

/// A complete, self-contained snapshot of the game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub player: PlayerState,
    pub quests: HashMap<String, QuestRuntimeState>,
    pub flags: HashMap<String, bool>,
    /// Capture time, milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

impl SaveRecord {
    /// Snapshot the live state into an independent record.
    ///
    /// The record owns deep copies; later mutation of the live state
    /// cannot reach it.
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            player: state.player.clone(),
            quests: state.quests.clone(),
            flags: state.flags.clone(),
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Checks the typed decode cannot express: exact version match and a
    /// non-empty map id
    pub fn is_valid(&self) -> bool {
        self.version == SAVE_VERSION && !self.player.map_id.is_empty()
    }

    /// Rebuild a game state from this record
    pub fn into_state(self) -> GameState {
        GameState {
            player: self.player,
            quests: self.quests,
            flags: self.flags,
        }
    }
}

/// Slot-keyed store of save records, one JSON file per slot
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{}.json", slot))
    }

    /// True iff a record is stored for the slot, valid or not
    pub fn has_save(&self, slot: &str) -> bool {
        self.slot_path(slot).exists()
    }

    /// Write a record to a slot
    pub fn save(&self, slot: &str, record: &SaveRecord) -> Result<(), String> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| format!("Failed to create save directory {:?}: {}", self.root, e))?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| format!("Failed to serialize save record: {}", e))?;

        let path = self.slot_path(slot);
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {:?}: {}", path, e))
    }

    /// Read the record for a slot.
    ///
    /// Absent slot, malformed JSON, wrong shape or failed validity check
    /// all yield None; the live game is never affected by a bad save.
    pub fn load(&self, slot: &str) -> Option<SaveRecord> {
        let path = self.slot_path(slot);
        let raw = std::fs::read_to_string(&path).ok()?;

        let record: SaveRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("Save slot '{}' is corrupt: {}", slot, e);
                return None;
            }
        };

        if !record.is_valid() {
            warn!(
                "Save slot '{}' rejected (version {}, map '{}')",
                slot, record.version, record.player.map_id
            );
            return None;
        }

        Some(record)
    }
}
