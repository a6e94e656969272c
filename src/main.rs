//! Content checker
//!
//! Loads the authored quest and dialogue definitions from a data
//! directory, runs the definition validator and reports every error.
//! Exits non-zero on invalid content so it can gate a content pipeline.

use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rpg_core::dialogue::DialogueRegistry;
use rpg_core::quest::QuestRegistry;
use rpg_core::validation::validate_definitions;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let data_dir = Path::new(&data_dir);
    info!("Checking content in {:?}", data_dir);

    let mut quests = QuestRegistry::new();
    if let Err(e) = quests.load_from_directory(data_dir) {
        error!("Failed to load quests: {}", e);
        return ExitCode::FAILURE;
    }

    let mut dialogues = DialogueRegistry::new();
    if let Err(e) = dialogues.load_from_directory(data_dir) {
        error!("Failed to load dialogues: {}", e);
        return ExitCode::FAILURE;
    }

    let quest_definitions = quests.into_definitions();
    let dialogue_definitions = dialogues.into_definitions();

    let errors = validate_definitions(&quest_definitions, &dialogue_definitions);
    if !errors.is_empty() {
        for e in &errors {
            error!("{}", e);
        }
        error!("{} definition error(s) found", errors.len());
        return ExitCode::FAILURE;
    }

    info!(
        "Content OK: {} quests, {} dialogues",
        quest_definitions.len(),
        dialogue_definitions.len()
    );
    ExitCode::SUCCESS
}
