use std::path::{Path, PathBuf};

use crate::models::Settings;
use crate::services::Orchestrator;
use crate::utils::config;

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config").join("settings.json")
}

pub fn get_settings(data_dir: &Path) -> Result<Settings, String> {
    config::load_settings(&settings_path(data_dir)).map_err(|e| format!("{:#}", e))
}

/// Persists `settings` and applies the AI toggle and text mode right away.
pub fn update_settings(
    data_dir: &Path,
    orchestrator: &Orchestrator,
    settings: Settings,
) -> Result<(), String> {
    config::save_settings(&settings_path(data_dir), &settings).map_err(|e| format!("{:#}", e))?;
    orchestrator.apply_settings(&settings);
    log::info!(
        "[Settings] Saved (ai: {}, enhanced text: {}, voice timeout: {}s)",
        settings.ai.enabled,
        settings.ai.enhanced_text_active(),
        settings.voice.timeout_secs
    );
    Ok(())
}

pub fn reset_personalization(orchestrator: &Orchestrator) -> String {
    orchestrator.reset_personalization();
    "Emoji suggestions are back to their defaults".to_string()
}
