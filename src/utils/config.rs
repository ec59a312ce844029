use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Settings;

const ENV_AI_ENABLED: &str = "MOODFLOW_AI_ENABLED";
const ENV_ENHANCED_TEXT: &str = "MOODFLOW_ENHANCED_TEXT";
const ENV_VOICE_TIMEOUT: &str = "MOODFLOW_VOICE_TIMEOUT_SECS";
const ENV_LOG_LEVEL: &str = "MOODFLOW_LOG_LEVEL";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn apply_env_defaults(settings: &mut Settings) {
    if let Some(enabled) = env_value(ENV_AI_ENABLED).as_deref().and_then(parse_flag) {
        settings.ai.enabled = enabled;
    }
    if let Some(enhanced) = env_value(ENV_ENHANCED_TEXT).as_deref().and_then(parse_flag) {
        settings.ai.enhanced_text = enhanced;
    }
    if let Some(secs) = env_value(ENV_VOICE_TIMEOUT).and_then(|v| v.parse::<u64>().ok()) {
        settings.voice.timeout_secs = secs.max(1);
    }
    if let Some(level) = env_value(ENV_LOG_LEVEL) {
        settings.logging.level = level;
    }
}

/// Read `settings.json` at `path`, or defaults when the file does not exist yet.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("failed to parse settings in {}", path.display()))?
    } else {
        Settings::default()
    };
    apply_env_defaults(&mut settings);
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config dir {}", dir.display()))?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write settings to {}", path.display()))?;
    Ok(())
}
