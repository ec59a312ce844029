use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub voice: VoiceSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            ai: AiSettings::default(),
            voice: VoiceSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// User asked for the enhanced writing tools.
    #[serde(default)]
    pub enhanced_text: bool,
    /// Device reports the capability needed for the enhanced writing tools.
    #[serde(default)]
    pub platform_supports_enhanced: bool,
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

impl AiSettings {
    pub fn enhanced_text_active(&self) -> bool {
        self.enhanced_text && self.platform_supports_enhanced
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            enhanced_text: false,
            platform_supports_enhanced: false,
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    #[serde(default = "default_voice_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_voice_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_simulated_latency_ms() -> u64 {
    250
}

fn default_voice_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"version":"1.0.0"}"#).unwrap();
        assert!(settings.ai.enabled);
        assert_eq!(settings.voice.timeout_secs, 10);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn empty_object_is_default_settings() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());

        let partial: Settings = serde_json::from_str(r#"{"ai":{"enabled":false}}"#).unwrap();
        assert_eq!(partial.version, "1.0.0");
        assert!(!partial.ai.enabled);
    }

    #[test]
    fn enhanced_text_needs_request_and_capability() {
        let mut ai = AiSettings::default();
        ai.enhanced_text = true;
        assert!(!ai.enhanced_text_active());
        ai.platform_supports_enhanced = true;
        assert!(ai.enhanced_text_active());
    }
}
