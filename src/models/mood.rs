use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single logged mood. Owned by the store; the pipeline only reads snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub id: Uuid,
    pub emoji: String,
    pub label: String,
    pub timestamp: DateTime<Local>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl MoodRecord {
    pub fn new(emoji: impl Into<String>, label: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            emoji: emoji.into(),
            label: label.into(),
            timestamp,
            is_favorite: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMoodRequest {
    pub emoji: Option<String>,
    pub label: String,
    pub timestamp: Option<DateTime<Local>>,
}
