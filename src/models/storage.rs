use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub moods_count: usize,
    pub favorites_count: usize,
    pub oldest_mood: Option<DateTime<Local>>,
    pub newest_mood: Option<DateTime<Local>>,
}
