use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiSuggestion {
    pub emoji: String,
    pub relevance: f64,
    pub reason: String,
}
