use serde::{Deserialize, Serialize};

use super::Sentiment;

pub const MIN_PATTERN_CONFIDENCE: f64 = 0.6;
pub const MIN_PATTERN_DATA_POINTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternType {
    DayOfWeek,
    TimeOfDay,
    KeywordCorrelation,
    SentimentTrend,
    Frequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub pattern_type: PatternType,
    pub description: String,
    pub confidence: f64,
    pub data_points: usize,
    pub recommendation: Option<String>,
}

impl Pattern {
    pub fn is_significant(&self) -> bool {
        self.confidence >= MIN_PATTERN_CONFIDENCE && self.data_points >= MIN_PATTERN_DATA_POINTS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub patterns: Vec<Pattern>,
    pub dominant_sentiment: Sentiment,
    pub total_moods: usize,
    pub average_per_day: f64,
    pub top_emojis: Vec<String>,
    pub insights: Vec<String>,
}
