use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub suggested_emojis: Vec<String>,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: 0.0,
            suggested_emojis: vec![],
        }
    }
}
