use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Gentle,
    Positive,
    Professional,
    Calm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "tone")]
pub enum EnhancementMode {
    Summarize,
    AdjustTone(Tone),
    Proofread,
    ExpandIdeas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub enhanced_text: String,
    pub changes: Vec<String>,
    pub processing_time_ms: u64,
    /// True when the enhanced path produced the result.
    pub enhanced: bool,
}
