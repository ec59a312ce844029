pub mod emoji_ranker;
pub mod lexical;
pub mod orchestrator;
pub mod pattern_detector;
pub mod sentiment_classifier;
pub mod text_enhancer;

pub use emoji_ranker::{EmojiRanker, FrequencyCache};
pub use orchestrator::{LoadOutcome, Orchestrator, PipelinePhase, PipelineSnapshot};
pub use text_enhancer::TextEnhancer;
