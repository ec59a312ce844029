use chrono::{DateTime, Local};

use crate::commands::with_timeout;
use crate::errors::PipelineResult;
use crate::models::Sentiment;
use crate::services::orchestrator::LoadOutcome;
use crate::services::{pattern_detector, text_enhancer, Orchestrator};
use crate::store::MoodSource;

const MAX_SPOKEN_PATTERNS: usize = 2;
const MAX_SPOKEN_EMOJIS: usize = 3;

/// Refreshes patterns from `source` and reads out the strongest ones.
/// Gives up after the configured voice timeout.
pub async fn describe_patterns(
    orchestrator: &Orchestrator,
    source: &dyn MoodSource,
) -> PipelineResult<String> {
    let history = source.snapshot();
    pattern_detector::ensure_history(&history)?;

    let budget = orchestrator.voice_timeout();
    let outcome = with_timeout(budget, orchestrator.load_patterns(history)).await?;
    if outcome == LoadOutcome::Skipped {
        return Ok("Insights are turned off. Enable AI features to see patterns.".to_string());
    }

    let patterns = orchestrator.patterns();
    if patterns.is_empty() {
        return Ok("No clear patterns yet. Keep logging!".to_string());
    }

    let spoken: Vec<&str> = patterns
        .iter()
        .take(MAX_SPOKEN_PATTERNS)
        .map(|p| p.description.as_str())
        .collect();
    Ok(format!("I noticed: {}.", spoken.join("; ")))
}

pub fn describe_week(source: &dyn MoodSource, now: DateTime<Local>) -> String {
    let summary = pattern_detector::generate_weekly_summary(&source.snapshot(), now);
    if summary.total_moods == 0 {
        return "No moods logged this week yet.".to_string();
    }

    let mood = match summary.dominant_sentiment {
        Sentiment::Positive => "mostly positive",
        Sentiment::Neutral => "mostly even",
        Sentiment::Negative => "mostly low",
    };
    let mut text = format!(
        "You logged {} mood{} this week, {}.",
        summary.total_moods,
        if summary.total_moods == 1 { "" } else { "s" },
        mood
    );
    if !summary.top_emojis.is_empty() {
        text.push_str(&format!(" Top: {}.", summary.top_emojis.join(" ")));
    }
    if let Some(first) = summary.insights.first() {
        text.push(' ');
        text.push_str(first);
    }
    text
}

/// "Try 😰, 😟 or 😓"
pub fn suggest_emojis(orchestrator: &Orchestrator, text: &str) -> String {
    let emojis: Vec<String> = orchestrator
        .predict(text)
        .into_iter()
        .take(MAX_SPOKEN_EMOJIS)
        .map(|s| s.emoji)
        .collect();

    match emojis.split_last() {
        None => "No suggestions right now".to_string(),
        Some((only, [])) => format!("Try {}", only),
        Some((last, rest)) => format!("Try {} or {}", rest.join(", "), last),
    }
}

pub fn writing_prompts(context: &str) -> Vec<String> {
    text_enhancer::generate_prompts(context)
        .iter()
        .map(|p| p.to_string())
        .collect()
}
