use chrono::Local;
use uuid::Uuid;

use crate::errors::{PipelineError, PipelineResult};
use crate::models::{CreateMoodRequest, MoodRecord, Sentiment};
use crate::services::sentiment_classifier;
use crate::services::Orchestrator;
use crate::store::{MoodSource, MoodStore};

const MAX_LISTED: usize = 3;

/// Saves a mood. Without an emoji the ranker's top pick for the text is used.
pub fn log_mood(
    store: &MoodStore,
    orchestrator: &Orchestrator,
    request: CreateMoodRequest,
) -> PipelineResult<MoodRecord> {
    let label = request.label.trim();
    if label.is_empty() {
        return Err(PipelineError::InvalidInput("mood text is empty".to_string()));
    }

    let emoji = match request.emoji.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(emoji) => emoji.to_string(),
        None => orchestrator
            .predict(label)
            .into_iter()
            .next()
            .map(|s| s.emoji)
            .ok_or_else(|| PipelineError::InvalidInput("no emoji available".to_string()))?,
    };

    let record = store.add(&emoji, label, request.timestamp.unwrap_or_else(Local::now))?;
    orchestrator.record_emoji_usage(&record.emoji);
    log::info!("[Mood] Logged {} \"{}\"", record.emoji, record.label);
    Ok(record)
}

fn sentiment_word(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "happy",
        Sentiment::Neutral => "neutral",
        Sentiment::Negative => "low",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Found 3 happy moods: 😊 Happy, 🎉 Excited". Newest first, repeats listed once.
pub fn find_moods(source: &dyn MoodSource, sentiment: Sentiment) -> String {
    let matches: Vec<MoodRecord> = source
        .snapshot()
        .into_iter()
        .rev()
        .filter(|r| sentiment_classifier::classify(&r.label).0 == sentiment)
        .collect();

    let word = sentiment_word(sentiment);
    if matches.is_empty() {
        return format!("No {} moods found yet", word);
    }

    let mut listed: Vec<String> = Vec::new();
    for record in &matches {
        let entry = format!("{} {}", record.emoji, capitalize(&record.label));
        if !listed.contains(&entry) {
            listed.push(entry);
        }
        if listed.len() == MAX_LISTED {
            break;
        }
    }

    let noun = if matches.len() == 1 { "mood" } else { "moods" };
    format!("Found {} {} {}: {}", matches.len(), word, noun, listed.join(", "))
}

pub fn favorite_mood(store: &MoodStore, id: Uuid) -> PipelineResult<String> {
    let record = store.set_favorite(id, true)?;
    Ok(format!("Added {} {} to favorites", record.emoji, capitalize(&record.label)))
}
