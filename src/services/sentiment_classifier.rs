// ─── Sentiment classifier ───
//
// text → positive / neutral / negative + confidence + emoji hints.
// Keyword counting first; a tie or a miss falls through to the lexical
// paragraph score in `lexical.rs`.

use crate::models::{AnalysisResult, Sentiment};
use crate::services::lexical;

const POSITIVE_KEYWORDS: &[&str] = &[
    "happy", "joy", "great", "good", "love", "excit", "amazing", "awesome", "wonderful",
    "fantastic", "grateful", "thankful", "blessed", "calm", "peaceful", "relaxed", "proud",
    "accomplish", "success", "enjoy", "smile", "laugh", "cheerful", "delight", "energized",
    "motivated", "hopeful", "optimistic", "beautiful", "glad",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "sad", "terrible", "awful", "horrible", "bad", "angry", "upset", "anxious", "anxiety",
    "stress", "worried", "worry", "depress", "lonely", "tired", "exhausted", "frustrat",
    "annoyed", "hurt", "cry", "scared", "afraid", "fear", "overwhelm", "miserable", "hate",
    "disappoint", "sick", "nervous", "panic",
];

/// Lexical fallback thresholds.
const FALLBACK_POSITIVE: f64 = 0.1;
const FALLBACK_NEGATIVE: f64 = -0.1;

const MAX_HINTS: usize = 5;

struct HintRule {
    sentiment: Sentiment,
    keywords: &'static [&'static str],
    emojis: &'static [&'static str],
}

// First matching rule wins, so more specific rows come first.
const HINT_RULES: &[HintRule] = &[
    HintRule { sentiment: Sentiment::Positive, keywords: &["excit"], emojis: &["🎉", "⭐", "🚀", "💫", "✨"] },
    HintRule { sentiment: Sentiment::Positive, keywords: &["love"], emojis: &["❤️", "🥰", "😍", "💕", "💖"] },
    HintRule { sentiment: Sentiment::Positive, keywords: &["grateful", "thank", "blessed"], emojis: &["🙏", "💛", "🌟", "😊", "🤗"] },
    HintRule { sentiment: Sentiment::Positive, keywords: &["calm", "relax", "peace"], emojis: &["😌", "🧘", "🌿", "☮️", "🌊"] },
    HintRule { sentiment: Sentiment::Positive, keywords: &["proud", "accomplish", "success"], emojis: &["🏆", "💪", "🎯", "🥇", "👏"] },
    HintRule { sentiment: Sentiment::Negative, keywords: &["stress", "overwhelm", "pressure"], emojis: &["😤", "😓", "😩", "🤯", "💢"] },
    HintRule { sentiment: Sentiment::Negative, keywords: &["sad", "lonely", "cry"], emojis: &["😢", "😞", "💔", "😔", "🥺"] },
    HintRule { sentiment: Sentiment::Negative, keywords: &["angry", "frustrat", "annoy"], emojis: &["😠", "😤", "😡", "💢", "🙄"] },
    HintRule { sentiment: Sentiment::Negative, keywords: &["anxi", "worr", "nervous", "panic", "scared"], emojis: &["😰", "😟", "😓", "😨", "💭"] },
    HintRule { sentiment: Sentiment::Negative, keywords: &["tired", "exhaust"], emojis: &["😴", "🥱", "😪", "😩", "🛌"] },
    HintRule { sentiment: Sentiment::Negative, keywords: &["meeting", "work", "deadline"], emojis: &["😓", "😤", "💼", "😩", "☕"] },
    HintRule { sentiment: Sentiment::Neutral, keywords: &["tired", "sleep"], emojis: &["😴", "🥱", "😐", "🛌", "💤"] },
];

const GENERIC_POSITIVE: &[&str] = &["😊", "😄", "🙂", "😁", "🌞"];
const GENERIC_NEGATIVE: &[&str] = &["😞", "😔", "😢", "😟", "😓"];
const GENERIC_NEUTRAL: &[&str] = &["😐", "🙂", "😶", "🤔", "😌"];

fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

fn keyword_confidence(hits: usize) -> f64 {
    (0.3 * hits as f64 + 0.6).min(1.0)
}

/// Sentiment label only, without emoji hints. Used by the pattern detector.
pub fn classify(text: &str) -> (Sentiment, f64) {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return (Sentiment::Neutral, 0.0);
    }

    let pos = count_hits(&normalized, POSITIVE_KEYWORDS);
    let neg = count_hits(&normalized, NEGATIVE_KEYWORDS);

    if pos > neg && pos > 0 {
        (Sentiment::Positive, keyword_confidence(pos))
    } else if neg > pos && neg > 0 {
        (Sentiment::Negative, keyword_confidence(neg))
    } else {
        let score = lexical::paragraph_score(&normalized);
        let sentiment = if score > FALLBACK_POSITIVE {
            Sentiment::Positive
        } else if score < FALLBACK_NEGATIVE {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        (sentiment, score.abs().max(0.5))
    }
}

pub fn emoji_hints(sentiment: Sentiment, normalized: &str) -> Vec<String> {
    let emojis = HINT_RULES
        .iter()
        .find(|rule| {
            rule.sentiment == sentiment && rule.keywords.iter().any(|k| normalized.contains(k))
        })
        .map(|rule| rule.emojis)
        .unwrap_or(match sentiment {
            Sentiment::Positive => GENERIC_POSITIVE,
            Sentiment::Negative => GENERIC_NEGATIVE,
            Sentiment::Neutral => GENERIC_NEUTRAL,
        });

    emojis.iter().take(MAX_HINTS).map(|e| e.to_string()).collect()
}

pub fn analyze(text: &str) -> AnalysisResult {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return AnalysisResult::default();
    }

    let (sentiment, confidence) = classify(&normalized);
    AnalysisResult {
        sentiment,
        confidence,
        suggested_emojis: emoji_hints(sentiment, &normalized),
    }
}
