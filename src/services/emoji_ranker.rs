// ─── Emoji ranker ───
//
// text + personal usage → up to 8 ranked emoji suggestions.
//
// Signals, in order:
//   1. category keywords found in the text (count + position weighted)
//   2. word-class tagging: emotion adjectives (0.8), activity verbs (0.7)
//   3. personal usage boost from the shared FrequencyCache
//
// Steps 1–2 are memoised per text; step 3 runs on every call.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::EmojiSuggestion;
use crate::services::lexical::{self, WordClass};
use crate::utils::hash_string;

pub const MAX_SUGGESTIONS: usize = 8;
const DEFAULT_RELEVANCE: f64 = 0.5;
const ADJECTIVE_RELEVANCE: f64 = 0.8;
const VERB_RELEVANCE: f64 = 0.7;
const USAGE_STEP: f64 = 0.05;
const USAGE_CAP: f64 = 0.3;
const MEMO_CAPACITY: usize = 256;

pub const DEFAULT_EMOJIS: [&str; MAX_SUGGESTIONS] = ["😊", "😢", "😤", "😴", "🥰", "😰", "🤔", "😌"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Emotion,
    Activity,
    Context,
}

#[derive(Debug)]
pub struct EmojiCategory {
    pub name: &'static str,
    pub kind: CategoryKind,
    pub keywords: &'static [&'static str],
    pub emojis: &'static [&'static str],
}

pub static CATEGORIES: &[EmojiCategory] = &[
    // emotions
    EmojiCategory { name: "happy", kind: CategoryKind::Emotion, keywords: &["happy", "happi", "joy", "cheer", "glad"], emojis: &["😊", "😄", "😁", "🥳", "☀️"] },
    EmojiCategory { name: "sad", kind: CategoryKind::Emotion, keywords: &["sad", "unhappy", "depress", "lonely", "cry", "heartbroken"], emojis: &["😢", "😞", "😔", "💔", "🥺"] },
    EmojiCategory { name: "angry", kind: CategoryKind::Emotion, keywords: &["angry", "anger", "furious", "annoy", "frustrat", "irritat"], emojis: &["😠", "😡", "😤", "💢", "🙄"] },
    EmojiCategory { name: "anxious", kind: CategoryKind::Emotion, keywords: &["anxi", "nervous", "worri", "worry", "panic", "uneasy"], emojis: &["😰", "😟", "😓", "💭", "🌧️"] },
    EmojiCategory { name: "excited", kind: CategoryKind::Emotion, keywords: &["excit", "thrill", "can't wait", "pumped"], emojis: &["🤩", "🎉", "🚀", "✨", "🙌"] },
    EmojiCategory { name: "tired", kind: CategoryKind::Emotion, keywords: &["tired", "exhaust", "sleepy", "drained", "fatigue"], emojis: &["😴", "🥱", "😪", "🛌", "💤"] },
    EmojiCategory { name: "love", kind: CategoryKind::Emotion, keywords: &["love", "ador", "crush"], emojis: &["❤️", "🥰", "😍", "💕", "🤗"] },
    EmojiCategory { name: "calm", kind: CategoryKind::Emotion, keywords: &["calm", "relax", "peace", "serene", "chill"], emojis: &["😌", "🧘", "🍃", "🌊", "☮️"] },
    EmojiCategory { name: "stressed", kind: CategoryKind::Emotion, keywords: &["stress", "overwhelm", "pressure", "tense", "deadline"], emojis: &["😫", "😩", "🤯", "😓", "⏰"] },
    EmojiCategory { name: "grateful", kind: CategoryKind::Emotion, keywords: &["grateful", "thank", "bless", "appreciat"], emojis: &["🙏", "💛", "🌟", "😇", "🤲"] },
    EmojiCategory { name: "bored", kind: CategoryKind::Emotion, keywords: &["bored", "boring"], emojis: &["😑", "🥱", "😐", "🙄", "💤"] },
    EmojiCategory { name: "proud", kind: CategoryKind::Emotion, keywords: &["proud", "accomplish", "achiev", "confident"], emojis: &["🏆", "💪", "🥇", "👏", "😎"] },
    // activities
    EmojiCategory { name: "work", kind: CategoryKind::Activity, keywords: &["work", "job", "meeting", "office"], emojis: &["💼", "💻", "📊", "☕", "🏢"] },
    EmojiCategory { name: "study", kind: CategoryKind::Activity, keywords: &["study", "studi", "learn", "class", "lecture", "homework"], emojis: &["📚", "✏️", "🎓", "🧠", "📝"] },
    EmojiCategory { name: "exercise", kind: CategoryKind::Activity, keywords: &["exercis", "workout", "gym", "running", "yoga", "hiking"], emojis: &["🏃", "💪", "🏋️", "🚴", "🧘"] },
    EmojiCategory { name: "food", kind: CategoryKind::Activity, keywords: &["food", "eating", "cook", "dinner", "lunch", "breakfast", "meal"], emojis: &["🍕", "🍔", "🍜", "🥗", "🍰"] },
    EmojiCategory { name: "music", kind: CategoryKind::Activity, keywords: &["music", "song", "singing", "concert", "listen"], emojis: &["🎵", "🎶", "🎧", "🎸", "🎤"] },
    EmojiCategory { name: "travel", kind: CategoryKind::Activity, keywords: &["travel", "trip", "flight", "vacation", "airport"], emojis: &["✈️", "🧳", "🗺️", "🚗", "🏖️"] },
    EmojiCategory { name: "party", kind: CategoryKind::Activity, keywords: &["party", "celebrat", "dancing", "birthday"], emojis: &["🎉", "🥳", "🎊", "🍾", "🕺"] },
    // context
    EmojiCategory { name: "morning", kind: CategoryKind::Context, keywords: &["morning", "sunrise"], emojis: &["🌅", "☕", "🌞", "🥐", "⏰"] },
    EmojiCategory { name: "night", kind: CategoryKind::Context, keywords: &["night", "evening", "bedtime"], emojis: &["🌙", "🌃", "😴", "⭐", "🌌"] },
    EmojiCategory { name: "rain", kind: CategoryKind::Context, keywords: &["rainy", "raining", "rained", "storm"], emojis: &["🌧️", "☔", "🌂", "⛈️", "😔"] },
    EmojiCategory { name: "sunny", kind: CategoryKind::Context, keywords: &["sunny", "sunshine", "beach"], emojis: &["☀️", "😎", "🌞", "🌻", "🏖️"] },
];

// ─── Frequency cache ───

/// Per-emoji usage counts. One instance lives for the orchestrator's lifetime
/// and is handed to the ranker at construction.
#[derive(Debug, Default)]
pub struct FrequencyCache {
    counts: Mutex<HashMap<String, u32>>,
}

impl FrequencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, emoji: &str) -> u32 {
        let mut counts = self.counts.lock();
        let count = counts.entry(emoji.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn count(&self, emoji: &str) -> u32 {
        self.counts.lock().get(emoji).copied().unwrap_or(0)
    }

    pub fn clear(&self) {
        self.counts.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.counts.lock().is_empty()
    }
}

// ─── Ranker ───

#[derive(Debug, Clone)]
struct Candidate {
    emoji: &'static str,
    relevance: f64,
    reason: String,
    /// Encounter rank of the first category that produced this emoji.
    category: usize,
}

pub struct EmojiRanker {
    frequency: Arc<FrequencyCache>,
    memo: Mutex<HashMap<u64, Vec<Candidate>>>,
}

impl EmojiRanker {
    pub fn new(frequency: Arc<FrequencyCache>) -> Self {
        Self {
            frequency,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn predict(&self, text: &str) -> Vec<EmojiSuggestion> {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return default_suggestions();
        }

        let key = hash_string(&normalized);
        let base = {
            let mut memo = self.memo.lock();
            if let Some(hit) = memo.get(&key) {
                hit.clone()
            } else {
                let computed = rank_candidates(&normalized);
                if memo.len() >= MEMO_CAPACITY {
                    memo.clear();
                }
                memo.insert(key, computed.clone());
                computed
            }
        };

        let mut ranked: Vec<Candidate> = base
            .into_iter()
            .map(|mut c| {
                let uses = self.frequency.count(c.emoji);
                if uses > 0 {
                    c.relevance = (c.relevance + (USAGE_STEP * uses as f64).min(USAGE_CAP)).min(1.0);
                    c.reason = "You use this often".to_string();
                }
                c
            })
            .collect();

        sort_candidates(&mut ranked);
        ranked.truncate(MAX_SUGGESTIONS);
        ranked
            .into_iter()
            .map(|c| EmojiSuggestion {
                emoji: c.emoji.to_string(),
                relevance: c.relevance,
                reason: c.reason,
            })
            .collect()
    }

    pub fn record_usage(&self, emoji: &str) {
        let count = self.frequency.increment(emoji);
        log::debug!("[EmojiRanker] {} used {} time(s)", emoji, count);
    }

    pub fn reset_personalization(&self) {
        self.frequency.clear();
        log::info!("[EmojiRanker] Personalization reset");
    }
}

fn default_suggestions() -> Vec<EmojiSuggestion> {
    DEFAULT_EMOJIS
        .iter()
        .map(|e| EmojiSuggestion {
            emoji: e.to_string(),
            relevance: DEFAULT_RELEVANCE,
            reason: "Popular choice".to_string(),
        })
        .collect()
}

/// Keyword score scaled down by up to 30% the later it first appears.
fn keyword_relevance(text: &str, keyword: &str) -> Option<f64> {
    let first = text.find(keyword)?;
    let occurrences = text.matches(keyword).count();
    let position = first as f64 / text.len().max(1) as f64;
    let base = 0.7 + 0.1 * occurrences as f64;
    Some((base * (1.0 - 0.3 * position)).min(1.0))
}

#[derive(Default)]
struct CandidateSet {
    items: Vec<Candidate>,
    index: HashMap<&'static str, usize>,
    categories: Vec<&'static str>,
}

impl CandidateSet {
    fn category_rank(&mut self, name: &'static str) -> usize {
        match self.categories.iter().position(|c| *c == name) {
            Some(rank) => rank,
            None => {
                self.categories.push(name);
                self.categories.len() - 1
            }
        }
    }

    /// Max relevance wins; the emoji keeps the rank of the category that found it first.
    fn add(&mut self, category: &'static str, emoji: &'static str, relevance: f64, reason: &str) {
        let rank = self.category_rank(category);
        if let Some(&slot) = self.index.get(emoji) {
            let existing = &mut self.items[slot];
            if relevance > existing.relevance {
                existing.relevance = relevance;
                existing.reason = reason.to_string();
            }
        } else {
            self.index.insert(emoji, self.items.len());
            self.items.push(Candidate {
                emoji,
                relevance,
                reason: reason.to_string(),
                category: rank,
            });
        }
    }
}

/// Pre-personalization candidates, deduplicated by emoji.
fn rank_candidates(text: &str) -> Vec<Candidate> {
    let mut set = CandidateSet::default();

    for category in CATEGORIES {
        for keyword in category.keywords {
            if let Some(relevance) = keyword_relevance(text, keyword) {
                let reason = format!("Matches \"{}\"", keyword);
                for emoji in category.emojis {
                    set.add(category.name, *emoji, relevance, &reason);
                }
            }
        }
    }

    for word in lexical::tag_words(text) {
        let (wanted, relevance, reason) = match word.class {
            WordClass::Adjective => (CategoryKind::Emotion, ADJECTIVE_RELEVANCE, "Describes how you feel"),
            WordClass::Verb => (CategoryKind::Activity, VERB_RELEVANCE, "Fits what you're doing"),
            WordClass::Other => continue,
        };
        for category in CATEGORIES.iter().filter(|c| c.kind == wanted) {
            if category.keywords.iter().any(|k| word.word.contains(k)) {
                for emoji in category.emojis {
                    set.add(category.name, *emoji, relevance, reason);
                }
            }
        }
    }

    if set.items.is_empty() {
        for emoji in DEFAULT_EMOJIS {
            set.add("default", emoji, DEFAULT_RELEVANCE, "Popular choice");
        }
    }

    set.items
}

fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.category.cmp(&b.category))
            .then(a.emoji.cmp(b.emoji))
    });
}
