// ─── Lexical analysis ───
//
// Word-level helpers shared by the sentiment classifier and the emoji ranker:
//   - `paragraph_score` : valence lexicon pass, normalised to [-1, 1]
//   - `tag_words`       : coarse adjective / verb tagging
// Both are rule tables, no trained model.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("valid word regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Adjective,
    Verb,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedWord {
    pub word: String,
    pub class: WordClass,
}

// ─── Valence lexicon ───

const VALENCE: &[(&str, f64)] = &[
    ("happy", 0.8),
    ("great", 0.7),
    ("good", 0.5),
    ("love", 0.8),
    ("nice", 0.6),
    ("fine", 0.3),
    ("okay", 0.2),
    ("ok", 0.2),
    ("pleasant", 0.6),
    ("productive", 0.5),
    ("better", 0.4),
    ("best", 0.6),
    ("win", 0.5),
    ("won", 0.5),
    ("chill", 0.4),
    ("cozy", 0.5),
    ("yay", 0.7),
    ("sunny", 0.3),
    ("calm", 0.5),
    ("fun", 0.6),
    ("enjoyed", 0.6),
    ("sad", -0.7),
    ("terrible", -0.9),
    ("awful", -0.9),
    ("bad", -0.6),
    ("angry", -0.7),
    ("tired", -0.4),
    ("stressed", -0.6),
    ("meh", -0.3),
    ("boring", -0.4),
    ("bored", -0.4),
    ("lame", -0.5),
    ("rough", -0.5),
    ("hard", -0.3),
    ("difficult", -0.4),
    ("worse", -0.5),
    ("worst", -0.7),
    ("ugh", -0.5),
    ("sucks", -0.7),
    ("pain", -0.5),
    ("lost", -0.4),
    ("fail", -0.6),
    ("failed", -0.6),
    ("rainy", -0.2),
    ("busy", -0.1),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "isn't", "wasn't", "didn't", "can't", "won't", "aren't",
];

const INTENSIFIERS: &[&str] = &["very", "really", "so", "extremely", "super", "totally"];

/// How many tokens after a negator are flipped.
const NEGATION_WINDOW: usize = 2;

pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn valence_of(word: &str) -> Option<f64> {
    VALENCE.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Paragraph-level sentiment score in [-1, 1]. Negators flip the next scored
/// words inside a short window; intensifiers scale the following word.
pub fn paragraph_score(text: &str) -> f64 {
    let tokens = tokenize(text);
    let mut sum = 0.0_f64;
    let mut negate_left = 0usize;
    let mut boost = 1.0_f64;

    for token in &tokens {
        if NEGATORS.contains(&token.as_str()) {
            negate_left = NEGATION_WINDOW;
            continue;
        }
        if INTENSIFIERS.contains(&token.as_str()) {
            boost = 1.3;
            continue;
        }
        if let Some(v) = valence_of(token) {
            let mut value = v * boost;
            if negate_left > 0 {
                value = -value;
            }
            sum += value;
        }
        boost = 1.0;
        negate_left = negate_left.saturating_sub(1);
    }

    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + 1.0).sqrt()).clamp(-1.0, 1.0)
}

// ─── Word class tagging ───

const ADJECTIVES: &[&str] = &[
    "happy", "sad", "angry", "anxious", "excited", "tired", "calm", "stressed", "grateful",
    "bored", "proud", "lonely", "nervous", "worried", "upset", "glad", "scared", "afraid",
    "exhausted", "relaxed", "overwhelmed", "frustrated", "annoyed", "sleepy", "cheerful",
    "thankful", "content", "peaceful", "great", "good", "bad", "awful", "terrible", "fine",
    "unhappy", "furious", "thrilled", "drained", "confident", "depressed", "uneasy",
];

const VERBS: &[&str] = &[
    "work", "works", "worked", "study", "studies", "studied", "run", "ran", "cook", "cooked",
    "eat", "ate", "travel", "travelled", "traveled", "dance", "danced", "sing", "sang", "learn",
    "learned", "read", "train", "trained", "walk", "walked", "hike", "hiked", "swim", "swam",
    "celebrate", "celebrated", "listen", "listened", "exercise", "exercised",
];

/// Words after which the next word describes a state ("feeling drained").
const LINKING: &[&str] = &[
    "feel", "feeling", "felt", "feels", "am", "is", "was", "are", "were", "so", "very",
    "really", "get", "getting", "got", "seem", "seems", "im", "i'm",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "less", "able", "ible"];

fn looks_like_adjective(word: &str) -> bool {
    word.len() > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s))
}

fn looks_like_verb(word: &str) -> bool {
    (word.len() > 5 && word.ends_with("ing")) || (word.len() > 4 && word.ends_with("ed"))
}

pub fn tag_words(text: &str) -> Vec<TaggedWord> {
    let tokens = tokenize(text);
    let mut tagged = Vec::with_capacity(tokens.len());
    let mut after_linking = false;

    for token in tokens {
        let class = if ADJECTIVES.contains(&token.as_str()) {
            WordClass::Adjective
        } else if VERBS.contains(&token.as_str()) {
            WordClass::Verb
        } else if after_linking && !LINKING.contains(&token.as_str()) {
            WordClass::Adjective
        } else if looks_like_adjective(&token) {
            WordClass::Adjective
        } else if looks_like_verb(&token) {
            WordClass::Verb
        } else {
            WordClass::Other
        };
        after_linking = LINKING.contains(&token.as_str());
        tagged.push(TaggedWord { word: token, class });
    }

    tagged
}
