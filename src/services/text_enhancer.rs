use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::errors::PipelineError;
use crate::models::{AiSettings, EnhancementMode, EnhancementResult, Tone};

/// Lone lowercase "i", but not the "i" of an abbreviation like "i.e.".
static LOWER_I_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bi($|[^\w.]|\.(?:\s|$))").expect("valid pronoun regex"));
static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid spaces regex"));

const SUMMARIZE_WORD_LIMIT: usize = 20;

const STRESS_PROMPTS: [&str; 3] = [
    "What's one thing weighing on you right now?",
    "What would make tomorrow feel a little lighter?",
    "Who could you lean on this week?",
];
const HAPPY_PROMPTS: [&str; 3] = [
    "What made today feel good?",
    "Who did you share this moment with?",
    "How can you make room for more of this?",
];
const TIRED_PROMPTS: [&str; 3] = [
    "What drained your energy today?",
    "What would real rest look like tonight?",
    "Is there something you can let go of tomorrow?",
];
const DEFAULT_PROMPTS: [&str; 3] = [
    "How are you feeling right now?",
    "What stood out about today?",
    "What are you looking forward to?",
];

pub struct TextEnhancer {
    enhanced_available: bool,
    simulated_latency: Duration,
}

impl TextEnhancer {
    pub fn new(enhanced_available: bool, simulated_latency: Duration) -> Self {
        Self {
            enhanced_available,
            simulated_latency,
        }
    }

    pub fn from_settings(ai: &AiSettings) -> Self {
        Self::new(
            ai.enhanced_text_active(),
            Duration::from_millis(ai.simulated_latency_ms),
        )
    }

    pub fn enhanced_available(&self) -> bool {
        self.enhanced_available
    }

    pub async fn enhance(&self, text: &str, mode: EnhancementMode) -> EnhancementResult {
        let started = Instant::now();

        let (enhanced_text, changes, enhanced) = match self.enhanced(text, mode).await {
            Ok((out, changes)) => (out, changes, true),
            Err(e) => {
                log::debug!("[TextEnhancer] {}, using fallback", e);
                let (out, changes) = fallback(text, mode);
                (out, changes, false)
            }
        };

        EnhancementResult {
            enhanced_text,
            changes,
            processing_time_ms: started.elapsed().as_millis() as u64,
            enhanced,
        }
    }

    async fn enhanced(&self, text: &str, mode: EnhancementMode) -> Result<(String, Vec<String>), PipelineError> {
        if !self.enhanced_available {
            return Err(PipelineError::Unavailable("enhanced text mode".to_string()));
        }
        if !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }
        Ok(match mode {
            EnhancementMode::Summarize => enhanced_summarize(text),
            EnhancementMode::AdjustTone(tone) => adjust_tone(text, tone),
            EnhancementMode::Proofread => enhanced_proofread(text),
            EnhancementMode::ExpandIdeas => expand_ideas(text),
        })
    }
}

// ─── Fallback path ───

pub fn fallback(text: &str, mode: EnhancementMode) -> (String, Vec<String>) {
    match mode {
        EnhancementMode::Summarize => summarize(text),
        EnhancementMode::Proofread => proofread(text),
        EnhancementMode::AdjustTone(_) => (
            text.to_string(),
            vec!["Tone adjustment requires enhanced mode".to_string()],
        ),
        EnhancementMode::ExpandIdeas => (
            text.to_string(),
            vec!["Expanding ideas requires enhanced mode".to_string()],
        ),
    }
}

fn sentences(text: &str) -> Vec<String> {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn summarize(text: &str) -> (String, Vec<String>) {
    let parts = sentences(text);
    if parts.len() > 1 {
        (
            format!("{}.", parts[0]),
            vec![format!("Condensed {} sentences", parts.len())],
        )
    } else {
        (text.to_string(), vec!["Already concise, nothing to condense".to_string()])
    }
}

fn proofread(text: &str) -> (String, Vec<String>) {
    let fixed = LOWER_I_RE.replace_all(text, "I${1}");
    let fixed = SPACES_RE.replace_all(&fixed, " ");
    let fixed = fixed.trim().to_string();
    if fixed != text {
        (fixed, vec!["Fixed formatting".to_string()])
    } else {
        (fixed, vec!["No issues found".to_string()])
    }
}

// ─── Enhanced path ───

fn enhanced_summarize(text: &str) -> (String, Vec<String>) {
    let parts = sentences(text);
    match parts.len() {
        0 | 1 => (text.to_string(), vec!["Already concise, nothing to condense".to_string()]),
        2 => summarize(text),
        n => (
            format!("{}. {}.", parts[0], parts[n - 1]),
            vec![format!("Kept the opening and closing of {} sentences", n)],
        ),
    }
}

const TONE_TABLE: &[(Tone, &str, &str)] = &[
    (Tone::Gentle, "hate", "struggle with"),
    (Tone::Gentle, "stupid", "frustrating"),
    (Tone::Gentle, "always", "often"),
    (Tone::Positive, "terrible", "tough"),
    (Tone::Positive, "awful", "hard"),
    (Tone::Positive, "bad", "challenging"),
    (Tone::Positive, "failed", "didn't get there yet"),
    (Tone::Professional, "can't", "cannot"),
    (Tone::Professional, "won't", "will not"),
    (Tone::Professional, "gonna", "going to"),
    (Tone::Professional, "kinda", "somewhat"),
    (Tone::Calm, "!", "."),
    (Tone::Calm, "freaking out", "feeling unsettled"),
    (Tone::Calm, "furious", "upset"),
];

struct ToneRule {
    tone: Tone,
    from: &'static str,
    to: &'static str,
    pattern: Regex,
}

/// Word entries only match whole words; punctuation entries match anywhere.
static TONE_RULES: Lazy<Vec<ToneRule>> = Lazy::new(|| {
    TONE_TABLE
        .iter()
        .map(|&(tone, from, to)| {
            let escaped = regex::escape(from);
            let pattern = if from.starts_with(char::is_alphanumeric) {
                format!(r"\b{}\b", escaped)
            } else {
                escaped
            };
            ToneRule {
                tone,
                from,
                to,
                pattern: Regex::new(&pattern).expect("valid tone pattern"),
            }
        })
        .collect()
});

fn adjust_tone(text: &str, tone: Tone) -> (String, Vec<String>) {
    let mut out = text.to_string();
    let mut changes = Vec::new();
    for rule in TONE_RULES.iter().filter(|r| r.tone == tone) {
        if rule.pattern.is_match(&out) {
            out = rule.pattern.replace_all(&out, NoExpand(rule.to)).into_owned();
            changes.push(format!("Replaced \"{}\" with \"{}\"", rule.from, rule.to));
        }
    }
    if changes.is_empty() {
        changes.push("Tone already fits".to_string());
    }
    (out, changes)
}

fn enhanced_proofread(text: &str) -> (String, Vec<String>) {
    let (mut out, mut changes) = proofread(text);
    let mut capitalised = String::with_capacity(out.len());
    let mut start_of_sentence = true;
    for c in out.chars() {
        if start_of_sentence && c.is_alphabetic() {
            capitalised.extend(c.to_uppercase());
            start_of_sentence = false;
        } else {
            if matches!(c, '.' | '!' | '?') {
                start_of_sentence = true;
            } else if !c.is_whitespace() {
                start_of_sentence = false;
            }
            capitalised.push(c);
        }
    }
    if !capitalised.is_empty() && !capitalised.ends_with(['.', '!', '?']) {
        capitalised.push('.');
    }
    if capitalised != out {
        out = capitalised;
        changes.retain(|c| c != "No issues found");
        changes.push("Capitalised sentences and added punctuation".to_string());
    }
    (out, changes)
}

fn expand_ideas(text: &str) -> (String, Vec<String>) {
    let prompt = generate_prompts(text)[0];
    let base = text.trim_end();
    let out = if base.is_empty() {
        prompt.to_string()
    } else {
        format!("{} {}", base, prompt)
    };
    (out, vec!["Added a reflection prompt".to_string()])
}

// ─── Helpers ───

pub fn should_summarize(text: &str) -> bool {
    text.split_whitespace().count() > SUMMARIZE_WORD_LIMIT
}

pub fn generate_prompts(context: &str) -> [&'static str; 3] {
    let lower = context.to_lowercase();
    if ["stress", "anxious", "overwhelm", "worried"].iter().any(|k| lower.contains(k)) {
        STRESS_PROMPTS
    } else if ["happy", "great", "excited", "good"].iter().any(|k| lower.contains(k)) {
        HAPPY_PROMPTS
    } else if ["tired", "exhausted", "sleepy", "drained"].iter().any(|k| lower.contains(k)) {
        TIRED_PROMPTS
    } else {
        DEFAULT_PROMPTS
    }
}
