use std::collections::HashMap;

use chrono::{DateTime, Duration, Local};

use crate::errors::PipelineError;
use crate::models::{MoodRecord, Pattern, PatternType, Sentiment, WeeklySummary, MIN_PATTERN_DATA_POINTS};
use crate::services::sentiment_classifier;
use crate::utils::time::{weekday_name, weekday_of, TimeBucket, WEEKDAYS};

/// Below this many records no detector runs.
pub const MIN_HISTORY: usize = MIN_PATTERN_DATA_POINTS;
const MIN_DAY_GROUP: usize = 2;
const MIN_TIME_BUCKET: usize = 3;
const MIN_TREND_HISTORY: usize = 7;
const PROPORTION_THRESHOLD: f64 = 0.6;
const TREND_THRESHOLD: f64 = 0.2;
const STRESS_DENSITY_THRESHOLD: f64 = 0.4;
const WORK_DENSITY_THRESHOLD: f64 = 0.5;
const REGULAR_TRACKING_PER_DAY: f64 = 2.0;
const SUMMARY_WINDOW_DAYS: i64 = 7;
const MAX_TOP_EMOJIS: usize = 5;
const MAX_RECOMMENDATIONS: usize = 3;

const STRESS_KEYWORDS: &[&str] = &[
    "stress", "anxious", "anxiety", "overwhelm", "pressure", "panic", "worried", "tense", "deadline",
];

const WORK_KEYWORDS: &[&str] = &[
    "work", "job", "meeting", "boss", "office", "project", "deadline", "colleague", "shift",
];

// ─── Public API ───

/// Significant patterns in `history`, strongest first. Fewer than
/// [`MIN_HISTORY`] records yields an empty list.
pub fn analyze_patterns(history: &[MoodRecord]) -> Vec<Pattern> {
    if history.len() < MIN_HISTORY {
        log::debug!(
            "[PatternDetector] {} record(s), need {} before analysing",
            history.len(),
            MIN_HISTORY
        );
        return vec![];
    }

    let sentiments: Vec<Sentiment> = history
        .iter()
        .map(|r| sentiment_classifier::classify(&r.label).0)
        .collect();

    let mut candidates = Vec::new();
    candidates.extend(analyze_day_of_week(history, &sentiments));
    candidates.extend(analyze_time_of_day(history, &sentiments));
    candidates.extend(analyze_sentiment_trend(history, &sentiments));
    candidates.extend(analyze_keywords(history));
    candidates.extend(analyze_frequency(history));

    let found = candidates.len();
    let mut patterns: Vec<Pattern> = candidates.into_iter().filter(Pattern::is_significant).collect();
    // sort_by is stable: detector order breaks confidence ties
    patterns.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    log::info!(
        "[PatternDetector] {} record(s): {} candidate(s), {} significant",
        history.len(),
        found,
        patterns.len()
    );
    patterns
}

pub fn ensure_history(history: &[MoodRecord]) -> Result<(), PipelineError> {
    if history.len() < MIN_HISTORY {
        return Err(PipelineError::InsufficientData {
            required: MIN_HISTORY,
            actual: history.len(),
        });
    }
    Ok(())
}

/// Same as [`analyze_patterns`] but reports a short history as an error.
pub fn require_history(history: &[MoodRecord]) -> Result<Vec<Pattern>, PipelineError> {
    ensure_history(history)?;
    Ok(analyze_patterns(history))
}

pub fn has_recent(history: &[MoodRecord], now: DateTime<Local>) -> bool {
    let cutoff = now - Duration::days(SUMMARY_WINDOW_DAYS);
    history.iter().any(|r| r.timestamp >= cutoff && r.timestamp <= now)
}

/// Summary over the records from the seven days before `now`.
pub fn generate_weekly_summary(recent_history: &[MoodRecord], now: DateTime<Local>) -> WeeklySummary {
    let cutoff = now - Duration::days(SUMMARY_WINDOW_DAYS);
    let week: Vec<MoodRecord> = recent_history
        .iter()
        .filter(|r| r.timestamp >= cutoff && r.timestamp <= now)
        .cloned()
        .collect();

    let patterns = analyze_patterns(&week);
    let sentiments: Vec<Sentiment> = week
        .iter()
        .map(|r| sentiment_classifier::classify(&r.label).0)
        .collect();
    let dominant_sentiment = dominant(&sentiments);
    let total_moods = week.len();

    let mut insights = vec![sentiment_insight(dominant_sentiment).to_string()];
    insights.extend(
        patterns
            .iter()
            .filter_map(|p| p.recommendation.clone())
            .take(MAX_RECOMMENDATIONS),
    );
    if total_moods >= 7 {
        insights.push(format!(
            "Great consistency! You logged {} moods this week.",
            total_moods
        ));
    }

    WeeklySummary {
        patterns,
        dominant_sentiment,
        total_moods,
        average_per_day: total_moods as f64 / SUMMARY_WINDOW_DAYS as f64,
        top_emojis: top_emojis(&week, MAX_TOP_EMOJIS),
        insights,
    }
}

// ─── Detectors ───

fn proportions(sentiments: &[Sentiment]) -> (f64, f64) {
    let total = sentiments.len().max(1) as f64;
    let negative = sentiments.iter().filter(|s| **s == Sentiment::Negative).count() as f64;
    let positive = sentiments.iter().filter(|s| **s == Sentiment::Positive).count() as f64;
    (negative / total, positive / total)
}

fn analyze_day_of_week(history: &[MoodRecord], sentiments: &[Sentiment]) -> Vec<Pattern> {
    let mut by_day: HashMap<chrono::Weekday, Vec<Sentiment>> = HashMap::new();
    for (record, sentiment) in history.iter().zip(sentiments) {
        by_day.entry(weekday_of(&record.timestamp)).or_default().push(*sentiment);
    }

    let mut patterns = Vec::new();
    for day in WEEKDAYS {
        let Some(group) = by_day.get(&day) else { continue };
        if group.len() < MIN_DAY_GROUP {
            continue;
        }
        let name = weekday_name(day);
        let (negative, positive) = proportions(group);
        if negative > PROPORTION_THRESHOLD {
            patterns.push(Pattern {
                pattern_type: PatternType::DayOfWeek,
                description: format!("You tend to feel more stressed on {}s", name),
                confidence: negative,
                data_points: group.len(),
                recommendation: Some(format!(
                    "Plan something restful for {}s, even a short walk or an early night.",
                    name
                )),
            });
        } else if positive > PROPORTION_THRESHOLD {
            patterns.push(Pattern {
                pattern_type: PatternType::DayOfWeek,
                description: format!("You're usually happier on {}s", name),
                confidence: positive,
                data_points: group.len(),
                recommendation: Some(format!(
                    "Notice what makes {}s good and bring a bit of it into other days.",
                    name
                )),
            });
        }
    }
    patterns
}

fn analyze_time_of_day(history: &[MoodRecord], sentiments: &[Sentiment]) -> Vec<Pattern> {
    let mut by_bucket: HashMap<TimeBucket, Vec<Sentiment>> = HashMap::new();
    for (record, sentiment) in history.iter().zip(sentiments) {
        by_bucket.entry(TimeBucket::of(&record.timestamp)).or_default().push(*sentiment);
    }

    let mut patterns = Vec::new();
    for bucket in TimeBucket::ALL {
        let Some(group) = by_bucket.get(&bucket) else { continue };
        if group.len() < MIN_TIME_BUCKET {
            continue;
        }
        let (negative, _) = proportions(group);
        if negative > PROPORTION_THRESHOLD {
            patterns.push(Pattern {
                pattern_type: PatternType::TimeOfDay,
                description: format!("You often feel down in the {}", bucket.label()),
                confidence: negative,
                data_points: group.len(),
                recommendation: Some(time_of_day_tip(bucket).to_string()),
            });
        }
    }
    patterns
}

fn time_of_day_tip(bucket: TimeBucket) -> &'static str {
    match bucket {
        TimeBucket::Morning => "Try a slower start: a few minutes of stretching or sunlight before screens.",
        TimeBucket::Afternoon => "A short break or a walk after lunch can lift the afternoon slump.",
        TimeBucket::Evening => "Wind down in the evening with something calming, away from work.",
        TimeBucket::Night => "Late nights seem hard; an earlier bedtime routine might help.",
    }
}

fn analyze_sentiment_trend(history: &[MoodRecord], sentiments: &[Sentiment]) -> Vec<Pattern> {
    if history.len() < MIN_TREND_HISTORY {
        return vec![];
    }

    let mut ordered: Vec<(&MoodRecord, Sentiment)> =
        history.iter().zip(sentiments.iter().copied()).collect();
    ordered.sort_by_key(|(r, _)| r.timestamp);

    let mid = ordered.len() / 2;
    let positive_share = |slice: &[(&MoodRecord, Sentiment)]| {
        let total = slice.len().max(1) as f64;
        slice.iter().filter(|(_, s)| *s == Sentiment::Positive).count() as f64 / total
    };
    let improvement = positive_share(&ordered[mid..]) - positive_share(&ordered[..mid]);

    if improvement > TREND_THRESHOLD {
        vec![Pattern {
            pattern_type: PatternType::SentimentTrend,
            description: "Your mood has been improving lately".to_string(),
            confidence: improvement.abs().min(1.0),
            data_points: history.len(),
            recommendation: Some("Whatever you've changed recently seems to be working. Keep it going.".to_string()),
        }]
    } else if improvement < -TREND_THRESHOLD {
        vec![Pattern {
            pattern_type: PatternType::SentimentTrend,
            description: "Your mood has been declining lately".to_string(),
            confidence: improvement.abs().min(1.0),
            data_points: history.len(),
            recommendation: Some("Things seem heavier lately. Reaching out to someone you trust could help.".to_string()),
        }]
    } else {
        vec![]
    }
}

fn mentions_any(label: &str, keywords: &[&str]) -> bool {
    let lower = label.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn analyze_keywords(history: &[MoodRecord]) -> Vec<Pattern> {
    let total = history.len().max(1) as f64;
    let stress_hits = history.iter().filter(|r| mentions_any(&r.label, STRESS_KEYWORDS)).count();
    let work_hits = history.iter().filter(|r| mentions_any(&r.label, WORK_KEYWORDS)).count();

    let mut patterns = Vec::new();
    let stress_density = stress_hits as f64 / total;
    if stress_density > STRESS_DENSITY_THRESHOLD {
        patterns.push(Pattern {
            pattern_type: PatternType::KeywordCorrelation,
            description: "Stress comes up often in your entries".to_string(),
            confidence: stress_density,
            data_points: stress_hits,
            recommendation: Some("Try a two-minute breathing exercise when stress builds up.".to_string()),
        });
    }
    let work_density = work_hits as f64 / total;
    if work_density > WORK_DENSITY_THRESHOLD {
        patterns.push(Pattern {
            pattern_type: PatternType::KeywordCorrelation,
            description: "Work shows up in most of your moods".to_string(),
            confidence: work_density,
            data_points: work_hits,
            recommendation: Some("Set a clear end to the workday to protect your downtime.".to_string()),
        });
    }
    patterns
}

fn analyze_frequency(history: &[MoodRecord]) -> Vec<Pattern> {
    let (Some(first), Some(last)) = (
        history.iter().map(|r| r.timestamp).min(),
        history.iter().map(|r| r.timestamp).max(),
    ) else {
        return vec![];
    };

    let day_range = (last - first).num_days().max(1);
    let average = history.len() as f64 / day_range as f64;
    if average < REGULAR_TRACKING_PER_DAY {
        return vec![];
    }

    vec![Pattern {
        pattern_type: PatternType::Frequency,
        description: format!("You're tracking regularly, about {:.1} moods a day", average),
        confidence: (average / 3.0).min(1.0),
        data_points: history.len(),
        recommendation: None,
    }]
}

// ─── Summary helpers ───

/// Mode of the sentiments; ties go positive, then negative, then neutral.
fn dominant(sentiments: &[Sentiment]) -> Sentiment {
    let count = |target: Sentiment| sentiments.iter().filter(|s| **s == target).count();
    let (positive, negative, neutral) = (
        count(Sentiment::Positive),
        count(Sentiment::Negative),
        count(Sentiment::Neutral),
    );
    if positive == 0 && negative == 0 && neutral == 0 {
        Sentiment::Neutral
    } else if positive >= negative && positive >= neutral {
        Sentiment::Positive
    } else if negative >= neutral {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn sentiment_insight(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "You've been feeling mostly positive this week. Keep it up!",
        Sentiment::Negative => "This week has been tough. Be gentle with yourself.",
        Sentiment::Neutral => "Your week has been fairly balanced.",
    }
}

/// Most used emojis, ties in first-seen order.
fn top_emojis(records: &[MoodRecord], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(e, _)| *e == record.emoji) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.emoji.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(e, _)| e).collect()
}
