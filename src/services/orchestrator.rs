// ─── Orchestrator ───
//
// Stateful front of the pipeline. Owns the frequency cache, serialises every
// write to the derived state and discards stale pattern loads through a
// generation counter.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::commands::DEFAULT_TIMEOUT;
use crate::errors::{PipelineError, PipelineResult};
use crate::models::{
    AnalysisResult, EmojiSuggestion, EnhancementMode, EnhancementResult, MoodRecord, Pattern,
    Settings, WeeklySummary,
};
use crate::services::emoji_ranker::{EmojiRanker, FrequencyCache};
use crate::services::text_enhancer::TextEnhancer;
use crate::services::{pattern_detector, sentiment_classifier};

/// Text shorter than this keeps the previous sentiment result.
const MIN_SENTIMENT_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Idle,
    Analyzing,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load (or an AI toggle) was issued while this one ran.
    Superseded,
    /// AI features are off.
    Skipped,
}

#[derive(Debug, Clone)]
struct PipelineState {
    phase: PipelinePhase,
    text: String,
    analysis: AnalysisResult,
    suggestions: Vec<EmojiSuggestion>,
    patterns: Vec<Pattern>,
    weekly_summary: Option<WeeklySummary>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            phase: PipelinePhase::Idle,
            text: String::new(),
            analysis: AnalysisResult::default(),
            suggestions: vec![],
            patterns: vec![],
            weekly_summary: None,
        }
    }
}

impl PipelineState {
    fn clear_derived(&mut self) {
        self.phase = PipelinePhase::Idle;
        self.analysis = AnalysisResult::default();
        self.suggestions.clear();
        self.patterns.clear();
        self.weekly_summary = None;
    }
}

/// Everything a UI needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub ai_enabled: bool,
    pub phase: PipelinePhase,
    pub text: String,
    pub analysis: AnalysisResult,
    pub suggestions: Vec<EmojiSuggestion>,
    pub patterns: Vec<Pattern>,
    pub weekly_summary: Option<WeeklySummary>,
}

pub struct Orchestrator {
    ranker: EmojiRanker,
    frequency: Arc<FrequencyCache>,
    enhancer: RwLock<Arc<TextEnhancer>>,
    state: Mutex<PipelineState>,
    generation: AtomicU64,
    ai_enabled: AtomicBool,
    voice_timeout_secs: AtomicU64,
}

fn voice_budget_secs(settings: &Settings) -> u64 {
    match settings.voice.timeout_secs {
        0 => DEFAULT_TIMEOUT.as_secs(),
        secs => secs,
    }
}

/// Puts the phase back if a pattern load ends without applying its result
/// (dropped by a timeout, or the worker failed).
struct LoadGuard<'a> {
    orchestrator: &'a Orchestrator,
    generation: u64,
    restore: PipelinePhase,
    applied: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.applied {
            return;
        }
        let mut state = self.orchestrator.state.lock();
        let latest = self.orchestrator.generation.load(Ordering::SeqCst) == self.generation;
        if latest && state.phase == PipelinePhase::Analyzing {
            log::debug!("[Orchestrator] Pattern load #{} abandoned", self.generation);
            state.phase = self.restore;
        }
    }
}

impl Orchestrator {
    pub fn new(settings: &Settings) -> Self {
        let frequency = Arc::new(FrequencyCache::new());
        log::info!(
            "[Orchestrator] Starting (ai: {}, enhanced text: {})",
            settings.ai.enabled,
            settings.ai.enhanced_text_active()
        );
        Self {
            ranker: EmojiRanker::new(Arc::clone(&frequency)),
            frequency,
            enhancer: RwLock::new(Arc::new(TextEnhancer::from_settings(&settings.ai))),
            state: Mutex::new(PipelineState::default()),
            generation: AtomicU64::new(0),
            ai_enabled: AtomicBool::new(settings.ai.enabled),
            voice_timeout_secs: AtomicU64::new(voice_budget_secs(settings)),
        }
    }

    // ─── Input ───

    pub fn set_text(&self, text: &str) {
        {
            let mut state = self.state.lock();
            if !self.ai_enabled() {
                state.text = text.to_string();
                return;
            }
            state.phase = PipelinePhase::Analyzing;
        }

        let suggestions = self.ranker.predict(text);
        let analysis = (text.chars().count() > MIN_SENTIMENT_CHARS)
            .then(|| sentiment_classifier::analyze(text));

        // toggle_ai flips the flag before it takes the lock, so checking
        // again here keeps a late write from landing after clear_derived
        let mut state = self.state.lock();
        state.text = text.to_string();
        if !self.ai_enabled() {
            return;
        }
        state.suggestions = suggestions;
        if let Some(analysis) = analysis {
            state.analysis = analysis;
        }
        state.phase = PipelinePhase::Ready;
    }

    pub fn load_patterns(
        &self,
        history: Vec<MoodRecord>,
    ) -> impl Future<Output = PipelineResult<LoadOutcome>> + '_ {
        self.load_patterns_at(history, Local::now())
    }

    /// Runs the detector on a blocking worker. The generation is taken when
    /// this is called, not when the future is first polled, so a later call
    /// always supersedes an earlier one.
    pub fn load_patterns_at(
        &self,
        history: Vec<MoodRecord>,
        now: DateTime<Local>,
    ) -> impl Future<Output = PipelineResult<LoadOutcome>> + '_ {
        let guard = self.ai_enabled().then(|| {
            let mut state = self.state.lock();
            let restore = match state.phase {
                PipelinePhase::Analyzing => PipelinePhase::Ready,
                phase => phase,
            };
            state.phase = PipelinePhase::Analyzing;
            LoadGuard {
                orchestrator: self,
                generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
                restore,
                applied: false,
            }
        });

        async move {
            let Some(mut guard) = guard else {
                log::debug!("[Orchestrator] AI disabled, skipping pattern load");
                return Ok(LoadOutcome::Skipped);
            };
            let generation = guard.generation;

            let records = history.len();
            let (patterns, summary) = tokio::task::spawn_blocking(move || {
                let patterns = pattern_detector::analyze_patterns(&history);
                let summary = pattern_detector::has_recent(&history, now)
                    .then(|| pattern_detector::generate_weekly_summary(&history, now));
                (patterns, summary)
            })
            .await
            .map_err(|e| {
                log::error!("[Orchestrator] Pattern worker failed: {}", e);
                PipelineError::Background(e.to_string())
            })?;

            let mut state = self.state.lock();
            if self.generation.load(Ordering::SeqCst) != generation || !self.ai_enabled() {
                log::debug!(
                    "[Orchestrator] Discarding stale pattern load #{} ({} records)",
                    generation,
                    records
                );
                return Ok(LoadOutcome::Superseded);
            }

            log::info!(
                "[Orchestrator] Load #{}: {} pattern(s), weekly summary: {}",
                generation,
                patterns.len(),
                summary.is_some()
            );
            state.patterns = patterns;
            state.weekly_summary = summary;
            state.phase = PipelinePhase::Ready;
            guard.applied = true;
            Ok(LoadOutcome::Applied)
        }
    }

    pub async fn enhance(&self, text: &str, mode: EnhancementMode) -> EnhancementResult {
        let enhancer = Arc::clone(&self.enhancer.read());
        enhancer.enhance(text, mode).await
    }

    // ─── Settings ───

    /// Flips the AI flag and returns the new value.
    pub fn toggle_ai(&self) -> bool {
        let enabled = !self.ai_enabled.fetch_xor(true, Ordering::SeqCst);
        if enabled {
            log::info!("[Orchestrator] AI enabled");
            let text = self.state.lock().text.clone();
            self.set_text(&text);
        } else {
            log::info!("[Orchestrator] AI disabled, clearing derived state");
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.state.lock().clear_derived();
        }
        enabled
    }

    pub fn set_ai_enabled(&self, enabled: bool) {
        if self.ai_enabled() != enabled {
            self.toggle_ai();
        }
    }

    pub fn apply_settings(&self, settings: &Settings) {
        *self.enhancer.write() = Arc::new(TextEnhancer::from_settings(&settings.ai));
        self.voice_timeout_secs
            .store(voice_budget_secs(settings), Ordering::SeqCst);
        self.set_ai_enabled(settings.ai.enabled);
    }

    pub fn record_emoji_usage(&self, emoji: &str) {
        self.ranker.record_usage(emoji);
    }

    pub fn reset_personalization(&self) {
        self.ranker.reset_personalization();
        if self.ai_enabled() {
            let text = self.state.lock().text.clone();
            let suggestions = self.ranker.predict(&text);
            let mut state = self.state.lock();
            if self.ai_enabled() {
                state.suggestions = suggestions;
            }
        }
    }

    // ─── Reads ───

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled.load(Ordering::SeqCst)
    }

    /// Soft budget for voice and command callers, from `VoiceSettings`.
    pub fn voice_timeout(&self) -> Duration {
        Duration::from_secs(self.voice_timeout_secs.load(Ordering::SeqCst))
    }

    pub fn enhanced_text_available(&self) -> bool {
        self.enhancer.read().enhanced_available()
    }

    pub fn predict(&self, text: &str) -> Vec<EmojiSuggestion> {
        self.ranker.predict(text)
    }

    pub fn frequency(&self) -> Arc<FrequencyCache> {
        Arc::clone(&self.frequency)
    }

    pub fn phase(&self) -> PipelinePhase {
        self.state.lock().phase
    }

    pub fn analysis(&self) -> AnalysisResult {
        self.state.lock().analysis.clone()
    }

    pub fn suggestions(&self) -> Vec<EmojiSuggestion> {
        self.state.lock().suggestions.clone()
    }

    pub fn patterns(&self) -> Vec<Pattern> {
        self.state.lock().patterns.clone()
    }

    pub fn weekly_summary(&self) -> Option<WeeklySummary> {
        self.state.lock().weekly_summary.clone()
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        let state = self.state.lock();
        PipelineSnapshot {
            ai_enabled: self.ai_enabled(),
            phase: state.phase,
            text: state.text.clone(),
            analysis: state.analysis.clone(),
            suggestions: state.suggestions.clone(),
            patterns: state.patterns.clone(),
            weekly_summary: state.weekly_summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use chrono::TimeZone;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(&Settings::default())
    }

    fn evening_history() -> Vec<MoodRecord> {
        (0..10)
            .map(|i| {
                let ts = Local
                    .with_ymd_and_hms(2026, 6, 1 + i, 18, 0, 0)
                    .single()
                    .unwrap();
                let label = if i < 8 { "sad and lonely" } else { "fine" };
                MoodRecord::new("😢", label, ts)
            })
            .collect()
    }

    #[test]
    fn starts_idle() {
        let orch = orchestrator();
        assert_eq!(orch.phase(), PipelinePhase::Idle);
        assert!(orch.suggestions().is_empty());
        assert_eq!(orch.analysis(), AnalysisResult::default());
    }

    #[test]
    fn set_text_fills_suggestions_and_sentiment() {
        let orch = orchestrator();
        orch.set_text("Had a terrible meeting");
        assert_eq!(orch.phase(), PipelinePhase::Ready);
        assert!(!orch.suggestions().is_empty());
        assert_eq!(orch.analysis().sentiment, Sentiment::Negative);
    }

    #[test]
    fn short_text_keeps_previous_sentiment() {
        let orch = orchestrator();
        orch.set_text("so happy today");
        orch.set_text("sad");
        assert_eq!(orch.analysis().sentiment, Sentiment::Positive);
        assert_eq!(orch.snapshot().text, "sad");
    }

    #[test]
    fn sentiment_needs_more_than_three_chars() {
        let orch = orchestrator();
        orch.set_text("so happy today");
        orch.set_text("bad");
        assert_eq!(orch.analysis().sentiment, Sentiment::Positive);

        orch.set_text("sad!");
        assert_eq!(orch.analysis().sentiment, Sentiment::Negative);
    }

    #[test]
    fn sentiment_length_counts_chars_not_bytes() {
        let orch = orchestrator();
        orch.set_text("so happy today");
        orch.set_text("😢😢😢");
        assert_eq!(orch.analysis().sentiment, Sentiment::Positive);

        orch.set_text("😢😢😢😢");
        assert_ne!(orch.analysis().sentiment, Sentiment::Positive);
    }

    #[test]
    fn toggling_off_clears_derived_state() {
        let orch = orchestrator();
        orch.set_text("feeling anxious");
        assert!(!orch.toggle_ai());

        let snap = orch.snapshot();
        assert!(!snap.ai_enabled);
        assert!(snap.suggestions.is_empty());
        assert_eq!(snap.analysis, AnalysisResult::default());
        assert_eq!(snap.text, "feeling anxious");

        orch.set_text("still anxious");
        assert!(orch.suggestions().is_empty());

        assert!(orch.toggle_ai());
        assert!(!orch.suggestions().is_empty());
    }

    #[test]
    fn disabling_during_input_leaves_nothing_behind() {
        for round in 0..50 {
            let orch = orchestrator();
            std::thread::scope(|scope| {
                scope.spawn(|| {
                    for i in 0..20 {
                        orch.set_text(&format!("feeling anxious about work {}", i));
                    }
                });
                scope.spawn(|| orch.set_ai_enabled(false));
            });

            let snap = orch.snapshot();
            assert!(!snap.ai_enabled, "round {round}");
            assert!(snap.suggestions.is_empty(), "round {round}");
            assert_eq!(snap.analysis, AnalysisResult::default(), "round {round}");
            assert_eq!(snap.phase, PipelinePhase::Idle, "round {round}");
        }
    }

    #[test]
    fn reset_refreshes_current_suggestions() {
        let orch = orchestrator();
        orch.set_text("feeling anxious");
        let before = orch.suggestions();
        orch.record_emoji_usage(&before[1].emoji);
        orch.set_text("feeling anxious");
        assert_ne!(orch.suggestions(), before);

        orch.reset_personalization();
        assert_eq!(orch.suggestions(), before);
        assert!(orch.frequency().is_empty());
    }

    #[tokio::test]
    async fn load_applies_patterns_and_summary() {
        let orch = orchestrator();
        let now = Local.with_ymd_and_hms(2026, 6, 11, 9, 0, 0).single().unwrap();
        let outcome = orch.load_patterns_at(evening_history(), now).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied);
        assert!(!orch.patterns().is_empty());
        assert!(orch.weekly_summary().is_some());
        assert_eq!(orch.phase(), PipelinePhase::Ready);
    }

    #[tokio::test]
    async fn old_history_has_no_summary() {
        let orch = orchestrator();
        let now = Local.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).single().unwrap();
        orch.load_patterns_at(evening_history(), now).await.unwrap();
        assert!(orch.weekly_summary().is_none());
        assert!(!orch.patterns().is_empty());
    }

    #[tokio::test]
    async fn later_load_supersedes_earlier() {
        let orch = orchestrator();
        let now = Local.with_ymd_and_hms(2026, 6, 11, 9, 0, 0).single().unwrap();

        let first = orch.load_patterns_at(evening_history(), now);
        let second = orch.load_patterns_at(vec![], now);
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), LoadOutcome::Superseded);
        assert_eq!(second.unwrap(), LoadOutcome::Applied);
        assert!(orch.patterns().is_empty());
        assert!(orch.weekly_summary().is_none());
    }

    #[tokio::test]
    async fn dropped_load_restores_phase() {
        let orch = orchestrator();
        let now = Local.with_ymd_and_hms(2026, 6, 11, 9, 0, 0).single().unwrap();

        let pending = orch.load_patterns_at(evening_history(), now);
        assert_eq!(orch.phase(), PipelinePhase::Analyzing);
        drop(pending);
        assert_eq!(orch.phase(), PipelinePhase::Idle);

        orch.load_patterns_at(evening_history(), now).await.unwrap();
        let pending = orch.load_patterns_at(evening_history(), now);
        drop(pending);
        assert_eq!(orch.phase(), PipelinePhase::Ready);
        assert!(!orch.patterns().is_empty());
    }

    #[tokio::test]
    async fn timed_out_load_does_not_stay_analyzing() {
        let orch = orchestrator();
        let history: Vec<MoodRecord> = (0..5_000)
            .map(|i| {
                let ts = Local.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).single().unwrap()
                    + chrono::Duration::minutes(i);
                MoodRecord::new("😤", "stressed about the deadline", ts)
            })
            .collect();

        let budget = Duration::from_micros(1);
        let result = crate::commands::with_timeout(budget, orch.load_patterns(history)).await;
        match result {
            Err(err) => {
                assert_eq!(err, PipelineError::Timeout(budget));
                assert_eq!(orch.phase(), PipelinePhase::Idle);
            }
            Ok(_) => assert_eq!(orch.phase(), PipelinePhase::Ready),
        }
    }

    #[tokio::test]
    async fn disabled_ai_skips_loads() {
        let mut settings = Settings::default();
        settings.ai.enabled = false;
        let orch = Orchestrator::new(&settings);
        let outcome = orch.load_patterns(evening_history()).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
        assert!(orch.patterns().is_empty());
    }

    #[test]
    fn voice_timeout_follows_settings() {
        let mut settings = Settings::default();
        let orch = Orchestrator::new(&settings);
        assert_eq!(orch.voice_timeout(), Duration::from_secs(settings.voice.timeout_secs));

        settings.voice.timeout_secs = 3;
        orch.apply_settings(&settings);
        assert_eq!(orch.voice_timeout(), Duration::from_secs(3));

        settings.voice.timeout_secs = 0;
        orch.apply_settings(&settings);
        assert_eq!(orch.voice_timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn enhance_follows_settings() {
        let orch = orchestrator();
        let text = "First. Second. Third.";
        let basic = orch.enhance(text, EnhancementMode::Summarize).await;
        assert!(!basic.enhanced);
        assert_eq!(basic.enhanced_text, "First.");

        let mut settings = Settings::default();
        settings.ai.enhanced_text = true;
        settings.ai.platform_supports_enhanced = true;
        settings.ai.simulated_latency_ms = 0;
        orch.apply_settings(&settings);
        assert!(orch.enhanced_text_available());

        let rich = orch.enhance(text, EnhancementMode::Summarize).await;
        assert!(rich.enhanced);
        assert_eq!(rich.enhanced_text, "First. Third.");
    }
}
