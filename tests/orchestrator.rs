
use chrono::{DateTime, Local, TimeZone};
use moodflow::commands::{insights, mood, settings};
use moodflow::models::{CreateMoodRequest, EnhancementMode, Sentiment, Settings, Tone};
use moodflow::services::{LoadOutcome, PipelinePhase};
use moodflow::{MoodSource, MoodStore, Orchestrator, PipelineError};

fn at(day: u32, hour: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 6, day, hour, 0, 0).single().unwrap()
}

fn log(store: &MoodStore, orch: &Orchestrator, label: &str, ts: DateTime<Local>) {
    mood::log_mood(
        store,
        orch,
        CreateMoodRequest {
            emoji: None,
            label: label.to_string(),
            timestamp: Some(ts),
        },
    )
    .unwrap();
}

#[tokio::test]
async fn logged_moods_feed_patterns() {
    let store = MoodStore::new();
    let orch = Orchestrator::new(&Settings::default());
    for day in 1..=10 {
        let label = if day <= 8 { "sad and lonely" } else { "fine" };
        log(&store, &orch, label, at(day, 20));
    }

    let outcome = orch.load_patterns_at(store.snapshot(), at(11, 9)).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Applied);

    let snap = orch.snapshot();
    assert_eq!(snap.phase, PipelinePhase::Ready);
    assert!(snap.patterns.iter().any(|p| p.description.contains("evening")));
    let summary = snap.weekly_summary.expect("recent records give a summary");
    assert_eq!(summary.dominant_sentiment, Sentiment::Negative);
}

#[tokio::test]
async fn concurrent_loads_keep_only_the_latest() {
    let orch = Orchestrator::new(&Settings::default());
    let busy: Vec<_> = (1..=10)
        .map(|day| moodflow::models::MoodRecord::new("😢", "sad", at(day, 20)))
        .collect();

    let stale = orch.load_patterns_at(busy.clone(), at(11, 9));
    let fresh = orch.load_patterns_at(busy[..2].to_vec(), at(11, 9));
    let (stale, fresh) = tokio::join!(stale, fresh);

    assert_eq!(stale.unwrap(), LoadOutcome::Superseded);
    assert_eq!(fresh.unwrap(), LoadOutcome::Applied);
    assert!(orch.patterns().is_empty());
}

#[tokio::test]
async fn turning_ai_off_mid_load_discards_result() {
    let orch = Orchestrator::new(&Settings::default());
    let history: Vec<_> = (1..=10)
        .map(|day| moodflow::models::MoodRecord::new("😢", "sad", at(day, 20)))
        .collect();

    let load = orch.load_patterns_at(history, at(11, 9));
    assert!(!orch.toggle_ai());
    assert_eq!(load.await.unwrap(), LoadOutcome::Superseded);
    assert!(orch.patterns().is_empty());
    assert!(orch.weekly_summary().is_none());
}

#[tokio::test]
async fn voice_commands_describe_history() {
    let store = MoodStore::new();
    let orch = Orchestrator::new(&Settings::default());

    let err = insights::describe_patterns(&orch, &store).await.unwrap_err();
    assert_eq!(err.code(), "PAT-1001");

    for day in 14..=20 {
        log(&store, &orch, "happy and grateful", at(day, 10));
    }
    let week = insights::describe_week(&store, at(20, 20));
    assert!(week.starts_with("You logged 7 moods this week"), "{week}");
    assert!(mood::find_moods(&store, Sentiment::Positive).starts_with("Found 7 happy moods"));
}

#[tokio::test]
async fn enhanced_text_follows_settings() {
    let dir = tempfile::tempdir().unwrap();
    let orch = Orchestrator::new(&Settings::default());

    let basic = orch
        .enhance("a terrible day", EnhancementMode::AdjustTone(Tone::Positive))
        .await;
    assert!(!basic.enhanced);
    assert_eq!(basic.enhanced_text, "a terrible day");

    let mut updated = settings::get_settings(dir.path()).unwrap();
    updated.ai.enhanced_text = true;
    updated.ai.platform_supports_enhanced = true;
    updated.ai.simulated_latency_ms = 1;
    settings::update_settings(dir.path(), &orch, updated).unwrap();

    let rich = orch
        .enhance("a terrible day", EnhancementMode::AdjustTone(Tone::Positive))
        .await;
    assert!(rich.enhanced);
    assert_eq!(rich.enhanced_text, "a tough day");
}

#[test]
fn log_mood_rejects_blank_text() {
    let store = MoodStore::new();
    let orch = Orchestrator::new(&Settings::default());
    let err = mood::log_mood(
        &store,
        &orch,
        CreateMoodRequest {
            emoji: Some("😊".to_string()),
            label: "\n ".to_string(),
            timestamp: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
}

#[test]
fn init_builds_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (settings, orch) = moodflow::init(dir.path()).unwrap();
    assert_eq!(orch.ai_enabled(), settings.ai.enabled);
    assert_eq!(orch.phase(), PipelinePhase::Idle);
}
