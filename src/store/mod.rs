// ─── Mood store ───
//
// In-memory storage collaborator. Records are kept in timestamp order and
// the pipeline only ever sees cloned snapshots.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{PipelineError, PipelineResult};
use crate::models::{MoodRecord, StoreStats};

const EXPORT_VERSION: &str = "1.0.0";

/// Read side used by the pipeline and the command layer.
pub trait MoodSource: Send + Sync {
    /// Chronological copy of every record.
    fn snapshot(&self) -> Vec<MoodRecord>;
}

#[derive(Debug, Serialize, Deserialize)]
struct MoodExport {
    version: String,
    exported_at: DateTime<Local>,
    moods: Vec<MoodRecord>,
}

#[derive(Debug, Default)]
pub struct MoodStore {
    records: RwLock<Vec<MoodRecord>>,
}

impl MoodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut records: Vec<MoodRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn add(&self, emoji: &str, label: &str, timestamp: DateTime<Local>) -> PipelineResult<MoodRecord> {
        let emoji = emoji.trim();
        let label = label.trim();
        if emoji.is_empty() {
            return Err(PipelineError::InvalidInput("emoji is empty".to_string()));
        }
        if label.is_empty() {
            return Err(PipelineError::InvalidInput("mood text is empty".to_string()));
        }

        let record = MoodRecord::new(emoji, label, timestamp);
        let mut records = self.records.write();
        let at = records.partition_point(|r| r.timestamp <= timestamp);
        records.insert(at, record.clone());
        log::debug!("[MoodStore] Added {} {} ({} total)", record.emoji, record.id, records.len());
        Ok(record)
    }

    pub fn get(&self, id: Uuid) -> Option<MoodRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn set_favorite(&self, id: Uuid, favorite: bool) -> PipelineResult<MoodRecord> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PipelineError::InvalidInput(format!("no mood with id {}", id)))?;
        record.is_favorite = favorite;
        Ok(record.clone())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != id);
        records.len() != before
    }

    pub fn favorites(&self) -> Vec<MoodRecord> {
        self.records.read().iter().filter(|r| r.is_favorite).cloned().collect()
    }

    /// Records from the last `days` days up to `now`.
    pub fn recent(&self, days: i64, now: DateTime<Local>) -> Vec<MoodRecord> {
        let cutoff = now - Duration::days(days);
        self.records
            .read()
            .iter()
            .filter(|r| r.timestamp >= cutoff && r.timestamp <= now)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        let records = self.records.read();
        StoreStats {
            moods_count: records.len(),
            favorites_count: records.iter().filter(|r| r.is_favorite).count(),
            oldest_mood: records.first().map(|r| r.timestamp),
            newest_mood: records.last().map(|r| r.timestamp),
        }
    }

    // ─── Export / import ───

    pub fn export_json(&self) -> Result<String> {
        let export = MoodExport {
            version: EXPORT_VERSION.to_string(),
            exported_at: Local::now(),
            moods: self.snapshot(),
        };
        serde_json::to_string_pretty(&export).context("failed to serialize mood export")
    }

    /// Merges an export into the store, skipping ids already present.
    /// Returns how many records were added.
    pub fn import_json(&self, json: &str) -> Result<usize> {
        let export: MoodExport = serde_json::from_str(json).context("failed to parse mood export")?;
        if export.version != EXPORT_VERSION {
            anyhow::bail!("unsupported export version {}", export.version);
        }

        let mut records = self.records.write();
        let mut added = 0;
        for mood in export.moods {
            if records.iter().any(|r| r.id == mood.id) {
                continue;
            }
            records.push(mood);
            added += 1;
        }
        records.sort_by_key(|r| r.timestamp);
        log::info!("[MoodStore] Imported {} mood(s)", added);
        Ok(added)
    }
}

impl MoodSource for MoodStore {
    fn snapshot(&self) -> Vec<MoodRecord> {
        self.records.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, day, hour, 0, 0).single().unwrap()
    }

    #[test]
    fn rejects_empty_text() {
        let store = MoodStore::new();
        let err = store.add("😊", "   ", at(1, 9)).unwrap_err();
        assert_eq!(err.code(), "MOOD-1001");
        assert!(store.add("", "fine", at(1, 9)).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn keeps_records_in_time_order() {
        let store = MoodStore::new();
        store.add("😴", "tired", at(3, 9)).unwrap();
        store.add("😊", "happy", at(1, 9)).unwrap();
        store.add("😤", "stressed", at(2, 9)).unwrap();

        let labels: Vec<String> = store.snapshot().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["happy", "stressed", "tired"]);
    }

    #[test]
    fn favorites_and_stats() {
        let store = MoodStore::new();
        let first = store.add("😊", "happy", at(1, 9)).unwrap();
        store.add("😢", "sad", at(5, 9)).unwrap();
        store.set_favorite(first.id, true).unwrap();

        assert_eq!(store.favorites().len(), 1);
        let stats = store.stats();
        assert_eq!(stats.moods_count, 2);
        assert_eq!(stats.favorites_count, 1);
        assert_eq!(stats.oldest_mood, Some(at(1, 9)));
        assert_eq!(stats.newest_mood, Some(at(5, 9)));

        assert!(store.set_favorite(Uuid::new_v4(), true).is_err());
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let store = MoodStore::new();
        let mood = store.add("😊", "happy", at(1, 9)).unwrap();
        assert!(store.remove(mood.id));
        assert!(!store.remove(mood.id));
    }

    #[test]
    fn recent_uses_day_window() {
        let store = MoodStore::new();
        store.add("😊", "old", at(1, 9)).unwrap();
        store.add("😊", "new", at(9, 9)).unwrap();
        let recent = store.recent(7, at(10, 9));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].label, "new");
    }

    #[test]
    fn export_then_import_skips_duplicates() {
        let source = MoodStore::new();
        source.add("😊", "happy", at(2, 9)).unwrap();
        source.add("😢", "sad", at(1, 9)).unwrap();
        let json = source.export_json().unwrap();

        let target = MoodStore::new();
        target.add("😴", "tired", at(3, 9)).unwrap();
        assert_eq!(target.import_json(&json).unwrap(), 2);
        assert_eq!(target.import_json(&json).unwrap(), 0);

        let labels: Vec<String> = target.snapshot().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["sad", "happy", "tired"]);
    }

    #[test]
    fn import_rejects_bad_payloads() {
        let store = MoodStore::new();
        assert!(store.import_json("not json").is_err());
        let wrong_version = r#"{"version":"0.1","exported_at":"2026-06-01T09:00:00+00:00","moods":[]}"#;
        assert!(store.import_json(wrong_version).is_err());
    }
}
