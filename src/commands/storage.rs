use std::path::Path;

use chrono::Local;

use crate::models::StoreStats;
use crate::store::MoodStore;

pub fn get_storage_stats(store: &MoodStore) -> StoreStats {
    store.stats()
}

/// Writes every mood to `data_dir/exports` and returns the file path.
pub fn export_data(store: &MoodStore, data_dir: &Path) -> Result<String, String> {
    let json = store.export_json().map_err(|e| format!("{:#}", e))?;
    let export_dir = data_dir.join("exports");
    std::fs::create_dir_all(&export_dir).map_err(|e| e.to_string())?;

    let export_path = export_dir.join(format!(
        "moodflow_export_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    std::fs::write(&export_path, json).map_err(|e| e.to_string())?;
    log::info!("[Storage] Exported {} mood(s) to {}", store.len(), export_path.display());

    Ok(export_path.to_string_lossy().to_string())
}

pub fn import_data(store: &MoodStore, path: &Path) -> Result<usize, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    store.import_json(&content).map_err(|e| format!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn export_file_imports_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let store = MoodStore::new();
        let ts = Local.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).single().unwrap();
        store.add("😊", "happy", ts).unwrap();

        let path = export_data(&store, dir.path()).unwrap();
        let copy = MoodStore::new();
        assert_eq!(import_data(&copy, Path::new(&path)).unwrap(), 1);
        assert_eq!(get_storage_stats(&copy).moods_count, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(import_data(&MoodStore::new(), &dir.path().join("nope.json")).is_err());
    }
}
