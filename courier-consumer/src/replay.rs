//! Offline replay of locally backed-up records.
//!
//! Reads every `*.json` file in the backup directory in lexical filename
//! order. Files that fail to read or parse are logged and skipped; a bad
//! backup never stops the replay.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One successfully loaded backup file
#[derive(Debug, Clone)]
pub struct ReplayEntry {
    pub path: PathBuf,
    pub record: Value,
}

/// Load all parseable `*.json` backups under `dir`, lexically ordered by
/// file name. Unreadable or invalid files are skipped with a warning.
pub fn load_backups(dir: &Path) -> std::io::Result<Vec<ReplayEntry>> {
    let mut names: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    names.sort();

    let mut entries = Vec::with_capacity(names.len());
    for path in names {
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        match serde_json::from_slice(&content) {
            Ok(record) => entries.push(ReplayEntry { path, record }),
            Err(e) => warn!("Skipping invalid JSON file {}: {}", path.display(), e),
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_backups_load_in_lexical_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), r#"{"n":2}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"n":1}"#).unwrap();
        fs::write(dir.path().join("c.json"), r#"{"n":3}"#).unwrap();

        let entries = load_backups(dir.path()).unwrap();
        let order: Vec<i64> = entries
            .iter()
            .map(|e| e.record["n"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_and_non_json_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.json"), r#"{"ok":true}"#).unwrap();
        fs::write(dir.path().join("broken.json"), "{oops").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let entries = load_backups(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.ends_with("good.json"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(load_backups(Path::new("/nonexistent/backup_json")).is_err());
    }
}
