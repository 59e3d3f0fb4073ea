//! File record construction.
//!
//! One `FileRecord` is built per discovered path. Construction never fails:
//! if the stat call errors, the record carries the error text instead of
//! size/mtime so downstream stages still see every discovered file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata record for one discovered file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Base name of the file
    pub file_name: String,

    /// Absolute path, the record's identity
    pub file_path: String,

    /// File size in bytes (absent when stat failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Last modification time (absent when stat failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Wall-clock time the file was discovered, UTC
    pub discovered_at: DateTime<Utc>,

    /// Stat error text, mutually exclusive with size/mtime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileRecord {
    /// Build a record for a path. Stat failures are captured in the record's
    /// `error` field rather than returned.
    pub fn for_path(path: &Path) -> Self {
        let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let file_name = abs
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_path = abs.to_string_lossy().into_owned();
        let discovered_at = Utc::now();

        match std::fs::metadata(&abs) {
            Ok(meta) => {
                let last_modified = meta.modified().ok().map(DateTime::<Utc>::from);
                Self {
                    file_name,
                    file_path,
                    size_bytes: Some(meta.len()),
                    last_modified,
                    discovered_at,
                    error: None,
                }
            }
            Err(e) => Self {
                file_name,
                file_path,
                size_bytes: None,
                last_modified: None,
                discovered_at,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_record_for_existing_file() -> std::io::Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"twelve bytes")?;
        temp_file.flush()?;

        let record = FileRecord::for_path(temp_file.path());

        assert_eq!(record.size_bytes, Some(12));
        assert!(record.last_modified.is_some());
        assert!(record.error.is_none());
        assert!(Path::new(&record.file_path).is_absolute());
        assert_eq!(
            record.file_name,
            temp_file.path().file_name().unwrap().to_string_lossy()
        );

        Ok(())
    }

    #[test]
    fn test_record_for_missing_file_captures_error() {
        let record = FileRecord::for_path(Path::new("/nonexistent/surely/missing.txt"));

        assert_eq!(record.file_name, "missing.txt");
        assert!(record.size_bytes.is_none());
        assert!(record.last_modified.is_none());
        assert!(record.error.is_some());
    }

    #[test]
    fn test_json_round_trip() -> std::io::Result<()> {
        let temp_file = NamedTempFile::new()?;
        let record = FileRecord::for_path(temp_file.path());

        let json = serde_json::to_string(&record).unwrap();
        let decoded: FileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, decoded);

        Ok(())
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let record = FileRecord::for_path(Path::new("/nonexistent/surely/missing.txt"));
        let json = serde_json::to_string(&record).unwrap();

        assert!(!json.contains("size_bytes"));
        assert!(!json.contains("last_modified"));
        assert!(json.contains("error"));
        // UTC marker on discovered_at
        assert!(json.contains('Z'));
    }
}
