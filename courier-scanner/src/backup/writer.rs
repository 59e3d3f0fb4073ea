//! Persisting records to the local backup directory.

use crate::backup::namer::backup_file_name;
use crate::record::FileRecord;
use crate::utils::errors::{Result, ScannerError};
use std::path::{Path, PathBuf};

/// Writes one pretty-printed JSON backup file per record
#[derive(Debug, Clone)]
pub struct BackupWriter {
    dir: PathBuf,
}

impl BackupWriter {
    /// Create a writer rooted at `dir`, creating the directory if absent
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| ScannerError::BackupWrite(format!("{}: {}", dir.display(), e)))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Serialize `record` and write it to its derived name, overwriting any
    /// previous backup of the same path. Returns the file written.
    pub fn write(&self, record: &FileRecord) -> Result<PathBuf> {
        let name = backup_file_name(Path::new(&record.file_path));
        let target = self.dir.join(name);

        let json = serde_json::to_vec_pretty(record)?;
        std::fs::write(&target, json)
            .map_err(|e| ScannerError::BackupWrite(format!("{}: {}", target.display(), e)))?;

        Ok(target)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
