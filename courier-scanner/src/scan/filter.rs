//! Case-insensitive extension filtering.

use std::path::Path;

/// Set of file extensions a scan is limited to. An empty filter matches
/// every file. Entries are normalized on construction: lower-cased and
/// given a leading `.` if missing, so `txt`, `.txt` and `.TXT` are the
/// same filter.
#[derive(Debug, Clone, Default)]
pub struct ExtFilter {
    exts: Vec<String>,
}

impl ExtFilter {
    /// Parse a comma-separated list, e.g. `.txt,csv,.LOG`
    pub fn parse(list: &str) -> Self {
        let exts = list
            .split(',')
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(normalize)
            .collect();
        Self { exts }
    }

    /// Filter matching everything
    pub fn any() -> Self {
        Self::default()
    }

    /// Does `path` pass the filter? Files without an extension only match
    /// the empty filter.
    pub fn matches(&self, path: &Path) -> bool {
        if self.exts.is_empty() {
            return true;
        }

        match path.extension() {
            Some(ext) => {
                let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
                self.exts.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }
}

fn normalize(entry: &str) -> String {
    let lower = entry.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
