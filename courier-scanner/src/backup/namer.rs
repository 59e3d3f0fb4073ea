//! Deterministic, collision-resistant backup file naming.
//!
//! Two files named `report.txt` in different directories must not share a
//! backup file, so the name carries a short digest of the absolute path:
//! `<base_name>-<12 hex chars>.json`. 48 bits is plenty at this scale; the
//! digest guards against basename collisions, not adversaries.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex characters of the path digest kept in the name
const DIGEST_LEN: usize = 12;

/// Derive the backup file name for a path.
///
/// Pure function of the absolute form of `path`: the same path always maps
/// to the same name, so repeated scans overwrite their own backups.
pub fn backup_file_name(path: &Path) -> String {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let base = abs
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let digest = Sha256::digest(abs.to_string_lossy().as_bytes());
    let mut hex = String::with_capacity(DIGEST_LEN);
    for byte in digest.iter().take(DIGEST_LEN / 2) {
        hex.push_str(&format!("{byte:02x}"));
    }

    format!("{base}-{hex}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_deterministic() {
        let a = backup_file_name(Path::new("/data/report.txt"));
        let b = backup_file_name(Path::new("/data/report.txt"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_base_name_different_directories() {
        let a = backup_file_name(Path::new("/data/report.txt"));
        let b = backup_file_name(Path::new("/archive/report.txt"));
        assert_ne!(a, b);
        assert!(a.starts_with("report.txt-"));
        assert!(b.starts_with("report.txt-"));
    }

    #[test]
    fn test_name_shape() {
        let name = backup_file_name(Path::new("/data/report.txt"));
        assert!(name.ends_with(".json"));

        let digest = name
            .strip_prefix("report.txt-")
            .and_then(|rest| rest.strip_suffix(".json"))
            .unwrap();
        assert_eq!(digest.len(), 12);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
