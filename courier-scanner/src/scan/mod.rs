//! Scan orchestration.
//!
//! Walks the tree lazily, and for each matched file drives record building,
//! local backup, and delivery through a [`RecordSink`]. Backup and delivery
//! failures are isolated per file: they are logged and counted, never abort
//! the scan. Only connection establishment (done by the caller before the
//! scanner is constructed) is fatal.

pub mod filter;

pub use filter::ExtFilter;

use crate::backup::BackupWriter;
use crate::record::FileRecord;
use crate::utils::errors::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Destination for built records. The broker publisher is the production
/// implementation; tests substitute collecting or failing sinks.
#[allow(async_fn_in_trait)]
pub trait RecordSink {
    async fn deliver(&mut self, record: &FileRecord) -> Result<()>;
}

/// Run-scoped counters returned by [`Scanner::run`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Files that passed the extension filter
    pub files_matched: usize,

    /// Records the sink accepted
    pub files_sent: usize,

    /// Backup writes that failed (non-fatal)
    pub backup_failures: usize,

    /// Deliveries that failed after retries (non-fatal)
    pub publish_failures: usize,

    /// True when the scan stopped early on cancellation
    pub interrupted: bool,
}

/// Scan configuration and per-run state
pub struct Scanner {
    backup: BackupWriter,
    filter: ExtFilter,
    follow_links: bool,
    show_progress: bool,
    cancel: CancellationToken,
}

impl Scanner {
    pub fn new(
        backup: BackupWriter,
        filter: ExtFilter,
        follow_links: bool,
        show_progress: bool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            backup,
            filter,
            follow_links,
            show_progress,
            cancel,
        }
    }

    /// Walk `root` and push every matched file's record through `sink`.
    ///
    /// The walk is lazy: no file list is ever materialized. Cancellation is
    /// observed between files, so an in-flight backup/delivery always
    /// completes before the loop stops.
    pub async fn run<S: RecordSink>(&self, root: &Path, sink: &mut S) -> Result<ScanReport> {
        let mut report = ScanReport::default();
        let progress = self.show_progress.then(spinner);

        info!("Scanning {} (backup dir: {})", root.display(), self.backup.dir().display());

        for entry in WalkDir::new(root).follow_links(self.follow_links) {
            if self.cancel.is_cancelled() {
                info!("Interrupt received, stopping enumeration");
                report.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            if !self.filter.matches(entry.path()) {
                continue;
            }

            report.files_matched += 1;
            let record = FileRecord::for_path(entry.path());

            // Backup is best-effort; a missing backup never blocks publishing
            if let Err(e) = self.backup.write(&record) {
                warn!("Backup failed for {}: {}", record.file_path, e);
                report.backup_failures += 1;
            }

            match sink.deliver(&record).await {
                Ok(()) => report.files_sent += 1,
                Err(e) => {
                    warn!("Delivery failed for {}: {}", record.file_path, e);
                    report.publish_failures += 1;
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }

        Ok(report)
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos} files published ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::ScannerError;
    use std::fs;
    use tempfile::TempDir;

    /// Collects every delivered record
    #[derive(Default)]
    struct MemorySink {
        records: Vec<FileRecord>,
    }

    impl RecordSink for MemorySink {
        async fn deliver(&mut self, record: &FileRecord) -> Result<()> {
            self.records.push(record.clone());
            Ok(())
        }
    }

    /// Fails delivery for one specific file name
    struct FlakySink {
        fail_for: String,
        delivered: Vec<String>,
    }

    impl RecordSink for FlakySink {
        async fn deliver(&mut self, record: &FileRecord) -> Result<()> {
            if record.file_name == self.fail_for {
                return Err(ScannerError::PublishFailed { attempts: 3 });
            }
            self.delivered.push(record.file_name.clone());
            Ok(())
        }
    }

    fn scanner(backup_dir: &Path, filter: ExtFilter) -> Scanner {
        Scanner::new(
            BackupWriter::new(backup_dir).unwrap(),
            filter,
            false,
            false,
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_filtered_scan_backs_up_and_delivers_matches_only() {
        let tree = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();

        fs::write(tree.path().join("a.txt"), b"a").unwrap();
        fs::write(tree.path().join("b.TXT"), b"b").unwrap();
        fs::create_dir(tree.path().join("sub")).unwrap();
        fs::write(tree.path().join("sub/c.txt"), b"c").unwrap();
        fs::write(tree.path().join("d.csv"), b"d").unwrap();
        fs::write(tree.path().join("e.log"), b"e").unwrap();

        let scanner = scanner(backups.path(), ExtFilter::parse(".txt"));
        let mut sink = MemorySink::default();
        let report = scanner.run(tree.path(), &mut sink).await.unwrap();

        assert_eq!(report.files_matched, 3);
        assert_eq!(report.files_sent, 3);
        assert_eq!(report.backup_failures, 0);
        assert_eq!(report.publish_failures, 0);
        assert!(!report.interrupted);
        assert_eq!(sink.records.len(), 3);

        let backup_count = fs::read_dir(backups.path()).unwrap().count();
        assert_eq!(backup_count, 3);
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_backup_and_is_not_counted_sent() {
        let tree = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();

        fs::write(tree.path().join("a.txt"), b"a").unwrap();
        fs::write(tree.path().join("b.txt"), b"b").unwrap();
        fs::write(tree.path().join("c.txt"), b"c").unwrap();

        let scanner = scanner(backups.path(), ExtFilter::any());
        let mut sink = FlakySink {
            fail_for: "b.txt".to_string(),
            delivered: Vec::new(),
        };
        let report = scanner.run(tree.path(), &mut sink).await.unwrap();

        assert_eq!(report.files_matched, 3);
        assert_eq!(report.files_sent, 2);
        assert_eq!(report.publish_failures, 1);
        assert!(!sink.delivered.contains(&"b.txt".to_string()));

        // The failed file's backup is still on disk as the record of intent
        let backup_count = fs::read_dir(backups.path()).unwrap().count();
        assert_eq!(backup_count, 3);
    }

    #[tokio::test]
    async fn test_cancelled_scan_stops_before_processing() {
        let tree = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();
        fs::write(tree.path().join("a.txt"), b"a").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let scanner = Scanner::new(
            BackupWriter::new(backups.path()).unwrap(),
            ExtFilter::any(),
            false,
            false,
            cancel,
        );

        let mut sink = MemorySink::default();
        let report = scanner.run(tree.path(), &mut sink).await.unwrap();

        assert!(report.interrupted);
        assert_eq!(report.files_sent, 0);
        assert!(sink.records.is_empty());
    }

    #[tokio::test]
    async fn test_stat_races_still_produce_records() {
        // A file deleted between discovery and stat must still yield a
        // record (with the error captured), not be dropped.
        let record = FileRecord::for_path(Path::new("/nonexistent/gone.txt"));
        let backups = TempDir::new().unwrap();
        let writer = BackupWriter::new(backups.path()).unwrap();

        assert!(record.error.is_some());
        writer.write(&record).unwrap();
        assert_eq!(fs::read_dir(backups.path()).unwrap().count(), 1);
    }
}
