//! Local backup copies of published records.
//!
//! Every record gets a JSON backup file named deterministically from its
//! absolute path, so re-scans overwrite instead of duplicating and the
//! backup directory can be replayed offline when the broker is down.

pub mod namer;
pub mod writer;

pub use namer::backup_file_name;
pub use writer::BackupWriter;
