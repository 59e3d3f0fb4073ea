//! File Courier Scanner Library
//!
//! Walks a directory tree, builds one JSON record per file, persists a local
//! backup copy of every record, and publishes each record durably to RabbitMQ.

pub mod backup;
pub mod broker;
pub mod config;
pub mod record;
pub mod retry;
pub mod scan;
pub mod shutdown;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use record::FileRecord;
pub use utils::errors::ScannerError;
pub type Result<T> = std::result::Result<T, ScannerError>;
