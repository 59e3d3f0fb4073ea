//! Custom error types for the scanner.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Broker error: {0}")]
    Broker(#[from] lapin::Error),

    #[error("Connection attempts exhausted after {attempts} tries")]
    ConnectionExhausted { attempts: u32 },

    #[error("Publish failed after {attempts} attempts")]
    PublishFailed { attempts: u32 },

    #[error("Broker rejected publish (nack)")]
    PublishNacked,

    #[error("Backup write error: {0}")]
    BackupWrite(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, ScannerError>;
