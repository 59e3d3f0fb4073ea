//! Utility modules for the scanner.

pub mod errors;
pub mod logger;

pub use errors::{Result, ScannerError};
