//! Courier Consumer Library
//!
//! The passive side of the pipeline: decoding delivered payloads and reading
//! the local backup directory when the broker is unavailable.

pub mod consume;
pub mod replay;
