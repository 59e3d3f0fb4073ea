//! Payload decoding for consumed deliveries.
//!
//! Malformed bodies are dropped, not redelivered: the consumer acknowledges
//! every delivery and only the decode outcome decides whether it is printed
//! or logged as a warning.

use serde_json::Value;
use tracing::warn;

/// Decode a delivery body as JSON. Returns `None` (after logging) for
/// bodies that are not valid UTF-8 JSON.
pub fn decode_payload(body: &[u8]) -> Option<Value> {
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Received non-JSON message, dropping: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_record_payload() {
        let body = br#"{"file_name":"a.txt","file_path":"/data/a.txt","discovered_at":"2026-01-01T00:00:00Z"}"#;
        let value = decode_payload(body).unwrap();
        assert_eq!(value["file_name"], "a.txt");
    }

    #[test]
    fn test_decode_malformed_payload_is_none() {
        assert!(decode_payload(b"not json at all").is_none());
        assert!(decode_payload(b"{\"truncated\":").is_none());
        assert!(decode_payload(&[0xff, 0xfe, 0x00]).is_none());
    }
}
