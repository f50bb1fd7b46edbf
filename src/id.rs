//! ID generation utilities for Outreach
//!
//! Provides run and tool call identifiers.

use sha2::{Digest, Sha256};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a run ID for one pipeline invocation
///
/// Format: `{timestamp_ms}-{hash8}`
/// Example: `1738300800123-a1b2c3d4`
///
/// The hash covers the timestamp, the brief and a per-process counter, so two
/// runs started in the same millisecond still get distinct IDs.
pub fn generate_run_id(brief: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = now_ms();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_le_bytes());
    hasher.update(seq.to_le_bytes());
    hasher.update(brief.as_bytes());
    let digest = hasher.finalize();

    format!("{}-{}", timestamp, hex::encode(&digest[..4]))
}

/// Generate a tool call ID within a run
///
/// Format: `call-{run_suffix}-{index:02}`
pub fn generate_call_id(run_id: &str, index: usize) -> String {
    let suffix = run_id.rsplit('-').next().unwrap_or(run_id);
    format!("call-{}-{:02}", suffix, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_returns_reasonable_timestamp() {
        let ts = now_ms();
        assert!(ts > 1577836800000); // 2020-01-01
        assert!(ts < 4102444800000); // 2100-01-01
    }

    #[test]
    fn test_generate_run_id_format() {
        let id = generate_run_id("Dear CEO");
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_run_id_unique_for_same_brief() {
        let a = generate_run_id("same brief");
        let b = generate_run_id("same brief");
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_call_id() {
        assert_eq!(generate_call_id("1738300800123-a1b2c3d4", 3), "call-a1b2c3d4-03");
        assert_eq!(generate_call_id("plain", 0), "call-plain-00");
    }
}
