//! Observability and Metrics
//!
//! Counters for codec activity: messages and bytes processed, unknown fields
//! skipped and failures in either direction.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Global metrics collector for codec operations
#[derive(Debug)]
pub struct CodecMetrics {
    /// Messages successfully encoded
    pub messages_encoded: AtomicU64,
    /// Messages successfully decoded
    pub messages_decoded: AtomicU64,
    /// Total bytes produced by the encoder
    pub bytes_encoded: AtomicU64,
    /// Total bytes consumed by the decoder
    pub bytes_decoded: AtomicU64,
    /// Fields skipped because their number was not in the descriptor table
    pub unknown_fields_skipped: AtomicU64,
    /// Failed encode attempts
    pub encode_errors: AtomicU64,
    /// Failed decode attempts
    pub decode_errors: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl CodecMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            messages_encoded: AtomicU64::new(0),
            messages_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            unknown_fields_skipped: AtomicU64::new(0),
            encode_errors: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an encoded message
    pub fn message_encoded(&self, byte_count: u64) {
        self.messages_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a decoded message
    pub fn message_decoded(&self, byte_count: u64) {
        self.messages_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn unknown_field_skipped(&self) {
        self.unknown_fields_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn encode_error(&self) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_encoded: self.messages_encoded.load(Ordering::Relaxed),
            messages_decoded: self.messages_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            unknown_fields_skipped: self.unknown_fields_skipped.load(Ordering::Relaxed),
            encode_errors: self.encode_errors.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            messages_encoded = snapshot.messages_encoded,
            messages_decoded = snapshot.messages_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            unknown_fields_skipped = snapshot.unknown_fields_skipped,
            encode_errors = snapshot.encode_errors,
            decode_errors = snapshot.decode_errors,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub messages_encoded: u64,
    pub messages_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub unknown_fields_skipped: u64,
    pub encode_errors: u64,
    pub decode_errors: u64,
    pub uptime_seconds: u64,
}

static METRICS: once_cell::sync::Lazy<CodecMetrics> = once_cell::sync::Lazy::new(CodecMetrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static CodecMetrics {
    &METRICS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = CodecMetrics::new();
        metrics.message_encoded(10);
        metrics.message_encoded(5);
        metrics.message_decoded(7);
        metrics.unknown_field_skipped();
        metrics.decode_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_encoded, 2);
        assert_eq!(snapshot.bytes_encoded, 15);
        assert_eq!(snapshot.messages_decoded, 1);
        assert_eq!(snapshot.bytes_decoded, 7);
        assert_eq!(snapshot.unknown_fields_skipped, 1);
        assert_eq!(snapshot.encode_errors, 0);
        assert_eq!(snapshot.decode_errors, 1);
    }

    #[test]
    fn test_global_instance_is_shared() {
        let before = global_metrics().snapshot().encode_errors;
        global_metrics().encode_error();
        assert!(global_metrics().snapshot().encode_errors > before);
    }
}
