//! # Utility Modules
//!
//! Supporting utilities used throughout the codec.
//!
//! ## Components
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe observability counters

pub mod logging;
pub mod metrics;

pub use metrics::{global_metrics, CodecMetrics, MetricsSnapshot};
