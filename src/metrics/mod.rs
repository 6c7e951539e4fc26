//! Prometheus metrics for the notification service.
//!
//! - Dispatch outcomes per channel and status
//! - Delivery latency per channel
//! - Template fallback tier usage
//! - Preference lookups

mod helpers;

pub use helpers::{encode_metrics, NotificationMetrics, PreferenceMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "onelog";

lazy_static! {
    // ============================================================================
    // Dispatch Metrics
    // ============================================================================

    /// Notifications processed, by channel and terminal status
    pub static ref NOTIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_notifications_total", METRIC_PREFIX),
        "Total notifications processed by the dispatcher",
        &["channel", "status"]
    ).unwrap();

    /// Time spent inside the delivery transport
    pub static ref DELIVERY_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_delivery_duration_seconds", METRIC_PREFIX),
        "Delivery transport latency in seconds",
        &["channel"],
        vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Template resolutions by fallback tier
    pub static ref TEMPLATE_RESOLUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_resolutions_total", METRIC_PREFIX),
        "Template resolutions by fallback tier",
        &["tier"]
    ).unwrap();

    // ============================================================================
    // Preference Metrics
    // ============================================================================

    /// Preference lookups by result (enabled, disabled, missing, error)
    pub static ref PREFERENCE_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_preference_lookups_total", METRIC_PREFIX),
        "Preference gate decisions by result",
        &["result"]
    ).unwrap();
}
