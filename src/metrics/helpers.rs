//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    DELIVERY_DURATION, NOTIFICATIONS_TOTAL, PREFERENCE_LOOKUPS_TOTAL, TEMPLATE_RESOLUTIONS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct NotificationMetrics;

impl NotificationMetrics {
    /// Record a terminal dispatch status for a channel
    pub fn record_outcome(channel: &str, status: &str) {
        NOTIFICATIONS_TOTAL.with_label_values(&[channel, status]).inc();
    }

    /// Record how long the transport took
    pub fn record_delivery_duration(channel: &str, elapsed: Duration) {
        DELIVERY_DURATION
            .with_label_values(&[channel])
            .observe(elapsed.as_secs_f64());
    }
}

/// Helper struct for recording template metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    pub fn record_resolution(tier: &str) {
        TEMPLATE_RESOLUTIONS_TOTAL.with_label_values(&[tier]).inc();
    }
}

/// Helper struct for recording preference metrics
pub struct PreferenceMetrics;

impl PreferenceMetrics {
    pub fn record_enabled() {
        PREFERENCE_LOOKUPS_TOTAL.with_label_values(&["enabled"]).inc();
    }

    pub fn record_disabled() {
        PREFERENCE_LOOKUPS_TOTAL.with_label_values(&["disabled"]).inc();
    }

    /// No record stored for the user
    pub fn record_missing() {
        PREFERENCE_LOOKUPS_TOTAL.with_label_values(&["missing"]).inc();
    }

    pub fn record_error() {
        PREFERENCE_LOOKUPS_TOTAL.with_label_values(&["error"]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_recorded_series() {
        NotificationMetrics::record_outcome("sms", "sent");
        TemplateMetrics::record_resolution("exact");
        PreferenceMetrics::record_missing();

        let output = encode_metrics().unwrap();
        assert!(output.contains("onelog_notifications_total"));
        assert!(output.contains("onelog_template_resolutions_total"));
        assert!(output.contains("onelog_preference_lookups_total"));
    }
}
