//! Alert — an immutable high-priority event reported on the alert topic.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A single alert. Lives only in the bounded in-memory ring buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Device that raised the alert, `"unknown"` if the payload omitted it.
    pub device_id: String,
    /// Alert category, `"alert"` if the payload omitted it.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// When the alert happened, falling back to receipt time.
    pub timestamp: Timestamp,
}

impl Alert {
    /// Decode an alert from a raw bus payload.
    ///
    /// Returns `None` for payloads that are not a JSON object (dropped
    /// silently upstream). Missing optional fields get defaults; an
    /// unparsable timestamp falls back to `received_at`.
    #[must_use]
    pub fn from_payload(payload: &[u8], received_at: Timestamp) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(payload).ok()?;
        let map = value.as_object()?;

        let field = |key: &str, default: &str| {
            map.get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or(default)
                .to_string()
        };

        let timestamp = map
            .get("timestamp")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map_or(received_at, |dt| dt.to_utc());

        Some(Self {
            device_id: field("deviceId", "unknown"),
            kind: field("type", "alert"),
            message: field("message", "Alert"),
            timestamp,
        })
    }
}
