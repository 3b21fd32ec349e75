//! Alert log — bounded, newest-first ring buffer of alert events.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use hearth_domain::alert::Alert;

use crate::fanout::FanoutHub;

/// How many alerts are retained; the oldest is evicted past this.
pub const CAPACITY: usize = 50;

/// In-memory ring buffer of the most recent alerts.
pub struct AlertLog {
    ring: Mutex<VecDeque<Alert>>,
    fanout: Arc<FanoutHub>,
}

impl AlertLog {
    /// Create an empty log publishing to the given hub.
    #[must_use]
    pub fn new(fanout: Arc<FanoutHub>) -> Self {
        Self {
            ring: Mutex::new(VecDeque::with_capacity(CAPACITY)),
            fanout,
        }
    }

    /// Insert an alert at the head, evict past capacity, and notify every
    /// alert subscriber.
    pub fn record(&self, alert: Alert) {
        {
            let mut ring = self.ring.lock().expect("alert ring lock poisoned");
            ring.push_front(alert.clone());
            ring.truncate(CAPACITY);
        }
        tracing::info!(device_id = %alert.device_id, kind = %alert.kind, "alert recorded");
        self.fanout.publish_alert(alert);
    }

    /// Copy of the buffer, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Alert> {
        self.ring
            .lock()
            .expect("alert ring lock poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_domain::time::now;

    fn alert(message: &str) -> Alert {
        Alert {
            device_id: "motion-sensor-1".to_string(),
            kind: "alert".to_string(),
            message: message.to_string(),
            timestamp: now(),
        }
    }

    fn log() -> AlertLog {
        AlertLog::new(Arc::new(FanoutHub::new(64)))
    }

    #[test]
    fn should_return_alerts_newest_first() {
        let log = log();
        log.record(alert("first"));
        log.record(alert("second"));
        log.record(alert("third"));

        let snapshot = log.snapshot();
        let messages: Vec<&str> = snapshot.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, ["third", "second", "first"]);
    }

    #[test]
    fn should_keep_only_the_fifty_most_recent() {
        let log = log();
        for i in 0..60 {
            log.record(alert(&format!("alert-{i}")));
        }

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), CAPACITY);
        assert_eq!(snapshot[0].message, "alert-59");
        assert_eq!(snapshot[CAPACITY - 1].message, "alert-10");
    }

    #[tokio::test]
    async fn should_publish_recorded_alert_to_fanout() {
        let fanout = Arc::new(FanoutHub::new(16));
        let log = AlertLog::new(Arc::clone(&fanout));
        let mut rx = fanout.subscribe_alerts();

        log.record(alert("leak detected"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.message, "leak detected");
    }

    #[test]
    fn should_start_empty() {
        assert!(log().snapshot().is_empty());
    }
}
