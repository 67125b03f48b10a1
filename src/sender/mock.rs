use crate::core::PubSubPayload;
use crate::sender::{MessageSender, SendOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock sender for testing without a publish endpoint
///
/// Sends succeed by default. Individual payloads can be scripted to fail or
/// to take a fixed amount of time, keyed by their class name, and every
/// dispatched payload is logged for verification.
#[derive(Default)]
pub struct MockSender {
    outcomes: Mutex<HashMap<String, SendOutcome>>,
    latencies: Mutex<HashMap<String, Duration>>,
    sent: Mutex<Vec<PubSubPayload>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome returned for a given class name
    pub fn script_outcome(&self, class_name: &str, outcome: SendOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(class_name.to_string(), outcome);
    }

    /// Make sends of the given class name fail with an HTTP error
    pub fn fail_class(&self, class_name: &str, status: u16) {
        self.script_outcome(
            class_name,
            SendOutcome::failure(status, "Internal Server Error", Some("boom".to_string())),
        );
    }

    /// Delay sends of the given class name by a fixed duration
    pub fn set_latency(&self, class_name: &str, latency: Duration) {
        self.latencies
            .lock()
            .unwrap()
            .insert(class_name.to_string(), latency);
    }

    /// All payloads dispatched so far, in completion-recording order
    pub fn sent_payloads(&self) -> Vec<PubSubPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageSender for MockSender {
    async fn send(&self, payload: &PubSubPayload) -> SendOutcome {
        let latency = self
            .latencies
            .lock()
            .unwrap()
            .get(&payload.class_name)
            .copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.sent.lock().unwrap().push(payload.clone());

        self.outcomes
            .lock()
            .unwrap()
            .get(&payload.class_name)
            .cloned()
            .unwrap_or_else(|| SendOutcome::success(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_is_success() {
        let sender = MockSender::new();
        let payload = PubSubPayload::new("A", "t", serde_json::Value::Null);
        let outcome = sender.send(&payload).await;
        assert!(outcome.ok);
        assert_eq!(sender.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let sender = MockSender::new();
        sender.fail_class("B", 500);
        let payload = PubSubPayload::new("B", "t", serde_json::Value::Null);
        let outcome = sender.send(&payload).await;
        assert!(!outcome.ok);
        assert_eq!(outcome.status, 500);
        assert_eq!(outcome.error_body.as_deref(), Some("boom"));
    }
}
