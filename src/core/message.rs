use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lowest column a message can be scheduled into
pub const MIN_COLUMN: u32 = 1;

/// Highest column a message can be scheduled into
pub const MAX_COLUMN: u32 = 20;

/// A message body as posted to the publish endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubPayload {
    /// Registered type name of the message, used in error summaries
    pub class_name: String,

    /// Destination topic
    pub topic: String,

    /// Pub/Sub attributes attached to the message
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// The message body itself, opaque JSON
    pub message: serde_json::Value,
}

impl PubSubPayload {
    pub fn new(class_name: &str, topic: &str, message: serde_json::Value) -> Self {
        Self {
            class_name: class_name.to_string(),
            topic: topic.to_string(),
            attributes: HashMap::new(),
            message,
        }
    }
}

/// One scheduled message within a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioMessage {
    /// Stable identity, results are keyed by this
    pub id: String,

    /// Column 1-20 the message plays in
    pub column: u32,

    pub payload: PubSubPayload,
}

impl ScenarioMessage {
    /// Create a new message with a generated id, clamping the column into range
    pub fn new(payload: PubSubPayload, column: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            column: clamp_column(column),
            payload,
        }
    }
}

/// Clamp a column number into the valid [1, 20] range.
///
/// Producers (stores, loaders) clamp; the playback controller does not
/// validate and silently never sends a message whose column is out of range.
pub fn clamp_column(column: u32) -> u32 {
    column.clamp(MIN_COLUMN, MAX_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_column_range() {
        assert_eq!(clamp_column(0), 1);
        assert_eq!(clamp_column(1), 1);
        assert_eq!(clamp_column(7), 7);
        assert_eq!(clamp_column(20), 20);
        assert_eq!(clamp_column(99), 20);
    }

    #[test]
    fn test_payload_wire_names() {
        let payload = PubSubPayload::new("OrderCreated", "orders", serde_json::json!({"n": 1}));
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("className").is_some());
        assert!(json.get("topic").is_some());
        assert!(json.get("attributes").is_some());
    }

    #[test]
    fn test_new_message_clamps_column() {
        let payload = PubSubPayload::new("X", "t", serde_json::Value::Null);
        let msg = ScenarioMessage::new(payload, 42);
        assert_eq!(msg.column, 20);
        assert!(!msg.id.is_empty());
    }
}
