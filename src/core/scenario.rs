use crate::core::message::{PubSubPayload, ScenarioMessage};
use serde::{Deserialize, Serialize};

/// A user-authored set of scheduled messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub messages: Vec<ScenarioMessage>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: String::new(),
            messages: Vec::new(),
        }
    }

    /// Number of distinct columns that actually hold messages
    pub fn occupied_columns(&self) -> usize {
        let mut cols: Vec<u32> = self.messages.iter().map(|m| m.column).collect();
        cols.sort_unstable();
        cols.dedup();
        cols.len()
    }
}

/// A reusable payload template with a stable name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSample {
    pub message_id: String,
    #[serde(flatten)]
    pub payload: PubSubPayload,
}
