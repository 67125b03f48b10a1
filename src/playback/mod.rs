pub mod cancel;
pub mod controller;

pub use controller::PlaybackController;

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    Error,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Highest column the run will attempt
    pub max_column: u32,
    /// Fixed wait between completed columns
    pub inter_column_delay: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_column: crate::core::MAX_COLUMN,
            inter_column_delay: Duration::from_millis(750),
        }
    }
}

/// Outcome of a single message within a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MessageResult {
    #[serde(rename = "success")]
    Success { response_body: Option<serde_json::Value> },
    #[serde(rename = "error")]
    Error {
        status_code: Option<u16>,
        status_text: Option<String>,
        error_body: Option<String>,
    },
}

impl MessageResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MessageResult::Success { .. })
    }
}

/// Externally observable snapshot of a playback run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// 0 = not started, otherwise the column currently or last attempted
    pub current_column: u32,
    /// Last column whose messages all succeeded
    pub completed_columns: u32,
    /// One human-readable line per failed message, non-empty only on Error
    pub errors: Vec<String>,
    /// Per-message outcomes keyed by message id
    pub message_results: HashMap<String, MessageResult>,
}
