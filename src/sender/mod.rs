pub mod http;
pub mod mock;

pub use http::HttpSender;
pub use mock::MockSender;

use crate::core::PubSubPayload;
use async_trait::async_trait;

/// Result of one publish attempt.
///
/// Transport failures are data, not errors: a network-level failure comes
/// back as `ok = false` with `status = 0`, so the playback controller can
/// treat every outcome uniformly.
#[derive(Debug, Clone, Default)]
pub struct SendOutcome {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub error_body: Option<String>,
    pub response_body: Option<serde_json::Value>,
}

impl SendOutcome {
    pub fn success(response_body: Option<serde_json::Value>) -> Self {
        Self {
            ok: true,
            status: 200,
            status_text: "OK".to_string(),
            error_body: None,
            response_body,
        }
    }

    pub fn failure(status: u16, status_text: &str, error_body: Option<String>) -> Self {
        Self {
            ok: false,
            status,
            status_text: status_text.to_string(),
            error_body,
            response_body: None,
        }
    }

    /// Network-level failure that never produced an HTTP status
    pub fn network_error(message: &str) -> Self {
        Self::failure(0, message, None)
    }
}

/// Trait for publish endpoint implementations
///
/// Implementations must not return transport failures as panics or task
/// errors; everything the endpoint can do to us is encoded in the outcome.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Publish a single payload and report how it went
    async fn send(&self, payload: &PubSubPayload) -> SendOutcome;
}
