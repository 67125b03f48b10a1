use crate::core::PubSubPayload;
use crate::sender::{MessageSender, SendOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout for the publish call
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes payloads as JSON POSTs to a configured endpoint
pub struct HttpSender {
    client: reqwest::Client,
    publish_url: String,
}

impl HttpSender {
    pub fn new(publish_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PUBLISH_TIMEOUT)
            .build()
            .context("failed to build publish client")?;

        Ok(Self {
            client,
            publish_url: publish_url.to_string(),
        })
    }

    pub fn publish_url(&self) -> &str {
        &self.publish_url
    }
}

#[async_trait]
impl MessageSender for HttpSender {
    async fn send(&self, payload: &PubSubPayload) -> SendOutcome {
        let response = match self
            .client
            .post(&self.publish_url)
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(class_name = %payload.class_name, "publish request failed: {e}");
                return SendOutcome::network_error(&e.to_string());
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        if status.is_success() {
            // Body is optional; an empty or non-JSON body is still a success
            let response_body = match response.text().await {
                Ok(text) if !text.is_empty() => serde_json::from_str(&text).ok(),
                _ => None,
            };
            debug!(class_name = %payload.class_name, status = status.as_u16(), "published");
            SendOutcome {
                ok: true,
                status: status.as_u16(),
                status_text,
                error_body: None,
                response_body,
            }
        } else {
            let error_body = response.text().await.ok().filter(|t| !t.is_empty());
            warn!(
                class_name = %payload.class_name,
                status = status.as_u16(),
                "publish rejected"
            );
            SendOutcome::failure(status.as_u16(), &status_text, error_body)
        }
    }
}
