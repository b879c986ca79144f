use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::{NotewatchError, Result};
use crate::notify::{NotificationPayload, Notifier};

#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    timeout: Duration,
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookNotifier {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, webhook_url: &str, payload: &NotificationPayload) -> Result<()> {
        tracing::info!("POST {} ({} {})", webhook_url, payload.source, payload.version);

        let response = self
            .client
            .post(webhook_url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Webhook responded {}", status);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotewatchError::Notify(format!("{}: {}", status.as_u16(), body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> NotificationPayload {
        NotificationPayload {
            source: "Claude Code".into(),
            version: "1.2.3".into(),
            changes: "## 1.2.3\n- fix".into(),
        }
    }

    #[tokio::test]
    async fn test_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({
                "source": "Claude Code",
                "version": "1.2.3",
                "changes": "## 1.2.3\n- fix"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new();
        notifier
            .notify(&format!("{}/hook", server.uri()), &payload())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_payload"))
            .mount(&server)
            .await;

        let err = WebhookNotifier::new()
            .with_timeout(5)
            .notify(&format!("{}/hook", server.uri()), &payload())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Notification failed: 400: invalid_payload");
    }
}
