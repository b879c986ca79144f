pub mod webhook;

use async_trait::async_trait;
use serde::Serialize;

use crate::app::Result;
use crate::domain::{CheckOutcome, CheckResult};

pub use webhook::WebhookNotifier;

/// Body delivered for each detected change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub source: String,
    pub version: String,
    pub changes: String,
}

impl NotificationPayload {
    pub fn from_result(result: &CheckResult) -> Option<Self> {
        match &result.outcome {
            CheckOutcome::Changed {
                version, changes, ..
            } => Some(Self {
                source: result.source.name.clone(),
                version: version.clone(),
                changes: changes.clone(),
            }),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Notifier {
    async fn notify(&self, webhook_url: &str, payload: &NotificationPayload) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParserKind, SourceDescriptor};

    #[test]
    fn test_payload_only_for_changes() {
        let source = SourceDescriptor::new("gemini", "Gemini", "https://g.example/", ParserKind::HashOnly);

        let changed = CheckResult::new(
            source.clone(),
            CheckOutcome::Changed {
                version: "Update detected".into(),
                changes: "Gemini release notes have been updated.".into(),
                first_observation: false,
            },
        );
        let payload = NotificationPayload::from_result(&changed).unwrap();
        assert_eq!(payload.source, "Gemini");
        assert_eq!(payload.version, "Update detected");

        let unchanged = CheckResult::new(source, CheckOutcome::Unchanged);
        assert!(NotificationPayload::from_result(&unchanged).is_none());
    }
}
