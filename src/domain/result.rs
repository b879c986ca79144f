use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::SourceDescriptor;

/// What a single check of a source found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Unchanged,
    Changed {
        version: String,
        changes: String,
        /// No fingerprint was stored before this check.
        first_observation: bool,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub source: SourceDescriptor,
    pub outcome: CheckOutcome,
    pub checked_at: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(source: SourceDescriptor, outcome: CheckOutcome) -> Self {
        Self {
            source,
            outcome,
            checked_at: Utc::now(),
        }
    }

    pub fn has_changed(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Changed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            CheckOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match &self.outcome {
            CheckOutcome::Changed { version, .. } => Some(version),
            _ => None,
        }
    }

    pub fn changes(&self) -> Option<&str> {
        match &self.outcome {
            CheckOutcome::Changed { changes, .. } => Some(changes),
            _ => None,
        }
    }

    /// One-line summary for terminal output.
    pub fn summary(&self) -> String {
        match &self.outcome {
            CheckOutcome::Unchanged => format!("{}: no changes", self.source.name),
            CheckOutcome::Changed {
                version,
                first_observation: true,
                ..
            } => format!("{}: first check, baseline recorded ({})", self.source.name, version),
            CheckOutcome::Changed { version, .. } => {
                format!("{}: changed ({})", self.source.name, version)
            }
            CheckOutcome::Failed { error } => format!("{}: error: {}", self.source.name, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParserKind;

    fn source() -> SourceDescriptor {
        SourceDescriptor::new("claude", "Claude Code", "https://example.com/CHANGELOG.md", ParserKind::Markdown)
    }

    #[test]
    fn test_changed_accessors() {
        let result = CheckResult::new(
            source(),
            CheckOutcome::Changed {
                version: "1.2.3".into(),
                changes: "## 1.2.3\n- fix".into(),
                first_observation: false,
            },
        );
        assert!(result.has_changed());
        assert_eq!(result.version(), Some("1.2.3"));
        assert_eq!(result.changes(), Some("## 1.2.3\n- fix"));
        assert_eq!(result.error(), None);
        assert_eq!(result.summary(), "Claude Code: changed (1.2.3)");
    }

    #[test]
    fn test_failed_has_no_content() {
        let result = CheckResult::new(
            source(),
            CheckOutcome::Failed {
                error: "Failed to fetch content".into(),
            },
        );
        assert!(!result.has_changed());
        assert_eq!(result.version(), None);
        assert_eq!(result.changes(), None);
        assert_eq!(result.error(), Some("Failed to fetch content"));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(CheckOutcome::Unchanged).unwrap();
        assert_eq!(json["status"], "unchanged");
    }
}
