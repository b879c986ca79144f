pub mod parallel;

use std::sync::Arc;

use crate::app::{NotewatchError, Result};
use crate::domain::{CheckOutcome, CheckResult, Fingerprint, SourceDescriptor};
use crate::parser::ParserSet;
use crate::store::StateStore;

/// Runs one source through its parser and compares fingerprints.
pub struct ChangeDetector {
    parsers: ParserSet,
    store: Arc<dyn StateStore + Send + Sync>,
}

impl ChangeDetector {
    pub fn new(parsers: ParserSet, store: Arc<dyn StateStore + Send + Sync>) -> Self {
        Self { parsers, store }
    }

    /// Check a source. Never fails: every error ends up in
    /// [`CheckOutcome::Failed`].
    ///
    /// A source with no stored fingerprint is reported as changed, with
    /// `first_observation` set, and its fingerprint becomes the baseline.
    pub async fn check(&self, source: &SourceDescriptor) -> CheckResult {
        let outcome = match self.detect(source).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("{}: check failed: {}", source.id, e);
                CheckOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        CheckResult::new(source.clone(), outcome)
    }

    async fn detect(&self, source: &SourceDescriptor) -> Result<CheckOutcome> {
        let parsed = self
            .parsers
            .parse(source)
            .await?
            .ok_or(NotewatchError::NoContent)?;

        let fingerprint = Fingerprint::of(&parsed.stable_content);
        let previous = self.store.get_fingerprint(&source.id)?;

        if previous.as_deref().is_some_and(|stored| fingerprint.matches(stored)) {
            tracing::debug!("{}: unchanged ({})", source.id, fingerprint);
            return Ok(CheckOutcome::Unchanged);
        }

        self.store.set_fingerprint(&source.id, fingerprint.as_str())?;
        tracing::info!(
            "{}: change detected, version {} ({})",
            source.id,
            parsed.version,
            fingerprint
        );

        Ok(CheckOutcome::Changed {
            version: parsed.version,
            changes: parsed.changes,
            first_observation: previous.is_none(),
        })
    }
}
