use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::detector::ChangeDetector;
use crate::domain::{CheckOutcome, CheckResult, SourceDescriptor};

pub const DEFAULT_WORKERS: usize = 4;

/// Checks distinct sources concurrently, at most `workers` at a time.
pub struct ParallelChecker {
    detector: Arc<ChangeDetector>,
    semaphore: Arc<Semaphore>,
}

impl ParallelChecker {
    pub fn with_workers(detector: Arc<ChangeDetector>, workers: usize) -> Self {
        Self {
            detector,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Results come back in the same order as `sources`.
    pub async fn check_all(&self, sources: &[SourceDescriptor]) -> Vec<CheckResult> {
        let mut handles = Vec::with_capacity(sources.len());

        for source in sources.iter().cloned() {
            let detector = self.detector.clone();
            let semaphore = self.semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                detector.check(&source).await
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .zip(sources)
            .map(|(joined, source)| match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Check task for {} failed to join: {}", source.id, e);
                    CheckResult::new(
                        source.clone(),
                        CheckOutcome::Failed {
                            error: e.to_string(),
                        },
                    )
                }
            })
            .collect()
    }
}
