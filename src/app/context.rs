use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{NotewatchError, Result};
use crate::config::Config;
use crate::detector::parallel::ParallelChecker;
use crate::detector::ChangeDetector;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::notify::{Notifier, WebhookNotifier};
use crate::parser::ParserSet;
use crate::store::{SqliteStore, StateStore};

pub const DB_FILE_NAME: &str = "notewatch.db";

pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn StateStore + Send + Sync>,
    pub detector: Arc<ChangeDetector>,
    pub checker: ParallelChecker,
    pub notifier: Arc<dyn Notifier + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = config
            .data_dir()
            .map_err(|e| NotewatchError::Config(e.to_string()))?;
        std::fs::create_dir_all(&data_dir)?;

        let store = Arc::new(SqliteStore::new(data_dir.join(DB_FILE_NAME))?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn StateStore + Send + Sync>) -> Result<Self> {
        let timeout = Duration::from_secs(config.fetch.timeout_secs);
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_timeout(timeout)?);
        let notifier: Arc<dyn Notifier + Send + Sync> = Arc::new(WebhookNotifier::new());
        Ok(Self::assemble(config, store, fetcher, notifier))
    }

    /// Wire the pipeline from explicit collaborators.
    pub fn assemble(
        config: Config,
        store: Arc<dyn StateStore + Send + Sync>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        let parsers = ParserSet::new(fetcher, &config.archive.availability_url);
        let detector = Arc::new(ChangeDetector::new(parsers, store.clone()));
        let checker = ParallelChecker::with_workers(detector.clone(), config.workers);

        Self {
            config,
            store,
            detector,
            checker,
            notifier,
        }
    }
}
