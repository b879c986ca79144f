//! Repeated checks on a fixed interval, without a system scheduler.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;

use crate::app::{AppContext, Result};
use crate::cli::commands;

#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Seconds between checks (default: 3600 = 1 hour)
    pub interval_secs: u64,
    /// Whether to check immediately on start
    pub check_on_start: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            check_on_start: true,
        }
    }
}

impl WatchConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
        let s = s.trim().to_lowercase();

        let secs = if let Some(hours) = s.strip_suffix('h') {
            hours
                .parse::<u64>()
                .map(|h| h * 3600)
                .map_err(|_| format!("Invalid hours: {}", hours))?
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes
                .parse::<u64>()
                .map(|m| m * 60)
                .map_err(|_| format!("Invalid minutes: {}", minutes))?
        } else if let Some(days) = s.strip_suffix('d') {
            days.parse::<u64>()
                .map(|d| d * 86400)
                .map_err(|_| format!("Invalid days: {}", days))?
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map_err(|_| format!("Invalid seconds: {}", secs))?
        } else {
            s.parse::<u64>().map_err(|_| {
                format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s)
            })?
        };

        if secs == 0 {
            return Err("Interval must be greater than zero".to_string());
        }
        Ok(secs)
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

pub struct Watcher {
    ctx: Arc<AppContext>,
    config: WatchConfig,
}

impl Watcher {
    pub fn new(ctx: Arc<AppContext>, config: WatchConfig) -> Self {
        Self { ctx, config }
    }

    /// Run until SIGINT/SIGTERM. A cycle in progress is abandoned on shutdown.
    pub async fn run(&self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            "Watching {} sources every {}",
            self.ctx.config.sources.len(),
            WatchConfig::format_interval(self.config.interval_secs)
        );

        let mut timer = interval(Duration::from_secs(self.config.interval_secs));
        if !self.config.check_on_start {
            timer.tick().await; // Skip the first immediate tick
        }

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = timer.tick() => {}
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.run_check() => {}
            }
        }

        tracing::info!("Watcher shutting down");
        Ok(())
    }

    /// Run a single check cycle
    async fn run_check(&self) {
        let start = Utc::now();

        match commands::check_sources(&self.ctx, &[]).await {
            Ok(results) => {
                let elapsed = Utc::now().signed_duration_since(start);
                tracing::info!(
                    "Checked {} sources in {:.1}s",
                    results.len(),
                    elapsed.num_milliseconds() as f64 / 1000.0
                );
            }
            Err(e) => tracing::error!("Check cycle failed: {}", e),
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
            }
            _ => {
                tracing::warn!("Failed to install signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
