use crate::app::{AppContext, NotewatchError, Result};
use crate::domain::{CheckOutcome, CheckResult, SourceDescriptor};
use crate::notify::NotificationPayload;

/// Check the selected sources (all when `ids` is empty) and deliver
/// notifications for the ones that changed.
pub async fn check_sources(ctx: &AppContext, ids: &[String]) -> Result<Vec<CheckResult>> {
    let sources = select_sources(ctx, ids)?;

    if sources.is_empty() {
        println!("No sources configured");
        return Ok(Vec::new());
    }

    println!("Checking {} sources...", sources.len());
    let results = ctx.checker.check_all(&sources).await;

    let mut changed = 0;
    let mut errors = 0;

    for result in &results {
        match &result.outcome {
            CheckOutcome::Unchanged => {}
            CheckOutcome::Changed { .. } => changed += 1,
            CheckOutcome::Failed { .. } => errors += 1,
        }

        if result.error().is_some() {
            eprintln!("  {}", result.summary());
        } else {
            println!("  {}", result.summary());
        }
    }

    deliver_notifications(ctx, &results).await;

    println!("Check complete: {} changed, {} errors", changed, errors);
    Ok(results)
}

fn select_sources(ctx: &AppContext, ids: &[String]) -> Result<Vec<SourceDescriptor>> {
    if ids.is_empty() {
        return Ok(ctx.config.sources.clone());
    }

    ids.iter()
        .map(|id| {
            ctx.config
                .source(id)
                .cloned()
                .ok_or_else(|| NotewatchError::SourceNotFound(id.clone()))
        })
        .collect()
}

/// Delivery problems are logged only; they never change a check result.
pub async fn deliver_notifications(ctx: &AppContext, results: &[CheckResult]) -> usize {
    let mut delivered = 0;

    for result in results {
        if let CheckOutcome::Changed {
            first_observation: true,
            ..
        } = result.outcome
        {
            if !ctx.config.notify_on_first_check {
                tracing::info!("{}: first check, notification skipped", result.source.id);
                continue;
            }
        }

        let Some(payload) = NotificationPayload::from_result(result) else {
            continue;
        };

        let Some(webhook_url) = result.source.webhook_url.as_deref() else {
            tracing::info!("{}: no webhook configured, skipping notification", result.source.id);
            continue;
        };

        match ctx.notifier.notify(webhook_url, &payload).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::error!("{}: notification failed: {}", result.source.id, e);
                eprintln!("  Notification for {} failed: {}", result.source.name, e);
            }
        }
    }

    delivered
}

pub fn list_sources(ctx: &AppContext) -> Result<()> {
    if ctx.config.sources.is_empty() {
        println!("No sources configured");
        return Ok(());
    }

    for source in &ctx.config.sources {
        let state = match ctx.store.get_state(&source.id)? {
            Some(state) => format!(
                "{} (updated {})",
                short_fingerprint(&state.last_fingerprint),
                state.updated_at.format("%Y-%m-%d %H:%M")
            ),
            None => "never checked".to_string(),
        };

        println!(
            "{} [{}] {}\n  {}\n  {}",
            source.id, source.parser, source.name, source.url, state
        );
    }

    Ok(())
}

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

pub fn reset_source(ctx: &AppContext, id: &str) -> Result<()> {
    if ctx.config.source(id).is_none() {
        return Err(NotewatchError::SourceNotFound(id.to_string()));
    }

    if ctx.store.clear(id)? {
        println!("Cleared stored fingerprint for {}", id);
    } else {
        println!("No stored fingerprint for {}", id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::Config;
    use crate::domain::{Fingerprint, ParserKind};
    use crate::notify::Notifier;
    use crate::parser::testing::StubFetcher;
    use crate::store::SqliteStore;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, NotificationPayload)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, webhook_url: &str, payload: &NotificationPayload) -> Result<()> {
            if webhook_url.contains("broken") {
                return Err(NotewatchError::Notify("500: down".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((webhook_url.to_string(), payload.clone()));
            Ok(())
        }
    }

    const CHANGELOG: &str = "https://raw.example.com/CHANGELOG.md";

    fn context(notify_on_first_check: bool) -> (AppContext, Arc<StubFetcher>, Arc<RecordingNotifier>) {
        let mut source = SourceDescriptor::new("cli", "CLI", CHANGELOG, ParserKind::Markdown);
        source.webhook_url = Some("https://hooks.example.com/cli".into());
        let config = Config {
            notify_on_first_check,
            sources: vec![source],
            ..Default::default()
        };

        let fetcher = Arc::new(StubFetcher::new().with_page(CHANGELOG, "## 1.0.0\n- init"));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let ctx = AppContext::assemble(config, store, fetcher.clone(), notifier.clone());
        (ctx, fetcher, notifier)
    }

    #[tokio::test]
    async fn test_check_notifies_on_change() {
        let (ctx, fetcher, notifier) = context(true);

        let results = check_sources(&ctx, &[]).await.unwrap();
        assert!(results[0].has_changed());
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);

        check_sources(&ctx, &[]).await.unwrap();
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);

        fetcher.set_page(CHANGELOG, "## 1.1.0\n- more\n## 1.0.0\n- init");
        check_sources(&ctx, &["cli".to_string()]).await.unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].0, "https://hooks.example.com/cli");
        assert_eq!(sent[1].1.version, "1.1.0");
        assert_eq!(sent[1].1.changes, "## 1.1.0\n- more");
    }

    #[tokio::test]
    async fn test_first_check_notification_can_be_disabled() {
        let (ctx, _, notifier) = context(false);

        let results = check_sources(&ctx, &[]).await.unwrap();
        assert!(results[0].has_changed());
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert!(ctx.store.get_fingerprint("cli").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_result() {
        let (mut ctx, _, notifier) = context(true);
        ctx.config.sources[0].webhook_url = Some("https://broken.example.com/".into());

        let results = check_sources(&ctx, &[]).await.unwrap();
        assert!(results[0].has_changed());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_source_id_is_error() {
        let (ctx, fetcher, _) = context(true);
        let err = check_sources(&ctx, &["nope".to_string()]).await.unwrap_err();
        assert!(matches!(err, NotewatchError::SourceNotFound(ref id) if id == "nope"));
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn test_short_fingerprint() {
        let hex = Fingerprint::of("notes").to_string();
        assert_eq!(short_fingerprint(&hex), &hex[..12]);
        assert_eq!(short_fingerprint("abc"), "abc");
        // Byte 12 falls inside a multi-byte char.
        assert_eq!(short_fingerprint("aééééééé"), "aééééééé");
    }

    #[tokio::test]
    async fn test_reset_source() {
        let (ctx, _, _) = context(true);
        check_sources(&ctx, &[]).await.unwrap();

        reset_source(&ctx, "cli").unwrap();
        assert!(ctx.store.get_state("cli").unwrap().is_none());
        assert!(reset_source(&ctx, "missing").is_err());
    }
}
