//! # notewatch
//!
//! Watches release-notes pages for changes and reports the newest version.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer / Extractor / Archive → Parser → Detector → Notifier
//! ```
//!
//! Each configured source names a parser strategy:
//!
//! - `markdown`: changelog files; the newest `## [x.y.z]` block is reported
//! - `hash-only`: plain HTML pages; only "something changed" is reported
//! - `wayback`: like `hash-only`, but reads the closest Wayback Machine
//!   snapshot instead of the live page
//!
//! The detector fingerprints the stable content of a source (SHA-256) and
//! compares it with the last stored fingerprint. A change overwrites the
//! stored value and produces a notification.
//!
//! ## Quick Start
//!
//! ```bash
//! # Check every configured source once
//! notewatch check
//!
//! # Check a single source
//! notewatch check --source claude
//!
//! # Keep checking every 30 minutes
//! notewatch watch --interval 30m
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config, store,
/// fetcher, detector and notifier.
pub mod app;

/// Wayback Machine availability lookups.
pub mod archive;

/// Command-line interface using clap.
///
/// - `check [--source ID]` - Check sources once
/// - `sources` - List sources and stored state
/// - `reset <ID>` - Forget a stored fingerprint
/// - `watch [--interval 1h]` - Check on an interval
pub mod cli;

/// TOML configuration and the source registry.
pub mod config;

/// Change detection: fingerprint comparison and parallel checks.
pub mod detector;

/// Core domain models.
///
/// - [`SourceDescriptor`](domain::SourceDescriptor): one watched page
/// - [`Fingerprint`](domain::Fingerprint): SHA-256 of stable content
/// - [`CheckResult`](domain::CheckResult): outcome of a single check
pub mod domain;

/// Version extraction from changelog markdown.
pub mod extractor;

/// HTTP fetching with browser-like headers.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// HTML to stable plain text.
pub mod normalizer;

/// Webhook notifications for detected changes.
pub mod notify;

/// Per-source fetch + parse strategies.
pub mod parser;

/// SQLite persistence of per-source fingerprints.
///
/// - [`StateStore`](store::StateStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Interval-based checking until interrupted.
pub mod watch;
