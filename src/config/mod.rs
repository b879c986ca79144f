//! Configuration management for notewatch.
//!
//! Configuration is read from `~/.config/notewatch/config.toml` unless a path
//! is given on the command line. If the default file doesn't exist, it is
//! created with comments and the built-in sources.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::archive::DEFAULT_AVAILABILITY_URL;
use crate::detector::parallel::DEFAULT_WORKERS;
use crate::domain::{ParserKind, SourceDescriptor};
use crate::fetcher::http_fetcher::DEFAULT_TIMEOUT_SECS;

/// Environment prefix for per-source webhook overrides,
/// e.g. `NOTEWATCH_WEBHOOK_CLAUDE`.
pub const WEBHOOK_ENV_PREFIX: &str = "NOTEWATCH_WEBHOOK_";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the state database lives (default: platform data dir)
    pub data_dir: Option<PathBuf>,

    /// Maximum sources checked concurrently
    pub workers: usize,

    /// Send a notification for the very first check of a source
    pub notify_on_first_check: bool,

    pub fetch: FetchConfig,
    pub archive: ArchiveConfig,
    pub sources: Vec<SourceDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub availability_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            availability_url: DEFAULT_AVAILABILITY_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            workers: DEFAULT_WORKERS,
            notify_on_first_check: true,
            fetch: FetchConfig::default(),
            archive: ArchiveConfig::default(),
            sources: default_sources(),
        }
    }
}

/// The release-note pages watched out of the box.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new(
            "claude",
            "Claude Code",
            "https://raw.githubusercontent.com/anthropics/claude-code/main/CHANGELOG.md",
            ParserKind::Markdown,
        )
        .with_release_page("https://github.com/anthropics/claude-code/blob/main/CHANGELOG.md"),
        SourceDescriptor::new(
            "gemini",
            "Gemini",
            "https://gemini.google/release-notes/",
            ParserKind::HashOnly,
        )
        .with_main_content(),
        SourceDescriptor::new(
            "chatgpt",
            "ChatGPT",
            "https://help.openai.com/en/articles/6825453-chatgpt-release-notes",
            ParserKind::Wayback,
        ),
    ]
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing default file is created with
    /// the built-in sources. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    let mut config = Self::default();
                    config.apply_webhook_overrides(|key| std::env::var(key).ok());
                    return Ok(config);
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let mut config = Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        config.apply_webhook_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the default config file path: `~/.config/notewatch/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("notewatch").join("config.toml"))
    }

    /// Directory holding the state database.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join("notewatch"))
                .ok_or(ConfigError::NoDataDir),
        }
    }

    pub fn source(&self, id: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Override webhook URLs from `NOTEWATCH_WEBHOOK_<ID>` variables.
    pub fn apply_webhook_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for source in &mut self.sources {
            let key = format!(
                "{}{}",
                WEBHOOK_ENV_PREFIX,
                source.id.to_uppercase().replace('-', "_")
            );
            if let Some(url) = lookup(&key).filter(|u| !u.trim().is_empty()) {
                source.webhook_url = Some(url);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for source in &self.sources {
            if source.id.trim().is_empty() {
                return Err(ConfigError::Invalid("source id must not be empty".into()));
            }
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source id: {}",
                    source.id
                )));
            }
            for url in [&source.url, &source.release_page_url] {
                url::Url::parse(url).map_err(|e| {
                    ConfigError::Invalid(format!("source {}: invalid URL {}: {}", source.id, url, e))
                })?;
            }
        }

        Ok(())
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Wrote default config to {}", path.display());
        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# notewatch configuration
#
# Each [[sources]] entry is one release-notes page. `parser` is one of:
# - "markdown":  changelog with version headings; reports the newest version
# - "hash-only": any HTML page; reports only that its text changed
# - "wayback":   like hash-only, but reads the closest Wayback Machine snapshot
#
# Webhooks can be set per source with `webhook_url`, or with the
# NOTEWATCH_WEBHOOK_<ID> environment variable (e.g. NOTEWATCH_WEBHOOK_CLAUDE).

# Directory for the state database (default: platform data dir)
# data_dir = "/var/lib/notewatch"

# Maximum number of sources checked at the same time
workers = 4

# Notify on the first check of a source, before any baseline exists
notify_on_first_check = true

[fetch]
# HTTP timeout in seconds
timeout_secs = 30

[archive]
availability_url = "https://archive.org/wayback/available"

[[sources]]
id = "claude"
name = "Claude Code"
url = "https://raw.githubusercontent.com/anthropics/claude-code/main/CHANGELOG.md"
parser = "markdown"
release_page_url = "https://github.com/anthropics/claude-code/blob/main/CHANGELOG.md"

[[sources]]
id = "gemini"
name = "Gemini"
url = "https://gemini.google/release-notes/"
parser = "hash-only"
release_page_url = "https://gemini.google/release-notes/"
# Only hash the <main>/<article> region; the page chrome changes often
prefer_main_content = true

[[sources]]
id = "chatgpt"
name = "ChatGPT"
url = "https://help.openai.com/en/articles/6825453-chatgpt-release-notes"
parser = "wayback"
release_page_url = "https://help.openai.com/en/articles/6825453-chatgpt-release-notes"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
