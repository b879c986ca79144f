use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotewatchError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch content")]
    NoContent,

    #[error("Unknown parser type: {0}")]
    UnknownParser(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NotewatchError>;
