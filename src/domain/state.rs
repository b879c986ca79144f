use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last-observed fingerprint for a source, as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceState {
    pub source_id: String,
    pub last_fingerprint: String,
    pub updated_at: DateTime<Utc>,
}
