pub mod sqlite;

use crate::app::Result;
use crate::domain::SourceState;

pub use sqlite::SqliteStore;

/// Per-source fingerprint persistence.
///
/// `None` from a read means no check of that source ever completed, which is
/// distinct from a stored but stale fingerprint.
pub trait StateStore {
    fn get_state(&self, source_id: &str) -> Result<Option<SourceState>>;
    fn set_fingerprint(&self, source_id: &str, fingerprint: &str) -> Result<()>;
    fn clear(&self, source_id: &str) -> Result<bool>;
    fn all_states(&self) -> Result<Vec<SourceState>>;

    fn get_fingerprint(&self, source_id: &str) -> Result<Option<String>> {
        Ok(self.get_state(source_id)?.map(|s| s.last_fingerprint))
    }
}
