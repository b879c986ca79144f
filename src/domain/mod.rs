pub mod fingerprint;
pub mod result;
pub mod source;
pub mod state;

pub use fingerprint::Fingerprint;
pub use result::{CheckOutcome, CheckResult};
pub use source::{ParserKind, SourceDescriptor};
pub use state::SourceState;
