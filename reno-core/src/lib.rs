pub mod codec;
pub mod collator;
pub mod config;
pub mod models;
pub mod session;

// Re-export commonly used types
pub use codec::{decode, encode, from_canonical_json, to_canonical_json, CodecError};
pub use collator::{
    CardSummary, Collator, CollatorEntry, DetailField, IngestReport, LinkItem, ServiceDetail,
    summarize,
};
pub use config::{get_config_path, Config};
pub use models::{join_links, looks_like_url, parse_links, Level, ReleaseRecord, ServiceEntry};
pub use session::{FormSession, ServiceFormState};
