//! PageSentinel - Web page change detection with chat notifications
//!
//! This library fetches a page, reduces a region of it to plain text,
//! fingerprints the text and, when the fingerprint differs from the stored
//! one, records the new fingerprint and posts a notification to a webhook.

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod notify;
pub mod storage;

/// Re-export commonly used types
pub use check::{CheckOutcome, HttpResponse, Sentinel};
pub use config::Config;
pub use error::{CheckError, ConfigError, FetchError, NotifyError, StoreError};
pub use extract::{fingerprint, TextExtractor};
pub use storage::{Database, FingerprintRecord, FingerprintStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "pagesentinel";
