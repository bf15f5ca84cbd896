//! Page text extraction and fingerprinting
//!
//! This module handles:
//! - Reducing fetched markup to the watched content region as plain text
//! - Computing the fingerprint used to detect changes between checks

pub mod html;

pub use html::{TextExtractor, DEFAULT_SELECTOR};

use md5::{Digest, Md5};

/// Compute the change fingerprint for extracted text
///
/// MD5 is only used to tell two versions of the page apart; nothing relies on
/// its collision resistance.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
