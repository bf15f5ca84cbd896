//! Change check orchestration
//!
//! A check runs the whole pipeline once, strictly in sequence:
//! fetch → extract → fingerprint → read stored hash → (store → notify) → respond.
//!
//! Any failure aborts the check before a response is produced. Checks do not
//! coordinate with each other: two checks racing on the same URI can both
//! see the old hash, both store the new one and both notify.

use crate::error::CheckError;
use crate::extract::{fingerprint, TextExtractor};
use crate::fetch::PageSource;
use crate::notify::Notifier;
use crate::storage::FingerprintStore;
use serde::{Deserialize, Serialize};

/// Pipeline stage reached by a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Fetched,
    Hashed,
    Compared,
    Updated,
    Unchanged,
    Responded,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Start => write!(f, "start"),
            Stage::Fetched => write!(f, "fetched"),
            Stage::Hashed => write!(f, "hashed"),
            Stage::Compared => write!(f, "compared"),
            Stage::Updated => write!(f, "updated"),
            Stage::Unchanged => write!(f, "unchanged"),
            Stage::Responded => write!(f, "responded"),
        }
    }
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    #[serde(rename = "webpageURI")]
    pub webpage_uri: String,
    #[serde(rename = "liveText")]
    pub live_text: String,
    #[serde(rename = "cachedHash")]
    pub cached_hash: String,
    #[serde(rename = "liveHash")]
    pub live_hash: String,
    /// Whether the page changed, and therefore a notification was sent
    #[serde(rename = "isDifferent")]
    pub is_different: bool,
}

/// HTTP-style envelope returned to the trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    /// JSON-encoded [`CheckOutcome`]
    pub body: String,
}

impl HttpResponse {
    /// Wrap an outcome in a `200` response
    pub fn ok(outcome: &CheckOutcome) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(outcome)?,
        })
    }
}

/// Watches one page for changes
pub struct Sentinel<P, S, N> {
    uri: String,
    extractor: TextExtractor,
    source: P,
    store: S,
    notifier: N,
}

impl<P, S, N> Sentinel<P, S, N>
where
    P: PageSource,
    S: FingerprintStore,
    N: Notifier,
{
    /// Create a sentinel for `uri`
    pub fn new(uri: &str, extractor: TextExtractor, source: P, store: S, notifier: N) -> Self {
        Self {
            uri: uri.to_string(),
            extractor,
            source,
            store,
            notifier,
        }
    }

    /// The monitored URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The fingerprint store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one check
    ///
    /// The returned future is `Send` when the source, store and notifier are
    /// `Sync`, which holds for `HttpFetcher`, `Database` and `SlackNotifier`.
    pub async fn check(&self) -> Result<CheckOutcome, CheckError> {
        tracing::debug!(stage = %Stage::Start, uri = %self.uri, "Checking page");

        let markup = self.source.fetch(&self.uri).await?;
        let live_text = self.extractor.extract(&markup);
        tracing::debug!(stage = %Stage::Fetched, chars = live_text.len(), "Extracted text");

        let live_hash = fingerprint(&live_text);
        tracing::debug!(stage = %Stage::Hashed, hash = %live_hash);

        let cached_hash = self.store.cached_hash(&self.uri)?;
        tracing::debug!(stage = %Stage::Compared, cached = %cached_hash);

        let is_different = live_hash != cached_hash;
        if is_different {
            // Store first: a failed write must not be announced
            self.store.store_hash(&self.uri, &live_hash)?;
            self.notifier.notify(&live_text).await?;
            tracing::info!(stage = %Stage::Updated, uri = %self.uri, "Page changed, notification sent");
        } else {
            tracing::info!(stage = %Stage::Unchanged, uri = %self.uri, "Page unchanged");
        }

        Ok(CheckOutcome {
            webpage_uri: self.uri.clone(),
            live_text,
            cached_hash,
            live_hash,
            is_different,
        })
    }

    /// Run one check and wrap the outcome in the response envelope
    pub async fn invoke(&self) -> Result<HttpResponse, CheckError> {
        let outcome = self.check().await?;
        let response = HttpResponse::ok(&outcome)?;
        tracing::debug!(stage = %Stage::Responded, status = response.status_code);
        Ok(response)
    }
}
