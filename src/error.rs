//! Error types for the change-detection pipeline
//!
//! Each external collaborator has its own error type. None of them are
//! handled inside an invocation: they are aggregated into [`CheckError`] and
//! returned to whoever triggered the check.

use thiserror::Error;

/// Failure retrieving the monitored page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("request to {uri} failed")]
    Request {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{uri} responded with status {status}")]
    Status { uri: String, status: u16 },

    /// The response body could not be read as text
    #[error("failed to read response body from {uri}")]
    Body {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure reading or writing the fingerprint store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed
    #[error("fingerprint store unavailable: {context}")]
    Unavailable {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Table names are interpolated into SQL and must be plain identifiers
    #[error("invalid table name {0:?}: use letters, digits and underscores")]
    InvalidTable(String),

    /// The database directory could not be created
    #[error("failed to create database directory {path}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn unavailable(context: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> Self {
        let context = context.into();
        move |source| StoreError::Unavailable { context, source }
    }
}

/// Failure delivering a webhook notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed")]
    Request(#[source] reqwest::Error),

    #[error("webhook responded with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Invalid or incomplete configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{field}` (set {env})")]
    Missing { field: &'static str, env: &'static str },

    #[error("`{field}` is not a valid URL: {value}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid CSS selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid table name {0:?}: use letters, digits and underscores")]
    Table(String),

    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Any failure that aborts a check
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("failed to serialize check outcome")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            uri: "https://example.com".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "https://example.com responded with status 503");
    }

    #[test]
    fn test_check_error_is_transparent() {
        let err: CheckError = NotifyError::Status {
            status: 404,
            body: "no_service".to_string(),
        }
        .into();
        assert!(matches!(err, CheckError::Notify(_)));
        assert_eq!(err.to_string(), "webhook responded with status 404: no_service");
    }
}
