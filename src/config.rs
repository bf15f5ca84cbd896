//! Process configuration for PageSentinel
//!
//! Settings come from an optional TOML file and the process environment,
//! with environment variables taking precedence. The result is built once at
//! startup and handed to the checker; nothing reads the environment later.

use crate::error::ConfigError;
use crate::extract::{TextExtractor, DEFAULT_SELECTOR};
use crate::storage::{is_valid_table_name, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable names
pub mod env {
    pub const TABLE: &str = "SENTINEL_TABLE";
    pub const WEBPAGE_URI: &str = "WEBPAGE_URI";
    pub const SELECTOR: &str = "SENTINEL_SELECTOR";
    pub const DATABASE: &str = "SENTINEL_DB";
    pub const SLACK_URL: &str = "SLACK_URL";
    pub const SLACK_CHANNEL: &str = "SLACK_CHANNEL";
    pub const SLACK_USERNAME: &str = "SLACK_USERNAME";
    pub const SLACK_AVATAR: &str = "SLACK_AVATAR";
    pub const SLACK_ACTION_URL: &str = "SLACK_ACTION_URL";
    pub const SLACK_ACTION_TEXT: &str = "SLACK_ACTION_TEXT";
}

/// Configuration for one monitored page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Table holding fingerprint records
    #[serde(default = "default_table")]
    pub table: String,

    /// Page to monitor
    #[serde(default)]
    pub webpage_uri: String,

    /// CSS selector for the watched content region
    #[serde(default = "default_selector")]
    pub selector: String,

    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Chat notification settings
    #[serde(default)]
    pub slack: SlackConfig,
}

/// Slack incoming-webhook settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Incoming webhook URL
    #[serde(default)]
    pub webhook_url: String,

    /// Channel to post to
    #[serde(default)]
    pub channel: String,

    /// Sender display name
    #[serde(default)]
    pub username: String,

    /// Sender avatar image URL
    #[serde(default)]
    pub avatar: String,

    /// Target of the message button (defaults to the monitored page)
    #[serde(default)]
    pub action_url: Option<String>,

    /// Label of the message button
    #[serde(default = "default_action_text")]
    pub action_text: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_selector() -> String {
    DEFAULT_SELECTOR.to_string()
}

fn default_database() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("pagesentinel"))
        .unwrap_or_else(|| PathBuf::from(".pagesentinel"))
        .join("pagesentinel.db")
}

fn default_action_text() -> String {
    "View page".to_string()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            channel: String::new(),
            username: String::new(),
            avatar: String::new(),
            action_url: None,
            action_text: default_action_text(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: default_table(),
            webpage_uri: String::new(),
            selector: default_selector(),
            database: default_database(),
            slack: SlackConfig::default(),
        }
    }
}

impl Config {
    /// Load from an optional file plus the process environment
    ///
    /// The result is not validated: commands that only touch the store do not
    /// need the notification settings.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));

        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Override fields with values returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        };

        set(&mut self.table, env::TABLE);
        set(&mut self.webpage_uri, env::WEBPAGE_URI);
        set(&mut self.selector, env::SELECTOR);
        set(&mut self.slack.webhook_url, env::SLACK_URL);
        set(&mut self.slack.channel, env::SLACK_CHANNEL);
        set(&mut self.slack.username, env::SLACK_USERNAME);
        set(&mut self.slack.avatar, env::SLACK_AVATAR);
        set(&mut self.slack.action_text, env::SLACK_ACTION_TEXT);

        if let Some(db) = lookup(env::DATABASE) {
            self.database = PathBuf::from(db);
        }
        if let Some(url) = lookup(env::SLACK_ACTION_URL) {
            self.slack.action_url = Some(url);
        }
    }

    /// Check that every required setting is present and well formed
    pub fn validate(&self) -> Result<(), ConfigError> {
        require(&self.webpage_uri, "webpage_uri", env::WEBPAGE_URI)?;
        require(&self.slack.webhook_url, "slack.webhook_url", env::SLACK_URL)?;
        require(&self.slack.channel, "slack.channel", env::SLACK_CHANNEL)?;
        require(&self.slack.username, "slack.username", env::SLACK_USERNAME)?;
        require(&self.slack.avatar, "slack.avatar", env::SLACK_AVATAR)?;

        parse_url(&self.webpage_uri, "webpage_uri")?;
        parse_url(&self.slack.webhook_url, "slack.webhook_url")?;
        if let Some(ref action_url) = self.slack.action_url {
            parse_url(action_url, "slack.action_url")?;
        }

        if !is_valid_table_name(&self.table) {
            return Err(ConfigError::Table(self.table.clone()));
        }

        TextExtractor::new(&self.selector)?;

        Ok(())
    }

    /// URL the notification button links to
    pub fn action_url(&self) -> &str {
        self.slack.action_url.as_deref().unwrap_or(&self.webpage_uri)
    }

    /// Webhook URL safe for display: only scheme and host are shown
    pub fn masked_webhook(&self) -> String {
        match url::Url::parse(&self.slack.webhook_url) {
            Ok(url) => format!("{}://{}/***", url.scheme(), url.host_str().unwrap_or("")),
            Err(_) => "***".to_string(),
        }
    }
}

fn require(value: &str, field: &'static str, env: &'static str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Missing { field, env })
    } else {
        Ok(())
    }
}

fn parse_url(value: &str, field: &'static str) -> Result<url::Url, ConfigError> {
    url::Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}
