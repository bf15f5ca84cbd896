//! Change notifications
//!
//! This module handles:
//! - The typed Slack message posted when the page changes
//! - Delivering it to an incoming webhook

mod slack;

pub use slack::SlackNotifier;

use crate::config::Config;
use crate::error::NotifyError;
use serde::{Deserialize, Serialize};

/// Prefix that makes Slack mention everyone in the channel (with `link_names`)
pub const CHANNEL_MENTION: &str = "@channel";

/// Delivers change notifications
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Announce that the page text is now `text`
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

/// Message body posted to a Slack incoming webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub text: String,
    pub channel: String,
    pub username: String,
    pub icon_url: String,
    pub link_names: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<SlackAttachment>,
}

/// Legacy message attachment carrying the action button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub actions: Vec<SlackAction>,
}

/// Button linking out of the message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub url: String,
}

/// Static parts of every message: where it goes and how it looks
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub channel: String,
    pub username: String,
    pub icon_url: String,
    pub action_text: String,
    pub action_url: String,
}

impl MessageTemplate {
    /// Build the template from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            channel: config.slack.channel.clone(),
            username: config.slack.username.clone(),
            icon_url: config.slack.avatar.clone(),
            action_text: config.slack.action_text.clone(),
            action_url: config.action_url().to_string(),
        }
    }

    /// Render the message announcing `text`
    pub fn render(&self, text: &str) -> SlackMessage {
        SlackMessage {
            text: format!("{} {}", CHANNEL_MENTION, text),
            channel: self.channel.clone(),
            username: self.username.clone(),
            icon_url: self.icon_url.clone(),
            link_names: true,
            attachments: vec![SlackAttachment {
                fallback: format!("{}: {}", self.action_text, self.action_url),
                actions: vec![SlackAction {
                    kind: "button".to_string(),
                    text: self.action_text.clone(),
                    url: self.action_url.clone(),
                }],
            }],
        }
    }
}
