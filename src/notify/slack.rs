//! Slack incoming-webhook client

use super::{MessageTemplate, Notifier, SlackMessage};
use crate::config::Config;
use crate::error::NotifyError;

/// Posts change notifications to a Slack incoming webhook
pub struct SlackNotifier {
    webhook_url: String,
    template: MessageTemplate,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Create a notifier posting to `webhook_url`
    pub fn new(webhook_url: &str, template: MessageTemplate) -> Self {
        Self {
            webhook_url: webhook_url.to_string(),
            template,
            client: reqwest::Client::new(),
        }
    }

    /// Create from the Slack section of the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.slack.webhook_url, MessageTemplate::from_config(config))
    }

    /// Render the message that would be posted for `text`
    pub fn message(&self, text: &str) -> SlackMessage {
        self.template.render(text)
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let message = self.message(text);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(NotifyError::Request)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        tracing::debug!("Posted notification to {}", self.template.channel);
        Ok(())
    }
}
