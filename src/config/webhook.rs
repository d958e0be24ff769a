//! Webhook reply and authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::application::handlers::exemption::DEFAULT_SUPPORT_CONTACT;
use crate::application::ReplySettings;
use crate::domain::conversation::DEFAULT_MAX_REPLY_CHARS;

/// Webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Maximum characters per reply segment
    #[serde(default = "default_max_reply_chars")]
    pub max_reply_chars: usize,

    /// Who users are told to contact when the conversation breaks
    #[serde(default = "default_support_contact")]
    pub support_contact: String,

    /// Shared token expected in the `X-Webhook-Token` header
    pub auth_token: Option<SecretString>,
}

impl WebhookConfig {
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
            .filter(|token| !token.is_empty())
    }

    pub fn reply_settings(&self) -> ReplySettings {
        ReplySettings::new(self.max_reply_chars, self.support_contact.clone())
    }

    /// Validate webhook configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if !(100..=4096).contains(&self.max_reply_chars) {
            return Err(ValidationError::InvalidReplyLimit);
        }
        if self.support_contact.trim().is_empty() {
            return Err(ValidationError::EmptySupportContact);
        }
        if *environment == Environment::Production && self.auth_token().is_none() {
            return Err(ValidationError::WebhookTokenRequired);
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            max_reply_chars: default_max_reply_chars(),
            support_contact: default_support_contact(),
            auth_token: None,
        }
    }
}

fn default_max_reply_chars() -> usize {
    DEFAULT_MAX_REPLY_CHARS
}

fn default_support_contact() -> String {
    DEFAULT_SUPPORT_CONTACT.to_string()
}
