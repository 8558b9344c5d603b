//! HTTP client for the Anthropic messages endpoint

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CoachError, TextGenerator};
use crate::config::CoachSettings;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// First text block, or empty if there is none
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .find(|c| c.kind == "text")
            .and_then(|c| c.text)
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct AnthropicClient {
    endpoint: String,
    model: String,
    api_version: String,
    api_key: String,
    client: ureq::Agent,
}

impl AnthropicClient {
    pub fn new(settings: &CoachSettings, api_key: impl Into<String>) -> Self {
        let client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(settings.timeout_secs))
            .build();

        Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_version: settings.api_version.clone(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Build a client with the key read from the configured env var
    pub fn from_env(settings: &CoachSettings) -> Result<Self, CoachError> {
        Self::from_key(settings, std::env::var(&settings.api_key_env).ok())
    }

    /// Build a client from an optional key. Blank keys count as missing.
    pub fn from_key(settings: &CoachSettings, key: Option<String>) -> Result<Self, CoachError> {
        match key {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(settings, key.trim())),
            _ => Err(CoachError::MissingCredential(settings.api_key_env.clone())),
        }
    }
}

/// Stands in for the client when no key is configured. Every call fails
/// with [`CoachError::MissingCredential`].
pub struct Unconfigured {
    api_key_env: String,
}

impl Unconfigured {
    pub fn new(api_key_env: impl Into<String>) -> Self {
        Self {
            api_key_env: api_key_env.into(),
        }
    }
}

impl TextGenerator for Unconfigured {
    fn complete(&self, _messages: &[ChatMessage], _max_tokens: u32) -> Result<String> {
        Err(CoachError::MissingCredential(self.api_key_env.clone()).into())
    }
}

impl TextGenerator for AnthropicClient {
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages,
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", &self.api_version)
            .send_json(&request)
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => anyhow::bail!("API error: {}", code),
            Err(e) => return Err(e).context("Failed to reach coach service"),
        };

        let body: MessagesResponse = response
            .into_json()
            .context("Failed to parse coach response")?;
        Ok(body.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_block_wins() {
        let body: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "tool_use", "id": "x"}, {"type": "text", "text": "Hi"}, {"type": "text", "text": "later"}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_text(), "Hi");

        let empty: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert_eq!(empty.into_text(), "");
    }

    #[test]
    fn test_request_shape() {
        let messages = [ChatMessage::user("hello")];
        let request = MessagesRequest {
            model: "m",
            max_tokens: 300,
            messages: &messages,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_missing_credential() {
        let settings = CoachSettings {
            api_key_env: "HABITQUEST_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..CoachSettings::default()
        };
        assert!(matches!(
            AnthropicClient::from_env(&settings),
            Err(CoachError::MissingCredential(name)) if name == settings.api_key_env
        ));
        assert!(AnthropicClient::from_key(&settings, Some("  ".into())).is_err());
        assert!(AnthropicClient::from_key(&settings, Some("sk-test".into())).is_ok());
    }

    #[test]
    fn test_unconfigured_always_fails() {
        let err = Unconfigured::new("ANTHROPIC_API_KEY")
            .complete(&[ChatMessage::user("hi")], 10)
            .unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
