// src/gateway/client.rs
use super::{ChatCompletion, ChatGateway, ChatRequest, GatewayError};
use crate::config::GatewaySettings;
use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, error, info};

pub const API_KEY_ENV: &str = "AI_GATEWAY_API_KEY";

/// OpenAI-compatible chat-completion endpoint reached over HTTPS
pub struct GatewayClient {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl GatewayClient {
    pub fn new(settings: &GatewaySettings, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            url: settings.gateway_url.clone(),
        })
    }

    /// Build a client reading the key from `AI_GATEWAY_API_KEY`. A missing key
    /// is not fatal here; every request reports it instead.
    pub fn from_env(settings: &GatewaySettings) -> Result<Self> {
        Self::new(settings, std::env::var(API_KEY_ENV).ok())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[rocket::async_trait]
impl ChatGateway for GatewayClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingApiKey(API_KEY_ENV))?;

        debug!(
            "Sending chat completion to {} (model: {})",
            self.url, request.model
        );

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("AI gateway error {}: {}", status, error_text);
            return Err(GatewayError::from_status(status.as_u16(), error_text));
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion.into_content()?;

        info!(
            "Received {} characters from AI gateway (model: {})",
            content.len(),
            request.model
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ChatMessage;

    fn settings() -> GatewaySettings {
        GatewaySettings::default()
    }

    #[test]
    fn test_blank_key_is_treated_as_missing() {
        let client = GatewayClient::new(&settings(), Some("  ".to_string())).unwrap();
        assert!(!client.has_api_key());

        let client = GatewayClient::new(&settings(), Some("sk-test".to_string())).unwrap();
        assert!(client.has_api_key());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let client = GatewayClient::new(&settings(), None).unwrap();
        let request = ChatRequest {
            model: "test-model".to_string(),
            messages: vec![ChatMessage::user("hello")],
            temperature: 0.7,
            max_tokens: None,
            response_format: None,
        };

        let err = client.complete(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "AI_GATEWAY_API_KEY is not configured");
    }
}
