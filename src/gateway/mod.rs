// src/gateway/mod.rs
//! Chat-completion gateway: wire types, error mapping and the trait the
//! analysis and OCR services talk to.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod content;
pub mod prompts;

pub use client::GatewayClient;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const USAGE_LIMIT_MESSAGE: &str = "Usage limit reached. Please add credits.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} is not configured")]
    MissingApiKey(&'static str),

    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    #[error("{}", USAGE_LIMIT_MESSAGE)]
    PaymentRequired,

    #[error("AI gateway returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("No response from AI")]
    EmptyContent,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GatewayError {
    /// Classify a non-success gateway status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => GatewayError::RateLimited,
            402 => GatewayError::PaymentRequired,
            _ => GatewayError::Upstream { status, body },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Content of the first choice; empty answers count as missing
    pub fn into_content(self) -> Result<String, GatewayError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(GatewayError::EmptyContent)
    }
}

/// Anything that can answer a chat-completion request with the first choice's text
#[rocket::async_trait]
pub trait ChatGateway: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            GatewayError::from_status(429, String::new()),
            GatewayError::RateLimited
        ));
        assert!(matches!(
            GatewayError::from_status(402, String::new()),
            GatewayError::PaymentRequired
        ));
        assert!(matches!(
            GatewayError::from_status(503, "busy".to_string()),
            GatewayError::Upstream { status: 503, .. }
        ));
    }

    #[test]
    fn test_multipart_message_wire_format() {
        let message = ChatMessage::user_parts(vec![
            ContentPart::Text {
                text: "Extract".to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/png;base64,AAAA".to_string(),
                },
            },
        ]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][1]["type"], "image_url");
        assert_eq!(
            value["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_optional_request_fields_are_omitted() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            temperature: 0.7,
            max_tokens: None,
            response_format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("response_format").is_none());
        assert_eq!(value["messages"][0]["content"], "s");
    }

    #[test]
    fn test_completion_content_extraction() {
        let completion: ChatCompletion = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(completion.into_content().unwrap(), "hi");

        let empty: ChatCompletion =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert!(matches!(
            empty.into_content(),
            Err(GatewayError::EmptyContent)
        ));

        let none: ChatCompletion = serde_json::from_str("{}").unwrap();
        assert!(matches!(none.into_content(), Err(GatewayError::EmptyContent)));
    }
}
