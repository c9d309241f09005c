// src/analysis.rs
//! Recruitment analyses answered by the chat-completion gateway

use crate::gateway::content::parse_structured;
use crate::gateway::prompts::analysis_prompts;
use crate::gateway::{ChatGateway, ChatMessage, ChatRequest, GatewayError, ResponseFormat};
use crate::types::{AnalysisResponse, AnalysisType, HrAnalysisRequest};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

const ANALYSIS_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid analysis type")]
    InvalidType(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Failed to parse AI response: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct HrAnalyzer<'a> {
    gateway: &'a dyn ChatGateway,
    model: &'a str,
}

impl<'a> HrAnalyzer<'a> {
    pub fn new(gateway: &'a dyn ChatGateway, model: &'a str) -> Self {
        Self { gateway, model }
    }

    pub fn build_request(&self, analysis_type: AnalysisType, request: &HrAnalysisRequest) -> ChatRequest {
        let (system_prompt, user_prompt) = analysis_prompts(analysis_type, request);

        ChatRequest {
            model: self.model.to_string(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature: ANALYSIS_TEMPERATURE,
            max_tokens: None,
            response_format: analysis_type
                .wants_json()
                .then(ResponseFormat::json_object),
        }
    }

    pub async fn analyze(&self, request: &HrAnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let analysis_type: AnalysisType = request.analysis_type.parse().map_err(|_| {
            warn!("Rejected analysis type: {:?}", request.analysis_type);
            AnalysisError::InvalidType(request.analysis_type.clone())
        })?;

        info!("Running {} analysis", analysis_type);

        let chat_request = self.build_request(analysis_type, request);
        let content = self.gateway.complete(&chat_request).await?;

        let result = if analysis_type.wants_json() {
            parse_structured(&content)?
        } else {
            json!({ "response": content })
        };

        Ok(AnalysisResponse {
            analysis_type,
            result,
        })
    }
}
