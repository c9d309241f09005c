// src/client/api.rs
//! Client for the two HTTP functions

use crate::types::{
    AnalysisType, AtsResult, CareerInsight, HrAnalysisRequest, JobMatchResult, OcrRequest,
    OcrResponse, SalaryPrediction,
};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace, warn};

const ANALYZE_ENDPOINT: &str = "/hr-ai-analyze";
const OCR_ENDPOINT: &str = "/pdf-ocr";

const DEFAULT_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("AI usage limit reached. Please add credits to continue.")]
    QuotaExceeded,

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Response did not contain a result")]
    MissingResult,

    #[error("AI returned an unstructured response: {0}")]
    Unstructured(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Rate and usage limits: retrying now would only fail again
    pub fn is_limit(&self) -> bool {
        matches!(self, ClientError::RateLimited | ClientError::QuotaExceeded)
    }
}

/// Map a function response onto its JSON body or a typed error
pub fn interpret_response(status: u16, body: &str) -> Result<Value, ClientError> {
    match status {
        429 => return Err(ClientError::RateLimited),
        402 => return Err(ClientError::QuotaExceeded),
        _ => {}
    }

    let success = (200..300).contains(&status);
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(_) if !success => {
            return Err(ClientError::Remote {
                status,
                message: format!("Request failed with status {}", status),
            })
        }
        Err(e) => return Err(ClientError::Decode(e)),
    };

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(ClientError::Remote {
            status,
            message: message.to_string(),
        });
    }

    if !success {
        return Err(ClientError::Remote {
            status,
            message: format!("Request failed with status {}", status),
        });
    }

    Ok(value)
}

/// Decode an analysis `result` into its typed shape. Answers the server could
/// not parse arrive as `{"rawResponse": ...}` and are rejected here.
pub fn decode_result<R: DeserializeOwned>(result: Value) -> Result<R, ClientError> {
    if let Some(raw) = result.get("rawResponse") {
        let raw = raw.as_str().map(str::to_string).unwrap_or_else(|| raw.to_string());
        return Err(ClientError::Unstructured(raw));
    }
    Ok(serde_json::from_value(result)?)
}

pub struct HrApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HrApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn post<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(payload);
        if let Some(key) = &self.api_key {
            request = request
                .header("Authorization", format!("Bearer {}", key))
                .header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        trace!("Response status {} from {}", status, url);

        interpret_response(status, &body).inspect_err(|e| warn!("{} failed: {}", endpoint, e))
    }

    /// Run one analysis and return its `result` payload
    pub async fn analyze(&self, request: &HrAnalysisRequest) -> Result<Value, ClientError> {
        let mut body = self.post(ANALYZE_ENDPOINT, request).await?;
        match body.get_mut("result").map(Value::take) {
            Some(result) if !result.is_null() => Ok(result),
            _ => Err(ClientError::MissingResult),
        }
    }

    async fn analyze_as<R: DeserializeOwned>(&self, request: &HrAnalysisRequest) -> Result<R, ClientError> {
        let result = self.analyze(request).await?;
        decode_result(result)
    }

    pub async fn analyze_ats(&self, resume_text: &str) -> Result<AtsResult, ClientError> {
        let request = HrAnalysisRequest {
            resume_text: Some(resume_text.to_string()),
            ..HrAnalysisRequest::new(AnalysisType::AtsScore)
        };
        self.analyze_as(&request).await
    }

    pub async fn match_job(&self, resume_text: &str, job_description: &str) -> Result<JobMatchResult, ClientError> {
        let request = HrAnalysisRequest {
            resume_text: Some(resume_text.to_string()),
            job_description: Some(job_description.to_string()),
            ..HrAnalysisRequest::new(AnalysisType::JobMatch)
        };
        self.analyze_as(&request).await
    }

    pub async fn predict_salary(
        &self,
        job_title: &str,
        location: &str,
        experience: &str,
        skills: &[String],
    ) -> Result<SalaryPrediction, ClientError> {
        let request = HrAnalysisRequest {
            job_title: Some(job_title.to_string()),
            location: Some(location.to_string()),
            experience: Some(experience.to_string()),
            skills: Some(skills.to_vec()),
            ..HrAnalysisRequest::new(AnalysisType::SalaryPredict)
        };
        self.analyze_as(&request).await
    }

    pub async fn ask_career_insight(&self, question: &str) -> Result<String, ClientError> {
        let request = HrAnalysisRequest {
            question: Some(question.to_string()),
            ..HrAnalysisRequest::new(AnalysisType::CareerInsight)
        };
        let insight: CareerInsight = self.analyze_as(&request).await?;
        Ok(insight.response)
    }

    pub async fn ocr_pages(&self, pages: Vec<String>, filename: Option<&str>) -> Result<OcrResponse, ClientError> {
        let request = OcrRequest {
            pages,
            filename: filename.map(str::to_string),
        };
        let body = self.post(OCR_ENDPOINT, &request).await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_statuses_win_over_body() {
        let body = r#"{"error": "Rate limit exceeded. Please try again later."}"#;
        assert!(matches!(
            interpret_response(429, body),
            Err(ClientError::RateLimited)
        ));
        assert!(matches!(
            interpret_response(402, "not json"),
            Err(ClientError::QuotaExceeded)
        ));
        assert!(ClientError::QuotaExceeded.is_limit());
    }

    #[test]
    fn test_server_error_message_is_surfaced() {
        let err = interpret_response(500, r#"{"error": "AI analysis failed"}"#).unwrap_err();
        assert!(!err.is_limit());
        assert_eq!(err.to_string(), "AI analysis failed");
    }

    #[test]
    fn test_error_field_in_success_body_is_a_failure() {
        let err = interpret_response(200, r#"{"error": "Invalid analysis type"}"#).unwrap_err();
        assert!(matches!(err, ClientError::Remote { status: 200, .. }));
    }

    #[test]
    fn test_non_json_failure() {
        let err = interpret_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_success_body_is_returned() {
        let value = interpret_response(200, r#"{"type": "ats_score", "result": {}}"#).unwrap();
        assert_eq!(value["type"], "ats_score");
    }

    #[test]
    fn test_raw_response_is_not_a_result() {
        let err = decode_result::<JobMatchResult>(serde_json::json!({
            "rawResponse": "I cannot evaluate this candidate."
        }))
        .unwrap_err();
        assert!(matches!(err, ClientError::Unstructured(ref raw) if raw == "I cannot evaluate this candidate."));
        assert!(!err.is_limit());
    }

    #[test]
    fn test_structured_result_is_decoded() {
        let result: JobMatchResult =
            decode_result(serde_json::json!({ "matchScore": 64, "recommendation": "consider" })).unwrap();
        assert_eq!(result.match_score, 64);
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = HrApiClient::new("http://localhost:8000/functions/v1/", None).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/functions/v1");
    }
}
