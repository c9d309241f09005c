// src/web/types.rs
use crate::analysis::AnalysisError;
use crate::config::GatewaySettings;
use crate::gateway::{ChatGateway, GatewayError};
use crate::ocr::OcrError;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;
use std::sync::Arc;

/// Shared by every route through Rocket managed state
pub struct ServerState {
    pub gateway: Arc<dyn ChatGateway>,
    pub settings: GatewaySettings,
    pub gateway_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub gateway_configured: bool,
    pub analysis_model: String,
    pub ocr_model: String,
}

/// Error returned by the function routes as `{"error": ...}` with its status
#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Status::InternalServerError, message)
    }

    /// Limit errors keep their upstream status, everything else is a 500
    fn from_gateway(error: GatewayError, upstream_message: &str) -> Self {
        match error {
            GatewayError::RateLimited => Self::new(Status::TooManyRequests, error.to_string()),
            GatewayError::PaymentRequired => Self::new(Status::PaymentRequired, error.to_string()),
            GatewayError::Upstream { .. } => Self::internal(upstream_message),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::Gateway(e) => Self::from_gateway(e, "AI analysis failed"),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<OcrError> for ApiError {
    fn from(error: OcrError) -> Self {
        match error {
            OcrError::Gateway(e) => Self::from_gateway(e, "OCR failed"),
            other => Self::internal(other.to_string()),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .respond_to(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_errors_keep_status() {
        let err = ApiError::from(AnalysisError::Gateway(GatewayError::RateLimited));
        assert_eq!(err.status, Status::TooManyRequests);
        assert_eq!(err.message, "Rate limit exceeded. Please try again later.");

        let err = ApiError::from(OcrError::Gateway(GatewayError::PaymentRequired));
        assert_eq!(err.status, Status::PaymentRequired);
        assert_eq!(err.message, "Usage limit reached. Please add credits.");
    }

    #[test]
    fn test_upstream_failure_is_generic_500() {
        let err = ApiError::from(AnalysisError::Gateway(GatewayError::Upstream {
            status: 503,
            body: "overloaded".to_string(),
        }));
        assert_eq!(err.status, Status::InternalServerError);
        assert_eq!(err.message, "AI analysis failed");
    }

    #[test]
    fn test_other_errors_carry_their_message() {
        let err = ApiError::from(OcrError::NoPages);
        assert_eq!(err.status, Status::InternalServerError);
        assert_eq!(err.message, "Page images are required");

        let err = ApiError::from(AnalysisError::Gateway(GatewayError::MissingApiKey(
            "AI_GATEWAY_API_KEY",
        )));
        assert_eq!(err.message, "AI_GATEWAY_API_KEY is not configured");
    }
}
