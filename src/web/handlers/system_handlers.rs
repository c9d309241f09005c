// src/web/handlers/system_handlers.rs
use crate::web::types::{HealthResponse, ServerState};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn health_handler(state: &State<ServerState>) -> Json<HealthResponse> {
    if state.gateway_configured {
        info!("Health check");
    } else {
        warn!("Health check: AI gateway key is not configured");
    }

    Json(HealthResponse {
        status: "ok".to_string(),
        gateway_configured: state.gateway_configured,
        analysis_model: state.settings.analysis_model.clone(),
        ocr_model: state.settings.ocr_model.clone(),
    })
}
