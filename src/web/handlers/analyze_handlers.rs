// src/web/handlers/analyze_handlers.rs
use crate::analysis::HrAnalyzer;
use crate::types::{AnalysisResponse, HrAnalysisRequest};
use crate::web::types::{ApiError, ServerState};
use rocket::serde::json::{self, Json};
use rocket::State;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub async fn hr_ai_analyze_handler(
    request: Result<Json<HrAnalysisRequest>, json::Error<'_>>,
    state: &State<ServerState>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let request = request.map_err(|e| {
        error!("Unreadable analysis request: {}", e);
        ApiError::internal(e.to_string())
    })?;

    let span = info_span!(
        "hr_ai_analyze",
        request_id = %Uuid::new_v4(),
        analysis_type = %request.analysis_type
    );

    async {
        let analyzer = HrAnalyzer::new(state.gateway.as_ref(), &state.settings.analysis_model);
        match analyzer.analyze(&request).await {
            Ok(response) => {
                info!("Analysis completed");
                Ok(Json(response))
            }
            Err(e) => {
                error!("HR AI analysis error: {}", e);
                Err(ApiError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}
