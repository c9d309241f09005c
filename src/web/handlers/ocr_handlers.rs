// src/web/handlers/ocr_handlers.rs
use crate::ocr::PageReader;
use crate::types::{OcrRequest, OcrResponse};
use crate::web::types::{ApiError, ServerState};
use rocket::serde::json::{self, Json};
use rocket::State;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

pub async fn pdf_ocr_handler(
    request: Result<Json<OcrRequest>, json::Error<'_>>,
    state: &State<ServerState>,
) -> Result<Json<OcrResponse>, ApiError> {
    let request = request.map_err(|e| {
        error!("Unreadable OCR request: {}", e);
        ApiError::internal(e.to_string())
    })?;

    let span = info_span!(
        "pdf_ocr",
        request_id = %Uuid::new_v4(),
        pages = request.pages.len()
    );

    let reader = PageReader::new(state.gateway.as_ref(), &state.settings.ocr_model);
    reader
        .extract(&request)
        .instrument(span)
        .await
        .map(Json)
        .map_err(|e| {
            error!("PDF OCR error: {}", e);
            ApiError::from(e)
        })
}
