// src/web/mod.rs
//! HTTP functions: `hr-ai-analyze` and `pdf-ocr`, plus CORS preflight and health

pub mod handlers;
pub mod types;

pub use types::*;

use crate::config::{AppConfig, GatewaySettings};
use crate::gateway::{ChatGateway, GatewayClient};
use crate::types::{AnalysisResponse, HrAnalysisRequest, OcrRequest, OcrResponse};
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::{self, Json};
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{info, warn};

pub const MOUNT_POINT: &str = "/functions/v1";
const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "POST, GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", ALLOWED_HEADERS));
    }
}

#[post("/hr-ai-analyze", data = "<request>")]
pub async fn hr_ai_analyze(
    request: Result<Json<HrAnalysisRequest>, json::Error<'_>>,
    state: &State<ServerState>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    handlers::hr_ai_analyze_handler(request, state).await
}

#[post("/pdf-ocr", data = "<request>")]
pub async fn pdf_ocr(
    request: Result<Json<OcrRequest>, json::Error<'_>>,
    state: &State<ServerState>,
) -> Result<Json<OcrResponse>, ApiError> {
    handlers::pdf_ocr_handler(request, state).await
}

#[get("/health")]
pub async fn health(state: &State<ServerState>) -> Json<HealthResponse> {
    handlers::health_handler(state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Not found".to_string(),
    })
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Internal server error".to_string(),
    })
}

/// Assemble the server around any gateway implementation
pub fn build_rocket(
    gateway: Arc<dyn ChatGateway>,
    settings: GatewaySettings,
    gateway_configured: bool,
    port: u16,
) -> Rocket<Build> {
    // Page images travel base64-encoded inside the JSON body
    let limits = Limits::default().limit("json", 32.mebibytes());
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(ServerState {
            gateway,
            settings,
            gateway_configured,
        })
        .register(MOUNT_POINT, catchers![not_found, internal_error])
        .mount(MOUNT_POINT, routes![hr_ai_analyze, pdf_ocr, health, options])
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let settings = config.settings;
    let gateway = GatewayClient::from_env(&settings.gateway)?;
    let gateway_configured = gateway.has_api_key();

    if !gateway_configured {
        warn!(
            "{} is not set; analysis and OCR requests will fail",
            crate::gateway::client::API_KEY_ENV
        );
    }

    info!("Starting TalentAI functions server ({})", config.environment);
    info!("Server: http://0.0.0.0:{}{}", settings.port, MOUNT_POINT);
    info!("AI gateway: {}", settings.gateway.gateway_url);

    let _rocket = build_rocket(
        Arc::new(gateway),
        settings.gateway,
        gateway_configured,
        settings.port,
    )
    .launch()
    .await
    .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
