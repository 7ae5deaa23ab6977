//! HTTP routes

use crate::app_state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use clearflow_quality::{
    decode_lenient, Assessment, PhReadingView, PhSubmission, Quantity, TurbidityReadingView,
    TurbiditySubmission, WaterQualitySnapshot, TREATMENT_METHODS,
};
use clearflow_quality::purification::TreatmentMethod;
use common::logging::http_request_logger;
use common::{ApiMessage, AppError, HealthResponse};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, warn};

/// Acknowledgement of the legacy `/api/data` path, valid input or not
pub const LEGACY_ACK: &str = "Data received";

type Created = (StatusCode, Json<ApiMessage>);

fn created(message: &str) -> Created {
    (StatusCode::CREATED, Json(ApiMessage::new(message)))
}

/// Build the service router
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/ph", post(post_ph).get(get_ph))
        .route("/api/turbidity", post(post_turbidity).get(get_turbidity))
        .route("/api/water-quality", get(get_water_quality))
        .route("/api/water-quality/assessment", get(get_assessment))
        .route("/api/purification-methods", get(get_purification_methods))
        // Legacy sender path
        .route("/api/data", post(post_legacy).get(get_ph));

    let router = match static_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => {
            debug!("Serving dashboard from {:?}", dir);
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        },
        None => router.fallback(not_found),
    };

    router
        .layer(axum::middleware::from_fn(http_request_logger))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        state.service_name.as_ref(),
        crate::SERVICE_VERSION,
    ))
}

async fn post_ph(State(state): State<AppState>, body: Bytes) -> Result<Created, AppError> {
    let submission: PhSubmission = decode_lenient(&body);
    state.ingest.accept_ph(submission)?;
    Ok(created(Quantity::Ph.accepted_message()))
}

async fn get_ph(State(state): State<AppState>) -> Json<PhReadingView> {
    Json(state.query.ph_view())
}

async fn post_turbidity(State(state): State<AppState>, body: Bytes) -> Result<Created, AppError> {
    let submission: TurbiditySubmission = decode_lenient(&body);
    state.ingest.accept_turbidity(submission)?;
    Ok(created(Quantity::Turbidity.accepted_message()))
}

async fn get_turbidity(State(state): State<AppState>) -> Json<TurbidityReadingView> {
    Json(state.query.turbidity_view())
}

async fn get_water_quality(State(state): State<AppState>) -> Json<WaterQualitySnapshot> {
    Json(state.query.snapshot())
}

async fn get_assessment(State(state): State<AppState>) -> Json<Assessment> {
    Json(state.query.assessment())
}

async fn get_purification_methods() -> Json<Vec<TreatmentMethod>> {
    Json(TREATMENT_METHODS.to_vec())
}

/// Always 201; an invalid value is dropped without touching the store
async fn post_legacy(State(state): State<AppState>, body: Bytes) -> Created {
    let submission: PhSubmission = decode_lenient(&body);
    if state.ingest.accept_legacy(submission).is_none() {
        warn!("[pH via /api/data] Ignored invalid submission");
    }
    created(LEGACY_ACK)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route not found: {}", uri.path()))
}
