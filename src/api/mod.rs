//! HTTP surface: the image-analysis routes and the location routes.

mod analysis;
mod location;

use crate::analysis::PlaceAnalyzer;
use crate::gps::GpsExtractor;
use crate::location::LocationService;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine as _;
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Phone photos travel base64-encoded inside JSON, well past axum's 2 MB default.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
const API_VERSION: &str = "1.0.0";

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<PlaceAnalyzer>,
    pub locations: Arc<LocationService>,
    pub extractor: Arc<GpsExtractor>,
}

/// Which route groups a process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ServiceSet {
    Analysis,
    Location,
    #[default]
    All,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

fn health_body(service: &'static str) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        service,
        version: API_VERSION,
    })
}

/// `{"success": false, "error": ...}` with the given status.
#[derive(Debug, Serialize)]
pub(crate) struct Failure {
    success: bool,
    error: String,
}

impl Failure {
    pub(crate) fn response(status: StatusCode, error: impl Into<String>) -> Response {
        (
            status,
            Json(Failure {
                success: false,
                error: error.into(),
            }),
        )
            .into_response()
    }
}

/// Drop an optional `data:image/...;base64,` prefix.
pub(crate) fn strip_data_uri(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}

pub(crate) fn decode_image(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = strip_data_uri(payload)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD.decode(cleaned)
}

pub fn analysis_router() -> Router<AppState> {
    Router::new()
        .route("/analyze-image", post(analysis::analyze_image))
        .route("/health", get(analysis::health))
}

fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/extract-location", post(location::extract_location))
        .route("/geocode", post(location::geocode))
}

pub fn location_router() -> Router<AppState> {
    location_routes().route("/health", get(location::health))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Request handler panicked: {}", detail);
    Failure::response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub fn build_app(state: AppState, services: ServiceSet) -> Router {
    let routes = match services {
        ServiceSet::Analysis => analysis_router(),
        ServiceSet::Location => location_router(),
        // Both groups define /health; the location one moves aside
        ServiceSet::All => analysis_router()
            .merge(location_routes())
            .route("/location/health", get(location::health)),
    };

    routes
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                        tracing::info_span!(
                            "request",
                            id = %Uuid::new_v4(),
                            method = %req.method(),
                            uri = %req.uri(),
                        )
                    }),
                )
                .layer(build_cors())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
