use super::{decode_image, health_body, AppState, Failure, HealthBody};
use crate::gps::GpsExtraction;
use crate::location::GeocodeOutcome;
use crate::models::{CanonicalLocation, GpsCoordinate};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
pub(super) struct ExtractLocationRequest {
    image: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExtractLocationResponse {
    success: bool,
    has_gps: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<GpsCoordinate>,
    location: Option<CanonicalLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeRequest {
    latitude: Option<Value>,
    longitude: Option<Value>,
}

#[derive(Debug, Serialize)]
struct GeocodeResponse {
    success: bool,
    latitude: f64,
    longitude: f64,
    #[serde(flatten)]
    location: CanonicalLocation,
}

fn json_rejection(rejection: JsonRejection) -> Response {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Content-Type must be application/json".to_string()
        }
        other => format!("Invalid JSON body: {}", other.body_text()),
    };
    Failure::response(StatusCode::BAD_REQUEST, message)
}

pub(super) async fn extract_location(
    State(state): State<AppState>,
    payload: Result<Json<ExtractLocationRequest>, JsonRejection>,
) -> Response {
    let image = match payload {
        Ok(Json(ExtractLocationRequest { image: Some(image) })) => image,
        Ok(_) => {
            return Failure::response(
                StatusCode::BAD_REQUEST,
                "Missing \"image\" field in request",
            )
        }
        Err(rejection) => return json_rejection(rejection),
    };

    let bytes = match decode_image(&image) {
        Ok(bytes) => bytes,
        Err(e) => {
            return Failure::response(
                StatusCode::BAD_REQUEST,
                format!("Failed to decode image: {}", e),
            )
        }
    };

    info!("Extracting GPS coordinates from {} bytes", bytes.len());
    let extractor = state.extractor.clone();
    let extraction = match tokio::task::spawn_blocking(move || extractor.extract(&bytes)).await {
        Ok(extraction) => extraction,
        Err(e) => {
            error!("GPS extraction task failed: {}", e);
            return Failure::response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let coordinate = match extraction {
        GpsExtraction::Found(coordinate) => coordinate,
        GpsExtraction::NotFound(reason) => {
            info!("No GPS coordinates in image: {}", reason);
            return Json(ExtractLocationResponse {
                success: true,
                has_gps: false,
                coordinates: None,
                location: None,
                message: Some("No GPS data found in this image".to_string()),
                error: Some(reason),
            })
            .into_response();
        }
    };

    info!(
        "Reverse geocoding {}, {}",
        coordinate.latitude, coordinate.longitude
    );
    let response = match state.locations.lookup(coordinate).await {
        GeocodeOutcome::Found(location) => ExtractLocationResponse {
            success: true,
            has_gps: true,
            coordinates: Some(coordinate),
            location: Some(location),
            message: None,
            error: None,
        },
        GeocodeOutcome::NotFound(reason) => {
            warn!(
                "Coordinates {}, {} found but address lookup failed: {}",
                coordinate.latitude, coordinate.longitude, reason
            );
            ExtractLocationResponse {
                success: true,
                has_gps: true,
                coordinates: Some(coordinate),
                location: None,
                message: None,
                error: Some(format!("Unable to determine address: {}", reason)),
            }
        }
    };

    Json(response).into_response()
}

/// Numbers or numeric strings.
fn coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    payload: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Response {
    let (latitude, longitude) = match payload {
        Ok(Json(GeocodeRequest {
            latitude: Some(latitude),
            longitude: Some(longitude),
        })) => (latitude, longitude),
        Ok(_) => {
            return Failure::response(
                StatusCode::BAD_REQUEST,
                "Latitude and longitude are required",
            )
        }
        Err(rejection) => return json_rejection(rejection),
    };

    let (Some(latitude), Some(longitude)) =
        (coordinate_value(&latitude), coordinate_value(&longitude))
    else {
        return Failure::response(
            StatusCode::BAD_REQUEST,
            "Latitude and longitude must be numbers",
        );
    };

    let Some(coordinate) = GpsCoordinate::new(latitude, longitude) else {
        return Failure::response(
            StatusCode::BAD_REQUEST,
            format!("Coordinates out of range: {}, {}", latitude, longitude),
        );
    };

    match state.locations.lookup(coordinate).await {
        GeocodeOutcome::Found(location) => Json(GeocodeResponse {
            success: true,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            location,
        })
        .into_response(),
        GeocodeOutcome::NotFound(reason) => Failure::response(StatusCode::OK, reason),
    }
}

pub(super) async fn health() -> Json<HealthBody> {
    health_body("location-extraction")
}
