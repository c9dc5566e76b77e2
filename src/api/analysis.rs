use super::{decode_image, health_body, AppState, Failure, HealthBody};
use crate::analysis::fallback_guess;
use crate::models::PlaceGuess;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeImageRequest {
    image: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeImageResponse {
    success: bool,
    analysis: PlaceGuess,
}

pub(super) async fn analyze_image(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeImageRequest>, JsonRejection>,
) -> Response {
    let image = match payload {
        Ok(Json(AnalyzeImageRequest { image: Some(image) })) => image,
        Ok(_) => return Failure::response(StatusCode::BAD_REQUEST, "Image data required"),
        Err(rejection) => {
            warn!("Rejected /analyze-image body: {}", rejection.body_text());
            return Failure::response(StatusCode::BAD_REQUEST, "Image data required");
        }
    };

    let analysis = match decode_image(&image) {
        Ok(bytes) if bytes.is_empty() => fallback_guess("Image data is empty"),
        Ok(bytes) => {
            info!("Analyzing image ({} bytes)", bytes.len());
            state.analyzer.analyze(&bytes).await
        }
        Err(e) => {
            warn!("Could not decode image payload: {}", e);
            fallback_guess(format!("Invalid image data: {}", e))
        }
    };

    Json(AnalyzeImageResponse {
        success: true,
        analysis,
    })
    .into_response()
}

pub(super) async fn health() -> Json<HealthBody> {
    health_body("R8it Image Analysis API")
}
