use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::handlers::CheckHandler;
use crate::models::{FitCheckConfig, GradingInput, MaterialCategory};
use crate::services::{catalog, GradingError};

pub struct AppState {
    pub check_handler: Arc<CheckHandler>,
}

/// Body of POST /api/check. At least one of `input` / `imageBase64` must be
/// non-empty; the image payload is what the capture flow produced client-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub fit_check: Option<FitCheckConfig>,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn create_router(check_handler: Arc<CheckHandler>) -> Router {
    let state = Arc::new(AppState { check_handler });

    Router::new()
        .route("/api/check", post(check_product))
        .route("/api/materials", get(list_materials))
        .route("/api/brands", get(list_brands))
        .route("/api/lifecycle", get(lifecycle_timeline))
        .route("/api/history", get(check_history))
        .route("/api/analytics", get(check_analytics))
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new("static"))
        .with_state(state)
}

async fn check_product(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckRequest>,
) -> Response {
    let input = match build_grading_input(&request) {
        Ok(input) => input,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message })).into_response()
        }
    };

    match state.check_handler.check(input, request.fit_check).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            let status = match &e {
                GradingError::EmptyInput => StatusCode::BAD_REQUEST,
                GradingError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
                GradingError::Service(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ErrorBody { error: e.to_string() })).into_response()
        }
    }
}

fn build_grading_input(request: &CheckRequest) -> Result<GradingInput, String> {
    let text = request
        .input
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let image = match request.image_base64.as_deref().filter(|s| !s.is_empty()) {
        Some(payload) => Some(
            general_purpose::STANDARD
                .decode(payload)
                .map_err(|_| "imageBase64 is not valid base64".to_string())?,
        ),
        None => None,
    };

    match (text, image) {
        (Some(text), Some(bytes)) => Ok(GradingInput::text_and_image(
            text,
            bytes,
            request.mime_type.clone(),
        )),
        (Some(text), None) => Ok(GradingInput::text(text)),
        (None, Some(bytes)) => Ok(GradingInput::image(bytes, request.mime_type.clone())),
        (None, None) => Err("Nothing to analyze. Provide a product name, link, or photo.".to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct MaterialsQuery {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    q: Option<String>,
}

async fn list_materials(Query(query): Query<MaterialsQuery>) -> Response {
    let category = match query.category.as_deref() {
        None | Some("All") => None,
        Some("Natural") => Some(MaterialCategory::Natural),
        Some("Semi-Synthetic") => Some(MaterialCategory::SemiSynthetic),
        Some("Synthetic") => Some(MaterialCategory::Synthetic),
        Some(other) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: format!("Unknown material category: {}", other),
                }),
            )
                .into_response()
        }
    };

    let materials = catalog::filter_materials(category, query.q.as_deref().unwrap_or(""));
    Json(materials).into_response()
}

#[derive(Debug, Deserialize)]
struct BrandsQuery {
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    q: Option<String>,
}

async fn list_brands(Query(query): Query<BrandsQuery>) -> Response {
    let brands = catalog::filter_brands(
        query.price.as_deref().filter(|p| *p != "All"),
        query.location.as_deref().filter(|l| *l != "All"),
        query.q.as_deref().unwrap_or(""),
    );
    Json(brands).into_response()
}

async fn lifecycle_timeline() -> Response {
    Json(catalog::decomposition_timeline()).into_response()
}

async fn check_history(State(state): State<Arc<AppState>>) -> Response {
    Json(state.check_handler.recent_checks()).into_response()
}

async fn check_analytics(State(state): State<Arc<AppState>>) -> Response {
    Json(state.check_handler.analytics()).into_response()
}

async fn health_check() -> &'static str {
    "OK"
}
