//! Languages, health and API description.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use corpdir_core::Language;

use crate::{ApiDoc, ApiError, AppState, WantedLanguage};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// List every registered language code.
#[utoipa::path(get, path = "/languages", tag = "System",
    params(("x-wanted-language" = String, Header, description = "Display language")),
    responses((status = 200, description = "Registered languages", body = [Language])))]
pub async fn list_languages(
    State(state): State<AppState>,
    _language: WantedLanguage,
) -> Result<Json<Vec<Language>>, ApiError> {
    Ok(Json(state.directory.list_languages().await?))
}

#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is up", body = HealthResponse)))]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Serve the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
