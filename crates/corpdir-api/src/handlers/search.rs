//! Name and tag search handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use corpdir_core::CompanySearchHit;

use crate::{ApiError, AppState, WantedLanguage};

/// Query parameters shared by the search endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Text to search for
    pub query: Option<String>,
}

impl SearchQuery {
    fn required(self) -> Result<String, ApiError> {
        self.query
            .ok_or_else(|| ApiError::BadRequest("Missing required parameter 'query'".to_string()))
    }
}

/// Search companies whose name contains the query, in any language.
///
/// # Returns
/// - 200 OK with the matching company names rendered in the wanted language
/// - 400 Bad Request if the header or the `query` parameter is missing
#[utoipa::path(get, path = "/search", tag = "Search",
    params(SearchQuery, ("x-wanted-language" = String, Header, description = "Display language")),
    responses((status = 200, description = "Matching companies", body = [CompanySearchHit])))]
pub async fn search_companies(
    State(state): State<AppState>,
    language: WantedLanguage,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CompanySearchHit>>, ApiError> {
    let query = query.required()?;
    let names = state
        .directory
        .search_names(&query, language.as_str())
        .await?;
    Ok(Json(names.into_iter().map(CompanySearchHit::from).collect()))
}

/// Search companies carrying a tag, matched exactly in any language.
///
/// # Returns
/// - 200 OK with one entry per tagged company
/// - 400 Bad Request if the header or the `query` parameter is missing
#[utoipa::path(get, path = "/tags", tag = "Search",
    params(SearchQuery, ("x-wanted-language" = String, Header, description = "Display language")),
    responses((status = 200, description = "Tagged companies", body = [CompanySearchHit])))]
pub async fn search_tags(
    State(state): State<AppState>,
    language: WantedLanguage,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CompanySearchHit>>, ApiError> {
    let query = query.required()?;
    let names = state
        .directory
        .search_by_tag(&query, language.as_str())
        .await?;
    Ok(Json(names.into_iter().map(CompanySearchHit::from).collect()))
}
