//! Company lookup and maintenance handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use corpdir_core::{CompanyResponse, CreateCompanyRequest, ImportSummary, TagTranslations};

use crate::import::{import_rows, parse_csv};
use crate::{ApiError, AppState, WantedLanguage};

/// Get a company by any of its localized names.
///
/// # Returns
/// - 200 OK with the company rendered in the wanted language
/// - 404 Not Found if no company has that name
#[utoipa::path(get, path = "/companies/{company_name}", tag = "Companies",
    params(
        ("company_name" = String, Path, description = "Company name in any language"),
        ("x-wanted-language" = String, Header, description = "Display language")
    ),
    responses(
        (status = 200, description = "Company", body = CompanyResponse),
        (status = 404, description = "Unknown company")
    ))]
pub async fn get_company(
    State(state): State<AppState>,
    language: WantedLanguage,
    Path(company_name): Path<String>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let company = state
        .directory
        .lookup(&company_name, language.as_str())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Company '{}' not found", company_name)))?;
    Ok(Json(company))
}

/// Create a company with its localized names and tags.
///
/// # Returns
/// - 201 Created with the new company rendered in the wanted language
/// - 400 Bad Request if the names are empty or lack the wanted language
#[utoipa::path(post, path = "/companies", tag = "Companies",
    params(("x-wanted-language" = String, Header, description = "Display language")),
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Created", body = CompanyResponse),
        (status = 400, description = "Invalid input")
    ))]
pub async fn create_company(
    State(state): State<AppState>,
    language: WantedLanguage,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    let created = state
        .directory
        .create_company(req, language.as_str())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Attach tags to a company.
///
/// # Returns
/// - 200 OK with the company and all its tags in the wanted language
/// - 404 Not Found if no company has that name
#[utoipa::path(put, path = "/companies/{company_name}/tags", tag = "Companies",
    params(
        ("company_name" = String, Path, description = "Company name in any language"),
        ("x-wanted-language" = String, Header, description = "Display language")
    ),
    request_body = [TagTranslations],
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 404, description = "Unknown company")
    ))]
pub async fn add_company_tags(
    State(state): State<AppState>,
    language: WantedLanguage,
    Path(company_name): Path<String>,
    Json(tags): Json<Vec<TagTranslations>>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let updated = state
        .directory
        .add_tags(&company_name, tags, language.as_str())
        .await?;
    Ok(Json(updated))
}

/// Remove a tag, named by its text in any language, with all its translations.
///
/// # Returns
/// - 200 OK with the company and its remaining tags
/// - 404 Not Found if the company or the tag is unknown
#[utoipa::path(delete, path = "/companies/{company_name}/tags/{tag}", tag = "Companies",
    params(
        ("company_name" = String, Path, description = "Company name in any language"),
        ("tag" = String, Path, description = "Tag text in any language"),
        ("x-wanted-language" = String, Header, description = "Display language")
    ),
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 404, description = "Unknown company or tag")
    ))]
pub async fn delete_company_tag(
    State(state): State<AppState>,
    language: WantedLanguage,
    Path((company_name, tag)): Path<(String, String)>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let updated = state
        .directory
        .remove_tag(&company_name, &tag, language.as_str())
        .await?;
    Ok(Json(updated))
}

/// Import companies from a CSV document.
///
/// Each row is created on its own; failed rows are counted, not fatal.
///
/// # Returns
/// - 200 OK with the number of imported and failed rows
/// - 400 Bad Request if the CSV cannot be parsed
#[utoipa::path(post, path = "/companies/import", tag = "Companies",
    params(("x-wanted-language" = String, Header, description = "Display language")),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import summary", body = ImportSummary),
        (status = 400, description = "Malformed CSV")
    ))]
pub async fn import_companies(
    State(state): State<AppState>,
    _language: WantedLanguage,
    body: String,
) -> Result<Json<ImportSummary>, ApiError> {
    let rows = parse_csv(body.as_bytes())?;
    let summary = import_rows(state.directory.as_ref(), rows).await;
    Ok(Json(summary))
}
