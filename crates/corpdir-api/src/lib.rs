//! # corpdir-api
//!
//! HTTP surface of the multilingual company directory.
//!
//! Every directory route requires the `x-wanted-language` header naming the
//! display language; `/health` and `/openapi.json` do not. Handlers only talk
//! to a [`CompanyDirectory`], so the router can be driven against any
//! implementation.

pub mod config;
pub mod error;
pub mod handlers;
pub mod import;
pub mod language;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info_span, Span};
use utoipa::OpenApi;
use uuid::Uuid;

use corpdir_core::CompanyDirectory;

pub use config::ApiConfig;
pub use error::ApiError;
pub use language::{WantedLanguage, WANTED_LANGUAGE_HEADER};

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn CompanyDirectory>,
}

impl AppState {
    pub fn new(directory: Arc<dyn CompanyDirectory>) -> Self {
        Self { directory }
    }
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Company Directory API",
        description = "Multilingual company directory: search by name or tag, lookup, and tag maintenance"
    ),
    paths(
        handlers::search::search_companies,
        handlers::search::search_tags,
        handlers::companies::get_company,
        handlers::companies::create_company,
        handlers::companies::add_company_tags,
        handlers::companies::delete_company_tag,
        handlers::companies::import_companies,
        handlers::system::list_languages,
        handlers::system::health_check,
    ),
    components(schemas(
        corpdir_core::CompanySearchHit,
        corpdir_core::CompanyResponse,
        corpdir_core::CreateCompanyRequest,
        corpdir_core::TagTranslations,
        corpdir_core::ImportSummary,
        corpdir_core::Language,
        handlers::system::HealthResponse,
    )),
    tags(
        (name = "Search", description = "Search companies by name or tag"),
        (name = "Companies", description = "Company lookup, creation and tags"),
        (name = "System", description = "Languages, health and API description")
    )
)]
pub struct ApiDoc;

/// Build the application router.
pub fn router(state: AppState, body_limit_bytes: usize) -> Router {
    use handlers::{companies, search, system};

    Router::new()
        .route("/search", get(search::search_companies))
        .route("/tags", get(search::search_tags))
        .route("/companies", post(companies::create_company))
        .route("/companies/import", post(companies::import_companies))
        .route("/companies/:company_name", get(companies::get_company))
        .route(
            "/companies/:company_name/tags",
            put(companies::add_company_tags),
        )
        .route(
            "/companies/:company_name/tags/:tag",
            delete(companies::delete_company_tag),
        )
        .route("/languages", get(system::list_languages))
        .route("/health", get(system::health_check))
        .route("/openapi.json", get(system::openapi_json))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(request_span)),
        )
        .with_state(state)
}

/// Span for one HTTP request, tagged with its correlation id.
fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
