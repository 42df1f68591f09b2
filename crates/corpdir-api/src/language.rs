//! The `x-wanted-language` request header.

use axum::{extract::FromRequestParts, http::request::Parts};

use corpdir_core::normalize_language_code;

use crate::ApiError;

/// Header naming the caller's display language.
pub const WANTED_LANGUAGE_HEADER: &str = "x-wanted-language";

/// Normalized display language of the request.
///
/// Rejects the request with 400 when the header is missing or is not a valid
/// language code. Declare it before any body extractor so the check runs
/// before the body is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WantedLanguage(pub String);

impl WantedLanguage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for WantedLanguage
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(WANTED_LANGUAGE_HEADER).ok_or_else(|| {
            ApiError::BadRequest(format!("Missing required header '{}'", WANTED_LANGUAGE_HEADER))
        })?;

        let raw = value.to_str().map_err(|_| {
            ApiError::BadRequest(format!(
                "Header '{}' must be a plain ASCII language code",
                WANTED_LANGUAGE_HEADER
            ))
        })?;

        Ok(Self(normalize_language_code(raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    async fn extract(header: Option<&str>) -> Result<WantedLanguage, ApiError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(WANTED_LANGUAGE_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        WantedLanguage::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_is_normalized() {
        let language = extract(Some(" KO ")).await.unwrap();
        assert_eq!(language.as_str(), "ko");
    }

    #[tokio::test]
    async fn test_missing_header_is_bad_request() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_code_is_bad_request() {
        let err = extract(Some("en_US")).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
