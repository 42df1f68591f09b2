//! The narrow service interface external callers use.
//!
//! HTTP handlers and the bulk importer only ever talk to a
//! [`CompanyDirectory`]; the PostgreSQL implementation lives in `corpdir-db`.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

/// Search, lookup and maintenance of the multilingual company directory.
///
/// Every method takes the caller's display language explicitly. Write methods
/// are all-or-nothing: a failure leaves no partial rows behind.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// Company names containing `query` (in any language), rendered in `language`.
    async fn search_names(&self, query: &str, language: &str) -> Result<Vec<String>>;

    /// Companies carrying the exact tag text (in any language), rendered in `language`.
    async fn search_by_tag(&self, tag: &str, language: &str) -> Result<Vec<String>>;

    /// Look a company up by any of its localized names.
    ///
    /// Returns `Ok(None)` when no company has that name.
    async fn lookup(&self, company_name: &str, language: &str) -> Result<Option<CompanyResponse>>;

    /// Create a company with its localized names and tags.
    async fn create_company(
        &self,
        req: CreateCompanyRequest,
        language: &str,
    ) -> Result<CompanyResponse>;

    /// Attach tags to an existing company. `Error::NotFound` if the company is unknown.
    async fn add_tags(
        &self,
        company_name: &str,
        tags: Vec<TagTranslations>,
        language: &str,
    ) -> Result<CompanyResponse>;

    /// Remove a tag (all its translations) by the text of any translation.
    ///
    /// `Error::NotFound` if the company or the tag is unknown.
    async fn remove_tag(
        &self,
        company_name: &str,
        tag: &str,
        language: &str,
    ) -> Result<CompanyResponse>;

    /// All registered languages in registration order.
    async fn list_languages(&self) -> Result<Vec<Language>>;
}
