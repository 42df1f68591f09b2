//! Core data models for the company directory.
//!
//! Row types mirror the storage tables; request/response types are the
//! payloads of the directory capabilities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::LanguageMap;
use crate::localized::LocalizedText;

/// Identity of one real-world company, shared by all its localized rows.
pub type CompanyId = i64;

/// Registry id of a language code.
pub type LanguageId = i64;

/// Id of a `localized_name` row.
pub type NameId = i64;

/// Id of a `name_group` row.
pub type NameGroupId = i64;

/// Id of a `localized_tag` row.
pub type TagId = i64;

/// Id of a `tag_group` row.
pub type TagGroupId = i64;

// =============================================================================
// STORAGE ROWS
// =============================================================================

/// A registered language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Language {
    pub id: LanguageId,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// One language's rendering of a company name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedName {
    pub id: NameId,
    pub company_id: CompanyId,
    pub name_group_id: NameGroupId,
    pub language: String,
    pub text: String,
}

/// One language's rendering of a tag attached to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedTag {
    pub id: TagId,
    pub company_id: CompanyId,
    pub tag_group_id: TagGroupId,
    pub language: String,
    pub text: String,
}

/// The localized names of one company that translate each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameGroup {
    pub id: NameGroupId,
    pub company_id: CompanyId,
    pub member_ids: Vec<NameId>,
}

/// The localized rows of one semantic tag on one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagGroup {
    pub id: TagGroupId,
    pub company_id: CompanyId,
    pub member_ids: Vec<TagId>,
}

// =============================================================================
// READ MODELS
// =============================================================================

/// Every localized value of one company, in storage order.
///
/// Tags stay one entry per row; grouping by tag group happens when the view
/// is projected into a display language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedView {
    pub company_id: CompanyId,
    pub name: LocalizedText,
    pub tags: Vec<LocalizedTag>,
}

// =============================================================================
// REQUESTS / RESPONSES
// =============================================================================

/// Translations of one tag, keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TagTranslations {
    #[serde(alias = "tag_name")]
    pub translations: LanguageMap,
}

impl TagTranslations {
    pub fn new(translations: LanguageMap) -> Self {
        Self { translations }
    }
}

/// Request for creating a new company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateCompanyRequest {
    /// Company name per language. At least one entry is required.
    #[serde(alias = "company_name")]
    pub names: LanguageMap,
    /// Tags to attach; each entry becomes one tag group.
    #[serde(default)]
    pub tags: Vec<TagTranslations>,
}

/// A company rendered in one display language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompanyResponse {
    pub company_name: String,
    pub tags: Vec<String>,
}

/// One row of a name or tag search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompanySearchHit {
    pub company_name: String,
}

impl From<String> for CompanySearchHit {
    fn from(company_name: String) -> Self {
        Self { company_name }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
}
