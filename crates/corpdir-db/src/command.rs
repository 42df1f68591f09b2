//! Catalog command engine: the write side of the directory.
//!
//! Every method runs inside the transaction handed in by the caller and
//! leaves committing to it, so a failure at any step discards every row the
//! operation wrote, language registrations included.

use std::collections::{BTreeSet, HashMap, HashSet};

use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use corpdir_core::{
    dedup_preserving_order, normalize_language_map, CompanyId, CompanyResponse,
    CreateCompanyRequest, Error, LanguageId, LanguageMap, Result, TagGroupId, TagTranslations,
};

use crate::languages::PgLanguageRegistry;
use crate::query::{project_view, PgCatalogQuery};
use crate::store::{PgCatalogStore, TagGroupState};

/// Write-side engine over the catalog store and language registry.
#[derive(Clone)]
pub struct PgCatalogCommands {
    languages: PgLanguageRegistry,
    store: PgCatalogStore,
    query: PgCatalogQuery,
}

impl PgCatalogCommands {
    pub fn new(
        languages: PgLanguageRegistry,
        store: PgCatalogStore,
        query: PgCatalogQuery,
    ) -> Self {
        Self {
            languages,
            store,
            query,
        }
    }

    /// Create a company with its names and tags.
    ///
    /// The response carries the name in `display_language` (which must be one
    /// of the given names) and the new tags that have a `display_language`
    /// translation.
    pub async fn add_company_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        req: CreateCompanyRequest,
        display_language: &str,
    ) -> Result<CompanyResponse> {
        let names = normalize_language_map(&req.names)?;
        if names.is_empty() {
            return Err(Error::InvalidInput(
                "At least one company name is required".to_string(),
            ));
        }
        let tags = normalize_tags(&req.tags)?;
        let company_name = names.get(display_language).cloned().ok_or_else(|| {
            Error::InvalidInput(format!(
                "No company name given for display language '{}'",
                display_language
            ))
        })?;

        let name_rows = storage_rows(&names)?;
        let tag_rows = tags
            .iter()
            .map(storage_rows)
            .collect::<Result<Vec<_>>>()?;

        let language_ids = self
            .languages
            .ensure_tx(tx, &collect_codes(&names, &tags))
            .await?;

        let company_id = self.store.create_company_tx(tx).await?;
        let name_group_id = self.store.create_name_group_tx(tx, company_id).await?;

        if name_rows.len() < names.len() {
            debug!(
                subsystem = "db",
                component = "commands",
                op = "add_company",
                company_id,
                given = names.len(),
                stored = name_rows.len(),
                "Name shared by several languages stored once, ahead of the others"
            );
        }
        for (code, text) in &name_rows {
            let language_id = language_id(&language_ids, code)?;
            self.store
                .add_localized_name_tx(tx, company_id, name_group_id, language_id, text)
                .await?;
        }

        let groups = self
            .write_tag_groups_tx(tx, company_id, &tag_rows, &language_ids)
            .await?;

        info!(
            subsystem = "db",
            component = "commands",
            op = "add_company",
            company_id,
            name_count = name_rows.len(),
            tag_group_count = groups.len(),
            "Company created"
        );

        Ok(CompanyResponse {
            company_name,
            tags: fresh_tag_texts(&tags, display_language),
        })
    }

    /// Attach tags to the company owning `company_name`, then render the
    /// company in `display_language`.
    pub async fn add_tags_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_name: &str,
        tags: &[TagTranslations],
        display_language: &str,
    ) -> Result<CompanyResponse> {
        let tags = normalize_tags(tags)?;
        if tags.is_empty() {
            return Err(Error::InvalidInput(
                "At least one tag is required".to_string(),
            ));
        }

        let tag_rows = tags
            .iter()
            .map(storage_rows)
            .collect::<Result<Vec<_>>>()?;

        let company_id = self.resolve_company_tx(tx, company_name).await?;

        let codes = collect_codes(&LanguageMap::new(), &tags);
        let language_ids = self.languages.ensure_tx(tx, &codes).await?;
        let groups = self
            .write_tag_groups_tx(tx, company_id, &tag_rows, &language_ids)
            .await?;

        info!(
            subsystem = "db",
            component = "commands",
            op = "add_tags",
            company_id,
            tag_group_count = groups.len(),
            "Tags added"
        );

        self.render_tx(tx, company_id, display_language).await
    }

    /// Remove the tag whose text (in any language) equals `tag_text`.
    ///
    /// Every translation grouped with a matching row is removed as well, so the
    /// tag disappears from all languages. `NotFound` when nothing matches.
    pub async fn delete_tag_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_name: &str,
        tag_text: &str,
        display_language: &str,
    ) -> Result<CompanyResponse> {
        let company_id = self.resolve_company_tx(tx, company_name).await?;
        let tag_text = tag_text.trim();

        let view = self.query.localized_view(&mut **tx, company_id).await?;
        let matched_groups: Vec<TagGroupId> = {
            let mut seen = HashSet::new();
            view.tags
                .iter()
                .filter(|t| t.text == tag_text)
                .map(|t| t.tag_group_id)
                .filter(|id| seen.insert(*id))
                .collect()
        };

        if matched_groups.is_empty() {
            return Err(Error::NotFound(format!(
                "Tag '{}' on company '{}'",
                tag_text, company_name
            )));
        }

        let mut deleted_rows = 0usize;
        let mut deleted_groups = 0usize;
        for group_id in &matched_groups {
            for tag in view.tags.iter().filter(|t| t.tag_group_id == *group_id) {
                let state = self.store.delete_tag_tx(tx, tag.id, *group_id).await?;
                deleted_rows += 1;
                if state == TagGroupState::Deleted {
                    deleted_groups += 1;
                }
            }
        }

        info!(
            subsystem = "db",
            component = "commands",
            op = "delete_tag",
            company_id,
            row_count = deleted_rows,
            tag_group_count = deleted_groups,
            "Tag removed"
        );

        self.render_tx(tx, company_id, display_language).await
    }

    async fn resolve_company_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_name: &str,
    ) -> Result<CompanyId> {
        self.query
            .find_company_by_exact_name(&mut **tx, company_name.trim())
            .await?
            .ok_or_else(|| Error::NotFound(format!("Company '{}'", company_name.trim())))
    }

    async fn render_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_id: CompanyId,
        display_language: &str,
    ) -> Result<CompanyResponse> {
        let view = self.query.localized_view(&mut **tx, company_id).await?;
        project_view(&view, display_language)
            .ok_or_else(|| Error::NotFound(format!("Names of company {}", company_id)))
    }

    /// One tag group per translation map, rows written in storage order.
    async fn write_tag_groups_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_id: CompanyId,
        tags: &[Vec<(&str, &str)>],
        language_ids: &HashMap<String, LanguageId>,
    ) -> Result<Vec<TagGroupId>> {
        let mut groups = Vec::with_capacity(tags.len());
        for rows in tags {
            let group_id = self.store.create_tag_group_tx(tx, company_id).await?;
            for &(code, text) in rows {
                let language_id = language_id(language_ids, code)?;
                self.store
                    .add_localized_tag_tx(tx, company_id, group_id, language_id, text)
                    .await?;
            }
            groups.push(group_id);
        }
        Ok(groups)
    }
}

/// Normalize tag translation maps, dropping empty ones.
fn normalize_tags(tags: &[TagTranslations]) -> Result<Vec<LanguageMap>> {
    tags.iter()
        .filter(|t| !t.translations.is_empty())
        .map(|t| normalize_language_map(&t.translations))
        .collect()
}

/// Every language code used by the names and tags of one request.
fn collect_codes(names: &LanguageMap, tags: &[LanguageMap]) -> BTreeSet<String> {
    names
        .keys()
        .chain(tags.iter().flat_map(|t| t.keys()))
        .cloned()
        .collect()
}

/// Rows to store for one names or tag map, in write order.
///
/// Texts are unique inside one group, so a text given for several languages
/// is stored once, under the first of them. That row is written before every
/// other row: the languages left without a row of their own then resolve to
/// it through the fallback rule. Only one text can take that first place, so
/// a map with two different shared texts is `InvalidInput`.
fn storage_rows(map: &LanguageMap) -> Result<Vec<(&str, &str)>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for text in map.values() {
        *counts.entry(text.as_str()).or_default() += 1;
    }

    let mut shared: Vec<(&str, &str)> = Vec::new();
    for (code, text) in map {
        if counts[text.as_str()] > 1 && !shared.iter().any(|(_, t)| *t == text.as_str()) {
            shared.push((code.as_str(), text.as_str()));
        }
    }

    match shared.as_slice() {
        [] => Ok(map.iter().map(|(c, t)| (c.as_str(), t.as_str())).collect()),
        [first] => {
            let (_, shared_text) = *first;
            let mut rows = vec![*first];
            rows.extend(
                map.iter()
                    .filter(|(_, t)| t.as_str() != shared_text)
                    .map(|(c, t)| (c.as_str(), t.as_str())),
            );
            Ok(rows)
        }
        [(_, a), (_, b), ..] => Err(Error::InvalidInput(format!(
            "Texts '{}' and '{}' are each given for several languages; \
             only one text may be shared between languages",
            a, b
        ))),
    }
}

/// Texts of the given tags in `language`, deduplicated.
fn fresh_tag_texts(tags: &[LanguageMap], language: &str) -> Vec<String> {
    dedup_preserving_order(tags.iter().filter_map(|t| t.get(language).cloned()))
}

fn language_id(ids: &HashMap<String, LanguageId>, code: &str) -> Result<LanguageId> {
    ids.get(code)
        .copied()
        .ok_or_else(|| Error::NotFound(format!("Language '{}' not registered", code)))
}
