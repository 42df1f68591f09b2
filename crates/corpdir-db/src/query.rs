//! Catalog query engine: the read side of the directory.
//!
//! Resolves companies by localized name or tag and renders them in a display
//! language. Rendering follows one rule everywhere: use the requested
//! language when the entity has it, otherwise the first value in storage
//! order; entities without any value are left out. Rendered lists are
//! deduplicated.

use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::debug;

use corpdir_core::{
    dedup_preserving_order, CompanyId, CompanyResponse, LocalizedText, LocalizedView, Result,
    TagGroupId,
};

use crate::store::PgCatalogStore;

/// Read-side engine over the catalog store.
#[derive(Clone, Default)]
pub struct PgCatalogQuery {
    store: PgCatalogStore,
}

impl PgCatalogQuery {
    pub fn new(store: PgCatalogStore) -> Self {
        Self { store }
    }

    /// Company owning a localized name equal to `name`.
    ///
    /// Localized names are only unique inside one company's name group, so
    /// several companies may match. The lowest company id wins.
    pub async fn find_company_by_exact_name(
        &self,
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<CompanyId>> {
        let matches = self.store.names_by_text(conn, name).await?;
        let picked = matches.first().map(|n| n.company_id);

        if let Some(company_id) = picked {
            let others = matches
                .iter()
                .filter(|n| n.company_id != company_id)
                .count();
            if others > 0 {
                debug!(
                    subsystem = "db",
                    component = "query",
                    op = "find_company_by_exact_name",
                    company_id,
                    other_matches = others,
                    "Name shared by several companies, picked lowest id"
                );
            }
        }
        Ok(picked)
    }

    /// Every localized name and tag of a company, in storage order.
    pub async fn localized_view(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
    ) -> Result<LocalizedView> {
        let names = self.store.names_for_company(&mut *conn, company_id).await?;
        let tags = self.store.tags_for_company(conn, company_id).await?;

        Ok(LocalizedView {
            company_id,
            name: names.into_iter().map(|n| (n.language, n.text)).collect(),
            tags,
        })
    }

    /// Names in `language` containing `fragment` (case-sensitive), storage order.
    pub async fn search_by_name_substring(
        &self,
        conn: &mut PgConnection,
        fragment: &str,
        language: &str,
    ) -> Result<Vec<String>> {
        let names = self
            .store
            .names_containing(conn, fragment, Some(language))
            .await?;
        Ok(names.into_iter().map(|n| n.text).collect())
    }

    /// Distinct ids of companies tagged with `tag` in any language, ascending.
    pub async fn search_by_tag(
        &self,
        conn: &mut PgConnection,
        tag: &str,
    ) -> Result<Vec<CompanyId>> {
        let mut ids: Vec<CompanyId> = self
            .store
            .tags_by_text(conn, tag)
            .await?
            .into_iter()
            .map(|t| t.company_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Render companies in `language`, keeping the order of `company_ids`.
    pub async fn display_names(
        &self,
        conn: &mut PgConnection,
        company_ids: &[CompanyId],
        language: &str,
    ) -> Result<Vec<String>> {
        let mut names: HashMap<CompanyId, LocalizedText> = HashMap::new();
        for name in self.store.names_for_companies(conn, company_ids).await? {
            names
                .entry(name.company_id)
                .or_default()
                .push(name.language, name.text);
        }

        let rendered = company_ids
            .iter()
            .filter_map(|id| names.get(id))
            .filter_map(|text| text.resolve(language))
            .map(str::to_string);
        Ok(dedup_preserving_order(rendered))
    }

    /// Companies with a name containing `fragment` in any language, rendered in
    /// `language`. A blank fragment matches nothing.
    pub async fn search_company_names(
        &self,
        conn: &mut PgConnection,
        fragment: &str,
        language: &str,
    ) -> Result<Vec<String>> {
        if fragment.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut company_ids: Vec<CompanyId> = Vec::new();
        for name in self
            .store
            .names_containing(&mut *conn, fragment, None)
            .await?
        {
            if !company_ids.contains(&name.company_id) {
                company_ids.push(name.company_id);
            }
        }

        self.display_names(conn, &company_ids, language).await
    }
}

/// Render a localized view in `language`.
///
/// The company name and each tag group fall back independently. Returns
/// `None` when the company has no name at all.
pub fn project_view(view: &LocalizedView, language: &str) -> Option<CompanyResponse> {
    let company_name = view.name.resolve(language)?;
    if view.name.get(language).is_none() {
        debug!(
            subsystem = "db",
            component = "query",
            op = "project_view",
            company_id = view.company_id,
            language,
            "Company name missing in requested language, using fallback"
        );
    }

    let mut groups: Vec<(TagGroupId, LocalizedText)> = Vec::new();
    for tag in &view.tags {
        match groups.iter_mut().find(|(id, _)| *id == tag.tag_group_id) {
            Some((_, text)) => text.push(tag.language.as_str(), tag.text.as_str()),
            None => groups.push((
                tag.tag_group_id,
                std::iter::once((tag.language.as_str(), tag.text.as_str())).collect(),
            )),
        }
    }

    let tags = groups
        .iter()
        .filter_map(|(_, text)| text.resolve(language))
        .map(str::to_string);

    Some(CompanyResponse {
        company_name: company_name.to_string(),
        tags: dedup_preserving_order(tags),
    })
}
