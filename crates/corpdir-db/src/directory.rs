//! PostgreSQL implementation of [`CompanyDirectory`].
//!
//! Every write opens one transaction, runs the command engine inside it and
//! commits only when the whole operation succeeded. Reads use a pooled
//! connection.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

use corpdir_core::{
    normalize_language_code, CompanyDirectory, CompanyResponse, CreateCompanyRequest, Error,
    Language, Result, TagTranslations,
};

use crate::command::PgCatalogCommands;
use crate::languages::PgLanguageRegistry;
use crate::query::{project_view, PgCatalogQuery};

/// Directory service backed by PostgreSQL.
#[derive(Clone)]
pub struct PgDirectory {
    pool: Pool<Postgres>,
    query: PgCatalogQuery,
    commands: PgCatalogCommands,
    languages: PgLanguageRegistry,
}

impl PgDirectory {
    pub fn new(
        pool: Pool<Postgres>,
        query: PgCatalogQuery,
        commands: PgCatalogCommands,
        languages: PgLanguageRegistry,
    ) -> Self {
        Self {
            pool,
            query,
            commands,
            languages,
        }
    }
}

#[async_trait]
impl CompanyDirectory for PgDirectory {
    async fn search_names(&self, query: &str, language: &str) -> Result<Vec<String>> {
        let start = Instant::now();
        let language = normalize_language_code(language)?;
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let names = self
            .query
            .search_company_names(&mut conn, query.trim(), &language)
            .await?;

        debug!(
            subsystem = "db",
            component = "directory",
            op = "search_names",
            query,
            language = %language,
            result_count = names.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Name search complete"
        );
        Ok(names)
    }

    async fn search_by_tag(&self, tag: &str, language: &str) -> Result<Vec<String>> {
        let start = Instant::now();
        let language = normalize_language_code(language)?;
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let company_ids = self.query.search_by_tag(&mut conn, tag).await?;
        let names = self
            .query
            .display_names(&mut conn, &company_ids, &language)
            .await?;

        debug!(
            subsystem = "db",
            component = "directory",
            op = "search_by_tag",
            query = tag,
            language = %language,
            result_count = names.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag search complete"
        );
        Ok(names)
    }

    async fn lookup(&self, company_name: &str, language: &str) -> Result<Option<CompanyResponse>> {
        let language = normalize_language_code(language)?;
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let Some(company_id) = self
            .query
            .find_company_by_exact_name(&mut conn, company_name.trim())
            .await?
        else {
            debug!(
                subsystem = "db",
                component = "directory",
                op = "lookup",
                query = company_name,
                "No company with that name"
            );
            return Ok(None);
        };

        let view = self.query.localized_view(&mut conn, company_id).await?;
        Ok(project_view(&view, &language))
    }

    async fn create_company(
        &self,
        req: CreateCompanyRequest,
        language: &str,
    ) -> Result<CompanyResponse> {
        let start = Instant::now();
        let language = normalize_language_code(language)?;
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let response = self
            .commands
            .add_company_tx(&mut tx, req, &language)
            .await?;

        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "db",
            component = "directory",
            op = "create_company",
            language = %language,
            duration_ms = start.elapsed().as_millis() as u64,
            "Company committed"
        );
        Ok(response)
    }

    async fn add_tags(
        &self,
        company_name: &str,
        tags: Vec<TagTranslations>,
        language: &str,
    ) -> Result<CompanyResponse> {
        let start = Instant::now();
        let language = normalize_language_code(language)?;
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let response = self
            .commands
            .add_tags_tx(&mut tx, company_name, &tags, &language)
            .await?;

        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "db",
            component = "directory",
            op = "add_tags",
            language = %language,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tags committed"
        );
        Ok(response)
    }

    async fn remove_tag(
        &self,
        company_name: &str,
        tag: &str,
        language: &str,
    ) -> Result<CompanyResponse> {
        let start = Instant::now();
        let language = normalize_language_code(language)?;
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let response = self
            .commands
            .delete_tag_tx(&mut tx, company_name, tag, &language)
            .await?;

        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "db",
            component = "directory",
            op = "remove_tag",
            language = %language,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tag removal committed"
        );
        Ok(response)
    }

    async fn list_languages(&self) -> Result<Vec<Language>> {
        self.languages.list().await
    }
}
