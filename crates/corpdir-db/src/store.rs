//! Catalog store: low-level CRUD over the company, name and tag tables.
//!
//! Write methods take the caller's transaction (`_tx` suffix) so a top-level
//! operation can compose several of them atomically. Read primitives take a
//! plain connection; pass `&mut **tx` to read inside a transaction.
//!
//! The store enforces referential integrity (group rows must belong to the
//! company they are written for) and nothing else. Business policy lives in
//! the query and command engines.

use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Postgres, Row, Transaction};
use tracing::trace;

use corpdir_core::{
    CompanyId, Error, LanguageId, LocalizedName, LocalizedTag, NameGroup, NameGroupId, NameId,
    Result, TagGroup, TagGroupId, TagId,
};

use crate::escape_like;

/// Standard SELECT columns for localized_name joined with language.
const NAME_COLUMNS: &str = "n.id, n.company_id, n.name_group_id, l.code AS language, n.text";

/// Standard SELECT columns for localized_tag joined with language.
const TAG_COLUMNS: &str = "t.id, t.company_id, t.tag_group_id, l.code AS language, t.text";

/// What happened to a tag group when one of its members was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagGroupState {
    /// The group still has members.
    Retained,
    /// The deleted tag was the last member; the group row is gone too.
    Deleted,
}

/// PostgreSQL catalog store.
#[derive(Clone, Default)]
pub struct PgCatalogStore;

impl PgCatalogStore {
    pub fn new() -> Self {
        Self
    }

    // ==========================================================================
    // WRITES
    // ==========================================================================

    /// Create a company identity.
    pub async fn create_company_tx(&self, tx: &mut Transaction<'_, Postgres>) -> Result<CompanyId> {
        sqlx::query_scalar::<_, CompanyId>("INSERT INTO company DEFAULT VALUES RETURNING id")
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)
    }

    /// Create the (single) name group of a company.
    pub async fn create_name_group_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_id: CompanyId,
    ) -> Result<NameGroupId> {
        sqlx::query_scalar::<_, NameGroupId>(
            "INSERT INTO name_group (company_id) VALUES ($1) RETURNING id",
        )
        .bind(company_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)
    }

    /// Write one localized name and append it to its name group.
    ///
    /// Fails with a unique violation when `text` already exists in the group,
    /// and with `NotFound` when the group does not belong to `company_id`.
    pub async fn add_localized_name_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_id: CompanyId,
        name_group_id: NameGroupId,
        language_id: LanguageId,
        text: &str,
    ) -> Result<NameId> {
        let id = sqlx::query_scalar::<_, NameId>(
            r#"
            INSERT INTO localized_name (company_id, name_group_id, language_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(company_id)
        .bind(name_group_id)
        .bind(language_id)
        .bind(text)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        let updated = sqlx::query(
            r#"
            UPDATE name_group SET member_ids = array_append(member_ids, $1)
            WHERE id = $2 AND company_id = $3
            "#,
        )
        .bind(id)
        .bind(name_group_id)
        .bind(company_id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Name group {} of company {}",
                name_group_id, company_id
            )));
        }

        trace!(
            subsystem = "db",
            component = "catalog_store",
            op = "add_localized_name",
            company_id,
            name_id = id,
            "Localized name written"
        );
        Ok(id)
    }

    /// Create an empty tag group for a company.
    pub async fn create_tag_group_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_id: CompanyId,
    ) -> Result<TagGroupId> {
        sqlx::query_scalar::<_, TagGroupId>(
            "INSERT INTO tag_group (company_id) VALUES ($1) RETURNING id",
        )
        .bind(company_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)
    }

    /// Write one localized tag and append it to its tag group.
    pub async fn add_localized_tag_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        company_id: CompanyId,
        tag_group_id: TagGroupId,
        language_id: LanguageId,
        text: &str,
    ) -> Result<TagId> {
        let id = sqlx::query_scalar::<_, TagId>(
            r#"
            INSERT INTO localized_tag (company_id, tag_group_id, language_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(company_id)
        .bind(tag_group_id)
        .bind(language_id)
        .bind(text)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        let updated = sqlx::query(
            r#"
            UPDATE tag_group SET member_ids = array_append(member_ids, $1)
            WHERE id = $2 AND company_id = $3
            "#,
        )
        .bind(id)
        .bind(tag_group_id)
        .bind(company_id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Tag group {} of company {}",
                tag_group_id, company_id
            )));
        }

        trace!(
            subsystem = "db",
            component = "catalog_store",
            op = "add_localized_tag",
            company_id,
            tag_id = id,
            tag_group_id,
            "Localized tag written"
        );
        Ok(id)
    }

    /// Delete one tag row and remove it from its group.
    ///
    /// The group row is deleted together with its last member. Fails with
    /// `NotFound` when the group is missing or `tag_id` is not one of its members.
    pub async fn delete_tag_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tag_id: TagId,
        tag_group_id: TagGroupId,
    ) -> Result<TagGroupState> {
        let members = sqlx::query_scalar::<_, Vec<TagId>>(
            "SELECT member_ids FROM tag_group WHERE id = $1 FOR UPDATE",
        )
        .bind(tag_group_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("Tag group {}", tag_group_id)))?;

        if !members.contains(&tag_id) {
            return Err(Error::NotFound(format!(
                "Tag {} in tag group {}",
                tag_id, tag_group_id
            )));
        }

        sqlx::query("DELETE FROM localized_tag WHERE id = $1")
            .bind(tag_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let remaining: Vec<TagId> = members.into_iter().filter(|id| *id != tag_id).collect();

        if remaining.is_empty() {
            sqlx::query("DELETE FROM tag_group WHERE id = $1")
                .bind(tag_group_id)
                .execute(&mut **tx)
                .await
                .map_err(Error::Database)?;
            return Ok(TagGroupState::Deleted);
        }

        sqlx::query("UPDATE tag_group SET member_ids = $1 WHERE id = $2")
            .bind(&remaining)
            .bind(tag_group_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        Ok(TagGroupState::Retained)
    }

    // ==========================================================================
    // READS
    // ==========================================================================

    /// The name group of a company.
    pub async fn get_name_group(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
    ) -> Result<Option<NameGroup>> {
        let row = sqlx::query(
            "SELECT id, company_id, member_ids FROM name_group WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_optional(conn)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| NameGroup {
            id: r.get("id"),
            company_id: r.get("company_id"),
            member_ids: r.get("member_ids"),
        }))
    }

    /// A tag group by id.
    pub async fn get_tag_group(
        &self,
        conn: &mut PgConnection,
        tag_group_id: TagGroupId,
    ) -> Result<Option<TagGroup>> {
        let row = sqlx::query("SELECT id, company_id, member_ids FROM tag_group WHERE id = $1")
            .bind(tag_group_id)
            .fetch_optional(conn)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(|r| TagGroup {
            id: r.get("id"),
            company_id: r.get("company_id"),
            member_ids: r.get("member_ids"),
        }))
    }

    /// All localized names of one company, in storage order.
    pub async fn names_for_company(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
    ) -> Result<Vec<LocalizedName>> {
        let query = format!(
            r#"
            SELECT {NAME_COLUMNS}
            FROM localized_name n
            JOIN language l ON l.id = n.language_id
            WHERE n.company_id = $1
            ORDER BY n.id
            "#
        );
        let rows = sqlx::query(&query)
            .bind(company_id)
            .fetch_all(conn)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(name_from_row).collect())
    }

    /// Localized names of several companies, grouped by company then storage order.
    pub async fn names_for_companies(
        &self,
        conn: &mut PgConnection,
        company_ids: &[CompanyId],
    ) -> Result<Vec<LocalizedName>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            r#"
            SELECT {NAME_COLUMNS}
            FROM localized_name n
            JOIN language l ON l.id = n.language_id
            WHERE n.company_id = ANY($1)
            ORDER BY n.company_id, n.id
            "#
        );
        let rows = sqlx::query(&query)
            .bind(company_ids)
            .fetch_all(conn)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(name_from_row).collect())
    }

    /// All localized tags of one company, in storage order.
    pub async fn tags_for_company(
        &self,
        conn: &mut PgConnection,
        company_id: CompanyId,
    ) -> Result<Vec<LocalizedTag>> {
        let query = format!(
            r#"
            SELECT {TAG_COLUMNS}
            FROM localized_tag t
            JOIN language l ON l.id = t.language_id
            WHERE t.company_id = $1
            ORDER BY t.id
            "#
        );
        let rows = sqlx::query(&query)
            .bind(company_id)
            .fetch_all(conn)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(tag_from_row).collect())
    }

    /// Names whose text equals `text` exactly, lowest company id first.
    pub async fn names_by_text(
        &self,
        conn: &mut PgConnection,
        text: &str,
    ) -> Result<Vec<LocalizedName>> {
        let query = format!(
            r#"
            SELECT {NAME_COLUMNS}
            FROM localized_name n
            JOIN language l ON l.id = n.language_id
            WHERE n.text = $1
            ORDER BY n.company_id, n.id
            "#
        );
        let rows = sqlx::query(&query)
            .bind(text)
            .fetch_all(conn)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(name_from_row).collect())
    }

    /// Names whose text contains `fragment` (case-sensitive), optionally
    /// restricted to one language, in storage order.
    pub async fn names_containing(
        &self,
        conn: &mut PgConnection,
        fragment: &str,
        language: Option<&str>,
    ) -> Result<Vec<LocalizedName>> {
        let query = format!(
            r#"
            SELECT {NAME_COLUMNS}
            FROM localized_name n
            JOIN language l ON l.id = n.language_id
            WHERE n.text LIKE '%' || $1 || '%' ESCAPE '\'
              AND ($2::TEXT IS NULL OR l.code = $2)
            ORDER BY n.id
            "#
        );
        let rows = sqlx::query(&query)
            .bind(escape_like(fragment))
            .bind(language)
            .fetch_all(conn)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(name_from_row).collect())
    }

    /// Tags whose text equals `text` exactly, in any language.
    pub async fn tags_by_text(
        &self,
        conn: &mut PgConnection,
        text: &str,
    ) -> Result<Vec<LocalizedTag>> {
        let query = format!(
            r#"
            SELECT {TAG_COLUMNS}
            FROM localized_tag t
            JOIN language l ON l.id = t.language_id
            WHERE t.text = $1
            ORDER BY t.company_id, t.id
            "#
        );
        let rows = sqlx::query(&query)
            .bind(text)
            .fetch_all(conn)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(tag_from_row).collect())
    }
}

fn name_from_row(r: &PgRow) -> LocalizedName {
    LocalizedName {
        id: r.get("id"),
        company_id: r.get("company_id"),
        name_group_id: r.get("name_group_id"),
        language: r.get("language"),
        text: r.get("text"),
    }
}

fn tag_from_row(r: &PgRow) -> LocalizedTag {
    LocalizedTag {
        id: r.get("id"),
        company_id: r.get("company_id"),
        tag_group_id: r.get("tag_group_id"),
        language: r.get("language"),
        text: r.get("text"),
    }
}
