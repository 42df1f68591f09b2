//! Language registry.
//!
//! Codes are registered lazily by the write path. Registration relies on the
//! `language_code_unique` constraint: concurrent writers may both try to insert
//! the same code, the loser's insert is ignored and it reads the winner's row.

use std::collections::{BTreeSet, HashMap};

use sqlx::{PgConnection, Pool, Postgres, Row, Transaction};
use tracing::debug;

use corpdir_core::{Error, Language, LanguageId, Result};

/// PostgreSQL language registry.
#[derive(Clone)]
pub struct PgLanguageRegistry {
    pool: Pool<Postgres>,
}

impl PgLanguageRegistry {
    /// Create a new PgLanguageRegistry with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Register every code that is not known yet and return the ids of all of them.
    ///
    /// Codes must already be normalized. Idempotent.
    pub async fn ensure_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        codes: &BTreeSet<String>,
    ) -> Result<HashMap<String, LanguageId>> {
        if codes.is_empty() {
            return Ok(HashMap::new());
        }

        let mut registered = 0u64;
        for code in codes {
            let result = sqlx::query(
                "INSERT INTO language (code) VALUES ($1) ON CONFLICT (code) DO NOTHING",
            )
            .bind(code)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
            registered += result.rows_affected();
        }

        let wanted: Vec<String> = codes.iter().cloned().collect();
        let rows = sqlx::query("SELECT id, code FROM language WHERE code = ANY($1)")
            .bind(&wanted)
            .fetch_all(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let ids: HashMap<String, LanguageId> = rows
            .into_iter()
            .map(|r| (r.get::<String, _>("code"), r.get::<LanguageId, _>("id")))
            .collect();

        if let Some(missing) = codes.iter().find(|code| !ids.contains_key(*code)) {
            return Err(Error::NotFound(format!("Language '{}' not registered", missing)));
        }

        debug!(
            subsystem = "db",
            component = "languages",
            op = "ensure",
            requested = codes.len(),
            registered,
            "Language codes ensured"
        );

        Ok(ids)
    }

    /// Look up the id of a single code.
    pub async fn find_id(&self, conn: &mut PgConnection, code: &str) -> Result<Option<LanguageId>> {
        sqlx::query_scalar::<_, LanguageId>("SELECT id FROM language WHERE code = $1")
            .bind(code)
            .fetch_optional(conn)
            .await
            .map_err(Error::Database)
    }

    /// All registered languages in registration order.
    pub async fn list(&self) -> Result<Vec<Language>> {
        let rows = sqlx::query("SELECT id, code, created_at FROM language ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| Language {
                id: r.get("id"),
                code: r.get("code"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}
