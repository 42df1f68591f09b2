//! # corpdir-db
//!
//! PostgreSQL layer for the multilingual company directory.
//!
//! This crate provides:
//! - Connection pool management
//! - The language registry
//! - The catalog store (companies, localized names, tag groups)
//! - Query and command engines on top of the store
//! - [`PgDirectory`], the [`CompanyDirectory`] implementation used by the API
//!
//! ## Example
//!
//! ```rust,ignore
//! use corpdir_db::{CompanyDirectory, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/corpdir").await?;
//!     db.migrate().await?;
//!
//!     let hits = db.directory.search_names("원티", "ko").await?;
//!     println!("{:?}", hits);
//!     Ok(())
//! }
//! ```
pub mod command;
pub mod directory;
pub mod languages;
pub mod pool;
pub mod query;
pub mod store;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use corpdir_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use command::PgCatalogCommands;
pub use directory::PgDirectory;
pub use languages::PgLanguageRegistry;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use query::{project_view, PgCatalogQuery};
pub use store::{PgCatalogStore, TagGroupState};

/// Combined database context with all engines.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Language code registry.
    pub languages: PgLanguageRegistry,
    /// Low-level catalog CRUD.
    pub store: PgCatalogStore,
    /// Read-side engine.
    pub query: PgCatalogQuery,
    /// Write-side engine.
    pub commands: PgCatalogCommands,
    /// Transactional directory service.
    pub directory: PgDirectory,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        let languages = PgLanguageRegistry::new(pool.clone());
        let store = PgCatalogStore::new();
        let query = PgCatalogQuery::new(store.clone());
        let commands = PgCatalogCommands::new(languages.clone(), store.clone(), query.clone());
        let directory = PgDirectory::new(
            pool.clone(),
            query.clone(),
            commands.clone(),
            languages.clone(),
        );
        Self {
            languages,
            store,
            query,
            commands,
            directory,
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
