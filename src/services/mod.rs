// Service exports
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Case, CaseFilter, Gear, MatchRecord};

pub use memory::InMemoryCatalog;
pub use postgres::PostgresClient;

/// Errors raised by catalog and match-record adapters
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// Read access to gear in the catalog
#[async_trait]
pub trait GearCatalog: Send + Sync {
    async fn get_gear_by_id(&self, id: &str) -> Result<Option<Gear>, RepositoryError>;
}

/// Read access to cases in the catalog
#[async_trait]
pub trait CaseCatalog: Send + Sync {
    /// Return every case satisfying `filter`, in no particular order
    async fn query_cases(&self, filter: &CaseFilter) -> Result<Vec<Case>, RepositoryError>;
}

/// Write-behind store for computed matches, keyed by (gear id, case id)
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Insert or replace the record for its (gear id, case id) pair
    async fn upsert_match_record(&self, record: &MatchRecord) -> Result<(), RepositoryError>;

    async fn list_match_records(&self, gear_id: &str) -> Result<Vec<MatchRecord>, RepositoryError>;
}
