//! Reading storage.
//!
//! [`ReadingStore`] is the async trait the HTTP layer talks to.
//! [`SqliteReadingStore`] implements it on top of a single SQLite file.

mod sqlite;

pub use sqlite::SqliteReadingStore;

use crate::filter::Filter;
use crate::reading::Reading;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Reductions the store can compute itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Min,
    Max,
    Avg,
}

impl AggregateOp {
    pub(crate) fn sql_function(&self) -> &'static str {
        match self {
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
            AggregateOp::Avg => "AVG",
        }
    }
}

/// Append-only table of readings.
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    async fn insert(&self, reading: &Reading) -> Result<(), StoreError>;

    /// All readings matching `filter`, ordered by device and then insertion.
    async fn select(&self, filter: &Filter) -> Result<Vec<Reading>, StoreError>;

    /// `None` when no rows match.
    async fn select_aggregate(
        &self,
        filter: &Filter,
        op: AggregateOp,
    ) -> Result<Option<f64>, StoreError>;
}
