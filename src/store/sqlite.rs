use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, ToSql, params, params_from_iter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::{AggregateOp, ReadingStore, StoreError};
use crate::filter::{Filter, FilterParam};
use crate::reading::{Reading, SensorType};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed [`ReadingStore`].
///
/// Every operation opens its own connection on a blocking thread and drops it
/// before returning, on success and on error alike. No connection outlives a
/// single call.
#[derive(Debug, Clone)]
pub struct SqliteReadingStore {
    path: PathBuf,
}

impl SqliteReadingStore {
    /// Opens (creating if needed) the database at `path` and ensures the
    /// `readings` table and its lookup index exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = connect(&path)?;

        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS readings (
                device_uuid TEXT NOT NULL,
                type TEXT NOT NULL,
                value INTEGER NOT NULL,
                date_created INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_readings_device_type_date
             ON readings(device_uuid, type, date_created)",
            [],
        )?;

        info!(path = %path.display(), "SQLite reading store ready");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against a fresh connection on the blocking pool.
    async fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = connect(&path)?;
            f(&conn)
        })
        .await?
    }
}

fn connect(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

impl ToSql for FilterParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FilterParam::Text(s) => s.to_sql(),
            FilterParam::Integer(i) => i.to_sql(),
        }
    }
}

#[async_trait::async_trait]
impl ReadingStore for SqliteReadingStore {
    #[tracing::instrument(skip(self, reading), fields(device_uuid = %reading.device_uuid))]
    async fn insert(&self, reading: &Reading) -> Result<(), StoreError> {
        let reading = reading.clone();
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO readings (device_uuid, type, value, date_created)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    reading.device_uuid,
                    reading.sensor_type.as_str(),
                    reading.value,
                    reading.date_created,
                ],
            )?;
            debug!(
                sensor_type = %reading.sensor_type,
                value = reading.value,
                "Reading inserted"
            );
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn select(&self, filter: &Filter) -> Result<Vec<Reading>, StoreError> {
        let predicate = filter.predicate();
        self.with_connection(move |conn| {
            let sql = format!(
                "SELECT device_uuid, type, value, date_created FROM readings {}
                 ORDER BY device_uuid, rowid",
                predicate.where_clause()
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(predicate.params()), |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let readings = rows
                .into_iter()
                .map(|(device_uuid, sensor_type, value, date_created)| {
                    let sensor_type: SensorType = sensor_type
                        .parse()
                        .map_err(|e| StoreError::CorruptRow(format!("{e}")))?;
                    Ok(Reading {
                        device_uuid,
                        sensor_type,
                        value,
                        date_created,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;

            debug!(count = readings.len(), "Readings selected");
            Ok(readings)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn select_aggregate(
        &self,
        filter: &Filter,
        op: AggregateOp,
    ) -> Result<Option<f64>, StoreError> {
        let predicate = filter.predicate();
        self.with_connection(move |conn| {
            // The function name comes from a closed enum, never from input.
            let sql = format!(
                "SELECT {}(value) FROM readings {}",
                op.sql_function(),
                predicate.where_clause()
            );
            let value = conn.query_row(&sql, params_from_iter(predicate.params()), |row| {
                row.get::<_, Option<f64>>(0)
            })?;
            Ok(value)
        })
        .await
    }
}
