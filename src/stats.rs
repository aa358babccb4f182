use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::info;

/// One row per quote sent: who was quoted, where, and when the quoted message
/// was written (epoch seconds). Append-only; there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteStatRecord {
    pub user_id: u64,
    pub channel_id: u64,
    pub guild_id: u64,
    pub timestamp: i64,
}

/// Thread-safe SQLite store for quote statistics.
#[derive(Clone)]
pub struct QuoteStatsStore {
    conn: Arc<Mutex<Connection>>,
}

impl QuoteStatsStore {
    /// Open or create the SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // Enable WAL mode for better concurrent read performance
        // journal_mode PRAGMA always returns the resulting mode, so use query_row
        let _: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        Self::run_migrations(&conn)?;

        info!("Quote stats store initialized at: {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS quotestats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                guild_id INTEGER NOT NULL,
                timestamp INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_quotestats_guild
                ON quotestats(guild_id, timestamp);
            ",
        )?;
        Ok(())
    }

    /// Append one stat row.
    pub async fn record(&self, record: &QuoteStatRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO quotestats (user_id, channel_id, guild_id, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                record.user_id as i64,
                record.channel_id as i64,
                record.guild_id as i64,
                record.timestamp,
            ],
        )
        .context("Failed to insert quote stat")?;
        Ok(())
    }

    /// Total number of recorded rows.
    pub async fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count = conn.query_row("SELECT COUNT(*) FROM quotestats", [], |row| row.get(0))?;
        Ok(count)
    }

    /// All rows for one guild, oldest first.
    pub async fn for_guild(&self, guild_id: u64) -> Result<Vec<QuoteStatRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT user_id, channel_id, guild_id, timestamp
             FROM quotestats WHERE guild_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([guild_id as i64], |row| {
                Ok(QuoteStatRecord {
                    user_id: row.get::<_, i64>(0)? as u64,
                    channel_id: row.get::<_, i64>(1)? as u64,
                    guild_id: row.get::<_, i64>(2)? as u64,
                    timestamp: row.get(3)?,
                })
            })
            .context("Failed to map rows")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to collect rows")?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(user_id: u64, guild_id: u64, timestamp: i64) -> QuoteStatRecord {
        QuoteStatRecord {
            user_id,
            channel_id: 555,
            guild_id,
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_record_and_count() {
        let store = QuoteStatsStore::open_in_memory().unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        store.record(&make_record(1, 10, 1700000000)).await.unwrap();
        store.record(&make_record(2, 10, 1700000001)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_for_guild_filters_and_preserves_order() {
        let store = QuoteStatsStore::open_in_memory().unwrap();
        store.record(&make_record(1, 10, 1700000000)).await.unwrap();
        store.record(&make_record(2, 20, 1700000001)).await.unwrap();
        store.record(&make_record(3, 10, 1700000002)).await.unwrap();

        let rows = store.for_guild(10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], make_record(1, 10, 1700000000));
        assert_eq!(rows[1], make_record(3, 10, 1700000002));
    }

    #[tokio::test]
    async fn test_roundtrips_large_snowflake_ids() {
        let store = QuoteStatsStore::open_in_memory().unwrap();
        let record = QuoteStatRecord {
            user_id: u64::MAX,
            channel_id: 18446744073709551614,
            guild_id: 10,
            timestamp: 1700000000,
        };
        store.record(&record).await.unwrap();

        let rows = store.for_guild(10).await.unwrap();
        assert_eq!(rows[0], record);
    }
}
