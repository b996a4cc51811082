//! Key-value store client for cached search records.
//!
//! `RecordStore` is the seam the repository depends on; `CacheDb` implements it
//! on SQLite. Increments run as a single `UPDATE` inside an immediate
//! transaction, so concurrent increments on one key never lose a count.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension, TransactionBehavior};

use super::connection::CacheDb;
use super::record::{CacheRecord, Item};
use crate::Error;

/// Numeric record fields that support atomic increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    HitCounter,
}

impl CounterField {
    fn column(self) -> &'static str {
        match self {
            CounterField::HitCounter => "hit_counter",
        }
    }
}

/// Durable key-value store holding one `CacheRecord` per key.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup. `None` when no record exists at `key`.
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, Error>;

    /// Unconditional write; replaces any record at `record.key`.
    async fn put(&self, record: &CacheRecord) -> Result<(), Error>;

    /// Atomically add `delta` to `field` and return the updated record.
    ///
    /// Returns `None` when no record exists at `key`.
    async fn increment_field(&self, key: &str, field: CounterField, delta: i64) -> Result<Option<CacheRecord>, Error>;
}

const SELECT_RECORD: &str = "SELECT key, timestamp, hit_counter, total_pages, items_json
     FROM search_cache WHERE key = ?1";

fn read_record(conn: &rusqlite::Connection, key: &str) -> Result<Option<CacheRecord>, Error> {
    let row = conn
        .query_row(SELECT_RECORD, params![key], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .optional()?;

    let Some((key, timestamp, hit_counter, total_pages, items_json)) = row else {
        return Ok(None);
    };

    let items: Vec<Item> = serde_json::from_str(&items_json)
        .map_err(|e| Error::CorruptRecord(format!("items for {key}: {e}")))?;

    Ok(Some(CacheRecord {
        hit_counter: u64::try_from(hit_counter)
            .map_err(|_| Error::CorruptRecord(format!("negative hit_counter for {key}")))?,
        total_pages: u32::try_from(total_pages)
            .map_err(|_| Error::CorruptRecord(format!("total_pages out of range for {key}")))?,
        key,
        timestamp,
        items,
    }))
}

#[async_trait]
impl RecordStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CacheRecord>, Error> { read_record(conn, &key) })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, record: &CacheRecord) -> Result<(), Error> {
        let items_json = serde_json::to_string(&record.items)?;
        let key = record.key.clone();
        let timestamp = record.timestamp;
        let hit_counter = i64::try_from(record.hit_counter)
            .map_err(|_| Error::CorruptRecord(format!("hit_counter out of range for {key}")))?;
        let total_pages = i64::from(record.total_pages);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO search_cache (key, timestamp, hit_counter, total_pages, items_json)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(key) DO UPDATE SET
                        timestamp = excluded.timestamp,
                        hit_counter = excluded.hit_counter,
                        total_pages = excluded.total_pages,
                        items_json = excluded.items_json",
                    params![key, timestamp, hit_counter, total_pages, items_json],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn increment_field(&self, key: &str, field: CounterField, delta: i64) -> Result<Option<CacheRecord>, Error> {
        let key = key.to_string();
        let sql = format!("UPDATE search_cache SET {col} = {col} + ?1 WHERE key = ?2", col = field.column());

        self.conn
            .call(move |conn| -> Result<Option<CacheRecord>, Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let changed = tx.execute(&sql, params![delta, key])?;
                if changed == 0 {
                    return Ok(None);
                }
                let record = read_record(&tx, &key)?;
                tx.commit()?;
                Ok(record)
            })
            .await
            .map_err(Error::from)
    }
}
