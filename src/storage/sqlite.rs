use async_trait::async_trait;
use bson::Document;
use rusqlite::params;
use rusqlite_migration::{Migrations, M};

use crate::error::{Error, Result};
use crate::stats::new_id;
use crate::storage::documents::{document_id, to_json};
use crate::storage::{Collection, DocumentStore};

/// Local document store backed by one SQLite table.
///
/// Wraps two `tokio_rusqlite::Connection` instances (writer + reader) in WAL
/// mode, so reads never wait on a write in progress. Each document is kept
/// as relaxed extended JSON keyed by `(collection, _id)`.
#[derive(Clone)]
pub struct SqliteStore {
    writer: tokio_rusqlite::Connection,
    reader: tokio_rusqlite::Connection,
    label: String,
}

impl SqliteStore {
    /// Open the store at the given path.
    pub async fn open_at(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let writer = tokio_rusqlite::Connection::open(&path).await?;
        Self::init_writer(&writer).await?;

        let reader = tokio_rusqlite::Connection::open(&path).await?;
        Self::init_reader(&reader).await?;

        Ok(Self {
            writer,
            reader,
            label: format!("sqlite:{}", path.display()),
        })
    }

    /// Open an in-memory store (for testing).
    pub async fn open_memory() -> Result<Self> {
        let writer = tokio_rusqlite::Connection::open_in_memory().await?;
        Self::init_writer(&writer).await?;

        // In-memory DBs are per-connection, so reader and writer share one.
        Ok(Self {
            reader: writer.clone(),
            writer,
            label: "sqlite::memory:".to_string(),
        })
    }

    async fn init_writer(conn: &tokio_rusqlite::Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;\
                 PRAGMA busy_timeout=5000;",
            )
            .map_err(|e| e.to_string())?;
            let migrations = Migrations::new(vec![M::up(include_str!(
                "migrations/001_documents.sql"
            ))]);
            migrations.to_latest(conn).map_err(|e| e.to_string())?;
            Ok::<(), String>(())
        })
        .await
        .map_err(|e| Error::Migration(e.to_string()))
    }

    async fn init_reader(conn: &tokio_rusqlite::Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;\
                 PRAGMA busy_timeout=5000;",
            )?;
            Ok::<(), rusqlite::Error>(())
        })
        .await?;
        Ok(())
    }

    /// All documents in a collection as JSON, ordered by id.
    pub async fn documents(&self, collection: Collection) -> Result<Vec<serde_json::Value>> {
        let bodies: Vec<String> = self
            .reader
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT body FROM documents WHERE collection = ?1 ORDER BY doc_id",
                )?;
                let rows = stmt.query_map([collection.name()], |row| row.get(0))?;
                let bodies = rows.collect::<std::result::Result<Vec<String>, _>>()?;
                Ok::<Vec<String>, rusqlite::Error>(bodies)
            })
            .await?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(Error::from))
            .collect()
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn clear(&self, collection: Collection) -> Result<u64> {
        let deleted = self
            .writer
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM documents WHERE collection = ?1",
                    [collection.name()],
                )
            })
            .await?;
        Ok(deleted as u64)
    }

    async fn insert_many(&self, collection: Collection, docs: Vec<Document>) -> Result<u64> {
        if docs.is_empty() {
            return Ok(0);
        }

        let rows = docs
            .into_iter()
            .map(|doc| {
                let id = document_id(&doc).map(str::to_string).unwrap_or_else(new_id);
                let body = serde_json::to_string(&to_json(doc))?;
                Ok((id, body))
            })
            .collect::<Result<Vec<(String, String)>>>()?;

        let inserted = self
            .writer
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)",
                    )?;
                    for (id, body) in &rows {
                        stmt.execute(params![collection.name(), id, body])?;
                    }
                }
                tx.commit()?;
                Ok::<usize, rusqlite::Error>(rows.len())
            })
            .await?;
        Ok(inserted as u64)
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<()> {
        self.insert_many(collection, vec![doc]).await?;
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<u64> {
        let count: i64 = self
            .reader
            .call(move |conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                    [collection.name()],
                    |row| row.get(0),
                )
            })
            .await?;
        Ok(count as u64)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
