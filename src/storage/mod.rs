pub mod documents;
pub mod mongo;
pub mod sqlite;

pub use mongo::MongoStore;
pub use sqlite::SqliteStore;

use std::fmt;

use async_trait::async_trait;
use bson::Document;

use crate::config::SeedConfig;
use crate::error::Result;

/// The collections a seeding run owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    TaskDocuments,
    TaskStatistics,
    UserStatistics,
    DailyActiveUsers,
    UserTaskStatistics,
    TaskCounters,
    UserCounters,
}

impl Collection {
    /// Every collection, in the order they are cleared and filled.
    pub const ALL: [Collection; 7] = [
        Collection::TaskDocuments,
        Collection::TaskStatistics,
        Collection::UserStatistics,
        Collection::DailyActiveUsers,
        Collection::UserTaskStatistics,
        Collection::TaskCounters,
        Collection::UserCounters,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::TaskDocuments => "task_documents",
            Collection::TaskStatistics => "task_statistics",
            Collection::UserStatistics => "user_statistics",
            Collection::DailyActiveUsers => "daily_active_users",
            Collection::UserTaskStatistics => "user_task_statistics",
            Collection::TaskCounters => "task_counters",
            Collection::UserCounters => "user_counters",
        }
    }

    /// Singleton collections hold exactly one document after a run.
    pub fn is_singleton(&self) -> bool {
        matches!(self, Collection::TaskCounters | Collection::UserCounters)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A document database the loader can write to.
///
/// Every call either fully succeeds or returns an error; callers abort on
/// the first error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Delete every document in the collection. Returns the number deleted.
    async fn clear(&self, collection: Collection) -> Result<u64>;

    /// Insert documents. An empty batch is a no-op.
    async fn insert_many(&self, collection: Collection, docs: Vec<Document>) -> Result<u64>;

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<()>;

    async fn count(&self, collection: Collection) -> Result<u64>;

    /// Human-readable target description for logs. Must not contain secrets.
    fn describe(&self) -> String;
}

/// Open the store a config points at: the SQLite file when `sqlite_path`
/// is set, MongoDB otherwise.
pub async fn open_store(config: &SeedConfig) -> Result<Box<dyn DocumentStore>> {
    log::info!("Opening {}", config.target_description());
    let store: Box<dyn DocumentStore> = match &config.sqlite_path {
        Some(path) => Box::new(SqliteStore::open_at(path).await?),
        None => Box::new(MongoStore::connect(&config.mongo_uri, &config.database_name).await?),
    };
    Ok(store)
}
