use bson::Document;
use serde::Serialize;

use crate::error::Result;
use crate::stats::SeedDataset;
use crate::storage::documents;
use crate::storage::{Collection, DocumentStore};

/// Callbacks fired while a dataset is written.
pub trait LoadProgress: Send + Sync {
    fn on_collection_cleared(&self, _collection: Collection, _deleted: u64) {}
    fn on_collection_loaded(&self, _collection: Collection, _inserted: u64) {}
}

/// Progress reporter that ignores every event.
pub struct NoopProgress;

impl LoadProgress for NoopProgress {}

/// Outcome for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub collection: &'static str,
    pub cleared: u64,
    pub inserted: u64,
}

/// Report returned after a dataset has been loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub target: String,
    pub collections: Vec<CollectionReport>,
}

impl LoadReport {
    pub fn inserted(&self, collection: Collection) -> u64 {
        self.entry(collection).map(|c| c.inserted).unwrap_or(0)
    }

    pub fn cleared(&self, collection: Collection) -> u64 {
        self.entry(collection).map(|c| c.cleared).unwrap_or(0)
    }

    pub fn total_inserted(&self) -> u64 {
        self.collections.iter().map(|c| c.inserted).sum()
    }

    fn entry(&self, collection: Collection) -> Option<&CollectionReport> {
        self.collections.iter().find(|c| c.collection == collection.name())
    }

    fn entry_mut(&mut self, collection: Collection) -> &mut CollectionReport {
        let idx = match self
            .collections
            .iter()
            .position(|c| c.collection == collection.name())
        {
            Some(idx) => idx,
            None => {
                self.collections.push(CollectionReport {
                    collection: collection.name(),
                    cleared: 0,
                    inserted: 0,
                });
                self.collections.len() - 1
            }
        };
        &mut self.collections[idx]
    }
}

/// Storage documents for one list collection.
fn list_documents(dataset: &SeedDataset, collection: Collection) -> Vec<Document> {
    match collection {
        Collection::TaskDocuments => dataset
            .tasks
            .iter()
            .map(|t| documents::task_document(t, dataset.now))
            .collect(),
        Collection::TaskStatistics => dataset
            .task_statistics
            .iter()
            .map(documents::task_statistics_document)
            .collect(),
        Collection::UserStatistics => dataset
            .user_statistics
            .iter()
            .map(documents::user_statistics_document)
            .collect(),
        Collection::DailyActiveUsers => dataset
            .daily_active_users
            .iter()
            .map(documents::daily_active_user_document)
            .collect(),
        Collection::UserTaskStatistics => dataset
            .user_task_statistics
            .iter()
            .map(documents::user_task_statistics_document)
            .collect(),
        Collection::TaskCounters => vec![documents::task_counter_document(&dataset.task_counter)],
        Collection::UserCounters => vec![documents::user_counter_document(&dataset.user_counter)],
    }
}

/// Replace the contents of every collection with `dataset`.
///
/// Clears all seven collections first, then inserts the list collections and
/// finally the two singleton counters. The first failed write aborts the run;
/// nothing already written is rolled back, and the next run clears it anyway.
pub async fn load_dataset(
    store: &dyn DocumentStore,
    dataset: &SeedDataset,
    progress: &dyn LoadProgress,
) -> Result<LoadReport> {
    let mut report = LoadReport {
        target: store.describe(),
        collections: Vec::new(),
    };

    for collection in Collection::ALL {
        let deleted = store.clear(collection).await?;
        log::info!("Cleared collection {collection} ({deleted} documents)");
        report.entry_mut(collection).cleared = deleted;
        progress.on_collection_cleared(collection, deleted);
    }

    for collection in Collection::ALL {
        let docs = list_documents(dataset, collection);
        let inserted = if collection.is_singleton() {
            let mut inserted = 0;
            for doc in docs {
                store.insert_one(collection, doc).await?;
                inserted += 1;
            }
            inserted
        } else if docs.is_empty() {
            log::warn!("No documents to insert into {collection}");
            0
        } else {
            store.insert_many(collection, docs).await?
        };
        log::info!("Inserted {inserted} documents into {collection}");
        report.entry_mut(collection).inserted = inserted;
        progress.on_collection_loaded(collection, inserted);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedConfig;
    use crate::error::Error;
    use crate::stats::build_dataset;
    use crate::storage::SqliteStore;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn dataset() -> SeedDataset {
        let config =
            SeedConfig::default().with_now(Utc.with_ymd_and_hms(2025, 5, 20, 12, 30, 0).unwrap());
        build_dataset(&config).unwrap()
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl LoadProgress for RecordingProgress {
        fn on_collection_cleared(&self, collection: Collection, _deleted: u64) {
            self.events.lock().unwrap().push(format!("clear:{collection}"));
        }

        fn on_collection_loaded(&self, collection: Collection, inserted: u64) {
            self.events
                .lock()
                .unwrap()
                .push(format!("load:{collection}:{inserted}"));
        }
    }

    /// Delegates to an in-memory store but rejects inserts into one collection.
    struct FailingStore {
        inner: SqliteStore,
        fail_on: Collection,
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn clear(&self, collection: Collection) -> Result<u64> {
            self.inner.clear(collection).await
        }

        async fn insert_many(&self, collection: Collection, docs: Vec<Document>) -> Result<u64> {
            if collection == self.fail_on {
                return Err(Error::Database(format!("write to {collection} refused")));
            }
            self.inner.insert_many(collection, docs).await
        }

        async fn insert_one(&self, collection: Collection, doc: Document) -> Result<()> {
            if collection == self.fail_on {
                return Err(Error::Database(format!("write to {collection} refused")));
            }
            self.inner.insert_one(collection, doc).await
        }

        async fn count(&self, collection: Collection) -> Result<u64> {
            self.inner.count(collection).await
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[tokio::test]
    async fn test_load_dataset_counts() {
        let ds = dataset();
        let store = SqliteStore::open_memory().await.unwrap();
        let report = load_dataset(&store, &ds, &NoopProgress).await.unwrap();

        assert_eq!(report.collections.len(), 7);
        assert_eq!(report.inserted(Collection::TaskDocuments), 100);
        assert_eq!(report.inserted(Collection::TaskStatistics), 31);
        assert_eq!(report.inserted(Collection::UserStatistics), 31);
        assert_eq!(
            report.inserted(Collection::DailyActiveUsers),
            ds.daily_active_users.len() as u64
        );
        assert_eq!(report.inserted(Collection::TaskCounters), 1);
        assert_eq!(report.inserted(Collection::UserCounters), 1);

        for collection in Collection::ALL {
            assert_eq!(
                store.count(collection).await.unwrap(),
                report.inserted(collection),
                "{collection}"
            );
        }
    }

    #[tokio::test]
    async fn test_progress_order_clears_before_loading() {
        let ds = dataset();
        let store = SqliteStore::open_memory().await.unwrap();
        let progress = RecordingProgress::default();
        load_dataset(&store, &ds, &progress).await.unwrap();

        let events = progress.events.into_inner().unwrap();
        assert_eq!(events.len(), 14);
        assert!(events[..7].iter().all(|e| e.starts_with("clear:")));
        assert!(events[7..].iter().all(|e| e.starts_with("load:")));
        assert_eq!(events[0], "clear:task_documents");
        assert_eq!(events[13], "load:user_counters:1");
    }

    #[tokio::test]
    async fn test_reload_replaces_previous_contents() {
        let ds = dataset();
        let store = SqliteStore::open_memory().await.unwrap();
        load_dataset(&store, &ds, &NoopProgress).await.unwrap();
        let second = load_dataset(&store, &ds, &NoopProgress).await.unwrap();

        assert_eq!(second.cleared(Collection::TaskDocuments), 100);
        assert_eq!(second.cleared(Collection::TaskCounters), 1);
        assert_eq!(store.count(Collection::TaskDocuments).await.unwrap(), 100);
        assert_eq!(store.count(Collection::TaskCounters).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_insert_aborts_remaining_collections() {
        let ds = dataset();
        let inner = SqliteStore::open_memory().await.unwrap();
        let store = FailingStore {
            inner: inner.clone(),
            fail_on: Collection::UserStatistics,
        };
        let progress = RecordingProgress::default();

        let result = load_dataset(&store, &ds, &progress).await;
        assert!(matches!(result, Err(Error::Database(_))));

        let events = progress.events.into_inner().unwrap();
        let loaded: Vec<&str> = events
            .iter()
            .filter_map(|e| e.strip_prefix("load:"))
            .collect();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].starts_with("task_documents:"));
        assert!(loaded[1].starts_with("task_statistics:"));

        // Collections written before the failure keep their rows; later ones
        // stay empty.
        assert_eq!(inner.count(Collection::TaskDocuments).await.unwrap(), 100);
        for collection in [
            Collection::UserStatistics,
            Collection::DailyActiveUsers,
            Collection::UserTaskStatistics,
            Collection::TaskCounters,
            Collection::UserCounters,
        ] {
            assert_eq!(inner.count(collection).await.unwrap(), 0, "{collection}");
        }
    }

    #[tokio::test]
    async fn test_failed_counter_insert_is_reported() {
        let ds = dataset();
        let inner = SqliteStore::open_memory().await.unwrap();
        let store = FailingStore {
            inner: inner.clone(),
            fail_on: Collection::UserCounters,
        };

        assert!(load_dataset(&store, &ds, &NoopProgress).await.is_err());
        assert_eq!(inner.count(Collection::TaskCounters).await.unwrap(), 1);
        assert_eq!(inner.count(Collection::UserCounters).await.unwrap(), 0);
    }
}
