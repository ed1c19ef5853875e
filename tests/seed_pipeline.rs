use analytics_seed::{
    build_dataset, Collection, DocumentStore, Error, NoopProgress, SeedConfig, Seeder,
    SqliteStore,
};
use chrono::{TimeZone, Utc};

fn config() -> SeedConfig {
    SeedConfig::default()
        .with_seed(42)
        .with_now(Utc.with_ymd_and_hms(2025, 5, 20, 12, 30, 0).unwrap())
}

/// Collection contents with document ids stripped, in a stable order.
async fn snapshot(store: &SqliteStore, collection: Collection) -> Vec<String> {
    let mut docs: Vec<String> = store
        .documents(collection)
        .await
        .unwrap()
        .into_iter()
        .map(|mut doc| {
            if let Some(obj) = doc.as_object_mut() {
                obj.remove("_id");
            }
            doc.to_string()
        })
        .collect();
    docs.sort();
    docs
}

#[tokio::test]
async fn test_end_to_end_counts() {
    let store = SqliteStore::open_memory().await.unwrap();
    let seeder = Seeder::new(config(), Box::new(store.clone())).unwrap();
    let report = seeder.run(&NoopProgress).await.unwrap();

    assert_eq!(report.inserted(Collection::TaskDocuments), 100);
    assert_eq!(report.inserted(Collection::TaskStatistics), 31);
    assert_eq!(report.inserted(Collection::UserStatistics), 31);
    assert!(report.inserted(Collection::DailyActiveUsers) <= 6 * 31);
    assert!(report.inserted(Collection::UserTaskStatistics) <= 6);
    assert_eq!(
        report.inserted(Collection::TaskCounters) + report.inserted(Collection::UserCounters),
        2
    );

    let counters = store.documents(Collection::TaskCounters).await.unwrap();
    assert_eq!(counters[0]["_id"], "global");
    let daily_totals: u64 = store
        .documents(Collection::TaskStatistics)
        .await
        .unwrap()
        .iter()
        .map(|day| day["total_tasks"].as_u64().unwrap())
        .sum();
    assert_eq!(counters[0]["total_tasks"].as_u64().unwrap(), daily_totals);
    let users = store.documents(Collection::UserCounters).await.unwrap();
    assert_eq!(users[0]["total_users"], 6);
}

#[tokio::test]
async fn test_task_statistics_documents() {
    let store = SqliteStore::open_memory().await.unwrap();
    Seeder::new(config(), Box::new(store.clone()))
        .unwrap()
        .run(&NoopProgress)
        .await
        .unwrap();

    let stats = store.documents(Collection::TaskStatistics).await.unwrap();
    assert_eq!(stats.len(), 31);
    for day in &stats {
        let total = day["total_tasks"].as_u64().unwrap();
        let pct = day["completion_percentage"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&pct));
        if total == 0 {
            assert_eq!(pct, 0.0);
        }
        let by_status: u64 = day["tasks_by_status"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(by_status, total);
        assert!(day["date"].get("$date").is_some());
    }
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.db");

    let store = SqliteStore::open_at(&path).await.unwrap();
    Seeder::new(config(), Box::new(store.clone()))
        .unwrap()
        .run(&NoopProgress)
        .await
        .unwrap();
    let mut first = Vec::new();
    for collection in Collection::ALL {
        first.push(snapshot(&store, collection).await);
    }

    let store = SqliteStore::open_at(&path).await.unwrap();
    Seeder::new(config(), Box::new(store.clone()))
        .unwrap()
        .run(&NoopProgress)
        .await
        .unwrap();
    for (i, collection) in Collection::ALL.into_iter().enumerate() {
        assert_eq!(
            snapshot(&store, collection).await,
            first[i],
            "{collection} differs after rerun"
        );
        let expected = first[i].len() as u64;
        assert_eq!(store.count(collection).await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_user_task_statistics_match_tasks() {
    let dataset = build_dataset(&config()).unwrap();
    for user in &config().users {
        let involved = dataset.tasks.iter().filter(|t| t.involves(&user.id)).count() as u64;
        let stats: Vec<_> = dataset
            .user_task_statistics
            .iter()
            .filter(|s| s.user_id == user.id)
            .collect();
        if involved == 0 {
            assert!(stats.is_empty());
        } else {
            assert_eq!(stats.len(), 1);
            assert_eq!(stats[0].total_tasks, involved);
        }
    }
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_writing() {
    let store = SqliteStore::open_memory().await.unwrap();
    let result = Seeder::new(config().with_users(vec![]), Box::new(store.clone()));
    assert!(result.is_err());
    assert_eq!(store.count(Collection::TaskDocuments).await.unwrap(), 0);
}

#[tokio::test]
async fn test_open_writes_to_configured_sqlite_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.db");

    let seeder = Seeder::open(config().with_sqlite_path(&path)).await.unwrap();
    let report = seeder.run(&NoopProgress).await.unwrap();
    assert_eq!(report.target, format!("sqlite:{}", path.display()));

    let store = SqliteStore::open_at(&path).await.unwrap();
    assert_eq!(store.count(Collection::TaskDocuments).await.unwrap(), 100);
}

#[tokio::test]
async fn test_open_rejects_invalid_config_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.db");

    let result = Seeder::open(config().with_task_count(0).with_sqlite_path(&path)).await;
    assert!(matches!(result, Err(Error::Config(_))));
    assert!(!path.exists());
}
