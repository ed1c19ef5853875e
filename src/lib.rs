pub mod config;
pub mod date_util;
pub mod error;
pub mod generate;
pub mod load;
pub mod model;
pub mod stats;
pub mod storage;

pub use config::{SeedConfig, SeedUser};
pub use error::{Error, Result};
pub use load::{CollectionReport, LoadProgress, LoadReport, NoopProgress};
pub use model::{
    DailyActiveUser, Department, TaskCounter, TaskPriority, TaskSeed, TaskStatistics, TaskStatus,
    UserCounter, UserStatistics, UserTaskStatistics,
};
pub use stats::{build_dataset, SeedDataset};
pub use storage::{open_store, Collection, DocumentStore, MongoStore, SqliteStore};

/// Main entry point: builds the synthetic dataset and writes it to a store.
pub struct Seeder {
    config: SeedConfig,
    store: Box<dyn DocumentStore>,
}

impl Seeder {
    /// Validates the config; nothing downstream checks it again.
    pub fn new(config: SeedConfig, store: Box<dyn DocumentStore>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, store })
    }

    /// Validate the config, then connect to the store it names.
    pub async fn open(config: SeedConfig) -> Result<Self> {
        config.validate()?;
        let store = storage::open_store(&config).await?;
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    pub fn build(&self) -> SeedDataset {
        stats::assemble(&self.config)
    }

    /// Generate, aggregate and load in one pass.
    pub async fn run(&self, progress: &dyn LoadProgress) -> Result<LoadReport> {
        log::info!(
            "Seeding {} (seed {}, {} tasks, {}-day window, now {})",
            self.store.describe(),
            self.config.seed,
            self.config.task_count,
            self.config.window_days,
            self.config.now.to_rfc3339()
        );
        let dataset = self.build();
        let report = load::load_dataset(self.store.as_ref(), &dataset, progress).await?;
        log::info!(
            "Seeding complete: {} documents written",
            report.total_inserted()
        );
        Ok(report)
    }
}
