use analytics_seed::config::{
    DEFAULT_DATABASE, DEFAULT_MONGO_URI, DEFAULT_SEED, DEFAULT_TASK_COUNT, DEFAULT_WINDOW_DAYS,
};
use analytics_seed::{open_store, Collection, DocumentStore, SeedConfig, SeedDataset, Seeder};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "analytics-seed",
    about = "Seed the task analytics collections with synthetic data"
)]
struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clear the analytics collections and fill them with a fresh dataset
    Seed {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        generation: GenerationArgs,
    },
    /// Build the dataset and print it without touching storage
    Preview {
        #[command(flatten)]
        generation: GenerationArgs,
        /// Output the full dataset as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show document counts per collection
    Status {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// MongoDB connection string
    #[arg(long, default_value = DEFAULT_MONGO_URI)]
    uri: String,

    /// MongoDB database name
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,

    /// Write to a local SQLite document store at this path instead of MongoDB
    #[arg(long, value_name = "PATH")]
    sqlite: Option<String>,
}

#[derive(Args)]
struct GenerationArgs {
    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of trailing days of statistics
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    days: u32,

    /// Number of tasks to generate
    #[arg(long, default_value_t = DEFAULT_TASK_COUNT)]
    tasks: usize,

    /// Reference instant (RFC 3339); defaults to the current time
    #[arg(long, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{s}': {e}"))
}

fn build_config(generation: &GenerationArgs, target: Option<&TargetArgs>) -> SeedConfig {
    let mut config = SeedConfig::default()
        .with_seed(generation.seed)
        .with_window_days(generation.days)
        .with_task_count(generation.tasks);
    if let Some(now) = generation.now {
        config = config.with_now(now);
    }
    if let Some(target) = target {
        config = apply_target(config, target);
    }
    config
}

fn apply_target(mut config: SeedConfig, target: &TargetArgs) -> SeedConfig {
    config = config
        .with_mongo_uri(target.uri.clone())
        .with_database(target.database.clone());
    if let Some(path) = &target.sqlite {
        config = config.with_sqlite_path(path);
    }
    config
}

/// Progress reporter that writes to stderr.
struct StderrProgress;

impl analytics_seed::LoadProgress for StderrProgress {
    fn on_collection_cleared(&self, collection: Collection, deleted: u64) {
        eprintln!("Cleared {collection} ({deleted} documents)");
    }

    fn on_collection_loaded(&self, collection: Collection, inserted: u64) {
        eprintln!("Inserted {inserted} documents into {collection}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Seed { target, generation } => {
            let config = build_config(&generation, Some(&target));
            let seeder = Seeder::open(config).await?;
            let report = seeder.run(&StderrProgress).await?;
            print_load_report(seeder.config(), &report);
        }
        Commands::Preview { generation, json } => {
            let config = build_config(&generation, None);
            let dataset = analytics_seed::build_dataset(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dataset)?);
            } else {
                print_preview(&dataset);
            }
        }
        Commands::Status { target } => {
            let config = apply_target(SeedConfig::default(), &target);
            let store = open_store(&config).await?;
            print_status(store.as_ref()).await?;
        }
    }

    Ok(())
}

fn print_load_report(config: &SeedConfig, report: &analytics_seed::LoadReport) {
    println!(
        "Seeded {} (seed {}, now {})",
        report.target,
        config.seed,
        config.now.to_rfc3339()
    );
    for c in &report.collections {
        println!(
            "  {:<22} cleared {:>4}  inserted {:>4}",
            c.collection, c.cleared, c.inserted
        );
    }
    println!("  Total inserted: {}", report.total_inserted());
}

fn print_preview(dataset: &SeedDataset) {
    println!("Dataset preview (now {})", dataset.now.to_rfc3339());
    println!("  Tasks:                {}", dataset.tasks.len());
    println!("  Task statistics:      {}", dataset.task_statistics.len());
    println!("  User statistics:      {}", dataset.user_statistics.len());
    println!("  Daily active users:   {}", dataset.daily_active_users.len());
    println!("  User task statistics: {}", dataset.user_task_statistics.len());
    println!("  Task counter:         {}", dataset.task_counter.total_tasks);
    println!("  User counter:         {}", dataset.user_counter.total_users);

    if let Some(latest) = dataset.task_statistics.last() {
        println!("Latest day ({}):", latest.date);
        println!("  Total:       {}", latest.total_tasks);
        println!(
            "  Completed:   {} ({:.1}%)",
            latest.completed_tasks, latest.completion_percentage
        );
        println!("  In progress: {}", latest.in_progress_tasks);
        println!("  Pending:     {}", latest.pending_tasks);
        for (status, count) in &latest.tasks_by_status {
            println!("    {status:<12} {count}");
        }
    }
}

async fn print_status(store: &dyn DocumentStore) -> anyhow::Result<()> {
    println!("Target: {}", store.describe());
    for collection in Collection::ALL {
        let count = store.count(collection).await?;
        println!("  {:<22} {count}", collection.name());
    }
    Ok(())
}
