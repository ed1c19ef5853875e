pub mod logins;
pub mod tasks;
pub mod users;

pub use logins::{build_daily_active_users, build_user_statistics};
pub use tasks::build_task_statistics;
pub use users::{build_user_task_statistics, user_task_statistics};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::SeedConfig;
use crate::error::Result;
use crate::generate::{build_task_seeds, seeded_rng};
use crate::model::{
    Breakdown, DailyActiveUser, TaskCounter, TaskSeed, TaskStatistics, UserCounter,
    UserStatistics, UserTaskStatistics, GLOBAL_COUNTER_ID,
};

/// Fresh document id.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Count tasks per label.
pub(crate) fn count_by<'a, I, F>(seeds: I, label: F) -> Breakdown
where
    I: IntoIterator<Item = &'a TaskSeed>,
    F: Fn(&TaskSeed) -> &str,
{
    let mut counts = Breakdown::new();
    for seed in seeds {
        *counts.entry(label(seed).to_string()).or_insert(0) += 1;
    }
    counts
}

/// The four breakdowns every task statistics document carries, in the
/// order (status, priority, category, department).
pub(crate) fn breakdowns(seeds: &[&TaskSeed]) -> (Breakdown, Breakdown, Breakdown, Breakdown) {
    (
        count_by(seeds.iter().copied(), |s| s.status.as_str()),
        count_by(seeds.iter().copied(), |s| s.priority.as_str()),
        count_by(seeds.iter().copied(), |s| s.category.as_str()),
        count_by(seeds.iter().copied(), |s| s.department.as_str()),
    )
}

/// Deleted-task count. Seeds have no deletion path, so this is zero until
/// `SeedConfig::deletion_tracking` is implemented.
pub(crate) fn deleted_tasks<'a>(_seeds: impl IntoIterator<Item = &'a TaskSeed>) -> u64 {
    0
}

/// The task counter is the sum of every day's cumulative `total_tasks`
/// across the window, not the number of generated tasks.
pub fn task_counter(task_statistics: &[TaskStatistics], now: DateTime<Utc>) -> TaskCounter {
    TaskCounter {
        id: GLOBAL_COUNTER_ID.to_string(),
        total_tasks: task_statistics.iter().map(|day| day.total_tasks).sum(),
        last_updated: now,
    }
}

pub fn user_counter(total_users: u64, now: DateTime<Utc>) -> UserCounter {
    UserCounter {
        id: GLOBAL_COUNTER_ID.to_string(),
        total_users,
        last_updated: now,
    }
}

/// Everything a seeding run writes, fully materialised in memory.
#[derive(Debug, Clone, Serialize)]
pub struct SeedDataset {
    pub now: DateTime<Utc>,
    pub tasks: Vec<TaskSeed>,
    pub task_statistics: Vec<TaskStatistics>,
    pub user_statistics: Vec<UserStatistics>,
    pub daily_active_users: Vec<DailyActiveUser>,
    pub user_task_statistics: Vec<UserTaskStatistics>,
    pub task_counter: TaskCounter,
    pub user_counter: UserCounter,
}

/// Generate tasks and derive every summary from them.
///
/// Each random stage gets its own source seeded from `config.seed`, so a
/// stage's output does not depend on how many draws another stage made.
pub fn build_dataset(config: &SeedConfig) -> Result<SeedDataset> {
    config.validate()?;
    Ok(assemble(config))
}

/// [`build_dataset`] for a config the caller has already validated.
pub(crate) fn assemble(config: &SeedConfig) -> SeedDataset {
    let now = config.now;
    let today = config.today();
    let user_ids = config.user_ids();
    let total_users = config.users.len() as u64;

    let tasks = build_task_seeds(
        &mut seeded_rng(config.seed),
        now,
        &user_ids,
        config.task_count,
    );
    let task_statistics = build_task_statistics(&tasks, today, now, config.window_days);
    let user_statistics = build_user_statistics(
        &mut seeded_rng(config.seed),
        today,
        now,
        total_users,
        config.window_days,
    );
    let daily_active_users = build_daily_active_users(
        &mut seeded_rng(config.seed),
        &config.users,
        today,
        config.window_days,
    );
    let user_task_statistics = build_user_task_statistics(&user_ids, &tasks, today, now);

    log::debug!(
        "Built dataset: {} tasks, {} task stats, {} login stats, {} active-user rows, \
         {} per-user stats",
        tasks.len(),
        task_statistics.len(),
        user_statistics.len(),
        daily_active_users.len(),
        user_task_statistics.len()
    );

    SeedDataset {
        task_counter: task_counter(&task_statistics, now),
        user_counter: user_counter(total_users, now),
        now,
        tasks,
        task_statistics,
        user_statistics,
        daily_active_users,
        user_task_statistics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> SeedConfig {
        SeedConfig::default().with_now(Utc.with_ymd_and_hms(2025, 5, 20, 12, 30, 0).unwrap())
    }

    #[test]
    fn test_build_dataset_shape() {
        let ds = build_dataset(&config()).unwrap();
        assert_eq!(ds.tasks.len(), 100);
        assert_eq!(ds.task_statistics.len(), 31);
        assert_eq!(ds.user_statistics.len(), 31);
        assert!(ds.daily_active_users.len() <= 6 * 31);
        assert!(ds.user_task_statistics.len() <= 6);
        assert_eq!(ds.task_counter.id, "global");
        assert_eq!(ds.user_counter.id, "global");
        assert_eq!(ds.user_counter.total_users, 6);
    }

    #[test]
    fn test_build_dataset_is_reproducible() {
        let a = build_dataset(&config()).unwrap();
        let b = build_dataset(&config()).unwrap();
        assert_eq!(a.tasks, b.tasks);
        let logins = |ds: &SeedDataset| {
            ds.user_statistics
                .iter()
                .map(|s| (s.date, s.successful_logins, s.failed_logins, s.new_users_today))
                .collect::<Vec<_>>()
        };
        assert_eq!(logins(&a), logins(&b));
        let dau = |ds: &SeedDataset| {
            ds.daily_active_users
                .iter()
                .map(|d| (d.username.clone(), d.date, d.login_count))
                .collect::<Vec<_>>()
        };
        assert_eq!(dau(&a), dau(&b));
    }

    #[test]
    fn test_task_counter_sums_daily_totals() {
        let ds = build_dataset(&config()).unwrap();
        let daily_sum: u64 = ds.task_statistics.iter().map(|d| d.total_tasks).sum();
        assert_eq!(ds.task_counter.total_tasks, daily_sum);
        // Cumulative totals repeat older tasks on every later day.
        assert!(ds.task_counter.total_tasks > ds.tasks.len() as u64);
    }

    #[test]
    fn test_build_dataset_rejects_invalid_config() {
        assert!(build_dataset(&config().with_task_count(0)).is_err());
    }

    #[test]
    fn test_count_by() {
        let ds = build_dataset(&config()).unwrap();
        let by_status = count_by(&ds.tasks, |s| s.status.as_str());
        assert_eq!(by_status.values().sum::<u64>(), 100);
        assert!(by_status.keys().all(|k| {
            ["AVAILABLE", "IN_PROGRESS", "COMPLETED", "BLOCKED"].contains(&k.as_str())
        }));
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
