use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::date_util::{percentage, trailing_window};
use crate::model::{TaskSeed, TaskStatistics, TaskStatus};
use crate::stats::{breakdowns, deleted_tasks, new_id};

/// Calendar day of an instant, in UTC.
fn day_of(dt: DateTime<Utc>) -> NaiveDate {
    dt.date_naive()
}

fn completed_by(seed: &TaskSeed, date: NaiveDate) -> bool {
    seed.completed_at.is_some_and(|c| day_of(c) <= date)
}

/// Statistics for one day. Cumulative counts cover everything on or before
/// `date`; the `*_today` counts cover events falling exactly on `date`.
pub fn task_statistics_for_day(
    seeds: &[TaskSeed],
    date: NaiveDate,
    last_updated: DateTime<Utc>,
) -> TaskStatistics {
    let existing: Vec<&TaskSeed> = seeds
        .iter()
        .filter(|s| day_of(s.created_at) <= date)
        .collect();

    let total_tasks = existing.len() as u64;
    let completed_tasks = seeds.iter().filter(|s| completed_by(s, date)).count() as u64;
    let in_progress_tasks = existing
        .iter()
        .filter(|s| s.status == TaskStatus::InProgress && !completed_by(s, date))
        .count() as u64;
    let pending_tasks = existing
        .iter()
        .filter(|s| s.status == TaskStatus::Available)
        .count() as u64;

    let created_tasks_today = seeds
        .iter()
        .filter(|s| day_of(s.created_at) == date)
        .count() as u64;
    let completed_tasks_today = seeds
        .iter()
        .filter(|s| s.completed_at.is_some_and(|c| day_of(c) == date))
        .count() as u64;
    let updated_tasks_today = seeds
        .iter()
        .filter(|s| day_of(s.updated_at) == date)
        .count() as u64;

    let (tasks_by_status, tasks_by_priority, tasks_by_category, tasks_by_department) =
        breakdowns(&existing);

    TaskStatistics {
        id: new_id(),
        date,
        total_tasks,
        completed_tasks,
        in_progress_tasks,
        pending_tasks,
        deleted_tasks: deleted_tasks(existing.iter().copied()),
        completion_percentage: percentage(completed_tasks, total_tasks),
        created_tasks_today,
        completed_tasks_today,
        deleted_tasks_today: deleted_tasks(existing.iter().copied()),
        updated_tasks_today,
        tasks_by_status,
        tasks_by_priority,
        tasks_by_category,
        tasks_by_department,
        last_updated,
    }
}

/// One statistics record per day of the trailing window, oldest first.
pub fn build_task_statistics(
    seeds: &[TaskSeed],
    today: NaiveDate,
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<TaskStatistics> {
    trailing_window(today, window_days)
        .map(|(days_ago, date)| {
            task_statistics_for_day(seeds, date, now - Duration::days(days_ago as i64))
        })
        .collect()
}
