use chrono::{DateTime, NaiveDate, Utc};

use crate::date_util::percentage;
use crate::model::{TaskSeed, TaskStatus, UserTaskStatistics};
use crate::stats::{breakdowns, deleted_tasks, new_id};

/// Task statistics over the tasks `user_id` created or is assigned to.
///
/// Counts use each task's current status. Returns `None` when the user has
/// no tasks.
pub fn user_task_statistics(
    user_id: &str,
    seeds: &[TaskSeed],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Option<UserTaskStatistics> {
    let tasks: Vec<&TaskSeed> = seeds.iter().filter(|s| s.involves(user_id)).collect();
    if tasks.is_empty() {
        return None;
    }

    let count_status =
        |status: TaskStatus| tasks.iter().filter(|s| s.status == status).count() as u64;
    let total_tasks = tasks.len() as u64;
    let completed_tasks = count_status(TaskStatus::Completed);
    let (tasks_by_status, tasks_by_priority, tasks_by_category, tasks_by_department) =
        breakdowns(&tasks);

    Some(UserTaskStatistics {
        id: new_id(),
        user_id: user_id.to_string(),
        date: today,
        total_tasks,
        completed_tasks,
        in_progress_tasks: count_status(TaskStatus::InProgress),
        pending_tasks: count_status(TaskStatus::Available),
        deleted_tasks: deleted_tasks(tasks.iter().copied()),
        completion_percentage: percentage(completed_tasks, total_tasks),
        tasks_by_category,
        tasks_by_priority,
        tasks_by_status,
        tasks_by_department,
        last_updated: now,
    })
}

/// One record per user with at least one task, in `user_ids` order.
pub fn build_user_task_statistics(
    user_ids: &[&str],
    seeds: &[TaskSeed],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<UserTaskStatistics> {
    user_ids
        .iter()
        .filter_map(|user_id| {
            let stats = user_task_statistics(user_id, seeds, today, now);
            if stats.is_none() {
                log::debug!("User {user_id} has no tasks, skipping task statistics");
            }
            stats
        })
        .collect()
}
