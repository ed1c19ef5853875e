use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{Department, TaskPriority, TaskSeed, TaskStatus, CATEGORIES};

/// Random source for all synthetic data. ChaCha output is stable across
/// platforms and crate versions, so a seed always replays the same data.
pub type SeedRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> SeedRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform pick from a non-empty slice.
pub(crate) fn pick<'a, T>(rng: &mut SeedRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// `updated_at` never lands after `now`; overshoots are pulled back to
/// within a few hours before it.
fn clamp_to_now(rng: &mut SeedRng, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if updated_at > now {
        now - Duration::hours(rng.gen_range(0..=5))
    } else {
        updated_at
    }
}

fn updated_after(
    rng: &mut SeedRng,
    created_at: DateTime<Utc>,
    max_days: i64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let days = rng.gen_range(1..=max_days);
    let hours = rng.gen_range(0..=23);
    clamp_to_now(rng, created_at + Duration::days(days) + Duration::hours(hours), now)
}

/// Generate `count` synthetic tasks created within the 60 days before `now`.
///
/// `user_ids` must be non-empty. The draw order per task is fixed (category,
/// status, priority, department, assignees, creator, timestamps), so the same
/// seed and `now` always produce identical seeds.
pub fn build_task_seeds(
    rng: &mut SeedRng,
    now: DateTime<Utc>,
    user_ids: &[&str],
    count: usize,
) -> Vec<TaskSeed> {
    let mut seeds = Vec::with_capacity(count);

    for i in 1..=count {
        let category = *pick(rng, CATEGORIES);
        let status = *pick(rng, &TaskStatus::ALL);
        let priority = *pick(rng, &TaskPriority::ALL);
        let department = *pick(rng, &Department::ALL);

        let num_assignees = rng.gen_range(1..=3);
        let assignee_ids: BTreeSet<String> = (0..num_assignees)
            .map(|_| pick(rng, user_ids).to_string())
            .collect();
        let creator_id = pick(rng, user_ids).to_string();

        let created_at = now
            - Duration::days(rng.gen_range(1..=60))
            - Duration::hours(rng.gen_range(0..=23))
            - Duration::minutes(rng.gen_range(0..=59));

        let (updated_at, due_date, completed_at) = match status {
            TaskStatus::Completed => {
                let updated = updated_after(rng, created_at, 30, now);
                (updated, None, Some(updated))
            }
            TaskStatus::InProgress => {
                let updated = updated_after(rng, created_at, 20, now);
                let due = now + Duration::days(rng.gen_range(5..=30));
                (updated, Some(due), None)
            }
            TaskStatus::Available => {
                let due = now + Duration::days(rng.gen_range(10..=45));
                (created_at, Some(due), None)
            }
            TaskStatus::Blocked => {
                let updated = updated_after(rng, created_at, 10, now);
                let due = now + Duration::days(rng.gen_range(10..=60));
                (updated, Some(due), None)
            }
        };

        seeds.push(TaskSeed {
            task_id: format!("task-{i}"),
            title: format!("Task {i}: {category} project"),
            category: category.to_string(),
            status,
            priority,
            department,
            assignee_ids,
            creator_id,
            created_at,
            updated_at,
            due_date,
            completed_at,
        });
    }

    log::debug!("Generated {} task seeds", seeds.len());
    seeds
}
