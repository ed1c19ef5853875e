use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Label → count breakdown. Labels with no matching tasks are absent.
pub type Breakdown = BTreeMap<String, u64>;

/// Task statistics as of one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatistics {
    pub id: String,
    pub date: NaiveDate,
    /// Cumulative counts as of `date`.
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub pending_tasks: u64,
    pub deleted_tasks: u64,
    pub completion_percentage: f64,
    /// Counts for events that fell exactly on `date`.
    pub created_tasks_today: u64,
    pub completed_tasks_today: u64,
    pub deleted_tasks_today: u64,
    pub updated_tasks_today: u64,
    pub tasks_by_status: Breakdown,
    pub tasks_by_priority: Breakdown,
    pub tasks_by_category: Breakdown,
    pub tasks_by_department: Breakdown,
    pub last_updated: DateTime<Utc>,
}

/// Synthetic login activity for one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatistics {
    pub id: String,
    pub date: NaiveDate,
    pub total_users: u64,
    pub new_users_today: u64,
    pub active_users_today: u64,
    pub successful_logins: u64,
    pub failed_logins: u64,
    pub last_updated: DateTime<Utc>,
}

/// One user's logins on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyActiveUser {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub date: NaiveDate,
    pub login_count: u64,
}

/// Task breakdown for the tasks a user created or is assigned to.
#[derive(Debug, Clone, Serialize)]
pub struct UserTaskStatistics {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub pending_tasks: u64,
    pub deleted_tasks: u64,
    pub completion_percentage: f64,
    pub tasks_by_category: Breakdown,
    pub tasks_by_priority: Breakdown,
    pub tasks_by_status: Breakdown,
    pub tasks_by_department: Breakdown,
    pub last_updated: DateTime<Utc>,
}

/// Id shared by the singleton counter documents.
pub const GLOBAL_COUNTER_ID: &str = "global";

#[derive(Debug, Clone, Serialize)]
pub struct TaskCounter {
    pub id: String,
    pub total_tasks: u64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCounter {
    pub id: String,
    pub total_users: u64,
    pub last_updated: DateTime<Utc>,
}
