pub mod types;

pub use types::*;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Category vocabulary for generated tasks.
pub const CATEGORIES: &[&str] = &[
    "devops",
    "design",
    "migration",
    "testing",
    "monitoring",
    "finance",
    "kafka",
    "training",
    "comments",
    "backup",
    "frontend",
    "backend",
    "database",
    "security",
    "documentation",
    "refactoring",
    "optimization",
    "maintenance",
    "integration",
    "event",
    "review",
    "recruitment",
    "reporting",
    "audit",
    "budgeting",
    "analysis",
    "campaign",
    "website",
    "crm",
    "support",
    "quality",
    "delivery",
    "prototype",
    "patent",
    "meeting",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Available,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Available,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Available => "AVAILABLE",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Blocked => "BLOCKED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] =
        [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    It,
    Hr,
    Finance,
    Marketing,
    Sales,
    CustomerService,
    Production,
    Logistics,
    ResearchAndDevelopment,
    Other,
}

impl Department {
    pub const ALL: [Department; 10] = [
        Department::It,
        Department::Hr,
        Department::Finance,
        Department::Marketing,
        Department::Sales,
        Department::CustomerService,
        Department::Production,
        Department::Logistics,
        Department::ResearchAndDevelopment,
        Department::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::It => "IT",
            Department::Hr => "HR",
            Department::Finance => "FINANCE",
            Department::Marketing => "MARKETING",
            Department::Sales => "SALES",
            Department::CustomerService => "CUSTOMER_SERVICE",
            Department::Production => "PRODUCTION",
            Department::Logistics => "LOGISTICS",
            Department::ResearchAndDevelopment => "RESEARCH_AND_DEVELOPMENT",
            Department::Other => "OTHER",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(TaskStatus, TaskPriority, Department);

/// A synthetic task before it is converted into a storage document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSeed {
    pub task_id: String,
    pub title: String,
    pub category: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub department: Department,
    pub assignee_ids: BTreeSet<String>,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskSeed {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// True if the user is an assignee or the creator.
    pub fn involves(&self, user_id: &str) -> bool {
        self.creator_id == user_id || self.assignee_ids.contains(user_id)
    }
}
