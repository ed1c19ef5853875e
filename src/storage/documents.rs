//! Mapping of seed data onto storage documents.
//!
//! Field names match what the analytics service reads. Instants are stored
//! as native date-times and calendar days as their UTC midnight.

use bson::{doc, Bson, Document};
use chrono::{DateTime, NaiveDate, Utc};

use crate::date_util::start_of_day_utc;
use crate::model::{
    Breakdown, DailyActiveUser, TaskCounter, TaskSeed, TaskStatistics, UserCounter,
    UserStatistics, UserTaskStatistics,
};
use crate::stats::new_id;

fn instant(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_chrono(dt)
}

fn day(d: NaiveDate) -> bson::DateTime {
    instant(start_of_day_utc(d))
}

fn count(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn breakdown(b: &Breakdown) -> Document {
    b.iter()
        .map(|(label, n)| (label.clone(), Bson::Int64(count(*n))))
        .collect()
}

/// Storage form of a task. Gets a fresh document id on every call.
pub fn task_document(seed: &TaskSeed, now: DateTime<Utc>) -> Document {
    doc! {
        "_id": new_id(),
        "task_id": seed.task_id.as_str(),
        "title": seed.title.as_str(),
        "description_category": seed.category.as_str(),
        "priority": seed.priority.as_str(),
        "status": seed.status.as_str(),
        "department": seed.department.as_str(),
        "assignee_ids": seed.assignee_ids.iter().cloned().collect::<Vec<String>>(),
        "creator_id": seed.creator_id.as_str(),
        "created_at": instant(seed.created_at),
        "updated_at": instant(seed.updated_at),
        "completed_at": seed.completed_at.map(instant),
        "due_date": seed.due_date.map(instant),
        "is_completed": seed.is_completed(),
        "is_deleted": false,
        "last_updated": instant(now),
    }
}

pub fn task_statistics_document(s: &TaskStatistics) -> Document {
    doc! {
        "_id": s.id.as_str(),
        "date": day(s.date),
        "total_tasks": count(s.total_tasks),
        "completed_tasks": count(s.completed_tasks),
        "in_progress_tasks": count(s.in_progress_tasks),
        "pending_tasks": count(s.pending_tasks),
        "deleted_tasks": count(s.deleted_tasks),
        "completion_percentage": s.completion_percentage,
        "created_tasks_today": count(s.created_tasks_today),
        "completed_tasks_today": count(s.completed_tasks_today),
        "deleted_tasks_today": count(s.deleted_tasks_today),
        "updated_tasks_today": count(s.updated_tasks_today),
        "tasks_by_status": breakdown(&s.tasks_by_status),
        "tasks_by_priority": breakdown(&s.tasks_by_priority),
        "tasks_by_category": breakdown(&s.tasks_by_category),
        "tasks_by_department": breakdown(&s.tasks_by_department),
        "last_updated": instant(s.last_updated),
    }
}

pub fn user_statistics_document(s: &UserStatistics) -> Document {
    doc! {
        "_id": s.id.as_str(),
        "date": day(s.date),
        "total_users": count(s.total_users),
        "new_users_today": count(s.new_users_today),
        "active_users_today": count(s.active_users_today),
        "successful_logins": count(s.successful_logins),
        "failed_logins": count(s.failed_logins),
        "last_updated": instant(s.last_updated),
    }
}

pub fn daily_active_user_document(d: &DailyActiveUser) -> Document {
    doc! {
        "_id": d.id.as_str(),
        "user_id": d.user_id.as_str(),
        "username": d.username.as_str(),
        "date": day(d.date),
        "login_count": count(d.login_count),
    }
}

pub fn user_task_statistics_document(s: &UserTaskStatistics) -> Document {
    doc! {
        "_id": s.id.as_str(),
        "user_id": s.user_id.as_str(),
        "date": day(s.date),
        "total_tasks": count(s.total_tasks),
        "completed_tasks": count(s.completed_tasks),
        "in_progress_tasks": count(s.in_progress_tasks),
        "pending_tasks": count(s.pending_tasks),
        "deleted_tasks": count(s.deleted_tasks),
        "completion_percentage": s.completion_percentage,
        "tasks_by_category": breakdown(&s.tasks_by_category),
        "tasks_by_priority": breakdown(&s.tasks_by_priority),
        "tasks_by_status": breakdown(&s.tasks_by_status),
        "tasks_by_department": breakdown(&s.tasks_by_department),
        "last_updated": instant(s.last_updated),
    }
}

pub fn task_counter_document(c: &TaskCounter) -> Document {
    doc! {
        "_id": c.id.as_str(),
        "total_tasks": count(c.total_tasks),
        "last_updated": instant(c.last_updated),
    }
}

pub fn user_counter_document(c: &UserCounter) -> Document {
    doc! {
        "_id": c.id.as_str(),
        "total_users": count(c.total_users),
        "last_updated": instant(c.last_updated),
    }
}

/// The `_id` of a document, if it is a string.
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get_str("_id").ok()
}

/// Relaxed extended JSON form of a document, used by the SQLite store.
pub fn to_json(doc: Document) -> serde_json::Value {
    Bson::Document(doc).into_relaxed_extjson()
}
