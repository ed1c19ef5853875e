use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;

use crate::config::SeedUser;
use crate::date_util::{is_weekend, recency_factor, round_half_even, trailing_window};
use crate::generate::SeedRng;
use crate::model::{DailyActiveUser, UserStatistics};
use crate::stats::new_id;

/// Growth applied to login volume by the most recent day of the window.
const LOGIN_RECENCY_BOOST: f64 = 0.5;
/// Growth applied to a single user's login count by the most recent day.
const ACTIVITY_RECENCY_BOOST: f64 = 0.3;
/// Successful logins per active user.
const LOGINS_PER_ACTIVE_USER: f64 = 2.5;
const MIN_ACTIVE_USERS: u64 = 2;
/// New users only appear in this many of the earliest days.
const NEW_USER_DAYS: u32 = 3;

const ADMIN_LOGIN_PROBABILITY: f64 = 0.8;
const WEEKDAY_LOGIN_PROBABILITY: f64 = 0.6;
const WEEKEND_LOGIN_PROBABILITY: f64 = 0.4;

/// Synthetic login statistics for each day of the trailing window.
///
/// Weekends draw from a lower base than weekdays, and all counts scale up
/// toward 1.5x on the most recent day.
pub fn build_user_statistics(
    rng: &mut SeedRng,
    today: NaiveDate,
    now: DateTime<Utc>,
    total_users: u64,
    window_days: u32,
) -> Vec<UserStatistics> {
    let new_user_cutoff = window_days.saturating_sub(NEW_USER_DAYS - 1);

    trailing_window(today, window_days)
        .map(|(days_ago, date)| {
            let base_successful: u64 = if is_weekend(date) {
                rng.gen_range(5..=15)
            } else {
                rng.gen_range(20..=50)
            };
            let base_failed: u64 = rng.gen_range(0..=base_successful / 10 + 1);

            let factor = recency_factor(window_days, days_ago, LOGIN_RECENCY_BOOST);
            let successful_logins = round_half_even(base_successful as f64 * factor);
            let failed_logins = round_half_even(base_failed as f64 * factor);

            let active_users_today =
                round_half_even(successful_logins as f64 / LOGINS_PER_ACTIVE_USER)
                    .max(MIN_ACTIVE_USERS)
                    .min(total_users);

            let new_users_today = if days_ago >= new_user_cutoff {
                rng.gen_range(0..=2)
            } else {
                0
            };

            UserStatistics {
                id: new_id(),
                date,
                total_users,
                new_users_today,
                active_users_today,
                successful_logins,
                failed_logins,
                last_updated: now - Duration::days(days_ago as i64),
            }
        })
        .collect()
}

fn login_probability(user: &SeedUser, date: NaiveDate) -> f64 {
    if user.is_admin() {
        ADMIN_LOGIN_PROBABILITY
    } else if is_weekend(date) {
        WEEKEND_LOGIN_PROBABILITY
    } else {
        WEEKDAY_LOGIN_PROBABILITY
    }
}

/// Per-user, per-day login records for the days each user "logged in".
///
/// Users are visited in order, and each user's days oldest first; a day with
/// no login emits nothing.
pub fn build_daily_active_users(
    rng: &mut SeedRng,
    users: &[SeedUser],
    today: NaiveDate,
    window_days: u32,
) -> Vec<DailyActiveUser> {
    let mut records = Vec::new();

    for user in users {
        let base_login_count: u64 = if user.is_admin() { 3 } else { 1 };

        for (days_ago, date) in trailing_window(today, window_days) {
            if rng.gen::<f64>() >= login_probability(user, date) {
                continue;
            }
            let raw: u64 = base_login_count + rng.gen_range(0..=4);
            let factor = recency_factor(window_days, days_ago, ACTIVITY_RECENCY_BOOST);

            records.push(DailyActiveUser {
                id: new_id(),
                user_id: user.id.clone(),
                username: user.username.clone(),
                date,
                login_count: round_half_even(raw as f64 * factor),
            });
        }
    }

    records
}
