//! Per-user push statistics and the popup's derived counters.
//!
//! The stored record only ever grows: counts increase and timestamps are
//! appended. Everything the popup shows beyond the raw counts (today, this
//! week, streak) is derived on read from the timestamp log.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::time_utils::{format_utc_date, format_utc_timestamp, parse_date, parse_timestamp};

/// Statistics for one GitHub user.
///
/// Stored at: `userStats[<username>]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    // ─── Counts ──────────────────────────────────────────────────
    /// Confirmed pushes
    #[serde(default)]
    pub push_count: u32,
    #[serde(default)]
    pub easy_count: u32,
    #[serde(default)]
    pub medium_count: u32,
    #[serde(default)]
    pub hard_count: u32,

    // ─── Time Series ─────────────────────────────────────────────
    /// One RFC3339 timestamp per confirmed push, oldest first
    #[serde(default)]
    pub submission_timestamps: Vec<String>,

    // ─── Streak ──────────────────────────────────────────────────
    /// Consecutive solve days as of `last_solve_date`
    #[serde(default)]
    pub streak: u32,
    /// Date of the most recent push (`YYYY-MM-DD`), empty if none
    #[serde(default)]
    pub last_solve_date: String,
}

/// Difficulty bucket matched case-insensitively from the page label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// `None` for labels outside the three buckets (e.g. `Unknown`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl UserStats {
    /// Record one confirmed push made at `now`.
    ///
    /// The streak continues when the previous solve was yesterday, holds
    /// when it was already today, and restarts at 1 otherwise.
    pub fn record_push(&mut self, difficulty: &str, now: DateTime<Utc>) {
        self.push_count += 1;

        match Difficulty::from_label(difficulty) {
            Some(Difficulty::Easy) => self.easy_count += 1,
            Some(Difficulty::Medium) => self.medium_count += 1,
            Some(Difficulty::Hard) => self.hard_count += 1,
            None => {}
        }

        self.submission_timestamps.push(format_utc_timestamp(now));

        let today = now.date_naive();
        self.streak = match parse_date(&self.last_solve_date) {
            Some(last) if last == today => self.streak.max(1),
            Some(last) if today.pred_opt() == Some(last) => self.streak + 1,
            _ => 1,
        };
        self.last_solve_date = format_utc_date(now);
    }

    /// Pushes whose timestamp falls on the current UTC date.
    pub fn today_count(&self, now: DateTime<Utc>) -> usize {
        let today = format_utc_date(now);
        self.submission_timestamps
            .iter()
            .filter(|ts| ts.starts_with(&today))
            .count()
    }

    /// Pushes within the last seven days (inclusive of the cutoff).
    pub fn week_count(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(7);
        self.submission_timestamps
            .iter()
            .filter_map(|ts| parse_timestamp(ts))
            .filter(|ts| *ts >= cutoff)
            .count()
    }

    /// Streak as of `now`: the stored run if it reaches today or yesterday,
    /// otherwise broken (0).
    pub fn current_streak(&self, now: DateTime<Utc>) -> u32 {
        if self.submission_timestamps.is_empty() {
            return 0;
        }
        let today = now.date_naive();
        match parse_date(&self.last_solve_date) {
            Some(last) if last == today || today.pred_opt() == Some(last) => self.streak,
            _ => 0,
        }
    }

    /// Everything the popup renders for one user.
    pub fn summarize(&self, username: &str, now: DateTime<Utc>) -> StatsSummary {
        StatsSummary {
            username: username.to_string(),
            push_count: self.push_count,
            easy_count: self.easy_count,
            medium_count: self.medium_count,
            hard_count: self.hard_count,
            today_count: self.today_count(now),
            week_count: self.week_count(now),
            streak: self.current_streak(now),
        }
    }
}

/// Read-side view of [`UserStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub username: String,
    pub push_count: u32,
    pub easy_count: u32,
    pub medium_count: u32,
    pub hard_count: u32,
    pub today_count: usize,
    pub week_count: usize,
    pub streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_record_push_basic() {
        let mut stats = UserStats::default();
        stats.record_push("Easy", at(2024, 1, 15, 10));

        assert_eq!(stats.push_count, 1);
        assert_eq!(stats.easy_count, 1);
        assert_eq!(stats.medium_count, 0);
        assert_eq!(stats.submission_timestamps, vec!["2024-01-15T10:00:00.000Z"]);
        assert_eq!(stats.last_solve_date, "2024-01-15");
        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn test_difficulty_bucket_is_case_insensitive() {
        let mut stats = UserStats::default();
        stats.record_push("MEDIUM", at(2024, 1, 15, 10));
        stats.record_push("hard", at(2024, 1, 15, 11));
        stats.record_push("Unknown", at(2024, 1, 15, 12));

        assert_eq!(stats.push_count, 3);
        assert_eq!(stats.medium_count, 1);
        assert_eq!(stats.hard_count, 1);
        assert_eq!(stats.easy_count + stats.medium_count + stats.hard_count, 2);
    }

    #[test]
    fn test_streak_continues_from_yesterday() {
        let mut stats = UserStats::default();
        stats.record_push("Easy", at(2024, 1, 14, 9));
        stats.streak = 4; // prior run carried in storage
        assert_eq!(stats.last_solve_date, "2024-01-14");

        stats.record_push("Easy", at(2024, 1, 15, 9));

        assert_eq!(stats.streak, 5);
        assert_eq!(stats.current_streak(at(2024, 1, 15, 20)), 5);
    }

    #[test]
    fn test_streak_holds_on_same_day() {
        let mut stats = UserStats::default();
        stats.record_push("Easy", at(2024, 1, 15, 9));
        stats.record_push("Hard", at(2024, 1, 15, 18));

        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn test_missed_day_resets_streak() {
        let mut stats = UserStats::default();
        stats.record_push("Easy", at(2024, 1, 12, 9));
        stats.record_push("Easy", at(2024, 1, 13, 9));
        assert_eq!(stats.streak, 2);

        // Two days later, before pushing: broken
        assert_eq!(stats.current_streak(at(2024, 1, 15, 8)), 0);

        // Pushing again starts a fresh run
        stats.record_push("Easy", at(2024, 1, 15, 9));
        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn test_today_and_week_counts() {
        let stats = UserStats {
            submission_timestamps: vec![
                "2024-01-01T10:00:00.000Z".to_string(),
                "2024-01-10T10:00:00.000Z".to_string(),
                "2024-01-15T01:00:00.000Z".to_string(),
                "2024-01-15T09:00:00.000Z".to_string(),
                "garbage".to_string(),
            ],
            ..Default::default()
        };
        let now = at(2024, 1, 15, 12);

        assert_eq!(stats.today_count(now), 2);
        assert_eq!(stats.week_count(now), 3);
    }

    #[test]
    fn test_empty_stats_summary() {
        let summary = UserStats::default().summarize("alice", at(2024, 1, 15, 12));
        assert_eq!(summary.username, "alice");
        assert_eq!(summary.push_count, 0);
        assert_eq!(summary.today_count, 0);
        assert_eq!(summary.streak, 0);
    }

    #[test]
    fn test_deserializes_extension_storage_shape() {
        let stats: UserStats = serde_json::from_str(
            r#"{"pushCount":2,"easyCount":1,"mediumCount":1,"hardCount":0,
                "submissionTimestamps":["2024-01-15T01:00:00.000Z"],
                "streak":0,"lastSolveDate":"2024-01-15"}"#,
        )
        .unwrap();
        assert_eq!(stats.push_count, 2);
        assert_eq!(stats.last_solve_date, "2024-01-15");
    }
}
