//! User profile and category experience.
//!
//! The backend stores only raw counters. Derived numbers (level, progress,
//! bonus, milestone) come from [`crate::scoring`] via [`ProfileView`] and
//! [`CategoryStats`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring;

/// Singleton profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub total_xp: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_work_date: Option<NaiveDate>,
}

impl UserProfile {
    /// Fold a completion on `date` into the streak counters.
    ///
    /// Same day keeps the streak, the following day extends it, any gap
    /// restarts it at 1.
    pub fn record_work_day(&mut self, date: NaiveDate) {
        self.current_streak = match self.last_work_date {
            Some(last) if last == date => self.current_streak.max(1),
            Some(last) if last.succ_opt() == Some(date) => self.current_streak + 1,
            _ => 1,
        };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_work_date = Some(date);
    }
}

/// Everything a window needs to render the profile badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub total_xp: u64,
    pub level: u32,
    pub xp_for_next_level: u64,
    pub progress_percentage: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_bonus_percentage: u32,
    pub next_milestone: u32,
    pub streak_at_risk: bool,
    pub last_work_date: Option<NaiveDate>,
}

impl ProfileView {
    pub fn from_profile(profile: &UserProfile, today: NaiveDate) -> Self {
        let level = scoring::level(profile.total_xp);
        Self {
            total_xp: profile.total_xp,
            level,
            xp_for_next_level: scoring::xp_for_next_level(level),
            progress_percentage: scoring::progress_percentage(profile.total_xp, level),
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            streak_bonus_percentage: scoring::streak_bonus_percentage(profile.current_streak),
            next_milestone: scoring::next_milestone(profile.current_streak),
            streak_at_risk: scoring::streak_at_risk(profile.last_work_date, today),
            last_work_date: profile.last_work_date,
        }
    }
}

/// XP accumulated per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExperience {
    pub category_id: String,
    pub total_xp: u64,
    pub updated_at: DateTime<Utc>,
}

/// Category row joined with its experience and derived level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub total_xp: u64,
    pub level: u32,
    pub xp_for_next_level: u64,
    pub progress_percentage: f64,
    pub subtasks_completed: u32,
}

impl CategoryStats {
    pub fn new(
        category_id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        total_xp: u64,
        subtasks_completed: u32,
    ) -> Self {
        let level = scoring::level(total_xp);
        Self {
            category_id: category_id.into(),
            name: name.into(),
            color: color.into(),
            total_xp,
            level,
            xp_for_next_level: scoring::xp_for_next_level(level),
            progress_percentage: scoring::progress_percentage(total_xp, level),
            subtasks_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn first_work_day_starts_streak() {
        let mut p = UserProfile::default();
        p.record_work_day(day(1));
        assert_eq!(p.current_streak, 1);
        assert_eq!(p.longest_streak, 1);
        assert_eq!(p.last_work_date, Some(day(1)));
    }

    #[test]
    fn same_day_keeps_streak() {
        let mut p = UserProfile::default();
        p.record_work_day(day(1));
        p.record_work_day(day(2));
        p.record_work_day(day(2));
        assert_eq!(p.current_streak, 2);
    }

    #[test]
    fn gap_resets_streak_but_keeps_longest() {
        let mut p = UserProfile::default();
        for d in 1..=4 {
            p.record_work_day(day(d));
        }
        p.record_work_day(day(9));
        assert_eq!(p.current_streak, 1);
        assert_eq!(p.longest_streak, 4);
    }

    #[test]
    fn view_derives_from_scoring() {
        let profile = UserProfile {
            total_xp: 250,
            current_streak: 15,
            longest_streak: 20,
            last_work_date: Some(day(10)),
        };
        let view = ProfileView::from_profile(&profile, day(10));
        assert_eq!(view.level, 2);
        assert_eq!(view.xp_for_next_level, 400);
        assert_eq!(view.progress_percentage, 50.0);
        assert_eq!(view.streak_bonus_percentage, 10);
        assert_eq!(view.next_milestone, 30);
        assert!(!view.streak_at_risk);

        let tomorrow = ProfileView::from_profile(&profile, day(11));
        assert!(tomorrow.streak_at_risk);
    }

    #[test]
    fn category_stats_level() {
        let stats = CategoryStats::new("c1", "Coding", "#3b82f6", 900, 4);
        assert_eq!(stats.level, 4);
        assert_eq!(stats.progress_percentage, 0.0);
    }
}
