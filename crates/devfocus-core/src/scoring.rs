//! XP, level and streak scoring.
//!
//! Pure functions; the only clock input is the date passed in explicitly.
//! Every window renders level/progress/bonus through this module so the
//! main, tracker and summary windows can never disagree.
//!
//! ```text
//! xp_threshold(L)       = (L - 1)^2 * 100
//! level(xp)             = max L >= 1 with xp_threshold(L) <= xp
//! xp_for_next_level(L)  = L^2 * 100
//! streak_bonus(days)    = min(floor(days / 7) * 5, 50)
//! ```

use chrono::NaiveDate;

/// Streak lengths that earn a badge, in ascending order.
pub const STREAK_MILESTONES: [u32; 5] = [7, 14, 30, 60, 100];

/// Streak bonus cap in percent.
pub const MAX_STREAK_BONUS: u32 = 50;

/// Total XP needed to reach `level`.
pub fn xp_threshold(level: u32) -> u64 {
    let base = u64::from(level.saturating_sub(1));
    base.saturating_mul(base).saturating_mul(100)
}

/// Greatest level whose threshold does not exceed `total_xp`.
pub fn level(total_xp: u64) -> u32 {
    // Float estimate, then correct for rounding at exact squares.
    let mut lvl = ((total_xp as f64 / 100.0).sqrt().floor() as u32).saturating_add(1);
    while lvl > 1 && xp_threshold(lvl) > total_xp {
        lvl -= 1;
    }
    while xp_threshold(lvl + 1) <= total_xp {
        lvl += 1;
    }
    lvl
}

/// Total XP at which `level` ends.
pub fn xp_for_next_level(level: u32) -> u64 {
    let l = u64::from(level);
    l.saturating_mul(l).saturating_mul(100)
}

/// Progress through `level` in percent, clamped to `0..=100`.
pub fn progress_percentage(total_xp: u64, level: u32) -> f64 {
    let floor = xp_threshold(level);
    let ceiling = xp_for_next_level(level);
    if ceiling <= floor {
        return 0.0;
    }
    let gained = total_xp.saturating_sub(floor) as f64;
    (gained / (ceiling - floor) as f64 * 100.0).clamp(0.0, 100.0)
}

/// +5% per full week of streak, capped at 50%.
pub fn streak_bonus_percentage(streak_days: u32) -> u32 {
    ((streak_days / 7) * 5).min(MAX_STREAK_BONUS)
}

/// First milestone strictly above `streak_days`, else the last one.
pub fn next_milestone(streak_days: u32) -> u32 {
    STREAK_MILESTONES
        .iter()
        .copied()
        .find(|&m| m > streak_days)
        .unwrap_or(STREAK_MILESTONES[STREAK_MILESTONES.len() - 1])
}

/// The streak is at risk until something is completed today.
pub fn streak_at_risk(last_work_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_work_date != Some(today)
}

/// XP for a completed session: one per tracked second, boosted by the streak bonus.
/// Saturates instead of wrapping on absurd inputs.
pub fn xp_for_session(seconds: u64, bonus_percentage: u32) -> u64 {
    let boosted = u128::from(seconds) * (100 + u128::from(bonus_percentage)) / 100;
    u64::try_from(boosted).unwrap_or(u64::MAX)
}
