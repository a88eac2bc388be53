// ABOUTME: Streak engine over per-day goal compliance
// ABOUTME: Computes current and longest runs of compliant days across a lookback window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Streak computation.
//!
//! Each day in a lookback window is reduced to a tri-state
//! [`DayCompliance`]: `Compliant` (zone met/near), `Broken` (missed the
//! goal), or `Excluded` (the goal did not exist yet that day). The
//! tri-state matters: a goal set partway through history must not have its
//! pre-existence days counted as breaks.
//!
//! Excluded days are transparent in both walks: they neither extend nor
//! break a run.

use chrono::NaiveDate;
use remy_core::models::{GoalDirection, Nutrient, NutrientGoal};
use serde::{Deserialize, Serialize};

use super::tolerance::classify_for_goal;

/// How one day counts toward a nutrient's streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCompliance {
    /// Zone was met or near
    Compliant,
    /// Goal existed and was missed
    Broken,
    /// No goal existed for this nutrient on this day
    Excluded,
}

/// Current and longest streaks of compliant days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive compliant days ending at the most recent day in the window
    pub current: u32,
    /// Longest run of consecutive compliant days anywhere in the window
    pub longest: u32,
}

/// Compute streaks over a chronologically ordered window of days.
///
/// `current` walks backward from the most recent day, stopping at the
/// first broken day; `longest` scans forward for the maximum contiguous
/// compliant run. Excluded days are skipped by both walks.
#[must_use]
pub fn compute_streaks(days: &[DayCompliance]) -> Streak {
    let mut longest = 0u32;
    let mut run = 0u32;
    for day in days {
        match day {
            DayCompliance::Compliant => {
                run += 1;
                longest = longest.max(run);
            }
            DayCompliance::Broken => run = 0,
            DayCompliance::Excluded => {}
        }
    }

    let mut current = 0u32;
    for day in days.iter().rev() {
        match day {
            DayCompliance::Compliant => current += 1,
            DayCompliance::Broken => break,
            DayCompliance::Excluded => {}
        }
    }

    Streak { current, longest }
}

/// Reduce one nutrient-day to its compliance state.
///
/// Days before the goal existed are excluded. A day with zero meals logged
/// has no data to judge: nothing can exceed a ceiling, so ceiling goals
/// count it compliant, while floor goals count it as a miss.
#[must_use]
pub fn day_compliance(
    date: NaiveDate,
    meal_count: u32,
    actual: f64,
    nutrient: Nutrient,
    goal: &NutrientGoal,
) -> DayCompliance {
    if date < goal.created_at.date_naive() {
        return DayCompliance::Excluded;
    }

    if meal_count == 0 {
        return match nutrient.direction() {
            GoalDirection::Ceiling => DayCompliance::Compliant,
            GoalDirection::Floor => DayCompliance::Broken,
        };
    }

    if classify_for_goal(actual, nutrient, goal).zone.is_compliant() {
        DayCompliance::Compliant
    } else {
        DayCompliance::Broken
    }
}

#[cfg(test)]
mod tests {
    use super::DayCompliance::{Broken, Compliant, Excluded};
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_window() {
        assert_eq!(compute_streaks(&[]), Streak::default());
    }

    #[test]
    fn test_unbroken_window() {
        let days = vec![Compliant; 28];
        let streak = compute_streaks(&days);
        assert_eq!(streak.current, 28);
        assert_eq!(streak.longest, 28);
    }

    #[test]
    fn test_break_resets_current_but_not_longest() {
        // 5 compliant, a miss, then 3 compliant
        let mut days = vec![Compliant; 5];
        days.push(Broken);
        days.extend([Compliant; 3]);
        let streak = compute_streaks(&days);
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 5);
    }

    #[test]
    fn test_trailing_break_zeroes_current() {
        let days = [Compliant, Compliant, Broken];
        let streak = compute_streaks(&days);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn test_excluded_days_are_transparent() {
        // Goal set partway through history: the excluded prefix neither
        // counts nor breaks, and an excluded gap does not split a run.
        let days = [Excluded, Excluded, Compliant, Excluded, Compliant];
        let streak = compute_streaks(&days);
        assert_eq!(streak.current, 2);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn test_all_excluded_window() {
        let days = vec![Excluded; 7];
        assert_eq!(compute_streaks(&days), Streak::default());
    }

    fn goal_created(year: i32, month: u32, day: u32) -> NutrientGoal {
        let created = Utc.with_ymd_and_hms(year, month, day, 8, 0, 0).unwrap();
        NutrientGoal {
            target: 2000.0,
            tolerance_percent: 10,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_day_before_goal_creation_is_excluded() {
        let goal = goal_created(2025, 3, 10);
        let before = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            day_compliance(before, 3, 1800.0, Nutrient::Calories, &goal),
            Excluded
        );
        assert_eq!(
            day_compliance(after, 3, 1800.0, Nutrient::Calories, &goal),
            Compliant
        );
    }

    #[test]
    fn test_zero_meal_day_depends_on_direction() {
        let goal = goal_created(2025, 3, 1);
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        // nothing exceeds a ceiling
        assert_eq!(
            day_compliance(date, 0, 0.0, Nutrient::Sodium, &goal),
            Compliant
        );
        // but an empty day cannot reach a floor
        assert_eq!(
            day_compliance(date, 0, 0.0, Nutrient::Protein, &goal),
            Broken
        );
    }

    #[test]
    fn test_near_day_counts_as_compliant() {
        let goal = goal_created(2025, 3, 1);
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        // 2100 is inside the 10% band on a 2000 ceiling
        assert_eq!(
            day_compliance(date, 2, 2100.0, Nutrient::Calories, &goal),
            Compliant
        );
        assert_eq!(
            day_compliance(date, 2, 2300.0, Nutrient::Calories, &goal),
            Broken
        );
    }
}
