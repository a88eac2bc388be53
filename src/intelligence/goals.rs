// ABOUTME: Goal map merging and validation
// ABOUTME: Applies partial goal updates with tolerance-range and tolerance-needs-target rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Goal update semantics.
//!
//! Updates are partial: a request may carry any subset of
//! `{target, tolerance}` pairs keyed by nutrient. The merge rules:
//!
//! - a new target replaces the stored target; the stored tolerance and
//!   `created_at` are preserved unless also supplied
//! - a tolerance may only be attached to an existing (or simultaneously
//!   created) target; no implicit zero target
//! - tolerance must be inside `[0, 100]`, for full and tolerance-only
//!   updates alike
//!
//! Validation happens before any mutation, so a rejected request leaves
//! the stored map untouched.

use chrono::{DateTime, Utc};
use remy_core::errors::{AppError, AppResult};
use remy_core::models::{GoalMap, GoalUpdate, Nutrient, NutrientGoal};
use std::collections::BTreeMap;

use crate::constants::limits::{TOLERANCE_MAX, TOLERANCE_MIN};

/// Merge a set of partial updates into an existing goal map.
///
/// Returns the full merged map; persisting it is the store's job. The
/// input map is not modified, so a validation failure cannot leave the
/// caller with a half-applied update.
///
/// # Errors
///
/// - `ValueOutOfRange` when a tolerance is outside `[0, 100]`
/// - `InvalidInput` when a tolerance is given for a nutrient with no
///   target, a target is negative, or the update set is empty
pub fn apply_goal_updates(
    existing: &GoalMap,
    updates: &BTreeMap<Nutrient, GoalUpdate>,
    now: DateTime<Utc>,
) -> AppResult<GoalMap> {
    if updates.is_empty() {
        return Err(AppError::invalid_input("no goal updates provided"));
    }

    // Validate everything up front
    for (nutrient, update) in updates {
        if let Some(target) = update.target {
            if !target.is_finite() || target < 0.0 {
                return Err(AppError::invalid_input(format!(
                    "target for {nutrient} must be a non-negative number"
                )));
            }
        }
        if let Some(tolerance) = update.tolerance_percent {
            if !(TOLERANCE_MIN..=TOLERANCE_MAX).contains(&tolerance) {
                return Err(AppError::out_of_range(format!(
                    "tolerance for {nutrient} must be {TOLERANCE_MIN}-{TOLERANCE_MAX} (got {tolerance})"
                )));
            }
            if update.target.is_none() && !existing.contains_key(nutrient) {
                return Err(AppError::invalid_input(format!(
                    "cannot set tolerance for {nutrient}: no target is set"
                )));
            }
        }
        if update.target.is_none() && update.tolerance_percent.is_none() {
            return Err(AppError::invalid_input(format!(
                "update for {nutrient} carries neither target nor tolerance"
            )));
        }
    }

    let mut merged = existing.clone();
    for (nutrient, update) in updates {
        // Range was validated above, the cast cannot truncate
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let tolerance = update.tolerance_percent.map(|t| t as u8);

        match merged.get_mut(nutrient) {
            Some(goal) => {
                if let Some(target) = update.target {
                    goal.target = target;
                }
                if let Some(tolerance) = tolerance {
                    goal.tolerance_percent = tolerance;
                }
                goal.updated_at = now;
            }
            None => {
                // Validation guarantees a target is present here
                let target = update.target.unwrap_or_default();
                merged.insert(
                    *nutrient,
                    NutrientGoal {
                        target,
                        tolerance_percent: tolerance.unwrap_or(0),
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(
        entries: &[(Nutrient, Option<f64>, Option<i64>)],
    ) -> BTreeMap<Nutrient, GoalUpdate> {
        entries
            .iter()
            .map(|&(n, target, tolerance_percent)| {
                (
                    n,
                    GoalUpdate {
                        target,
                        tolerance_percent,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_new_goal_defaults_to_zero_tolerance() {
        let merged = apply_goal_updates(
            &GoalMap::new(),
            &updates(&[(Nutrient::Calories, Some(2000.0), None)]),
            Utc::now(),
        )
        .unwrap();
        let goal = &merged[&Nutrient::Calories];
        assert!((goal.target - 2000.0).abs() < f64::EPSILON);
        assert_eq!(goal.tolerance_percent, 0);
    }

    #[test]
    fn test_tolerance_only_update_preserves_target_and_created_at() {
        let now = Utc::now();
        let merged = apply_goal_updates(
            &GoalMap::new(),
            &updates(&[(Nutrient::Protein, Some(150.0), None)]),
            now,
        )
        .unwrap();

        let later = now + chrono::Duration::days(3);
        let merged = apply_goal_updates(
            &merged,
            &updates(&[(Nutrient::Protein, None, Some(15))]),
            later,
        )
        .unwrap();

        let goal = &merged[&Nutrient::Protein];
        assert!((goal.target - 150.0).abs() < f64::EPSILON);
        assert_eq!(goal.tolerance_percent, 15);
        assert_eq!(goal.created_at, now);
        assert_eq!(goal.updated_at, later);
    }

    #[test]
    fn test_target_update_preserves_tolerance() {
        let merged = apply_goal_updates(
            &GoalMap::new(),
            &updates(&[(Nutrient::Calories, Some(2000.0), Some(10))]),
            Utc::now(),
        )
        .unwrap();
        let merged = apply_goal_updates(
            &merged,
            &updates(&[(Nutrient::Calories, Some(1800.0), None)]),
            Utc::now(),
        )
        .unwrap();
        let goal = &merged[&Nutrient::Calories];
        assert!((goal.target - 1800.0).abs() < f64::EPSILON);
        assert_eq!(goal.tolerance_percent, 10);
    }

    #[test]
    fn test_tolerance_without_target_is_rejected() {
        let err = apply_goal_updates(
            &GoalMap::new(),
            &updates(&[(Nutrient::Protein, None, Some(20))]),
            Utc::now(),
        )
        .unwrap_err();
        assert!(err.message.contains("no target"));
    }

    #[test]
    fn test_out_of_range_tolerance_is_rejected() {
        for bad in [-1, 101, 500] {
            let err = apply_goal_updates(
                &GoalMap::new(),
                &updates(&[(Nutrient::Calories, Some(2000.0), Some(bad))]),
                Utc::now(),
            )
            .unwrap_err();
            assert!(err.message.contains("must be 0-100"), "{}", err.message);
        }
    }

    #[test]
    fn test_out_of_range_tolerance_rejected_on_tolerance_only_update() {
        let existing = apply_goal_updates(
            &GoalMap::new(),
            &updates(&[(Nutrient::Calories, Some(2000.0), None)]),
            Utc::now(),
        )
        .unwrap();
        let err = apply_goal_updates(
            &existing,
            &updates(&[(Nutrient::Calories, None, Some(150))]),
            Utc::now(),
        )
        .unwrap_err();
        assert!(err.message.contains("must be 0-100"));
    }

    #[test]
    fn test_rejected_update_leaves_input_untouched() {
        let existing = apply_goal_updates(
            &GoalMap::new(),
            &updates(&[(Nutrient::Calories, Some(2000.0), None)]),
            Utc::now(),
        )
        .unwrap();
        let before = existing.clone();
        let result = apply_goal_updates(
            &existing,
            &updates(&[
                (Nutrient::Calories, Some(1500.0), None),
                (Nutrient::Protein, None, Some(20)),
            ]),
            Utc::now(),
        );
        assert!(result.is_err());
        assert_eq!(existing, before);
    }

    #[test]
    fn test_boundary_tolerances_accepted() {
        let merged = apply_goal_updates(
            &GoalMap::new(),
            &updates(&[
                (Nutrient::Calories, Some(2000.0), Some(0)),
                (Nutrient::Protein, Some(120.0), Some(100)),
            ]),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(merged[&Nutrient::Calories].tolerance_percent, 0);
        assert_eq!(merged[&Nutrient::Protein].tolerance_percent, 100);
    }

    #[test]
    fn test_empty_update_set_is_rejected() {
        let err =
            apply_goal_updates(&GoalMap::new(), &BTreeMap::new(), Utc::now()).unwrap_err();
        assert!(err.message.contains("no goal updates"));
    }
}
