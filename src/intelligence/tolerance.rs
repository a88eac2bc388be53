// ABOUTME: Tolerance-band classifier for goal progress
// ABOUTME: Maps an actual/target pair plus tolerance percentage to a met/near/over/under zone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Tolerance-band classification.
//!
//! A goal is a target plus an optional tolerance percentage. The tolerance
//! widens the target into a grace band on the non-compliant side:
//!
//! - **Ceiling** goals (stay at or under, e.g. calories, sodium):
//!   `band = target * (1 + tolerance/100)`. `met` at or under the target,
//!   `near` inside the band, `over` beyond it.
//! - **Floor** goals (reach, e.g. protein): `band = target * (1 - tolerance/100)`.
//!   `met` at or above the target, `near` inside the band, `under` below it.
//!
//! A tolerance of 0 degenerates to the exact-threshold rule (`band == target`,
//! the `near` zone is empty). The band is never rounded; comparisons use
//! plain `f64` ordering with no extra epsilon.
//!
//! [`classify`] is a pure function: no hidden state, no history dependency.

use remy_core::models::{GoalDirection, Nutrient, NutrientGoal};
use serde::{Deserialize, Serialize};

/// Classification of a day's actual value relative to target and band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// On the compliant side of the target
    Met,
    /// Off target but inside the declared tolerance band
    Near,
    /// Beyond the band of a ceiling goal
    Over,
    /// Below the band of a floor goal
    Under,
}

impl Zone {
    /// Whether this zone counts as compliant for streak purposes
    ///
    /// `near` counts: it is within the user's declared tolerance.
    #[must_use]
    pub const fn is_compliant(&self) -> bool {
        matches!(self, Zone::Met | Zone::Near)
    }
}

/// The outcome of classifying one nutrient for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneClassification {
    pub zone: Zone,
    /// The threshold actually enforced after applying tolerance (unrounded)
    pub band: f64,
    /// The tolerance percentage used, echoed for transparency
    pub tolerance: u8,
}

/// Classify an actual value against a target with a tolerance band.
///
/// Pure function of its inputs; identical inputs yield identical outputs.
#[must_use]
pub fn classify(
    actual: f64,
    target: f64,
    tolerance_percent: u8,
    direction: GoalDirection,
) -> ZoneClassification {
    let grace = target * f64::from(tolerance_percent) / 100.0;

    let (band, zone) = match direction {
        GoalDirection::Ceiling => {
            let band = target + grace;
            let zone = if actual <= target {
                Zone::Met
            } else if actual <= band {
                Zone::Near
            } else {
                Zone::Over
            };
            (band, zone)
        }
        GoalDirection::Floor => {
            let band = target - grace;
            let zone = if actual >= target {
                Zone::Met
            } else if actual >= band {
                Zone::Near
            } else {
                Zone::Under
            };
            (band, zone)
        }
    };

    ZoneClassification {
        zone,
        band,
        tolerance: tolerance_percent,
    }
}

/// Classify a nutrient's daily total against its stored goal.
///
/// Directionality comes from the nutrient's static table, never from the
/// goal record.
#[must_use]
pub fn classify_for_goal(
    actual: f64,
    nutrient: Nutrient,
    goal: &NutrientGoal,
) -> ZoneClassification {
    classify(
        actual,
        goal.target,
        goal.tolerance_percent,
        nutrient.direction(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_tolerance_band_equals_target() {
        for target in [0.0, 70.0, 2000.0] {
            let c = classify(target / 2.0, target, 0, GoalDirection::Ceiling);
            assert!((c.band - target).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_ceiling_with_tolerance_near_zone() {
        // target=2000, tolerance=10, actual=2100 -> near, band=2200
        let c = classify(2100.0, 2000.0, 10, GoalDirection::Ceiling);
        assert_eq!(c.zone, Zone::Near);
        assert!((c.band - 2200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_floor_with_tolerance_near_zone() {
        // target=120, tolerance=15, actual=115 -> near, band=102
        let c = classify(115.0, 120.0, 15, GoalDirection::Floor);
        assert_eq!(c.zone, Zone::Near);
        assert!((c.band - 102.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_band_is_not_rounded() {
        // target=250, tolerance=5, actual=260 -> near, band=262.5
        let c = classify(260.0, 250.0, 5, GoalDirection::Ceiling);
        assert_eq!(c.zone, Zone::Near);
        assert!((c.band - 262.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_tolerance_exceeding_target_is_over() {
        // target=70, tolerance=0, actual=75 -> over, band=70
        let c = classify(75.0, 70.0, 0, GoalDirection::Ceiling);
        assert_eq!(c.zone, Zone::Over);
        assert!((c.band - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ceiling_zone_boundaries() {
        // met exactly at target, near exactly at band, over just past it
        assert_eq!(classify(2000.0, 2000.0, 10, GoalDirection::Ceiling).zone, Zone::Met);
        assert_eq!(classify(2200.0, 2000.0, 10, GoalDirection::Ceiling).zone, Zone::Near);
        assert_eq!(classify(2200.1, 2000.0, 10, GoalDirection::Ceiling).zone, Zone::Over);
    }

    #[test]
    fn test_floor_zone_boundaries() {
        assert_eq!(classify(120.0, 120.0, 15, GoalDirection::Floor).zone, Zone::Met);
        assert_eq!(classify(102.0, 120.0, 15, GoalDirection::Floor).zone, Zone::Near);
        assert_eq!(classify(101.9, 120.0, 15, GoalDirection::Floor).zone, Zone::Under);
    }

    #[test]
    fn test_full_tolerance_is_legal() {
        // tolerance=100 is a very wide grace zone, not an error
        let c = classify(3999.0, 2000.0, 100, GoalDirection::Ceiling);
        assert_eq!(c.zone, Zone::Near);
        assert!((c.band - 4000.0).abs() < f64::EPSILON);

        let floor = classify(0.0, 120.0, 100, GoalDirection::Floor);
        assert_eq!(floor.zone, Zone::Near);
        assert!((floor.band - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let a = classify(2100.0, 2000.0, 10, GoalDirection::Ceiling);
        let b = classify(2100.0, 2000.0, 10, GoalDirection::Ceiling);
        assert_eq!(a, b);
    }

    #[test]
    fn test_raising_tolerance_never_strictens_the_zone() {
        // For fixed actual/target, a larger tolerance can only move the
        // classification toward compliance.
        fn rank(zone: Zone) -> u8 {
            match zone {
                Zone::Met => 0,
                Zone::Near => 1,
                Zone::Over | Zone::Under => 2,
            }
        }

        for direction in [GoalDirection::Ceiling, GoalDirection::Floor] {
            for actual in [0.0, 95.0, 100.0, 105.0, 180.0, 250.0] {
                let mut prev = rank(classify(actual, 100.0, 0, direction).zone);
                for tolerance in 1..=100 {
                    let next = rank(classify(actual, 100.0, tolerance, direction).zone);
                    assert!(
                        next <= prev,
                        "tolerance {tolerance} strictened zone for actual {actual} ({direction:?})"
                    );
                    prev = next;
                }
            }
        }
    }

    #[test]
    fn test_classify_for_goal_uses_static_direction() {
        use chrono::Utc;
        let goal = NutrientGoal {
            target: 150.0,
            tolerance_percent: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        // protein is a floor nutrient: falling short lands under/near
        let c = classify_for_goal(140.0, Nutrient::Protein, &goal);
        assert_eq!(c.zone, Zone::Near);
        // sugar is a ceiling nutrient: the same shortfall is met
        let c = classify_for_goal(140.0, Nutrient::Sugar, &goal);
        assert_eq!(c.zone, Zone::Met);
    }
}
