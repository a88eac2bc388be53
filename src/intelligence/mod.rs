// ABOUTME: Core nutrition intelligence engines
// ABOUTME: Daily aggregation, tolerance-band classification, streaks, and progress reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! # Intelligence Module
//!
//! The core engines behind goal progress. Everything in here is pure
//! computation over already-fetched data; I/O stays behind the
//! [`crate::database::NutritionStore`] seam so these engines can be tested
//! with in-memory fakes.
//!
//! Pipeline: meal log → [`aggregator`] → goals from the store →
//! [`tolerance`] (per-day zone) → [`streaks`] (over many days) →
//! [`progress`] (the external response shape).

/// Daily nutrient totals aggregation
pub mod aggregator;

/// Goal map merging and validation
pub mod goals;

/// Progress report builder
pub mod progress;

/// Streak engine over per-day compliance
pub mod streaks;

/// Tolerance-band classifier
pub mod tolerance;

pub use aggregator::sum_meals;
pub use goals::apply_goal_updates;
pub use progress::{build_progress_report, NutrientProgress, ProgressReport};
pub use streaks::{compute_streaks, day_compliance, DayCompliance, Streak};
pub use tolerance::{classify, classify_for_goal, Zone, ZoneClassification};
