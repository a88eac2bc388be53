// ABOUTME: `progress` command - today's zones and streaks per goal nutrient
// ABOUTME: JSON by default, text summary with [zone] tags via --human
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

use chrono::Local;

use remy_mcp_server::database::NutritionStore;
use remy_mcp_server::errors::AppResult;
use remy_mcp_server::intelligence::{build_progress_report, ProgressReport, Zone};

use super::print_json;

/// Build and print the progress report
pub async fn run(
    store: &dyn NutritionStore,
    user_id: &str,
    human: bool,
    lookback_days: u32,
) -> AppResult<()> {
    let today = Local::now().date_naive();
    let report = build_progress_report(store, user_id, today, lookback_days).await?;

    if human {
        println!("{}", render_human(&report, lookback_days));
        Ok(())
    } else {
        print_json(&report)
    }
}

fn zone_tag(zone: Zone) -> &'static str {
    match zone {
        Zone::Met => "[met]",
        Zone::Near => "[near]",
        Zone::Over => "[over]",
        Zone::Under => "[under]",
    }
}

/// Render the report as a text summary with a `[zone]` tag per nutrient
fn render_human(report: &ProgressReport, lookback_days: u32) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "Progress for {}", report.date);

    if !report.has_goals {
        out.push_str(
            "\nNo goals set. Create one with: remy-cli goals --calories 2000 --calories-tolerance 10\n",
        );
        return out;
    }

    let _ = writeln!(out);
    for (nutrient, progress) in &report.nutrients {
        let unit = nutrient.unit();
        let _ = write!(
            out,
            "  {:<13} {:>8.0} / {:.0} {} {:<7}",
            nutrient.to_string(),
            progress.actual,
            progress.target,
            unit,
            zone_tag(progress.zone),
        );
        if progress.tolerance > 0 {
            let _ = write!(
                out,
                "  band {:.1} ({}% tolerance)",
                progress.band, progress.tolerance
            );
        }
        if let Some(streak) = report.streaks.get(nutrient) {
            let _ = write!(
                out,
                "  streak {} (best {})",
                streak.current, streak.longest
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "\n{} meals logged today; streaks over the last {} days.",
        report.totals.meal_count, lookback_days
    );
    out
}
