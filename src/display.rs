//! Output Formatting and Display Management
//!
//! This module renders analysis results either as colored terminal text or as
//! structured JSON for programmatic consumption.
//!
//! ## Report Types
//!
//! - **Daily**: the visible days with consumption, generation and cost, followed by
//!   the statistics of the view (total, average, highest and lowest day, trend and
//!   savings projection) in the selected unit mode
//! - **Weekly**: Sunday-start weeks with the weekday/weekend consumption split
//! - **Insights**: narrative insights from the remote summarizer, or a notice that
//!   none are available
//!
//! ## JSON Output
//!
//! ```json
//! {
//!   "unitMode": "cost",
//!   "totalSpan": { "start": "2024-01-01", "end": "2024-01-31" },
//!   "range": { "start": "2024-01-05", "end": "2024-01-10" },
//!   "daily": [
//!     { "date": "2024-01-05", "consumptionKWh": 2.5, "generationKWh": 0.1, "costUSD": 0.35 }
//!   ],
//!   "stats": { "total": 0.35, "average": 0.35, "trendPct": 0.0 }
//! }
//! ```
//!
//! `render_*` methods return the text; `display_*` methods print it.

use crate::format::{chart_ceiling, format_currency, format_energy, format_value};
use crate::models::*;
use crate::summarizer::SummaryOutcome;
use colored::Colorize;
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// What a weekly report shows.
#[derive(Debug, Clone)]
pub struct WeeklyReport<'a> {
    pub weeks: &'a [WeeklyAggregate],
    pub biggest_day: Option<&'a DailyAggregate>,
    pub split: UsageSplit,
}

/// What a daily report shows.
#[derive(Debug, Clone)]
pub struct DailyReport<'a> {
    pub days: &'a [DailyAggregate],
    pub stats: Option<InsightStats>,
    pub total_span: Option<DateRange>,
    pub range: Option<DateRange>,
    pub mode: UnitMode,
}

pub struct DisplayManager {
    json_pretty: bool,
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self { json_pretty: true }
    }

    pub fn with_json_pretty(json_pretty: bool) -> Self {
        Self { json_pretty }
    }

    fn to_json(&self, value: &serde_json::Value) -> String {
        let rendered = if self.json_pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    pub fn display_daily(&self, report: &DailyReport<'_>, limit: Option<usize>, json_output: bool) {
        println!("{}", self.render_daily(report, limit, json_output));
    }

    pub fn render_daily(&self, report: &DailyReport<'_>, limit: Option<usize>, json_output: bool) -> String {
        let shown = match limit {
            Some(limit) if limit < report.days.len() => &report.days[report.days.len() - limit..],
            _ => report.days,
        };

        if json_output {
            return self.to_json(&serde_json::json!({
                "unitMode": report.mode,
                "totalSpan": report.total_span,
                "range": report.range,
                "daily": shown,
                "stats": report.stats,
            }));
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(72).bright_cyan());
        let _ = writeln!(
            out,
            "{}",
            format!("Energy Usage Report - Daily {}", report.mode.label())
                .bright_white()
                .bold()
        );
        let _ = writeln!(out, "{}", "=".repeat(72).bright_cyan());

        if let (Some(span), Some(range)) = (report.total_span, report.range) {
            let _ = writeln!(
                out,
                "Showing {} to {} of {} to {} ({} days in file)",
                range.start.to_string().bright_white().bold(),
                range.end.to_string().bright_white().bold(),
                span.start,
                span.end,
                span.span_days()
            );
        }

        if shown.is_empty() {
            let _ = writeln!(out, "\nNo days in the selected range.");
            return out;
        }

        let ceiling = chart_ceiling(shown, report.mode);
        let _ = writeln!(
            out,
            "\n{:<12} {:>14} {:>14} {:>12}  {}",
            "Date",
            "Consumption",
            "Generation",
            "Cost",
            report.mode.label()
        );
        for day in shown {
            let _ = writeln!(
                out,
                "{:<12} {:>14} {:>14} {:>12}  {}",
                day.date.to_string().bright_blue(),
                format_energy(day.consumption_kwh),
                format_energy(day.generation_kwh),
                format_currency(day.cost_usd).bright_green(),
                bar(report.mode.value_of(day), ceiling).bright_yellow()
            );
        }
        if shown.len() < report.days.len() {
            let _ = writeln!(
                out,
                "({} earlier days not listed)",
                report.days.len() - shown.len()
            );
        }

        if let Some(stats) = &report.stats {
            out.push('\n');
            out.push_str(&self.render_stats(stats));
        }

        out
    }

    pub fn render_stats(&self, stats: &InsightStats) -> String {
        let mode = stats.mode;
        let label = mode.label();
        let trend = format!("{:+.1}%", stats.trend_pct);
        let trend = if stats.trend_pct > 0.0 {
            trend.bright_red()
        } else {
            trend.bright_green()
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} Total {}: {}",
            "📊".bright_yellow(),
            label,
            format_value(stats.total, mode).bright_white().bold()
        );
        let _ = writeln!(
            out,
            "   Average Daily {}: {}",
            label,
            format_value(stats.average, mode)
        );
        let _ = writeln!(
            out,
            "   Highest {}: {} on {}",
            label,
            format_value(stats.maximum.value, mode),
            stats.maximum.date
        );
        let _ = writeln!(
            out,
            "   Lowest {}: {} on {}",
            label,
            format_value(stats.minimum.value, mode),
            stats.minimum.date
        );
        let _ = writeln!(out, "   Trend (first vs last week): {}", trend);
        let _ = writeln!(
            out,
            "   Potential savings at {:.0}% reduction: {}",
            SAVINGS_FACTOR * 100.0,
            format_value(stats.potential_savings, mode).bright_green()
        );
        out
    }

    pub fn display_weekly(&self, report: &WeeklyReport<'_>, json_output: bool) {
        println!("{}", self.render_weekly(report, json_output));
    }

    pub fn render_weekly(&self, report: &WeeklyReport<'_>, json_output: bool) -> String {
        if json_output {
            return self.to_json(&serde_json::json!({
                "weekly": report.weeks,
                "biggestDay": report.biggest_day,
                "split": report.split,
            }));
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(72).bright_cyan());
        let _ = writeln!(out, "{}", "Energy Usage Report - Weekly".bright_white().bold());
        let _ = writeln!(out, "{}", "=".repeat(72).bright_cyan());

        for week in report.weeks {
            let weekend_share = if week.consumption_kwh > 0.0 {
                week.weekend_consumption_kwh / week.consumption_kwh * 100.0
            } else {
                0.0
            };
            let _ = writeln!(
                out,
                "{} week of {}: {} ({}, {} days)",
                "📅".bright_blue(),
                week.week_start.to_string().bright_white().bold(),
                format_energy(week.consumption_kwh),
                format_currency(week.cost_usd).bright_green(),
                week.days
            );
            let _ = writeln!(
                out,
                "   weekdays {} • weekend {} ({}%) • generated {}",
                format_energy(week.weekday_consumption_kwh),
                format_energy(week.weekend_consumption_kwh),
                format!("{:.0}", weekend_share).bright_yellow(),
                format_energy(week.generation_kwh)
            );
        }

        if let Some(day) = report.biggest_day {
            let _ = writeln!(
                out,
                "\n{} Biggest day: {} with {}",
                "⚡".bright_yellow(),
                day.date.to_string().bright_white().bold(),
                format_energy(day.consumption_kwh)
            );
        }
        let _ = writeln!(
            out,
            "   Weekdays {} • Weekends {}",
            format_energy(report.split.weekday_kwh),
            format_energy(report.split.weekend_kwh)
        );
        out
    }

    pub fn display_insights(&self, outcome: &SummaryOutcome, json_output: bool) {
        println!("{}", self.render_insights(outcome, json_output));
    }

    pub fn render_insights(&self, outcome: &SummaryOutcome, json_output: bool) -> String {
        if json_output {
            let value = match outcome {
                SummaryOutcome::Insights(insights) => serde_json::json!({ "insights": insights }),
                SummaryOutcome::Empty => serde_json::json!({ "insights": [] }),
                SummaryOutcome::Unavailable(reason) => {
                    serde_json::json!({ "insights": [], "unavailable": reason })
                }
            };
            return self.to_json(&value);
        }

        match outcome {
            SummaryOutcome::Insights(insights) => {
                let mut out = String::new();
                for insight in insights {
                    let _ = writeln!(
                        out,
                        "{} {}",
                        format!("[{}]", insight.icon).bright_yellow(),
                        insight.title.bright_white().bold()
                    );
                    let _ = writeln!(out, "   {}", insight.description);
                    for item in insight.action_items.iter().flatten() {
                        let _ = writeln!(out, "   • {}", item);
                    }
                    if let Some(context) = &insight.historical_context {
                        let _ = writeln!(out, "   {}", context.dimmed());
                    }
                }
                out
            }
            SummaryOutcome::Empty => "No insights available for this data.".to_string(),
            SummaryOutcome::Unavailable(reason) => format!("Insights unavailable: {}", reason),
        }
    }
}

/// Horizontal bar for `value` on a scale whose top is `ceiling`.
fn bar(value: f64, ceiling: f64) -> String {
    if ceiling <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = (value / ceiling * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.clamp(1, BAR_WIDTH))
}
