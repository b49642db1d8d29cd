//! Core Data Models
//!
//! This module defines the data structures that flow through the energy usage pipeline,
//! from raw interval readings to the daily rollups and statistics shown in reports.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`Reading`] - One validated interval record from an uploaded file
//! 2. **Aggregation**: [`DailyAggregate`] - One calendar-day rollup of readings
//! 3. **Views**: [`WeeklyAggregate`], [`MonthlySummary`] - Coarser rollups of the daily feed
//! 4. **Statistics**: [`InsightStats`] - Closed-form figures over the visible days
//! 5. **Remote**: [`AiInsight`] - Narrative insights returned by a summarizer
//!
//! ## Units
//!
//! Readings are in watt-hours. Every aggregate is in kilowatt-hours and US dollars,
//! rounded to two decimals once, when the aggregate is emitted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat electricity rate applied to consumption, in USD per kWh.
pub const RATE_PER_KWH: f64 = 0.14;

/// Fraction of the total assumed recoverable in the savings projection.
pub const SAVINGS_FACTOR: f64 = 0.20;

/// Number of days at each end of the view compared by the trend figure.
pub const TREND_WINDOW_DAYS: usize = 7;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Selects whether figures are expressed as energy or as money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    #[default]
    Consumption,
    Cost,
}

impl UnitMode {
    pub fn toggled(self) -> Self {
        match self {
            UnitMode::Consumption => UnitMode::Cost,
            UnitMode::Cost => UnitMode::Consumption,
        }
    }

    pub fn from_show_cost(show_cost: bool) -> Self {
        if show_cost {
            UnitMode::Cost
        } else {
            UnitMode::Consumption
        }
    }

    pub fn show_cost(self) -> bool {
        self == UnitMode::Cost
    }

    /// The figure of a day this mode reads.
    pub fn value_of(self, day: &DailyAggregate) -> f64 {
        match self {
            UnitMode::Consumption => day.consumption_kwh,
            UnitMode::Cost => day.cost_usd,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitMode::Consumption => "Consumption",
            UnitMode::Cost => "Cost",
        }
    }
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One validated interval record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Timestamp exactly as written in the source file.
    pub timestamp: String,
    /// Calendar date portion of `timestamp`; any UTC offset is not applied.
    pub date: NaiveDate,
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: f64,
    pub unit: String,
    /// Watt-hours consumed during the interval.
    pub consumption: f64,
    /// Watt-hours generated during the interval.
    pub generation: f64,
}

/// One calendar-day rollup. `date` is unique across an aggregated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    #[serde(rename = "consumptionKWh")]
    pub consumption_kwh: f64,
    #[serde(rename = "generationKWh")]
    pub generation_kwh: f64,
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAggregate {
    /// Sunday that opens the week.
    #[serde(rename = "weekStart")]
    pub week_start: NaiveDate,
    pub days: u32,
    #[serde(rename = "consumptionKWh")]
    pub consumption_kwh: f64,
    #[serde(rename = "generationKWh")]
    pub generation_kwh: f64,
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
    #[serde(rename = "weekdayConsumptionKWh")]
    pub weekday_consumption_kwh: f64,
    #[serde(rename = "weekendConsumptionKWh")]
    pub weekend_consumption_kwh: f64,
}

/// Per-month figures over the field selected by a [`UnitMode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub days: u32,
    pub total: f64,
    pub average: f64,
    pub max: f64,
    #[serde(rename = "maxDate")]
    pub max_date: NaiveDate,
    pub min: f64,
    #[serde(rename = "minDate")]
    pub min_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct UsageSplit {
    #[serde(rename = "weekdayKWh")]
    pub weekday_kwh: f64,
    #[serde(rename = "weekendKWh")]
    pub weekend_kwh: f64,
}

/// Inclusive calendar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Statistics over the days currently in view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightStats {
    pub mode: UnitMode,
    pub days: usize,
    pub total: f64,
    pub average: f64,
    pub maximum: DayValue,
    pub minimum: DayValue,
    /// Change of the last-window average against the first-window average, in percent.
    #[serde(rename = "trendPct")]
    pub trend_pct: f64,
    #[serde(rename = "potentialSavings")]
    pub potential_savings: f64,
}

/// A narrative insight produced by a remote summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    pub title: String,
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(rename = "actionItems", default, skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Vec<String>>,
    #[serde(rename = "historicalContext", default, skip_serializing_if = "Option::is_none")]
    pub historical_context: Option<String>,
    #[serde(rename = "locationImpact", default, skip_serializing_if = "Option::is_none")]
    pub location_impact: Option<String>,
    #[serde(rename = "potentialSavings", default, skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<String>,
}

fn default_icon() -> String {
    "lightbulb".to_string()
}
