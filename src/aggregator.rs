//! Daily Aggregation
//!
//! Folds interval [`Reading`]s into one [`DailyAggregate`] per calendar date and derives
//! the coarser views used by reports and the insight summarizer.
//!
//! ## Rollups
//!
//! - [`aggregate_daily`] - Canonical per-day feed, sorted ascending by date
//! - [`aggregate_weekly`] - Sunday-start weeks with weekday/weekend consumption
//! - [`summarize_monthly`] - Per-month totals and extremes over one [`UnitMode`] field
//! - [`biggest_use_day`] and [`weekend_weekday_split`] - Quick consumption figures
//!
//! Sums are accumulated in full precision and rounded to two decimals only when a
//! rollup is emitted. Every function here is pure: the same input always yields the
//! same output.

use crate::models::*;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;
use tracing::debug;

const WH_PER_KWH: f64 = 1000.0;

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    consumption_kwh: f64,
    generation_kwh: f64,
}

/// Group readings by the date they were recorded on. Input order does not matter.
pub fn aggregate_daily(readings: &[Reading]) -> Vec<DailyAggregate> {
    let mut by_date: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for reading in readings {
        let totals = by_date.entry(reading.date).or_default();
        totals.consumption_kwh += reading.consumption / WH_PER_KWH;
        totals.generation_kwh += reading.generation / WH_PER_KWH;
    }

    let daily: Vec<DailyAggregate> = by_date
        .into_iter()
        .map(|(date, totals)| DailyAggregate {
            date,
            consumption_kwh: round2(totals.consumption_kwh),
            generation_kwh: round2(totals.generation_kwh),
            cost_usd: round2(totals.consumption_kwh * RATE_PER_KWH),
        })
        .collect();

    debug!(
        readings = readings.len(),
        days = daily.len(),
        first = ?daily.first().map(|d| d.date),
        last = ?daily.last().map(|d| d.date),
        "Aggregated readings into daily totals"
    );

    daily
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Roll daily aggregates up into Sunday-start weeks, sorted by week start.
pub fn aggregate_weekly(daily: &[DailyAggregate]) -> Vec<WeeklyAggregate> {
    let mut weeks: BTreeMap<NaiveDate, WeeklyAggregate> = BTreeMap::new();

    for day in daily {
        let start = week_start(day.date);
        let week = weeks.entry(start).or_insert_with(|| WeeklyAggregate {
            week_start: start,
            days: 0,
            consumption_kwh: 0.0,
            generation_kwh: 0.0,
            cost_usd: 0.0,
            weekday_consumption_kwh: 0.0,
            weekend_consumption_kwh: 0.0,
        });

        week.days += 1;
        week.consumption_kwh += day.consumption_kwh;
        week.generation_kwh += day.generation_kwh;
        week.cost_usd += day.cost_usd;
        if is_weekend(day.date) {
            week.weekend_consumption_kwh += day.consumption_kwh;
        } else {
            week.weekday_consumption_kwh += day.consumption_kwh;
        }
    }

    weeks
        .into_values()
        .map(|mut week| {
            week.consumption_kwh = round2(week.consumption_kwh);
            week.generation_kwh = round2(week.generation_kwh);
            week.cost_usd = round2(week.cost_usd);
            week.weekday_consumption_kwh = round2(week.weekday_consumption_kwh);
            week.weekend_consumption_kwh = round2(week.weekend_consumption_kwh);
            week
        })
        .collect()
}

/// Per-month figures over the field `mode` selects, sorted by month.
pub fn summarize_monthly(daily: &[DailyAggregate], mode: UnitMode) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<(i32, u32), MonthlySummary> = BTreeMap::new();

    for day in daily {
        let value = mode.value_of(day);
        let key = (day.date.year(), day.date.month());
        let month = months.entry(key).or_insert_with(|| MonthlySummary {
            month: day.date.format("%Y-%m").to_string(),
            days: 0,
            total: 0.0,
            average: 0.0,
            max: value,
            max_date: day.date,
            min: value,
            min_date: day.date,
        });

        month.days += 1;
        month.total += value;
        if value > month.max {
            month.max = value;
            month.max_date = day.date;
        }
        if value < month.min {
            month.min = value;
            month.min_date = day.date;
        }
    }

    months
        .into_values()
        .map(|mut month| {
            month.average = round2(month.total / f64::from(month.days));
            month.total = round2(month.total);
            month
        })
        .collect()
}

/// The day with the greatest consumption; the earliest wins a tie.
pub fn biggest_use_day(daily: &[DailyAggregate]) -> Option<&DailyAggregate> {
    daily.iter().fold(None, |best: Option<&DailyAggregate>, day| match best {
        Some(current) if day.consumption_kwh <= current.consumption_kwh => Some(current),
        _ => Some(day),
    })
}

pub fn weekend_weekday_split(daily: &[DailyAggregate]) -> UsageSplit {
    let split = daily.iter().fold(UsageSplit::default(), |mut acc, day| {
        if is_weekend(day.date) {
            acc.weekend_kwh += day.consumption_kwh;
        } else {
            acc.weekday_kwh += day.consumption_kwh;
        }
        acc
    });

    UsageSplit {
        weekday_kwh: round2(split.weekday_kwh),
        weekend_kwh: round2(split.weekend_kwh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading(timestamp: &str, consumption: f64, generation: f64) -> Reading {
        Reading {
            timestamp: timestamp.to_string(),
            date: date(
                timestamp[0..4].parse().unwrap(),
                timestamp[5..7].parse().unwrap(),
                timestamp[8..10].parse().unwrap(),
            ),
            duration_seconds: 900.0,
            unit: "wh".to_string(),
            consumption,
            generation,
        }
    }

    fn day(d: NaiveDate, consumption_kwh: f64) -> DailyAggregate {
        DailyAggregate {
            date: d,
            consumption_kwh,
            generation_kwh: 0.0,
            cost_usd: round2(consumption_kwh * RATE_PER_KWH),
        }
    }

    #[test]
    fn test_unit_conversion_and_cost() {
        let daily = aggregate_daily(&[reading("2024-03-01", 1000.0, 0.0)]);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].consumption_kwh, 1.0);
        assert_eq!(daily[0].cost_usd, 0.14);
    }

    #[test]
    fn test_groups_sub_day_readings() {
        let daily = aggregate_daily(&[
            reading("2024-01-01", 2000.0, 0.0),
            reading("2024-01-01T18:00:00-08:00", 500.0, 100.0),
        ]);
        assert_eq!(
            daily,
            vec![DailyAggregate {
                date: date(2024, 1, 1),
                consumption_kwh: 2.5,
                generation_kwh: 0.1,
                cost_usd: 0.35,
            }]
        );
    }

    #[test]
    fn test_sorted_and_unique() {
        let daily = aggregate_daily(&[
            reading("2024-01-03", 1.0, 0.0),
            reading("2023-12-31", 1.0, 0.0),
            reading("2024-01-03T01:00:00+00:00", 1.0, 0.0),
            reading("2024-01-02", 1.0, 0.0),
        ]);
        assert_eq!(daily.len(), 3);
        assert!(daily.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn test_rounds_once_at_emission() {
        // Ten readings of 4 Wh: rounding each to 0.00 kWh would lose the day entirely.
        let readings: Vec<Reading> = (0..10).map(|_| reading("2024-01-01", 4.0, 0.0)).collect();
        let daily = aggregate_daily(&readings);
        assert_eq!(daily[0].consumption_kwh, 0.04);
        assert_eq!(daily[0].cost_usd, 0.01);
    }

    #[test]
    fn test_cost_uses_unrounded_consumption() {
        // 3.6066 kWh shows as 3.61, yet 3.6066 * 0.14 = 0.5049 (3.61 * 0.14 would be 0.5054).
        let daily = aggregate_daily(&[reading("2024-01-01", 3606.6, 0.0)]);
        assert_eq!(daily[0].consumption_kwh, 3.61);
        assert_eq!(daily[0].cost_usd, 0.5);
    }

    #[test]
    fn test_idempotent() {
        let readings = vec![
            reading("2024-01-02", 1234.5, 10.0),
            reading("2024-01-01", 333.3, 0.0),
            reading("2024-01-02T12:00:00+01:00", 66.6, 5.0),
        ];
        assert_eq!(aggregate_daily(&readings), aggregate_daily(&readings));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_daily(&[]).is_empty());
        assert!(aggregate_weekly(&[]).is_empty());
        assert!(summarize_monthly(&[], UnitMode::Cost).is_empty());
        assert!(biggest_use_day(&[]).is_none());
    }

    #[test]
    fn test_weekly_rollup() {
        // 2024-01-06 is a Saturday, 2024-01-07 a Sunday that opens the next week.
        let daily = vec![
            day(date(2024, 1, 5), 10.0),
            day(date(2024, 1, 6), 4.0),
            day(date(2024, 1, 7), 3.0),
            day(date(2024, 1, 8), 5.0),
        ];
        let weeks = aggregate_weekly(&daily);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_start, date(2023, 12, 31));
        assert_eq!(weeks[0].days, 2);
        assert_eq!(weeks[0].weekday_consumption_kwh, 10.0);
        assert_eq!(weeks[0].weekend_consumption_kwh, 4.0);
        assert_eq!(weeks[1].week_start, date(2024, 1, 7));
        assert_eq!(weeks[1].consumption_kwh, 8.0);
        assert_eq!(weeks[1].weekend_consumption_kwh, 3.0);
    }

    #[test]
    fn test_monthly_summary() {
        let daily = vec![
            day(date(2024, 1, 30), 2.0),
            day(date(2024, 1, 31), 6.0),
            day(date(2024, 2, 1), 3.0),
        ];
        let months = summarize_monthly(&daily, UnitMode::Consumption);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-01");
        assert_eq!(months[0].total, 8.0);
        assert_eq!(months[0].average, 4.0);
        assert_eq!(months[0].max_date, date(2024, 1, 31));
        assert_eq!(months[0].min_date, date(2024, 1, 30));
        assert_eq!(months[1].days, 1);
    }

    #[test]
    fn test_biggest_use_day_first_wins() {
        let daily = vec![
            day(date(2024, 1, 1), 2.0),
            day(date(2024, 1, 2), 7.0),
            day(date(2024, 1, 3), 7.0),
        ];
        assert_eq!(biggest_use_day(&daily).unwrap().date, date(2024, 1, 2));
    }

    #[test]
    fn test_weekend_split() {
        let daily = vec![
            day(date(2024, 1, 5), 1.5),
            day(date(2024, 1, 6), 2.0),
            day(date(2024, 1, 7), 2.5),
        ];
        let split = weekend_weekday_split(&daily);
        assert_eq!(split.weekday_kwh, 1.5);
        assert_eq!(split.weekend_kwh, 4.5);
    }
}
