//! Closed-form statistics over the days currently in view.
//!
//! The trend compares the average of the first [`TREND_WINDOW_DAYS`] days with the
//! average of the last [`TREND_WINDOW_DAYS`] days. With fewer than twice that many
//! days the two windows overlap and share days; they are not deduplicated.

use crate::models::*;

/// Statistics over `days` for the field `mode` selects; `None` when `days` is empty.
pub fn compute_stats(days: &[DailyAggregate], mode: UnitMode) -> Option<InsightStats> {
    let first = days.first()?;
    let seed = DayValue {
        date: first.date,
        value: mode.value_of(first),
    };

    let mut total = 0.0;
    let mut maximum = seed;
    let mut minimum = seed;
    for day in days {
        let value = mode.value_of(day);
        total += value;
        if value > maximum.value {
            maximum = DayValue { date: day.date, value };
        }
        if value < minimum.value {
            minimum = DayValue { date: day.date, value };
        }
    }

    Some(InsightStats {
        mode,
        days: days.len(),
        total,
        average: total / days.len() as f64,
        maximum,
        minimum,
        trend_pct: trend_pct(days, mode),
        potential_savings: total * SAVINGS_FACTOR,
    })
}

/// Percent change of the last window's average over the first window's average.
/// A zero (or otherwise unusable) first-window average yields `0.0`.
pub fn trend_pct(days: &[DailyAggregate], mode: UnitMode) -> f64 {
    let window = TREND_WINDOW_DAYS.min(days.len());
    if window == 0 {
        return 0.0;
    }

    let first_avg = window_average(&days[..window], mode);
    let last_avg = window_average(&days[days.len() - window..], mode);
    if first_avg == 0.0 || !first_avg.is_finite() {
        return 0.0;
    }

    let pct = (last_avg - first_avg) / first_avg * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

fn window_average(window: &[DailyAggregate], mode: UnitMode) -> f64 {
    window.iter().map(|day| mode.value_of(day)).sum::<f64>() / window.len() as f64
}
