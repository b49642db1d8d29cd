use crate::models::{DailyAggregate, UnitMode};

/// `1234.5` -> `$1,234.50`
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&format!("{:.2}", value.abs())))
}

/// `1234.56` -> `1,234.6 kWh`
pub fn format_energy(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{} kWh", sign, group_thousands(&format!("{:.1}", value.abs())))
}

pub fn format_value(value: f64, mode: UnitMode) -> String {
    match mode {
        UnitMode::Consumption => format_energy(value),
        UnitMode::Cost => format_currency(value),
    }
}

/// Upper bound for a chart axis: the largest value plus ten percent, rounded up.
pub fn chart_ceiling(days: &[DailyAggregate], mode: UnitMode) -> f64 {
    days.iter()
        .map(|day| mode.value_of(day))
        .fold(None, |max: Option<f64>, value| Some(max.map_or(value, |m| m.max(value))))
        .map(|max| (max * 1.1).ceil())
        .unwrap_or(0.0)
}

fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}
