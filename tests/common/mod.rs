#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use energy_dashboard::{AiInsight, DailyAggregate, Summarizer, UnitMode};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const HEADER: &str = "timestamp,duration,unit,consumption,generation";

pub fn create_test_csv(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// `HEADER` followed by `rows`, one per line.
pub fn csv(rows: &[&str]) -> String {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    content
}

/// One 15-minute reading per day of January 2024, `base + 100 * day` Wh each.
pub fn january_csv(days: u32, base: f64) -> String {
    let rows: Vec<String> = (1..=days)
        .map(|day| format!("2024-01-{:02},900,wh,{},0", day, base + 100.0 * f64::from(day)))
        .collect();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    csv(&refs)
}

pub fn insight(title: &str) -> AiInsight {
    AiInsight {
        title: title.to_string(),
        description: format!("{} description", title),
        icon: "lightbulb".to_string(),
        action_items: Some(vec!["Do something".to_string()]),
        historical_context: None,
        location_impact: None,
        potential_savings: None,
    }
}

/// Summarizer that counts calls and answers with one insight titled after the mode.
#[derive(Default)]
pub struct CountingSummarizer {
    pub calls: AtomicUsize,
    pub modes: Mutex<Vec<UnitMode>>,
}

impl CountingSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for CountingSummarizer {
    async fn summarize(&self, _daily: &[DailyAggregate], mode: UnitMode) -> Result<Vec<AiInsight>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.lock().unwrap().push(mode);
        Ok(vec![insight(&format!("{} insight", mode))])
    }
}

/// Summarizer that always fails.
pub struct BrokenSummarizer;

#[async_trait]
impl Summarizer for BrokenSummarizer {
    async fn summarize(&self, _daily: &[DailyAggregate], _mode: UnitMode) -> Result<Vec<AiInsight>> {
        Err(anyhow::anyhow!("service unavailable"))
    }
}
