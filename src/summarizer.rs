//! Remote Insight Summarizer Boundary
//!
//! A [`Summarizer`] turns the daily feed into a short list of narrative [`AiInsight`]s.
//! It is remote and unreliable, so nothing it does may break the local pipeline:
//!
//! - [`summarize_guarded`] applies a timeout and folds every failure into
//!   [`SummaryOutcome::Unavailable`]
//! - [`normalize_response`] accepts the loose reply shapes language models produce
//!   and falls back to an empty list for anything else
//! - [`InsightCache`] keeps the last successful result per [`UnitMode`] for one
//!   dataset, and drops results that arrive for a dataset that has since been replaced
//!
//! ## Cache lifecycle
//!
//! Every call is issued under an [`InsightTicket`] naming the dataset and mode it was
//! made for. A completed ticket is stored under its own mode, so a toggle while a call
//! is in flight cannot put insights under the wrong mode. A ticket from an older
//! dataset is discarded.

use crate::aggregator::summarize_monthly;
use crate::models::{AiInsight, DailyAggregate, MonthlySummary, UnitMode};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        daily: &[DailyAggregate],
        mode: UnitMode,
    ) -> anyhow::Result<Vec<AiInsight>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Insights(Vec<AiInsight>),
    Empty,
    Unavailable(String),
}

impl SummaryOutcome {
    pub fn from_insights(insights: Vec<AiInsight>) -> Self {
        if insights.is_empty() {
            SummaryOutcome::Empty
        } else {
            SummaryOutcome::Insights(insights)
        }
    }

    /// Insights carried by the outcome; empty unless it is `Insights`.
    pub fn insights(&self) -> &[AiInsight] {
        match self {
            SummaryOutcome::Insights(insights) => insights,
            _ => &[],
        }
    }
}

/// Payload sent to a remote summarizer: the feed condensed to monthly figures.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    #[serde(rename = "monthlyData")]
    pub monthly_data: Vec<MonthlySummary>,
    #[serde(rename = "showCost")]
    pub show_cost: bool,
    pub days: usize,
}

impl SummaryRequest {
    pub fn new(daily: &[DailyAggregate], mode: UnitMode) -> Self {
        Self {
            monthly_data: summarize_monthly(daily, mode),
            show_cost: mode.show_cost(),
            days: daily.len(),
        }
    }
}

/// Run one summarizer call; never fails.
pub async fn summarize_guarded<S: Summarizer + ?Sized>(
    summarizer: &S,
    daily: &[DailyAggregate],
    mode: UnitMode,
    timeout: Duration,
) -> SummaryOutcome {
    match tokio::time::timeout(timeout, summarizer.summarize(daily, mode)).await {
        Ok(Ok(insights)) => {
            debug!(count = insights.len(), %mode, "Summarizer returned insights");
            SummaryOutcome::from_insights(insights)
        }
        Ok(Err(e)) => {
            warn!(error = %e, %mode, "Summarizer call failed");
            SummaryOutcome::Unavailable(format!("{:#}", e))
        }
        Err(_) => {
            warn!(timeout_secs = timeout.as_secs_f64(), %mode, "Summarizer call timed out");
            SummaryOutcome::Unavailable(format!(
                "timed out after {:.1}s",
                timeout.as_secs_f64()
            ))
        }
    }
}

/// Extract insights from a model reply.
///
/// Accepts a bare array, an object with an `insights` array, or a single insight
/// object, either as the whole reply or inside a fenced code block. Entries that do
/// not look like insights are skipped.
pub fn normalize_response(content: &str) -> Vec<AiInsight> {
    if let Ok(value) = serde_json::from_str::<Value>(content.trim()) {
        return insights_from_value(value);
    }

    fenced_block(content)
        .and_then(|block| serde_json::from_str::<Value>(block).ok())
        .map(insights_from_value)
        .unwrap_or_default()
}

fn insights_from_value(value: Value) -> Vec<AiInsight> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("insights") {
            Some(Value::Array(items)) => items,
            Some(_) => Vec::new(),
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

fn fenced_block(content: &str) -> Option<&str> {
    let open = content.find("```")?;
    let rest = &content[open + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let close = rest.find("```")?;
    Some(rest[..close].trim())
}

/// Identifies the dataset and mode a summarizer call was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightTicket {
    pub dataset_id: Uuid,
    pub mode: UnitMode,
}

#[derive(Debug, Default, Clone)]
pub struct InsightCache {
    dataset_id: Uuid,
    entries: HashMap<UnitMode, Vec<AiInsight>>,
}

impl InsightCache {
    pub fn new(dataset_id: Uuid) -> Self {
        Self {
            dataset_id,
            entries: HashMap::new(),
        }
    }

    pub fn dataset_id(&self) -> Uuid {
        self.dataset_id
    }

    pub fn ticket(&self, mode: UnitMode) -> InsightTicket {
        InsightTicket {
            dataset_id: self.dataset_id,
            mode,
        }
    }

    pub fn get(&self, mode: UnitMode) -> Option<&[AiInsight]> {
        self.entries.get(&mode).map(Vec::as_slice)
    }

    /// Store a completed call. Returns `false` when the ticket belongs to another
    /// dataset or the outcome holds no insights.
    pub fn store(&mut self, ticket: InsightTicket, outcome: &SummaryOutcome) -> bool {
        if ticket.dataset_id != self.dataset_id {
            debug!(
                ticket_dataset = %ticket.dataset_id,
                current_dataset = %self.dataset_id,
                "Discarding insights for a replaced dataset"
            );
            return false;
        }

        match outcome {
            SummaryOutcome::Insights(insights) => {
                self.entries.insert(ticket.mode, insights.clone());
                true
            }
            SummaryOutcome::Empty | SummaryOutcome::Unavailable(_) => false,
        }
    }

    /// Forget the entry for one mode only.
    pub fn refresh(&mut self, mode: UnitMode) {
        self.entries.remove(&mode);
    }

    /// Drop every entry and start tracking a new dataset.
    pub fn invalidate(&mut self, dataset_id: Uuid) {
        self.entries.clear();
        self.dataset_id = dataset_id;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
