//! Dashboard Session State
//!
//! [`DashboardSession`] holds everything one user works with: the canonical daily feed
//! built from the last uploaded file, the unit mode, the date-range selection over that
//! feed and the insight cache. Each user intent is one method call, and every derived
//! figure is recomputed from current state when asked for.
//!
//! ## Events
//!
//! - **Upload** ([`DashboardSession::load_payload`]) - rebuilds the feed, selects the full
//!   range and invalidates cached insights. A rejected file leaves the session untouched.
//! - **Reset** ([`DashboardSession::reset`]) - empties the feed, returns to consumption
//!   mode and invalidates cached insights.
//! - **Toggle** ([`DashboardSession::toggle_unit`]) - switches between consumption and cost.
//! - **Range change** ([`DashboardSession::set_range_start`] and friends) - clamped moves
//!   of the visible interval.
//! - **Refresh** ([`DashboardSession::refresh_insights`]) - drops the cached insights for
//!   the current mode and asks the summarizer again.
//!
//! ## Insights
//!
//! Statistics come from the visible days. Narrative insights are requested for the full
//! feed and cached per unit mode, either in one step with
//! [`DashboardSession::insights`] or split with [`DashboardSession::begin_insights`] and
//! [`DashboardSession::complete_insights`] when the call runs elsewhere.

use crate::aggregator::aggregate_daily;
use crate::error::ParseError;
use crate::insights::compute_stats;
use crate::models::{AiInsight, DailyAggregate, DateRange, InsightStats, Reading, UnitMode};
use crate::parser::FileParser;
use crate::range::RangeSelection;
use crate::summarizer::{summarize_guarded, InsightCache, InsightTicket, Summarizer, SummaryOutcome};
use chrono::NaiveDate;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DashboardSession {
    dataset_id: Uuid,
    readings: usize,
    daily: Vec<DailyAggregate>,
    selection: Option<RangeSelection>,
    mode: UnitMode,
    insight_cache: InsightCache,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        let dataset_id = Uuid::new_v4();
        Self {
            dataset_id,
            readings: 0,
            daily: Vec::new(),
            selection: None,
            mode: UnitMode::default(),
            insight_cache: InsightCache::new(dataset_id),
        }
    }

    pub fn load_payload(&mut self, payload: &str) -> Result<&[DailyAggregate], ParseError> {
        let readings = FileParser::new().parse_payload(payload)?;
        Ok(self.load_readings(&readings))
    }

    pub fn load_file(&mut self, path: &Path) -> Result<&[DailyAggregate], ParseError> {
        let readings = FileParser::new().parse_file(path)?;
        Ok(self.load_readings(&readings))
    }

    /// Replace the dataset with `readings`.
    pub fn load_readings(&mut self, readings: &[Reading]) -> &[DailyAggregate] {
        self.replace_dataset(readings.len(), aggregate_daily(readings));
        info!(
            dataset = %self.dataset_id,
            readings = self.readings,
            days = self.daily.len(),
            "Loaded energy dataset"
        );
        &self.daily
    }

    /// Drop the dataset and return to consumption mode.
    pub fn reset(&mut self) {
        self.replace_dataset(0, Vec::new());
        self.mode = UnitMode::default();
    }

    fn replace_dataset(&mut self, readings: usize, daily: Vec<DailyAggregate>) {
        self.dataset_id = Uuid::new_v4();
        self.readings = readings;
        self.selection = RangeSelection::for_dataset(&daily);
        self.daily = daily;
        self.insight_cache.invalidate(self.dataset_id);
    }

    pub fn dataset_id(&self) -> Uuid {
        self.dataset_id
    }

    pub fn reading_count(&self) -> usize {
        self.readings
    }

    pub fn has_data(&self) -> bool {
        !self.daily.is_empty()
    }

    /// The canonical, unfiltered daily feed.
    pub fn daily(&self) -> &[DailyAggregate] {
        &self.daily
    }

    /// Days inside the selected range.
    pub fn visible(&self) -> &[DailyAggregate] {
        match &self.selection {
            Some(selection) => selection.apply(&self.daily),
            None => &[],
        }
    }

    pub fn unit_mode(&self) -> UnitMode {
        self.mode
    }

    pub fn set_unit_mode(&mut self, mode: UnitMode) {
        self.mode = mode;
    }

    pub fn toggle_unit(&mut self) -> UnitMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Min and max dates of the whole dataset.
    pub fn total_span(&self) -> Option<DateRange> {
        self.selection.as_ref().map(RangeSelection::bounds)
    }

    pub fn range(&self) -> Option<DateRange> {
        self.selection.as_ref().map(RangeSelection::range)
    }

    pub fn set_range_start(&mut self, start: NaiveDate) -> Option<DateRange> {
        self.selection.as_mut().map(|selection| selection.set_start(start))
    }

    pub fn set_range_end(&mut self, end: NaiveDate) -> Option<DateRange> {
        self.selection.as_mut().map(|selection| selection.set_end(end))
    }

    pub fn reset_range(&mut self) -> Option<DateRange> {
        self.selection.as_mut().map(RangeSelection::reset)
    }

    /// Statistics over the visible days in the current unit mode.
    pub fn stats(&self) -> Option<InsightStats> {
        compute_stats(self.visible(), self.mode)
    }

    pub fn cached_insights(&self) -> Option<&[AiInsight]> {
        self.insight_cache.get(self.mode)
    }

    /// Drop the cached insights for the current mode only and ask the summarizer again.
    pub async fn refresh_insights<S: Summarizer + ?Sized>(
        &mut self,
        summarizer: &S,
        timeout: Duration,
    ) -> SummaryOutcome {
        self.insight_cache.refresh(self.mode);
        self.insights(summarizer, timeout).await
    }

    /// Ticket for a summarizer call on the current dataset and mode, or `None` when
    /// there is nothing to summarize.
    pub fn begin_insights(&self) -> Option<InsightTicket> {
        if self.daily.is_empty() {
            return None;
        }
        Some(self.insight_cache.ticket(self.mode))
    }

    /// Merge a finished call. Returns whether it was cached.
    pub fn complete_insights(&mut self, ticket: InsightTicket, outcome: &SummaryOutcome) -> bool {
        let stored = self.insight_cache.store(ticket, outcome);
        if !stored && ticket.dataset_id != self.dataset_id {
            warn!(mode = %ticket.mode, "Ignoring insights that arrived for a replaced dataset");
        }
        stored
    }

    /// Cached insights for the current mode, or a fresh summarizer call.
    pub async fn insights<S: Summarizer + ?Sized>(
        &mut self,
        summarizer: &S,
        timeout: Duration,
    ) -> SummaryOutcome {
        if let Some(cached) = self.cached_insights() {
            return SummaryOutcome::Insights(cached.to_vec());
        }

        let Some(ticket) = self.begin_insights() else {
            return SummaryOutcome::Empty;
        };

        let outcome = summarize_guarded(summarizer, &self.daily, ticket.mode, timeout).await;
        self.complete_insights(ticket, &outcome);
        outcome
    }
}
