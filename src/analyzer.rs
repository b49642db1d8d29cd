//! Energy Analysis Engine
//!
//! This module coordinates one command from file to terminal. It loads the file into
//! a [`DashboardSession`], applies the requested unit mode and date range, and hands the
//! results to the [`DisplayManager`].
//!
//! ## Command Processing
//!
//! - **report**: the visible days plus statistics in the selected unit mode
//! - **weekly**: Sunday-start weekly rollups with the biggest day and weekday/weekend split
//! - **insights**: narrative insights from the remote summarizer
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use energy_dashboard::{Config, EnergyAnalyzer, ReportOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let analyzer = EnergyAnalyzer::new(Config::default());
//! let options = ReportOptions {
//!     file: "usage.csv".into(),
//!     show_cost: true,
//!     ..ReportOptions::default()
//! };
//! analyzer.run_command("report", &options).await?;
//! # Ok(())
//! # }
//! ```

use crate::aggregator::{aggregate_weekly, biggest_use_day, weekend_weekday_split};
use crate::config::Config;
use crate::display::{DailyReport, DisplayManager, WeeklyReport};
use crate::models::UnitMode;
use crate::session::DashboardSession;
use crate::summarizer::{Summarizer, SummaryOutcome};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub file: PathBuf,
    pub show_cost: bool,
    pub json_output: bool,
    pub limit: Option<usize>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

pub struct EnergyAnalyzer {
    config: Config,
    display_manager: DisplayManager,
}

impl EnergyAnalyzer {
    pub fn new(config: Config) -> Self {
        let display_manager = DisplayManager::with_json_pretty(config.output.json_pretty);
        Self {
            config,
            display_manager,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run_command(&self, command: &str, options: &ReportOptions) -> Result<()> {
        match command {
            "report" => self.report(options),
            "weekly" => self.weekly(options),
            "insights" => self.insights(options).await,
            _ => {
                warn!(command = %command, "Unknown command requested");
                Err(anyhow::anyhow!("Unknown command: {}", command))
            }
        }
    }

    /// Load the file and apply mode and range from `options`.
    pub fn load_session(&self, options: &ReportOptions) -> Result<DashboardSession> {
        let mut session = DashboardSession::new();
        session
            .load_file(&options.file)
            .with_context(|| format!("Failed to load {}", options.file.display()))?;

        session.set_unit_mode(UnitMode::from_show_cost(options.show_cost));
        if let Some(since) = options.since {
            session.set_range_start(since);
        }
        if let Some(until) = options.until {
            session.set_range_end(until);
        }

        debug!(
            dataset = %session.dataset_id(),
            mode = %session.unit_mode(),
            visible_days = session.visible().len(),
            "Session prepared"
        );
        Ok(session)
    }

    fn report(&self, options: &ReportOptions) -> Result<()> {
        let session = self.load_session(options)?;
        let report = DailyReport {
            days: session.visible(),
            stats: session.stats(),
            total_span: session.total_span(),
            range: session.range(),
            mode: session.unit_mode(),
        };
        let limit = options.limit.or(Some(self.config.output.default_limit));
        self.display_manager
            .display_daily(&report, limit, options.json_output);
        Ok(())
    }

    fn weekly(&self, options: &ReportOptions) -> Result<()> {
        let session = self.load_session(options)?;
        let daily = session.daily();
        let weeks = aggregate_weekly(daily);
        let report = WeeklyReport {
            weeks: &weeks,
            biggest_day: biggest_use_day(daily),
            split: weekend_weekday_split(daily),
        };
        self.display_manager
            .display_weekly(&report, options.json_output);
        Ok(())
    }

    async fn insights(&self, options: &ReportOptions) -> Result<()> {
        let mut session = self.load_session(options)?;

        let outcome = match self.summarizer() {
            Ok(summarizer) => {
                session
                    .insights(summarizer.as_ref(), self.config.summarizer.timeout())
                    .await
            }
            Err(e) => {
                info!(reason = %e, "Summarizer not available");
                SummaryOutcome::Unavailable(e.to_string())
            }
        };

        self.display_manager
            .display_insights(&outcome, options.json_output);
        Ok(())
    }

    #[cfg(feature = "ai")]
    fn summarizer(&self) -> Result<Box<dyn Summarizer>> {
        if !self.config.summarizer.enabled {
            return Err(anyhow::anyhow!("summarizer disabled in configuration"));
        }
        let summarizer = crate::openai::OpenAiSummarizer::from_config(&self.config.summarizer)?;
        Ok(Box::new(summarizer))
    }

    #[cfg(not(feature = "ai"))]
    fn summarizer(&self) -> Result<Box<dyn Summarizer>> {
        Err(anyhow::anyhow!("built without the `ai` feature"))
    }
}
