//! Energy Dashboard Library
//!
//! A Rust library for turning smart-meter CSV exports into validated daily energy
//! aggregates, date-range views, statistical insights and optional narrative insights
//! from a remote language-model summarizer.
//!
//! ## Core Features
//!
//! - **All-or-nothing validation**: every bad row of a file is reported at once and a
//!   file with any bad row yields no data
//! - **Daily aggregation**: Wh readings bucketed by calendar date into kWh and cost
//! - **Range views**: clamped start/end selection over the dataset span
//! - **Statistics**: total, average, extremes, trend and a savings projection in either
//!   consumption or cost mode
//! - **Remote insights**: guarded summarizer calls with a per-mode cache
//!
//! ## Architecture Overview
//!
//! - [`models`] - Readings, daily aggregates, rollups, statistics and insights
//! - [`validator`] - Validation of one CSV row into a [`Reading`]
//! - [`parser`] - Whole-file parsing with all-or-nothing semantics
//! - [`aggregator`] - Daily, weekly and monthly rollups
//! - [`range`] - Date-range filtering and the clamped selection
//! - [`insights`] - Statistics over the visible days
//! - [`summarizer`] - The remote summarizer boundary and insight cache
//! - [`session`] - Per-user state tying the pipeline together
//! - [`analyzer`] - Command coordinator used by the CLI
//! - [`display`] - Terminal and JSON output
//! - [`config`] - Configuration management with environment variable support
//! - [`logging`] - Structured logging with JSON and pretty-print formats
//!
//! ## Main Entry Point
//!
//! ```rust
//! use energy_dashboard::{DashboardSession, UnitMode};
//!
//! let mut session = DashboardSession::new();
//! session.load_payload(
//!     "timestamp,duration,unit,consumption,generation\n\
//!      2024-01-01,900,wh,2500,100\n",
//! )?;
//! session.set_unit_mode(UnitMode::Cost);
//!
//! let stats = session.stats().expect("one visible day");
//! assert_eq!(stats.total, 0.35);
//! # Ok::<(), energy_dashboard::ParseError>(())
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod insights;
pub mod logging;
pub mod models;
#[cfg(feature = "ai")]
pub mod openai;
pub mod parser;
pub mod range;
pub mod session;
pub mod summarizer;
pub mod timestamp_parser;
pub mod validator;

pub use analyzer::{EnergyAnalyzer, ReportOptions};
pub use config::Config;
pub use error::{ParseError, RowError, RowErrorKind, RowFailure};
pub use logging::init_logging;
pub use models::*;
#[cfg(feature = "ai")]
pub use openai::OpenAiSummarizer;
pub use parser::FileParser;
pub use range::RangeSelection;
pub use session::DashboardSession;
pub use summarizer::{InsightCache, InsightTicket, Summarizer, SummaryOutcome};
