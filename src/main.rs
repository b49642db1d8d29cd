use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use energy_dashboard::{init_logging, Config, EnergyAnalyzer, ReportOptions};

#[derive(Parser)]
#[command(name = "energy-dashboard")]
#[command(about = "Validate smart-meter exports and report daily energy usage and cost")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daily consumption, generation and cost with statistics
    Report {
        /// CSV export to read
        file: PathBuf,
        /// Report statistics in dollars instead of kWh
        #[arg(long)]
        cost: bool,
        /// Start date filter (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
        /// End date filter (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Show last N days
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show weekly totals with the weekday/weekend split
    Weekly {
        /// CSV export to read
        file: PathBuf,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Ask the remote summarizer for narrative insights
    Insights {
        /// CSV export to read
        file: PathBuf,
        /// Request insights about cost instead of consumption
        #[arg(long)]
        cost: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (command, options) = match cli.command {
        Commands::Report {
            file,
            cost,
            since,
            until,
            json,
            limit,
        } => (
            "report",
            ReportOptions {
                file,
                show_cost: cost,
                json_output: json,
                limit,
                since,
                until,
            },
        ),
        Commands::Weekly { file, json } => (
            "weekly",
            ReportOptions {
                file,
                json_output: json,
                ..ReportOptions::default()
            },
        ),
        Commands::Insights { file, cost, json } => (
            "insights",
            ReportOptions {
                file,
                show_cost: cost,
                json_output: json,
                ..ReportOptions::default()
            },
        ),
    };
    let json = options.json_output;

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => return handle_error(e, json),
    };

    // Keep the guard alive so file logs flush on exit.
    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => return handle_error(e, json),
    };

    let analyzer = EnergyAnalyzer::new(config);
    match analyzer.run_command(command, &options).await {
        Ok(_) => Ok(()),
        Err(e) => handle_error(e, json),
    }
}

fn handle_error(e: anyhow::Error, json: bool) -> Result<(), anyhow::Error> {
    if json {
        println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
    } else {
        eprintln!("Error: {:#}", e);
    }
    process::exit(1);
}
