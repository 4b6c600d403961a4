//! Smart Delivery ETA CLI
//!
//! A command-line tool for predicting delivery times, running AI decision
//! analyses and emailing decision reports through the ETA service.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{analyze, predict, status};
use std::path::PathBuf;

/// Smart Delivery ETA CLI
#[derive(Parser)]
#[command(name = "eta")]
#[command(author, version, about = "CLI for the Smart Delivery ETA service", long_about = None)]
pub struct Cli {
    /// Service URL (can also be set via ETA_API_URL env var)
    #[arg(long, env = "ETA_API_URL", default_value = "http://localhost:7860")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Business domain for the decision analysis
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Domain {
    #[default]
    Delivery,
    Academic,
}

impl Domain {
    fn as_str(&self) -> &'static str {
        match self {
            Domain::Delivery => "delivery",
            Domain::Academic => "academic",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the delivery time for an order
    Predict {
        /// Delivery partner age
        #[arg(long, default_value_t = 30.0)]
        age: f32,

        /// Delivery partner rating (1.0 - 5.0)
        #[arg(long, default_value_t = 4.5)]
        rating: f32,

        /// Distance in km
        #[arg(long, default_value_t = 5.0)]
        distance: f32,

        /// Type of order
        #[arg(long, default_value = "Meal", value_parser = ["Buffet", "Drinks", "Meal", "Snack"])]
        order_type: String,

        /// Type of vehicle
        #[arg(
            long,
            default_value = "Motorcycle",
            value_parser = ["Bicycle", "Electric Scooter", "Motorcycle", "Scooter"]
        )]
        vehicle_type: String,
    },

    /// Run an AI decision analysis
    Analyze {
        /// Domain whose signals are analysed
        #[arg(long, value_enum, default_value_t = Domain::Delivery)]
        domain: Domain,
    },

    /// Email a decision report (runs an analysis when no record is given)
    SendEmail {
        /// JSON file holding the decision record to send
        #[arg(long)]
        from_file: Option<PathBuf>,
    },

    /// Show service component health
    Status,
}

async fn run(cli: Cli) -> Result<()> {
    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Predict {
            age,
            rating,
            distance,
            order_type,
            vehicle_type,
        } => {
            let request = client::PredictRequest {
                age,
                rating,
                distance,
                order_type,
                vehicle_type,
            };
            predict::predict(&client, request, cli.format).await?;
        }
        Commands::Analyze { domain } => {
            analyze::analyze(&client, domain.as_str(), cli.format).await?;
        }
        Commands::SendEmail { from_file } => {
            analyze::send_email(&client, from_file.as_deref(), cli.format).await?;
        }
        Commands::Status => {
            status::show_status(&client, cli.format).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
