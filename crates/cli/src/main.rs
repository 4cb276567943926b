mod args;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use data_loader::MySqlStore;
use job::{JobReport, RecommendationJob};
use tracing::info;

use crate::args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db_config = cli.db_config();
    let job_config = cli.job_config();
    info!(?job_config, "Starting ALS recommendation job");

    let store = MySqlStore::connect(db_config)
        .await
        .context("Failed to connect to the ratings database")?;

    let job = RecommendationJob::new(Arc::new(store), job_config);
    let report = job.run().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Human-readable summary of a finished run
fn print_report(report: &JobReport) {
    println!("{}", "ALS recommendation job".bold().blue());
    println!(
        "{} {} ratings from {} users on {} songs",
        "•".green(),
        report.rating_rows,
        report.users,
        report.songs
    );
    println!(
        "{} rank {}, lambda {}, {} iterations, alpha {}",
        "•".green(),
        report.hyperparameters.rank,
        report.hyperparameters.regularization,
        report.hyperparameters.iterations,
        report.hyperparameters.alpha
    );
    println!(
        "{} {} unrated pairs scored, {} rows written",
        "•".cyan(),
        report.predictions_scored,
        report.predictions_written
    );
    println!(
        "{} load {} ms, train {} ms, score and write {} ms (total {} ms)",
        "•".cyan(),
        report.load_ms,
        report.train_ms,
        report.score_and_write_ms,
        report.total_ms
    );
    println!("{} Done", "✓".green());
}
