//! Command-line arguments.
//!
//! The four positional arguments are required and match the deployment
//! command: `als-recommend <INSTANCE_IP> <DB_NAME> <USER> <PASSWORD>`.
//! Every flag defaults to the value the job has always used.

use clap::Parser;
use data_loader::config::{
    DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DEFAULT_RATINGS_TABLE, DEFAULT_RECOMMENDATIONS_TABLE,
    DEFAULT_WRITE_BATCH_SIZE,
};
use data_loader::DbConfig;
use job::orchestrator::DEFAULT_CHUNK_SIZE;
use job::JobConfig;
use pipeline::SelectionConfig;
use trainer::hyperparameters::{
    DEFAULT_ALPHA, DEFAULT_ITERATIONS, DEFAULT_RANK, DEFAULT_REGULARIZATION,
};
use trainer::Hyperparameters;

/// Train an implicit-feedback ALS model on the Rating table and write
/// predictions for every unrated user-song pair to the Recommendation table
#[derive(Debug, Parser)]
#[command(name = "als-recommend")]
#[command(about = "Batch ALS recommendations from a MySQL ratings table", long_about = None)]
pub struct Cli {
    /// Cloud SQL instance IP or hostname
    pub host: String,

    /// Database name
    pub database: String,

    /// Database user
    pub user: String,

    /// Database password
    pub password: String,

    /// MySQL port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Table to read ratings from
    #[arg(long, default_value = DEFAULT_RATINGS_TABLE)]
    pub ratings_table: String,

    /// Table to overwrite with predictions
    #[arg(long, default_value = DEFAULT_RECOMMENDATIONS_TABLE)]
    pub recommendations_table: String,

    /// Number of latent factors
    #[arg(long, default_value_t = DEFAULT_RANK)]
    pub rank: u32,

    /// Regularization (lambda)
    #[arg(long, default_value_t = DEFAULT_REGULARIZATION)]
    pub regularization: f32,

    /// ALS iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u32,

    /// Confidence weight for observed interactions
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: f32,

    /// Keep only the N best predictions per user (default: keep all)
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Drop predictions scoring below this value
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Users scored per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Rows per INSERT statement
    #[arg(long, default_value_t = DEFAULT_WRITE_BATCH_SIZE)]
    pub batch_size: usize,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn db_config(&self) -> DbConfig {
        let mut config = DbConfig::new(&self.host, &self.database, &self.user, &self.password);
        config.port = self.port;
        config.ratings_table = self.ratings_table.clone();
        config.recommendations_table = self.recommendations_table.clone();
        config.write_batch_size = self.batch_size;
        config.max_connections = self.max_connections;
        config
    }

    pub fn job_config(&self) -> JobConfig {
        JobConfig {
            hyperparameters: Hyperparameters {
                rank: self.rank,
                regularization: self.regularization,
                iterations: self.iterations,
                alpha: self.alpha,
            },
            selection: SelectionConfig {
                top_n: self.top_n,
                min_score: self.min_score,
            },
            chunk_size: self.chunk_size,
        }
    }
}
