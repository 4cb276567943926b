//! # Recommendation Job
//!
//! This module coordinates the whole batch run:
//! 1. Load the ratings table into a shared RatingSet
//! 2. Train the implicit ALS model (blocking thread)
//! 3. Open an overwrite of the recommendations table
//! 4. Enumerate unrated pairs chunk by chunk, score them, run the filters and
//!    stream each chunk's survivors into the open overwrite
//! 5. Commit, and return a report with counts and stage timings
//!
//! Scoring runs on a blocking thread and hands chunks to the writer over a
//! bounded channel, so at most a few chunks of predictions are in memory.
//! Any error aborts the run before commit, which leaves the previous
//! recommendations in place.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use data_loader::{Prediction, RatingSet, RatingStore};
use pipeline::{FilterPipeline, SelectionConfig};
use sources::UnratedPairSource;
use trainer::{FactorModel, Hyperparameters};

/// Users scored per chunk by default
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Scored chunks allowed to wait for the writer
const WRITE_QUEUE_DEPTH: usize = 2;

/// Everything the job needs besides the store
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JobConfig {
    pub hyperparameters: Hyperparameters,
    pub selection: SelectionConfig,
    /// Users per candidate/scoring chunk
    pub chunk_size: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            hyperparameters: Hyperparameters::default(),
            selection: SelectionConfig::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Summary of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub hyperparameters: Hyperparameters,
    pub selection: SelectionConfig,
    pub rating_rows: usize,
    pub users: usize,
    pub songs: usize,
    pub candidate_pairs: u64,
    pub predictions_scored: usize,
    pub predictions_written: u64,
    pub load_ms: u64,
    pub train_ms: u64,
    /// Scoring and writing overlap, so they share one timing
    pub score_and_write_ms: u64,
    pub total_ms: u64,
}

/// Runs the load -> train -> score -> write pipeline against a store
#[derive(Clone)]
pub struct RecommendationJob {
    store: Arc<dyn RatingStore>,
    config: JobConfig,
}

impl RecommendationJob {
    pub fn new(store: Arc<dyn RatingStore>, config: JobConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Main entry point: run the job once
    pub async fn run(&self) -> Result<JobReport> {
        let start_time = Instant::now();
        self.config
            .hyperparameters
            .validate()
            .context("Invalid hyperparameters")?;

        // Load
        let stage = Instant::now();
        let ratings = self.load_ratings().await?;
        let load_time = stage.elapsed();
        let (users, songs, rating_rows) = ratings.counts();

        // Train
        let stage = Instant::now();
        let model = self.train(ratings.clone()).await?;
        let train_time = stage.elapsed();

        // Score, select and write
        let stage = Instant::now();
        let candidate_pairs = ratings.unrated_pair_count();
        let (predictions_scored, predictions_written) =
            self.score_and_write(ratings.clone(), model).await?;
        let score_and_write_time = stage.elapsed();
        info!(
            "Scored {} of {} unrated pairs, wrote {}",
            predictions_scored, candidate_pairs, predictions_written
        );

        let elapsed = start_time.elapsed();
        info!("Job finished in {:.2?}", elapsed);

        Ok(JobReport {
            hyperparameters: self.config.hyperparameters,
            selection: self.config.selection,
            rating_rows,
            users,
            songs,
            candidate_pairs,
            predictions_scored,
            predictions_written,
            load_ms: millis(load_time),
            train_ms: millis(train_time),
            score_and_write_ms: millis(score_and_write_time),
            total_ms: millis(elapsed),
        })
    }

    /// Read the ratings once; the Arc is shared by every later stage
    async fn load_ratings(&self) -> Result<Arc<RatingSet>> {
        let ratings = self
            .store
            .load_ratings()
            .await
            .context("Failed to load ratings")?;
        info!("Training on {} user-song pairs", ratings.ratings().len());
        Ok(Arc::new(ratings))
    }

    /// Fit the model on a blocking thread
    async fn train(&self, ratings: Arc<RatingSet>) -> Result<Arc<FactorModel>> {
        let params = self.config.hyperparameters;
        let model = tokio::task::spawn_blocking(move || trainer::train_implicit(&ratings, &params))
            .await
            .context("Training task panicked")?
            .context("Failed to train ALS model")?;
        Ok(Arc::new(model))
    }

    /// Score every unrated pair on a blocking thread and stream the
    /// selected predictions into one overwrite of the recommendations table.
    ///
    /// Returns (pairs scored, rows written).
    async fn score_and_write(
        &self,
        ratings: Arc<RatingSet>,
        model: Arc<FactorModel>,
    ) -> Result<(usize, u64)> {
        let mut writer = self
            .store
            .begin_replace()
            .await
            .context("Failed to open recommendations table")?;

        let config = self.config;
        let (sender, mut receiver) = mpsc::channel::<Vec<Prediction>>(WRITE_QUEUE_DEPTH);
        let scoring = tokio::task::spawn_blocking(move || {
            score_in_chunks(ratings, &model, &config, |chunk| {
                sender
                    .blocking_send(chunk)
                    .map_err(|_| anyhow!("Recommendation writer stopped"))
            })
        });

        while let Some(chunk) = receiver.recv().await {
            writer
                .append(&chunk)
                .await
                .context("Failed to write recommendations")?;
        }

        // The channel closes when scoring ends, successfully or not
        let scored = scoring.await.context("Scoring task panicked")??;
        let written = writer
            .commit()
            .await
            .context("Failed to commit recommendations")?;
        Ok((scored, written))
    }
}

/// Candidate generation, scoring and selection, one chunk of users at a time.
///
/// Each chunk's selected predictions are handed to `emit` before the next
/// chunk is scored; empty chunks are skipped. Returns how many pairs were
/// scored before selection.
pub(crate) fn score_in_chunks<F>(
    ratings: Arc<RatingSet>,
    model: &FactorModel,
    config: &JobConfig,
    mut emit: F,
) -> Result<usize>
where
    F: FnMut(Vec<Prediction>) -> Result<()>,
{
    let source = UnratedPairSource::new(ratings.clone());
    let filters = FilterPipeline::from_config(ratings, &config.selection);

    let mut scored = 0;
    for users in source.user_chunks(config.chunk_size) {
        let candidates = source.candidates_for_users(&users);
        let predictions = model.predict_all(&candidates);
        scored += predictions.len();

        let selected = filters
            .apply(predictions)
            .context("Failed to apply selection filters")?;
        debug!(users = users.len(), selected = selected.len(), "Scored chunk");
        if !selected.is_empty() {
            emit(selected)?;
        }
    }
    Ok(scored)
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis().try_into().unwrap_or(u64::MAX)
}
