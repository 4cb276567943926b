//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use std::sync::Arc;

use crate::config::SelectionConfig;
use crate::filters::{AlreadyRatedFilter, MinimumScoreFilter, TopNPerUserFilter};
use crate::traits::PredictionFilter;
use anyhow::Result;
use data_loader::{Prediction, RatingSet};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyRatedFilter::new(ratings.clone()))
///     .add_filter(MinimumScoreFilter::new(0.2))
///     .add_filter(TopNPerUserFilter::new(50));
///
/// let selected = pipeline.apply(predictions)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn PredictionFilter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The pipeline the job runs for a given selection config.
    ///
    /// The exclusion filter always runs first; score threshold and top-N
    /// are only added when configured.
    pub fn from_config(ratings: Arc<RatingSet>, config: &SelectionConfig) -> Self {
        let mut pipeline = Self::new().add_filter(AlreadyRatedFilter::new(ratings));
        if let Some(threshold) = config.min_score {
            pipeline = pipeline.add_filter(MinimumScoreFilter::new(threshold));
        }
        if let Some(n) = config.top_n {
            pipeline = pipeline.add_filter(TopNPerUserFilter::new(n));
        }
        pipeline
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl PredictionFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Apply all filters in sequence to the predictions.
    ///
    /// # Returns
    /// * `Ok(Vec<Prediction>)` - The predictions left after all filters
    /// * `Err` - If any filter fails
    pub fn apply(&self, predictions: Vec<Prediction>) -> Result<Vec<Prediction>> {
        let mut current = predictions;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} ({} -> {})",
                filter.name(),
                before,
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
