//! Core traits for the selection pipeline.
//!
//! This module defines the PredictionFilter trait that allows composable,
//! extensible filters to be applied to scored predictions before they are
//! written.

use anyhow::Result;
use data_loader::Prediction;

/// Core trait for filtering predictions.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared with blocking worker threads
/// - Filters take ownership of the Vec<Prediction> and return a filtered Vec
/// - The job feeds filters one chunk of users at a time, and every
///   prediction of a given user is always in the same chunk
pub trait PredictionFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of predictions.
    ///
    /// # Arguments
    /// * `predictions` - The predictions to filter (takes ownership)
    ///
    /// # Returns
    /// * `Ok(Vec<Prediction>)` - The predictions to keep
    /// * `Err` - If filtering fails
    fn apply(&self, predictions: Vec<Prediction>) -> Result<Vec<Prediction>>;
}
