//! Filter to drop weak predictions.

use crate::traits::PredictionFilter;
use anyhow::Result;
use data_loader::Prediction;

/// Keeps predictions with `score >= threshold`.
///
/// NaN scores never pass.
pub struct MinimumScoreFilter {
    threshold: f64,
}

impl MinimumScoreFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl PredictionFilter for MinimumScoreFilter {
    fn name(&self) -> &str {
        "MinimumScoreFilter"
    }

    fn apply(&self, predictions: Vec<Prediction>) -> Result<Vec<Prediction>> {
        let filtered: Vec<Prediction> = predictions
            .into_iter()
            .filter(|p| p.score >= self.threshold)
            .collect();
        Ok(filtered)
    }
}
