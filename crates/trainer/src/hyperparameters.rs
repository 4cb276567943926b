//! Hyperparameters for implicit-feedback ALS.
//!
//! Defaults come from "Collaborative Filtering for Implicit Feedback
//! Datasets" (Hu, Koren & Volinsky, 2008). They have not been tuned by
//! cross-validation on this data.

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Number of latent factors. Ranks of 10..100 were tried in the paper,
/// with diminishing returns above 40.
pub const DEFAULT_RANK: u32 = 40;

pub const DEFAULT_REGULARIZATION: f32 = 0.1;

/// ALS typically converges within 20 iterations
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Confidence weight; the paper found 40 acceptable on its data
pub const DEFAULT_ALPHA: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub rank: u32,
    pub regularization: f32,
    pub iterations: u32,
    pub alpha: f32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            rank: DEFAULT_RANK,
            regularization: DEFAULT_REGULARIZATION,
            iterations: DEFAULT_ITERATIONS,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.rank == 0 {
            return Err(invalid("rank", self.rank));
        }
        if self.iterations == 0 {
            return Err(invalid("iterations", self.iterations));
        }
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(invalid("regularization", self.regularization));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(invalid("alpha", self.alpha));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString) -> TrainerError {
    TrainerError::InvalidHyperparameter {
        name,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_paper_values() {
        let params = Hyperparameters::default();
        assert_eq!(params.rank, 40);
        assert_eq!(params.regularization, 0.1);
        assert_eq!(params.iterations, 10);
        assert_eq!(params.alpha, 40.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_zero_regularization_is_allowed() {
        let params = Hyperparameters {
            regularization: 0.0,
            ..Hyperparameters::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases = [
            ("rank", Hyperparameters { rank: 0, ..Default::default() }),
            ("iterations", Hyperparameters { iterations: 0, ..Default::default() }),
            ("regularization", Hyperparameters { regularization: -0.1, ..Default::default() }),
            ("regularization", Hyperparameters { regularization: f32::NAN, ..Default::default() }),
            ("alpha", Hyperparameters { alpha: 0.0, ..Default::default() }),
            ("alpha", Hyperparameters { alpha: f32::INFINITY, ..Default::default() }),
        ];

        for (expected, params) in cases {
            match params.validate() {
                Err(TrainerError::InvalidHyperparameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {} to be rejected, got {:?}", expected, other),
            }
        }
    }
}
