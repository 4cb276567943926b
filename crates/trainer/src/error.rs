//! Errors raised while training or building a factor model.

use data_loader::{SongId, UserId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Invalid hyperparameter {name}: {value}")]
    InvalidHyperparameter { name: &'static str, value: String },

    #[error("Cannot train on an empty ratings set")]
    EmptyTrainingSet,

    #[error("Trained model has no factors for user {0}")]
    MissingUserFactors(UserId),

    #[error("Trained model has no factors for song {0}")]
    MissingSongFactors(SongId),

    #[error("Factor vector has length {found}, expected rank {expected}")]
    FactorShape { expected: usize, found: usize },
}
