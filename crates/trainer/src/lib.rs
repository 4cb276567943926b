//! Matrix-factorization training and scoring.
//!
//! This crate wraps an implicit-feedback ALS fit:
//! - Hyperparameters with the paper defaults (rank 40, lambda 0.1, 10 iterations, alpha 40)
//! - `train_implicit` which hands the ratings to the ALS library
//! - `FactorModel` which scores (user, song) pairs from the learned factors
//!
//! ## Example Usage
//!
//! ```ignore
//! use trainer::{train_implicit, Hyperparameters};
//!
//! let model = train_implicit(&ratings, &Hyperparameters::default())?;
//! let predictions = model.predict_all(&candidates);
//! ```

pub mod als;
pub mod error;
pub mod hyperparameters;
pub mod model;

pub use als::train_implicit;
pub use error::TrainerError;
pub use hyperparameters::Hyperparameters;
pub use model::FactorModel;
