//! Selection pipeline for scored predictions.
//!
//! This crate provides:
//! - PredictionFilter trait and implementations
//! - FilterPipeline for composing filters
//! - SelectionConfig describing which filters the job runs
//!
//! ## Architecture
//! Predictions flow through the filters in order:
//! 1. AlreadyRatedFilter removes anything present in the ratings input
//! 2. MinimumScoreFilter (optional) drops weak scores
//! 3. TopNPerUserFilter (optional) caps each user's list
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, SelectionConfig};
//!
//! let config = SelectionConfig { top_n: Some(50), min_score: None };
//! let pipeline = FilterPipeline::from_config(ratings.clone(), &config);
//! let selected = pipeline.apply(predictions)?;
//! ```

pub mod config;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use config::SelectionConfig;
pub use filter_pipeline::FilterPipeline;
pub use traits::PredictionFilter;
