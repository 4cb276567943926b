//! Job crate for the ALS batch recommender.
//!
//! This crate contains the orchestrator that runs the pipeline end to end:
//! load ratings, train, score unrated pairs, select, overwrite the table.

pub mod orchestrator;

pub use orchestrator::{JobConfig, JobReport, RecommendationJob};
