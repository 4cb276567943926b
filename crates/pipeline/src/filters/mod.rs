//! Filter implementations for the selection pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_rated;
pub mod minimum_score;
pub mod top_n_per_user;

// Re-export for convenience
pub use already_rated::AlreadyRatedFilter;
pub use minimum_score::MinimumScoreFilter;
pub use top_n_per_user::TopNPerUserFilter;
