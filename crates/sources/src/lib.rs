//! # Sources Crate
//!
//! Candidate generation for batch scoring.
//!
//! A candidate is any (user, song) pair from the cross product of all known
//! users and all known songs that the user has not already rated. Rated
//! pairs never become candidates, so they can never be scored or written.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::UnratedPairSource;
//! use std::sync::Arc;
//!
//! let source = UnratedPairSource::new(Arc::new(ratings));
//! for users in source.user_chunks(1000) {
//!     let candidates = source.candidates_for_users(&users);
//!     // score candidates...
//! }
//! ```

// Public modules
pub mod types;
pub mod unrated;

// Re-export commonly used types
pub use types::Candidate;
pub use unrated::UnratedPairSource;
