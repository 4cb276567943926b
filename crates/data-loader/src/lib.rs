//! # Data Loader Crate
//!
//! This crate handles reading implicit-feedback ratings from MySQL and
//! writing scored recommendations back.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, Prediction, RatingSet)
//! - **config**: Connection parameters and table names (DbConfig)
//! - **store**: The RatingStore trait and its MySQL implementation
//! - **memory**: An in-memory RatingStore for tests
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DbConfig, MySqlStore, RatingStore};
//!
//! let config = DbConfig::new("10.0.0.5", "music", "trainer", password);
//! let store = MySqlStore::connect(config).await?;
//!
//! let ratings = store.load_ratings().await?;
//! let (users, songs, rows) = ratings.counts();
//! println!("{} users rated {} songs ({} rows)", users, songs, rows);
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{DbConfig, validate_table_name};
pub use error::{DataLoadError, Result};
pub use memory::InMemoryStore;
pub use store::{MySqlRecommendationWriter, MySqlStore, RatingStore, RecommendationWriter};
pub use types::{
    // Type aliases
    SongId,
    UserId,
    // Core types
    Prediction,
    Rating,
    RatingSet,
};
