//! Error types for the data-loader crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - `#[from]` to lift driver errors into our own enum
//! - Error messages with context

use thiserror::Error;

/// Errors that can occur while reading ratings or writing recommendations
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` based on the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Connection, credential, query or transaction failure reported by the driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A table name that is not a plain SQL identifier
    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The source table holds no rows, so there is nothing to factorize
    #[error("Table {table} is empty")]
    EmptyTable { table: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
