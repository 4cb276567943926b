//! Database connection configuration.
//!
//! The job is pointed at a MySQL instance (typically Cloud SQL) by host,
//! database name and credentials. Everything else has a default that matches
//! the `Rating` / `Recommendation` table layout.

use std::fmt;
use std::time::Duration;

use sqlx::mysql::MySqlConnectOptions;

use crate::error::{DataLoadError, Result};

/// Default MySQL port
pub const DEFAULT_PORT: u16 = 3306;

/// Table the ratings are read from
pub const DEFAULT_RATINGS_TABLE: &str = "Rating";

/// Table the predictions are written to
pub const DEFAULT_RECOMMENDATIONS_TABLE: &str = "Recommendation";

/// Default size of the connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Default rows per multi-row INSERT
pub const DEFAULT_WRITE_BATCH_SIZE: usize = 1000;

/// Placeholders bound per inserted row (uid, song_id, rating)
const PLACEHOLDERS_PER_ROW: usize = 3;

/// Largest batch whose INSERT stays within MySQL's 65535 placeholders
pub const MAX_WRITE_BATCH_SIZE: usize = u16::MAX as usize / PLACEHOLDERS_PER_ROW;

/// Connection and table settings for the MySQL store
#[derive(Clone)]
pub struct DbConfig {
    /// Instance IP or hostname
    pub host: String,
    pub port: u16,
    /// Database (schema) name
    pub database: String,
    pub user: String,
    pub password: String,
    pub ratings_table: String,
    pub recommendations_table: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection acquisition timeout
    pub acquire_timeout_secs: u64,
    /// Rows per multi-row INSERT statement
    pub write_batch_size: usize,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ratings_table", &self.ratings_table)
            .field("recommendations_table", &self.recommendations_table)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("write_batch_size", &self.write_batch_size)
            .finish()
    }
}

impl DbConfig {
    /// Create a config with default port, tables and pool settings
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            ratings_table: DEFAULT_RATINGS_TABLE.to_string(),
            recommendations_table: DEFAULT_RECOMMENDATIONS_TABLE.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: 30,
            write_batch_size: DEFAULT_WRITE_BATCH_SIZE,
        }
    }

    /// JDBC-style connection string for these parameters:
    /// `jdbc:mysql://<host>:<port>/<db>?user=<user>&password=<pwd>`
    ///
    /// This contains the password in clear text; use
    /// [`DbConfig::redacted_jdbc_url`] for anything that gets logged.
    pub fn jdbc_url(&self) -> String {
        format!(
            "jdbc:mysql://{}:{}/{}?user={}&password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }

    /// Same as [`DbConfig::jdbc_url`] with the password masked
    pub fn redacted_jdbc_url(&self) -> String {
        format!(
            "jdbc:mysql://{}:{}/{}?user={}&password=***",
            self.host, self.port, self.database, self.user
        )
    }

    /// Driver options built from the same parameters as the JDBC string.
    ///
    /// Going through the options builder avoids URL-escaping credentials.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Check table names and sizes before anything touches the database
    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.ratings_table)?;
        validate_table_name(&self.recommendations_table)?;
        if self.ratings_table == self.recommendations_table {
            return Err(DataLoadError::ValidationError(format!(
                "ratings and recommendations must be different tables (both are {})",
                self.ratings_table
            )));
        }
        if self.max_connections == 0 {
            return Err(DataLoadError::InvalidValue {
                field: "max_connections".to_string(),
                value: self.max_connections.to_string(),
            });
        }
        if self.write_batch_size == 0 || self.write_batch_size > MAX_WRITE_BATCH_SIZE {
            return Err(DataLoadError::InvalidValue {
                field: "write_batch_size".to_string(),
                value: self.write_batch_size.to_string(),
            });
        }
        Ok(())
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DataLoadError::InvalidTableName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DbConfig {
        DbConfig::new("10.0.0.5", "music", "trainer", "s3cret")
    }

    #[test]
    fn test_jdbc_url_format() {
        assert_eq!(
            config().jdbc_url(),
            "jdbc:mysql://10.0.0.5:3306/music?user=trainer&password=s3cret"
        );
    }

    #[test]
    fn test_redacted_url_hides_password() {
        let url = config().redacted_jdbc_url();
        assert!(!url.contains("s3cret"));
        assert!(url.ends_with("password=***"));
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.port, 3306);
        assert_eq!(config.ratings_table, "Rating");
        assert_eq!(config.recommendations_table, "Recommendation");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.write_batch_size, DEFAULT_WRITE_BATCH_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table_name("Recommendation_v2").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("Rating; DROP TABLE x").is_err());
        assert!(validate_table_name("db.Rating").is_err());
        assert!(validate_table_name("`Rating`").is_err());
    }

    #[test]
    fn test_same_source_and_destination_is_rejected() {
        let mut config = config();
        config.recommendations_table = config.ratings_table.clone();
        assert!(matches!(
            config.validate(),
            Err(DataLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_batch_size_placeholder_limit() {
        let mut config = config();
        config.write_batch_size = MAX_WRITE_BATCH_SIZE;
        assert!(config.validate().is_ok());

        config.write_batch_size = 21846;
        assert!(matches!(
            config.validate(),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let mut config = config();
        config.write_batch_size = 0;
        assert!(matches!(
            config.validate(),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }
}
