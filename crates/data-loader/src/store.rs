//! Reading ratings from, and writing recommendations to, the database.
//!
//! `RatingStore` is the seam between the job and storage: the MySQL
//! implementation is used in production and `InMemoryStore` in tests.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::{FromRow, MySql, QueryBuilder, Transaction};
use tracing::{debug, info, warn};

use crate::config::DbConfig;
use crate::error::{DataLoadError, Result};
use crate::types::{Prediction, Rating, RatingSet};

/// Source of ratings and sink for predictions
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Read the full ratings table into a RatingSet
    async fn load_ratings(&self) -> Result<RatingSet>;

    /// Start overwriting the recommendations table.
    ///
    /// Rows appended to the returned writer only replace the previous
    /// contents once [`RecommendationWriter::commit`] succeeds. Dropping the
    /// writer without committing keeps the old rows.
    async fn begin_replace(&self) -> Result<Box<dyn RecommendationWriter>>;

    /// Replace every row of the recommendations table with `predictions`.
    ///
    /// Returns the number of rows written.
    async fn replace_recommendations(&self, predictions: &[Prediction]) -> Result<u64> {
        let mut writer = self.begin_replace().await?;
        writer.append(predictions).await?;
        writer.commit().await
    }
}

/// An open overwrite of the recommendations table
#[async_trait]
pub trait RecommendationWriter: Send {
    /// Stage another slice of rows; returns how many were inserted
    async fn append(&mut self, predictions: &[Prediction]) -> Result<u64>;

    /// Make the staged rows the table's contents; returns the total written
    async fn commit(self: Box<Self>) -> Result<u64>;
}

/// Row shape of the ratings table
#[derive(Debug, FromRow)]
struct RatingRow {
    uid: i64,
    song_id: i64,
    rating: f64,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            user_id: row.uid,
            song_id: row.song_id,
            rating: row.rating,
        }
    }
}

/// MySQL-backed store
pub struct MySqlStore {
    pool: MySqlPool,
    config: DbConfig,
}

impl MySqlStore {
    /// Open a connection pool for `config`.
    ///
    /// Fails on unreachable hosts and bad credentials; nothing is retried.
    pub async fn connect(config: DbConfig) -> Result<Self> {
        config.validate()?;
        info!("Connecting to {}", config.redacted_jdbc_url());

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(config.connect_options())
            .await?;

        debug!(max_connections = config.max_connections, "MySQL pool ready");
        Ok(Self { pool, config })
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: MySqlPool, config: DbConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { pool, config })
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    async fn ensure_recommendations_table(&self) -> Result<()> {
        // DDL commits implicitly in MySQL, so it stays outside the write transaction
        let ddl = create_recommendations_sql(&self.config.recommendations_table);
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }
}

fn select_ratings_sql(table: &str) -> String {
    format!(
        "SELECT CAST(uid AS SIGNED) AS uid, \
                CAST(song_id AS SIGNED) AS song_id, \
                CAST(rating AS DOUBLE) AS rating \
         FROM `{}`",
        table
    )
}

fn create_recommendations_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS `{}` (\
            uid BIGINT NOT NULL, \
            song_id BIGINT NOT NULL, \
            rating DOUBLE NOT NULL\
        )",
        table
    )
}

fn delete_recommendations_sql(table: &str) -> String {
    format!("DELETE FROM `{}`", table)
}

/// Slices of at most `batch_size` rows, one per INSERT statement
fn write_batches(predictions: &[Prediction], batch_size: usize) -> std::slice::Chunks<'_, Prediction> {
    predictions.chunks(batch_size.max(1))
}

/// Multi-row INSERT for one batch
fn insert_batch(table: &str, batch: &[Prediction]) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO `{}` (uid, song_id, rating) ", table));
    builder.push_values(batch, |mut row, prediction| {
        row.push_bind(prediction.user_id)
            .push_bind(prediction.song_id)
            .push_bind(prediction.score);
    });
    builder
}

/// Transaction holding the DELETE and every INSERT of one overwrite
pub struct MySqlRecommendationWriter {
    tx: Transaction<'static, MySql>,
    table: String,
    batch_size: usize,
    written: u64,
}

#[async_trait]
impl RecommendationWriter for MySqlRecommendationWriter {
    async fn append(&mut self, predictions: &[Prediction]) -> Result<u64> {
        let mut inserted = 0u64;
        for batch in write_batches(predictions, self.batch_size) {
            inserted += insert_batch(&self.table, batch)
                .build()
                .execute(&mut *self.tx)
                .await?
                .rows_affected();
        }
        self.written += inserted;
        debug!(inserted, total = self.written, "Appended recommendations");
        Ok(inserted)
    }

    async fn commit(self: Box<Self>) -> Result<u64> {
        let Self { tx, table, written, .. } = *self;
        tx.commit().await?;
        info!(written, table = %table, "Recommendations table replaced");
        Ok(written)
    }
}

#[async_trait]
impl RatingStore for MySqlStore {
    async fn load_ratings(&self) -> Result<RatingSet> {
        let table = &self.config.ratings_table;
        let sql = select_ratings_sql(table);

        let rows = sqlx::query_as::<_, RatingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(DataLoadError::EmptyTable {
                table: table.clone(),
            });
        }

        let set = RatingSet::from_ratings(rows.into_iter().map(Rating::from));
        set.validate()?;

        let duplicates = set.duplicate_pair_count();
        if duplicates > 0 {
            warn!(duplicates, "Ratings table contains repeated (uid, song_id) pairs");
        }
        Ok(set)
    }

    async fn begin_replace(&self) -> Result<Box<dyn RecommendationWriter>> {
        self.ensure_recommendations_table().await?;

        let table = self.config.recommendations_table.clone();
        let mut tx = self.pool.begin().await?;

        let cleared = sqlx::query(&delete_recommendations_sql(&table))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        debug!(cleared, table = %table, "Cleared previous recommendations");

        Ok(Box::new(MySqlRecommendationWriter {
            tx,
            table,
            batch_size: self.config.write_batch_size,
            written: 0,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions(n: usize) -> Vec<Prediction> {
        (0..n as i64)
            .map(|i| Prediction {
                user_id: i / 10,
                song_id: i % 10,
                score: i as f64 / 100.0,
            })
            .collect()
    }

    #[test]
    fn test_select_reads_the_three_columns() {
        let sql = select_ratings_sql("Rating");
        assert!(sql.contains("CAST(uid AS SIGNED) AS uid"));
        assert!(sql.contains("CAST(song_id AS SIGNED) AS song_id"));
        assert!(sql.contains("CAST(rating AS DOUBLE) AS rating"));
        assert!(sql.ends_with("FROM `Rating`"));
    }

    #[test]
    fn test_ddl_and_delete_quote_the_table() {
        let ddl = create_recommendations_sql("Recommendation");
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS `Recommendation` ("));
        assert!(ddl.contains("uid BIGINT NOT NULL"));
        assert!(ddl.contains("rating DOUBLE NOT NULL"));

        assert_eq!(
            delete_recommendations_sql("Recommendation"),
            "DELETE FROM `Recommendation`"
        );
    }

    #[test]
    fn test_insert_batch_binds_three_values_per_row() {
        let batch = predictions(4);
        let builder = insert_batch("Recommendation", &batch);
        let sql = builder.sql();

        assert!(sql.starts_with("INSERT INTO `Recommendation` (uid, song_id, rating) VALUES"));
        assert_eq!(sql.matches('?').count(), 12);
        assert_eq!(sql.matches('(').count(), 5);
    }

    #[test]
    fn test_write_batches_splits_on_batch_size() {
        let rows = predictions(2500);
        let sizes: Vec<usize> = write_batches(&rows, 1000).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
    }

    #[test]
    fn test_write_batches_exact_multiple_has_no_empty_tail() {
        let rows = predictions(2000);
        let sizes: Vec<usize> = write_batches(&rows, 1000).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![1000, 1000]);

        assert_eq!(write_batches(&[], 1000).count(), 0);
    }

    async fn count_rows(pool: &MySqlPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM als_test_recommendation")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    /// Round trip against a real server:
    /// `MYSQL_TEST_URL=mysql://user:pw@localhost/test cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_mysql_overwrite_round_trip() {
        let url = std::env::var("MYSQL_TEST_URL").expect("MYSQL_TEST_URL not set");
        let pool = MySqlPool::connect(&url).await.unwrap();

        let mut config = DbConfig::new("localhost", "test", "test", "");
        config.ratings_table = "als_test_rating".to_string();
        config.recommendations_table = "als_test_recommendation".to_string();

        for sql in [
            "DROP TABLE IF EXISTS als_test_rating",
            "DROP TABLE IF EXISTS als_test_recommendation",
            "CREATE TABLE als_test_rating (uid INT, song_id INT, rating FLOAT)",
            "INSERT INTO als_test_rating VALUES (1, 10, 3), (1, 11, 1), (2, 10, 5)",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }
        let store = MySqlStore::with_pool(pool.clone(), config).unwrap();

        let ratings = store.load_ratings().await.unwrap();
        assert_eq!(ratings.counts(), (2, 2, 3));

        // 2500 rows go out in three INSERTs
        assert_eq!(store.replace_recommendations(&predictions(2500)).await.unwrap(), 2500);
        assert_eq!(count_rows(&pool).await, 2500);

        // An overwrite leaves only the new rows
        assert_eq!(store.replace_recommendations(&predictions(3)).await.unwrap(), 3);
        assert_eq!(count_rows(&pool).await, 3);

        // A writer dropped before commit rolls back
        let mut writer = store.begin_replace().await.unwrap();
        writer.append(&predictions(50)).await.unwrap();
        drop(writer);
        assert_eq!(count_rows(&pool).await, 3);
    }
}
