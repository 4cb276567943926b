//! In-memory `RatingStore`, used by tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{DataLoadError, Result};
use crate::store::{RatingStore, RecommendationWriter};
use crate::types::{Prediction, Rating, RatingSet};

#[derive(Debug, Default)]
struct Tables {
    ratings: Vec<Rating>,
    recommendations: Vec<Prediction>,
}

/// Keeps both tables in process memory.
///
/// Writes follow the same overwrite semantics as the MySQL store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new(ratings: Vec<Rating>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables {
                ratings,
                recommendations: Vec::new(),
            })),
        }
    }

    /// Swap the ratings table contents
    pub fn set_ratings(&self, ratings: Vec<Rating>) {
        self.lock().ratings = ratings;
    }

    /// Snapshot of the recommendations table
    pub fn recommendations(&self) -> Vec<Prediction> {
        self.lock().recommendations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        lock_tables(&self.tables)
    }
}

fn lock_tables(tables: &Mutex<Tables>) -> MutexGuard<'_, Tables> {
    // A panic while holding the lock cannot leave the Vecs half-written
    tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Stages rows in its own buffer until commit swaps them in
struct InMemoryWriter {
    tables: Arc<Mutex<Tables>>,
    staged: Vec<Prediction>,
}

#[async_trait]
impl RecommendationWriter for InMemoryWriter {
    async fn append(&mut self, predictions: &[Prediction]) -> Result<u64> {
        self.staged.extend_from_slice(predictions);
        Ok(predictions.len() as u64)
    }

    async fn commit(self: Box<Self>) -> Result<u64> {
        let Self { tables, staged } = *self;
        let written = staged.len() as u64;
        lock_tables(&tables).recommendations = staged;
        Ok(written)
    }
}

#[async_trait]
impl RatingStore for InMemoryStore {
    async fn load_ratings(&self) -> Result<RatingSet> {
        let ratings = self.lock().ratings.clone();
        if ratings.is_empty() {
            return Err(DataLoadError::EmptyTable {
                table: "Rating".to_string(),
            });
        }
        let set = RatingSet::from_ratings(ratings);
        set.validate()?;
        Ok(set)
    }

    async fn begin_replace(&self) -> Result<Box<dyn RecommendationWriter>> {
        Ok(Box::new(InMemoryWriter {
            tables: self.tables.clone(),
            staged: Vec::new(),
        }))
    }
}
