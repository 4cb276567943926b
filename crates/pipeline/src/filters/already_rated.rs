//! Filter to remove pairs the user has already rated.
//!
//! Candidate generation never produces rated pairs, so this filter is the
//! last guard that nothing from the ratings input reaches the output table.

use crate::traits::PredictionFilter;
use anyhow::Result;
use data_loader::{Prediction, RatingSet};
use std::sync::Arc;

/// Removes predictions for (user, song) pairs present in the ratings.
///
/// ## Algorithm
/// Uses the per-user HashSet in RatingSet for O(1) lookups.
pub struct AlreadyRatedFilter {
    ratings: Arc<RatingSet>,
}

impl AlreadyRatedFilter {
    pub fn new(ratings: Arc<RatingSet>) -> Self {
        Self { ratings }
    }
}

impl PredictionFilter for AlreadyRatedFilter {
    fn name(&self) -> &str {
        "AlreadyRatedFilter"
    }

    fn apply(&self, predictions: Vec<Prediction>) -> Result<Vec<Prediction>> {
        let filtered: Vec<Prediction> = predictions
            .into_iter()
            .filter(|p| !self.ratings.is_rated(p.user_id, p.song_id))
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Rating;

    #[test]
    fn test_already_rated_filter() {
        let ratings = RatingSet::from_ratings(vec![
            Rating { user_id: 1, song_id: 100, rating: 4.0 },
            Rating { user_id: 1, song_id: 200, rating: 1.0 },
        ]);

        let predictions = vec![
            Prediction { user_id: 1, song_id: 100, score: 0.9 },
            Prediction { user_id: 1, song_id: 101, score: 0.8 },
            Prediction { user_id: 1, song_id: 200, score: 0.7 },
            Prediction { user_id: 2, song_id: 100, score: 0.6 },
        ];

        let filter = AlreadyRatedFilter::new(Arc::new(ratings));
        let filtered = filter.apply(predictions).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!((filtered[0].user_id, filtered[0].song_id), (1, 101));
        assert_eq!((filtered[1].user_id, filtered[1].song_id), (2, 100));
    }
}
