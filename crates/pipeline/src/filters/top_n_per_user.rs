//! Filter to keep each user's best N predictions.

use crate::traits::PredictionFilter;
use anyhow::Result;
use data_loader::{Prediction, UserId};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Keeps the `n` highest-scoring predictions of every user.
///
/// ## Algorithm
/// 1. Group predictions by user (BTreeMap, so output is ordered by user id)
/// 2. Sort each group by score descending, NaN last, ties by song id
/// 3. Truncate each group to `n`
pub struct TopNPerUserFilter {
    n: usize,
}

impl TopNPerUserFilter {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl PredictionFilter for TopNPerUserFilter {
    fn name(&self) -> &str {
        "TopNPerUserFilter"
    }

    fn apply(&self, predictions: Vec<Prediction>) -> Result<Vec<Prediction>> {
        let mut by_user: BTreeMap<UserId, Vec<Prediction>> = BTreeMap::new();
        for prediction in predictions {
            by_user.entry(prediction.user_id).or_default().push(prediction);
        }

        let mut selected = Vec::new();
        for (_, mut group) in by_user {
            group.sort_by(rank_order);
            group.truncate(self.n);
            selected.extend(group);
        }
        Ok(selected)
    }
}

/// Score descending with NaN after every number, then song id ascending
fn rank_order(a: &Prediction, b: &Prediction) -> Ordering {
    let by_score = match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.score.total_cmp(&a.score),
    };
    by_score.then_with(|| a.song_id.cmp(&b.song_id))
}
