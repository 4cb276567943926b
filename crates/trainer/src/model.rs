//! The trained factor model.
//!
//! After fitting, the latent vectors are copied out of the ALS library into
//! two dense matrices (one row per user, one row per song). Scoring a pair is
//! the dot product of the two rows.

use std::collections::HashMap;

use data_loader::{Prediction, SongId, UserId};
use ndarray::Array2;
use rayon::prelude::*;
use sources::Candidate;
use tracing::debug;

use crate::error::TrainerError;

/// Latent user and song factors produced by implicit ALS
#[derive(Debug, Clone)]
pub struct FactorModel {
    user_index: HashMap<UserId, usize>,
    song_index: HashMap<SongId, usize>,
    user_factors: Array2<f32>,
    song_factors: Array2<f32>,
}

impl FactorModel {
    /// Build a model from explicit factor vectors.
    ///
    /// Every vector must have exactly `rank` entries.
    pub fn from_factors(
        rank: usize,
        users: Vec<(UserId, Vec<f32>)>,
        songs: Vec<(SongId, Vec<f32>)>,
    ) -> Result<Self, TrainerError> {
        let (user_index, user_factors) = stack_rows(rank, users)?;
        let (song_index, song_factors) = stack_rows(rank, songs)?;
        Ok(Self {
            user_index,
            song_index,
            user_factors,
            song_factors,
        })
    }

    pub fn rank(&self) -> usize {
        self.user_factors.ncols()
    }

    pub fn user_count(&self) -> usize {
        self.user_index.len()
    }

    pub fn song_count(&self) -> usize {
        self.song_index.len()
    }

    /// Score one pair, `None` if either side was not in the training data
    pub fn predict(&self, user_id: UserId, song_id: SongId) -> Option<f64> {
        let &u = self.user_index.get(&user_id)?;
        let &s = self.song_index.get(&song_id)?;
        let score = self.user_factors.row(u).dot(&self.song_factors.row(s));
        Some(score as f64)
    }

    /// Score every candidate, in input order.
    ///
    /// Pairs with an unknown user or song are dropped, so the output can be
    /// shorter than the input.
    pub fn predict_all(&self, candidates: &[Candidate]) -> Vec<Prediction> {
        let predictions: Vec<Prediction> = candidates
            .par_iter()
            .filter_map(|candidate| {
                self.predict(candidate.user_id, candidate.song_id)
                    .map(|score| Prediction {
                        user_id: candidate.user_id,
                        song_id: candidate.song_id,
                        score,
                    })
            })
            .collect();

        if predictions.len() != candidates.len() {
            debug!(
                "Dropped {} candidates outside the model's domain",
                candidates.len() - predictions.len()
            );
        }
        predictions
    }
}

/// Pack `(id, vector)` rows into an id index and a dense matrix
fn stack_rows(
    rank: usize,
    rows: Vec<(i64, Vec<f32>)>,
) -> Result<(HashMap<i64, usize>, Array2<f32>), TrainerError> {
    let mut index = HashMap::with_capacity(rows.len());
    let mut flat = Vec::with_capacity(rows.len() * rank);

    for (id, factors) in rows {
        if factors.len() != rank {
            return Err(TrainerError::FactorShape {
                expected: rank,
                found: factors.len(),
            });
        }
        // Keep the first vector seen for an id
        if index.contains_key(&id) {
            continue;
        }
        index.insert(id, index.len());
        flat.extend(factors);
    }

    let found = flat.len();
    let matrix = Array2::from_shape_vec((index.len(), rank), flat).map_err(|_| {
        TrainerError::FactorShape {
            expected: index.len() * rank,
            found,
        }
    })?;
    Ok((index, matrix))
}
