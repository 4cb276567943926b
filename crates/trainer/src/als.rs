//! Implicit-feedback ALS training.
//!
//! The factorization itself is done by `discorec`; this module only feeds it
//! the ratings, applies the hyperparameters and copies the resulting factors
//! into a [`FactorModel`].

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use data_loader::RatingSet;
use discorec::{Dataset, RecommenderBuilder};
use tracing::{debug, info};

use crate::error::TrainerError;
use crate::hyperparameters::Hyperparameters;
use crate::model::FactorModel;

/// Fit an implicit ALS model on every rating in the set.
///
/// The strength of each rating is used as the observation value; the
/// library turns it into a confidence weight with `alpha`. This is CPU-bound
/// and blocking, callers in async code should run it on a blocking thread.
pub fn train_implicit(
    ratings: &RatingSet,
    params: &Hyperparameters,
) -> Result<FactorModel, TrainerError> {
    params.validate()?;
    if ratings.is_empty() {
        return Err(TrainerError::EmptyTrainingSet);
    }

    let start = Instant::now();
    let mut dataset = Dataset::new();
    for rating in ratings.ratings() {
        dataset.push(rating.user_id, rating.song_id, rating.rating as f32);
    }

    let completed = Arc::new(AtomicU32::new(0));
    let progress = Arc::clone(&completed);
    let total = params.iterations;

    let recommender = RecommenderBuilder::new()
        .factors(params.rank)
        .iterations(params.iterations)
        .regularization(params.regularization)
        .alpha(params.alpha)
        .callback(move |_| {
            let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("ALS iteration {}/{}", done, total);
        })
        .fit_implicit(&dataset);

    let users = recommender
        .user_ids()
        .iter()
        .map(|&user_id| {
            recommender
                .user_factors(&user_id)
                .map(|factors| (user_id, factors.to_vec()))
                .ok_or(TrainerError::MissingUserFactors(user_id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let songs = recommender
        .item_ids()
        .iter()
        .map(|&song_id| {
            recommender
                .item_factors(&song_id)
                .map(|factors| (song_id, factors.to_vec()))
                .ok_or(TrainerError::MissingSongFactors(song_id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let model = FactorModel::from_factors(params.rank as usize, users, songs)?;
    info!(
        "Trained rank-{} model on {} users x {} songs in {:.2?} ({} iterations)",
        model.rank(),
        model.user_count(),
        model.song_count(),
        start.elapsed(),
        completed.load(Ordering::Relaxed)
    );
    Ok(model)
}
