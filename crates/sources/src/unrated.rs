//! # Unrated Pair Source
//!
//! Enumerates every (user, song) pair from the cross product of the user
//! domain and the song domain that does NOT appear in the ratings input.
//!
//! ## Algorithm
//! 1. Take the distinct users and distinct songs of the RatingSet
//! 2. For each user, walk the song domain and skip songs the user rated
//!    (HashSet lookup, O(1))
//! 3. Users are processed in parallel with Rayon
//!
//! The full product can be huge (|users| x |songs|), so callers normally
//! work through it one chunk of users at a time.

use std::sync::Arc;

use data_loader::{RatingSet, SongId, UserId};
use rayon::prelude::*;
use tracing::debug;

use crate::types::Candidate;

/// Generates unrated candidate pairs from a shared RatingSet
#[derive(Clone)]
pub struct UnratedPairSource {
    ratings: Arc<RatingSet>,
    /// Song domain, sorted ascending
    songs: Arc<Vec<SongId>>,
}

impl UnratedPairSource {
    pub fn new(ratings: Arc<RatingSet>) -> Self {
        let songs = Arc::new(ratings.songs().collect());
        Self { ratings, songs }
    }

    /// Total number of pairs this source will produce
    pub fn candidate_count(&self) -> u64 {
        self.ratings.unrated_pair_count()
    }

    /// Unrated songs for one user, in ascending song order.
    ///
    /// A user outside the rating domain has rated nothing, so every song is
    /// a candidate.
    pub fn candidates_for_user(&self, user_id: UserId) -> Vec<Candidate> {
        match self.ratings.rated_songs(user_id) {
            Some(rated) => self
                .songs
                .iter()
                .filter(|song_id| !rated.contains(*song_id))
                .map(|&song_id| Candidate::new(user_id, song_id))
                .collect(),
            None => self
                .songs
                .iter()
                .map(|&song_id| Candidate::new(user_id, song_id))
                .collect(),
        }
    }

    /// Unrated pairs for a batch of users, grouped by user in input order
    pub fn candidates_for_users(&self, users: &[UserId]) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = users
            .par_iter()
            .flat_map_iter(|&user_id| self.candidates_for_user(user_id))
            .collect();

        debug!(
            "Generated {} candidates for {} users",
            candidates.len(),
            users.len()
        );
        candidates
    }

    /// Every unrated pair in the domain
    pub fn all_candidates(&self) -> Vec<Candidate> {
        let users: Vec<UserId> = self.ratings.users().collect();
        self.candidates_for_users(&users)
    }

    /// The user domain split into chunks of at most `chunk_size` users
    pub fn user_chunks(&self, chunk_size: usize) -> Vec<Vec<UserId>> {
        let users: Vec<UserId> = self.ratings.users().collect();
        users
            .chunks(chunk_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}
