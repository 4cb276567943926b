//! Core domain types for implicit-feedback ratings.
//!
//! This module defines the fundamental data structures used throughout the job.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, SongId)
//! - Small `Copy` structs for rows
//! - HashMap, HashSet and BTreeSet for indices

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{DataLoadError, Result};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with song IDs

/// Identifier of a user (`uid` column)
pub type UserId = i64;

/// Identifier of a song (`song_id` column)
pub type SongId = i64;

// =============================================================================
// Row Types
// =============================================================================

/// One observed user-song interaction.
///
/// `rating` is an implicit strength (play count, listen time, ...), not a
/// star rating. Larger means more confidence that the user likes the song.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub song_id: SongId,
    pub rating: f64,
}

/// A scored, previously unrated user-song pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub song_id: SongId,
    pub score: f64,
}

// =============================================================================
// RatingSet - the cached ratings collection
// =============================================================================

/// Every loaded rating plus the indices the rest of the job needs.
///
/// The set is built once after the database read and then shared behind an
/// `Arc` by training, candidate generation and the exclusion filter, so the
/// table is never read twice.
#[derive(Debug, Default)]
pub struct RatingSet {
    pub(crate) ratings: Vec<Rating>,
    /// Positions into `ratings`, grouped by user
    pub(crate) user_ratings: HashMap<UserId, Vec<usize>>,
    /// Songs each user has rated, for O(1) exclusion checks
    pub(crate) rated: HashMap<UserId, HashSet<SongId>>,
    /// Distinct users, sorted
    pub(crate) users: BTreeSet<UserId>,
    /// Distinct songs, sorted
    pub(crate) songs: BTreeSet<SongId>,
}

impl RatingSet {
    /// Creates a new, empty RatingSet
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an iterator of ratings
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let mut set = Self::new();
        for rating in ratings {
            set.insert_rating(rating);
        }
        set
    }

    /// Insert a rating and update indices
    pub fn insert_rating(&mut self, rating: Rating) {
        let position = self.ratings.len();
        self.ratings.push(rating);

        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(position);
        self.rated
            .entry(rating.user_id)
            .or_default()
            .insert(rating.song_id);
        self.users.insert(rating.user_id);
        self.songs.insert(rating.song_id);
    }

    /// All ratings in load order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// All ratings made by a user, empty if the user is unknown
    pub fn user_ratings(&self, user_id: UserId) -> Vec<Rating> {
        self.user_ratings
            .get(&user_id)
            .map(|positions| positions.iter().map(|&i| self.ratings[i]).collect())
            .unwrap_or_default()
    }

    /// Distinct user ids in ascending order
    pub fn users(&self) -> impl ExactSizeIterator<Item = UserId> + '_ {
        self.users.iter().copied()
    }

    /// Distinct song ids in ascending order
    pub fn songs(&self) -> impl ExactSizeIterator<Item = SongId> + '_ {
        self.songs.iter().copied()
    }

    /// Songs the user has rated
    pub fn rated_songs(&self, user_id: UserId) -> Option<&HashSet<SongId>> {
        self.rated.get(&user_id)
    }

    /// Whether the (user, song) pair appears in the ratings input
    pub fn is_rated(&self, user_id: UserId, song_id: SongId) -> bool {
        self.rated
            .get(&user_id)
            .is_some_and(|songs| songs.contains(&song_id))
    }

    /// Get counts for logging: (users, songs, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.songs.len(), self.ratings.len())
    }

    /// Number of distinct (user, song) pairs
    pub fn rated_pair_count(&self) -> usize {
        self.rated.values().map(|songs| songs.len()).sum()
    }

    /// Rows whose (user, song) pair already appeared earlier in the input
    pub fn duplicate_pair_count(&self) -> usize {
        self.ratings.len() - self.rated_pair_count()
    }

    /// Number of pairs that are not rated: |users| x |songs| - |rated pairs|
    pub fn unrated_pair_count(&self) -> u64 {
        let domain = self.users.len() as u64 * self.songs.len() as u64;
        domain - self.rated_pair_count() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Validate data integrity
    ///
    /// Every strength must be a finite, non-negative number: the implicit fit
    /// weights an observation by `1 + alpha * r`, which must stay positive.
    /// Zero is accepted. Duplicated pairs are allowed and only reported by
    /// the caller.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self
            .ratings
            .iter()
            .find(|r| !r.rating.is_finite() || r.rating < 0.0)
        {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: format!("{} (uid={}, song_id={})", bad.rating, bad.user_id, bad.song_id),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: UserId, song_id: SongId, rating: f64) -> Rating {
        Rating {
            user_id,
            song_id,
            rating,
        }
    }

    #[test]
    fn test_empty_set() {
        let set = RatingSet::new();
        assert!(set.is_empty());
        assert_eq!(set.counts(), (0, 0, 0));
        assert_eq!(set.unrated_pair_count(), 0);
        assert!(set.user_ratings(1).is_empty());
        assert!(!set.is_rated(1, 1));
    }

    #[test]
    fn test_indices_are_built_on_insert() {
        let set = RatingSet::from_ratings(vec![
            rating(1, 10, 3.0),
            rating(1, 20, 1.0),
            rating(2, 10, 7.0),
        ]);

        assert_eq!(set.counts(), (2, 2, 3));
        assert_eq!(set.users().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(set.songs().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(set.user_ratings(1).len(), 2);
        assert!(set.is_rated(2, 10));
        assert!(!set.is_rated(2, 20));
        assert_eq!(set.unrated_pair_count(), 1);
    }

    #[test]
    fn test_domains_are_sorted_and_distinct() {
        let set = RatingSet::from_ratings(vec![
            rating(5, 300, 1.0),
            rating(3, 100, 1.0),
            rating(5, 100, 1.0),
            rating(4, 200, 1.0),
        ]);

        assert_eq!(set.users().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(set.songs().collect::<Vec<_>>(), vec![100, 200, 300]);
    }

    #[test]
    fn test_duplicate_pairs_are_kept_and_counted() {
        let set = RatingSet::from_ratings(vec![
            rating(1, 10, 2.0),
            rating(1, 10, 5.0),
            rating(1, 11, 1.0),
        ]);

        assert_eq!(set.ratings().len(), 3);
        assert_eq!(set.rated_pair_count(), 2);
        assert_eq!(set.duplicate_pair_count(), 1);
        assert_eq!(set.unrated_pair_count(), 0);
    }

    #[test]
    fn test_validate_rejects_non_finite_strength() {
        let set = RatingSet::from_ratings(vec![rating(1, 10, 1.0), rating(2, 10, f64::NAN)]);

        match set.validate() {
            Err(DataLoadError::InvalidValue { field, .. }) => assert_eq!(field, "rating"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_zero_strength() {
        let set = RatingSet::from_ratings(vec![rating(1, 10, 0.0), rating(2, 10, 3.0)]);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_strength() {
        let set = RatingSet::from_ratings(vec![rating(1, 10, 2.0), rating(2, 10, -1.0)]);

        match set.validate() {
            Err(DataLoadError::InvalidValue { field, value }) => {
                assert_eq!(field, "rating");
                assert!(value.contains("uid=2"));
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }
}
