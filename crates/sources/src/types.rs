//! Candidate type shared by the scoring stages.

use data_loader::{SongId, UserId};
use serde::{Deserialize, Serialize};

/// A (user, song) pair absent from the ratings input, waiting to be scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    pub user_id: UserId,
    pub song_id: SongId,
}

impl Candidate {
    pub fn new(user_id: UserId, song_id: SongId) -> Self {
        Self { user_id, song_id }
    }
}
