//! Selection settings applied after scoring.

use serde::{Deserialize, Serialize};

/// Which scored predictions get written.
///
/// The default keeps every unrated pair: no threshold and no per-user cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Keep at most this many predictions per user, highest scores first
    pub top_n: Option<usize>,
    /// Drop predictions scoring below this value
    pub min_score: Option<f64>,
}
