//! Feature extraction traits.

use crate::error::Result;
use crate::track::{FeatureVector, TrackRecord};

/// Maps a batch of track records to feature vectors.
///
/// Implementations rebuild any vocabulary or code table from the batch on
/// every call; nothing is carried over between calls.
pub trait FeatureExtractor {
    /// Extract one vector per record, in input order, all of equal length.
    fn extract(&self, tracks: &[TrackRecord]) -> Result<Vec<FeatureVector>>;
}
