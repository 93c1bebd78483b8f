//! Feature extraction: track metadata to numeric vectors.
//!
//! Tracks with similar categorical attributes should land near each other so
//! that k-means groups them. Two interchangeable strategies are provided.
//!
//! ## Text frequency (TF-IDF)
//!
//! Each track's genre id becomes a one-token document. The batch vocabulary
//! is the sorted set of genre tokens, and each track gets a smoothed-idf
//! weighted, L2-normalised vector:
//!
//! ```text
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! Tracks sharing a genre get identical vectors; tracks of different genres
//! are orthogonal.
//!
//! ## Categorical embedding
//!
//! Genre and album ids are label-encoded, looked up in a shared embedding
//! table and passed through a small ReLU network:
//!
//! ```text
//! [genre, album] → Embedding(dim) → flatten(2·dim) → Dense(hidden, relu) → Dense(dim, relu)
//! ```
//!
//! Weights are seeded-random and untrained: the network is only used for
//! relative proximity, so a fixed random projection of the codes is enough.
//!
//! ## Usage
//!
//! ```rust
//! use cluster_playlist::features::{FeatureExtractor, TfIdf};
//! use cluster_playlist::TrackRecord;
//!
//! let tracks = vec![
//!     TrackRecord::new(1, "a", 10, 1),
//!     TrackRecord::new(2, "b", 10, 1),
//!     TrackRecord::new(3, "c", 11, 2),
//! ];
//! let vectors = TfIdf::new().extract(&tracks).unwrap();
//! assert_eq!(vectors[0].vector, vectors[1].vector);
//! assert_ne!(vectors[0].vector, vectors[2].vector);
//! ```

mod embedding;
mod tfidf;
mod traits;

pub use embedding::CategoricalEmbedding;
pub use tfidf::TfIdf;
pub use traits::FeatureExtractor;

use crate::error::{Error, Result};
use crate::track::TrackRecord;
use core::fmt;
use core::str::FromStr;

/// Which feature extractor the pipeline builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum FeatureStrategy {
    /// Sparse TF-IDF vectors over genre tokens.
    #[default]
    TextFrequency,
    /// Dense vectors from label-encoded genre and album codes.
    CategoricalEmbedding,
}

impl FeatureStrategy {
    /// Canonical kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureStrategy::TextFrequency => "text-frequency",
            FeatureStrategy::CategoricalEmbedding => "categorical-embedding",
        }
    }

    /// Build the extractor for this strategy. `seed` only affects strategies
    /// with random weights.
    pub fn extractor(self, seed: u64) -> Box<dyn FeatureExtractor> {
        match self {
            FeatureStrategy::TextFrequency => Box::new(TfIdf::new()),
            FeatureStrategy::CategoricalEmbedding => {
                Box::new(CategoricalEmbedding::new().with_seed(seed))
            }
        }
    }
}

impl fmt::Display for FeatureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "text-frequency" | "tfidf" => Ok(FeatureStrategy::TextFrequency),
            "categorical-embedding" | "embedding" => Ok(FeatureStrategy::CategoricalEmbedding),
            _ => Err(Error::InvalidParameter {
                name: "feature_strategy",
                message: "expected 'text-frequency' or 'categorical-embedding'",
            }),
        }
    }
}

/// Genre ids of a non-empty batch, failing on the first record without one.
pub(crate) fn required_genres(tracks: &[TrackRecord]) -> Result<Vec<i64>> {
    if tracks.is_empty() {
        return Err(Error::EmptyInput);
    }
    tracks
        .iter()
        .map(|t| {
            t.genre_id.ok_or(Error::MissingField {
                track_id: t.track_id,
                field: "genre_id",
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trips_through_str() {
        for s in [FeatureStrategy::TextFrequency, FeatureStrategy::CategoricalEmbedding] {
            assert_eq!(s.as_str().parse::<FeatureStrategy>().unwrap(), s);
        }
        assert_eq!(
            "TFIDF".parse::<FeatureStrategy>().unwrap(),
            FeatureStrategy::TextFrequency
        );
        assert!("kmeans".parse::<FeatureStrategy>().is_err());
    }

    #[test]
    fn test_required_genres_reports_first_missing() {
        let tracks = vec![
            TrackRecord::new(1, "a", 1, 1),
            TrackRecord::new(2, "b", 1, 1).with_genre(None),
            TrackRecord::new(3, "c", 1, 1).with_genre(None),
        ];
        assert_eq!(
            required_genres(&tracks),
            Err(Error::MissingField {
                track_id: 2,
                field: "genre_id"
            })
        );
        assert_eq!(required_genres(&[]), Err(Error::EmptyInput));
    }
}
