//! # cluster-playlist
//!
//! Pick a small, diverse playlist from a large track catalog: derive a feature
//! vector per track, split the catalog into k clusters with k-means, and take
//! one random track from each non-empty cluster.
//!
//! Every random step takes an explicit seed, so a fixed catalog order, k, seed
//! and feature strategy always yield the same playlist. The library never
//! logs or prints; failures come back as [`Error`].
//!
//! ```rust
//! use cluster_playlist::{generate_playlist, PlaylistConfig, TrackRecord};
//!
//! let tracks: Vec<TrackRecord> = (0..12)
//!     .map(|i| TrackRecord::new(i, format!("track {i}"), i / 2, i % 3))
//!     .collect();
//!
//! let playlist = generate_playlist(&tracks, PlaylistConfig::default().with_num_tracks(3)).unwrap();
//! assert_eq!(playlist.len(), 3);
//! ```

pub mod cluster;
/// Error types used across `cluster_playlist`.
pub mod error;
pub mod features;
pub mod metrics;
pub mod pipeline;
pub mod sample;
pub mod track;


pub use cluster::{Clustering, Kmeans, KmeansFit};
pub use error::{Error, Result};
pub use features::{CategoricalEmbedding, FeatureExtractor, FeatureStrategy, TfIdf};
pub use metrics::{genre_coverage, purity};
pub use pipeline::{generate_playlist, PlaylistConfig, PlaylistGenerator, PlaylistRun};
pub use sample::PlaylistSampler;
pub use track::{ClusterAssignment, FeatureVector, Playlist, TrackRecord};
