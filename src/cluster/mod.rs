//! Partitioning feature vectors into k groups.
//!
//! Tracks are grouped with Lloyd's k-means so that each group gathers tracks
//! with similar metadata. The playlist then takes one track per group, which
//! is what makes it diverse.
//!
//! K-means assumes roughly spherical clusters and a known k. Both hold here:
//! k is the requested playlist size, and the feature vectors are either
//! one-hot TF-IDF rows or small dense embeddings.
//!
//! ## Usage
//!
//! ```rust
//! use cluster_playlist::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(0).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod kmeans;
mod traits;

pub use kmeans::{Kmeans, KmeansFit};
pub use traits::Clustering;
