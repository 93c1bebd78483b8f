//! End-to-end playlist generation.
//!
//! ```text
//! tracks ──FeatureStrategy──▶ vectors ──Kmeans(k, seed)──▶ assignments ──PlaylistSampler(seed)──▶ Playlist
//! ```
//!
//! Every run rebuilds its encodings from the batch it is given and keeps no
//! state afterwards, so two generators with the same config are
//! interchangeable. The same `random_seed` seeds the embedding weights, the
//! k-means initialization and the sampler, each through its own RNG.

use crate::cluster::Kmeans;
use crate::error::{Error, Result};
use crate::features::FeatureStrategy;
use crate::sample::PlaylistSampler;
use crate::track::{ClusterAssignment, FeatureVector, Playlist, TrackRecord};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Configuration for [`PlaylistGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PlaylistConfig {
    /// Desired playlist size; also the cluster count.
    pub num_tracks: usize,
    /// How tracks become vectors.
    pub feature_strategy: FeatureStrategy,
    /// Seed shared by every random step.
    pub random_seed: u64,
    /// Lloyd iteration cap.
    pub max_iter: usize,
    /// K-means restarts.
    pub n_init: usize,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            num_tracks: 10,
            feature_strategy: FeatureStrategy::default(),
            random_seed: 0,
            max_iter: 300,
            n_init: 1,
        }
    }
}

impl PlaylistConfig {
    /// Set playlist size / cluster count.
    pub fn with_num_tracks(mut self, num_tracks: usize) -> Self {
        self.num_tracks = num_tracks;
        self
    }

    /// Set feature strategy.
    pub fn with_strategy(mut self, strategy: FeatureStrategy) -> Self {
        self.feature_strategy = strategy;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Set Lloyd iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set number of k-means restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }
}

/// Everything a run derived, for callers that want more than the playlist.
#[derive(Debug, Clone)]
pub struct PlaylistRun {
    /// The sampled playlist.
    pub playlist: Playlist,
    /// One vector per input track, input order.
    pub features: Vec<FeatureVector>,
    /// One assignment per input track, input order.
    pub assignments: Vec<ClusterAssignment>,
    /// Within-cluster sum of squares of the winning k-means restart.
    pub inertia: f64,
    /// Lloyd iterations of the winning restart.
    pub iterations: usize,
    /// Whether k-means stopped on stable assignments.
    pub converged: bool,
}

impl PlaylistRun {
    /// Cluster index per input track, input order.
    pub fn labels(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.cluster_index).collect()
    }

    /// Clusters with at least one member.
    pub fn non_empty_clusters(&self) -> BTreeSet<usize> {
        self.assignments.iter().map(|a| a.cluster_index).collect()
    }

    /// Clusters the playlist's tracks were drawn from.
    pub fn represented_clusters(&self) -> BTreeSet<usize> {
        let cluster_of: HashMap<i64, usize> = self
            .assignments
            .iter()
            .map(|a| (a.track_id, a.cluster_index))
            .collect();
        self.playlist
            .iter()
            .filter_map(|t| cluster_of.get(&t.track_id).copied())
            .collect()
    }
}

/// Runs extraction, clustering and sampling for one catalog batch.
#[derive(Debug, Clone, Default)]
pub struct PlaylistGenerator {
    config: PlaylistConfig,
}

impl PlaylistGenerator {
    /// Create a generator.
    pub fn new(config: PlaylistConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &PlaylistConfig {
        &self.config
    }

    /// Generate a playlist of at most `num_tracks` tracks.
    pub fn generate(&self, tracks: &[TrackRecord]) -> Result<Playlist> {
        self.generate_run(tracks).map(|run| run.playlist)
    }

    /// Generate a playlist and keep the intermediate results.
    pub fn generate_run(&self, tracks: &[TrackRecord]) -> Result<PlaylistRun> {
        let cfg = &self.config;
        if tracks.is_empty() {
            return Err(Error::EmptyInput);
        }
        if cfg.num_tracks == 0 {
            return Err(Error::InvalidClusterCount { requested: 0 });
        }
        let mut seen = HashSet::with_capacity(tracks.len());
        if let Some(dup) = tracks.iter().find(|t| !seen.insert(t.track_id)) {
            return Err(Error::DuplicateTrackId {
                track_id: dup.track_id,
            });
        }

        let features = cfg
            .feature_strategy
            .extractor(cfg.random_seed)
            .extract(tracks)?;

        let data: Vec<Vec<f32>> = features.iter().map(|f| f.vector.clone()).collect();
        let fit = Kmeans::new(cfg.num_tracks)
            .with_seed(cfg.random_seed)
            .with_max_iter(cfg.max_iter)
            .with_n_init(cfg.n_init)
            .fit(&data)?;

        let assignments: Vec<ClusterAssignment> = features
            .iter()
            .zip(&fit.labels)
            .map(|(f, &cluster_index)| ClusterAssignment {
                track_id: f.track_id,
                cluster_index,
            })
            .collect();

        let playlist =
            PlaylistSampler::new(cfg.random_seed).sample(tracks, &assignments, cfg.num_tracks)?;

        Ok(PlaylistRun {
            playlist,
            features,
            assignments,
            inertia: fit.inertia,
            iterations: fit.iterations,
            converged: fit.converged,
        })
    }
}

/// Generate a playlist with `config`; shorthand for
/// `PlaylistGenerator::new(config).generate(tracks)`.
pub fn generate_playlist(tracks: &[TrackRecord], config: PlaylistConfig) -> Result<Playlist> {
    PlaylistGenerator::new(config).generate(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = PlaylistConfig::default();
        assert_eq!(cfg.num_tracks, 10);
        assert_eq!(cfg.feature_strategy, FeatureStrategy::TextFrequency);
        assert_eq!(cfg.random_seed, 0);
    }

    #[test]
    fn test_rejects_before_any_work() {
        let generator = PlaylistGenerator::default();
        assert_eq!(generator.generate(&[]).unwrap_err(), Error::EmptyInput);

        let tracks = vec![TrackRecord::new(1, "a", 1, 1)];
        let zero = PlaylistGenerator::new(PlaylistConfig::default().with_num_tracks(0));
        assert_eq!(
            zero.generate(&tracks).unwrap_err(),
            Error::InvalidClusterCount { requested: 0 }
        );

        let dup = vec![TrackRecord::new(1, "a", 1, 1), TrackRecord::new(1, "b", 1, 2)];
        assert_eq!(
            generator.generate(&dup).unwrap_err(),
            Error::DuplicateTrackId { track_id: 1 }
        );
    }

    #[test]
    fn test_num_tracks_far_above_catalog_size() {
        let tracks = vec![TrackRecord::new(1, "a", 1, 1), TrackRecord::new(2, "b", 2, 2)];

        for strategy in [FeatureStrategy::TextFrequency, FeatureStrategy::CategoricalEmbedding] {
            let generator = PlaylistGenerator::new(
                PlaylistConfig::default()
                    .with_num_tracks(usize::MAX)
                    .with_strategy(strategy),
            );
            let run = generator.generate_run(&tracks).unwrap();
            assert!(!run.playlist.is_empty());
            assert!(run.playlist.len() <= 2);
            assert_eq!(run.represented_clusters(), run.non_empty_clusters());
        }
    }

    #[test]
    fn test_missing_genre_propagates() {
        let tracks = vec![
            TrackRecord::new(1, "a", 1, 1),
            TrackRecord::new(2, "b", 1, 1).with_genre(None),
        ];
        for strategy in [FeatureStrategy::TextFrequency, FeatureStrategy::CategoricalEmbedding] {
            let generator = PlaylistGenerator::new(PlaylistConfig::default().with_strategy(strategy));
            assert_eq!(
                generator.generate(&tracks).unwrap_err(),
                Error::MissingField {
                    track_id: 2,
                    field: "genre_id"
                }
            );
        }
    }
}
