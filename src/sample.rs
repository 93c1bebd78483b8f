//! Picking one representative track per cluster.

use crate::error::{Error, Result};
use crate::track::{ClusterAssignment, Playlist, TrackRecord};
use rand::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Seeded uniform sampler over cluster members.
///
/// Members keep the order of `tracks`, so a fixed input order and seed always
/// produce the same playlist.
#[derive(Debug, Clone)]
pub struct PlaylistSampler {
    seed: u64,
}

impl PlaylistSampler {
    /// Create a sampler with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Pick one track per non-empty cluster, in ascending cluster order.
    ///
    /// Assignments are joined to `tracks` by `track_id`; assignments naming
    /// an unknown track are ignored. Returns at most `k` tracks.
    pub fn sample(
        &self,
        tracks: &[TrackRecord],
        assignments: &[ClusterAssignment],
        k: usize,
    ) -> Result<Playlist> {
        if k == 0 {
            return Err(Error::InvalidClusterCount { requested: 0 });
        }
        if tracks.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let cluster_of: HashMap<i64, usize> = assignments
            .iter()
            .map(|a| (a.track_id, a.cluster_index))
            .collect();

        // Keyed by cluster index; only non-empty clusters get an entry.
        let mut members: BTreeMap<usize, Vec<&TrackRecord>> = BTreeMap::new();
        let mut joined = 0usize;
        for track in tracks {
            let Some(&index) = cluster_of.get(&track.track_id) else {
                continue;
            };
            if index >= k {
                return Err(Error::ClusterIndexOutOfRange { index, k });
            }
            members.entry(index).or_default().push(track);
            joined += 1;
        }
        if joined == 0 {
            return Err(Error::EmptyCatalog);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let picked = members
            .values()
            .filter_map(|cluster| cluster.choose(&mut rng).map(|&t| t.clone()))
            .collect();

        Ok(Playlist::from_tracks(picked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: i64) -> Vec<TrackRecord> {
        (1..=n)
            .map(|i| TrackRecord::new(i, format!("track {i}"), 1, 1))
            .collect()
    }

    fn assign(pairs: &[(i64, usize)]) -> Vec<ClusterAssignment> {
        pairs
            .iter()
            .map(|&(track_id, cluster_index)| ClusterAssignment {
                track_id,
                cluster_index,
            })
            .collect()
    }

    #[test]
    fn test_one_track_per_non_empty_cluster() {
        let assignments = assign(&[(1, 2), (2, 0), (3, 2), (4, 0)]);

        let playlist = PlaylistSampler::new(0).sample(&tracks(4), &assignments, 4).unwrap();

        // clusters 1 and 3 are empty
        assert_eq!(playlist.len(), 2);
        let ids = playlist.track_ids();
        assert!([2, 4].contains(&ids[0]), "first pick comes from cluster 0");
        assert!([1, 3].contains(&ids[1]), "second pick comes from cluster 2");
    }

    #[test]
    fn test_same_seed_same_playlist() {
        let assignments: Vec<_> = (1..=20).map(|i| (i, (i % 3) as usize)).collect();
        let assignments = assign(&assignments);

        let a = PlaylistSampler::new(5).sample(&tracks(20), &assignments, 3).unwrap();
        let b = PlaylistSampler::new(5).sample(&tracks(20), &assignments, 3).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_huge_k_only_visits_occupied_clusters() {
        let assignments = assign(&[(1, usize::MAX - 1), (2, 7)]);

        let playlist = PlaylistSampler::new(0)
            .sample(&tracks(2), &assignments, usize::MAX)
            .unwrap();

        assert_eq!(playlist.track_ids(), vec![2, 1]);
    }

    #[test]
    fn test_unknown_assignments_ignored() {
        let assignments = assign(&[(1, 0), (99, 1)]);

        let playlist = PlaylistSampler::new(0).sample(&tracks(1), &assignments, 2).unwrap();

        assert_eq!(playlist.track_ids(), vec![1]);
    }

    #[test]
    fn test_errors() {
        let sampler = PlaylistSampler::new(0);

        assert_eq!(sampler.sample(&[], &assign(&[(1, 0)]), 1), Err(Error::EmptyCatalog));
        assert_eq!(sampler.sample(&tracks(2), &[], 1), Err(Error::EmptyCatalog));
        assert_eq!(
            sampler.sample(&tracks(2), &assign(&[(1, 3)]), 2),
            Err(Error::ClusterIndexOutOfRange { index: 3, k: 2 })
        );
        assert_eq!(
            sampler.sample(&tracks(2), &assign(&[(1, 0)]), 0),
            Err(Error::InvalidClusterCount { requested: 0 })
        );
    }
}
