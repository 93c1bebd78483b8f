//! Diagnostics for a clustering run and the playlist it produced.
//!
//! None of these feed back into the pipeline; they exist so callers (and the
//! CLI) can judge whether the clusters line up with the catalog's genres.
//!
//! | Metric | Range | Best |
//! |--------|-------|------|
//! | [`purity`] | [0, 1] | 1 |
//! | [`genre_coverage`] | [0, 1] | 1 |
//!
//! # Example
//!
//! ```rust
//! use cluster_playlist::metrics::purity;
//!
//! let pred = [0, 0, 1, 1, 2, 2];
//! let genre = [7, 7, 8, 8, 9, 9];
//! assert_eq!(purity(&pred, &genre), 1.0);
//! ```

use crate::track::{Playlist, TrackRecord};
use std::collections::{HashMap, HashSet};

/// Fraction of points whose cluster's majority label matches their own.
///
/// ```text
/// purity = (1/n) Σₖ maxⱼ |Cₖ ∩ Lⱼ|
/// ```
///
/// Returns 0 for empty or mismatched inputs. Biased toward many small
/// clusters: k = n always scores 1.
pub fn purity(pred: &[usize], truth: &[i64]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let mut joint: HashMap<usize, HashMap<i64, usize>> = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth) {
        *joint.entry(p).or_default().entry(t).or_insert(0) += 1;
    }

    let majority: usize = joint
        .values()
        .map(|counts| counts.values().copied().max().unwrap_or(0))
        .sum();

    majority as f64 / pred.len() as f64
}

/// Share of the catalog's distinct genres that appear in the playlist.
///
/// Tracks without a genre are ignored on both sides. Returns 0 when the
/// catalog has no genres.
pub fn genre_coverage(playlist: &Playlist, catalog: &[TrackRecord]) -> f64 {
    let total: HashSet<i64> = catalog.iter().filter_map(|t| t.genre_id).collect();
    if total.is_empty() {
        return 0.0;
    }
    let covered: HashSet<i64> = playlist
        .iter()
        .filter_map(|t| t.genre_id)
        .filter(|g| total.contains(g))
        .collect();

    covered.len() as f64 / total.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purity_perfect_and_mixed() {
        assert_eq!(purity(&[0, 0, 1, 1], &[5, 5, 6, 6]), 1.0);
        // one cluster holding two labels evenly
        assert_eq!(purity(&[0, 0, 0, 0], &[5, 5, 6, 6]), 0.5);
        // label permutation does not matter
        assert_eq!(purity(&[1, 1, 0, 0], &[5, 5, 6, 6]), 1.0);
    }

    #[test]
    fn test_purity_degenerate_inputs() {
        assert_eq!(purity(&[], &[]), 0.0);
        assert_eq!(purity(&[0, 1], &[1]), 0.0);
    }

    #[test]
    fn test_genre_coverage() {
        let catalog = vec![
            TrackRecord::new(1, "a", 1, 1),
            TrackRecord::new(2, "b", 1, 2),
            TrackRecord::new(3, "c", 1, 3),
            TrackRecord::new(4, "d", 1, 4).with_genre(None),
        ];
        let playlist = Playlist::from_tracks(vec![catalog[0].clone(), catalog[2].clone()]);

        let coverage = genre_coverage(&playlist, &catalog);
        assert!((coverage - 2.0 / 3.0).abs() < 1e-12);

        assert_eq!(genre_coverage(&Playlist::default(), &catalog), 0.0);
        assert_eq!(genre_coverage(&playlist, &[]), 0.0);
    }
}
