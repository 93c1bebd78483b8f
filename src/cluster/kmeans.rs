//! K-means clustering.
//!
//! Partitions feature vectors into k clusters by minimizing **within-cluster
//! sum of squares** (WCSS, reported as inertia):
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids via seeded k-means++
//! 2. **Assign**: each point → nearest centroid (ties → lowest index)
//! 3. **Update**: each centroid → mean of its points
//! 4. Repeat until the assignment stops changing, or `max_iter` is reached
//!
//! Reaching `max_iter` is not an error; the last assignment is returned and
//! [`KmeansFit::converged`] is `false`.
//!
//! # Empty Clusters
//!
//! `k` may exceed the number of distinct points. Surplus centroids then
//! duplicate existing ones, lose every tie, and stay empty. An empty cluster
//! keeps its previous centroid rather than being reseeded, so the
//! assignment-stability stopping rule stays well defined.
//!
//! Only `min(k, n)` centroids are materialized: once every point coincides
//! with a centroid, any further centroid would be a duplicate that never
//! wins an assignment. Labels stay in `[0, k)`, and clusters at index `>= n`
//! are always empty. Work and memory scale with the data, not with `k`.
//!
//! # Restarts
//!
//! Lloyd only finds a local optimum. With `n_init > 1` the algorithm is
//! rerun from different seeds (`seed`, `seed + 1`, ...) and the lowest
//! inertia wins, earliest restart on ties.

use super::traits::Clustering;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum Lloyd iterations per restart.
    max_iter: usize,
    /// Number of seeded restarts.
    n_init: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// Cluster index per input point, in `[0, k)`.
    pub labels: Vec<usize>,
    /// Final centroids, shape `(min(k, n), d)`.
    pub centroids: Array2<f32>,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
    /// Lloyd iterations run by the winning restart.
    pub iterations: usize,
    /// Whether the winning restart stopped because assignments were stable.
    pub converged: bool,
}

impl KmeansFit {
    /// Member count per materialized cluster (`min(k, n)` entries).
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.centroids.nrows()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }

    /// Number of clusters with at least one member.
    pub fn non_empty_clusters(&self) -> usize {
        self.cluster_sizes().iter().filter(|&&s| s > 0).count()
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            n_init: 1,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set number of restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit and return labels plus diagnostics.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        if self.k == 0 {
            return Err(Error::InvalidClusterCount { requested: 0 });
        }
        if self.n_init == 0 {
            return Err(Error::InvalidParameter {
                name: "n_init",
                message: "must be at least 1",
            });
        }
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = data.len();
        let d = data[0].len();

        let mut flat: Vec<f32> = Vec::with_capacity(n * d);
        for point in data {
            if point.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: point.len(),
                });
            }
            flat.extend(point);
        }
        let data_arr =
            Array2::from_shape_vec((n, d), flat).map_err(|_| Error::DimensionMismatch {
                expected: n * d,
                found: data.iter().map(Vec::len).sum(),
            })?;

        let mut best: Option<KmeansFit> = None;
        for restart in 0..self.n_init {
            let mut rng: Box<dyn RngCore> = match self.seed {
                Some(s) => Box::new(StdRng::seed_from_u64(s.wrapping_add(restart as u64))),
                None => Box::new(rand::rng()),
            };
            let fit = self.run_once(&data_arr, &mut rng);
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or(Error::EmptyInput)
    }

    /// One Lloyd run from a fresh k-means++ initialization.
    fn run_once(&self, data: &Array2<f32>, rng: &mut impl Rng) -> KmeansFit {
        let n = data.nrows();
        let d = data.ncols();
        let k = self.k.min(n);

        let mut centroids = init_centroids(data, k, rng);
        let mut labels = assign(data, &centroids);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            // Update step
            let mut sums = Array2::<f32>::zeros((k, d));
            let mut counts = vec![0usize; k];
            for (i, &label) in labels.iter().enumerate() {
                let mut row = sums.row_mut(label);
                row += &data.row(i);
                counts[label] += 1;
            }
            for (c, &count) in counts.iter().enumerate() {
                if count > 0 {
                    let mean = sums.row(c).mapv(|v| v / count as f32);
                    centroids.row_mut(c).assign(&mean);
                }
            }

            let next = assign(data, &centroids);
            if next == labels {
                converged = true;
                break;
            }
            labels = next;
        }

        let inertia = (0..n)
            .map(|i| squared_distance(&data.row(i), &centroids.row(labels[i])) as f64)
            .sum();

        KmeansFit {
            labels,
            centroids,
            inertia,
            iterations,
            converged,
        }
    }
}

/// Nearest centroid per point; ties go to the lowest index.
fn assign(data: &Array2<f32>, centroids: &Array2<f32>) -> Vec<usize> {
    let nearest = |i: usize| {
        let point = data.row(i);
        let mut best_cluster = 0;
        let mut best_dist = f32::MAX;
        for (c, centroid) in centroids.outer_iter().enumerate() {
            let dist = squared_distance(&point, &centroid);
            if dist < best_dist {
                best_dist = dist;
                best_cluster = c;
            }
        }
        best_cluster
    };

    #[cfg(feature = "parallel")]
    let labels: Vec<usize> = (0..data.nrows()).into_par_iter().map(nearest).collect();

    #[cfg(not(feature = "parallel"))]
    let labels: Vec<usize> = (0..data.nrows()).map(nearest).collect();

    labels
}

/// Pick `k <= n` initial centroids with k-means++.
fn init_centroids(data: &Array2<f32>, k: usize, rng: &mut impl Rng) -> Array2<f32> {
    let n = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));

    // First centroid: random point
    let first = rng.random_range(0..n);
    centroids.row_mut(0).assign(&data.row(first));

    // Distance of every point to its nearest chosen centroid so far
    let mut distances: Vec<f32> = (0..n)
        .map(|j| squared_distance(&data.row(j), &centroids.row(0)))
        .collect();

    for i in 1..k {
        let total: f32 = distances.iter().sum();
        let selected = if total <= 0.0 {
            // Every point already coincides with a centroid
            rng.random_range(0..n)
        } else {
            let threshold = rng.random::<f32>() * total;
            let mut cumsum = 0.0;
            let mut selected = distances.iter().rposition(|&d| d > 0.0).unwrap_or(n - 1);
            for (j, &dist) in distances.iter().enumerate() {
                cumsum += dist;
                if dist > 0.0 && cumsum >= threshold {
                    selected = j;
                    break;
                }
            }
            selected
        };

        centroids.row_mut(i).assign(&data.row(selected));
        for (j, dist) in distances.iter_mut().enumerate() {
            *dist = dist.min(squared_distance(&data.row(j), &centroids.row(i)));
        }
    }

    centroids
}

/// Squared Euclidean distance.
fn squared_distance(a: &ArrayView1<'_, f32>, b: &ArrayView1<'_, f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ]
    }

    #[test]
    fn test_kmeans_basic() {
        let labels = Kmeans::new(2).with_seed(42).fit_predict(&two_blobs()).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        let data: Vec<Vec<f32>> = (0..50)
            .map(|i| vec![i as f32 * 0.1, (i % 5) as f32])
            .collect();

        let labels = Kmeans::new(5).with_seed(123).fit_predict(&data).unwrap();

        assert_eq!(labels.len(), data.len());
        for &label in &labels {
            assert!(label < 5, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_k_equals_n() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];

        let labels = Kmeans::new(3).with_seed(42).fit_predict(&data).unwrap();

        let unique: HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_kmeans_k_larger_than_n_leaves_empty_clusters() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];

        let fit = Kmeans::new(5).with_seed(7).fit(&data).unwrap();

        assert_eq!(fit.labels.len(), 2);
        assert!(fit.labels.iter().all(|&l| l < 5));
        assert_eq!(fit.non_empty_clusters(), 2);
        // only min(k, n) clusters are materialized
        assert_eq!(fit.cluster_sizes().len(), 2);
    }

    #[test]
    fn test_kmeans_huge_k_scales_with_data() {
        let data = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![0.0, 0.0]];

        let kmeans = Kmeans::new(usize::MAX).with_seed(5);
        let fit = kmeans.fit(&data).unwrap();

        assert_eq!(kmeans.n_clusters(), usize::MAX);
        assert_eq!(fit.centroids.nrows(), 3);
        assert_eq!(fit.labels[0], fit.labels[2]);
        assert_ne!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_kmeans_identical_points_single_cluster() {
        let data = vec![vec![1.0, 2.0]; 6];

        let fit = Kmeans::new(3).with_seed(0).fit(&data).unwrap();

        assert_eq!(fit.non_empty_clusters(), 1);
        // duplicate centroids lose every tie to the lowest index
        assert!(fit.labels.iter().all(|&l| l == 0));
        assert!(fit.converged);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let a = Kmeans::new(2).with_seed(42).fit(&two_blobs()).unwrap();
        let b = Kmeans::new(2).with_seed(42).fit(&two_blobs()).unwrap();

        assert_eq!(a, b, "same seed should give same result");
    }

    #[test]
    fn test_kmeans_restarts_never_worse() {
        let data: Vec<Vec<f32>> = (0..40)
            .map(|i| vec![(i % 7) as f32, (i % 3) as f32 * 2.5])
            .collect();

        let single = Kmeans::new(4).with_seed(9).fit(&data).unwrap();
        let multi = Kmeans::new(4).with_seed(9).with_n_init(5).fit(&data).unwrap();

        // restart 0 of the multi run is the single run
        assert!(multi.inertia <= single.inertia);
    }

    #[test]
    fn test_kmeans_iteration_cap_is_not_an_error() {
        let data: Vec<Vec<f32>> = (0..30).map(|i| vec![i as f32]).collect();

        let fit = Kmeans::new(3).with_seed(1).with_max_iter(0).fit(&data).unwrap();

        assert_eq!(fit.iterations, 0);
        assert!(!fit.converged);
        assert_eq!(fit.labels.len(), 30);
    }

    #[test]
    fn test_kmeans_errors() {
        let empty: Vec<Vec<f32>> = vec![];
        assert_eq!(Kmeans::new(2).fit_predict(&empty), Err(Error::EmptyInput));

        assert_eq!(
            Kmeans::new(0).fit_predict(&two_blobs()),
            Err(Error::InvalidClusterCount { requested: 0 })
        );

        let ragged = vec![vec![0.0, 0.0], vec![1.0]];
        assert_eq!(
            Kmeans::new(1).fit_predict(&ragged),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );

        assert!(matches!(
            Kmeans::new(1).with_n_init(0).fit_predict(&two_blobs()),
            Err(Error::InvalidParameter { name: "n_init", .. })
        ));
    }
}
