//! Dense embeddings from label-encoded genre and album codes.

use super::required_genres;
use super::traits::FeatureExtractor;
use crate::error::{Error, Result};
use crate::track::{FeatureVector, TrackRecord};
use ndarray::{s, Array1, Array2};
use rand::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Album code reserved for tracks without an album.
pub const UNKNOWN_ALBUM: usize = 0;

/// Range of the uniform initializer for embedding rows.
const EMBEDDING_INIT: f32 = 0.05;

/// Categorical-embedding feature extractor.
#[derive(Debug, Clone)]
pub struct CategoricalEmbedding {
    /// Embedding width and output dimension.
    dim: usize,
    /// Hidden layer width.
    hidden: usize,
    /// Seed for weight initialization.
    seed: u64,
}

impl Default for CategoricalEmbedding {
    fn default() -> Self {
        Self {
            dim: 8,
            hidden: 16,
            seed: 0,
        }
    }
}

impl CategoricalEmbedding {
    /// Create an extractor with 8-dim embeddings and a 16-wide hidden layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set embedding and output dimension.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Set hidden layer width.
    pub fn with_hidden(mut self, hidden: usize) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set random seed for the weights.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Ascending-id label encoding.
fn encode<I: IntoIterator<Item = i64>>(ids: I, offset: usize) -> BTreeMap<i64, usize> {
    ids.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(code, id)| (id, code + offset))
        .collect()
}

/// Glorot-uniform kernel of shape `(fan_in, fan_out)`.
fn glorot(fan_in: usize, fan_out: usize, rng: &mut impl Rng) -> Array2<f32> {
    let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
    Array2::from_shape_simple_fn((fan_in, fan_out), || rng.random_range(-limit..limit))
}

fn relu(mut x: Array2<f32>) -> Array2<f32> {
    x.mapv_inplace(|v| v.max(0.0));
    x
}

/// Embedding table plus two dense layers; built fresh for every batch.
struct EmbeddingModel {
    table: Array2<f32>,
    w1: Array2<f32>,
    b1: Array1<f32>,
    w2: Array2<f32>,
    b2: Array1<f32>,
}

impl EmbeddingModel {
    fn new(vocab: usize, dim: usize, hidden: usize, rng: &mut impl Rng) -> Self {
        let table = Array2::from_shape_simple_fn((vocab, dim), || {
            rng.random_range(-EMBEDDING_INIT..EMBEDDING_INIT)
        });
        let w1 = glorot(2 * dim, hidden, rng);
        let w2 = glorot(hidden, dim, rng);
        Self {
            table,
            w1,
            b1: Array1::zeros(hidden),
            w2,
            b2: Array1::zeros(dim),
        }
    }

    /// Forward pass over `(genre_code, album_code)` rows.
    fn forward(&self, codes: &[(usize, usize)]) -> Array2<f32> {
        let dim = self.table.ncols();
        let mut x = Array2::<f32>::zeros((codes.len(), 2 * dim));
        for (i, &(g, a)) in codes.iter().enumerate() {
            let mut row = x.row_mut(i);
            row.slice_mut(s![..dim]).assign(&self.table.row(g));
            row.slice_mut(s![dim..]).assign(&self.table.row(a));
        }

        let h = relu(x.dot(&self.w1) + &self.b1);
        relu(h.dot(&self.w2) + &self.b2)
    }
}

impl FeatureExtractor for CategoricalEmbedding {
    fn extract(&self, tracks: &[TrackRecord]) -> Result<Vec<FeatureVector>> {
        if self.dim == 0 || self.hidden == 0 {
            return Err(Error::InvalidParameter {
                name: "dim",
                message: "embedding and hidden widths must be positive",
            });
        }
        let genres = required_genres(tracks)?;

        let genre_codes = encode(genres.iter().copied(), 0);
        let album_codes = encode(tracks.iter().filter_map(|t| t.album_id), UNKNOWN_ALBUM + 1);

        let codes: Vec<(usize, usize)> = tracks
            .iter()
            .zip(&genres)
            .map(|(t, g)| {
                let album = t.album_id.map_or(UNKNOWN_ALBUM, |a| album_codes[&a]);
                (genre_codes[g], album)
            })
            .collect();

        let vocab = genre_codes
            .len()
            .saturating_sub(1)
            .max(album_codes.len() + UNKNOWN_ALBUM)
            + 1;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let model = EmbeddingModel::new(vocab, self.dim, self.hidden, &mut rng);
        let out = model.forward(&codes);

        Ok(tracks
            .iter()
            .zip(out.outer_iter())
            .map(|(t, row)| FeatureVector {
                track_id: t.track_id,
                vector: row.to_vec(),
            })
            .collect())
    }
}
