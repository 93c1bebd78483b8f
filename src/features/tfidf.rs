//! TF-IDF over one-token genre documents.

use super::required_genres;
use super::traits::FeatureExtractor;
use crate::error::Result;
use crate::track::{FeatureVector, TrackRecord};
use std::collections::BTreeMap;

/// Text-frequency feature extractor.
///
/// Vocabulary columns are ordered by ascending genre id, so the layout does
/// not depend on input order.
#[derive(Debug, Clone, Default)]
pub struct TfIdf {
    /// Skip the final L2 normalisation.
    raw: bool,
}

impl TfIdf {
    /// Create an extractor with L2-normalised output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep raw `tf × idf` weights instead of unit-length rows.
    pub fn without_normalization(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Smoothed inverse document frequency.
    fn idf(n_docs: usize, doc_freq: usize) -> f32 {
        ((1.0 + n_docs as f64) / (1.0 + doc_freq as f64)).ln() as f32 + 1.0
    }
}

impl FeatureExtractor for TfIdf {
    fn extract(&self, tracks: &[TrackRecord]) -> Result<Vec<FeatureVector>> {
        let genres = required_genres(tracks)?;
        let n = genres.len();

        // token -> document frequency; one token per document
        let mut doc_freq: BTreeMap<i64, usize> = BTreeMap::new();
        for &g in &genres {
            *doc_freq.entry(g).or_insert(0) += 1;
        }

        let column: BTreeMap<i64, usize> = doc_freq
            .keys()
            .enumerate()
            .map(|(i, &g)| (g, i))
            .collect();
        let idf: Vec<f32> = doc_freq.values().map(|&df| Self::idf(n, df)).collect();
        let dim = idf.len();

        let vectors = tracks
            .iter()
            .zip(&genres)
            .map(|(track, g)| {
                let mut vector = vec![0.0f32; dim];
                let j = column[g];
                vector[j] = idf[j];

                if !self.raw {
                    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
                    if norm > 0.0 {
                        vector.iter_mut().for_each(|x| *x /= norm);
                    }
                }

                FeatureVector {
                    track_id: track.track_id,
                    vector,
                }
            })
            .collect();

        Ok(vectors)
    }
}
