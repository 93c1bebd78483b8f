//! Data types flowing through the pipeline.
//!
//! ```text
//! TrackRecord ──extract──▶ FeatureVector ──cluster──▶ ClusterAssignment ──sample──▶ Playlist
//! ```
//!
//! Track records are read-only inputs. Feature vectors and assignments are
//! recomputed on every run; only the [`Playlist`] is handed back to callers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackRecord {
    /// Unique within a run.
    pub track_id: i64,
    /// Display name. Not unique.
    pub name: String,
    /// Album grouping key; `None` maps to the reserved "unknown" code.
    #[cfg_attr(feature = "serde", serde(default))]
    pub album_id: Option<i64>,
    /// Genre grouping key; required by every feature strategy.
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre_id: Option<i64>,
}

impl TrackRecord {
    /// Create a record with both grouping keys present.
    pub fn new(track_id: i64, name: impl Into<String>, album_id: i64, genre_id: i64) -> Self {
        Self {
            track_id,
            name: name.into(),
            album_id: Some(album_id),
            genre_id: Some(genre_id),
        }
    }

    /// Set the album id (or clear it with `None`).
    pub fn with_album(mut self, album_id: Option<i64>) -> Self {
        self.album_id = album_id;
        self
    }

    /// Set the genre id (or clear it with `None`).
    pub fn with_genre(mut self, genre_id: Option<i64>) -> Self {
        self.genre_id = genre_id;
        self
    }
}

/// Numeric representation of one track.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Back-reference to the source record.
    pub track_id: i64,
    /// Same length for every vector in a run.
    pub vector: Vec<f32>,
}

/// Cluster membership of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterAssignment {
    /// Back-reference to the source record.
    pub track_id: i64,
    /// Index in `[0, k)`.
    pub cluster_index: usize,
}

/// Final ordered output: at most one track per non-empty cluster, in
/// ascending cluster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Playlist {
    tracks: Vec<TrackRecord>,
}

impl Playlist {
    pub(crate) fn from_tracks(tracks: Vec<TrackRecord>) -> Self {
        Self { tracks }
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate over the full records.
    pub fn iter(&self) -> std::slice::Iter<'_, TrackRecord> {
        self.tracks.iter()
    }

    /// `(track_id, name)` pairs, the view a presentation layer renders.
    pub fn entries(&self) -> impl Iterator<Item = (i64, &str)> + '_ {
        self.tracks.iter().map(|t| (t.track_id, t.name.as_str()))
    }

    /// Track ids in playlist order.
    pub fn track_ids(&self) -> Vec<i64> {
        self.tracks.iter().map(|t| t.track_id).collect()
    }

    /// Borrow the records as a slice.
    pub fn as_slice(&self) -> &[TrackRecord] {
        &self.tracks
    }

    /// Consume into the underlying records.
    pub fn into_tracks(self) -> Vec<TrackRecord> {
        self.tracks
    }
}

impl IntoIterator for Playlist {
    type Item = TrackRecord;
    type IntoIter = std::vec::IntoIter<TrackRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a TrackRecord;
    type IntoIter = std::slice::Iter<'a, TrackRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
