use core::fmt;

/// Result alias for `cluster_playlist`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by feature extraction, clustering and sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No track records (or no feature vectors) were supplied.
    EmptyInput,

    /// A record lacks a field the selected strategy requires.
    MissingField {
        /// Track that is missing the field.
        track_id: i64,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Requested number of clusters is not positive.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
    },

    /// The joined track/assignment set was empty at sampling time.
    EmptyCatalog,

    /// The same `track_id` appeared twice in one batch.
    DuplicateTrackId {
        /// Offending id.
        track_id: i64,
    },

    /// Feature vectors of different lengths in one batch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// An assignment named a cluster outside `[0, k)`.
    ClusterIndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of clusters.
        k: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::MissingField { track_id, field } => {
                write!(f, "track {track_id} is missing required field '{field}'")
            }
            Error::InvalidClusterCount { requested } => {
                write!(f, "cluster count must be positive, got {requested}")
            }
            Error::EmptyCatalog => write!(f, "no tracks available to sample from"),
            Error::DuplicateTrackId { track_id } => {
                write!(f, "track id {track_id} appears more than once")
            }
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::ClusterIndexOutOfRange { index, k } => {
                write!(f, "cluster index {index} out of range for {k} clusters")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
