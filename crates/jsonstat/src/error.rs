//! Defines the error types that this crate uses.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

/// The error type for reading and validating a JSON-stat dataset.
///
/// A dataset that fails validation is not rejected by the [`Decoder`](crate::Decoder);
/// the decoder keeps the error and reports "no data" for every query instead.
#[derive(Debug, Clone)]
pub enum DatasetError {
    /// A [`serde_json::Error`] encountered while parsing the payload.
    Json(Arc<serde_json::Error>),

    /// The payload has no `value` member.
    MissingValue,

    /// The payload has no `dimension` member.
    MissingDimension,

    /// The `id` and `size` members have different lengths.
    ShapeMismatch {
        /// The length of `id`.
        ids: usize,
        /// The length of `size`.
        sizes: usize,
    },

    /// A dimension listed in `id` has no entry in `dimension`.
    UnknownDimension {
        /// The dimension name.
        name: String,
    },

    /// The dense `value` list does not hold `product(size)` entries.
    ValueCountMismatch {
        /// The product of the dimension sizes.
        expected: usize,
        /// The number of entries in `value`.
        actual: usize,
    },

    /// A key of the sparse `value` object is not an offset.
    InvalidOffset {
        /// The offending key.
        key: String,
    },

    /// A key of the sparse `value` object lies outside the cube.
    OffsetOutOfRange {
        /// The offset named by the key.
        offset: usize,
        /// The number of cells in the cube.
        len: usize,
    },

    /// A category position lies outside the extent of its dimension.
    CategoryOutOfRange {
        /// The dimension name.
        dimension: String,
        /// The member code.
        code: String,
        /// The position given for the member.
        position: usize,
        /// The extent of the dimension.
        size: usize,
    },

    /// The product of the dimension sizes does not fit in a `usize`.
    SizeOverflow,
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let dataset_error = "dataset error:";

        match self {
            DatasetError::Json(error) => write!(f, "{dataset_error} JSON error: {error}"),
            DatasetError::MissingValue => write!(f, "{dataset_error} the `value` member is missing"),
            DatasetError::MissingDimension => {
                write!(f, "{dataset_error} the `dimension` member is missing")
            }
            DatasetError::ShapeMismatch { ids, sizes } => write!(
                f,
                "{dataset_error} `id` lists {ids} dimensions but `size` lists {sizes} extents"
            ),
            DatasetError::UnknownDimension { name } => write!(
                f,
                "{dataset_error} the \"{name}\" dimension has no category definition"
            ),
            DatasetError::ValueCountMismatch { expected, actual } => write!(
                f,
                "{dataset_error} expected {expected} values but the payload holds {actual}"
            ),
            DatasetError::InvalidOffset { key } => {
                write!(f, "{dataset_error} \"{key}\" is not a valid value offset")
            }
            DatasetError::OffsetOutOfRange { offset, len } => write!(
                f,
                "{dataset_error} value offset {offset} is outside a cube of {len} cells"
            ),
            DatasetError::CategoryOutOfRange {
                dimension,
                code,
                position,
                size,
            } => write!(
                f,
                "{dataset_error} the \"{code}\" member of \"{dimension}\" is at position {position} but the dimension has {size} members"
            ),
            DatasetError::SizeOverflow => {
                write!(f, "{dataset_error} the cube size does not fit in memory")
            }
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DatasetError::Json(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(error: serde_json::Error) -> Self {
        DatasetError::Json(Arc::new(error))
    }
}

/// The error type for resolving a query to a single cell.
#[derive(Debug, Clone)]
pub enum ResolveError {
    /// The dataset failed validation.
    Malformed(DatasetError),

    /// The query does not name a member of the dimension.
    MissingCode {
        /// The dimension name.
        dimension: String,
    },

    /// The query names a member the dimension does not have.
    UnknownCode {
        /// The dimension name.
        dimension: String,
        /// The code the query names.
        code: String,
    },

    /// None of the configured aggregate codes exist in the dimension.
    NoAggregate {
        /// The dimension name.
        dimension: String,
    },

    /// The computed offset lies outside the cube.
    OutOfBounds {
        /// The computed offset.
        offset: usize,
        /// The number of cells in the cube.
        len: usize,
    },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let resolve_error = "resolve error:";

        match self {
            ResolveError::Malformed(error) => write!(f, "{resolve_error} {error}"),
            ResolveError::MissingCode { dimension } => write!(
                f,
                "{resolve_error} the query does not select a member of \"{dimension}\""
            ),
            ResolveError::UnknownCode { dimension, code } => write!(
                f,
                "{resolve_error} \"{dimension}\" has no \"{code}\" member"
            ),
            ResolveError::NoAggregate { dimension } => write!(
                f,
                "{resolve_error} \"{dimension}\" has none of the aggregate members"
            ),
            ResolveError::OutOfBounds { offset, len } => write!(
                f,
                "{resolve_error} offset {offset} is outside a cube of {len} cells"
            ),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveError::Malformed(error) => Some(error),
            _ => None,
        }
    }
}

impl From<DatasetError> for ResolveError {
    fn from(error: DatasetError) -> Self {
        ResolveError::Malformed(error)
    }
}
