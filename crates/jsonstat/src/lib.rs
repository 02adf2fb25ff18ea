//! A decoder for [JSON-stat] statistical datasets.
//!
//! [JSON-stat]: https://json-stat.org/full/
//!
//! A JSON-stat dataset stores a dense multidimensional cube as a flat,
//! row-major list of values plus, for every dimension, the position of each
//! member code along that dimension. The [`Decoder`] resolves a [`Query`]
//! (dimension name to member code) to the single value stored at that
//! coordinate without materializing the cube.
//!
//! ```
//! use eurobal_jsonstat::Decoder;
//! use eurobal_jsonstat::FallbackPolicy;
//! use eurobal_jsonstat::Query;
//!
//! let payload = br#"{
//!     "id": ["geo", "time"],
//!     "size": [1, 2],
//!     "value": [10.0, 12.5],
//!     "dimension": {
//!         "geo": { "category": { "index": { "DE": 0 } } },
//!         "time": { "category": { "index": { "2022": 0, "2023": 1 } } }
//!     }
//! }"#;
//!
//! let decoder = Decoder::from_slice(payload, FallbackPolicy::FirstMember);
//! let query = Query::new().with("geo", "DE").with("time", "2023");
//!
//! assert_eq!(decoder.resolve(&query), Some(12.5));
//! ```

#![warn(missing_docs)]

mod decoder;
mod query;

pub mod dataset;
pub mod error;

pub use crate::dataset::Dataset;
pub use crate::decoder::Decoder;
pub use crate::decoder::FallbackPolicy;
pub use crate::decoder::Observation;
pub use crate::query::Query;
