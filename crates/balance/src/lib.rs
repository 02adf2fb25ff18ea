//! Energy balance records built on Eurostat JSON-stat datasets.
//!
//! This crate knows the Eurostat energy balance vocabulary ([`codes`]), builds
//! the API requests for each dashboard panel ([`request`]), reshapes decoded
//! datasets into per-country [`Record`]s ([`reshape`]) and computes the derived
//! indicators ([`metrics`]) shown next to the raw flows.

pub mod cache;
pub mod category;
pub mod codes;
pub mod format;
pub mod metrics;
pub mod record;
pub mod request;
pub mod reshape;

pub use crate::cache::YearsCache;
pub use crate::category::Category;
pub use crate::codes::Unit;
pub use crate::record::Kind;
pub use crate::record::Measure;
pub use crate::record::Record;
pub use crate::record::Records;
pub use crate::request::DatasetRequest;
pub use crate::reshape::Scope;
