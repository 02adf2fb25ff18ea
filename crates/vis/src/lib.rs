//! Eurobal's dashboard rendering library.
//!
//! Builds a [`dashboard::Dashboard`] from the per-country records of each
//! panel and writes it out as a static site: an HTML dashboard of KPI cards
//! and Plotly charts, a storyteller page and one JavaScript data file per
//! chart series.

#![warn(missing_docs)]

pub(crate) mod chart;
pub(crate) mod id;
pub(crate) mod template;

pub mod dashboard;
pub mod error;
pub mod layout;
pub mod story;

pub use crate::dashboard::Dashboard;
pub use crate::dashboard::Panels;
pub use crate::layout::VisLayout;
