//! Identifiers of the generated page elements and data files.
//!
//! Charts and series draw from one process-wide counter, so no two elements
//! of a dashboard share a number.

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

fn next() -> u32 {
    static NEXT: AtomicU32 = AtomicU32::new(1);

    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Identifies a chart. Displays as the chart's DOM element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ChartId(u32);

impl ChartId {
    pub fn next() -> ChartId {
        Self(next())
    }
}

impl Display for ChartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "chart{}", self.0)
    }
}

/// Identifies a series: its data file and the two arrays the file defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SeriesId(u32);

impl SeriesId {
    pub fn next() -> SeriesId {
        Self(next())
    }

    pub fn file_name(&self) -> String {
        format!("series{}.js", self.0)
    }

    pub fn xs(&self) -> String {
        format!("xs{}", self.0)
    }

    pub fn ys(&self) -> String {
        format!("ys{}", self.0)
    }
}
