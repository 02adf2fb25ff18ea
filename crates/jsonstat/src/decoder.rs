use std::collections::HashMap;

use tracing::debug;
use tracing::warn;

use crate::dataset::Dataset;
use crate::dataset::Dimension;
use crate::dataset::Statuses;
use crate::dataset::Values;
use crate::error::DatasetError;
use crate::error::ResolveError;
use crate::query::Query;

/// What the decoder does when a query omits a dimension, or names a member
/// code the dimension does not have.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Use the member at position 0 of the dimension.
    #[default]
    FirstMember,

    /// Treat the lookup as a resolve error; the query yields no data.
    Reject,

    /// Use the first of these aggregate codes (e.g. `TOTAL`) the dimension has;
    /// if it has none, the query yields no data.
    Aggregate(Vec<String>),
}

/// The value and status flag stored at one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    /// The finite value at the cell, or `None` if it holds no data.
    pub value: Option<f64>,

    /// The status flag of the cell, e.g. `p` for provisional.
    pub status: Option<&'a str>,
}

/// Resolves queries against a single JSON-stat dataset.
///
/// The decoder is built once per payload and validates it up front. A payload
/// that fails validation does not produce an error: the decoder keeps the
/// reason, available from [`Decoder::error`], and reports no data for every
/// query, so one broken response only empties the panel that asked for it.
#[derive(Debug, Clone)]
pub struct Decoder {
    label: Option<String>,
    updated: Option<String>,
    state: State,
    policy: FallbackPolicy,
}

#[derive(Debug, Clone)]
enum State {
    Ready(Layout),
    Malformed(DatasetError),
}

impl Decoder {
    /// Builds a decoder for `dataset`.
    pub fn new(dataset: Dataset, policy: FallbackPolicy) -> Decoder {
        let label = dataset.label.clone();
        let updated = dataset.updated.clone();

        let state = match Layout::build(dataset) {
            Ok(layout) => State::Ready(layout),
            Err(error) => {
                warn!(%error, "malformed JSON-stat dataset, every lookup reports no data");
                State::Malformed(error)
            }
        };

        Self {
            label,
            updated,
            state,
            policy,
        }
    }

    /// Parses `bytes` as a JSON-stat dataset and builds a decoder for it.
    ///
    /// Unparsable input yields a malformed decoder rather than an error.
    pub fn from_slice(bytes: &[u8], policy: FallbackPolicy) -> Decoder {
        match Dataset::from_slice(bytes) {
            Ok(dataset) => Self::new(dataset, policy),
            Err(error) => {
                warn!(%error, "unparsable JSON-stat payload, every lookup reports no data");
                Self {
                    label: None,
                    updated: None,
                    state: State::Malformed(error),
                    policy,
                }
            }
        }
    }

    /// Returns the value stored at the coordinate selected by `query`, or
    /// `None` if the cell holds no data or cannot be addressed.
    pub fn resolve(&self, query: &Query) -> Option<f64> {
        match self.try_resolve(query) {
            Ok(value) => value,
            Err(error) => {
                debug!(%query, %error, "no data for query");
                None
            }
        }
    }

    /// Like [`Decoder::resolve`], but reports why a coordinate could not be
    /// addressed. `Ok(None)` means the cell exists but holds no data.
    pub fn try_resolve(&self, query: &Query) -> Result<Option<f64>, ResolveError> {
        let layout = self.layout()?;
        let offset = layout.offset(query, &self.policy)?;

        Ok(layout.value(offset))
    }

    /// Returns the value and status flag stored at the coordinate selected by
    /// `query`, or `None` if the coordinate cannot be addressed.
    pub fn observation(&self, query: &Query) -> Option<Observation<'_>> {
        let layout = self.ready()?;
        let offset = layout.offset(query, &self.policy).ok()?;

        Some(Observation {
            value: layout.value(offset),
            status: layout.status(offset),
        })
    }

    /// Returns the names of the dimensions in declared order.
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.ready()
            .into_iter()
            .flat_map(|layout| layout.axes.iter().map(|axis| axis.name.as_str()))
    }

    /// Returns the member codes of `dimension` in position order.
    pub fn codes(&self, dimension: &str) -> Option<&[String]> {
        self.axis(dimension).map(|axis| axis.codes.as_slice())
    }

    /// Returns the display label of a member code.
    pub fn label(&self, dimension: &str, code: &str) -> Option<&str> {
        self.axis(dimension)?.labels.get(code).map(String::as_str)
    }

    /// Returns the display label of a dimension.
    pub fn dimension_label(&self, dimension: &str) -> Option<&str> {
        self.axis(dimension)?.label.as_deref()
    }

    /// Returns the dataset title.
    pub fn title(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the dataset's last update timestamp, as sent by the API.
    pub fn updated(&self) -> Option<&str> {
        self.updated.as_deref()
    }

    /// Returns the number of cells of the cube; 0 for a malformed dataset.
    pub fn size(&self) -> usize {
        self.ready().map_or(0, |layout| layout.len)
    }

    /// Returns the fallback policy.
    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// Replaces the fallback policy.
    pub fn set_policy(&mut self, policy: FallbackPolicy) {
        self.policy = policy;
    }

    /// Returns `true` if the dataset failed validation.
    pub fn is_malformed(&self) -> bool {
        matches!(self.state, State::Malformed(_))
    }

    /// Returns the reason the dataset failed validation.
    pub fn error(&self) -> Option<&DatasetError> {
        match self.state {
            State::Malformed(ref error) => Some(error),
            State::Ready(_) => None,
        }
    }

    fn layout(&self) -> Result<&Layout, ResolveError> {
        match self.state {
            State::Ready(ref layout) => Ok(layout),
            State::Malformed(ref error) => Err(ResolveError::Malformed(error.clone())),
        }
    }

    fn ready(&self) -> Option<&Layout> {
        match self.state {
            State::Ready(ref layout) => Some(layout),
            State::Malformed(_) => None,
        }
    }

    fn axis(&self, dimension: &str) -> Option<&Axis> {
        self.ready()?
            .axes
            .iter()
            .find(|axis| axis.name == dimension)
    }
}

impl From<Dataset> for Decoder {
    fn from(dataset: Dataset) -> Self {
        Decoder::new(dataset, FallbackPolicy::default())
    }
}

#[derive(Debug, Clone)]
struct Layout {
    axes: Vec<Axis>,
    values: Cells<f64>,
    statuses: Option<Cells<String>>,
    len: usize,
}

impl Layout {
    fn build(dataset: Dataset) -> Result<Layout, DatasetError> {
        let Dataset {
            id,
            size,
            value,
            status,
            dimension,
            ..
        } = dataset;

        let value = value.ok_or(DatasetError::MissingValue)?;
        let mut dimension = dimension.ok_or(DatasetError::MissingDimension)?;

        if id.len() != size.len() {
            return Err(DatasetError::ShapeMismatch {
                ids: id.len(),
                sizes: size.len(),
            });
        }

        let len = size
            .iter()
            .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
            .ok_or(DatasetError::SizeOverflow)?;

        // Row-major: the last declared dimension varies fastest.
        let mut axes = Vec::with_capacity(id.len());
        let mut stride = 1usize;

        for (name, &extent) in id.into_iter().zip(&size).rev() {
            let definition = dimension
                .remove(&name)
                .ok_or_else(|| DatasetError::UnknownDimension { name: name.clone() })?;

            axes.push(Axis::new(name, extent, stride, definition)?);
            stride = stride.saturating_mul(extent);
        }

        axes.reverse();

        let values = Cells::<f64>::values(value, len)?;
        let statuses = status.and_then(|status| Cells::<String>::statuses(status, len));

        Ok(Self {
            axes,
            values,
            statuses,
            len,
        })
    }

    fn offset(&self, query: &Query, policy: &FallbackPolicy) -> Result<usize, ResolveError> {
        let mut offset = 0usize;

        for axis in &self.axes {
            let position = axis.position(query.get(&axis.name), policy)?;
            offset += position * axis.stride;
        }

        if offset >= self.len {
            return Err(ResolveError::OutOfBounds {
                offset,
                len: self.len,
            });
        }

        Ok(offset)
    }

    fn value(&self, offset: usize) -> Option<f64> {
        self.values.get(offset).copied().filter(|v| v.is_finite())
    }

    fn status(&self, offset: usize) -> Option<&str> {
        self.statuses
            .as_ref()
            .and_then(|statuses| statuses.get(offset))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct Axis {
    name: String,
    label: Option<String>,
    stride: usize,
    positions: HashMap<String, usize>,
    codes: Vec<String>,
    labels: HashMap<String, String>,
}

impl Axis {
    fn new(
        name: String,
        size: usize,
        stride: usize,
        definition: Dimension,
    ) -> Result<Axis, DatasetError> {
        let positions = definition.category.positions();

        let mut ordered: Vec<(usize, &String)> = Vec::with_capacity(positions.len());
        for (code, &position) in &positions {
            if position >= size {
                return Err(DatasetError::CategoryOutOfRange {
                    dimension: name,
                    code: code.clone(),
                    position,
                    size,
                });
            }
            ordered.push((position, code));
        }
        ordered.sort();

        let codes = ordered.into_iter().map(|(_, code)| code.clone()).collect();
        let labels = definition.category.label.into_iter().collect();

        Ok(Self {
            name,
            label: definition.label,
            stride,
            positions,
            codes,
            labels,
        })
    }

    fn position(&self, code: Option<&str>, policy: &FallbackPolicy) -> Result<usize, ResolveError> {
        if let Some(&position) = code.and_then(|code| self.positions.get(code)) {
            return Ok(position);
        }

        match policy {
            FallbackPolicy::FirstMember => {
                debug!(dimension = %self.name, ?code, "falling back to the first member");
                Ok(0)
            }
            FallbackPolicy::Reject => match code {
                Some(code) => Err(ResolveError::UnknownCode {
                    dimension: self.name.clone(),
                    code: code.to_owned(),
                }),
                None => Err(ResolveError::MissingCode {
                    dimension: self.name.clone(),
                }),
            },
            FallbackPolicy::Aggregate(aggregates) => aggregates
                .iter()
                .find_map(|aggregate| self.positions.get(aggregate).copied())
                .ok_or_else(|| ResolveError::NoAggregate {
                    dimension: self.name.clone(),
                }),
        }
    }
}

/// Per-cell data stored either densely or keyed by offset.
#[derive(Debug, Clone)]
enum Cells<T> {
    Dense(Vec<Option<T>>),
    Sparse(HashMap<usize, T>),
    Uniform(T),
}

impl<T> Cells<T> {
    fn get(&self, offset: usize) -> Option<&T> {
        match self {
            Cells::Dense(cells) => cells.get(offset).and_then(Option::as_ref),
            Cells::Sparse(cells) => cells.get(&offset),
            Cells::Uniform(cell) => Some(cell),
        }
    }
}

impl Cells<f64> {
    fn values(values: Values, len: usize) -> Result<Cells<f64>, DatasetError> {
        match values {
            Values::Dense(values) => {
                if values.len() != len {
                    return Err(DatasetError::ValueCountMismatch {
                        expected: len,
                        actual: values.len(),
                    });
                }

                Ok(Cells::Dense(values))
            }
            Values::Sparse(entries) => {
                let mut cells = HashMap::with_capacity(entries.len());

                for (key, value) in entries {
                    let offset = sparse_offset(&key, len)?;
                    if let Some(value) = value {
                        cells.insert(offset, value);
                    }
                }

                Ok(Cells::Sparse(cells))
            }
        }
    }
}

impl Cells<String> {
    // Status flags are advisory: a broken status member is dropped rather
    // than invalidating the values.
    fn statuses(statuses: Statuses, len: usize) -> Option<Cells<String>> {
        match statuses {
            Statuses::Uniform(status) => Some(Cells::Uniform(status)),
            Statuses::Dense(statuses) if statuses.len() == len => Some(Cells::Dense(statuses)),
            Statuses::Dense(statuses) => {
                warn!(
                    expected = len,
                    actual = statuses.len(),
                    "ignoring status flags with the wrong length"
                );
                None
            }
            Statuses::Sparse(entries) => {
                let cells = entries
                    .into_iter()
                    .filter_map(|(key, status)| match sparse_offset(&key, len) {
                        Ok(offset) => Some((offset, status)),
                        Err(error) => {
                            debug!(%error, "ignoring status flag");
                            None
                        }
                    })
                    .collect();

                Some(Cells::Sparse(cells))
            }
        }
    }
}

fn sparse_offset(key: &str, len: usize) -> Result<usize, DatasetError> {
    let offset: usize = key.parse().map_err(|_| DatasetError::InvalidOffset {
        key: key.to_owned(),
    })?;

    if offset >= len {
        return Err(DatasetError::OffsetOutOfRange { offset, len });
    }

    Ok(offset)
}
