//! The JSON-stat dataset model, as received from the statistics API.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::DatasetError;

/// A JSON-stat 2.0 dataset response.
///
/// Only the members needed for decoding are modelled; unknown members such as
/// `extension` or `role` are ignored. Every member is optional at this level
/// so that a partially broken payload still parses and can be reported as
/// malformed by the [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    /// The JSON-stat version, `2.0` for current responses.
    pub version: Option<String>,
    /// The response class, `dataset` for the responses decoded here.
    pub class: Option<String>,
    /// The dataset title.
    pub label: Option<String>,
    /// The publisher of the dataset.
    pub source: Option<String>,
    /// When the dataset was last updated, as an ISO 8601 string.
    pub updated: Option<String>,
    /// The dimension names, in row-major order.
    #[serde(default)]
    pub id: Vec<String>,
    /// The extent of each dimension, parallel to `id`.
    #[serde(default)]
    pub size: Vec<usize>,
    /// The observation values.
    pub value: Option<Values>,
    /// The observation status flags.
    pub status: Option<Statuses>,
    /// The dimension definitions, keyed by name.
    pub dimension: Option<HashMap<String, Dimension>>,
}

impl Dataset {
    /// Parses a dataset from a JSON byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Dataset, DatasetError> {
        serde_json::from_slice(bytes).map_err(DatasetError::from)
    }
}

impl FromStr for Dataset {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(DatasetError::from)
    }
}

/// The observation values of a dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Values {
    /// A row-major array holding one entry per cell; `null` marks a missing value.
    Dense(Vec<Option<f64>>),

    /// An object keyed by the row-major offset of each present cell.
    Sparse(BTreeMap<String, Option<f64>>),
}

/// The observation status flags of a dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Statuses {
    /// One flag shared by every cell.
    Uniform(String),

    /// One flag per cell.
    Dense(Vec<Option<String>>),

    /// Flags keyed by the row-major offset of the flagged cells.
    Sparse(BTreeMap<String, String>),
}

/// A dimension definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dimension {
    /// The dimension name shown to readers.
    pub label: Option<String>,
    /// The members of the dimension.
    #[serde(default)]
    pub category: Category,
}

/// The members of a dimension.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    /// The position of each member; absent for single-member dimensions.
    pub index: Option<CategoryIndex>,
    /// Member code to member name.
    #[serde(default)]
    pub label: BTreeMap<String, String>,
}

/// The position of each member along its dimension.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryIndex {
    /// Member codes listed in position order.
    Ordered(Vec<String>),

    /// Member code to zero-based position.
    Positions(HashMap<String, usize>),
}

impl Category {
    /// Returns the member code to position table.
    ///
    /// JSON-stat allows the index to be omitted for single-member dimensions,
    /// in which case the only labelled code sits at position 0.
    pub(crate) fn positions(&self) -> HashMap<String, usize> {
        match self.index {
            Some(CategoryIndex::Positions(ref positions)) => positions.clone(),
            Some(CategoryIndex::Ordered(ref codes)) => codes
                .iter()
                .enumerate()
                .map(|(position, code)| (code.clone(), position))
                .collect(),
            None if self.label.len() == 1 => self
                .label
                .keys()
                .map(|code| (code.clone(), 0))
                .collect(),
            None => HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sparse_values_and_ordered_index() -> Result<(), DatasetError> {
        let dataset: Dataset = r#"{
            "version": "2.0",
            "class": "dataset",
            "label": "Complete energy balances",
            "id": ["geo", "time"],
            "size": [2, 1],
            "value": { "0": 1.5, "1": null },
            "status": { "1": ":" },
            "dimension": {
                "geo": { "category": { "index": ["DE", "FR"] } },
                "time": { "category": { "index": { "2023": 0 } } }
            }
        }"#
        .parse()?;

        assert_eq!(dataset.label.as_deref(), Some("Complete energy balances"));
        assert!(matches!(dataset.value, Some(Values::Sparse(ref v)) if v.len() == 2));
        assert!(matches!(dataset.status, Some(Statuses::Sparse(_))));

        let dimensions = dataset.dimension.unwrap_or_default();
        let geo = dimensions["geo"].category.positions();
        assert_eq!(geo["DE"], 0);
        assert_eq!(geo["FR"], 1);

        Ok(())
    }

    #[test]
    fn single_label_without_index_sits_at_zero() {
        let category = Category {
            index: None,
            label: BTreeMap::from([(String::from("KTOE"), String::from("Kilotonnes"))]),
        };

        assert_eq!(category.positions()["KTOE"], 0);
    }

    #[test]
    fn missing_members_still_parse() -> Result<(), DatasetError> {
        let dataset = Dataset::from_slice(br#"{ "id": ["geo"], "size": [1] }"#)?;

        assert!(dataset.value.is_none());
        assert!(dataset.dimension.is_none());

        Ok(())
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result = Dataset::from_slice(b"{ not json");

        assert!(matches!(result, Err(DatasetError::Json(_))));
    }
}
