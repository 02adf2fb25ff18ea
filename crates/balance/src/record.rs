use std::collections::BTreeMap;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

use crate::format;

/// Per-country records keyed by country code.
pub type Records = BTreeMap<String, Record>;

/// How a record value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// An amount of energy in the dataset unit.
    Quantity,
    /// A percentage.
    Percentage,
    /// A 0-100 score.
    Score,
    /// A 0-1 index.
    Index,
}

/// A raw value together with how it is displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub value: Option<f64>,
    pub kind: Kind,
}

impl Measure {
    pub fn new(value: Option<f64>, kind: Kind) -> Measure {
        Self { value, kind }
    }

    /// Returns the display string, or the no-data placeholder.
    pub fn display(&self) -> String {
        format::display(self.value, self.kind)
    }
}

/// A flat record of named values for one country.
///
/// A record serializes every field twice, as consumed by the dashboard: the
/// display string under the field name and the raw number (or `null`) under
/// the field name suffixed with `Raw`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Measure>,
}

impl Record {
    pub fn new() -> Record {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Option<f64>, kind: Kind) {
        self.fields.insert(field.into(), Measure::new(value, kind));
    }

    pub fn with(mut self, field: impl Into<String>, value: Option<f64>, kind: Kind) -> Record {
        self.insert(field, value, kind);
        self
    }

    /// Returns the raw value of `field`.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(|measure| measure.value)
    }

    pub fn measure(&self, field: &str) -> Option<&Measure> {
        self.fields.get(field)
    }

    /// Returns the display string of `field`; unknown fields show as no data.
    pub fn display(&self, field: &str) -> String {
        self.fields
            .get(field)
            .map_or_else(|| String::from(format::NO_DATA), Measure::display)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Measure)> {
        self.fields.iter().map(|(field, measure)| (field.as_str(), measure))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if no field holds a value.
    pub fn has_no_data(&self) -> bool {
        self.fields.values().all(|measure| measure.value.is_none())
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() * 2))?;

        for (field, measure) in &self.fields {
            map.serialize_entry(field, &measure.display())?;
            map.serialize_entry(&format!("{field}Raw"), &measure.value)?;
        }

        map.end()
    }
}
