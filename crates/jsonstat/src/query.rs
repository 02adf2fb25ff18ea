use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// A point lookup: one member code per dimension name.
///
/// Dimensions the dataset does not declare are ignored by the decoder, and
/// dimensions the query leaves out are handled by the decoder's
/// [`FallbackPolicy`](crate::FallbackPolicy).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    selections: BTreeMap<String, String>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Query {
        Self::default()
    }

    /// Selects `code` along `dimension`, replacing any previous selection.
    pub fn with(mut self, dimension: impl Into<String>, code: impl Into<String>) -> Query {
        self.set(dimension, code);
        self
    }

    /// Selects `code` along `dimension`, replacing any previous selection.
    pub fn set(&mut self, dimension: impl Into<String>, code: impl Into<String>) {
        self.selections.insert(dimension.into(), code.into());
    }

    /// Removes the selection along `dimension`.
    pub fn remove(&mut self, dimension: &str) -> Option<String> {
        self.selections.remove(dimension)
    }

    /// Returns the member code selected along `dimension`.
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.selections.get(dimension).map(String::as_str)
    }

    /// Iterates over the `(dimension, code)` selections in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(dimension, code)| (dimension.as_str(), code.as_str()))
    }

    /// Returns the number of selected dimensions.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Returns `true` if no dimension is selected.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let selections = iter
            .into_iter()
            .map(|(dimension, code)| (dimension.into(), code.into()))
            .collect();

        Self { selections }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(selections: [(K, V); N]) -> Self {
        selections.into_iter().collect()
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (dimension, code)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dimension}={code}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_selection_replaces_earlier() {
        let query = Query::new().with("geo", "DE").with("geo", "FR");

        assert_eq!(query.get("geo"), Some("FR"));
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn display_lists_selections_in_order() {
        let query = Query::from([("time", "2023"), ("geo", "DE")]);

        assert_eq!(query.to_string(), "geo=DE, time=2023");
    }
}
