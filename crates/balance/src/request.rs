use crate::codes;
use crate::codes::dimension;
use crate::codes::flow;
use crate::codes::siec;
use crate::reshape::Scope;

/// A request for a slice of a Eurostat dataset.
///
/// Filters are repeatable: each `(dimension, code)` pair adds one member to
/// the slice, so several countries are requested by repeating `geo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRequest {
    dataset: String,
    filters: Vec<(String, String)>,
}

impl DatasetRequest {
    pub fn new(dataset: impl Into<String>) -> DatasetRequest {
        Self {
            dataset: dataset.into(),
            filters: Vec::new(),
        }
    }

    /// Adds one member to the slice along `dimension`.
    pub fn filter(mut self, dimension: impl Into<String>, code: impl Into<String>) -> DatasetRequest {
        self.filters.push((dimension.into(), code.into()));
        self
    }

    /// Adds every code to the slice along `dimension`.
    pub fn filter_all<I, S>(self, dimension: &str, codes: I) -> DatasetRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        codes
            .into_iter()
            .fold(self, |request, code| request.filter(dimension, code))
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Returns the filters as query pairs, in insertion order.
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// Production, trade and gross inland consumption totals.
    pub fn energy_overview(scope: &Scope) -> DatasetRequest {
        Self::for_scope(scope)
            .filter_all(
                dimension::NRG_BAL,
                [
                    flow::PRODUCTION,
                    flow::IMPORTS,
                    flow::EXPORTS,
                    flow::GROSS_INLAND_CONSUMPTION,
                ],
            )
            .filter(dimension::SIEC, siec::TOTAL)
    }

    /// Gross inland consumption split by fuel group.
    pub fn fuel_mix(scope: &Scope) -> DatasetRequest {
        Self::for_scope(scope)
            .filter(dimension::NRG_BAL, flow::GROSS_INLAND_CONSUMPTION)
            .filter_all(
                dimension::SIEC,
                codes::FUEL_GROUPS.iter().map(|fuel| fuel.code),
            )
    }

    /// Final energy consumption, in total and by sector.
    pub fn sectors(scope: &Scope) -> DatasetRequest {
        Self::for_scope(scope)
            .filter(dimension::NRG_BAL, flow::FINAL_CONSUMPTION)
            .filter_all(
                dimension::NRG_BAL,
                codes::SECTORS.iter().map(|sector| sector.code),
            )
            .filter(dimension::SIEC, siec::TOTAL)
    }

    /// Electricity and heat generation input and outputs.
    pub fn transformation(scope: &Scope) -> DatasetRequest {
        Self::for_scope(scope)
            .filter_all(
                dimension::NRG_BAL,
                [flow::TRANSFORMATION_INPUT, flow::TRANSFORMATION_OUTPUT],
            )
            .filter_all(
                dimension::SIEC,
                [siec::TOTAL, siec::ELECTRICITY, siec::HEAT],
            )
    }

    /// Every year of one flow for the scope's countries, from `since` onwards.
    pub fn time_series(scope: &Scope, flow: &str, since: Option<i32>) -> DatasetRequest {
        let request = Self::new(codes::DATASET)
            .filter_all(dimension::GEO, scope.countries.iter().map(String::as_str))
            .filter(dimension::NRG_BAL, flow)
            .filter(dimension::SIEC, siec::TOTAL)
            .filter(dimension::UNIT, scope.unit.code());

        match since {
            Some(year) => request.filter("sinceTimePeriod", year.to_string()),
            None => request,
        }
    }

    /// The smallest slice whose `time` dimension lists every published year.
    pub fn available_years() -> DatasetRequest {
        Self::new(codes::DATASET)
            .filter(dimension::GEO, codes::EU_AGGREGATE)
            .filter(dimension::NRG_BAL, flow::GROSS_INLAND_CONSUMPTION)
            .filter(dimension::SIEC, siec::TOTAL)
            .filter(dimension::UNIT, codes::Unit::Ktoe.code())
    }

    fn for_scope(scope: &Scope) -> DatasetRequest {
        Self::new(codes::DATASET)
            .filter_all(dimension::GEO, scope.countries.iter().map(String::as_str))
            .filter(dimension::TIME, scope.year.to_string())
            .filter(dimension::UNIT, scope.unit.code())
    }
}
