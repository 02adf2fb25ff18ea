//! Fetch routines of the dashboard panels.
//!
//! Each routine builds the panel's request, fetches it from a
//! [`DatasetSource`], decodes the payload and reshapes it into records. A
//! failed fetch is logged and yields an empty result, so one unreachable
//! panel never takes the others down.

pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod file;

use std::collections::BTreeMap;

use eurobal_balance::DatasetRequest;
use eurobal_balance::Records;
use eurobal_balance::Scope;
use eurobal_balance::YearsCache;
use eurobal_balance::reshape;
use eurobal_balance::reshape::Point;
use eurobal_jsonstat::Decoder;
use eurobal_jsonstat::FallbackPolicy;
use tracing::debug;
use tracing::error;

use crate::fetch::error::FetchError;
use crate::fetch::error::Result;
use crate::panel::AbortHandle;

/// Where the raw JSON-stat payloads come from.
pub(crate) trait DatasetSource {
    fn fetch(&self, request: &DatasetRequest) -> Result<Vec<u8>>;
}

impl<S: DatasetSource + ?Sized> DatasetSource for &S {
    fn fetch(&self, request: &DatasetRequest) -> Result<Vec<u8>> {
        (**self).fetch(request)
    }
}

/// A source whose requests stop once its abort handle is triggered.
///
/// The handle is checked before a request is issued and again after it
/// completes, so the payload of an aborted request is never decoded.
pub(crate) struct Abortable<'a, S> {
    source: S,
    abort: &'a AbortHandle,
}

impl<'a, S: DatasetSource> Abortable<'a, S> {
    pub fn new(source: S, abort: &'a AbortHandle) -> Self {
        Self { source, abort }
    }
}

impl<S: DatasetSource> DatasetSource for Abortable<'_, S> {
    fn fetch(&self, request: &DatasetRequest) -> Result<Vec<u8>> {
        if self.abort.is_aborted() {
            return Err(FetchError::Aborted);
        }

        let bytes = self.source.fetch(request)?;

        if self.abort.is_aborted() {
            return Err(FetchError::Aborted);
        }

        Ok(bytes)
    }
}

/// Fetches and decodes the dataset slice `request` asks for.
pub(crate) fn decode<S>(source: &S, request: &DatasetRequest, policy: &FallbackPolicy) -> Result<Decoder>
where
    S: DatasetSource + ?Sized,
{
    let bytes = source.fetch(request)?;
    Ok(Decoder::from_slice(&bytes, policy.clone()))
}

/// Production, trade and consumption of the scope's countries.
pub(crate) fn fetch_energy_data<S>(source: &S, scope: &Scope, policy: &FallbackPolicy) -> Records
where
    S: DatasetSource + ?Sized,
{
    panel_records("energy overview", source, &DatasetRequest::energy_overview(scope), policy, |decoder| {
        reshape::energy_overview(decoder, scope)
    })
}

/// The fuel mix of the scope's countries.
pub(crate) fn fetch_fuel_mix<S>(source: &S, scope: &Scope, policy: &FallbackPolicy) -> Records
where
    S: DatasetSource + ?Sized,
{
    panel_records("fuel mix", source, &DatasetRequest::fuel_mix(scope), policy, |decoder| {
        reshape::fuel_mix(decoder, scope)
    })
}

/// Final consumption by sector of the scope's countries.
pub(crate) fn fetch_sector_data<S>(source: &S, scope: &Scope, policy: &FallbackPolicy) -> Records
where
    S: DatasetSource + ?Sized,
{
    panel_records("sector consumption", source, &DatasetRequest::sectors(scope), policy, |decoder| {
        reshape::sector_consumption(decoder, scope)
    })
}

/// Electricity and heat generation of the scope's countries.
pub(crate) fn fetch_transformation<S>(source: &S, scope: &Scope, policy: &FallbackPolicy) -> Records
where
    S: DatasetSource + ?Sized,
{
    panel_records("transformation", source, &DatasetRequest::transformation(scope), policy, |decoder| {
        reshape::transformation_balance(decoder, scope)
    })
}

/// Every year of `flow` since `since` for each of the scope's countries.
pub(crate) fn fetch_time_series<S>(
    source: &S,
    scope: &Scope,
    flow: &str,
    since: Option<i32>,
    policy: &FallbackPolicy,
) -> BTreeMap<String, Vec<Point>>
where
    S: DatasetSource + ?Sized,
{
    let request = DatasetRequest::time_series(scope, flow, since);

    match decode(source, &request, policy) {
        Ok(decoder) => scope
            .countries
            .iter()
            .map(|country| {
                let points = reshape::time_series(&decoder, country, flow, scope.unit);
                (country.clone(), points)
            })
            .collect(),
        Err(e) => {
            report("time series", &e);
            BTreeMap::new()
        }
    }
}

/// The years the balance dataset is published for, ascending.
///
/// The years are fetched once and then served from `cache`. A failed fetch
/// is not cached.
pub(crate) fn fetch_available_years<S>(source: &S, cache: &YearsCache) -> Vec<i32>
where
    S: DatasetSource + ?Sized,
{
    let years = cache.get_or_try_init(|| {
        let decoder = decode(source, &DatasetRequest::available_years(), &FallbackPolicy::FirstMember)?;
        Ok::<_, FetchError>(reshape::available_years(&decoder))
    });

    match years {
        Ok(years) => years.to_vec(),
        Err(e) => {
            report("available years", &e);
            Vec::new()
        }
    }
}

fn panel_records<S, F>(
    panel: &str,
    source: &S,
    request: &DatasetRequest,
    policy: &FallbackPolicy,
    reshape: F,
) -> Records
where
    S: DatasetSource + ?Sized,
    F: FnOnce(&Decoder) -> Records,
{
    match decode(source, request, policy) {
        Ok(decoder) => reshape(&decoder),
        Err(e) => {
            report(panel, &e);
            Records::new()
        }
    }
}

fn report(panel: &str, error: &FetchError) {
    match error {
        FetchError::Aborted => debug!(panel, "fetch aborted"),
        error => error!(panel, %error, "fetch failed"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use eurobal_balance::Unit;
    use eurobal_balance::codes::field;
    use eurobal_balance::codes::flow;
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    /// Serves canned payloads keyed by the first `nrg_bal` filter of a
    /// request, or by the dataset code when there is none.
    #[derive(Default)]
    pub(crate) struct StubSource {
        payloads: HashMap<String, Vec<u8>>,
        pub(crate) calls: std::sync::atomic::AtomicUsize,
    }

    impl StubSource {
        pub(crate) fn with(mut self, key: &str, payload: serde_json::Value) -> Self {
            self.payloads.insert(key.to_owned(), payload.to_string().into_bytes());
            self
        }

        fn key(request: &DatasetRequest) -> &str {
            request
                .filters()
                .iter()
                .find(|(dimension, _)| dimension == "nrg_bal")
                .map_or(request.dataset(), |(_, code)| code.as_str())
        }
    }

    impl DatasetSource for StubSource {
        fn fetch(&self, request: &DatasetRequest) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

            self.payloads
                .get(Self::key(request))
                .cloned()
                .ok_or_else(|| FetchError::Response {
                    status_code: StatusCode::NOT_FOUND,
                    message: String::from("no such dataset"),
                })
        }
    }

    pub(crate) fn overview_payload() -> serde_json::Value {
        json!({
            "version": "2.0",
            "class": "dataset",
            "id": ["geo", "time", "nrg_bal", "siec", "unit"],
            "size": [1, 1, 2, 1, 1],
            "value": [500, 300],
            "dimension": {
                "geo": { "category": { "index": { "DE": 0 } } },
                "time": { "category": { "index": { "2023": 0 } } },
                "nrg_bal": { "category": { "index": { "PPRD": 0, "IMP": 1 } } },
                "siec": { "category": { "index": { "TOTAL": 0 } } },
                "unit": { "category": { "index": { "KTOE": 0 } } }
            }
        })
    }

    pub(crate) fn years_payload() -> serde_json::Value {
        json!({
            "id": ["geo", "time"],
            "size": [1, 3],
            "value": [1, 2, 3],
            "dimension": {
                "geo": { "category": { "index": ["EU27_2020"] } },
                "time": { "category": { "index": ["2021", "2023", "2022"] } }
            }
        })
    }

    pub(crate) fn scope() -> Scope {
        Scope::new(vec![String::from("DE")], 2023, Unit::Ktoe)
    }

    #[test]
    fn energy_data_is_decoded_and_reshaped() {
        let source = StubSource::default().with(flow::PRODUCTION, overview_payload());

        let records = fetch_energy_data(&source, &scope(), &FallbackPolicy::default());
        let germany = &records["DE"];

        assert_eq!(germany.get(field::PRODUCTION), Some(500.0));
        assert_eq!(germany.get(field::IMPORTS), Some(300.0));
        assert_eq!(germany.get(field::EXPORTS), None);
        assert_eq!(germany.get(field::NET_IMPORTS), Some(300.0));
    }

    #[test]
    fn failed_fetch_yields_no_records() {
        let source = StubSource::default();

        assert!(fetch_fuel_mix(&source, &scope(), &FallbackPolicy::default()).is_empty());
        assert!(fetch_time_series(&source, &scope(), flow::IMPORTS, None, &FallbackPolicy::default()).is_empty());
    }

    #[test]
    fn malformed_payload_yields_records_without_data() {
        let source = StubSource::default().with(flow::PRODUCTION, json!({ "id": ["geo"], "size": [1] }));

        let records = fetch_energy_data(&source, &scope(), &FallbackPolicy::default());

        assert!(records["DE"].get(field::PRODUCTION).is_none());
        assert!(records["DE"].get(field::DEPENDENCE).is_none());
    }

    #[test]
    fn available_years_are_fetched_once() {
        let source = StubSource::default().with(flow::GROSS_INLAND_CONSUMPTION, years_payload());
        let cache = YearsCache::new();

        assert_eq!(fetch_available_years(&source, &cache), vec![2021, 2022, 2023]);
        assert_eq!(fetch_available_years(&source, &cache), vec![2021, 2022, 2023]);
        assert_eq!(source.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_years_fetch_is_retried() {
        let source = StubSource::default();
        let cache = YearsCache::new();

        assert!(fetch_available_years(&source, &cache).is_empty());
        assert!(fetch_available_years(&source, &cache).is_empty());
        assert_eq!(source.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn aborted_source_issues_no_request() {
        let source = StubSource::default().with(flow::PRODUCTION, overview_payload());
        let abort = AbortHandle::new();
        abort.abort();

        let aborted = Abortable::new(&source, &abort);
        let records = fetch_energy_data(&aborted, &scope(), &FallbackPolicy::default());

        assert!(records.is_empty());
        assert_eq!(source.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn abort_during_a_request_discards_the_payload() {
        struct AbortingSource<'a> {
            abort: &'a AbortHandle,
            fetched: Cell<bool>,
        }

        impl DatasetSource for AbortingSource<'_> {
            fn fetch(&self, _: &DatasetRequest) -> Result<Vec<u8>> {
                self.abort.abort();
                self.fetched.set(true);
                Ok(overview_payload().to_string().into_bytes())
            }
        }

        let abort = AbortHandle::new();
        let inner = AbortingSource {
            abort: &abort,
            fetched: Cell::new(false),
        };

        let result = decode(&Abortable::new(&inner, &abort), &DatasetRequest::new("nrg_bal_c"), &FallbackPolicy::default());

        assert!(inner.fetched.get());
        assert!(matches!(result, Err(FetchError::Aborted)));
    }
}
