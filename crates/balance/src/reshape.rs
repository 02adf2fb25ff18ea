//! Reshapes decoded datasets into per-country records.
//!
//! Each function reads the cells of one panel's dataset and assembles a
//! [`Record`] per country. Every code a lookup names (country, year, unit,
//! flow, fuel) is only looked up if the dataset actually lists it; the
//! decoder's fallback policy still applies to dimensions no lookup names.

use eurobal_jsonstat::Decoder;
use eurobal_jsonstat::Query;
use serde::Serialize;

use crate::category;
use crate::codes;
use crate::codes::Unit;
use crate::codes::dimension;
use crate::codes::field;
use crate::codes::flow;
use crate::codes::siec;
use crate::metrics;
use crate::record::Kind;
use crate::record::Record;
use crate::record::Records;

/// The countries, year and unit a panel is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub countries: Vec<String>,
    pub year: i32,
    pub unit: Unit,
}

impl Scope {
    pub fn new(countries: Vec<String>, year: i32, unit: Unit) -> Scope {
        Self {
            countries,
            year,
            unit,
        }
    }
}

/// One year of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub year: i32,
    pub value: Option<f64>,
}

/// Production, imports, exports and consumption, with the derived dependency
/// and self-sufficiency ratios.
pub fn energy_overview(decoder: &Decoder, scope: &Scope) -> Records {
    records(decoder, scope, |cells| {
        let total = |code| cells.value(flow_query(code, siec::TOTAL));

        let mut record = Record::new()
            .with(field::PRODUCTION, total(flow::PRODUCTION), Kind::Quantity)
            .with(field::IMPORTS, total(flow::IMPORTS), Kind::Quantity)
            .with(field::EXPORTS, total(flow::EXPORTS), Kind::Quantity)
            .with(
                field::CONSUMPTION,
                total(flow::GROSS_INLAND_CONSUMPTION),
                Kind::Quantity,
            );

        category::derive(&mut record, &category::ENERGY_OVERVIEW);
        record
    })
}

/// Gross inland consumption by fuel group, with shares, the HHI concentration
/// index and the diversity score.
pub fn fuel_mix(decoder: &Decoder, scope: &Scope) -> Records {
    records(decoder, scope, |cells| {
        let values: Vec<Option<f64>> = codes::FUEL_GROUPS
            .iter()
            .map(|fuel| cells.value(flow_query(flow::GROSS_INLAND_CONSUMPTION, fuel.code)))
            .collect();

        let present: Vec<f64> = values.iter().map(|v| v.unwrap_or(0.0)).collect();
        let shares = metrics::shares(&present);

        let mut record = Record::new();
        for (i, (fuel, value)) in codes::FUEL_GROUPS.iter().zip(&values).enumerate() {
            let share = shares
                .as_ref()
                .filter(|_| value.is_some())
                .map(|shares| shares[i] * 100.0);

            record.insert(fuel.field, *value, Kind::Quantity);
            record.insert(field::share(fuel.field), share, Kind::Percentage);
        }

        let total = values.iter().any(Option::is_some).then(|| present.iter().sum());
        record.insert(field::TOTAL, total, Kind::Quantity);
        record.insert(field::HHI, metrics::herfindahl(&present), Kind::Index);
        record.insert(field::DIVERSITY, metrics::diversity_score(&present), Kind::Score);
        record
    })
}

/// Final energy consumption by sector, with each sector's share of the total.
pub fn sector_consumption(decoder: &Decoder, scope: &Scope) -> Records {
    records(decoder, scope, |cells| {
        let values: Vec<Option<f64>> = codes::SECTORS
            .iter()
            .map(|sector| cells.value(flow_query(sector.code, siec::TOTAL)))
            .collect();

        let sum = values.iter().any(Option::is_some).then(|| values.iter().flatten().sum());
        let total = cells
            .value(flow_query(flow::FINAL_CONSUMPTION, siec::TOTAL))
            .or(sum);

        let mut record = Record::new();
        for (sector, value) in codes::SECTORS.iter().zip(values) {
            record.insert(sector.field, value, Kind::Quantity);
            record.insert(
                field::share(sector.field),
                metrics::percentage(value, total),
                Kind::Percentage,
            );
        }

        record.insert(field::TOTAL, total, Kind::Quantity);
        record
    })
}

/// Electricity and heat generation input, outputs, efficiency and losses.
pub fn transformation_balance(decoder: &Decoder, scope: &Scope) -> Records {
    records(decoder, scope, |cells| {
        let mut record = Record::new()
            .with(
                field::INPUT,
                cells.value(flow_query(flow::TRANSFORMATION_INPUT, siec::TOTAL)),
                Kind::Quantity,
            )
            .with(
                field::ELECTRICITY,
                cells.value(flow_query(flow::TRANSFORMATION_OUTPUT, siec::ELECTRICITY)),
                Kind::Quantity,
            )
            .with(
                field::HEAT,
                cells.value(flow_query(flow::TRANSFORMATION_OUTPUT, siec::HEAT)),
                Kind::Quantity,
            );

        category::derive(&mut record, &category::TRANSFORMATION);
        record
    })
}

/// Every published year of `flow` for one country, oldest first.
pub fn time_series(decoder: &Decoder, country: &str, flow: &str, unit: Unit) -> Vec<Point> {
    let cells = Cells::new(decoder);

    available_years(decoder)
        .into_iter()
        .map(|year| {
            let query = flow_query(flow, siec::TOTAL)
                .with(dimension::GEO, country)
                .with(dimension::TIME, year.to_string())
                .with(dimension::UNIT, unit.code());

            Point {
                year,
                value: cells.value(query),
            }
        })
        .collect()
}

/// Returns the years listed by the dataset's `time` dimension, ascending.
pub fn available_years(decoder: &Decoder) -> Vec<i32> {
    let mut years: Vec<i32> = decoder
        .codes(dimension::TIME)
        .unwrap_or_default()
        .iter()
        .filter_map(|code| code.parse().ok())
        .collect();

    years.sort_unstable();
    years.dedup();
    years
}

fn records<F>(decoder: &Decoder, scope: &Scope, build: F) -> Records
where
    F: Fn(&Cells<'_>) -> Record,
{
    scope
        .countries
        .iter()
        .map(|country| {
            let cells = Cells::new(decoder).scoped(country, scope);
            (country.clone(), build(&cells))
        })
        .collect()
}

fn flow_query(flow: &str, product: &str) -> Query {
    Query::new()
        .with(dimension::NRG_BAL, flow)
        .with(dimension::SIEC, product)
}

/// Cell lookups for one country, year and unit.
struct Cells<'a> {
    decoder: &'a Decoder,
    base: Query,
}

impl<'a> Cells<'a> {
    fn new(decoder: &'a Decoder) -> Cells<'a> {
        Self {
            decoder,
            base: Query::new(),
        }
    }

    fn scoped(mut self, country: &str, scope: &Scope) -> Cells<'a> {
        self.base.set(dimension::GEO, country);
        self.base.set(dimension::TIME, scope.year.to_string());
        self.base.set(dimension::UNIT, scope.unit.code());
        self
    }

    // A country, year, unit, flow or product the dataset does not list is
    // missing data, whatever the fallback policy says.
    fn value(&self, mut query: Query) -> Option<f64> {
        for (name, code) in self.base.iter() {
            if query.get(name).is_none() {
                query.set(name, code);
            }
        }

        if query.iter().all(|(name, code)| self.lists(name, code)) {
            self.decoder.resolve(&query)
        } else {
            None
        }
    }

    fn lists(&self, name: &str, code: &str) -> bool {
        self.decoder
            .codes(name)
            .is_none_or(|codes| codes.iter().any(|c| c == code))
    }
}

#[cfg(test)]
mod tests {
    use eurobal_jsonstat::Dataset;
    use eurobal_jsonstat::FallbackPolicy;
    use serde_json::json;

    use super::*;

    fn decoder(payload: serde_json::Value) -> Decoder {
        let dataset: Dataset = serde_json::from_value(payload).expect("valid dataset JSON");
        Decoder::new(dataset, FallbackPolicy::FirstMember)
    }

    fn scope(countries: &[&str], year: i32) -> Scope {
        Scope::new(
            countries.iter().map(|c| String::from(*c)).collect(),
            year,
            Unit::Ktoe,
        )
    }

    #[test]
    fn production_and_imports_end_to_end() {
        let decoder = decoder(json!({
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
        }));

        let records = energy_overview(&decoder, &scope(&["DE"], 2023));
        let de = &records["DE"];

        assert_eq!(de.get(field::PRODUCTION), Some(500.0));
        assert_eq!(de.get(field::IMPORTS), Some(300.0));
        assert_eq!(de.get(field::EXPORTS), None);
        assert_eq!(de.get(field::NET_IMPORTS), Some(300.0));
        assert_eq!(de.get(field::DEPENDENCE), None);
        assert_eq!(de.display(field::DEPENDENCE), "—");
    }

    #[test]
    fn overview_for_several_countries() {
        // geo x nrg_bal, PPRD IMP EXP GIC
        let decoder = decoder(json!({
            "id": ["geo", "nrg_bal", "siec", "time", "unit"],
            "size": [2, 4, 1, 1, 1],
            "value": [
                400.0, 700.0, 100.0, 1000.0,
                1200.0, 50.0, 250.0, 1000.0
            ],
            "dimension": {
                "geo": { "category": { "index": ["DE", "NO"] } },
                "nrg_bal": { "category": { "index": ["PPRD", "IMP", "EXP", "GIC"] } },
                "siec": { "category": { "index": ["TOTAL"] } },
                "time": { "category": { "index": ["2023"] } },
                "unit": { "category": { "index": ["KTOE"] } }
            }
        }));

        let records = energy_overview(&decoder, &scope(&["DE", "NO"], 2023));

        assert_eq!(records["DE"].get(field::DEPENDENCE), Some(60.0));
        assert_eq!(records["DE"].get(field::SELF_SUFFICIENCY), Some(40.0));
        assert_eq!(records["NO"].get(field::DEPENDENCE), Some(-20.0));
        assert_eq!(records["NO"].get(field::SELF_SUFFICIENCY), Some(120.0));
    }

    #[test]
    fn country_year_and_unit_absent_from_the_dataset_have_no_data() {
        let decoder = decoder(json!({
            "id": ["geo", "time", "nrg_bal", "siec", "unit"],
            "size": [1, 2, 2, 1, 1],
            "value": [500.0, 300.0, 520.0, 310.0],
            "dimension": {
                "geo": { "category": { "index": ["DE"] } },
                "time": { "category": { "index": ["2021", "2022"] } },
                "nrg_bal": { "category": { "index": ["PPRD", "IMP"] } },
                "siec": { "category": { "index": ["TOTAL"] } },
                "unit": { "category": { "index": ["KTOE"] } }
            }
        }));

        let records = energy_overview(&decoder, &scope(&["DE", "FR"], 2023));
        assert!(records["DE"].has_no_data());
        assert!(records["FR"].has_no_data());

        let records = energy_overview(&decoder, &scope(&["DE", "FR"], 2022));
        assert_eq!(records["DE"].get(field::PRODUCTION), Some(520.0));
        assert!(records["FR"].has_no_data());

        let gwh = Scope::new(vec![String::from("DE")], 2022, Unit::Gwh);
        assert!(energy_overview(&decoder, &gwh)["DE"].has_no_data());

        assert!(time_series(&decoder, "FR", flow::IMPORTS, Unit::Ktoe)
            .iter()
            .all(|point| point.value.is_none()));
        assert!(time_series(&decoder, "DE", flow::IMPORTS, Unit::Gwh)
            .iter()
            .all(|point| point.value.is_none()));
    }

    #[test]
    fn malformed_dataset_yields_empty_records() {
        let decoder = decoder(json!({ "id": ["geo"], "size": [1] }));
        let records = energy_overview(&decoder, &scope(&["DE", "FR"], 2023));

        assert_eq!(records.len(), 2);
        assert!(records.values().all(Record::has_no_data));
    }

    #[test]
    fn fuel_mix_shares_and_diversity() {
        let decoder = decoder(json!({
            "id": ["geo", "time", "nrg_bal", "siec", "unit"],
            "size": [1, 1, 1, 2, 1],
            "value": [300.0, 100.0],
            "dimension": {
                "geo": { "category": { "index": ["FR"] } },
                "time": { "category": { "index": ["2022"] } },
                "nrg_bal": { "category": { "index": ["GIC"] } },
                "siec": { "category": { "index": ["G3000", "N900H"] } },
                "unit": { "category": { "index": ["KTOE"] } }
            }
        }));

        let records = fuel_mix(&decoder, &scope(&["FR"], 2022));
        let fr = &records["FR"];

        assert_eq!(fr.get("gas"), Some(300.0));
        assert_eq!(fr.get("nuclear"), Some(100.0));
        assert_eq!(fr.get("oil"), None);
        assert_eq!(fr.get("gasShare"), Some(75.0));
        assert_eq!(fr.get("oilShare"), None);
        assert_eq!(fr.display("oilShare"), "—");
        assert_eq!(fr.get(field::TOTAL), Some(400.0));
        assert_eq!(fr.get(field::HHI), Some(0.625));
        assert_eq!(fr.get(field::DIVERSITY), Some(37.5));
    }

    #[test]
    fn sector_shares_fall_back_to_sum_of_sectors() {
        let decoder = decoder(json!({
            "id": ["geo", "time", "nrg_bal", "siec", "unit"],
            "size": [1, 1, 2, 1, 1],
            "value": [600.0, 400.0],
            "dimension": {
                "geo": { "category": { "index": ["IT"] } },
                "time": { "category": { "index": ["2023"] } },
                "nrg_bal": { "category": { "index": ["FC_IND_E", "FC_TRA_E"] } },
                "siec": { "category": { "index": ["TOTAL"] } },
                "unit": { "category": { "index": ["KTOE"] } }
            }
        }));

        let records = sector_consumption(&decoder, &scope(&["IT"], 2023));
        let it = &records["IT"];

        let close = |field: &str, expected: f64| {
            it.get(field).is_some_and(|v| (v - expected).abs() < 1e-9)
        };

        assert_eq!(it.get(field::TOTAL), Some(1000.0));
        assert!(close("industryShare", 60.0));
        assert!(close("transportShare", 40.0));
        assert_eq!(it.get("households"), None);
        assert_eq!(it.get("householdsShare"), None);
    }

    #[test]
    fn transformation_efficiency() {
        let decoder = decoder(json!({
            "id": ["geo", "time", "nrg_bal", "siec", "unit"],
            "size": [1, 1, 2, 3, 1],
            "value": [1000.0, null, null, null, 380.0, 70.0],
            "dimension": {
                "geo": { "category": { "index": ["PL"] } },
                "time": { "category": { "index": ["2023"] } },
                "nrg_bal": { "category": { "index": ["TI_EHG_E", "TO_EHG"] } },
                "siec": { "category": { "index": ["TOTAL", "E7000", "H8000"] } },
                "unit": { "category": { "index": ["KTOE"] } }
            }
        }));

        let records = transformation_balance(&decoder, &scope(&["PL"], 2023));
        let pl = &records["PL"];

        assert_eq!(pl.get(field::INPUT), Some(1000.0));
        assert_eq!(pl.get(field::EFFICIENCY), Some(45.0));
        assert_eq!(pl.get(field::LOSSES), Some(550.0));
    }

    #[test]
    fn time_series_follows_time_codes() {
        let decoder = decoder(json!({
            "id": ["geo", "nrg_bal", "siec", "unit", "time"],
            "size": [1, 1, 1, 1, 3],
            "value": { "0": 10.0, "2": 30.0 },
            "dimension": {
                "geo": { "category": { "index": ["SE"] } },
                "nrg_bal": { "category": { "index": ["IMP"] } },
                "siec": { "category": { "index": ["TOTAL"] } },
                "unit": { "category": { "index": ["KTOE"] } },
                "time": { "category": { "index": ["2021", "2022", "2023"] } }
            }
        }));

        let series = time_series(&decoder, "SE", flow::IMPORTS, Unit::Ktoe);

        assert_eq!(
            series,
            vec![
                Point { year: 2021, value: Some(10.0) },
                Point { year: 2022, value: None },
                Point { year: 2023, value: Some(30.0) },
            ]
        );
    }

    #[test]
    fn available_years_are_sorted() {
        let decoder = decoder(json!({
            "id": ["time"],
            "size": [3],
            "value": [1.0, 2.0, 3.0],
            "dimension": {
                "time": { "category": { "index": { "2023": 0, "1990": 1, "2001": 2 } } }
            }
        }));

        assert_eq!(available_years(&decoder), vec![1990, 2001, 2023]);
    }
}
