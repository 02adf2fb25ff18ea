//! Narrative slides of the storyteller page.

use eurobal_balance::Record;
use eurobal_balance::Records;
use eurobal_balance::Scope;
use eurobal_balance::codes::country_name;
use eurobal_balance::codes::field;
use eurobal_balance::metrics;
use serde::Serialize;

use crate::dashboard::Panels;
use crate::dashboard::aggregate;

/// One slide of the storyteller.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// The slide heading.
    pub title: String,
    /// The figure the slide is about.
    pub figure: String,
    /// The narrative text.
    pub body: String,
    /// The country the slide features, if any.
    pub country: Option<String>,
}

/// Builds the storyteller slides. A slide is left out when no country has
/// the data it needs.
pub fn slides(panels: &Panels, scope: &Scope) -> Vec<Slide> {
    let mut slides = vec![introduction(panels, scope)];

    slides.extend(most_dependent(&panels.overview));
    slides.extend(most_self_sufficient(&panels.overview));
    slides.extend(most_diverse(&panels.fuel_mix));
    slides.extend(largest_consumer(&panels.overview, scope));
    slides.extend(most_efficient(&panels.transformation));

    slides
}

/// Returns the country with the highest value of `field`. Ties go to the
/// first country in code order.
fn leader<'a>(records: &'a Records, field: &str) -> Option<(&'a str, &'a Record, f64)> {
    records
        .iter()
        .filter_map(|(country, record)| record.get(field).map(|value| (country.as_str(), record, value)))
        .fold(None, |best, candidate| match best {
            Some((_, _, value)) if candidate.2 <= value => best,
            _ => Some(candidate),
        })
}

fn introduction(panels: &Panels, scope: &Scope) -> Slide {
    let total = aggregate(&panels.overview);
    let exporters = panels
        .overview
        .values()
        .filter(|record| metrics::is_net_exporter(record.get(field::SELF_SUFFICIENCY)))
        .count();

    Slide {
        title: format!("Europe's energy balance in {}", scope.year),
        figure: total.display(field::DEPENDENCE),
        body: format!(
            "Across {} selected countries, imports net of exports cover {} of gross inland \
             consumption. {} of them produce at least as much energy as they use.",
            scope.countries.len(),
            total.display(field::DEPENDENCE),
            exporters
        ),
        country: None,
    }
}

fn most_dependent(records: &Records) -> Option<Slide> {
    let (country, record, _) = leader(records, field::DEPENDENCE)?;

    Some(Slide {
        title: String::from("Most import-dependent"),
        figure: record.display(field::DEPENDENCE),
        body: format!(
            "{} relies on net imports for {} of its gross inland consumption.",
            country_name(country),
            record.display(field::DEPENDENCE)
        ),
        country: Some(country.to_owned()),
    })
}

fn most_self_sufficient(records: &Records) -> Option<Slide> {
    let (country, record, ratio) = leader(records, field::SELF_SUFFICIENCY)?;
    let status = if metrics::is_net_exporter(Some(ratio)) {
        "a net energy exporter"
    } else {
        "still short of covering its own needs"
    };

    Some(Slide {
        title: String::from("Most self-sufficient"),
        figure: record.display(field::SELF_SUFFICIENCY),
        body: format!(
            "{} produces {} of the energy it consumes, {status}.",
            country_name(country),
            record.display(field::SELF_SUFFICIENCY)
        ),
        country: Some(country.to_owned()),
    })
}

fn most_diverse(records: &Records) -> Option<Slide> {
    let (country, record, _) = leader(records, field::DIVERSITY)?;

    Some(Slide {
        title: String::from("Most diverse fuel mix"),
        figure: record.display(field::DIVERSITY),
        body: format!(
            "{} spreads its consumption most evenly across fuels, with a diversity \
             score of {} (HHI {}).",
            country_name(country),
            record.display(field::DIVERSITY),
            record.display(field::HHI)
        ),
        country: Some(country.to_owned()),
    })
}

fn largest_consumer(records: &Records, scope: &Scope) -> Option<Slide> {
    let (country, record, _) = leader(records, field::CONSUMPTION)?;

    Some(Slide {
        title: String::from("Largest consumer"),
        figure: format!("{} {}", record.display(field::CONSUMPTION), scope.unit),
        body: format!(
            "{} has the largest gross inland consumption of the selection, {} {}.",
            country_name(country),
            record.display(field::CONSUMPTION),
            scope.unit
        ),
        country: Some(country.to_owned()),
    })
}

fn most_efficient(records: &Records) -> Option<Slide> {
    let (country, record, _) = leader(records, field::EFFICIENCY)?;

    Some(Slide {
        title: String::from("Most efficient power and heat"),
        figure: record.display(field::EFFICIENCY),
        body: format!(
            "{} turns {} of its transformation input into electricity and heat.",
            country_name(country),
            record.display(field::EFFICIENCY)
        ),
        country: Some(country.to_owned()),
    })
}
