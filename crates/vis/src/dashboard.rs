//! The dashboard model and its builders.

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use eurobal_balance::Kind;
use eurobal_balance::Measure;
use eurobal_balance::Record;
use eurobal_balance::Records;
use eurobal_balance::Scope;
use eurobal_balance::category;
use eurobal_balance::codes;
use eurobal_balance::codes::country_name;
use eurobal_balance::codes::field;
use eurobal_balance::metrics;
use eurobal_balance::reshape::Point;
use serde::Serialize;

use crate::chart::Chart;
use crate::chart::ChartKind;
use crate::chart::Series;
use crate::story;
use crate::story::Slide;

/// The records of every panel, as fetched for one selection.
#[derive(Debug, Clone, Default)]
pub struct Panels {
    /// Production, trade and consumption per country.
    pub overview: Records,
    /// Gross inland consumption by fuel group per country.
    pub fuel_mix: Records,
    /// Final consumption by sector per country.
    pub sectors: Records,
    /// Electricity and heat generation per country.
    pub transformation: Records,
    /// Yearly imports per country.
    pub trends: BTreeMap<String, Vec<Point>>,
}

/// A headline figure shown above the charts.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    /// What the figure measures.
    pub label: String,
    /// The display value, or the no-data marker.
    pub value: String,
    /// The unit or basis of the figure.
    pub caption: String,
}

/// Everything rendered into the dashboard and storyteller pages.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// The page title.
    pub title: String,
    /// A summary of the selection.
    pub subtitle: String,
    /// A link that reopens the same selection.
    pub link: Option<String>,
    /// When the dashboard was built.
    pub generated: DateTime<Utc>,
    /// The headline figures.
    pub kpis: Vec<Kpi>,
    /// The storyteller slides.
    pub slides: Vec<Slide>,
    /// Messages about panels that could not be filled.
    pub notices: Vec<String>,
    pub(crate) charts: Vec<Chart>,
}

impl Dashboard {
    /// Builds the dashboard of `scope` from the fetched panels.
    pub fn build(scope: &Scope, panels: &Panels) -> Dashboard {
        let countries: Vec<&str> = scope.countries.iter().map(|code| country_name(code)).collect();

        let mut charts = vec![
            overview_chart(&panels.overview, scope),
            dependency_chart(&panels.overview),
        ];
        charts.extend(fuel_mix_charts(&panels.fuel_mix, scope));
        charts.push(diversity_chart(&panels.fuel_mix));
        charts.push(sector_chart(&panels.sectors));
        charts.push(transformation_chart(&panels.transformation, scope));
        charts.push(trend_chart(&panels.trends, scope));

        let mut notices = Vec::new();
        for (name, records) in [
            ("energy overview", &panels.overview),
            ("fuel mix", &panels.fuel_mix),
            ("sector consumption", &panels.sectors),
            ("transformation", &panels.transformation),
        ] {
            if records.values().all(Record::has_no_data) {
                notices.push(format!("No {name} data is available for this selection."));
            }
        }

        Dashboard {
            title: format!("EU energy balance {}", scope.year),
            subtitle: format!("{} ({})", countries.join(", "), scope.unit),
            link: None,
            generated: Utc::now(),
            kpis: kpis(panels, scope),
            slides: story::slides(panels, scope),
            notices,
            charts,
        }
    }

    /// Sets the link that reopens this selection.
    pub fn with_link(mut self, link: impl Into<String>) -> Dashboard {
        self.link = Some(link.into());
        self
    }

    /// Adds a message shown above the charts.
    pub fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    /// Returns the titles of the dashboard charts, in page order.
    pub fn chart_titles(&self) -> impl Iterator<Item = &str> {
        self.charts.iter().map(|chart| chart.title.as_str())
    }
}

/// Sums the overview of every country into one record.
///
/// Each ratio is derived only from the countries that report every input it
/// needs, so a country missing its consumption never inflates the selection's
/// dependency.
pub fn aggregate(records: &Records) -> Record {
    let mut total = Record::new();

    for name in [field::PRODUCTION, field::IMPORTS, field::EXPORTS, field::CONSUMPTION] {
        total.insert(name, sum(records, &[name], name), Kind::Quantity);
    }

    let net_imports: Vec<f64> = records
        .values()
        .filter_map(|record| metrics::net_imports(record.get(field::IMPORTS), record.get(field::EXPORTS)))
        .collect();
    let net_imports = (!net_imports.is_empty()).then(|| net_imports.iter().sum());
    total.insert(field::NET_IMPORTS, net_imports, Kind::Quantity);

    let dependency_inputs = [field::IMPORTS, field::CONSUMPTION];
    let dependence = metrics::energy_dependency(
        sum(records, &dependency_inputs, field::IMPORTS),
        sum(records, &dependency_inputs, field::EXPORTS),
        sum(records, &dependency_inputs, field::CONSUMPTION),
    );
    total.insert(field::DEPENDENCE, dependence, Kind::Percentage);

    let sufficiency_inputs = [field::PRODUCTION, field::CONSUMPTION];
    let self_sufficiency = metrics::self_sufficiency(
        sum(records, &sufficiency_inputs, field::PRODUCTION),
        sum(records, &sufficiency_inputs, field::CONSUMPTION),
    );
    total.insert(field::SELF_SUFFICIENCY, self_sufficiency, Kind::Percentage);

    total
}

fn complete<'a>(records: &'a Records, inputs: &'a [&str]) -> impl Iterator<Item = &'a Record> {
    records
        .values()
        .filter(move |record| inputs.iter().all(|name| record.get(name).is_some()))
}

// Missing values of `name` count as zero among the complete records.
fn sum(records: &Records, inputs: &[&str], name: &str) -> Option<f64> {
    let mut reporting = complete(records, inputs).peekable();
    reporting.peek()?;

    Some(reporting.filter_map(|record| record.get(name)).sum())
}

fn kpis(panels: &Panels, scope: &Scope) -> Vec<Kpi> {
    let total = aggregate(&panels.overview);
    let unit = scope.unit.to_string();
    let basis = format!("{} countries, {}", scope.countries.len(), scope.year);

    let diversity: Vec<f64> = panels
        .fuel_mix
        .values()
        .filter_map(|record| record.get(field::DIVERSITY))
        .collect();
    let mean_diversity = (!diversity.is_empty())
        .then(|| diversity.iter().sum::<f64>() / diversity.len() as f64);

    let kpi = |label: &str, measure: Measure, caption: &str| Kpi {
        label: label.to_owned(),
        value: measure.display(),
        caption: caption.to_owned(),
    };

    let mut cards: Vec<Kpi> = category::ENERGY_OVERVIEW
        .iter()
        .filter(|category| {
            [
                field::CONSUMPTION,
                field::NET_IMPORTS,
                field::DEPENDENCE,
                field::SELF_SUFFICIENCY,
            ]
            .contains(&category.name())
        })
        .map(|category| {
            let caption = match category.kind() {
                Kind::Quantity => unit.as_str(),
                _ => basis.as_str(),
            };
            kpi(category.label(), category.measure(&total), caption)
        })
        .collect();

    cards.push(kpi(
        "Fuel diversity",
        Measure::new(mean_diversity, Kind::Score),
        "average score, 0-100",
    ));

    cards
}

fn country_series<F>(name: &str, records: &Records, value: F) -> Series
where
    F: Fn(&Record) -> Option<f64>,
{
    records
        .iter()
        .fold(Series::new(name), |series, (country, record)| {
            series.point(country.as_str(), value(record))
        })
}

fn overview_chart(records: &Records, scope: &Scope) -> Chart {
    [
        (field::PRODUCTION, "Primary production"),
        (field::IMPORTS, "Imports"),
        (field::EXPORTS, "Exports"),
    ]
    .into_iter()
    .fold(
        Chart::new(ChartKind::Bar, "Production and trade")
            .describe("Primary production, imports and exports by country.")
            .y_title(scope.unit.to_string()),
        |chart, (name, label)| chart.add(country_series(label, records, |record| record.get(name))),
    )
}

fn dependency_chart(records: &Records) -> Chart {
    let mut series = Series::new("Countries");
    let mut labels = Vec::new();

    for (country, record) in records {
        if let Some(self_sufficiency) = record.get(field::SELF_SUFFICIENCY) {
            series.push(self_sufficiency, record.get(field::DEPENDENCE));
            labels.push(country.clone());
        }
    }

    Chart::new(ChartKind::Scatter, "Self-sufficiency and import dependency")
        .describe("Countries above 100% self-sufficiency are net exporters.")
        .x_title("Self-sufficiency (%)")
        .y_title("Energy dependency (%)")
        .add(series.labels(labels))
}

fn fuel_mix_charts<'a>(records: &'a Records, scope: &'a Scope) -> impl Iterator<Item = Chart> + 'a {
    records.iter().map(move |(country, record)| {
        let series = codes::FUEL_GROUPS
            .iter()
            .fold(Series::new(country_name(country)), |series, fuel| {
                series.point(fuel.label, record.get(fuel.field))
            });

        Chart::new(ChartKind::Pie, format!("Fuel mix, {}", country_name(country)))
            .describe(format!(
                "Gross inland consumption by fuel group, {} {}. Diversity score {}.",
                scope.year,
                scope.unit,
                record.display(field::DIVERSITY)
            ))
            .add(series)
    })
}

fn diversity_chart(records: &Records) -> Chart {
    Chart::new(ChartKind::Bar, "Fuel diversity")
        .describe("One minus the Herfindahl-Hirschman index of the fuel mix, scaled to 0-100.")
        .y_title("Diversity score")
        .add(country_series("Diversity", records, |record| record.get(field::DIVERSITY)))
}

fn sector_chart(records: &Records) -> Chart {
    codes::SECTORS.iter().fold(
        Chart::new(ChartKind::Bar, "Final consumption by sector")
            .describe("Share of each sector in final energy consumption.")
            .y_title("Share (%)")
            .stacked(),
        |chart, sector| {
            let share = field::share(sector.field);
            chart.add(country_series(sector.label, records, |record| record.get(&share)))
        },
    )
}

fn transformation_chart(records: &Records, scope: &Scope) -> Chart {
    category::TRANSFORMATION
        .iter()
        .filter(|category| category.kind() == Kind::Quantity)
        .fold(
            Chart::new(ChartKind::Bar, "Electricity and heat generation")
                .describe("Transformation input, outputs and losses by country.")
                .y_title(scope.unit.to_string()),
            |chart, category| {
                chart.add(country_series(category.label(), records, |record| {
                    category.evaluate(record)
                }))
            },
        )
}

fn trend_chart(trends: &BTreeMap<String, Vec<Point>>, scope: &Scope) -> Chart {
    trends.iter().fold(
        Chart::new(ChartKind::Line, "Imports over time")
            .x_title("Year")
            .y_title(scope.unit.to_string()),
        |chart, (country, points)| {
            let series = points
                .iter()
                .fold(Series::new(country_name(country)), |series, point| {
                    series.point(point.year, point.value)
                });
            chart.add(series)
        },
    )
}
