use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::chart::Chart;
use crate::chart::JsNumber;
use crate::chart::SeriesNames;
use crate::chart::X;
use crate::chart::spec::ChartSpec;
use crate::error::Result;
use crate::layout::writer::SeriesWriter;

/// A chart ready to be placed into a page.
#[derive(Serialize, Debug)]
pub struct ChartView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// The chart spec as JSON.
    pub spec: String,
    /// The data files, relative to the page.
    pub scripts: Vec<String>,
    pub empty: bool,
}

pub struct DataEngine<'a> {
    path: &'a Path,
    prefix: &'a str,
}

impl<'a> DataEngine<'a> {
    /// Writes data files into `path`; pages refer to them through `prefix`.
    pub fn new(path: &'a Path, prefix: &'a str) -> DataEngine<'a> {
        Self { path, prefix }
    }

    pub fn render(&self, charts: &[Chart]) -> Result<Vec<ChartView>> {
        charts.iter().map(|chart| self.render_chart(chart)).collect()
    }

    fn render_chart(&self, chart: &Chart) -> Result<ChartView> {
        let mut names = Vec::with_capacity(chart.series.len());
        let mut scripts = Vec::with_capacity(chart.series.len());

        for series in &chart.series {
            let file_name = series.id.file_name();
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(self.path.join(&file_name))?;

            let series_names = SeriesNames::from(series.id);
            let mut writer: SeriesWriter<_, &X, JsNumber> =
                SeriesWriter::new(BufWriter::new(file), series_names.clone());

            writer.start()?;
            for point in &series.points {
                writer.write(&point.x, JsNumber(point.y))?;
            }
            writer.end()?;

            debug!(chart = %chart.title, series = %series.name, points = series.points.len(), "wrote series data");

            names.push(series_names);
            scripts.push(format!("{}/{file_name}", self.prefix));
        }

        let spec = serde_json::to_string(&ChartSpec::new(chart, names))?;

        Ok(ChartView {
            id: chart.id.to_string(),
            title: chart.title.clone(),
            description: chart.description.clone(),
            spec,
            scripts,
            empty: chart.has_no_data(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::chart::ChartKind;
    use crate::chart::Series;

    #[test]
    fn one_data_file_per_series() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let chart = Chart::new(ChartKind::Line, "Imports")
            .add(Series::new("DE").point(2021, Some(1.0)).point(2022, None))
            .add(Series::new("FR").point(2021, Some(2.0)));

        let engine = DataEngine::new(dir.path(), "data");
        let views = engine.render(std::slice::from_ref(&chart))?;

        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.scripts.len(), 2);
        assert!(!view.empty);

        let file_name = view.scripts[0].trim_start_matches("data/");
        let content = fs::read_to_string(dir.path().join(file_name))?;
        let ys = chart.series[0].id.ys();
        assert!(content.contains(&format!("{ys}[1] = null;")));
        assert!(content.starts_with("var xs"));

        let spec: serde_json::Value = serde_json::from_str(&view.spec)?;
        assert_eq!(spec["data"][0]["ys"], serde_json::json!(ys));

        Ok(())
    }
}
