//! The Plotly trace and layout specification of a chart.
//!
//! The data arrays are not part of the spec. Each trace names the JavaScript
//! variables its x and y values are loaded into, and the dashboard script
//! binds them when the chart is drawn.

use serde::Serialize;

use crate::chart::Chart;
use crate::chart::ChartKind;
use crate::chart::SeriesNames;
use crate::chart::axes::AxisType;

#[derive(Serialize, Debug)]
pub struct ChartSpec {
    pub data: Vec<TraceSpec>,
    pub layout: Layout,
}

impl ChartSpec {
    /// Builds the spec of `chart`, with `names[i]` holding the data of the
    /// chart's i-th series.
    pub fn new(chart: &Chart, names: Vec<SeriesNames>) -> ChartSpec {
        let data = chart
            .series
            .iter()
            .zip(names)
            .map(|(series, names)| TraceSpec {
                xs: names.xs,
                ys: names.ys,
                trace: Trace::new(chart.kind, series.name.clone(), series.labels.clone()),
            })
            .collect();

        ChartSpec {
            data,
            layout: Layout::new(chart),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct TraceSpec {
    pub xs: String,
    pub ys: String,
    pub trace: Trace,
}

#[derive(Serialize, Debug)]
pub struct Trace {
    #[serde(rename = "type")]
    kind: TraceKind,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hole: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<Vec<String>>,
}

impl Trace {
    pub fn new(kind: ChartKind, name: String, text: Option<Vec<String>>) -> Self {
        let (kind, mode, hole) = match kind {
            ChartKind::Bar => (TraceKind::Bar, None, None),
            ChartKind::Line => (TraceKind::Scatter, Some(Mode::LinesMarkers), None),
            ChartKind::Scatter => (TraceKind::Scatter, Some(Mode::MarkersText), None),
            ChartKind::Pie => (TraceKind::Pie, None, Some(0.4)),
        };

        Self {
            kind,
            name,
            mode,
            hole,
            text,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
    Scatter,
    Pie,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[serde(rename = "lines+markers")]
    LinesMarkers,
    #[serde(rename = "markers+text")]
    MarkersText,
}

#[derive(Serialize, Debug)]
pub struct Layout {
    #[serde(rename = "xaxis")]
    x_axis: Axis,
    #[serde(rename = "yaxis")]
    y_axis: Axis,
    height: u32,
    #[serde(rename = "showlegend")]
    show_legend: bool,
    #[serde(rename = "autosize")]
    auto_size: bool,
    #[serde(rename = "hovermode")]
    hover_mode: HoverMode,
    #[serde(rename = "barmode", skip_serializing_if = "Option::is_none")]
    bar_mode: Option<BarMode>,
}

impl Layout {
    pub fn new(chart: &Chart) -> Self {
        let points = chart
            .series
            .first()
            .map(|series| series.points.as_slice())
            .unwrap_or_default();

        let bar_mode = match chart.kind {
            ChartKind::Bar if chart.stacked => Some(BarMode::Stack),
            ChartKind::Bar => Some(BarMode::Group),
            ChartKind::Line | ChartKind::Pie | ChartKind::Scatter => None,
        };

        let x_kind = match chart.kind {
            ChartKind::Scatter => AxisType::Linear,
            _ => AxisType::xaxis(points),
        };

        Self {
            x_axis: Axis::new(x_kind, chart.x_title.clone()),
            y_axis: Axis::new(AxisType::Linear, chart.y_title.clone()),
            height: 400,
            show_legend: chart.series.len() > 1 || chart.kind == ChartKind::Pie,
            auto_size: true,
            hover_mode: HoverMode::Closest,
            bar_mode,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct Axis {
    #[serde(rename = "type")]
    kind: AxisType,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<Title>,
    #[serde(rename = "automargin")]
    auto_margin: bool,
    #[serde(rename = "zeroline")]
    zero_line: bool,
}

impl Axis {
    pub fn new(kind: AxisType, title: Option<String>) -> Self {
        Self {
            kind,
            title: title.map(|text| Title { text }),
            auto_margin: true,
            zero_line: kind == AxisType::Linear,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct Title {
    text: String,
}

#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    #[default]
    Closest,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
    Stack,
}
