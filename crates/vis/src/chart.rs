pub mod axes;
pub mod spec;

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::id::ChartId;
use crate::id::SeriesId;

/// The kind of plot a chart is drawn as.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter,
}

/// A chart panel of the dashboard.
#[derive(Debug, Clone)]
pub struct Chart {
    pub(crate) id: ChartId,
    pub title: String,
    pub description: Option<String>,
    pub kind: ChartKind,
    pub stacked: bool,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Chart {
        Self {
            id: ChartId::next(),
            title: title.into(),
            description: None,
            kind,
            stacked: false,
            x_title: None,
            y_title: None,
            series: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Chart {
        self.description = Some(description.into());
        self
    }

    pub fn stacked(mut self) -> Chart {
        self.stacked = true;
        self
    }

    pub fn x_title(mut self, title: impl Into<String>) -> Chart {
        self.x_title = Some(title.into());
        self
    }

    pub fn y_title(mut self, title: impl Into<String>) -> Chart {
        self.y_title = Some(title.into());
        self
    }

    pub fn add(mut self, series: Series) -> Chart {
        self.series.push(series);
        self
    }

    /// Returns `true` if no series has a single value to draw.
    pub fn has_no_data(&self) -> bool {
        self.series
            .iter()
            .all(|series| series.points.iter().all(|point| point.y.is_none()))
    }
}

/// A named sequence of points drawn as one trace.
#[derive(Debug, Clone)]
pub struct Series {
    pub(crate) id: SeriesId,
    pub name: String,
    pub points: Vec<Point>,
    /// Hover labels, one per point.
    pub labels: Option<Vec<String>>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Series {
        Self {
            id: SeriesId::next(),
            name: name.into(),
            points: Vec::new(),
            labels: None,
        }
    }

    pub fn push(&mut self, x: impl Into<X>, y: Option<f64>) {
        self.points.push(Point { x: x.into(), y });
    }

    pub fn point(mut self, x: impl Into<X>, y: Option<f64>) -> Series {
        self.push(x, y);
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Series {
        self.labels = Some(labels);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: X,
    pub y: Option<f64>,
}

/// An x-axis value: a category label or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum X {
    Label(String),
    Number(f64),
}

impl From<&str> for X {
    fn from(label: &str) -> Self {
        X::Label(label.to_owned())
    }
}

impl From<String> for X {
    fn from(label: String) -> Self {
        X::Label(label)
    }
}

impl From<f64> for X {
    fn from(number: f64) -> Self {
        X::Number(number)
    }
}

impl From<i32> for X {
    fn from(number: i32) -> Self {
        X::Number(number.into())
    }
}

/// Formats the value as a JavaScript literal.
impl Display for X {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            X::Label(label) => serde_json::Value::String(label.clone()).fmt(f),
            X::Number(number) => JsNumber(Some(*number)).fmt(f),
        }
    }
}

/// An optional number formatted as a JavaScript literal; no data is `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct JsNumber(pub Option<f64>);

impl Display for JsNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(number) if number.is_finite() => number.fmt(f),
            _ => f.write_str("null"),
        }
    }
}

/// The JavaScript variable names holding a series' x and y values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesNames {
    pub(crate) xs: String,
    pub(crate) ys: String,
}

impl From<SeriesId> for SeriesNames {
    fn from(id: SeriesId) -> Self {
        Self {
            xs: id.xs(),
            ys: id.ys(),
        }
    }
}
