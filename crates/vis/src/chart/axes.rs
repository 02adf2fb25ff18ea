use serde::Serialize;

use crate::chart::Point;
use crate::chart::X;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Linear,
    Category,
}

impl AxisType {
    /// Picks the x-axis type from the first point of a series.
    pub fn xaxis(points: &[Point]) -> AxisType {
        match points.first() {
            Some(Point { x: X::Label(_), .. }) => AxisType::Category,
            Some(Point { x: X::Number(_), .. }) | None => AxisType::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_make_a_category_axis() {
        let countries = [Point { x: X::from("DE"), y: Some(1.0) }];
        let years = [Point { x: X::from(2021), y: None }];

        assert_eq!(AxisType::xaxis(&countries), AxisType::Category);
        assert_eq!(AxisType::xaxis(&years), AxisType::Linear);
        assert_eq!(AxisType::xaxis(&[]), AxisType::Linear);
    }
}
