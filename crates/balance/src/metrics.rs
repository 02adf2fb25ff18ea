//! Derived energy indicators.
//!
//! Every function is a pure, single-pass computation over already decoded
//! values. A zero or missing denominator yields `None` ("no data"), never
//! `NaN` or an infinity.

/// Rounds `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Returns `numerator / denominator * 100`.
pub fn percentage(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let numerator = numerator?;
    let denominator = denominator?;

    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    let ratio = numerator / denominator * 100.0;
    ratio.is_finite().then_some(ratio)
}

/// Returns imports minus exports; missing exports count as zero.
pub fn net_imports(imports: Option<f64>, exports: Option<f64>) -> Option<f64> {
    Some(imports? - exports.unwrap_or(0.0))
}

/// Energy dependency: net imports as a share of gross inland consumption,
/// rounded to one decimal.
pub fn energy_dependency(
    imports: Option<f64>,
    exports: Option<f64>,
    gross_inland_consumption: Option<f64>,
) -> Option<f64> {
    percentage(net_imports(imports, exports), gross_inland_consumption).map(|v| round_to(v, 1))
}

/// Self-sufficiency: primary production as a share of gross inland
/// consumption, rounded to one decimal. 100 or more marks a net exporter.
pub fn self_sufficiency(
    production: Option<f64>,
    gross_inland_consumption: Option<f64>,
) -> Option<f64> {
    percentage(production, gross_inland_consumption).map(|v| round_to(v, 1))
}

/// Returns `true` if a self-sufficiency ratio marks a net exporter.
pub fn is_net_exporter(self_sufficiency: Option<f64>) -> bool {
    self_sufficiency.is_some_and(|ratio| ratio >= 100.0)
}

/// Returns the share of each value in their total, as fractions.
///
/// Negative values (e.g. net electricity exports) count as zero. Returns
/// `None` when the total is zero.
pub fn shares(values: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = values.iter().map(|v| positive(*v)).sum();

    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    Some(values.iter().map(|v| positive(*v) / total).collect())
}

/// Herfindahl-Hirschman index of the values: the sum of squared shares.
pub fn herfindahl(values: &[f64]) -> Option<f64> {
    shares(values).map(|shares| shares.iter().map(|share| share * share).sum())
}

/// Fuel-mix diversity score: `(1 - HHI) * 100`, clamped to `[0, 100]`.
pub fn diversity_score(values: &[f64]) -> Option<f64> {
    herfindahl(values).map(|hhi| ((1.0 - hhi) * 100.0).clamp(0.0, 100.0))
}

/// Efficiency and losses of the electricity and heat transformation sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    /// Outputs as a share of the input.
    pub efficiency: Option<f64>,
    /// The input not recovered as output, never negative.
    pub losses: Option<f64>,
}

/// Computes the transformation efficiency from the input and the electricity
/// and heat outputs.
pub fn transformation(
    input: Option<f64>,
    electricity: Option<f64>,
    heat: Option<f64>,
) -> Transformation {
    let outputs = match (electricity, heat) {
        (None, None) => None,
        (electricity, heat) => Some(electricity.unwrap_or(0.0) + heat.unwrap_or(0.0)),
    };

    Transformation {
        efficiency: percentage(outputs, input).map(|v| round_to(v, 1)),
        losses: input.map(|input| (input - outputs.unwrap_or(0.0)).max(0.0)),
    }
}

fn positive(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn dependency_without_consumption_is_no_data() {
        assert_eq!(energy_dependency(Some(0.0), Some(0.0), Some(0.0)), None);
        assert_eq!(energy_dependency(Some(10.0), None, None), None);
    }

    #[test]
    fn dependency_is_rounded_to_one_decimal() {
        assert_eq!(
            energy_dependency(Some(700.0), Some(100.0), Some(900.0)),
            Some(66.7)
        );
        assert_eq!(
            energy_dependency(Some(100.0), Some(400.0), Some(1000.0)),
            Some(-30.0)
        );
    }

    #[test]
    fn net_imports_treat_missing_exports_as_zero() {
        assert_eq!(net_imports(Some(300.0), None), Some(300.0));
        assert_eq!(net_imports(None, Some(10.0)), None);
    }

    #[test]
    fn self_sufficiency_marks_net_exporters() {
        let ratio = self_sufficiency(Some(1200.0), Some(1000.0));

        assert_eq!(ratio, Some(120.0));
        assert!(is_net_exporter(ratio));
        assert!(!is_net_exporter(self_sufficiency(Some(500.0), Some(1000.0))));
        assert!(!is_net_exporter(self_sufficiency(Some(500.0), Some(0.0))));
    }

    #[test]
    fn single_fuel_has_no_diversity() {
        let values = [0.0, 0.0, 1500.0, 0.0];

        assert_eq!(herfindahl(&values), Some(1.0));
        assert_eq!(diversity_score(&values), Some(0.0));
    }

    #[test]
    fn equal_split_diversity() {
        for n in 1..=8 {
            let values = vec![250.0; n];
            let expected = (1.0 - 1.0 / n as f64) * 100.0;
            let score = diversity_score(&values).unwrap_or(f64::NAN);

            assert!((score - expected).abs() < EPSILON, "n = {n}: {score}");
        }
    }

    #[test]
    fn empty_mix_is_no_data() {
        assert_eq!(herfindahl(&[]), None);
        assert_eq!(diversity_score(&[0.0, 0.0]), None);
        assert_eq!(diversity_score(&[-5.0, 0.0]), None);
    }

    #[test]
    fn negative_values_count_as_zero_share() {
        let shares = shares(&[300.0, -100.0, 100.0]).unwrap_or_default();

        assert_eq!(shares, vec![0.75, 0.0, 0.25]);
    }

    #[test]
    fn transformation_efficiency_and_losses() {
        let t = transformation(Some(1000.0), Some(380.0), Some(70.0));

        assert_eq!(t.efficiency, Some(45.0));
        assert_eq!(t.losses, Some(550.0));
    }

    #[test]
    fn transformation_losses_are_never_negative() {
        let t = transformation(Some(100.0), Some(90.0), Some(30.0));

        assert_eq!(t.efficiency, Some(120.0));
        assert_eq!(t.losses, Some(0.0));
    }

    #[test]
    fn transformation_without_input_is_no_data() {
        let t = transformation(Some(0.0), Some(10.0), None);

        assert_eq!(t.efficiency, None);
        assert_eq!(t.losses, Some(0.0));
        assert_eq!(transformation(None, None, None).losses, None);
    }

    #[test]
    fn percentage_rejects_zero_and_missing_denominators() {
        assert_eq!(percentage(Some(1.0), Some(0.0)), None);
        assert_eq!(percentage(Some(1.0), None), None);
        assert_eq!(percentage(None, Some(4.0)), None);
        assert_eq!(percentage(Some(1.0), Some(4.0)), Some(25.0));
    }
}
