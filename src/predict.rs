//! Evaluating a freshly fitted model on feature values given by the user.

use std::fmt;

use crate::config::ReportConfig;
use crate::error::{RegressionError, Result};
use crate::geometry::ShapeSummary;
use crate::regression::LinearRegression;
use crate::report::sci;

/// Parse a comma-separated feature vector such as `"0.5,0.3,0.4"`.
pub fn parse_values(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(str::trim)
        .map(|token| match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(RegressionError::Config(format!(
                "'{token}' in feature list '{text}' is not a finite number"
            ))),
        })
        .collect()
}

/// One model evaluation with its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub inputs: Vec<(String, f64)>,
    pub lhs: String,
    pub value: f64,
    pub shape: Option<ShapeSummary>,
}

impl Prediction {
    /// Evaluate `model` at `features`, given in the model's feature order.
    pub fn new(model: &LinearRegression, features: &[f64], report: &ReportConfig) -> Result<Self> {
        let value = model.predict_one(features)?;
        let shape = report.geometry.and_then(|g| g.describe(features));
        Ok(Prediction {
            inputs: model
                .feature_names
                .iter()
                .cloned()
                .zip(features.iter().copied())
                .collect(),
            lhs: report.equation_lhs.clone(),
            value,
            shape,
        })
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prediction:")?;
        for (name, v) in &self.inputs {
            writeln!(f, "  {name} = {}", sci(*v))?;
        }
        if let Some(shape) = &self.shape {
            writeln!(f, "  {shape}")?;
        }
        writeln!(f, "{} = {}", self.lhs, sci(self.value))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DVector;

    use super::*;
    use crate::geometry::Geometry;

    fn rectangle_model() -> LinearRegression {
        LinearRegression {
            intercept: 1.131972,
            coefficients: DVector::from_vec(vec![-6.282955e5, 1.255411e5, -2.149598e5]),
            feature_names: vec!["Column_5".into(), "Column_6".into(), "Column_7".into()],
            rank: 3,
            condition_number: 10.0,
        }
    }

    #[test]
    fn parses_comma_separated_values() {
        assert_eq!(parse_values("1, -2.5,3e-6").unwrap(), vec![1.0, -2.5, 3e-6]);
        assert!(matches!(parse_values("1,,2"), Err(RegressionError::Config(_))));
        assert!(matches!(parse_values("1,nan"), Err(RegressionError::Config(_))));
        assert!(parse_values("abc").is_err());
    }

    #[test]
    fn evaluates_rectangle_equation() {
        // One-micron cube.
        let report = ReportConfig {
            geometry: Some(Geometry::Box),
            ..ReportConfig::default()
        };
        let p = Prediction::new(&rectangle_model(), &[1e-6, 1e-6, 1e-6], &report).unwrap();
        let expected = 1.131972 - 6.282955e5 * 1e-6 + 1.255411e5 * 1e-6 - 2.149598e5 * 1e-6;
        approx::assert_relative_eq!(p.value, expected, epsilon = 1e-12);

        let text = p.to_string();
        assert!(text.starts_with("Prediction:\n  Column_5 = 1.000000e-06\n"));
        assert!(text.contains("  Box volume: 1.000000e-18\n"));
        assert!(text.ends_with(&format!("y = {}\n", sci(expected))));
    }

    #[test]
    fn wrong_width_is_schema_error() {
        let err = Prediction::new(&rectangle_model(), &[1.0, 2.0], &ReportConfig::default())
            .unwrap_err();
        assert!(matches!(err, RegressionError::Schema(_)));
    }
}
