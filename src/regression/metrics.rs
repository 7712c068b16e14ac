use crate::error::{RegressionError, Result};

/// Fit quality of one subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub mse: f64,
    pub mae: f64,
    /// Coefficient of determination. 1.0 is a perfect fit, 0.0 matches
    /// always predicting the mean.
    pub r2: f64,
    pub n: usize,
}

impl Metrics {
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(RegressionError::Schema(format!(
                "{} actual values but {} predictions",
                actual.len(),
                predicted.len()
            )));
        }
        if actual.is_empty() {
            return Err(RegressionError::Schema(
                "cannot score an empty subset".to_string(),
            ));
        }
        Ok(Metrics {
            mse: mean_squared_error(actual, predicted),
            mae: mean_absolute_error(actual, predicted),
            r2: r2_score(actual, predicted),
            n: actual.len(),
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    total / actual.len() as f64
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let total: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum();
    total / actual.len() as f64
}

/// `1 − SSres / SStot`. A constant target has no variance to explain: the
/// score is 1.0 when every prediction is exact and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let mean = mean(actual);
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean) * (a - mean)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// `actual − predicted`, element-wise.
pub fn residuals(actual: &[f64], predicted: &[f64]) -> Vec<f64> {
    actual.iter().zip(predicted).map(|(a, p)| a - p).collect()
}
