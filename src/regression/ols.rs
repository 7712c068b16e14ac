//! Ordinary least squares with an intercept.
//!
//! The design matrix and target are centered, the centered problem is solved
//! through an SVD, and the intercept is recovered from the means:
//!
//! ```text
//! β  = argmin ‖(X − x̄) β − (y − ȳ)‖²
//! β₀ = ȳ − x̄·β
//! ```
//!
//! Centering keeps the intercept out of the conditioning estimate, so the
//! condition number reflects only the feature columns.

use nalgebra::{DMatrix, DVector};

use crate::config::SolverConfig;
use crate::error::{RegressionError, Result};

/// A fitted affine model `ŷ = intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: DVector<f64>,
    pub feature_names: Vec<String>,
    /// Numerical rank of the centered design matrix.
    pub rank: usize,
    /// `σ_max / σ_min` of the centered design matrix; infinite when rank-deficient.
    pub condition_number: f64,
}

impl LinearRegression {
    /// Fit on `(x, y)`. Fails with [`RegressionError::Numerical`] on singular
    /// or ill-conditioned input unless the solver allows rank deficiency.
    pub fn fit(
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        feature_names: &[String],
        solver: &SolverConfig,
    ) -> Result<Self> {
        let (n, p) = x.shape();
        if n != y.len() {
            return Err(RegressionError::Schema(format!(
                "feature matrix has {n} rows but target has {} values",
                y.len()
            )));
        }
        if feature_names.len() != p {
            return Err(RegressionError::Schema(format!(
                "{p} feature columns but {} feature names",
                feature_names.len()
            )));
        }
        if n == 0 || p == 0 {
            return Err(RegressionError::Numerical(format!(
                "cannot fit a {n}x{p} training set"
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(RegressionError::Numerical(
                "training data contains NaN or infinite values".to_string(),
            ));
        }

        let x_mean = DVector::from_fn(p, |j, _| x.column(j).mean());
        let y_mean = y.mean();
        let xc = DMatrix::from_fn(n, p, |i, j| x[(i, j)] - x_mean[j]);
        let yc = y.add_scalar(-y_mean);

        let svd = xc.svd(true, true);
        let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        let tol = sigma_max * n.max(p) as f64 * f64::EPSILON;
        let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
        let condition_number = if rank < p {
            f64::INFINITY
        } else {
            let sigma_min = svd
                .singular_values
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            sigma_max / sigma_min
        };
        log::debug!("OLS: n={n} p={p} rank={rank} cond={condition_number:.3e}");

        if rank < p || condition_number > solver.max_condition {
            let reason = if rank < p {
                format!(
                    "design matrix has rank {rank} but {p} feature columns \
                     (collinear or constant features, or too few rows)"
                )
            } else {
                format!(
                    "design matrix condition number {condition_number:.3e} exceeds {:.3e}",
                    solver.max_condition
                )
            };
            if !solver.allow_rank_deficient {
                return Err(RegressionError::Numerical(reason));
            }
            log::warn!("{reason}; using the minimum-norm solution");
        }

        let coefficients = svd
            .solve(&yc, tol)
            .map_err(|e| RegressionError::Numerical(e.to_string()))?;
        let intercept = y_mean - x_mean.dot(&coefficients);

        Ok(LinearRegression {
            intercept,
            coefficients,
            feature_names: feature_names.to_vec(),
            rank,
            condition_number,
        })
    }

    /// Apply the fitted map to every row of `x`.
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(RegressionError::Schema(format!(
                "model expects {} features, got {}",
                self.coefficients.len(),
                x.ncols()
            )));
        }
        let mut predicted = x * &self.coefficients;
        predicted.add_scalar_mut(self.intercept);
        Ok(predicted)
    }

    /// Evaluate the model for a single sample.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        let x = DMatrix::from_row_slice(1, features.len(), features);
        Ok(self.predict(&x)?[0])
    }

    /// `(name, coefficient)` pairs sorted by descending absolute value.
    pub fn ranked_coefficients(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .feature_names
            .iter()
            .map(String::as_str)
            .zip(self.coefficients.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        ranked
    }
}
