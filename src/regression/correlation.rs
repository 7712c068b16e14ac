use nalgebra::DMatrix;

use crate::data::model::Design;

/// Pairwise Pearson correlations between the features and the target.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Feature names followed by the target name.
    pub labels: Vec<String>,
    /// Symmetric; `NaN` wherever a column has zero variance.
    pub values: DMatrix<f64>,
}

impl CorrelationMatrix {
    /// Correlate every feature column and the target over all rows of `design`.
    pub fn pearson(design: &Design) -> Self {
        let p = design.x.ncols();
        let columns: Vec<Vec<f64>> = (0..p)
            .map(|j| design.x.column(j).iter().copied().collect())
            .chain(std::iter::once(design.y.iter().copied().collect()))
            .collect();

        let mut labels = design.feature_names.clone();
        labels.push(design.target_name.clone());

        for (label, col) in labels.iter().zip(&columns) {
            if variance_sum(col) == 0.0 {
                log::warn!("Column '{label}' is constant; its correlations are undefined");
            }
        }

        let k = columns.len();
        let values = DMatrix::from_fn(k, k, |i, j| pearson(&columns[i], &columns[j]));
        CorrelationMatrix { labels, values }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn variance_sum(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum()
}

/// Pearson correlation of two equally long samples. `NaN` if either is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}
