//! Console report.
//!
//! The report is assembled completely before anything is printed.

use std::fmt::{self, Write as _};

use crate::config::ReportConfig;
use crate::data::model::{CellValue, Dataset};
use crate::regression::{LinearRegression, Metrics};

/// Scientific notation with six fractional digits and a signed two-digit
/// exponent, e.g. `-6.282955e+05`.
pub fn sci(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{value:.6e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

/// `lhs = b0 + b1 * name1 ...`. Positive terms get an explicit `+`, negative
/// ones carry their own sign.
pub fn equation(model: &LinearRegression, lhs: &str) -> String {
    let mut eq = format!("{lhs} = {}", sci(model.intercept));
    for (name, coef) in model.feature_names.iter().zip(model.coefficients.iter()) {
        let sign = if *coef >= 0.0 { "+" } else { "" };
        let _ = write!(eq, " {sign} {} * {name}", sci(*coef));
    }
    eq
}

/// Shape, column names and leading rows of the loaded table.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub head: Vec<Vec<CellValue>>,
}

impl DatasetInfo {
    pub fn new(dataset: &Dataset, head_rows: usize) -> Self {
        DatasetInfo {
            shape: dataset.shape(),
            columns: dataset.column_names.clone(),
            head: dataset.head(head_rows).to_vec(),
        }
    }
}

/// One tabulated test prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePrediction {
    /// Source row of the sample.
    pub row_id: usize,
    pub features: Vec<f64>,
    pub actual: f64,
    pub predicted: f64,
}

impl SamplePrediction {
    pub fn abs_error(&self) -> f64 {
        (self.actual - self.predicted).abs()
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub dataset_info: Option<DatasetInfo>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Coefficients by descending magnitude, when the report ranks them.
    pub ranked: Option<Vec<(String, f64)>>,
    pub train: Metrics,
    pub test: Metrics,
    pub samples: Vec<SamplePrediction>,
    pub equation: String,
}

impl Report {
    pub fn new(
        config: &ReportConfig,
        dataset: &Dataset,
        model: &LinearRegression,
        train: Metrics,
        test: Metrics,
        samples: Vec<SamplePrediction>,
    ) -> Self {
        Report {
            dataset_info: config
                .show_dataset_info
                .then(|| DatasetInfo::new(dataset, config.head_rows)),
            feature_names: model.feature_names.clone(),
            coefficients: model.coefficients.iter().copied().collect(),
            intercept: model.intercept,
            ranked: config.rank_coefficients.then(|| {
                model
                    .ranked_coefficients()
                    .into_iter()
                    .map(|(name, coef)| (name.to_string(), coef))
                    .collect()
            }),
            train,
            test,
            samples: samples.into_iter().take(config.sample_predictions).collect(),
            equation: equation(model, &config.equation_lhs),
        }
    }

    fn write_dataset_info(f: &mut fmt::Formatter<'_>, info: &DatasetInfo) -> fmt::Result {
        writeln!(f, "Dataset Info:")?;
        writeln!(f, "Shape: ({}, {})", info.shape.0, info.shape.1)?;
        let quoted: Vec<String> = info.columns.iter().map(|c| format!("'{c}'")).collect();
        writeln!(f, "Columns: [{}]", quoted.join(", "))?;
        writeln!(f)?;
        writeln!(f, "First few rows:")?;

        let cells: Vec<Vec<String>> = info
            .head
            .iter()
            .map(|row| row.iter().map(CellValue::to_string).collect())
            .collect();
        let index_width = info.head.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = info
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| {
                cells
                    .iter()
                    .map(|row| row[j].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, w) in info.columns.iter().zip(widths.iter().copied()) {
            write!(f, "  {name:>w$}")?;
        }
        writeln!(f)?;
        for (i, row) in cells.iter().enumerate() {
            write!(f, "{i:<index_width$}")?;
            for (cell, w) in row.iter().zip(widths.iter().copied()) {
                write!(f, "  {cell:>w$}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }

    fn write_importance(
        &self,
        f: &mut fmt::Formatter<'_>,
        ranked: &[(String, f64)],
    ) -> fmt::Result {
        let name_width = ranked
            .iter()
            .map(|(name, _)| name.len())
            .chain(std::iter::once("Feature".len()))
            .max()
            .unwrap_or(0);
        writeln!(f, "Feature Importance:")?;
        writeln!(
            f,
            "{:<name_width$}  {:>14}  {:>15}",
            "Feature", "Coefficient", "Abs_Coefficient"
        )?;
        for (name, coef) in ranked {
            writeln!(
                f,
                "{name:<name_width$}  {:>14}  {:>15}",
                sci(*coef),
                sci(coef.abs())
            )?;
        }
        writeln!(f, "Intercept: {}", sci(self.intercept))?;
        writeln!(f)
    }

    fn write_samples(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(80);
        writeln!(f, "Sample Predictions (first {} test samples):", self.samples.len())?;
        writeln!(f, "{rule}")?;
        write!(f, "{:<5}", "Index")?;
        for name in &self.feature_names {
            write!(f, " {name:<12}")?;
        }
        writeln!(f, " {:<12} {:<12} {:<12}", "Actual", "Predicted", "Error")?;
        writeln!(f, "{rule}")?;
        for sample in &self.samples {
            write!(f, "{:<5}", sample.row_id)?;
            for v in &sample.features {
                write!(f, " {:<12}", sci(*v))?;
            }
            writeln!(
                f,
                " {:<12} {:<12} {:<12}",
                sci(sample.actual),
                sci(sample.predicted),
                sci(sample.abs_error())
            )?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(info) = &self.dataset_info {
            Self::write_dataset_info(f, info)?;
        }

        if self.ranked.is_none() {
            writeln!(f, "Model Coefficients:")?;
            for (name, coef) in self.feature_names.iter().zip(&self.coefficients) {
                writeln!(f, "{name}: {}", sci(*coef))?;
            }
            writeln!(f, "Intercept: {}", sci(self.intercept))?;
            writeln!(f)?;
        }

        writeln!(f, "Model Performance:")?;
        writeln!(f, "Training R²: {:.6}", self.train.r2)?;
        writeln!(f, "Testing R²: {:.6}", self.test.r2)?;
        writeln!(f, "Training MSE: {}", sci(self.train.mse))?;
        writeln!(f, "Testing MSE: {}", sci(self.test.mse))?;
        writeln!(f, "Training MAE: {}", sci(self.train.mae))?;
        writeln!(f, "Testing MAE: {}", sci(self.test.mae))?;
        writeln!(f)?;

        if let Some(ranked) = &self.ranked {
            self.write_importance(f, ranked)?;
        }
        if !self.samples.is_empty() {
            self.write_samples(f)?;
        }

        writeln!(f, "Regression Equation:")?;
        writeln!(f, "{}", self.equation)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DVector;

    use super::*;

    fn model() -> LinearRegression {
        LinearRegression {
            intercept: 1.131972,
            coefficients: DVector::from_vec(vec![-628295.5, 125541.1, -214959.8]),
            feature_names: vec!["xSpan".into(), "ySpan".into(), "zSpan".into()],
            rank: 3,
            condition_number: 10.0,
        }
    }

    fn metrics(r2: f64) -> Metrics {
        Metrics {
            mse: 1.5e-4,
            mae: 0.01,
            r2,
            n: 10,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            column_names: vec!["a".into(), "bb".into()],
            rows: vec![
                vec![CellValue::Number(1.0), CellValue::Number(2.5)],
                vec![CellValue::Number(3.0), CellValue::Number(-4.0)],
            ],
            has_header: true,
        }
    }

    #[test]
    fn scientific_format_uses_two_digit_exponent() {
        assert_eq!(sci(1.131972), "1.131972e+00");
        assert_eq!(sci(-628295.5), "-6.282955e+05");
        assert_eq!(sci(0.000123), "1.230000e-04");
        assert_eq!(sci(0.0), "0.000000e+00");
        assert_eq!(sci(1e120), "1.000000e+120");
        assert_eq!(sci(f64::NAN), "nan");
    }

    #[test]
    fn equation_signs() {
        assert_eq!(
            equation(&model(), "y"),
            "y = 1.131972e+00  -6.282955e+05 * xSpan + 1.255411e+05 * ySpan  -2.149598e+05 * zSpan"
        );
    }

    #[test]
    fn ranked_report_lists_importance_and_samples() {
        let config = ReportConfig {
            rank_coefficients: true,
            sample_predictions: 1,
            ..ReportConfig::default()
        };
        let sample = |row_id, predicted| SamplePrediction {
            row_id,
            features: vec![1.0, 2.0, 3.0],
            actual: 2.0,
            predicted,
        };
        let samples = vec![sample(7, 1.5), sample(3, 2.0)];
        let text = Report::new(
            &config,
            &dataset(),
            &model(),
            metrics(0.99),
            metrics(0.95),
            samples,
        )
        .to_string();

        assert!(text.contains("Feature Importance:"));
        assert!(!text.contains("Model Coefficients:"));
        assert!(text.contains("Sample Predictions (first 1 test samples):"));
        assert!(text.contains("7     1.000000e+00"));
        assert!(text.contains("5.000000e-01"));
        assert!(!text.contains("Dataset Info:"));

        let importance = text.find("xSpan ").unwrap();
        let z = text.find("zSpan ").unwrap();
        let y = text.find("ySpan ").unwrap();
        assert!(importance < z && z < y);
    }

    #[test]
    fn plain_report_lists_coefficients_and_head() {
        let config = ReportConfig {
            show_dataset_info: true,
            equation_lhs: "power_output".into(),
            ..ReportConfig::default()
        };
        let text = Report::new(&config, &dataset(), &model(), metrics(0.99), metrics(0.95), vec![])
            .to_string();

        assert!(text.starts_with("Dataset Info:\nShape: (2, 2)\nColumns: ['a', 'bb']"));
        assert!(text.contains("Model Coefficients:\nxSpan: -6.282955e+05"));
        assert!(text.contains("Training R²: 0.990000"));
        assert!(text.contains("Testing MSE: 1.500000e-04"));
        assert!(text.contains("power_output = 1.131972e+00"));
        assert!(!text.contains("Sample Predictions"));
    }
}
