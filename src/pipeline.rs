use std::io::Write;

use nalgebra::DVector;

use crate::config::PipelineConfig;
use crate::data::loader::load_file;
use crate::data::model::{Dataset, Design};
use crate::data::select::select;
use crate::data::split::{train_test_split, Split};
use crate::error::Result;
use crate::plot::{DiagnosticFigure, Figure, FitSeries, HeatmapFigure, PlotSink};
use crate::predict::Prediction;
use crate::regression::{CorrelationMatrix, LinearRegression, Metrics};
use crate::report::{Report, SamplePrediction};

// ---------------------------------------------------------------------------
// Outcome of one run
// ---------------------------------------------------------------------------

/// Everything a run computed, in stage order.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub design: Design,
    pub split: Split,
    pub model: LinearRegression,
    pub train_predictions: DVector<f64>,
    pub test_predictions: DVector<f64>,
    pub train_metrics: Metrics,
    pub test_metrics: Metrics,
    pub correlation: CorrelationMatrix,
    pub report: Report,
}

impl PipelineOutcome {
    /// The diagnostic grid followed by the correlation heat map.
    pub fn figures(&self) -> Vec<Figure> {
        let diagnostics = DiagnosticFigure::new(
            FitSeries {
                actual: self.split.train.y.as_slice(),
                predicted: self.train_predictions.as_slice(),
                r2: self.train_metrics.r2,
            },
            FitSeries {
                actual: self.split.test.y.as_slice(),
                predicted: self.test_predictions.as_slice(),
                r2: self.test_metrics.r2,
            },
        );
        vec![
            Figure::Diagnostics(diagnostics),
            Figure::Correlation(HeatmapFigure::new(self.correlation.clone())),
        ]
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Load → select → split → fit → evaluate → report, once, in that order.
#[derive(Debug, Clone)]
pub struct RegressionPipeline {
    config: PipelineConfig,
}

impl RegressionPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Evaluate a fitted model on one feature vector, in selection order.
    pub fn predict(&self, model: &LinearRegression, features: &[f64]) -> Result<Prediction> {
        Prediction::new(model, features, &self.config.report)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage against the configured file, print the report to `out`
    /// and hand the figures to `sink`.
    pub fn run<W, S>(&self, out: &mut W, sink: &mut S) -> Result<PipelineOutcome>
    where
        W: Write + ?Sized,
        S: PlotSink + ?Sized,
    {
        let dataset = load_file(&self.config.data)?;
        self.run_on_dataset(&dataset, out, sink)
    }

    /// Same as [`run`](Self::run) with the table already in memory.
    pub fn run_on_dataset<W, S>(
        &self,
        dataset: &Dataset,
        out: &mut W,
        sink: &mut S,
    ) -> Result<PipelineOutcome>
    where
        W: Write + ?Sized,
        S: PlotSink + ?Sized,
    {
        let outcome = self.evaluate(dataset)?;
        write!(out, "{}", outcome.report)?;
        out.flush()?;

        for figure in outcome.figures() {
            sink.render(&figure)?;
        }
        Ok(outcome)
    }

    /// The computational stages only: no output, no figures.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<PipelineOutcome> {
        let cfg = &self.config;
        log::info!("[{}] Running on {} rows", cfg.name, dataset.len());

        let design = select(dataset, &cfg.features, &cfg.target)?;
        let split = train_test_split(&design, &cfg.split)?;

        let model = LinearRegression::fit(
            &split.train.x,
            &split.train.y,
            &design.feature_names,
            &cfg.solver,
        )?;
        log::info!(
            "[{}] Fitted {} coefficients (condition number {:.3e})",
            cfg.name,
            model.coefficients.len(),
            model.condition_number
        );

        let train_predictions = model.predict(&split.train.x)?;
        let test_predictions = model.predict(&split.test.x)?;
        let train_metrics =
            Metrics::compute(split.train.y.as_slice(), train_predictions.as_slice())?;
        let test_metrics =
            Metrics::compute(split.test.y.as_slice(), test_predictions.as_slice())?;
        log::info!(
            "[{}] R² train {:.6} / test {:.6}",
            cfg.name,
            train_metrics.r2,
            test_metrics.r2
        );

        let correlation = CorrelationMatrix::pearson(&design);

        let samples = (0..split.test.len().min(cfg.report.sample_predictions))
            .map(|i| SamplePrediction {
                row_id: split.test.row_ids[i],
                features: split.test.x.row(i).iter().copied().collect(),
                actual: split.test.y[i],
                predicted: test_predictions[i],
            })
            .collect();
        let report = Report::new(
            &cfg.report,
            dataset,
            &model,
            train_metrics,
            test_metrics,
            samples,
        );

        Ok(PipelineOutcome {
            design,
            split,
            model,
            train_predictions,
            test_predictions,
            train_metrics,
            test_metrics,
            correlation,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::{ColumnRef, ColumnSpec, DataSource};
    use crate::data::model::CellValue;
    use crate::plot::NullSink;

    fn linear_dataset(n: usize) -> Dataset {
        let rows = (0..n)
            .map(|i| {
                let x = i as f64 * 0.5;
                vec![CellValue::Number(x), CellValue::Number(2.0 * x + 3.0), CellValue::Number(0.0)]
            })
            .collect();
        Dataset {
            column_names: vec!["x1".into(), "y".into(), "pad".into()],
            rows,
            has_header: true,
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            name: "line".into(),
            data: DataSource::csv("unused.csv", true),
            features: vec![ColumnSpec::named("x1")],
            target: ColumnSpec::new(ColumnRef::FromEnd(2)),
            split: Default::default(),
            solver: Default::default(),
            report: Default::default(),
        }
    }

    #[test]
    fn recovers_noise_free_line() {
        let pipeline = RegressionPipeline::new(config()).unwrap();
        let outcome = pipeline.evaluate(&linear_dataset(20)).unwrap();

        assert_relative_eq!(outcome.model.intercept, 3.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.model.coefficients[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.train_metrics.r2, 1.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.test_metrics.r2, 1.0, epsilon = 1e-9);
        assert_eq!(outcome.split.train.len() + outcome.split.test.len(), 20);
    }

    #[test]
    fn run_prints_report_and_renders_two_figures() {
        let pipeline = RegressionPipeline::new(config()).unwrap();
        let mut out = Vec::new();
        let mut sink = NullSink::default();
        pipeline
            .run_on_dataset(&linear_dataset(10), &mut out, &mut sink)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Model Performance:"));
        assert!(text.contains("y = 3.000000e+00 + 2.000000e+00 * x1"));
        assert_eq!(sink.rendered, vec!["diagnostics", "correlation"]);
    }

    #[test]
    fn failure_leaves_no_output() {
        let mut cfg = config();
        cfg.features = vec![ColumnSpec::named("missing")];
        let pipeline = RegressionPipeline::new(cfg).unwrap();
        let mut out = Vec::new();
        let mut sink = NullSink::default();
        assert!(pipeline
            .run_on_dataset(&linear_dataset(10), &mut out, &mut sink)
            .is_err());
        assert!(out.is_empty());
        assert!(sink.rendered.is_empty());
    }
}
