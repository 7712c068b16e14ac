//! Ordinary least-squares regression reports for small geometric datasets.
//!
//! One [`RegressionPipeline`] runs the whole analysis: load a delimited
//! table, cut out the feature matrix and target, split it with a seeded
//! shuffle, fit an intercept-plus-coefficients model, score both subsets and
//! print a report. Diagnostic figures go to any [`PlotSink`].
//!
//! ```no_run
//! use geo_regress::{PipelineConfig, RegressionPipeline};
//! use geo_regress::plot::SvgFileSink;
//!
//! let pipeline = RegressionPipeline::new(PipelineConfig::triangle())?;
//! let mut sink = SvgFileSink::new("plots", "triangle")?;
//! let outcome = pipeline.run(&mut std::io::stdout(), &mut sink)?;
//! println!("test R² = {:.4}", outcome.test_metrics.r2);
//! # Ok::<(), geo_regress::RegressionError>(())
//! ```

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod plot;
pub mod predict;
pub mod regression;
pub mod report;

pub use config::{ColumnRef, ColumnSpec, DataSource, PipelineConfig, SolverConfig, SplitConfig};
pub use error::{RegressionError, Result};
pub use pipeline::{PipelineOutcome, RegressionPipeline};
pub use plot::PlotSink;
pub use predict::{parse_values, Prediction};
