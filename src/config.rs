//! Pipeline configuration.
//!
//! File paths, column positions, the split fraction and the seed are all
//! fields here. The two presets describe the rectangle and triangle datasets;
//! any other layout can be described in a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RegressionError, Result};
use crate::geometry::Geometry;

/// Reference to one column of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRef {
    /// Zero-based position from the left.
    Index(usize),
    /// Position from the right: 1 is the last column, 2 the one before it.
    FromEnd(usize),
    /// Header name. Only valid for files with a header row.
    Name(String),
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRef::Index(i) => write!(f, "column #{i}"),
            ColumnRef::FromEnd(k) => write!(f, "column -{k}"),
            ColumnRef::Name(name) => write!(f, "column '{name}'"),
        }
    }
}

/// A selected column plus the label used for it in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub column: ColumnRef,
    /// Report label; falls back to the dataset's column name.
    #[serde(default)]
    pub label: Option<String>,
}

impl ColumnSpec {
    pub fn new(column: ColumnRef) -> Self {
        Self {
            column,
            label: None,
        }
    }

    pub fn labeled(column: ColumnRef, label: &str) -> Self {
        Self {
            column,
            label: Some(label.to_string()),
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(ColumnRef::Name(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub path: PathBuf,
    #[serde(default)]
    pub has_header: bool,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl DataSource {
    pub fn csv(path: impl Into<PathBuf>, has_header: bool) -> Self {
        Self {
            path: path.into(),
            has_header,
            delimiter: default_delimiter(),
        }
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(RegressionError::Config(format!(
                "delimiter {:?} is not a single ASCII character",
                self.delimiter
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of rows held out for testing, in (0, 1).
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Largest accepted ratio between the extreme singular values of the
    /// centered design matrix.
    pub max_condition: f64,
    /// Return the minimum-norm solution instead of failing on singular or
    /// ill-conditioned systems.
    pub allow_rank_deficient: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_condition: 1e10,
            allow_rank_deficient: false,
        }
    }
}

/// Which optional sections the text report contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Print shape, column names and the first rows of the dataset.
    pub show_dataset_info: bool,
    pub head_rows: usize,
    /// List coefficients as a table sorted by absolute magnitude instead of
    /// in feature order.
    pub rank_coefficients: bool,
    /// Number of test predictions to tabulate; zero disables the table.
    pub sample_predictions: usize,
    /// Left-hand side of the printed regression equation.
    pub equation_lhs: String,
    /// Shape the feature columns describe, for summaries of user queries.
    pub geometry: Option<Geometry>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_dataset_info: false,
            head_rows: 5,
            rank_coefficients: false,
            sample_predictions: 0,
            equation_lhs: "y".to_string(),
            geometry: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Short name, used as the file prefix for rendered figures.
    #[serde(default = "default_name")]
    pub name: String,
    pub data: DataSource,
    pub features: Vec<ColumnSpec>,
    pub target: ColumnSpec,
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_name() -> String {
    "regression".to_string()
}

impl PipelineConfig {
    /// Headerless rectangle data: spans in columns 4..=6, efficiency in the
    /// second-to-last column.
    pub fn rectangle() -> Self {
        Self {
            name: "rect".to_string(),
            data: DataSource::csv("LR/rect.csv", false),
            features: (4..7)
                .map(|i| ColumnSpec::labeled(ColumnRef::Index(i), &format!("Column_{}", i + 1)))
                .collect(),
            target: ColumnSpec::labeled(ColumnRef::FromEnd(2), "Target"),
            split: SplitConfig::default(),
            solver: SolverConfig::default(),
            report: ReportConfig {
                rank_coefficients: true,
                sample_predictions: 10,
                geometry: Some(Geometry::Box),
                ..ReportConfig::default()
            },
        }
    }

    /// Triangle data with a header row: vertex coordinates `x1..x3`, `y1..y3`
    /// predicting power output in the second-to-last column.
    pub fn triangle() -> Self {
        Self {
            name: "triangle".to_string(),
            data: DataSource::csv("LR/triangle.csv", true),
            features: ["x1", "x2", "x3", "y1", "y2", "y3"]
                .iter()
                .map(|name| ColumnSpec::named(name))
                .collect(),
            target: ColumnSpec::new(ColumnRef::FromEnd(2)),
            split: SplitConfig::default(),
            solver: SolverConfig::default(),
            report: ReportConfig {
                show_dataset_info: true,
                equation_lhs: "power_output".to_string(),
                geometry: Some(Geometry::Triangle),
                ..ReportConfig::default()
            },
        }
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RegressionError::data_access(path, e))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .map_err(|e| RegressionError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parts of the configuration that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(RegressionError::Config(
                "at least one feature column is required".to_string(),
            ));
        }
        for spec in self.features.iter().chain(std::iter::once(&self.target)) {
            match &spec.column {
                ColumnRef::FromEnd(0) => {
                    return Err(RegressionError::Config(
                        "from_end positions start at 1 (the last column)".to_string(),
                    ));
                }
                ColumnRef::Name(_) if !self.data.has_header => {
                    return Err(RegressionError::Config(format!(
                        "{} requires a header row but data.has_header is false",
                        spec.column
                    )));
                }
                _ => {}
            }
        }
        let fraction = self.split.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(RegressionError::InvalidSplit(format!(
                "test_fraction must lie strictly between 0 and 1, got {fraction}"
            )));
        }
        if !(self.solver.max_condition > 1.0) {
            return Err(RegressionError::Config(format!(
                "max_condition must be greater than 1, got {}",
                self.solver.max_condition
            )));
        }
        self.data.delimiter_byte()?;
        Ok(())
    }
}
