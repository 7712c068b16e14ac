use std::path::PathBuf;

use thiserror::Error;

/// Every way a regression run can fail. None of them are recovered locally.
#[derive(Error, Debug)]
pub enum RegressionError {
    /// The input file is missing, unreadable, or not a rectangular table.
    #[error("cannot read {}: {reason}", path.display())]
    DataAccess { path: PathBuf, reason: String },

    /// A column contract does not match the loaded data.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("invalid train/test split: {0}")]
    InvalidSplit(String),

    /// The least-squares problem is singular or too ill-conditioned to trust.
    #[error("numerical error: {0}")]
    Numerical(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("plot rendering failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RegressionError {
    pub(crate) fn data_access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RegressionError::DataAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegressionError>;
