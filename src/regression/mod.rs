//! Model fitting and evaluation.

pub mod correlation;
pub mod metrics;
pub mod ols;

pub use correlation::CorrelationMatrix;
pub use metrics::Metrics;
pub use ols::LinearRegression;
