use std::fmt;

use nalgebra::{DMatrix, DVector};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A parsed cell. Non-numeric content is kept so the selector can report
/// exactly which column broke the numeric contract.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Interpret a raw field the way a numeric table reader would.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, "NaN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A rectangular table. Every row has `column_names.len()` cells.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Header names, or `"0"`, `"1"`, … for headerless files.
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    pub has_header: bool,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.column_names.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.width())
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }
}

// ---------------------------------------------------------------------------
// Design – features and target ready for fitting
// ---------------------------------------------------------------------------

/// Feature matrix and target vector cut out of a [`Dataset`].
#[derive(Debug, Clone)]
pub struct Design {
    /// One row per sample, one column per feature in `feature_names` order.
    pub x: DMatrix<f64>,
    pub y: DVector<f64>,
    pub feature_names: Vec<String>,
    pub target_name: String,
    /// Source row index of each sample (zero-based, header excluded).
    pub row_ids: Vec<usize>,
}

impl Design {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Build a design directly from row-major features, labelling rows 0..n.
    pub fn from_rows(
        rows: &[Vec<f64>],
        y: &[f64],
        feature_names: Vec<String>,
        target_name: &str,
    ) -> Self {
        let p = feature_names.len();
        let x = DMatrix::from_fn(rows.len(), p, |i, j| rows[i][j]);
        Design {
            x,
            y: DVector::from_column_slice(y),
            feature_names,
            target_name: target_name.to_string(),
            row_ids: (0..y.len()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells() {
        assert_eq!(CellValue::parse(" 1.5e-6 "), CellValue::Number(1.5e-6));
        assert_eq!(CellValue::parse(""), CellValue::Missing);
        assert_eq!(CellValue::parse("abc"), CellValue::Text("abc".to_string()));
        assert_eq!(CellValue::parse("-3").as_f64(), Some(-3.0));
    }

    #[test]
    fn head_is_clamped() {
        let ds = Dataset {
            column_names: vec!["a".to_string()],
            rows: vec![vec![CellValue::Number(1.0)], vec![CellValue::Number(2.0)]],
            has_header: true,
        };
        assert_eq!(ds.head(5).len(), 2);
        assert_eq!(ds.shape(), (2, 1));
    }
}
