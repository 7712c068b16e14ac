use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};

use crate::config::{ColumnRef, ColumnSpec};
use crate::error::{RegressionError, Result};

use super::model::{CellValue, Dataset, Design};

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Resolve a column reference to a zero-based position in `dataset`.
pub fn resolve_column(dataset: &Dataset, column: &ColumnRef) -> Result<usize> {
    let width = dataset.width();
    match column {
        ColumnRef::Index(i) if *i < width => Ok(*i),
        ColumnRef::Index(i) => Err(RegressionError::Schema(format!(
            "column #{i} requested but the table has {width} columns"
        ))),
        ColumnRef::FromEnd(k) if (1..=width).contains(k) => Ok(width - k),
        ColumnRef::FromEnd(k) => Err(RegressionError::Schema(format!(
            "column -{k} requested but the table has {width} columns"
        ))),
        ColumnRef::Name(name) => {
            if !dataset.has_header {
                return Err(RegressionError::Schema(format!(
                    "column '{name}' selected by name but the file has no header row"
                )));
            }
            dataset
                .column_names
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| {
                    RegressionError::Schema(format!(
                        "column '{name}' not found; available: {:?}",
                        dataset.column_names
                    ))
                })
        }
    }
}

fn numeric_column(dataset: &Dataset, idx: usize) -> Result<Vec<f64>> {
    dataset
        .column(idx)
        .enumerate()
        .map(|(row, cell)| match cell {
            CellValue::Number(v) if v.is_finite() => Ok(*v),
            CellValue::Number(v) => Err(RegressionError::Schema(format!(
                "column '{}' row {row}: {v} is not a finite number",
                dataset.column_names[idx]
            ))),
            CellValue::Text(s) => Err(RegressionError::Schema(format!(
                "column '{}' row {row}: '{s}' is not a number",
                dataset.column_names[idx]
            ))),
            CellValue::Missing => Err(RegressionError::Schema(format!(
                "column '{}' row {row}: missing value",
                dataset.column_names[idx]
            ))),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Feature / target selection
// ---------------------------------------------------------------------------

/// Slice the feature matrix and target vector out of `dataset`.
///
/// Each column may be selected once, and the target may not double as a
/// feature. All selected cells must be numeric.
pub fn select(dataset: &Dataset, features: &[ColumnSpec], target: &ColumnSpec) -> Result<Design> {
    if features.is_empty() {
        return Err(RegressionError::Schema("no feature columns selected".to_string()));
    }

    let mut seen = BTreeSet::new();
    let mut feature_idx = Vec::with_capacity(features.len());
    for spec in features {
        let idx = resolve_column(dataset, &spec.column)?;
        if !seen.insert(idx) {
            return Err(RegressionError::Schema(format!(
                "column '{}' is selected more than once",
                dataset.column_names[idx]
            )));
        }
        feature_idx.push(idx);
    }

    let target_idx = resolve_column(dataset, &target.column)?;
    if seen.contains(&target_idx) {
        return Err(RegressionError::Schema(format!(
            "target {} resolves to '{}', which is also a feature",
            target.column, dataset.column_names[target_idx]
        )));
    }

    let columns = feature_idx
        .iter()
        .map(|&idx| numeric_column(dataset, idx))
        .collect::<Result<Vec<_>>>()?;
    let y = numeric_column(dataset, target_idx)?;

    let n = dataset.len();
    let x = DMatrix::from_fn(n, columns.len(), |i, j| columns[j][i]);

    let feature_names = features
        .iter()
        .zip(&feature_idx)
        .map(|(spec, &idx)| label_for(dataset, spec, idx))
        .collect();
    let target_name = label_for(dataset, target, target_idx);

    log::debug!(
        "Selected features {:?} and target column {} ({target_name})",
        feature_idx,
        target_idx
    );

    Ok(Design {
        x,
        y: DVector::from_vec(y),
        feature_names,
        target_name,
        row_ids: (0..n).collect(),
    })
}

fn label_for(dataset: &Dataset, spec: &ColumnSpec, idx: usize) -> String {
    spec.label
        .clone()
        .unwrap_or_else(|| dataset.column_names[idx].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataSource;
    use crate::data::loader::load_reader;

    fn table(text: &str, has_header: bool) -> Dataset {
        load_reader(text.as_bytes(), &DataSource::csv("t.csv", has_header)).unwrap()
    }

    #[test]
    fn positional_selection_counts_from_the_end() {
        let ds = table("0,1,2,3,4\n5,6,7,8,9\n", false);
        let design = select(
            &ds,
            &[ColumnSpec::new(ColumnRef::Index(1)), ColumnSpec::new(ColumnRef::Index(2))],
            &ColumnSpec::new(ColumnRef::FromEnd(2)),
        )
        .unwrap();
        assert_eq!(design.x.shape(), (2, 2));
        assert_eq!(design.x[(1, 0)], 6.0);
        assert_eq!(design.y.as_slice(), &[3.0, 8.0]);
        assert_eq!(design.feature_names, vec!["1", "2"]);
        assert_eq!(design.target_name, "3");
    }

    #[test]
    fn named_selection_uses_headers() {
        let ds = table("a,b,out,extra\n1,2,3,4\n", true);
        let design = select(
            &ds,
            &[ColumnSpec::named("b")],
            &ColumnSpec::labeled(ColumnRef::Name("out".to_string()), "Target"),
        )
        .unwrap();
        assert_eq!(design.x[(0, 0)], 2.0);
        assert_eq!(design.target_name, "Target");
    }

    #[test]
    fn missing_column_is_schema_error() {
        let ds = table("a,b\n1,2\n", true);
        let err = select(&ds, &[ColumnSpec::named("zzz")], &ColumnSpec::named("a")).unwrap_err();
        assert!(matches!(err, RegressionError::Schema(_)));

        let err = select(
            &ds,
            &[ColumnSpec::new(ColumnRef::Index(7))],
            &ColumnSpec::named("a"),
        )
        .unwrap_err();
        assert!(matches!(err, RegressionError::Schema(_)));
    }

    #[test]
    fn non_numeric_cells_are_schema_errors() {
        let ds = table("a,b\n1,2\nx,3\n", true);
        let err = select(&ds, &[ColumnSpec::named("a")], &ColumnSpec::named("b")).unwrap_err();
        assert!(matches!(err, RegressionError::Schema(ref m) if m.contains("'x'")));
    }

    #[test]
    fn non_finite_cells_are_schema_errors() {
        for token in ["nan", "NaN", "inf", "-infinity"] {
            let ds = table(&format!("a,b\n1,2\n{token},3\n4,5\n"), true);
            let err = select(&ds, &[ColumnSpec::named("a")], &ColumnSpec::named("b")).unwrap_err();
            assert!(
                matches!(err, RegressionError::Schema(ref m) if m.contains("row 1")),
                "{token}: {err}"
            );

            let ds = table(&format!("a,b\n1,2\n3,{token}\n"), true);
            let err = select(&ds, &[ColumnSpec::named("a")], &ColumnSpec::named("b")).unwrap_err();
            assert!(matches!(err, RegressionError::Schema(_)), "{token}: {err}");
        }
    }

    #[test]
    fn target_overlapping_a_feature_is_rejected() {
        // With 6 columns, -2 is column 4: exactly the drift the rectangle layout risks.
        let ds = table("0,1,2,3,4,5\n", false);
        let features: Vec<_> = (4..6).map(|i| ColumnSpec::new(ColumnRef::Index(i))).collect();
        let err = select(&ds, &features, &ColumnSpec::new(ColumnRef::FromEnd(2))).unwrap_err();
        assert!(matches!(err, RegressionError::Schema(ref m) if m.contains("also a feature")));
    }

    #[test]
    fn duplicate_features_are_rejected() {
        let ds = table("a,b,c\n1,2,3\n", true);
        let err = select(
            &ds,
            &[ColumnSpec::named("a"), ColumnSpec::new(ColumnRef::Index(0))],
            &ColumnSpec::named("c"),
        )
        .unwrap_err();
        assert!(matches!(err, RegressionError::Schema(_)));
    }
}
