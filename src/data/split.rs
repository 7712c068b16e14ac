use nalgebra::{DMatrix, DVector};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SplitConfig;
use crate::error::{RegressionError, Result};

use super::model::Design;

/// One side of a train/test partition.
#[derive(Debug, Clone)]
pub struct Subset {
    pub x: DMatrix<f64>,
    pub y: DVector<f64>,
    /// Source row index of each sample, in subset order.
    pub row_ids: Vec<usize>,
}

impl Subset {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    fn take(design: &Design, positions: &[usize]) -> Self {
        Subset {
            x: design.x.select_rows(positions),
            y: design.y.select_rows(positions),
            row_ids: positions.iter().map(|&p| design.row_ids[p]).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Split {
    pub train: Subset,
    pub test: Subset,
}

/// Number of test rows for `n` samples: the fraction rounded up.
pub fn test_size(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction).ceil() as usize
}

/// Shuffle the rows with a seeded RNG and cut off the test share.
///
/// The first `ceil(n * test_fraction)` permuted rows become the test subset,
/// the rest the training subset. The same design, fraction and seed always
/// give the same partition.
pub fn train_test_split(design: &Design, config: &SplitConfig) -> Result<Split> {
    let fraction = config.test_fraction;
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(RegressionError::InvalidSplit(format!(
            "test fraction must lie strictly between 0 and 1, got {fraction}"
        )));
    }

    let n = design.len();
    let n_test = test_size(n, fraction);
    if n_test == 0 || n_test >= n {
        return Err(RegressionError::InvalidSplit(format!(
            "{n} samples with test fraction {fraction} leave an empty train or test set"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    order.shuffle(&mut rng);

    let (test_pos, train_pos) = order.split_at(n_test);
    log::info!(
        "Split {n} samples into {} train / {} test (seed {})",
        train_pos.len(),
        test_pos.len(),
        config.seed
    );

    Ok(Split {
        train: Subset::take(design, train_pos),
        test: Subset::take(design, test_pos),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn design(n: usize) -> Design {
        let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let y: Vec<f64> = (0..n).map(|i| 10.0 * i as f64).collect();
        Design::from_rows(&rows, &y, vec!["a".into(), "b".into()], "y")
    }

    #[test]
    fn partition_is_disjoint_and_complete() {
        let d = design(23);
        let split = train_test_split(&d, &SplitConfig::default()).unwrap();
        assert_eq!(split.test.len(), 5);
        assert_eq!(split.train.len(), 18);

        let train: BTreeSet<_> = split.train.row_ids.iter().copied().collect();
        let test: BTreeSet<_> = split.test.row_ids.iter().copied().collect();
        assert!(train.is_disjoint(&test));
        let all: BTreeSet<_> = train.union(&test).copied().collect();
        assert_eq!(all, (0..23).collect());
    }

    #[test]
    fn rows_stay_aligned_with_targets() {
        let d = design(10);
        let split = train_test_split(&d, &SplitConfig::default()).unwrap();
        for (k, &id) in split.train.row_ids.iter().enumerate() {
            assert_eq!(split.train.x[(k, 0)], id as f64);
            assert_eq!(split.train.y[k], 10.0 * id as f64);
        }
    }

    #[test]
    fn same_seed_same_partition() {
        let d = design(50);
        let cfg = SplitConfig {
            test_fraction: 0.3,
            seed: 7,
        };
        let a = train_test_split(&d, &cfg).unwrap();
        let b = train_test_split(&d, &cfg).unwrap();
        assert_eq!(a.train.row_ids, b.train.row_ids);
        assert_eq!(a.test.row_ids, b.test.row_ids);
    }

    #[test]
    fn different_seed_changes_partition() {
        let d = design(50);
        let cfg = |seed| SplitConfig {
            test_fraction: 0.2,
            seed,
        };
        let a = train_test_split(&d, &cfg(1)).unwrap();
        let b = train_test_split(&d, &cfg(2)).unwrap();
        assert_ne!(a.test.row_ids, b.test.row_ids);
    }

    #[test]
    fn too_few_rows_is_an_error() {
        let d = design(1);
        let err = train_test_split(&d, &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidSplit(_)));
    }

    #[test]
    fn test_size_rounds_up() {
        assert_eq!(test_size(10, 0.2), 2);
        assert_eq!(test_size(11, 0.2), 3);
        assert_eq!(test_size(4, 0.5), 2);
    }
}
