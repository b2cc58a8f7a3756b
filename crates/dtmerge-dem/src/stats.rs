//! Cross-tile summary statistics.

use crate::dataset::DatasetSet;
use crate::{DemError, Result};
use tracing::info;

/// Relative tolerance when comparing cell sizes of different tiles.
const CELL_SIZE_TOLERANCE: f64 = 1e-9;

/// Aggregate over the headers of all datasets in a merge run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Mean column count, truncated.
    pub mean_cols: usize,
    /// Mean row count, truncated.
    pub mean_rows: usize,
    /// Mean cell size, truncated to a whole number.
    pub mean_cell_size: f64,
    /// Smallest west coordinate.
    pub min_x: f64,
    /// Largest west coordinate.
    pub max_x: f64,
    /// Smallest south coordinate.
    pub min_y: f64,
    /// Largest south coordinate.
    pub max_y: f64,
    /// Mean no-data value, rounded.
    ///
    /// All tiles are expected to share one sentinel; differing sentinels are
    /// averaged without complaint.
    pub no_data: f64,
}

impl Statistics {
    /// Compute statistics over every header in `datasets`.
    ///
    /// Fails on an empty set, on tiles whose cell sizes differ, and when the
    /// truncated mean cell size is zero.
    pub fn compute(datasets: &DatasetSet) -> Result<Self> {
        let first = datasets
            .iter()
            .next()
            .ok_or_else(|| DemError::EmptyInput("no tile headers to aggregate".to_string()))?;

        let expected_cell = first.header.cell_size;
        let mut sum_cols = 0.0;
        let mut sum_rows = 0.0;
        let mut sum_cell = 0.0;
        let mut sum_no_data = 0.0;
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for dataset in datasets {
            let h = &dataset.header;

            if (h.cell_size - expected_cell).abs() > CELL_SIZE_TOLERANCE * expected_cell.abs() {
                return Err(DemError::InconsistentCellSize {
                    tile: dataset.id.clone(),
                    expected: expected_cell,
                    found: h.cell_size,
                });
            }

            sum_cols += h.ncols as f64;
            sum_rows += h.nrows as f64;
            sum_cell += h.cell_size;
            sum_no_data += h.no_data;
            min_x = min_x.min(h.west);
            max_x = max_x.max(h.west);
            min_y = min_y.min(h.south);
            max_y = max_y.max(h.south);
        }

        let n = datasets.len() as f64;
        let stats = Statistics {
            mean_cols: (sum_cols / n).trunc() as usize,
            mean_rows: (sum_rows / n).trunc() as usize,
            mean_cell_size: (sum_cell / n).trunc(),
            min_x,
            max_x,
            min_y,
            max_y,
            no_data: (sum_no_data / n).round(),
        };

        if stats.mean_cell_size <= 0.0 {
            return Err(DemError::DegenerateStatistics(format!(
                "mean cell size {} truncates to zero",
                sum_cell / n
            )));
        }

        info!(
            mean_cols = stats.mean_cols,
            mean_rows = stats.mean_rows,
            mean_cell_size = stats.mean_cell_size,
            min_x = stats.min_x,
            max_x = stats.max_x,
            min_y = stats.min_y,
            max_y = stats.max_y,
            no_data = stats.no_data,
            "Calculated statistics for datasets"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::header::TileHeader;
    use crate::tile::{AscTile, TileGrid};
    use approx::assert_relative_eq;

    fn dataset(id: &str, ncols: usize, nrows: usize, west: f64, south: f64, cell: f64, no_data: f64) -> Dataset {
        Dataset::new(
            id,
            AscTile {
                header: TileHeader {
                    ncols,
                    nrows,
                    west,
                    south,
                    cell_size: cell,
                    no_data,
                },
                grid: TileGrid::filled(nrows, ncols, 0.0),
            },
        )
    }

    #[test]
    fn test_statistics() {
        let mut set = DatasetSet::new();
        set.insert(dataset("a", 4, 3, 10.0, 20.0, 2.0, -9999.0)).unwrap();
        set.insert(dataset("b", 5, 4, 18.5, 20.0, 2.0, -9999.0)).unwrap();
        set.insert(dataset("c", 4, 3, 10.0, 26.25, 2.0, -9999.0)).unwrap();

        let stats = Statistics::compute(&set).unwrap();
        // 13 / 3 and 10 / 3 truncate
        assert_eq!(stats.mean_cols, 4);
        assert_eq!(stats.mean_rows, 3);
        assert_relative_eq!(stats.mean_cell_size, 2.0);
        assert_relative_eq!(stats.min_x, 10.0);
        assert_relative_eq!(stats.max_x, 18.5);
        assert_relative_eq!(stats.min_y, 20.0);
        assert_relative_eq!(stats.max_y, 26.25);
        assert_relative_eq!(stats.no_data, -9999.0);
    }

    #[test]
    fn test_mean_cell_size_is_truncated() {
        let mut set = DatasetSet::new();
        set.insert(dataset("a", 2, 2, 0.0, 0.0, 2.5, -1.0)).unwrap();
        let stats = Statistics::compute(&set).unwrap();
        assert_relative_eq!(stats.mean_cell_size, 2.0);
    }

    #[test]
    fn test_no_data_is_rounded_mean() {
        let mut set = DatasetSet::new();
        set.insert(dataset("a", 2, 2, 0.0, 0.0, 1.0, -9999.0)).unwrap();
        set.insert(dataset("b", 2, 2, 2.0, 0.0, 1.0, -9998.0)).unwrap();
        let stats = Statistics::compute(&set).unwrap();
        // -9998.5 rounds away from zero
        assert_relative_eq!(stats.no_data, -9999.0);
    }

    #[test]
    fn test_empty_set() {
        let set = DatasetSet::new();
        assert!(matches!(Statistics::compute(&set), Err(DemError::EmptyInput(_))));
    }

    #[test]
    fn test_inconsistent_cell_size() {
        let mut set = DatasetSet::new();
        set.insert(dataset("a", 2, 2, 0.0, 0.0, 1.0, -1.0)).unwrap();
        set.insert(dataset("b", 2, 2, 2.0, 0.0, 2.0, -1.0)).unwrap();
        let err = Statistics::compute(&set).unwrap_err();
        assert!(matches!(err, DemError::InconsistentCellSize { tile, .. } if tile == "b"));
    }

    #[test]
    fn test_sub_unit_cell_size_is_degenerate() {
        let mut set = DatasetSet::new();
        set.insert(dataset("a", 2, 2, 0.0, 0.0, 0.5, -1.0)).unwrap();
        assert!(matches!(
            Statistics::compute(&set),
            Err(DemError::DegenerateStatistics(_))
        ));
    }
}
