//! Mosaic layout inference and tile ordering.
//!
//! The layout is a heuristic: the X extent is divided by the mean *row* count
//! and the Y extent by the mean *column* count. That pairing only gives the
//! right answer for square tiles of identical dimensions and is kept as is.

use crate::dataset::DatasetSet;
use crate::stats::Statistics;
use crate::{DemError, Result};
use tracing::{debug, info, warn};

/// Number of tiles along each axis of the mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicLayout {
    /// Tiles along the X (west-east) axis.
    pub tiles_x: usize,
    /// Tiles along the Y (south-north) axis.
    pub tiles_y: usize,
}

impl MosaicLayout {
    /// Infer the layout from aggregated statistics.
    pub fn infer(stats: &Statistics) -> Result<Self> {
        if stats.mean_rows == 0 || stats.mean_cols == 0 {
            return Err(DemError::DegenerateStatistics(format!(
                "mean tile size is {} rows x {} cols",
                stats.mean_rows, stats.mean_cols
            )));
        }

        let tiles_x = axis_count(stats.max_x - stats.min_x, stats.mean_rows, stats.mean_cell_size)
            .ok_or_else(|| out_of_range("X", stats.min_x, stats.max_x))?;
        let tiles_y = axis_count(stats.max_y - stats.min_y, stats.mean_cols, stats.mean_cell_size)
            .ok_or_else(|| out_of_range("Y", stats.min_y, stats.max_y))?;

        info!(tiles_x, tiles_y, "Checked the spatial distribution of datasets");
        Ok(Self { tiles_x, tiles_y })
    }

    /// Number of tile slots in the layout.
    pub fn capacity(&self) -> usize {
        self.tiles_x.saturating_mul(self.tiles_y)
    }
}

fn out_of_range(axis: &str, min: f64, max: f64) -> DemError {
    DemError::DegenerateStatistics(format!("{} extent {} .. {} gives no usable tile count", axis, min, max))
}

/// `round(extent / count * cell) + 1`, rounding half to even. `None` when the
/// result does not fit a `usize`.
fn axis_count(extent: f64, count: usize, cell_size: f64) -> Option<usize> {
    let steps = (extent / count as f64 * cell_size).round_ties_even();
    if !steps.is_finite() || steps >= usize::MAX as f64 {
        return None;
    }
    (steps.max(0.0) as usize).checked_add(1)
}

/// Dataset identifiers arranged in rows.
///
/// Rows run north to south; identifiers within a row run west to east.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileArrangement {
    rows: Vec<Vec<String>>,
}

impl TileArrangement {
    /// Sort datasets into rows of `tiles_x` identifiers.
    ///
    /// Datasets are stably sorted by south coordinate, descending, then cut
    /// into consecutive chunks of `tiles_x`; each chunk is stably sorted by
    /// west coordinate, ascending. If the dataset count is not a multiple of
    /// `tiles_x` the last row is shorter than the others.
    pub fn resolve(datasets: &DatasetSet, tiles_x: usize) -> Self {
        let chunk = tiles_x.max(1);

        let mut by_south: Vec<(&str, f64, f64)> = datasets
            .iter()
            .map(|d| (d.id.as_str(), d.header.west, d.header.south))
            .collect();
        by_south.sort_by(|a, b| b.2.total_cmp(&a.2));

        let rows: Vec<Vec<String>> = by_south
            .chunks_mut(chunk)
            .map(|row| {
                row.sort_by(|a, b| a.1.total_cmp(&b.1));
                row.iter().map(|(id, _, _)| id.to_string()).collect::<Vec<_>>()
            })
            .collect();

        if datasets.len() % chunk != 0 {
            warn!(
                datasets = datasets.len(),
                tiles_x = chunk,
                "Dataset count is not a multiple of tiles along X, last row is ragged"
            );
        }

        info!(rows = rows.len(), "Sorted datasets by Y (descending) and X (ascending)");
        for (i, row) in rows.iter().enumerate() {
            debug!(row = i, tiles = ?row, "Arrangement row");
        }

        Self { rows }
    }

    /// Rows from north to south.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Identifiers in placement order: southernmost row first, west to east
    /// within each row.
    pub fn placement_order(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().rev().flat_map(|row| row.iter().map(String::as_str))
    }

    /// Whether the last row is shorter than the first.
    pub fn is_ragged(&self) -> bool {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => first.len() != last.len(),
            _ => false,
        }
    }

    /// Total number of identifiers.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Whether the arrangement is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Warn when the layout has fewer slots than there are datasets.
pub(crate) fn check_capacity(layout: &MosaicLayout, datasets: usize) {
    if layout.capacity() < datasets {
        warn!(
            tiles_x = layout.tiles_x,
            tiles_y = layout.tiles_y,
            datasets,
            "Inferred layout has fewer slots than datasets, tile rows may be misaligned"
        );
    }
}
