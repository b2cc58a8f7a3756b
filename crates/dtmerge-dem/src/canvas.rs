//! Output canvas allocation and tile placement.

use crate::dataset::{Dataset, DatasetSet};
use crate::layout::TileArrangement;
use crate::stats::Statistics;
use crate::tile::TileGrid;
use crate::{DemError, Result};
use tracing::{debug, info};

/// Tiles holding the largest west and south coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtremalTiles {
    /// Identifier of the tile with the largest west coordinate.
    pub max_west: String,
    /// Identifier of the tile with the largest south coordinate.
    pub max_south: String,
}

impl ExtremalTiles {
    /// Find the extremal tiles. Ties go to the earliest tile in load order.
    pub fn find(datasets: &DatasetSet) -> Option<Self> {
        let mut iter = datasets.iter();
        let first = iter.next()?;
        let mut max_west = first;
        let mut max_south = first;

        for dataset in iter {
            if dataset.header.west > max_west.header.west {
                max_west = dataset;
            }
            if dataset.header.south > max_south.header.south {
                max_south = dataset;
            }
        }

        debug!(max_west = %max_west.id, max_south = %max_south.id, "Found tiles with max X and max Y");
        Some(Self {
            max_west: max_west.id.clone(),
            max_south: max_south.id.clone(),
        })
    }
}

/// The merged output grid, filled with the no-data sentinel until tiles are
/// placed into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    grid: TileGrid,
    no_data: f64,
}

/// Outcome of placing all tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementSummary {
    /// Tiles copied into the canvas.
    pub tiles: usize,
    /// Canvas cells that received a sample. Samples equal to the no-data
    /// sentinel are not counted.
    pub cells_written: usize,
    /// Samples skipped because their cell was already written.
    pub cells_skipped: usize,
}

impl Canvas {
    /// Allocate a canvas spanning every tile.
    ///
    /// Height is the Y extent in cells plus the row count of the northernmost
    /// tile, width the X extent in cells plus the column count of the
    /// easternmost tile.
    pub fn build(stats: &Statistics, datasets: &DatasetSet, extremal: &ExtremalTiles) -> Result<Self> {
        let lookup = |id: &str| {
            datasets
                .get(id)
                .ok_or_else(|| DemError::UnknownDataset(id.to_string()))
        };
        let north = lookup(&extremal.max_south)?;
        let east = lookup(&extremal.max_west)?;

        let span = |axis: &str, min: f64, max: f64, tile_cells: usize| {
            cells_between(min, max, stats.mean_cell_size)
                .and_then(|cells| cells.checked_add(tile_cells))
                .ok_or_else(|| {
                    DemError::DegenerateStatistics(format!("{} extent {} .. {} is too large for a canvas", axis, min, max))
                })
        };
        let rows = span("Y", stats.min_y, stats.max_y, north.header.nrows)?;
        let cols = span("X", stats.min_x, stats.max_x, east.header.ncols)?;

        let fits = rows
            .checked_mul(cols)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(DemError::DegenerateStatistics(format!(
                "canvas of {} rows x {} cols cannot be allocated",
                rows, cols
            )));
        }

        info!(rows, cols, no_data = stats.no_data, "Prepared final DTM structure");
        Ok(Self {
            grid: TileGrid::filled(rows, cols, stats.no_data),
            no_data: stats.no_data,
        })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    /// The no-data sentinel the canvas was filled with.
    pub fn no_data(&self) -> f64 {
        self.no_data
    }

    /// Read-only view of the canvas samples.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Finish placement and take the grid.
    pub fn into_grid(self) -> TileGrid {
        self.grid
    }

    /// Copy every tile into the canvas, in the arrangement's placement order.
    ///
    /// A cell is only written while it still holds the no-data sentinel, so
    /// where tiles overlap the one placed first keeps its samples.
    pub fn place_tiles(
        &mut self,
        arrangement: &TileArrangement,
        datasets: &DatasetSet,
        stats: &Statistics,
    ) -> Result<PlacementSummary> {
        let mut summary = PlacementSummary::default();

        for (n, id) in arrangement.placement_order().enumerate() {
            let dataset = datasets
                .get(id)
                .ok_or_else(|| DemError::UnknownDataset(id.to_string()))?;
            info!("Processing data from dataset #{} - {}", n + 1, id);

            let (written, skipped) = self.place(dataset, stats)?;
            summary.tiles += 1;
            summary.cells_written += written;
            summary.cells_skipped += skipped;
        }

        Ok(summary)
    }

    /// Copy one tile, returning (cells written, cells skipped).
    fn place(&mut self, dataset: &Dataset, stats: &Statistics) -> Result<(usize, usize)> {
        let header = &dataset.header;
        let height = self.height() as i64;
        let width = self.width() as i64;

        let out_of_bounds = |row: i64, col: i64| DemError::OutOfBounds {
            tile: dataset.id.clone(),
            row,
            col,
            height: self.height(),
            width: self.width(),
        };

        let offset = |from: f64, to: f64| {
            cells_between(from, to, stats.mean_cell_size).and_then(|cells| i64::try_from(cells).ok())
        };
        let (Some(col_offset), Some(rows_from_south)) =
            (offset(stats.min_x, header.west), offset(stats.min_y, header.south))
        else {
            return Err(out_of_bounds(i64::MIN, i64::MAX));
        };
        let nrows = i64::try_from(header.nrows).unwrap_or(i64::MAX);
        let ncols = i64::try_from(header.ncols).unwrap_or(i64::MAX);

        // The header anchors the tile's bottom row; storage row 0 sits
        // nrows - 1 canvas rows above it.
        let bottom_row = height.saturating_sub(rows_from_south).saturating_sub(1);
        let top_row = bottom_row.saturating_sub(nrows.saturating_sub(1));
        let last_col = col_offset.saturating_add(ncols).saturating_sub(1);

        if top_row < 0 || bottom_row >= height {
            return Err(out_of_bounds(top_row.min(bottom_row), col_offset));
        }
        if col_offset < 0 || last_col >= width {
            return Err(out_of_bounds(bottom_row, last_col.max(col_offset)));
        }

        let no_data = self.no_data;
        let col_offset = col_offset as usize;
        let mut written = 0;
        let mut skipped = 0;

        for (k, tile_row) in dataset.grid.iter_rows().enumerate().rev() {
            let canvas_row = top_row as usize + k;
            let target = &mut self.grid.row_mut(canvas_row)[col_offset..col_offset + tile_row.len()];
            for (cell, &sample) in target.iter_mut().zip(tile_row) {
                if sample == no_data {
                    continue;
                }
                if *cell == no_data {
                    *cell = sample;
                    written += 1;
                } else {
                    skipped += 1;
                }
            }
        }

        Ok((written, skipped))
    }
}

/// Whole cells between two coordinates, truncated. `None` when the count is
/// not finite or does not fit a `usize`.
fn cells_between(from: f64, to: f64, cell_size: f64) -> Option<usize> {
    let cells = ((to - from) / cell_size).trunc();
    if !cells.is_finite() || cells >= usize::MAX as f64 {
        return None;
    }
    Some(cells.max(0.0) as usize)
}
