//! The merge pipeline: statistics, layout, ordering, canvas, placement and
//! the output header, plus directory-level load and export.

use crate::canvas::{Canvas, ExtremalTiles, PlacementSummary};
use crate::dataset::{load_directory, DatasetSet, DEFAULT_EXTENSION};
use crate::header::{AscFormat, TileHeader};
use crate::layout::{check_capacity, MosaicLayout, TileArrangement};
use crate::stats::Statistics;
use crate::tile::{AscTile, TileGrid};
use crate::{DemError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Default name of the merged output file.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "merged_dtm.asc";

/// Settings for a directory merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    /// Header convention and separator for input and output.
    pub format: AscFormat,
    /// Extension of tile files to pick up.
    pub extension: String,
    /// Name of the output file inside the output directory.
    pub output_file_name: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            format: AscFormat::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
        }
    }
}

/// Summary of one merge run.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Number of datasets merged.
    pub datasets: usize,
    /// Aggregated statistics.
    pub statistics: Statistics,
    /// Inferred mosaic layout.
    pub layout: MosaicLayout,
    /// Tile arrangement used for placement.
    pub arrangement: TileArrangement,
    /// Placement counters.
    pub placement: PlacementSummary,
    /// Time spent merging.
    pub merge_time: Duration,
}

/// Result of a directory merge.
#[derive(Debug, Clone)]
pub struct DirectoryMerge {
    /// Where the merged tile was written.
    pub output_path: PathBuf,
    /// Merge details.
    pub report: MergeReport,
    /// Time spent loading tiles.
    pub load_time: Duration,
    /// Time spent writing the output.
    pub export_time: Duration,
}

/// Header of the merged tile: canvas shape plus the aggregated origin, cell
/// size and no-data value.
pub fn output_header(canvas: &Canvas, stats: &Statistics) -> TileHeader {
    let header = TileHeader {
        ncols: canvas.width(),
        nrows: canvas.height(),
        west: stats.min_x,
        south: stats.min_y,
        cell_size: stats.mean_cell_size,
        no_data: stats.no_data,
    };
    info!(?header, "Created a header for merged DTM");
    header
}

/// Merge a set of datasets into one tile.
pub fn merge_datasets(datasets: &DatasetSet) -> Result<(AscTile, MergeReport)> {
    let start = Instant::now();

    let statistics = Statistics::compute(datasets)?;
    let layout = MosaicLayout::infer(&statistics)?;
    check_capacity(&layout, datasets.len());

    let arrangement = TileArrangement::resolve(datasets, layout.tiles_x);
    let extremal = ExtremalTiles::find(datasets)
        .ok_or_else(|| DemError::EmptyInput("no tiles to merge".to_string()))?;

    let mut canvas = Canvas::build(&statistics, datasets, &extremal)?;
    let placement = canvas.place_tiles(&arrangement, datasets, &statistics)?;

    let header = output_header(&canvas, &statistics);
    let grid: TileGrid = canvas.into_grid();

    let merge_time = start.elapsed();
    info!(
        tiles = placement.tiles,
        cells_written = placement.cells_written,
        cells_skipped = placement.cells_skipped,
        "Merging DTMs - execution time: {:.1} [s]",
        merge_time.as_secs_f64()
    );

    let report = MergeReport {
        datasets: datasets.len(),
        statistics,
        layout,
        arrangement,
        placement,
        merge_time,
    };

    Ok((AscTile { header, grid }, report))
}

/// Load every tile in `input_dir`, merge them and write the result into
/// `output_dir`.
///
/// Nothing is written unless the whole merge succeeds.
pub fn merge_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &MergeOptions,
) -> Result<DirectoryMerge> {
    let load_start = Instant::now();
    let datasets = load_directory(input_dir, &options.format, &options.extension)?;
    let load_time = load_start.elapsed();

    let (merged, report) = merge_datasets(&datasets)?;

    let output_path = output_dir.as_ref().join(&options.output_file_name);
    info!(path = %output_path.display(), "Exporting final DTM");
    let export_start = Instant::now();
    merged.write_file(&output_path, &options.format)?;
    let export_time = export_start.elapsed();
    info!(
        "Exporting DTM - execution time: {:.1} [s]",
        export_time.as_secs_f64()
    );

    Ok(DirectoryMerge {
        output_path,
        report,
        load_time,
        export_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn tile(ncols: usize, nrows: usize, west: f64, south: f64, cell: f64, no_data: f64, fill: f64) -> AscTile {
        AscTile {
            header: TileHeader {
                ncols,
                nrows,
                west,
                south,
                cell_size: cell,
                no_data,
            },
            grid: TileGrid::filled(nrows, ncols, fill),
        }
    }

    #[test]
    fn test_single_tile_reproduces_itself() {
        let input = AscTile {
            header: TileHeader {
                ncols: 3,
                nrows: 2,
                west: 100.0,
                south: 200.0,
                cell_size: 10.0,
                no_data: -1.0,
            },
            grid: TileGrid::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap(),
        };
        let mut set = DatasetSet::new();
        set.insert(Dataset::new("only", input.clone())).unwrap();

        let (merged, report) = merge_datasets(&set).unwrap();
        assert_eq!(merged, input);
        assert_eq!(report.layout, MosaicLayout { tiles_x: 1, tiles_y: 1 });
        assert_eq!(report.datasets, 1);
    }

    #[test]
    fn test_output_header_from_statistics() {
        let mut set = DatasetSet::new();
        set.insert(Dataset::new("a", tile(2, 2, 10.0, 20.0, 1.0, -9999.0, 1.0))).unwrap();
        set.insert(Dataset::new("b", tile(2, 2, 12.0, 20.0, 1.0, -9999.0, 2.0))).unwrap();

        let (merged, _) = merge_datasets(&set).unwrap();
        assert_eq!(
            merged.header,
            TileHeader {
                ncols: 4,
                nrows: 2,
                west: 10.0,
                south: 20.0,
                cell_size: 1.0,
                no_data: -9999.0,
            }
        );
    }

    #[test]
    fn test_empty_set_fails() {
        assert!(matches!(
            merge_datasets(&DatasetSet::new()),
            Err(DemError::EmptyInput(_))
        ));
    }
}
