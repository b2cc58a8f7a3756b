//! # dtmerge-dem
//!
//! Reader, writer and mosaic assembly for ASCII grid terrain tiles.
//!
//! This crate merges adjacent digital terrain model (DTM) tiles stored as
//! ASCII grids into a single contiguous raster.
//!
//! ## Overview
//!
//! ### ASCII Grid Tiles
//!
//! Every tile is a text file with six header lines followed by `nrows` lines
//! of `ncols` samples each, northernmost row first:
//!
//! ```text
//! ncols 3
//! nrows 2
//! xllcenter 100
//! yllcenter 200
//! cellsize 10
//! nodata_value -9999
//! 1 2 3
//! 4 5 6
//! ```
//!
//! The coordinate fields are spelled either `xllcenter`/`yllcenter` or
//! `xllcorner`/`yllcorner` (see [`HeaderConvention`]), and the separator is
//! configurable through [`AscFormat`].
//!
//! ### Mosaic Assembly
//!
//! Tiles are assumed to form a regular, gap-free mosaic of identical cell
//! size. A merge runs these steps:
//!
//! 1. [`Statistics`] - mean tile size and cell size, coordinate extrema and the
//!    shared no-data value
//! 2. [`MosaicLayout`] - tile counts along each axis
//! 3. [`TileArrangement`] - rows north to south, tiles west to east
//! 4. [`Canvas`] - output grid filled with no-data
//! 5. placement - tiles copied in south to north, the first tile to reach a
//!    cell keeps it
//! 6. [`output_header`] - header for the merged tile
//!
//! ## Examples
//!
//! ```no_run
//! use dtmerge_dem::{merge_directory, MergeOptions};
//!
//! let merged = merge_directory("tiles", "out", &MergeOptions::default())?;
//! println!(
//!     "Merged {} tiles into {}",
//!     merged.report.placement.tiles,
//!     merged.output_path.display()
//! );
//! # Ok::<(), dtmerge_dem::DemError>(())
//! ```
//!
//! Tiles already in memory can be merged directly:
//!
//! ```no_run
//! use dtmerge_dem::{merge_datasets, AscFormat, AscTile, Dataset, DatasetSet};
//!
//! let format = AscFormat::default();
//! let mut datasets = DatasetSet::new();
//! datasets.insert(Dataset::new("west", AscTile::from_file("west.asc", &format)?))?;
//! datasets.insert(Dataset::new("east", AscTile::from_file("east.asc", &format)?))?;
//!
//! let (merged, _report) = merge_datasets(&datasets)?;
//! merged.write_file("merged.asc", &format)?;
//! # Ok::<(), dtmerge_dem::DemError>(())
//! ```

mod canvas;
mod dataset;
mod error;
mod header;
mod layout;
mod merge;
pub mod numeric;
mod stats;
mod tile;

pub use canvas::{Canvas, ExtremalTiles, PlacementSummary};
pub use dataset::{dataset_id, discover_tile_files, load_directory, Dataset, DatasetSet, DEFAULT_EXTENSION};
pub use error::DemError;
pub use header::{AscFormat, HeaderConvention, TileHeader, HEADER_LINES};
pub use layout::{MosaicLayout, TileArrangement};
pub use merge::{
    merge_datasets, merge_directory, output_header, DirectoryMerge, MergeOptions, MergeReport,
    DEFAULT_OUTPUT_FILE_NAME,
};
pub use stats::Statistics;
pub use tile::{AscTile, TileGrid};

/// Result type for DTM operations.
pub type Result<T> = std::result::Result<T, DemError>;
