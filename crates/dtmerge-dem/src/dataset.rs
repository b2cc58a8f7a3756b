//! Tile discovery and the ordered set of loaded datasets.

use crate::header::{AscFormat, TileHeader};
use crate::tile::{AscTile, TileGrid};
use crate::{DemError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Default tile file extension.
pub const DEFAULT_EXTENSION: &str = "asc";

/// One input tile: identifier, header and samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// File name without extension, unique within a merge run.
    pub id: String,
    /// Tile geometry.
    pub header: TileHeader,
    /// Tile samples.
    pub grid: TileGrid,
}

impl Dataset {
    /// Pair an identifier with a loaded tile.
    pub fn new(id: impl Into<String>, tile: AscTile) -> Self {
        Self {
            id: id.into(),
            header: tile.header,
            grid: tile.grid,
        }
    }
}

/// All datasets of one merge run, kept in load order.
///
/// Load order matters: it breaks ties when sorting tiles and when picking the
/// tile with the largest coordinate.
#[derive(Debug, Default, Clone)]
pub struct DatasetSet {
    datasets: Vec<Dataset>,
    index: HashMap<String, usize>,
}

impl DatasetSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset, rejecting a duplicate identifier or a grid whose shape
    /// differs from its header.
    pub fn insert(&mut self, dataset: Dataset) -> Result<()> {
        if self.index.contains_key(&dataset.id) {
            return Err(DemError::DuplicateDataset(dataset.id));
        }
        let (rows, cols) = (dataset.grid.rows(), dataset.grid.cols());
        if rows != dataset.header.nrows || cols != dataset.header.ncols {
            return Err(DemError::MalformedGrid {
                reason: format!(
                    "header declares {} rows x {} cols, grid holds {} x {}",
                    dataset.header.nrows, dataset.header.ncols, rows, cols
                ),
                source_name: dataset.id,
            });
        }
        self.index.insert(dataset.id.clone(), self.datasets.len());
        self.datasets.push(dataset);
        Ok(())
    }

    /// Look up a dataset by identifier.
    pub fn get(&self, id: &str) -> Option<&Dataset> {
        self.index.get(id).map(|&i| &self.datasets[i])
    }

    /// Iterate over datasets in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Dataset> {
        self.datasets.iter()
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl<'a> IntoIterator for &'a DatasetSet {
    type Item = &'a Dataset;
    type IntoIter = std::slice::Iter<'a, Dataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}

/// List tile files in a directory.
///
/// Only regular files whose extension matches `extension` (case-insensitive)
/// are returned, sorted by file name.
pub fn discover_tile_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Identifier of a tile file: its file name without extension.
pub fn dataset_id(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            DemError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("tile path has no usable file name: {}", path.display()),
            ))
        })
}

/// Load every tile in a directory.
///
/// Returns [`DemError::EmptyInput`] if the directory holds no matching files.
pub fn load_directory<P: AsRef<Path>>(dir: P, format: &AscFormat, extension: &str) -> Result<DatasetSet> {
    let dir = dir.as_ref();
    let paths = discover_tile_files(dir, extension)?;

    if paths.is_empty() {
        return Err(DemError::EmptyInput(format!(
            "no *.{} files in {}",
            extension,
            dir.display()
        )));
    }

    info!(dir = %dir.display(), count = paths.len(), "Loading datasets");
    let start = Instant::now();

    let mut set = DatasetSet::new();
    for (i, path) in paths.iter().enumerate() {
        let id = dataset_id(path)?;
        info!("Loading dataset #{} - {}", i + 1, id);
        let tile = AscTile::from_file(path, format)?;
        set.insert(Dataset::new(id, tile))?;
    }

    info!(
        count = set.len(),
        "Data loading - execution time: {:.1} [s]",
        start.elapsed().as_secs_f64()
    );
    Ok(set)
}
