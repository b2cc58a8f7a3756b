//! Single ASCII grid tile representation.

use crate::header::{AscFormat, TileHeader, HEADER_LINES};
use crate::numeric::{format_number, parse_number};
use crate::{DemError, Result};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A rectangular grid of samples.
///
/// Samples are stored in row-major order, north to south and west to east,
/// so row 0 is the northernmost row.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl TileGrid {
    /// Create a grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a grid from a list of rows.
    ///
    /// Returns `None` if the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let nrows = rows.len();
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            rows: nrows,
            cols,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Sample at (row, col), or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row of samples.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutable access to one row of samples.
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over rows from north to south.
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, f64> {
        // chunks_exact panics on zero, and an empty grid has no rows anyway.
        self.data.chunks_exact(self.cols.max(1))
    }

    /// All samples in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// A tile loaded from an ASCII grid file: header plus samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AscTile {
    /// Header describing the tile geometry.
    pub header: TileHeader,
    /// Samples, shaped `header.nrows` x `header.ncols`.
    pub grid: TileGrid,
}

impl AscTile {
    /// Load a tile from an ASCII grid file.
    pub fn from_file<P: AsRef<Path>>(path: P, format: &AscFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file), format, &path.display().to_string())
    }

    /// Load a tile from any buffered reader.
    ///
    /// `source_name` is only used in error messages.
    pub fn from_reader<R: BufRead>(reader: R, format: &AscFormat, source_name: &str) -> Result<Self> {
        let mut lines = reader.lines();

        let mut header_lines = Vec::with_capacity(HEADER_LINES);
        for line in lines.by_ref().take(HEADER_LINES) {
            header_lines.push(line?);
        }
        let header = TileHeader::parse(header_lines.iter().map(String::as_str), format, source_name)?;

        let malformed = |reason: String| DemError::MalformedGrid {
            source_name: source_name.to_string(),
            reason,
        };

        let mut data = Vec::with_capacity(header.nrows * header.ncols);
        let mut rows_read = 0;
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if rows_read == header.nrows {
                return Err(malformed(format!("more than {} data rows", header.nrows)));
            }

            let before = data.len();
            for token in format.tokens(&line) {
                data.push(parse_number(token)?);
            }
            let found = data.len() - before;
            if found != header.ncols {
                return Err(malformed(format!(
                    "row {} has {} samples, expected {}",
                    rows_read, found, header.ncols
                )));
            }
            rows_read += 1;
        }

        if rows_read != header.nrows {
            return Err(malformed(format!(
                "found {} data rows, expected {}",
                rows_read, header.nrows
            )));
        }

        Ok(Self {
            grid: TileGrid {
                data,
                rows: header.nrows,
                cols: header.ncols,
            },
            header,
        })
    }

    /// Write the tile as an ASCII grid to any writer.
    pub fn write_to<W: Write>(&self, mut writer: W, format: &AscFormat) -> Result<()> {
        writer.write_all(self.header.to_text(format).as_bytes())?;

        let mut line = String::new();
        for row in self.grid.iter_rows() {
            line.clear();
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    line.push(format.separator);
                }
                line.push_str(&format_number(*value));
            }
            line.push('\n');
            writer.write_all(line.as_bytes())?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write the tile to a file.
    ///
    /// The data goes to a temporary file next to `path` which is renamed into
    /// place once complete, so a failed write never leaves a truncated output.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, format: &AscFormat) -> Result<()> {
        let path = path.as_ref();
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".partial");
        let tmp_path = Path::new(&tmp_name);

        let result = fs::File::create(tmp_path)
            .map_err(DemError::from)
            .and_then(|file| self.write_to(BufWriter::new(file), format));

        if let Err(e) = result {
            let _ = fs::remove_file(tmp_path);
            return Err(e);
        }

        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Dimensions as (columns, rows).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.header.ncols, self.header.nrows)
    }
}
