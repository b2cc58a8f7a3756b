//! ASCII grid header: the six-field record in front of every tile.

use crate::numeric::{format_number, parse_count, parse_number};
use crate::{DemError, Result};
use std::fmt::Write as _;

/// Number of header lines in an ASCII grid file.
pub const HEADER_LINES: usize = 6;

/// Field-name convention used for the header lines.
///
/// Both conventions carry the same six fields in the same order; they only
/// differ in how the lower-left coordinate and no-data fields are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeaderConvention {
    /// `ncols nrows xllcenter yllcenter cellsize nodata_value`
    #[default]
    Center,
    /// `ncols nrows xllcorner yllcorner cellsize NODATA_value`
    Corner,
}

impl HeaderConvention {
    /// The six field names, in file order.
    pub fn field_names(&self) -> [&'static str; HEADER_LINES] {
        match self {
            HeaderConvention::Center => [
                "ncols",
                "nrows",
                "xllcenter",
                "yllcenter",
                "cellsize",
                "nodata_value",
            ],
            HeaderConvention::Corner => [
                "ncols",
                "nrows",
                "xllcorner",
                "yllcorner",
                "cellsize",
                "NODATA_value",
            ],
        }
    }
}

impl std::str::FromStr for HeaderConvention {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "center" => Ok(HeaderConvention::Center),
            "corner" => Ok(HeaderConvention::Corner),
            other => Err(format!("unknown header convention '{}' (expected center or corner)", other)),
        }
    }
}

/// Text layout used for reading and writing tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AscFormat {
    /// Header field-name convention.
    pub convention: HeaderConvention,
    /// Separator between a field name and its value, and between grid samples.
    pub separator: char,
}

impl Default for AscFormat {
    fn default() -> Self {
        Self {
            convention: HeaderConvention::Center,
            separator: ' ',
        }
    }
}

impl AscFormat {
    /// Split a line on the separator, dropping empty tokens.
    pub(crate) fn tokens<'a>(&self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        line.split(self.separator)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Geometry of a single tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileHeader {
    /// Number of columns.
    pub ncols: usize,
    /// Number of rows.
    pub nrows: usize,
    /// West coordinate of the lower-left cell.
    pub west: f64,
    /// South coordinate of the lower-left cell.
    pub south: f64,
    /// Ground size of one cell.
    pub cell_size: f64,
    /// Sentinel marking cells without a sample.
    pub no_data: f64,
}

impl TileHeader {
    /// Parse the six header lines of a tile.
    ///
    /// Field names are matched case-insensitively. The six lines may come in
    /// any order, but each field has to appear exactly once.
    pub fn parse<'a, I>(lines: I, format: &AscFormat, source_name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names = format.convention.field_names();
        let mut values: [Option<&'a str>; HEADER_LINES] = [None; HEADER_LINES];

        let malformed = |field: &str, reason: String| DemError::HeaderFieldMissingOrMalformed {
            field: field.to_string(),
            source_name: source_name.to_string(),
            reason,
        };

        for line in lines.into_iter().take(HEADER_LINES) {
            let mut tokens = format.tokens(line);
            let name = tokens.next().unwrap_or_default();
            let idx = names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(name))
                .ok_or_else(|| malformed(name, format!("unexpected header line '{}'", line.trim())))?;
            if values[idx].is_some() {
                return Err(malformed(names[idx], "field appears more than once".to_string()));
            }
            let value = tokens
                .next()
                .ok_or_else(|| malformed(names[idx], "missing value".to_string()))?;
            values[idx] = Some(value);
        }

        let field = |idx: usize| -> Result<&'a str> {
            values[idx].ok_or_else(|| malformed(names[idx], "field not present".to_string()))
        };
        let count = |idx: usize| -> Result<usize> {
            parse_count(field(idx)?).map_err(|e| malformed(names[idx], e.to_string()))
        };
        let number = |idx: usize| -> Result<f64> {
            parse_number(field(idx)?).map_err(|e| malformed(names[idx], e.to_string()))
        };

        let header = TileHeader {
            ncols: count(0)?,
            nrows: count(1)?,
            west: number(2)?,
            south: number(3)?,
            cell_size: number(4)?,
            no_data: number(5)?,
        };

        if !(header.cell_size > 0.0) {
            return Err(malformed(names[4], format!("cell size must be positive, got {}", header.cell_size)));
        }

        Ok(header)
    }

    /// Render the six header lines, each terminated by a newline.
    pub fn to_text(&self, format: &AscFormat) -> String {
        let names = format.convention.field_names();
        let values = [
            self.ncols.to_string(),
            self.nrows.to_string(),
            format_number(self.west),
            format_number(self.south),
            format_number(self.cell_size),
            format_number(self.no_data),
        ];

        let mut out = String::new();
        for (name, value) in names.iter().zip(values.iter()) {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{}{}{}", name, format.separator, value);
        }
        out
    }
}
