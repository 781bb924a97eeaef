//! Workbooks: sheets of cell values plus their merged ranges.
//!
//! Real `.xlsx`/`.xlsm` files are read with calamine.  A workbook can also be
//! described by hand in JSON or TOML:
//!
//! ```json
//! { "sheets": [ { "name": "Sheet1",
//!                 "rows": [["Fruit", "Qty"], ["apple", 3]],
//!                 "merged": ["A1:B1"] } ] }
//! ```
//!
//! A sheet is materialized the way a spreadsheet exposes it: every row is as
//! wide as the widest row or merge, and cells nobody filled in are empty.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xlsx};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::GridError;
use crate::merge::{InvalidRange, MergeRange, span_maps};
use crate::settings::Settings;
use crate::table::GridTable;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON workbook: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML workbook: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid xlsx workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error(
        "unsupported workbook format {} (expected .xlsx, .xlsm, .json or .toml)",
        .0.display()
    )]
    UnsupportedFormat(PathBuf),
    #[error("workbook has no sheets")]
    EmptyWorkbook,
    #[error("no sheet named {0:?}")]
    SheetNotFound(String),
    #[error(transparent)]
    InvalidRange(#[from] InvalidRange),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A raw cell value before it is turned into text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn to_text(&self, empty: &str) -> String {
        match self {
            CellValue::Bool(true) => "TRUE".into(),
            CellValue::Bool(false) => "FALSE".into(),
            CellValue::Int(n) => n.to_string(),
            // Keep integral floats recognisable as floats: 2.0, not 2
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
                format!("{f:.1}")
            }
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => empty.to_string(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Int(n) => CellValue::Int(*n),
            // xlsx stores every number as a float; whole ones read back as ints
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => CellValue::Int(*f as i64),
            Data::Float(f) => CellValue::Float(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Cell values of a worksheet range, from `A1` to its last used cell.
fn cell_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((last_row, last_col)) = range.end() else {
        return Vec::new();
    };
    (0..=last_row)
        .map(|y| {
            (0..=last_col)
                .map(|x| range.get_value((y, x)).map_or(CellValue::Empty, CellValue::from))
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
    /// Merged ranges, written in `A1:B2` notation.
    #[serde(default)]
    pub merged: Vec<MergeRange>,
}

impl Sheet {
    /// Stringify the cells and turn the merged ranges into span maps.
    pub fn to_grid(&self, settings: &Settings) -> Result<GridTable, SourceError> {
        let ranges = &self.merged;
        let row_count = ranges
            .iter()
            .map(|r| r.max_row)
            .chain(std::iter::once(self.rows.len()))
            .max()
            .unwrap_or(0);
        let column_count = ranges
            .iter()
            .map(|r| r.max_col)
            .chain(self.rows.iter().map(Vec::len))
            .max()
            .unwrap_or(0);

        let empty = settings.empty_cell_text.as_str();
        let rows = (0..row_count)
            .map(|y| {
                let cells = self.rows.get(y).map(Vec::as_slice).unwrap_or(&[]);
                (0..column_count)
                    .map(|x| cells.get(x).map_or_else(|| empty.to_string(), |c| c.to_text(empty)))
                    .collect()
            })
            .collect();

        let (colspans, rowspans) = span_maps(ranges);
        debug!(
            sheet = %self.name,
            rows = row_count,
            columns = column_count,
            merges = ranges.len(),
            "materialized sheet"
        );
        Ok(GridTable {
            rows,
            colspans,
            rowspans,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_json_str(text: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SourceError> {
        Ok(toml::from_str(text)?)
    }

    /// Read every sheet of an xlsx workbook, with its merged regions.
    pub fn from_xlsx<R: std::io::Read + std::io::Seek>(
        mut book: Xlsx<R>,
    ) -> Result<Self, SourceError> {
        book.load_merged_regions()?;
        let mut sheets = Vec::new();
        for name in book.sheet_names() {
            let merged = book
                .merged_regions_by_sheet(&name)
                .into_iter()
                .map(|(_, _, dims)| MergeRange::try_from(dims))
                .collect::<Result<Vec<_>, InvalidRange>>()?;
            let range = book.worksheet_range(&name)?;
            debug!(sheet = %name, merges = merged.len(), "read worksheet");
            sheets.push(Sheet {
                rows: cell_rows(&range),
                name,
                merged,
            });
        }
        Ok(Self { sheets })
    }

    /// Load a workbook, picking the reader from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let io_error = |source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let workbook = match extension.as_deref() {
            Some("xlsx" | "xlsm") => {
                let file = File::open(path).map_err(io_error)?;
                Self::from_xlsx(Xlsx::new(BufReader::new(file))?)?
            }
            Some("json") => Self::from_json_str(&fs::read_to_string(path).map_err(io_error)?)?,
            Some("toml") => Self::from_toml_str(&fs::read_to_string(path).map_err(io_error)?)?,
            _ => return Err(SourceError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(path = %path.display(), sheets = workbook.sheets.len(), "loaded workbook");
        Ok(workbook)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn sheet(&self, name: &str) -> Result<&Sheet, SourceError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SourceError::SheetNotFound(name.to_string()))
    }

    /// The named sheet, or the first one when no name is given.
    pub fn select(&self, name: Option<&str>) -> Result<&Sheet, SourceError> {
        match name {
            Some(name) => self.sheet(name),
            None => self.sheets.first().ok_or(SourceError::EmptyWorkbook),
        }
    }
}

/// Load `path` and render one of its sheets as a grid table.
///
/// Without an explicit `sheet`, the settings' `default_sheet` is used, and
/// failing that the first sheet of the workbook.
pub fn render_sheet(
    path: &Path,
    sheet: Option<&str>,
    settings: &Settings,
) -> Result<String, SourceError> {
    let workbook = Workbook::from_path(path)?;
    let sheet = workbook.select(sheet.or(settings.default_sheet.as_deref()))?;
    Ok(sheet.to_grid(settings)?.render()?)
}
