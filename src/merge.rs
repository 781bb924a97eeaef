//! Spreadsheet merge ranges (`A1:C2`) and their conversion into span anchors.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::table::SpanMap;

/// Rows in an xlsx worksheet.
pub const MAX_ROWS: usize = 1_048_576;
/// Columns in an xlsx worksheet (`XFD`).
pub const MAX_COLUMNS: usize = 16_384;

/// An inclusive, 1-based cell range as spreadsheets record merges.
///
/// Both corners lie inside the worksheet limits, so a range never describes
/// more cells than a real sheet can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct MergeRange {
    pub min_row: usize,
    pub min_col: usize,
    pub max_row: usize,
    pub max_col: usize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid merge range {0:?}")]
pub struct InvalidRange(pub String);

fn in_sheet((row, col): (usize, usize)) -> bool {
    (1..=MAX_ROWS).contains(&row) && (1..=MAX_COLUMNS).contains(&col)
}

fn cell_ref() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\$?([A-Za-z]{1,3})\$?([1-9][0-9]*)$").expect("valid cell reference pattern")
    })
}

/// Parse `B3` into `(row, col)`, both 1-based.
fn parse_cell(reference: &str) -> Option<(usize, usize)> {
    let caps = cell_ref().captures(reference.trim())?;
    let col = caps[1]
        .chars()
        .fold(0usize, |acc, ch| acc * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1));
    let row = caps[2].parse().ok()?;
    Some((row, col))
}

impl FromStr for MergeRange {
    type Err = InvalidRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRange(s.to_string());
        let (start, end) = match s.split_once(':') {
            Some((a, b)) => (parse_cell(a), parse_cell(b)),
            None => (parse_cell(s), parse_cell(s)),
        };
        let (start, end) = (start.ok_or_else(invalid)?, end.ok_or_else(invalid)?);
        Self::from_corners(start, end).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MergeRange {
    type Error = InvalidRange;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Merged regions as calamine reports them: zero-based `(row, column)` corners.
impl TryFrom<&calamine::Dimensions> for MergeRange {
    type Error = InvalidRange;

    fn try_from(dims: &calamine::Dimensions) -> Result<Self, Self::Error> {
        let one_based = |(row, col): (u32, u32)| (row as usize + 1, col as usize + 1);
        Self::from_corners(one_based(dims.start), one_based(dims.end))
            .ok_or_else(|| InvalidRange(format!("{:?}..{:?}", dims.start, dims.end)))
    }
}

impl fmt::Display for MergeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_name(self.min_col),
            self.min_row,
            column_name(self.max_col),
            self.max_row
        )
    }
}

/// Spreadsheet letters of a 1-based column: 1 is `A`, 27 is `AA`.
fn column_name(mut col: usize) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        col -= 1;
        letters.push(b'A' + (col % 26) as u8);
        col /= 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

impl MergeRange {
    /// Range between two 1-based corners given in any order, or `None` when a
    /// corner falls outside the worksheet.
    pub fn from_corners(a: (usize, usize), b: (usize, usize)) -> Option<Self> {
        if !in_sheet(a) || !in_sheet(b) {
            return None;
        }
        Some(Self {
            min_row: a.0.min(b.0),
            min_col: a.1.min(b.1),
            max_row: a.0.max(b.0),
            max_col: a.1.max(b.1),
        })
    }

    /// Zero-based `(row, column)` of the top-left cell.
    pub fn anchor(&self) -> (usize, usize) {
        (self.min_row - 1, self.min_col - 1)
    }

    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    /// Record this range in the span maps.
    ///
    /// Each axis is recorded only when the range actually extends along it, so
    /// a block merge lands in both maps and a single cell in neither.
    pub fn record(&self, colspans: &mut SpanMap, rowspans: &mut SpanMap) {
        if self.width() > 1 {
            colspans.insert(self.anchor(), self.width());
        }
        if self.height() > 1 {
            rowspans.insert(self.anchor(), self.height());
        }
    }
}

/// Build both span maps from a list of merge ranges.
pub fn span_maps<'a, I>(ranges: I) -> (SpanMap, SpanMap)
where
    I: IntoIterator<Item = &'a MergeRange>,
{
    let mut colspans = SpanMap::new();
    let mut rowspans = SpanMap::new();
    for range in ranges {
        range.record(&mut colspans, &mut rowspans);
    }
    (colspans, rowspans)
}
