use std::collections::HashMap;

use crate::error::{GridError, SpanKind};

/// Merge extents keyed by the zero-based `(row, column)` of their top-left anchor.
pub type SpanMap = HashMap<(usize, usize), usize>;

/// A table description ready to be drawn: cell text plus the two merge maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridTable {
    pub rows: Vec<Vec<String>>,
    pub colspans: SpanMap,
    pub rowspans: SpanMap,
}

impl GridTable {
    pub fn new<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            colspans: SpanMap::new(),
            rowspans: SpanMap::new(),
        }
    }

    pub fn with_colspan(mut self, row: usize, column: usize, width: usize) -> Self {
        self.colspans.insert((row, column), width);
        self
    }

    pub fn with_rowspan(mut self, row: usize, column: usize, height: usize) -> Self {
        self.rowspans.insert((row, column), height);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        column_count(&self.rows)
    }

    /// Render the table as grid-table text.
    pub fn render(&self) -> Result<String, GridError> {
        crate::render::tabulate(&self.rows, &self.colspans, &self.rowspans)
    }
}

/// Length of the longest row.
pub fn column_count<S: AsRef<str>>(rows: &[Vec<S>]) -> usize {
    rows.iter().map(Vec::len).max().unwrap_or(0)
}

/// Check the structural preconditions of a render.
///
/// Rows must all be as long as the longest one, and every span must be
/// anchored inside the table, be at least 2 wide/high, and end inside it.
pub(crate) fn validate<S: AsRef<str>>(
    rows: &[Vec<S>],
    colspans: &SpanMap,
    rowspans: &SpanMap,
) -> Result<(), GridError> {
    let columns = column_count(rows);
    if rows.is_empty() || columns == 0 {
        return Err(GridError::EmptyTable);
    }
    if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
        return Err(GridError::RaggedRow {
            row,
            len: cells.len(),
            columns,
        });
    }

    check_spans(colspans, SpanKind::Column, rows.len(), columns)?;
    check_spans(rowspans, SpanKind::Row, rows.len(), columns)
}

fn check_spans(
    spans: &SpanMap,
    kind: SpanKind,
    rows: usize,
    columns: usize,
) -> Result<(), GridError> {
    // Sorted so the reported entry does not depend on hash order.
    let mut entries: Vec<_> = spans.iter().map(|(&(r, c), &s)| (r, c, s)).collect();
    entries.sort_unstable();

    for (row, column, span) in entries {
        let (start, limit) = match kind {
            SpanKind::Column => (column, columns),
            SpanKind::Row => (row, rows),
        };
        let fits = row < rows
            && column < columns
            && span >= 2
            && start.checked_add(span).is_some_and(|end| end <= limit);
        if !fits {
            return Err(GridError::SpanOutOfBounds {
                kind,
                row,
                column,
                span,
            });
        }
    }
    Ok(())
}
