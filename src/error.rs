use std::fmt;

/// Which of the two merge maps an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Column,
    Row,
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanKind::Column => f.write_str("colspan"),
            SpanKind::Row => f.write_str("rowspan"),
        }
    }
}

/// Structural errors raised while laying out or drawing a grid table.
///
/// Rendering is all-or-nothing: any of these aborts the render and no
/// partial text is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("table has no rows or no columns")]
    EmptyTable,
    #[error("column {column} has no cell in any row")]
    EmptyColumn { column: usize },
    #[error("row {row} has {len} cells, expected {columns}")]
    RaggedRow {
        row: usize,
        len: usize,
        columns: usize,
    },
    #[error("{kind} of {span} anchored at ({row}, {column}) does not fit the table")]
    SpanOutOfBounds {
        kind: SpanKind,
        row: usize,
        column: usize,
        span: usize,
    },
    #[error("merge at ({row}, {column}) overlaps another merged region")]
    OverlappingSpans { row: usize, column: usize },
    #[error(
        "cell ({row}, {column}) is {text_width} columns wide but its column holds {column_width}"
    )]
    NegativePadding {
        row: usize,
        column: usize,
        text_width: usize,
        column_width: usize,
    },
}
