//! Grid-table drawing.
//!
//! A rendered table looks like:
//!
//! ```text
//! +-----+---+
//! | Key | A |
//! +-----+---+
//! | Up  | B |
//! +-----+---+
//! ```
//!
//! Border lines and data rows are always exactly [`ColumnLayout::total_width`]
//! characters long.  Merged cells are drawn by leaving out the borders that
//! would otherwise cross them: a colspan swallows the `|` between its columns,
//! a rowspan blanks the `-` fill and the right-hand junction of the border
//! lines under its anchor.

use tracing::debug;

use crate::error::GridError;
use crate::layout::{CELL_PADDING, ColumnLayout};
use crate::span::RowSpanIndex;
use crate::table::{SpanMap, validate};
use crate::width::display_width;

const JUNCTION: char = '+';
const HORIZONTAL: char = '-';
const VERTICAL: char = '|';
const BLANK: char = ' ';

/// Output buffer for a single render.
#[derive(Debug, Default)]
pub struct Canvas {
    buffer: String,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    pub fn draw(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn draw_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    fn repeat(&mut self, ch: char, count: usize) {
        self.buffer.extend(std::iter::repeat_n(ch, count));
    }

    pub fn end_line(&mut self) {
        self.buffer.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

/// Draw the border line above `row` (or the closing line when `row` equals
/// the row count).
///
/// The outer edges are always junctions.  Inside the table, the fill under a
/// column is blank while that column continues a rowspan, and so is the
/// boundary to its right, leaving the merged cell open towards its neighbour.
pub fn draw_border(
    canvas: &mut Canvas,
    layout: &ColumnLayout,
    index: &RowSpanIndex,
    row: usize,
) {
    canvas.draw_char(JUNCTION);
    for column in 0..layout.columns() {
        let continued = index.is_row_continuation(row, column);
        let fill = if continued { BLANK } else { HORIZONTAL };
        canvas.repeat(fill, layout.width(column));

        let is_last = column + 1 == layout.columns();
        let inside_merge = !is_last && continued;
        canvas.draw_char(if inside_merge { BLANK } else { JUNCTION });
    }
    canvas.end_line();
}

/// Draw one cell: its left border plus `column_width` characters.
///
/// A continued cell is left blank; its text belongs to the anchor above.
pub fn draw_cell(
    canvas: &mut Canvas,
    (row, column): (usize, usize),
    text: &str,
    column_width: usize,
    continued: bool,
) -> Result<(), GridError> {
    canvas.draw_char(VERTICAL);
    if continued {
        canvas.repeat(BLANK, column_width);
        return Ok(());
    }

    let text_width = display_width(text);
    let padding = column_width
        .checked_sub(text_width + CELL_PADDING)
        .ok_or(GridError::NegativePadding {
            row,
            column,
            text_width,
            column_width,
        })?;
    canvas.draw_char(BLANK);
    canvas.draw(text);
    canvas.repeat(BLANK, padding + 1);
    Ok(())
}

/// Blank out the columns a colspan anchored at `column` swallows, together
/// with the interior borders between them.
pub fn draw_colspan_filler(
    canvas: &mut Canvas,
    layout: &ColumnLayout,
    column: usize,
    span: usize,
) {
    let covered = layout.spanned_width(column, span) - layout.width(column);
    canvas.repeat(BLANK, covered);
}

/// Render rows and merge maps into grid-table text.
pub fn tabulate<S: AsRef<str>>(
    rows: &[Vec<S>],
    colspans: &SpanMap,
    rowspans: &SpanMap,
) -> Result<String, GridError> {
    validate(rows, colspans, rowspans)?;
    let layout = ColumnLayout::compute(rows)?;
    let index = RowSpanIndex::new(rowspans, colspans);
    debug!(
        rows = rows.len(),
        columns = layout.columns(),
        width = layout.total_width(),
        colspans = colspans.len(),
        rowspans = rowspans.len(),
        "rendering grid table"
    );

    let lines = rows.len() * 2 + 1;
    let mut canvas = Canvas::with_capacity(lines * (layout.total_width() + 1));
    let mut walker = RowWalker {
        canvas: &mut canvas,
        layout: &layout,
        index: &index,
        colspans,
        rowspans,
    };
    for (y, row) in rows.iter().enumerate() {
        draw_border(walker.canvas, &layout, &index, y);
        walker.draw_row(y, row)?;
    }
    draw_border(&mut canvas, &layout, &index, rows.len());
    Ok(canvas.into_string())
}

struct RowWalker<'a> {
    canvas: &'a mut Canvas,
    layout: &'a ColumnLayout,
    index: &'a RowSpanIndex,
    colspans: &'a SpanMap,
    rowspans: &'a SpanMap,
}

impl RowWalker<'_> {
    fn draw_row<S: AsRef<str>>(&mut self, y: usize, row: &[S]) -> Result<(), GridError> {
        let mut x = 0;
        while x < row.len() {
            if let Some(cont) = self.index.continuation(y, x) {
                // A continuation must be entered at the merge's left edge and
                // cannot carry merges of its own.
                if cont.anchor.1 != x || self.is_anchor(y, x) {
                    return Err(GridError::OverlappingSpans {
                        row: y,
                        column: x,
                    });
                }
                self.check_covered(y, x, cont.columns, Some(cont.anchor))?;
                draw_cell(self.canvas, (y, x), "", self.layout.width(x), true)?;
                if cont.columns > 1 {
                    draw_colspan_filler(self.canvas, self.layout, x, cont.columns);
                }
                x += cont.columns;
                continue;
            }

            let width = self.layout.width(x);
            draw_cell(self.canvas, (y, x), row[x].as_ref(), width, false)?;
            let span = self.colspans.get(&(y, x)).copied().unwrap_or(1);
            if span > 1 {
                self.check_covered(y, x, span, None)?;
                draw_colspan_filler(self.canvas, self.layout, x, span);
            }
            x += span;
        }
        self.canvas.draw_char(VERTICAL);
        self.canvas.end_line();
        Ok(())
    }

    fn is_anchor(&self, y: usize, x: usize) -> bool {
        self.colspans.contains_key(&(y, x)) || self.rowspans.contains_key(&(y, x))
    }

    /// Columns after `x` swallowed by a merge must not belong to anything else.
    fn check_covered(
        &self,
        y: usize,
        x: usize,
        span: usize,
        owner: Option<(usize, usize)>,
    ) -> Result<(), GridError> {
        for column in x + 1..x + span {
            let covering = self.index.continuation(y, column).map(|c| c.anchor);
            let foreign = covering != owner;
            if foreign || self.is_anchor(y, column) {
                return Err(GridError::OverlappingSpans { row: y, column });
            }
        }
        Ok(())
    }
}
