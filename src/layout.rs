use crate::error::GridError;
use crate::table::column_count;
use crate::width::display_width;

/// One space of padding on each side of the cell text.
pub const CELL_PADDING: usize = 2;

/// Column widths of one table, measured once per render.
///
/// A column's width excludes the border characters on either side of it; the
/// table's total width adds one border character per column boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    widths: Vec<usize>,
}

impl ColumnLayout {
    pub fn compute<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, GridError> {
        let widths = (0..column_count(rows))
            .map(|index| column_width(rows, index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { widths })
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn width(&self, column: usize) -> usize {
        self.widths[column]
    }

    pub fn columns(&self) -> usize {
        self.widths.len()
    }

    /// Characters in every border line and every data row.
    pub fn total_width(&self) -> usize {
        self.widths.iter().sum::<usize>() + self.widths.len() + 1
    }

    /// Width of the region starting at `column` and covering `span` columns,
    /// including the interior borders it swallows.
    pub fn spanned_width(&self, column: usize, span: usize) -> usize {
        self.widths[column..column + span].iter().sum::<usize>() + span - 1
    }
}

/// Widest padded cell of column `index` across the rows that reach it.
pub fn column_width<S: AsRef<str>>(rows: &[Vec<S>], index: usize) -> Result<usize, GridError> {
    rows.iter()
        .filter_map(|row| row.get(index))
        .map(|cell| display_width(cell.as_ref()) + CELL_PADDING)
        .max()
        .ok_or(GridError::EmptyColumn { column: index })
}
