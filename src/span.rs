//! Lookup of vertical-merge continuations.
//!
//! Only the top-left anchor of a merge is recorded, so a cell several rows
//! below an anchor has to find the nearest anchor above it in its column.
//! The index keeps the anchors of every column in a `BTreeMap` ordered by
//! row, which makes "closest anchor strictly above" a single range query.

use std::collections::{BTreeMap, HashMap};

use crate::table::SpanMap;

/// A coordinate covered by a rowspan anchored on an earlier row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    /// `(row, column)` of the merge's top-left cell.
    pub anchor: (usize, usize),
    /// Rows of the merge left, counting the queried one.
    pub remaining: usize,
    /// Columns the merge covers, starting at the anchor column.
    pub columns: usize,
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    column: usize,
    height: usize,
    width: usize,
}

#[derive(Debug, Default)]
pub struct RowSpanIndex {
    by_column: HashMap<usize, BTreeMap<usize, Anchor>>,
}

impl RowSpanIndex {
    /// Build the index from the rowspan map.
    ///
    /// An anchor that also carries a colspan covers every column of its
    /// block, so it is registered under each of them.
    pub fn new(rowspans: &SpanMap, colspans: &SpanMap) -> Self {
        let mut anchors: Vec<_> = rowspans.iter().map(|(&(r, c), &h)| (r, c, h)).collect();
        anchors.sort_unstable();

        let mut by_column: HashMap<usize, BTreeMap<usize, Anchor>> = HashMap::new();
        for (row, column, height) in anchors {
            let width = colspans.get(&(row, column)).copied().unwrap_or(1).max(1);
            for covered in column..column + width {
                by_column
                    .entry(covered)
                    .or_default()
                    .entry(row)
                    .or_insert(Anchor {
                        column,
                        height,
                        width,
                    });
            }
        }
        Self { by_column }
    }

    /// The merge `(row, column)` continues, if any.
    ///
    /// The nearest anchor strictly above `row` decides: the cell continues
    /// that merge while the anchor's height exceeds the distance to it.
    pub fn continuation(&self, row: usize, column: usize) -> Option<Continuation> {
        let (&anchor_row, anchor) = self.by_column.get(&column)?.range(..row).next_back()?;
        let distance = row - anchor_row;
        (anchor.height > distance).then(|| Continuation {
            anchor: (anchor_row, anchor.column),
            remaining: anchor.height - distance,
            columns: anchor.width,
        })
    }

    pub fn is_row_continuation(&self, row: usize, column: usize) -> bool {
        self.continuation(row, column).is_some()
    }
}
