//! Plain-text grid tables with merged cells.
//!
//! ```
//! let table = gridtab::GridTable::new([["A", "B"], ["C", "D"]]).with_colspan(0, 0, 2);
//! assert_eq!(
//!     table.render().unwrap(),
//!     "+---+---+\n| A     |\n+---+---+\n| C | D |\n+---+---+\n"
//! );
//! ```
pub mod error;
pub mod layout;
pub mod merge;
pub mod render;
pub mod settings;
pub mod source;
pub mod span;
pub mod table;
pub mod width;

pub use error::{GridError, SpanKind};
pub use render::tabulate;
pub use source::{SourceError, Workbook, render_sheet};
pub use table::{GridTable, SpanMap};
pub use width::display_width;
