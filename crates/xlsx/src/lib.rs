//! Spreadsheet input for the deck builder.
//!
//! Reads `.xlsx` workbooks through the shared `deck-opc` package layer: the first
//! worksheet is resolved through the workbook relationships and its cells
//! are rendered as text.

pub mod rows;
pub mod workbook;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use rows::{load_rows, read_rows};
pub use workbook::{read_first_sheet, Sheet};
