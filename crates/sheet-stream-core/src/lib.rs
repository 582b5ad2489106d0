//! # sheet-stream-core
//!
//! Value types produced by the sheet-stream readers.
//!
//! - [`CellValue`] - decoded cell contents (numbers, strings, booleans, errors, formulas)
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//! - [`CellFormat`] and [`NumberFormat`] - the formatting a style index resolves to
//! - [`datetime`] - serial date conversion for date-formatted cells
//!
//! ## Example
//!
//! ```rust
//! use sheet_stream_core::{CellAddress, CellRange};
//!
//! let addr = CellAddress::parse("B3").unwrap();
//! assert_eq!((addr.row, addr.col), (2, 1));
//!
//! let range = CellRange::parse("A1:C10").unwrap();
//! assert!(range.contains(&addr));
//! ```

pub mod cell;
pub mod datetime;
pub mod error;
pub mod style;

pub use cell::{CellAddress, CellError, CellRange, CellValue};
pub use error::{Error, Result};
pub use style::{CellFormat, Color, FontStyle, NumberFormat, Underline};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
