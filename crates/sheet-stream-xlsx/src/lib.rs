//! # sheet-stream-xlsx
//!
//! Single-pass streaming reader for XLSX workbooks.
//!
//! The archive is consumed forward-only. Each entry is classified by path and
//! routed to its decoder as it arrives: shared strings and styles are cached
//! (or announced) for the worksheets that follow, worksheet relations are
//! correlated with their sheet by number, and worksheet rows are delivered
//! through listener callbacks. See [`WorkbookReader`] for the entry point.

pub mod error;
pub mod events;
pub mod hyperlinks;
pub mod options;
pub mod part;
pub mod reader;
pub mod shared_strings;
pub mod styles;
pub mod worksheet;

mod xml;

pub use error::{StreamError, StreamResult};
pub use events::{Emitter, EventName, Listener, ReadEvent};
pub use hyperlinks::{HyperlinkReader, Relationship};
pub use options::{
    EntriesPolicy, HyperlinksPolicy, ReadOptions, SharedStringsPolicy, StylesPolicy,
    WorksheetsPolicy,
};
pub use part::{classify, PartKind};
pub use reader::{ReadSource, ReadState, SheetRegistry, WorkbookReader};
pub use shared_strings::SharedStrings;
pub use styles::{StyleResolver, StyleTable};
pub use worksheet::{Cell, Hyperlink, Row, SheetContext, WorksheetReader};
