//! Streaming tests for sheet-stream-xlsx.
//!
//! Every test builds its archive in memory with `zip::ZipWriter`, in exactly
//! the entry order it needs, and feeds it to `WorkbookReader` as a plain
//! forward-only stream.


pub use common::*;
