//! Archive entry classification
//!
//! Maps an entry path to the role it plays in the workbook. Matching is
//! purely lexical and case-sensitive; no part content is inspected.

use std::fmt;

use lazy_regex::regex_captures;

use crate::error::{StreamError, StreamResult};

/// Semantic role of an archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// Anything the reader does not decode. Still drained.
    Ignorable,
    /// `xl/sharedStrings.xml`
    SharedStrings,
    /// `xl/styles.xml`
    Styles,
    /// `xl/worksheets/sheetN.xml`
    Worksheet(u32),
    /// `xl/worksheets/_rels/sheetN.xml.rels`
    WorksheetRelations(u32),
}

impl PartKind {
    /// Sheet number for worksheet and worksheet relations parts
    pub fn sheet_number(&self) -> Option<u32> {
        match self {
            PartKind::Worksheet(n) | PartKind::WorksheetRelations(n) => Some(*n),
            _ => None,
        }
    }

    /// Short name used in notifications and log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::Ignorable => "ignorable",
            PartKind::SharedStrings => "sharedStrings",
            PartKind::Styles => "styles",
            PartKind::Worksheet(_) => "worksheet",
            PartKind::WorksheetRelations(_) => "worksheetRelations",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sheet_number() {
            Some(n) => write!(f, "{} {}", self.as_str(), n),
            None => f.write_str(self.as_str()),
        }
    }
}

/// Classify an archive entry path
///
/// Returns [`StreamError::ClassificationImpossible`] when a path has the
/// shape of a worksheet or worksheet relations part but its number is not a
/// positive `u32`.
pub fn classify(path: &str) -> StreamResult<PartKind> {
    match path {
        "_rels/.rels" | "xl/workbook.xml" | "xl/_rels/workbook.xml.rels" => {
            return Ok(PartKind::Ignorable)
        }
        "xl/sharedStrings.xml" => return Ok(PartKind::SharedStrings),
        "xl/styles.xml" => return Ok(PartKind::Styles),
        _ => {}
    }

    if let Some((_, digits)) = regex_captures!(r"^xl/worksheets/sheet([0-9]+)\.xml$", path) {
        return sheet_number(path, digits).map(PartKind::Worksheet);
    }
    if let Some((_, digits)) =
        regex_captures!(r"^xl/worksheets/_rels/sheet([0-9]+)\.xml\.rels$", path)
    {
        return sheet_number(path, digits).map(PartKind::WorksheetRelations);
    }

    Ok(PartKind::Ignorable)
}

fn sheet_number(path: &str, digits: &str) -> StreamResult<u32> {
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(StreamError::ClassificationImpossible(format!(
            "'{}' has no positive sheet number",
            path
        ))),
    }
}
