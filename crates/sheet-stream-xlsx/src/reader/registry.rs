//! Per-sheet reader bookkeeping for one read operation

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::hyperlinks::HyperlinkReader;
use crate::worksheet::WorksheetReader;

/// Worksheet and hyperlink readers keyed by sheet number
///
/// Worksheet readers are created on first reference and reused. Hyperlink
/// readers are replaced by a fresh one for every relations part, and are
/// only ever looked up from the worksheet side.
#[derive(Debug, Default)]
pub struct SheetRegistry {
    worksheets: BTreeMap<u32, WorksheetReader>,
    hyperlinks: BTreeMap<u32, HyperlinkReader>,
}

impl SheetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worksheet reader together with the sheet's hyperlink reader, if any
    ///
    /// Creates the worksheet reader when missing; never creates a hyperlink
    /// reader.
    pub fn worksheet_with_links(
        &mut self,
        sheet_number: u32,
    ) -> (&mut WorksheetReader, Option<&HyperlinkReader>) {
        let worksheet = self
            .worksheets
            .entry(sheet_number)
            .or_insert_with(|| WorksheetReader::new(sheet_number));
        (worksheet, self.hyperlinks.get(&sheet_number))
    }

    /// Install a fresh hyperlink reader, dropping any previous one
    pub fn replace_hyperlinks(&mut self, sheet_number: u32) -> &mut HyperlinkReader {
        let fresh = HyperlinkReader::new(sheet_number);
        match self.hyperlinks.entry(sheet_number) {
            Entry::Occupied(mut slot) => {
                log::debug!("sheet {}: replacing hyperlink reader", sheet_number);
                slot.insert(fresh);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(fresh),
        }
    }

    pub fn worksheet(&self, sheet_number: u32) -> Option<&WorksheetReader> {
        self.worksheets.get(&sheet_number)
    }

    /// Worksheet readers in sheet-number order
    pub fn worksheets(&self) -> impl Iterator<Item = &WorksheetReader> {
        self.worksheets.values()
    }

    pub fn hyperlinks(&self, sheet_number: u32) -> Option<&HyperlinkReader> {
        self.hyperlinks.get(&sheet_number)
    }
}
