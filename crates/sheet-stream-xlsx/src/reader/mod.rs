//! Streaming workbook reader
//!
//! [`WorkbookReader`] pulls archive entries one at a time, in archive order,
//! classifies each one and hands it to the matching decoder. Nothing seeks:
//! every entry is drained before the next one is requested, so the archive
//! can come from a pipe or a socket.

mod entries;
mod registry;
mod source;

use std::io::{self, Read};
use std::path::Path;

use crate::error::{StreamError, StreamResult};
use crate::events::{Emitter, EventName, ReadEvent};
use crate::hyperlinks::HyperlinkReader;
use crate::options::{
    EntriesPolicy, HyperlinksPolicy, ReadOptions, SharedStringsPolicy, StylesPolicy,
    WorksheetsPolicy,
};
use crate::part::{classify, PartKind};
use entries::EntryStream;
use crate::shared_strings::{for_each_shared_string, read_shared_strings, SharedStrings};
use crate::styles::{read_styles_xml, StyleResolver};
use crate::worksheet::{SheetContext, WorksheetReader};

pub use registry::SheetRegistry;
pub use source::ReadSource;

/// Lifecycle of a [`WorkbookReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// No byte source attached yet
    NotStarted,
    /// Entries are being dispatched
    Streaming,
    /// The byte source is exhausted or failed
    Finished,
}

/// Single-pass workbook reader
///
/// One instance serves one read operation. Register listeners, then call
/// [`read`](Self::read) once; cached results stay queryable afterwards.
///
/// ```no_run
/// use sheet_stream_xlsx::{EventName, ReadEvent, ReadOptions, WorkbookReader};
///
/// let mut reader = WorkbookReader::new(ReadOptions::cached());
/// reader.on(EventName::Row, |event| {
///     if let ReadEvent::Row(row) = event {
///         println!("sheet {} row {}: {} cells", row.sheet_number, row.index + 1, row.cells.len());
///     }
/// });
/// reader.read("book.xlsx").unwrap();
///
/// for sheet in reader.worksheets() {
///     println!("sheet {}: {} rows", sheet.sheet_number(), sheet.rows_read());
/// }
/// ```
#[derive(Debug)]
pub struct WorkbookReader {
    options: ReadOptions,
    state: ReadState,
    events: Emitter,
    shared_strings: Option<SharedStrings>,
    styles: StyleResolver,
    registry: SheetRegistry,
}

impl WorkbookReader {
    /// Create a reader; options are fixed for its whole lifetime
    pub fn new(options: ReadOptions) -> Self {
        Self {
            options,
            state: ReadState::NotStarted,
            events: Emitter::new(),
            shared_strings: None,
            styles: StyleResolver::default(),
            registry: SheetRegistry::new(),
        }
    }

    /// Register a listener for one notification
    pub fn on<F>(&mut self, name: EventName, listener: F) -> &mut Self
    where
        F: FnMut(&ReadEvent<'_>) + 'static,
    {
        self.events.on(name, listener);
        self
    }

    /// Register a listener for every notification
    pub fn on_any<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&ReadEvent<'_>) + 'static,
    {
        self.events.on_any(listener);
        self
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Read a workbook from a path
    pub fn read_file<P: AsRef<Path>>(&mut self, path: P) -> StreamResult<()> {
        self.read(path.as_ref())
    }

    /// Read a workbook from a path or a stream
    ///
    /// Returns [`StreamError::InputRecognition`] without raising any
    /// notification when the source cannot be used or a source was already
    /// attached. Part-level failures are reported through `error` and do not
    /// make this return `Err`; failures of the byte source do, and in that
    /// case `finished` is not raised.
    pub fn read<S: Into<ReadSource>>(&mut self, source: S) -> StreamResult<()> {
        self.ensure_not_started()?;
        let reader = source.into().open()?;
        self.read_stream(reader)
    }

    /// Read a workbook from any forward-only stream
    pub fn read_stream<R: Read>(&mut self, reader: R) -> StreamResult<()> {
        self.ensure_not_started()?;
        self.state = ReadState::Streaming;
        log::debug!("streaming workbook with {:?}", self.options);

        let mut entries = EntryStream::new(reader);
        loop {
            match entries.next_entry(|path, entry| self.dispatch(path, entry)) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    log::error!("aborting read: {}", err);
                    self.events.emit(&ReadEvent::Error(&err));
                    self.state = ReadState::Finished;
                    return Err(err);
                }
            }
        }

        self.state = ReadState::Finished;
        log::debug!("workbook finished");
        self.events.emit(&ReadEvent::Finished);
        Ok(())
    }

    /// Shared string table, when cached
    pub fn shared_strings(&self) -> Option<&SharedStrings> {
        self.shared_strings.as_ref()
    }

    /// Active style resolver
    pub fn styles(&self) -> &StyleResolver {
        &self.styles
    }

    /// Worksheet reader for a sheet number, if that sheet was seen
    pub fn worksheet(&self, sheet_number: u32) -> Option<&WorksheetReader> {
        self.registry.worksheet(sheet_number)
    }

    /// All worksheet readers, in sheet-number order
    pub fn worksheets(&self) -> impl Iterator<Item = &WorksheetReader> {
        self.registry.worksheets()
    }

    /// Latest hyperlink reader for a sheet number
    pub fn hyperlinks(&self, sheet_number: u32) -> Option<&HyperlinkReader> {
        self.registry.hyperlinks(sheet_number)
    }

    fn ensure_not_started(&self) -> StreamResult<()> {
        match self.state {
            ReadState::NotStarted => Ok(()),
            state => Err(StreamError::InputRecognition(format!(
                "a byte source is already attached (reader is {:?})",
                state
            ))),
        }
    }

    /// Route one entry, then drain whatever the handler left unread
    ///
    /// Only failures of the byte source are returned, whether the handler or
    /// the drain ran into them. Part failures are reported and swallowed.
    fn dispatch(&mut self, path: &str, entry: &mut dyn Read) -> StreamResult<()> {
        match classify(path) {
            Ok(kind) => {
                log::debug!("entry {} ({})", path, kind);
                if self.options.entries == EntriesPolicy::Emit {
                    self.events.emit(&ReadEvent::Entry { path, kind });
                }
                if let Err(source) = self.handle(kind, &mut *entry) {
                    if source.is_terminal() {
                        return Err(source);
                    }
                    let err = StreamError::decode(kind, source);
                    log::warn!("{}: {}", path, err);
                    self.events.emit(&ReadEvent::Error(&err));
                }
            }
            Err(err) => {
                log::warn!("{}", err);
                self.events.emit(&ReadEvent::Error(&err));
            }
        }

        let drained = io::copy(entry, &mut io::sink())?;
        if drained > 0 {
            log::trace!("drained {} bytes of {}", drained, path);
        }
        Ok(())
    }

    fn handle(&mut self, kind: PartKind, entry: &mut dyn Read) -> StreamResult<()> {
        match kind {
            PartKind::Ignorable => Ok(()),
            PartKind::SharedStrings => self.handle_shared_strings(entry),
            PartKind::Styles => self.handle_styles(entry),
            PartKind::Worksheet(n) => self.handle_worksheet(n, entry),
            PartKind::WorksheetRelations(n) => self.handle_relations(n, entry),
        }
    }

    fn handle_shared_strings(&mut self, entry: &mut dyn Read) -> StreamResult<()> {
        match self.options.shared_strings {
            SharedStringsPolicy::Skip => {}
            SharedStringsPolicy::Cache => {
                let table = read_shared_strings(entry)?;
                log::debug!("cached {} shared strings", table.len());
                self.shared_strings = Some(table);
            }
            SharedStringsPolicy::Emit => {
                let events = &mut self.events;
                let count = for_each_shared_string(entry, |index, text| {
                    events.emit(&ReadEvent::SharedString { index, text: &text });
                })?;
                log::debug!("emitted {} shared strings", count);
            }
        }
        Ok(())
    }

    fn handle_styles(&mut self, entry: &mut dyn Read) -> StreamResult<()> {
        if self.options.styles == StylesPolicy::Cache {
            let table = read_styles_xml(entry)?;
            log::debug!("loaded {} cell formats", table.len());
            self.styles = StyleResolver::Table(table);
        }
        Ok(())
    }

    fn handle_worksheet(&mut self, sheet_number: u32, entry: &mut dyn Read) -> StreamResult<()> {
        let Self {
            options,
            events,
            shared_strings,
            styles,
            registry,
            ..
        } = self;

        let (worksheet, hyperlinks) = registry.worksheet_with_links(sheet_number);
        if options.worksheets == WorksheetsPolicy::Emit {
            events.emit(&ReadEvent::Worksheet(worksheet));
        }

        let ctx = SheetContext {
            shared_strings: shared_strings.as_ref(),
            styles,
        };
        worksheet.read(entry, options, hyperlinks, &ctx, events)
    }

    fn handle_relations(&mut self, sheet_number: u32, entry: &mut dyn Read) -> StreamResult<()> {
        if !self.options.hyperlinks.is_enabled() {
            return Ok(());
        }

        let hyperlinks = self.registry.replace_hyperlinks(sheet_number);
        if self.options.hyperlinks != HyperlinksPolicy::Emit {
            hyperlinks.read(entry)?;
            return Ok(());
        }

        let events = &mut self.events;
        events.emit(&ReadEvent::Hyperlinks(hyperlinks));
        let count = hyperlinks.read_with(entry, |link| {
            events.emit(&ReadEvent::Hyperlink { sheet_number, link });
        })?;
        log::debug!("sheet {}: emitted {} hyperlink(s)", sheet_number, count);
        Ok(())
    }
}

impl Default for WorkbookReader {
    fn default() -> Self {
        Self::new(ReadOptions::default())
    }
}
