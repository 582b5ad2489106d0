//! Streaming worksheet decoder (`xl/worksheets/sheetN.xml`)
//!
//! A [`WorksheetReader`] is created the first time a sheet number is seen and
//! reused for every later part with the same number. Each `read` streams the
//! part's `<sheetData>`, raising a `row` notification per `<row>`, and then
//! collects the `<hyperlinks>` block that follows it.

use std::io::{BufReader, Read};

use chrono::NaiveDateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{StreamError, StreamResult};
use crate::events::{Emitter, EventName, ReadEvent};
use crate::hyperlinks::HyperlinkReader;
use crate::options::ReadOptions;
use crate::shared_strings::{decode_excel_escapes, SharedStrings};
use crate::styles::StyleResolver;
use crate::xml::{attr_parse, attr_value, is_true};
use sheet_stream_core::datetime::serial_to_datetime;
use sheet_stream_core::{CellAddress, CellError, CellRange, CellValue, NumberFormat};

/// A decoded cell
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Position in the sheet
    pub address: CellAddress,
    /// Typed value
    pub value: CellValue,
    /// Raw `s` attribute
    pub style_index: u32,
    /// Number format the style index resolved to when the cell was decoded
    pub number_format: NumberFormat,
}

impl Cell {
    /// The value as a date/time, if the cell is numeric and date-formatted
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        if !self.number_format.is_date_format() {
            return None;
        }
        match self.value.effective_value() {
            CellValue::Number(n) => serial_to_datetime(*n),
            _ => None,
        }
    }
}

/// A decoded `<row>` element
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Sheet the row belongs to
    pub sheet_number: u32,
    /// 0-based row index
    pub index: u32,
    /// Custom height in points
    pub height: Option<f64>,
    /// `hidden="1"`
    pub hidden: bool,
    /// Cells in document order
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell at a 0-based column
    pub fn get(&self, col: u16) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.address.col == col)
    }
}

/// A `<hyperlink>` of the worksheet, resolved against the sheet relations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    /// Cells the link covers
    pub range: CellRange,
    /// External target from the relations part
    pub target: Option<String>,
    /// Location inside the workbook (`Sheet2!A1`)
    pub location: Option<String>,
    /// Display text
    pub display: Option<String>,
    /// Tooltip
    pub tooltip: Option<String>,
}

/// Read-only view of the coordinator's shared tables
#[derive(Debug, Clone, Copy)]
pub struct SheetContext<'a> {
    /// Shared string table, once cached
    pub shared_strings: Option<&'a SharedStrings>,
    /// Active style resolver
    pub styles: &'a StyleResolver,
}

/// Per-sheet decoder; one instance per sheet number for a whole read
#[derive(Debug, Clone)]
pub struct WorksheetReader {
    sheet_number: u32,
    reads: usize,
    rows_read: usize,
    dimension: Option<CellRange>,
    hyperlinks: Vec<Hyperlink>,
    had_hyperlink_reader: bool,
}

impl WorksheetReader {
    /// Create a reader for a sheet number
    pub fn new(sheet_number: u32) -> Self {
        Self {
            sheet_number,
            reads: 0,
            rows_read: 0,
            dimension: None,
            hyperlinks: Vec::new(),
            had_hyperlink_reader: false,
        }
    }

    /// Sheet this reader belongs to
    pub fn sheet_number(&self) -> u32 {
        self.sheet_number
    }

    /// Number of worksheet parts dispatched to this reader
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Rows decoded over all reads
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// `<dimension>` of the most recent part
    pub fn dimension(&self) -> Option<CellRange> {
        self.dimension
    }

    /// Hyperlinks of the most recent part
    pub fn hyperlinks(&self) -> &[Hyperlink] {
        &self.hyperlinks
    }

    /// First hyperlink covering a cell
    pub fn hyperlink_at(&self, address: &CellAddress) -> Option<&Hyperlink> {
        self.hyperlinks
            .iter()
            .find(|link| link.range.contains(address))
    }

    /// Whether a hyperlink reader was available for the most recent part
    pub fn had_hyperlink_reader(&self) -> bool {
        self.had_hyperlink_reader
    }

    /// Decode one worksheet part
    ///
    /// `hyperlinks` is the sheet's relations reader if that part was
    /// dispatched earlier; links whose relationship cannot be resolved are
    /// dropped. Row and cell counters accumulate across reads, everything
    /// else describes the latest part.
    pub fn read<R: Read>(
        &mut self,
        entry: R,
        options: &ReadOptions,
        hyperlinks: Option<&HyperlinkReader>,
        ctx: &SheetContext<'_>,
        events: &mut Emitter,
    ) -> StreamResult<()> {
        self.reads += 1;
        self.dimension = None;
        self.hyperlinks.clear();
        self.had_hyperlink_reader = hyperlinks.is_some();

        let mut xml_reader = Reader::from_reader(BufReader::new(entry));
        // Inline strings may carry significant whitespace
        xml_reader.trim_text(false);

        let collect_cells = events.has_listeners(EventName::Row);
        let collect_links = options.hyperlinks.is_enabled();

        let mut buf = Vec::new();
        let mut row: Option<Row> = None;
        let mut next_row = 0u32;
        let mut next_col = 0u16;
        let mut cell: Option<PendingCell> = None;
        let mut text = TextTarget::None;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        let started = self.start_row(&e, next_row);
                        next_row = started.index.saturating_add(1);
                        next_col = 0;
                        row = Some(started);
                    }
                    b"c" => {
                        let row_idx = row_index(row.as_ref(), next_row);
                        let pending = PendingCell::start(&e, row_idx, next_col)?;
                        next_col = pending.address.col.saturating_add(1);
                        cell = Some(pending);
                    }
                    b"v" if cell.is_some() => text = TextTarget::Value,
                    b"f" if cell.is_some() => text = TextTarget::Formula,
                    b"rPh" => in_phonetic = true,
                    b"t" if !in_phonetic && cell.as_ref().is_some_and(|c| c.in_inline) => {
                        text = TextTarget::Inline
                    }
                    b"is" => {
                        if let Some(pending) = cell.as_mut() {
                            pending.in_inline = true;
                            pending.inline.get_or_insert_with(String::new);
                        }
                    }
                    b"hyperlink" if collect_links => self.push_hyperlink(&e, hyperlinks),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        let started = self.start_row(&e, next_row);
                        next_row = started.index.saturating_add(1);
                        self.finish_row(started, events);
                    }
                    b"c" => {
                        let row_idx = row_index(row.as_ref(), next_row);
                        let pending = PendingCell::start(&e, row_idx, next_col)?;
                        next_col = pending.address.col.saturating_add(1);
                        let decoded = pending.finish(ctx)?;
                        if let Some(current) = row.as_mut().filter(|_| collect_cells) {
                            current.cells.push(decoded);
                        }
                    }
                    b"dimension" => {
                        self.dimension = attr_value(&e, b"ref").and_then(|r| {
                            CellRange::parse(&r)
                                .map_err(|err| {
                                    log::warn!(
                                        "sheet {}: bad dimension '{}': {}",
                                        self.sheet_number,
                                        r,
                                        err
                                    )
                                })
                                .ok()
                        })
                    }
                    b"hyperlink" if collect_links => self.push_hyperlink(&e, hyperlinks),
                    _ => {}
                },
                Ok(Event::Text(e)) if !matches!(text, TextTarget::None) => {
                    if let Some(pending) = cell.as_mut() {
                        pending.push_text(text, &e.unescape()?);
                    }
                }
                Ok(Event::CData(e)) if !matches!(text, TextTarget::None) => {
                    if let Some(pending) = cell.as_mut() {
                        pending.push_text(text, &String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            let decoded = pending.finish(ctx)?;
                            if let Some(current) = row.as_mut().filter(|_| collect_cells) {
                                current.cells.push(decoded);
                            }
                        }
                    }
                    b"row" => {
                        if let Some(finished) = row.take() {
                            self.finish_row(finished, events);
                        }
                    }
                    b"v" | b"f" | b"t" => text = TextTarget::None,
                    b"is" => {
                        if let Some(pending) = cell.as_mut() {
                            pending.in_inline = false;
                        }
                    }
                    b"rPh" => in_phonetic = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(StreamError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        if row.is_some() || cell.is_some() {
            return Err(StreamError::Parse(format!(
                "sheet {} ended inside a row",
                self.sheet_number
            )));
        }

        log::debug!(
            "sheet {}: read {} ({} rows total, {} hyperlinks)",
            self.sheet_number,
            self.reads,
            self.rows_read,
            self.hyperlinks.len()
        );
        Ok(())
    }

    fn start_row(&self, e: &BytesStart<'_>, next_row: u32) -> Row {
        let index = attr_parse::<u32>(e, b"r")
            .filter(|r| *r > 0)
            .map(|r| r - 1)
            .unwrap_or(next_row);
        let custom_height = attr_value(e, b"customHeight").is_some_and(|v| is_true(&v));

        Row {
            sheet_number: self.sheet_number,
            index,
            height: if custom_height { attr_parse(e, b"ht") } else { None },
            hidden: attr_value(e, b"hidden").is_some_and(|v| is_true(&v)),
            cells: Vec::new(),
        }
    }

    fn finish_row(&mut self, row: Row, events: &mut Emitter) {
        self.rows_read += 1;
        events.emit(&ReadEvent::Row(&row));
    }

    fn push_hyperlink(&mut self, e: &BytesStart<'_>, relations: Option<&HyperlinkReader>) {
        let Some(reference) = attr_value(e, b"ref") else {
            log::warn!("sheet {}: hyperlink without ref", self.sheet_number);
            return;
        };
        let range = match CellRange::parse(&reference) {
            Ok(range) => range,
            Err(err) => {
                log::warn!(
                    "sheet {}: bad hyperlink ref '{}': {}",
                    self.sheet_number,
                    reference,
                    err
                );
                return;
            }
        };

        let location = attr_value(e, b"location");
        let target = match attr_value(e, b"id") {
            Some(rid) => {
                let target = relations.and_then(|rels| rels.target(&rid));
                if target.is_none() {
                    log::warn!(
                        "sheet {}: hyperlink {} refers to unknown relationship {}",
                        self.sheet_number,
                        reference,
                        rid
                    );
                }
                target.map(str::to_string)
            }
            None => None,
        };

        if target.is_none() && location.is_none() {
            return;
        }

        self.hyperlinks.push(Hyperlink {
            range,
            target,
            location,
            display: attr_value(e, b"display"),
            tooltip: attr_value(e, b"tooltip"),
        });
    }
}

fn row_index(row: Option<&Row>, next_row: u32) -> u32 {
    row.map(|r| r.index)
        .unwrap_or_else(|| next_row.saturating_sub(1))
}

#[derive(Debug, Clone, Copy)]
enum TextTarget {
    None,
    Value,
    Formula,
    Inline,
}

/// Cell state between `<c>` and `</c>`
struct PendingCell {
    address: CellAddress,
    cell_type: Option<String>,
    style_index: u32,
    value: Option<String>,
    formula: Option<String>,
    inline: Option<String>,
    in_inline: bool,
}

impl PendingCell {
    fn start(e: &BytesStart<'_>, row: u32, next_col: u16) -> StreamResult<Self> {
        let address = match attr_value(e, b"r") {
            Some(reference) => CellAddress::parse(&reference).map_err(|err| {
                StreamError::Parse(format!("Invalid cell reference '{}': {}", reference, err))
            })?,
            None => CellAddress::new(row, next_col),
        };

        Ok(Self {
            address,
            cell_type: attr_value(e, b"t"),
            style_index: attr_parse(e, b"s").unwrap_or(0),
            value: None,
            formula: None,
            inline: None,
            in_inline: false,
        })
    }

    fn push_text(&mut self, target: TextTarget, text: &str) {
        let slot = match target {
            TextTarget::Value => &mut self.value,
            TextTarget::Formula => &mut self.formula,
            TextTarget::Inline => &mut self.inline,
            TextTarget::None => return,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    fn finish(self, ctx: &SheetContext<'_>) -> StreamResult<Cell> {
        let cell_type = self.cell_type.as_deref();
        let shared_strings = ctx.shared_strings;

        let raw = match (self.inline, self.value) {
            (Some(inline), _) if cell_type == Some("inlineStr") => Some(inline),
            (_, value) => value,
        };

        let value = match self.formula {
            Some(formula) => {
                let cached = match raw.as_deref() {
                    Some(raw) => Some(typed_value(cell_type, raw, shared_strings)?),
                    None => None,
                };
                let text = if formula.starts_with('=') {
                    formula
                } else {
                    format!("={}", formula)
                };
                CellValue::Formula {
                    text,
                    cached_value: cached.map(Box::new),
                }
            }
            None => match raw.as_deref() {
                Some(raw) => typed_value(cell_type, raw, shared_strings)?,
                None => CellValue::Empty,
            },
        };

        Ok(Cell {
            address: self.address,
            value,
            style_index: self.style_index,
            number_format: ctx.styles.number_format(self.style_index).clone(),
        })
    }
}

/// Interpret a raw cell value according to its `t` attribute
fn typed_value(
    cell_type: Option<&str>,
    raw: &str,
    shared_strings: Option<&SharedStrings>,
) -> StreamResult<CellValue> {
    let value = match cell_type {
        Some("s") => {
            let idx: usize = raw.trim().parse().map_err(|_| {
                StreamError::Parse(format!("Invalid shared string index: {}", raw))
            })?;
            match shared_strings {
                Some(table) => {
                    let s = table.get(idx).ok_or_else(|| {
                        StreamError::Parse(format!("Shared string index {} out of bounds", idx))
                    })?;
                    CellValue::string(s)
                }
                None => CellValue::SharedStringIndex(idx),
            }
        }
        Some("b") => CellValue::Boolean(is_true(raw.trim())),
        Some("e") => CellError::parse(raw)
            .map(CellValue::Error)
            .unwrap_or_else(|| CellValue::string(raw)),
        Some("inlineStr") | Some("str") => CellValue::String(decode_excel_escapes(raw)),
        None | Some("n") => match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::string(raw),
        },
        Some(_) => CellValue::string(raw),
    };
    Ok(value)
}
