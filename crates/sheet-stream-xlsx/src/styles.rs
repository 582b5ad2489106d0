//! Cell formats (`xl/styles.xml`) and the style resolver used by worksheets

use std::collections::HashMap;
use std::io::{BufReader, Read};
use std::sync::OnceLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{StreamError, StreamResult};
use crate::xml::{attr_parse, attr_value, is_true};
use sheet_stream_core::style::{CellFormat, Color, FontStyle, NumberFormat, Underline};

/// Cell formats decoded from the styles part, indexed like `cellXfs`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTable {
    formats: Vec<CellFormat>,
}

impl StyleTable {
    /// Format for a `cellXfs` index
    pub fn get(&self, style_index: u32) -> Option<&CellFormat> {
        self.formats.get(style_index as usize)
    }

    /// Number of cell formats
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// True if the part declared no cell formats
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl From<Vec<CellFormat>> for StyleTable {
    fn from(formats: Vec<CellFormat>) -> Self {
        Self { formats }
    }
}

/// The active style lookup of a read
///
/// Starts as `Placeholder`, which answers every lookup with the general
/// format. Replaced by `Table` in a single assignment once the styles part
/// has been decoded completely.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StyleResolver {
    /// No style data (yet); every index is "General"
    #[default]
    Placeholder,
    /// Decoded styles part
    Table(StyleTable),
}

impl StyleResolver {
    /// Resolve a cell's style index
    ///
    /// Indices the table does not define resolve to the general format.
    pub fn resolve(&self, style_index: u32) -> &CellFormat {
        match self {
            StyleResolver::Table(table) => {
                table.get(style_index).unwrap_or_else(|| general())
            }
            StyleResolver::Placeholder => general(),
        }
    }

    /// Shortcut for the number format of a style index
    pub fn number_format(&self, style_index: u32) -> &NumberFormat {
        &self.resolve(style_index).number_format
    }

    /// True while no styles part has been applied
    pub fn is_placeholder(&self) -> bool {
        matches!(self, StyleResolver::Placeholder)
    }

    /// The decoded table, if any
    pub fn table(&self) -> Option<&StyleTable> {
        match self {
            StyleResolver::Table(table) => Some(table),
            StyleResolver::Placeholder => None,
        }
    }
}

fn general() -> &'static CellFormat {
    static GENERAL: OnceLock<CellFormat> = OnceLock::new();
    GENERAL.get_or_init(CellFormat::general)
}

/// Decode the styles part
///
/// Reads custom `<numFmts>`, `<fonts>` and `<cellXfs>`; fills, borders,
/// alignment and differential formats do not affect value interpretation
/// and are skipped.
pub fn read_styles_xml<R: Read>(reader: R) -> StreamResult<StyleTable> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut numfmts: HashMap<u32, String> = HashMap::new();
    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut cell_xfs: Vec<(u32, u32)> = Vec::new();

    let mut in_fonts = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<FontStyle> = None;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"fonts" => in_fonts = true,
                b"cellXfs" => in_cell_xfs = true,
                b"font" if in_fonts => current_font = Some(FontStyle::default()),
                b"xf" if in_cell_xfs => cell_xfs.push(parse_xf_ids(&e)),
                b"numFmt" => insert_numfmt(&e, &mut numfmts),
                _ => {
                    if let Some(font) = current_font.as_mut() {
                        apply_font_property(font, &e);
                    }
                }
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"font" if in_fonts => fonts.push(FontStyle::default()),
                b"xf" if in_cell_xfs => cell_xfs.push(parse_xf_ids(&e)),
                b"numFmt" => insert_numfmt(&e, &mut numfmts),
                _ => {
                    if let Some(font) = current_font.as_mut() {
                        apply_font_property(font, &e);
                    }
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"fonts" => in_fonts = false,
                b"cellXfs" => in_cell_xfs = false,
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(StreamError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let formats = cell_xfs
        .into_iter()
        .map(|(num_fmt_id, font_id)| CellFormat {
            number_format: NumberFormat::from_id(
                num_fmt_id,
                numfmts.get(&num_fmt_id).map(String::as_str),
            ),
            font: fonts.get(font_id as usize).cloned().unwrap_or_default(),
        })
        .collect();

    Ok(StyleTable { formats })
}

fn parse_xf_ids(e: &BytesStart<'_>) -> (u32, u32) {
    (
        attr_parse(e, b"numFmtId").unwrap_or(0),
        attr_parse(e, b"fontId").unwrap_or(0),
    )
}

fn insert_numfmt(e: &BytesStart<'_>, numfmts: &mut HashMap<u32, String>) {
    let id = attr_parse::<u32>(e, b"numFmtId");
    match (id, attr_value(e, b"formatCode")) {
        (Some(id), Some(code)) => {
            numfmts.insert(id, code);
        }
        _ => log::warn!("ignoring numFmt without numFmtId/formatCode"),
    }
}

fn apply_font_property(font: &mut FontStyle, e: &BytesStart<'_>) {
    let val = attr_value(e, b"val");
    // Toggle elements are on unless val says otherwise
    let on = val.as_deref().map_or(true, is_true);

    match e.local_name().as_ref() {
        b"b" => font.bold = on,
        b"i" => font.italic = on,
        b"strike" => font.strikethrough = on,
        b"u" => {
            font.underline = val
                .as_deref()
                .map(Underline::from_xlsx)
                .unwrap_or(Underline::Single)
        }
        b"sz" => {
            if let Some(size) = val.as_deref().and_then(|v| v.parse::<f64>().ok()) {
                font.size = size;
            }
        }
        b"name" => {
            if let Some(name) = val {
                font.name = name;
            }
        }
        b"color" => font.color = parse_color_attrs(e),
        _ => {}
    }
}

fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    // Priority: rgb > theme > indexed > auto
    if let Some(color) = attr_value(e, b"rgb").and_then(|v| Color::from_hex(&v)) {
        return color;
    }
    if let Some(theme) = attr_parse(e, b"theme") {
        return Color::Theme(theme);
    }
    if let Some(indexed) = attr_parse(e, b"indexed") {
        return Color::Indexed(indexed);
    }
    Color::Auto
}
