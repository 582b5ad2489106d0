//! Worksheet relations (`xl/worksheets/_rels/sheetN.xml.rels`)
//!
//! Only hyperlink relationships are kept. The worksheet part refers to them
//! by relationship id from its `<hyperlinks>` block.

use std::collections::BTreeMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{StreamError, StreamResult};

const HYPERLINK_TYPE_SUFFIX: &str = "/hyperlink";

/// A hyperlink relationship from a worksheet relations part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id (`rId1`)
    pub id: String,
    /// Link target, usually a URL
    pub target: String,
    /// `TargetMode="External"`
    pub external: bool,
}

/// Hyperlink relationships of one sheet
#[derive(Debug, Clone)]
pub struct HyperlinkReader {
    sheet_number: u32,
    links: BTreeMap<String, Relationship>,
}

impl HyperlinkReader {
    /// Create an empty reader for a sheet
    pub fn new(sheet_number: u32) -> Self {
        Self {
            sheet_number,
            links: BTreeMap::new(),
        }
    }

    /// Sheet this reader belongs to
    pub fn sheet_number(&self) -> u32 {
        self.sheet_number
    }

    /// Decode a relations part
    ///
    /// Returns the number of hyperlink relationships found.
    pub fn read<R: Read>(&mut self, entry: R) -> StreamResult<usize> {
        self.read_with(entry, |_| {})
    }

    /// Decode a relations part, calling `on_link` for each hyperlink
    /// relationship as it is found
    pub fn read_with<R, F>(&mut self, entry: R, mut on_link: F) -> StreamResult<usize>
    where
        R: Read,
        F: FnMut(&Relationship),
    {
        let mut xml_reader = Reader::from_reader(BufReader::new(entry));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut found = 0;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    if let Some(rel) = parse_relationship(&e)? {
                        on_link(&rel);
                        self.links.insert(rel.id.clone(), rel);
                        found += 1;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(StreamError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!(
            "sheet {}: {} hyperlink relationship(s)",
            self.sheet_number,
            found
        );
        Ok(found)
    }

    /// Target of a hyperlink relationship
    pub fn target(&self, id: &str) -> Option<&str> {
        self.links.get(id).map(|rel| rel.target.as_str())
    }

    /// Full relationship record
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.links.get(id)
    }

    /// Number of hyperlink relationships
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True if the part had no hyperlink relationships
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Relationships ordered by id
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.links.values()
    }
}

fn parse_relationship(e: &BytesStart<'_>) -> StreamResult<Option<Relationship>> {
    let mut id = None;
    let mut target = None;
    let mut rel_type = None;
    let mut external = false;

    for attr in e.attributes().flatten() {
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"Id" => id = Some(value.to_string()),
            b"Target" => target = Some(value.to_string()),
            b"Type" => rel_type = Some(value.to_string()),
            b"TargetMode" => external = value == "External",
            _ => {}
        }
    }

    let Some(rel_type) = rel_type else {
        return Ok(None);
    };
    if !rel_type.ends_with(HYPERLINK_TYPE_SUFFIX) {
        return Ok(None);
    }

    match (id, target) {
        (Some(id), Some(target)) => Ok(Some(Relationship {
            id,
            target,
            external,
        })),
        (id, _) => Err(StreamError::Parse(format!(
            "hyperlink relationship {} has no Id or Target",
            id.as_deref().unwrap_or("?")
        ))),
    }
}
