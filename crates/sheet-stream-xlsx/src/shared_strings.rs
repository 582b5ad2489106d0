//! Shared string table (`xl/sharedStrings.xml`)

use std::io::{BufReader, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{StreamError, StreamResult};

/// Ordered shared string table; index = position of the `<si>` item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    items: Vec<String>,
}

impl SharedStrings {
    /// Look up a string by index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Number of strings
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the table has no strings
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the strings in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// The strings as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl From<Vec<String>> for SharedStrings {
    fn from(items: Vec<String>) -> Self {
        Self { items }
    }
}

/// Decode the shared strings part into a complete table
pub fn read_shared_strings<R: Read>(reader: R) -> StreamResult<SharedStrings> {
    let mut items = Vec::new();
    for_each_shared_string(reader, |_, text| items.push(text))?;
    Ok(SharedStrings::from(items))
}

/// Decode the shared strings part item by item
///
/// `on_item` is called once per `<si>` with its index and the concatenation
/// of its visible `<t>` runs. Phonetic (`<rPh>`) text is skipped. Returns the
/// number of items seen.
pub fn for_each_shared_string<R, F>(reader: R, mut on_item: F) -> StreamResult<usize>
where
    R: Read,
    F: FnMut(usize, String),
{
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    // Leading and trailing spaces are significant inside <t>
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut index = 0usize;
    let mut in_si = false;
    let mut in_phonetic = false;
    let mut in_t = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" if in_si => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => {
                    on_item(index, decode_excel_escapes(&current));
                    index += 1;
                    current.clear();
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                on_item(index, String::new());
                index += 1;
            }
            Ok(Event::Text(e)) if in_t => {
                current.push_str(&e.unescape()?);
            }
            Ok(Event::CData(e)) if in_t => {
                current.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::Eof) => {
                if in_si {
                    return Err(StreamError::Parse(format!(
                        "part ended inside shared string item {}",
                        index
                    )));
                }
                break;
            }
            Err(e) => return Err(StreamError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(index)
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
///
/// Anything that is not exactly `_x` + four hex digits + `_` is kept verbatim.
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}
