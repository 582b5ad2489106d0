//! Small helpers shared by the part decoders

use quick_xml::events::BytesStart;

/// Unescaped value of an attribute, matched on its local name
pub(crate) fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}

/// Parse a numeric attribute, ignoring missing or malformed values
pub(crate) fn attr_parse<T: std::str::FromStr>(e: &BytesStart<'_>, name: &[u8]) -> Option<T> {
    attr_value(e, name).and_then(|v| v.parse().ok())
}

/// SpreadsheetML boolean (`1`/`true`)
pub(crate) fn is_true(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
