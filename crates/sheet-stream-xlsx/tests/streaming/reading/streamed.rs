//! Archives whose entry sizes follow the data, as streaming writers produce them.

use crate::{
    build_archive, hyperlink_rels, sheet_xml, stream, with_data_descriptors, Recorded,
    SHARED_STRINGS, STYLES,
};
use pretty_assertions::assert_eq;
use sheet_stream_core::NumberFormat;
use sheet_stream_xlsx::{HyperlinksPolicy, ReadOptions, ReadState, StreamError};

fn workbook_parts() -> Vec<(&'static str, String)> {
    vec![
        ("[Content_Types].xml", crate::CONTENT_TYPES.to_string()),
        ("xl/sharedStrings.xml", SHARED_STRINGS.to_string()),
        ("xl/styles.xml", STYLES.to_string()),
        (
            "xl/worksheets/_rels/sheet1.xml.rels",
            hyperlink_rels(&[("rId1", "https://example.com")]),
        ),
        (
            "xl/worksheets/sheet1.xml",
            sheet_xml(
                &r#"<row><c t="s"><v>1</v></c><c s="1"><v>45292</v></c></row>"#.repeat(40),
                r#"<hyperlink ref="A1" r:id="rId1"/>"#,
            ),
        ),
    ]
}

#[test]
fn test_data_descriptor_entries_are_read() {
    let plain = stream(ReadOptions::cached(), build_archive(&workbook_parts()));
    let described = stream(
        ReadOptions::cached(),
        with_data_descriptors(&build_archive(&workbook_parts())),
    );

    assert!(described.result.is_ok());
    assert!(described.errors().is_empty());
    assert_eq!(described.events, plain.events);
    assert_eq!(described.rows.len(), 40);

    let first = &described.rows[0];
    assert_eq!(first.cells[0].value.as_string(), Some("BC"));
    assert_eq!(first.cells[1].number_format, NumberFormat::BuiltIn(14));

    let sheet = described.reader.worksheet(1).unwrap();
    assert_eq!(sheet.hyperlinks().len(), 1);
    assert_eq!(described.reader.state(), ReadState::Finished);
}

#[test]
fn test_data_descriptor_entries_emit_in_order() {
    let options = ReadOptions::cached().with_hyperlinks(HyperlinksPolicy::Emit);
    let outcome = stream(
        options,
        with_data_descriptors(&build_archive(&workbook_parts())),
    );

    assert_eq!(
        outcome.events[..2],
        [
            Recorded::Hyperlinks(1),
            Recorded::Hyperlink(1, "rId1".into(), "https://example.com".into()),
        ]
    );
    assert_eq!(outcome.count(&Recorded::Finished), 1);
}

#[test]
fn test_truncated_data_descriptor_archive_is_terminal() {
    let mut bytes = with_data_descriptors(&build_archive(&workbook_parts()));
    // Drop the central directory and the last descriptor
    let cut = bytes
        .windows(4)
        .rposition(|w| w == [0x50, 0x4b, 0x07, 0x08])
        .unwrap();
    bytes.truncate(cut + 6);

    let outcome = stream(ReadOptions::cached(), bytes);

    assert!(matches!(outcome.result, Err(StreamError::Io(_))));
    assert_eq!(outcome.errors(), vec![None]);
    assert_eq!(outcome.count(&Recorded::Finished), 0);
    // The worksheet itself was complete
    assert_eq!(outcome.rows.len(), 40);
}
