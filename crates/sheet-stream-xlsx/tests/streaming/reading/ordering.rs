//! Entry order, classification and draining.

use crate::{
    build_archive, hyperlink_rels, sheet_xml, stream, Recorded, CONTENT_TYPES, ROOT_RELS,
    SHARED_STRINGS, STYLES, WORKBOOK,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheet_stream_xlsx::{EntriesPolicy, ReadOptions, ReadState};

fn workbook_parts() -> Vec<(String, String)> {
    vec![
        ("[Content_Types].xml".into(), CONTENT_TYPES.into()),
        ("_rels/.rels".into(), ROOT_RELS.into()),
        ("xl/workbook.xml".into(), WORKBOOK.into()),
        ("xl/sharedStrings.xml".into(), SHARED_STRINGS.into()),
        ("xl/styles.xml".into(), STYLES.into()),
        (
            "xl/worksheets/sheet1.xml".into(),
            sheet_xml(r#"<row r="1"><c r="A1" t="s"><v>1</v></c></row>"#, ""),
        ),
        (
            "xl/worksheets/sheet2.xml".into(),
            sheet_xml(r#"<row r="1"><c r="A1"><v>2</v></c></row>"#, ""),
        ),
        (
            "xl/worksheets/_rels/sheet2.xml.rels".into(),
            hyperlink_rels(&[("rId1", "https://example.com")]),
        ),
        ("docProps/app.xml".into(), "<Properties/>".into()),
    ]
}

#[test]
fn test_finished_is_last_and_raised_once() {
    let outcome = stream(ReadOptions::cached(), build_archive(&workbook_parts()));

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.reader.state(), ReadState::Finished);
    assert_eq!(outcome.count(&Recorded::Finished), 1);
    assert_eq!(outcome.events.last(), Some(&Recorded::Finished));
    assert!(outcome.errors().is_empty());
}

#[test]
fn test_every_entry_classified_once() {
    let parts = workbook_parts();
    let options = ReadOptions::cached().with_entries(EntriesPolicy::Emit);
    let outcome = stream(options, build_archive(&parts));

    let entries: Vec<String> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            Recorded::Entry(path) => Some(path.clone()),
            _ => None,
        })
        .collect();
    let expected: Vec<String> = parts.iter().map(|(path, _)| path.clone()).collect();
    assert_eq!(entries, expected);
}

#[test]
fn test_entry_raised_before_its_handler() {
    let options = ReadOptions::default().with_entries(EntriesPolicy::Emit);
    let outcome = stream(options, build_archive(&workbook_parts()));

    let entry = outcome
        .events
        .iter()
        .position(|e| *e == Recorded::Entry("xl/worksheets/sheet2.xml".into()))
        .unwrap();
    let row = outcome
        .events
        .iter()
        .position(|e| *e == Recorded::Row(2, 0))
        .unwrap();
    assert!(entry < row);
}

#[test]
fn test_ignorable_entries_are_drained() {
    // Large unrecognized entries sit between the parts that matter
    let media = vec![0xA5u8; 256 * 1024];
    let parts: Vec<(String, Vec<u8>)> = vec![
        ("xl/media/image1.png".into(), media.clone()),
        ("xl/sharedStrings.xml".into(), SHARED_STRINGS.into()),
        ("xl/theme/theme1.xml".into(), media.clone()),
        (
            "xl/worksheets/sheet1.xml".into(),
            sheet_xml(r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#, "").into_bytes(),
        ),
        ("xl/media/image2.png".into(), media),
    ];
    let outcome = stream(ReadOptions::cached(), build_archive(&parts));

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].cells[0].value.as_string(), Some("A"));
    assert_eq!(outcome.events.last(), Some(&Recorded::Finished));
}

#[test]
fn test_only_ignorable_entries() {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("docProps/core.xml", "<coreProperties/>"),
    ];
    let outcome = stream(ReadOptions::cached(), build_archive(&parts));

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.events, vec![Recorded::Finished]);
    assert_eq!(outcome.reader.worksheets().count(), 0);
    assert!(outcome.reader.shared_strings().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_finished_once_and_last_for_any_order(
        order in Just((0..workbook_parts().len()).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let parts = workbook_parts();
        let shuffled: Vec<(String, String)> = order.iter().map(|&i| parts[i].clone()).collect();
        let options = ReadOptions::cached().with_entries(EntriesPolicy::Emit);
        let outcome = stream(options, build_archive(&shuffled));

        prop_assert!(outcome.result.is_ok());
        prop_assert_eq!(outcome.count(&Recorded::Finished), 1);
        prop_assert_eq!(outcome.events.last(), Some(&Recorded::Finished));

        let entries = outcome
            .events
            .iter()
            .filter(|e| matches!(e, Recorded::Entry(_)))
            .count();
        prop_assert_eq!(entries, parts.len());
        prop_assert!(outcome.errors().is_empty());
    }
}
