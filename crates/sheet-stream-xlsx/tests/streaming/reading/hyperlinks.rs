//! Correlation of worksheet relations with their worksheet.

use crate::{build_archive, concat_archives, hyperlink_rels, sheet_xml, stream, Recorded};
use pretty_assertions::assert_eq;
use sheet_stream_core::CellAddress;
use sheet_stream_xlsx::{HyperlinksPolicy, ReadOptions};

const RELS_PATH: &str = "xl/worksheets/_rels/sheet5.xml.rels";
const SHEET_PATH: &str = "xl/worksheets/sheet5.xml";

fn linked_sheet() -> String {
    sheet_xml(
        r#"<row r="1"><c r="A1" t="inlineStr"><is><t>home</t></is></c></row>"#,
        r#"<hyperlink ref="A1" r:id="rId1" tooltip="Go home"/><hyperlink ref="B2" location="Sheet2!A1"/>"#,
    )
}

fn cache() -> ReadOptions {
    ReadOptions::default().with_hyperlinks(HyperlinksPolicy::Cache)
}

#[test]
fn test_relations_before_worksheet_are_used() {
    let parts = [
        (RELS_PATH, hyperlink_rels(&[("rId1", "https://example.com/home")])),
        (SHEET_PATH, linked_sheet()),
    ];
    let outcome = stream(cache(), build_archive(&parts));

    assert!(outcome.errors().is_empty());
    let sheet = outcome.reader.worksheet(5).unwrap();
    assert!(sheet.had_hyperlink_reader());

    let link = sheet.hyperlink_at(&CellAddress::new(0, 0)).unwrap();
    assert_eq!(link.target.as_deref(), Some("https://example.com/home"));
    assert_eq!(link.tooltip.as_deref(), Some("Go home"));

    let internal = sheet.hyperlink_at(&CellAddress::new(1, 1)).unwrap();
    assert_eq!(internal.location.as_deref(), Some("Sheet2!A1"));
}

#[test]
fn test_relations_after_worksheet_are_not_seen() {
    let parts = [
        (SHEET_PATH, linked_sheet()),
        (RELS_PATH, hyperlink_rels(&[("rId1", "https://example.com/home")])),
    ];
    let outcome = stream(cache(), build_archive(&parts));

    // Late relations are not an error
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.events.last(), Some(&Recorded::Finished));

    let sheet = outcome.reader.worksheet(5).unwrap();
    assert!(!sheet.had_hyperlink_reader());
    assert!(sheet.hyperlink_at(&CellAddress::new(0, 0)).is_none());
    // Location links need no relations
    assert!(sheet.hyperlink_at(&CellAddress::new(1, 1)).is_some());

    // The relations are still registered for the sheet
    let links = outcome.reader.hyperlinks(5).unwrap();
    assert_eq!(links.target("rId1"), Some("https://example.com/home"));
}

#[test]
fn test_emit_announces_each_new_reader() {
    let parts = [
        (RELS_PATH, hyperlink_rels(&[("rId1", "https://a")])),
        (
            "xl/worksheets/_rels/sheet1.xml.rels",
            hyperlink_rels(&[("rId1", "https://b")]),
        ),
        (SHEET_PATH, linked_sheet()),
    ];
    let options = ReadOptions::default().with_hyperlinks(HyperlinksPolicy::Emit);
    let outcome = stream(options, build_archive(&parts));

    assert_eq!(
        outcome.events,
        vec![
            Recorded::Hyperlinks(5),
            Recorded::Hyperlink(5, "rId1".into(), "https://a".into()),
            Recorded::Hyperlinks(1),
            Recorded::Hyperlink(1, "rId1".into(), "https://b".into()),
            Recorded::Row(5, 0),
            Recorded::Finished,
        ]
    );
    assert!(outcome.reader.worksheet(5).unwrap().had_hyperlink_reader());
}

#[test]
fn test_emit_delivers_every_link() {
    let parts = [(
        RELS_PATH,
        hyperlink_rels(&[("rId1", "https://one"), ("rId7", "https://seven")]),
    )];
    let options = ReadOptions::default().with_hyperlinks(HyperlinksPolicy::Emit);
    let outcome = stream(options, build_archive(&parts));

    let links: Vec<_> = outcome
        .events
        .iter()
        .filter(|e| matches!(e, Recorded::Hyperlink(..)))
        .cloned()
        .collect();
    assert_eq!(
        links,
        vec![
            Recorded::Hyperlink(5, "rId1".into(), "https://one".into()),
            Recorded::Hyperlink(5, "rId7".into(), "https://seven".into()),
        ]
    );
    assert_eq!(outcome.reader.hyperlinks(5).map(|l| l.len()), Some(2));
}

#[test]
fn test_cache_raises_no_link_events() {
    let parts = [(RELS_PATH, hyperlink_rels(&[("rId1", "https://one")]))];
    let outcome = stream(cache(), build_archive(&parts));

    assert_eq!(outcome.events, vec![Recorded::Finished]);
    assert_eq!(outcome.reader.hyperlinks(5).map(|l| l.len()), Some(1));
}

#[test]
fn test_skip_registers_nothing() {
    let parts = [
        (RELS_PATH, hyperlink_rels(&[("rId1", "https://example.com/home")])),
        (SHEET_PATH, linked_sheet()),
    ];
    let outcome = stream(ReadOptions::default(), build_archive(&parts));

    assert!(outcome.reader.hyperlinks(5).is_none());
    let sheet = outcome.reader.worksheet(5).unwrap();
    assert!(!sheet.had_hyperlink_reader());
    assert!(sheet.hyperlinks().is_empty());
}

#[test]
fn test_repeated_relations_replace_previous_reader() {
    let first = build_archive(&[(RELS_PATH, hyperlink_rels(&[("rId1", "https://old")]))]);
    let second = build_archive(&[
        (RELS_PATH, hyperlink_rels(&[("rId2", "https://new")])),
        (SHEET_PATH, linked_sheet()),
    ]);
    let outcome = stream(cache(), concat_archives(&[first, second]));

    let links = outcome.reader.hyperlinks(5).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links.target("rId1"), None);
    assert_eq!(links.target("rId2"), Some("https://new"));

    // rId1 is gone, so only the internal link survives
    let sheet = outcome.reader.worksheet(5).unwrap();
    assert_eq!(sheet.hyperlinks().len(), 1);
}
