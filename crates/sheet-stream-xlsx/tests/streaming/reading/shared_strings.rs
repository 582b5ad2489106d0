//! Shared string policies and their effect on worksheet cells.

use crate::{build_archive, sheet_xml, stream, Recorded, SHARED_STRINGS};
use pretty_assertions::assert_eq;
use sheet_stream_core::CellValue;
use sheet_stream_xlsx::{ReadOptions, SharedStringsPolicy};

fn string_cells() -> String {
    sheet_xml(
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>"#,
        "",
    )
}

#[test]
fn test_cache_builds_table() {
    let parts = [("xl/sharedStrings.xml", SHARED_STRINGS)];
    let options = ReadOptions::default().with_shared_strings(SharedStringsPolicy::Cache);
    let outcome = stream(options, build_archive(&parts));

    let table = outcome.reader.shared_strings().expect("table cached");
    assert_eq!(table.as_slice(), &["A".to_string(), "BC".to_string()]);
    assert_eq!(outcome.events, vec![Recorded::Finished]);
}

#[test]
fn test_emit_raises_one_event_per_item() {
    let parts = [("xl/sharedStrings.xml", SHARED_STRINGS)];
    let options = ReadOptions::default().with_shared_strings(SharedStringsPolicy::Emit);
    let outcome = stream(options, build_archive(&parts));

    assert_eq!(
        outcome.events,
        vec![
            Recorded::SharedString(0, "A".into()),
            Recorded::SharedString(1, "BC".into()),
            Recorded::Finished,
        ]
    );
    assert!(outcome.reader.shared_strings().is_none());
}

#[test]
fn test_skip_leaves_indices_unresolved() {
    let parts = [
        ("xl/sharedStrings.xml".to_string(), SHARED_STRINGS.to_string()),
        ("xl/worksheets/sheet1.xml".to_string(), string_cells()),
    ];
    let outcome = stream(ReadOptions::default(), build_archive(&parts));

    assert!(outcome.reader.shared_strings().is_none());
    let values: Vec<&CellValue> = outcome.rows[0].cells.iter().map(|c| &c.value).collect();
    assert_eq!(
        values,
        vec![
            &CellValue::SharedStringIndex(0),
            &CellValue::SharedStringIndex(1)
        ]
    );
}

#[test]
fn test_cached_table_resolves_later_worksheet() {
    let parts = [
        ("xl/sharedStrings.xml".to_string(), SHARED_STRINGS.to_string()),
        ("xl/worksheets/sheet1.xml".to_string(), string_cells()),
    ];
    let options = ReadOptions::default().with_shared_strings(SharedStringsPolicy::Cache);
    let outcome = stream(options, build_archive(&parts));

    let cells = &outcome.rows[0].cells;
    assert_eq!(cells[0].value, CellValue::string("A"));
    assert_eq!(cells[1].value, CellValue::string("BC"));
}

#[test]
fn test_worksheet_before_table_keeps_indices() {
    let parts = [
        ("xl/worksheets/sheet1.xml".to_string(), string_cells()),
        ("xl/sharedStrings.xml".to_string(), SHARED_STRINGS.to_string()),
    ];
    let options = ReadOptions::default().with_shared_strings(SharedStringsPolicy::Cache);
    let outcome = stream(options, build_archive(&parts));

    assert!(outcome.errors().is_empty());
    assert_eq!(
        outcome.rows[0].cells[0].value,
        CellValue::SharedStringIndex(0)
    );
    // The table is still cached for lookups after the read
    assert_eq!(
        outcome
            .reader
            .shared_strings()
            .and_then(|t| t.get(0)),
        Some("A")
    );
}
