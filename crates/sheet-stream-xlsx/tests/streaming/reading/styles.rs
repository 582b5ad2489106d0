//! Placeholder and cached style resolution.

use crate::{build_archive, sheet_xml, stream, STYLES};
use sheet_stream_core::NumberFormat;
use sheet_stream_xlsx::{ReadOptions, StylesPolicy};

fn dated_sheet() -> String {
    sheet_xml(r#"<row r="1"><c r="A1" s="1"><v>45292</v></c></row>"#, "")
}

fn cache() -> ReadOptions {
    ReadOptions::default().with_styles(StylesPolicy::Cache)
}

#[test]
fn test_placeholder_without_styles_part() {
    let parts = [("xl/worksheets/sheet1.xml", dated_sheet())];
    let outcome = stream(cache(), build_archive(&parts));

    let styles = outcome.reader.styles();
    assert!(styles.is_placeholder());
    assert!(styles.resolve(1).is_default());

    let cell = &outcome.rows[0].cells[0];
    assert_eq!(cell.style_index, 1);
    assert_eq!(cell.number_format, NumberFormat::General);
    assert!(cell.as_datetime().is_none());
}

#[test]
fn test_cached_table_after_styles_part() {
    let parts = [
        ("xl/styles.xml".to_string(), STYLES.to_string()),
        ("xl/worksheets/sheet1.xml".to_string(), dated_sheet()),
    ];
    let outcome = stream(cache(), build_archive(&parts));

    let styles = outcome.reader.styles();
    assert!(!styles.is_placeholder());
    assert!(!styles.resolve(1).is_default());
    assert!(styles.resolve(2).font.bold);
    assert!(styles.resolve(0).is_default());

    let cell = &outcome.rows[0].cells[0];
    assert_eq!(cell.number_format, NumberFormat::BuiltIn(14));
    assert!(cell.as_datetime().is_some());
}

#[test]
fn test_worksheet_before_styles_uses_placeholder() {
    let parts = [
        ("xl/worksheets/sheet1.xml".to_string(), dated_sheet()),
        ("xl/styles.xml".to_string(), STYLES.to_string()),
    ];
    let outcome = stream(cache(), build_archive(&parts));

    assert_eq!(outcome.rows[0].cells[0].number_format, NumberFormat::General);
    // Swapped in once the part was read
    assert!(!outcome.reader.styles().is_placeholder());
}

#[test]
fn test_skip_keeps_placeholder() {
    let parts = [
        ("xl/styles.xml".to_string(), STYLES.to_string()),
        ("xl/worksheets/sheet1.xml".to_string(), dated_sheet()),
    ];
    let outcome = stream(ReadOptions::default(), build_archive(&parts));

    assert!(outcome.reader.styles().is_placeholder());
    assert_eq!(outcome.rows[0].cells[0].number_format, NumberFormat::General);
}
