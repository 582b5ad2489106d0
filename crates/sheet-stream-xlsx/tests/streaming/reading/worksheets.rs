//! Worksheet reader registry and worksheet notifications.

use crate::{build_archive, concat_archives, sheet_xml, stream, Recorded, SHARED_STRINGS, STYLES};
use pretty_assertions::assert_eq;
use sheet_stream_core::{CellAddress, CellRange, CellValue};
use sheet_stream_xlsx::{ReadOptions, WorksheetsPolicy};

fn one_row(value: &str) -> String {
    sheet_xml(
        &format!(r#"<row r="1"><c r="A1"><v>{}</v></c></row>"#, value),
        "",
    )
}

#[test]
fn test_repeated_sheet_number_reuses_reader() {
    let first = build_archive(&[("xl/worksheets/sheet3.xml", one_row("1"))]);
    let second = build_archive(&[("xl/worksheets/sheet3.xml", one_row("2"))]);
    let options = ReadOptions::default().with_worksheets(WorksheetsPolicy::Emit);
    let outcome = stream(options, concat_archives(&[first, second]));

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.reader.worksheets().count(), 1);

    let sheet = outcome.reader.worksheet(3).expect("sheet 3 registered");
    assert_eq!(sheet.reads(), 2);
    assert_eq!(sheet.rows_read(), 2);

    assert_eq!(
        outcome.events,
        vec![
            Recorded::Worksheet(3),
            Recorded::Row(3, 0),
            Recorded::Worksheet(3),
            Recorded::Row(3, 0),
            Recorded::Finished,
        ]
    );
    let values: Vec<_> = outcome.rows.iter().map(|r| r.cells[0].value.clone()).collect();
    assert_eq!(values, vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
}

#[test]
fn test_worksheet_event_only_when_emitting() {
    let parts = [
        ("xl/worksheets/sheet1.xml", one_row("1")),
        ("xl/worksheets/sheet2.xml", one_row("2")),
    ];
    let outcome = stream(ReadOptions::default(), build_archive(&parts));

    assert_eq!(outcome.count(&Recorded::Worksheet(1)), 0);
    assert_eq!(outcome.count(&Recorded::Worksheet(2)), 0);
    // Worksheets are decoded regardless
    assert_eq!(outcome.rows.len(), 2);

    let numbers: Vec<u32> = outcome
        .reader
        .worksheets()
        .map(|w| w.sheet_number())
        .collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn test_sheets_registered_in_number_order() {
    let parts = [
        ("xl/worksheets/sheet10.xml", one_row("10")),
        ("xl/worksheets/sheet2.xml", one_row("2")),
        ("xl/worksheets/sheet7.xml", one_row("7")),
    ];
    let options = ReadOptions::default().with_worksheets(WorksheetsPolicy::Emit);
    let outcome = stream(options, build_archive(&parts));

    let announced: Vec<u32> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            Recorded::Worksheet(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(announced, vec![10, 2, 7]);

    let registered: Vec<u32> = outcome
        .reader
        .worksheets()
        .map(|w| w.sheet_number())
        .collect();
    assert_eq!(registered, vec![2, 7, 10]);
}

#[test]
fn test_full_workbook_rows() {
    let sheet = sheet_xml(
        r#"<row r="1">
             <c r="A1" t="s"><v>1</v></c>
             <c r="B1" s="1"><v>45292</v></c>
             <c r="C1" s="2" t="b"><v>0</v></c>
           </row>
           <row r="3"><c r="B3"><f>B1+1</f><v>45293</v></c></row>"#,
        "",
    )
    .replace("<sheetData>", r#"<dimension ref="A1:C3"/><sheetData>"#);
    let parts = [
        ("xl/sharedStrings.xml".to_string(), SHARED_STRINGS.to_string()),
        ("xl/styles.xml".to_string(), STYLES.to_string()),
        ("xl/worksheets/sheet1.xml".to_string(), sheet),
    ];
    let outcome = stream(ReadOptions::cached(), build_archive(&parts));

    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.rows.len(), 2);

    let first = &outcome.rows[0];
    assert_eq!(first.get(0).unwrap().value, CellValue::string("BC"));
    assert_eq!(
        first.get(1).unwrap().as_datetime().map(|d| d.to_string()),
        Some("2024-01-01 00:00:00".to_string())
    );
    assert_eq!(first.get(2).unwrap().value, CellValue::Boolean(false));
    assert_eq!(first.get(2).unwrap().style_index, 2);

    let third = &outcome.rows[1];
    assert_eq!(third.index, 2);
    let formula = third.get(1).unwrap();
    assert_eq!(formula.address, CellAddress::new(2, 1));
    assert_eq!(formula.value.formula_text(), Some("=B1+1"));
    assert_eq!(formula.value.as_number(), Some(45293.0));

    let sheet = outcome.reader.worksheet(1).unwrap();
    assert_eq!(sheet.dimension(), Some(CellRange::parse("A1:C3").unwrap()));
}
