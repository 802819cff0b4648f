/*!
 * Tests for reading, rewriting and writing .xlsx packages
 */

use celltrans::errors::DocumentError;
use celltrans::workbook::style::ProtectionStyle;
use celltrans::workbook::{rewrite, CellRange, CellValue, Position, Sheet, SheetLayout, Workbook, XlsxDocument};
use crate::common;

fn is_bold(layout: &SheetLayout, position: Position) -> bool {
    layout
        .cells
        .get(&position)
        .and_then(|cell| cell.style.as_ref())
        .and_then(|style| style.font.as_ref())
        .is_some_and(|font| font.bold)
}

/// Reading the fixture yields values, styles, dimensions and merges
#[test]
fn test_open_withFixtureWorkbook_shouldReadModel() {
    common::init_logger();
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_workbook(temp_dir.path(), "fixture.xlsx").unwrap();

    let document = XlsxDocument::open(&path).unwrap();
    assert_eq!(document.path(), path.as_path());

    let workbook = document.workbook().unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Items", "Summary"]);

    let items = workbook.sheet("Items").unwrap();
    assert_eq!(items.value_at(Position::new(1, 1)), &CellValue::text("Name"));
    assert_eq!(items.value_at(Position::new(2, 2)), &CellValue::Number(5.0));
    assert_eq!(items.value_at(Position::new(2, 3)), &CellValue::text("사과"));
    assert_eq!(items.value_at(Position::new(3, 2)), &CellValue::Formula("B2*2".to_string()));
    assert!(is_bold(items, Position::new(1, 1)));
    assert!(!is_bold(items, Position::new(2, 1)));
    assert_eq!(items.column_widths.get(&1), Some(&24.5));
    assert_eq!(items.row_heights.get(&1), Some(&30.0));
    assert_eq!(items.merged_ranges, vec!["E5:F6".parse::<CellRange>().unwrap()]);

    let data = items.data_sheet();
    assert_eq!(data.header.len(), 3);
    assert_eq!(data.rows.len(), 2);
}

/// Rewritten values are saved while everything else survives the round trip
#[test]
fn test_apply_and_save_withTranslatedSheet_shouldPreserveFormatting() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_workbook(temp_dir.path(), "fixture.xlsx").unwrap();
    let output_path = temp_dir.path().join("out").join("fixture_translated.xlsx");

    let mut document = XlsxDocument::open(&path).unwrap();
    let workbook = document.workbook().unwrap();
    let items = workbook.sheet("Items").unwrap();

    let mut translated = items.data_sheet();
    translated.header[0] = CellValue::text("이름");
    translated.rows[0][0] = CellValue::text("사과");
    let rewritten = Workbook::new(vec![rewrite(items, &translated)]).unwrap();

    document.apply(&rewritten).unwrap();
    document.save(&output_path).unwrap();
    assert!(output_path.exists());

    let reread = XlsxDocument::open(&output_path).unwrap().workbook().unwrap();
    let items = reread.sheet("Items").unwrap();
    assert_eq!(items.value_at(Position::new(1, 1)), &CellValue::text("이름"));
    assert_eq!(items.value_at(Position::new(2, 1)), &CellValue::text("사과"));
    assert_eq!(items.value_at(Position::new(1, 2)), &CellValue::text("Amount"));
    assert_eq!(items.value_at(Position::new(2, 2)), &CellValue::Number(5.0));
    assert_eq!(items.value_at(Position::new(3, 2)), &CellValue::Formula("B2*2".to_string()));
    assert!(is_bold(items, Position::new(1, 1)));
    assert_eq!(items.column_widths.get(&1), Some(&24.5));
    assert_eq!(items.merged_ranges, vec!["E5:F6".parse::<CellRange>().unwrap()]);

    // untouched sheet is carried over
    let summary = reread.sheet("Summary").unwrap();
    assert_eq!(summary.value_at(Position::new(1, 1)), &CellValue::text("Total"));

    // no temporary files left behind
    let leftovers: Vec<_> = std::fs::read_dir(output_path.parent().unwrap())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".celltrans-"))
        .collect();
    assert!(leftovers.is_empty());
}

fn style_at(layout: &SheetLayout, position: Position) -> Option<&celltrans::workbook::StyleRecord> {
    layout.cells.get(&position).and_then(|cell| cell.style.as_ref())
}

/// Error literals read as empty cells and protection plus number formats survive a save
#[test]
fn test_open_and_save_withErrorCellAndProtection_shouldKeepBoth() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_formats_workbook(temp_dir.path(), "formats.xlsx").unwrap();
    let output_path = temp_dir.path().join("formats_translated.xlsx");

    let mut document = XlsxDocument::open(&path).unwrap();
    let workbook = document.workbook().unwrap();
    let checks = workbook.sheet("Checks").unwrap();

    assert_eq!(checks.value_at(Position::new(2, 1)), &CellValue::Empty);
    assert_eq!(
        style_at(checks, Position::new(1, 1)).and_then(|style| style.protection),
        Some(ProtectionStyle {
            locked: false,
            hidden: true
        })
    );

    let mut translated = checks.data_sheet();
    translated.header[0] = CellValue::text("상태");
    let rewritten = Workbook::new(vec![rewrite(checks, &translated)]).unwrap();
    document.apply(&rewritten).unwrap();
    document.save(&output_path).unwrap();

    let reread = XlsxDocument::open(&output_path).unwrap().workbook().unwrap();
    let checks = reread.sheet("Checks").unwrap();
    assert_eq!(checks.value_at(Position::new(1, 1)), &CellValue::text("상태"));
    assert_eq!(checks.value_at(Position::new(2, 1)), &CellValue::Empty);
    assert_eq!(checks.value_at(Position::new(2, 2)), &CellValue::Number(0.25));
    assert_eq!(
        style_at(checks, Position::new(1, 1)).and_then(|style| style.protection),
        Some(ProtectionStyle {
            locked: false,
            hidden: true
        })
    );
    assert_eq!(
        style_at(checks, Position::new(2, 2)).and_then(|style| style.number_format.as_deref()),
        Some("0.000%")
    );

    // the error literal itself is left in the package
    let book = umya_spreadsheet::reader::xlsx::read(&output_path).unwrap();
    let raw = book.get_sheet_by_name("Checks").unwrap().get_cell("A2").unwrap().get_value().to_string();
    assert_eq!(raw, "#VALUE!");
}

/// A sheet name without a counterpart in the package is rejected
#[test]
fn test_apply_withUnknownSheet_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_workbook(temp_dir.path(), "fixture.xlsx").unwrap();
    let mut document = XlsxDocument::open(&path).unwrap();

    let stray = Workbook::new(vec![rewrite(
        &SheetLayout::new("Elsewhere"),
        &Sheet::new("Elsewhere", vec![CellValue::text("x")], Vec::new()),
    )])
    .unwrap();

    assert!(matches!(document.apply(&stray), Err(DocumentError::SheetNotFound(name)) if name == "Elsewhere"));
}

/// Missing, legacy and corrupt inputs fail before any work is done
#[test]
fn test_open_withBadInputs_shouldReportDocumentErrors() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();

    assert!(matches!(
        XlsxDocument::open(dir.join("missing.xlsx")),
        Err(DocumentError::NotFound(_))
    ));

    let legacy = common::create_test_file(dir, "legacy.xls", b"\xD0\xCF\x11\xE0").unwrap();
    assert!(matches!(
        XlsxDocument::open(&legacy),
        Err(DocumentError::UnsupportedFormat(_))
    ));

    let corrupt = common::create_test_file(dir, "corrupt.xlsx", b"this is not a zip package").unwrap();
    assert!(matches!(
        XlsxDocument::open(&corrupt),
        Err(DocumentError::Unreadable { .. })
    ));
}

/// Two sheets with one name cannot form a workbook
#[test]
fn test_workbook_new_withDuplicateNames_shouldFail() {
    let result = Workbook::new(vec![SheetLayout::new("Data"), SheetLayout::new("Data")]);
    assert!(matches!(result, Err(DocumentError::DuplicateSheetName(name)) if name == "Data"));
}
