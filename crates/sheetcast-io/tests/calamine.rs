// Integration test for the calamine read backend.
// Run with: `cargo test -p sheetcast-io --features calamine --test calamine`

#[path = "common.rs"]
mod common;

use common::build_workbook;
use sheetcast_io::{CalamineGrid, GridReader, RawCell};

#[test]
fn calamine_reads_native_kinds() {
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value("title");
        sh.get_cell_mut((2, 1)).set_value_number(42.5);
        sh.get_cell_mut((3, 1)).set_value_bool(true);
        sh.get_cell_mut((1, 2)).set_formula("A1&\"!\"");
    });

    let mut grid = CalamineGrid::open_path(&path).expect("open via calamine");
    assert_eq!(grid.sheet_names().unwrap(), vec!["Sheet1".to_string()]);

    let sheet = grid.read_sheet("Sheet1").unwrap();
    assert_eq!(sheet.cell(1, 1), Some(&RawCell::Text("title".to_string())));
    assert_eq!(
        sheet.cell(1, 2),
        Some(&RawCell::Number {
            value: 42.5,
            date_format: false
        })
    );
    assert_eq!(sheet.cell(1, 3), Some(&RawCell::Bool(true)));
    assert!(matches!(sheet.cell(2, 1), Some(RawCell::Formula(_))));
}

#[test]
fn calamine_surfaces_date_styled_numbers() {
    // Excel 1900 date serial for 2023-03-01 is 44986.
    let (_dir, path) = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((1, 1)).set_value_number(44986);
        let _ = sh
            .get_style_mut("A1")
            .get_number_format_mut()
            .set_format_code(umya_spreadsheet::NumberingFormat::FORMAT_DATE_XLSX14);
    });

    let mut grid = CalamineGrid::open_path(&path).expect("open via calamine");
    let sheet = grid.read_sheet("Sheet1").unwrap();
    match sheet.cell(1, 1) {
        Some(RawCell::Number { value, date_format }) => {
            assert_eq!(*value, 44986.0);
            assert!(date_format, "date style must survive the read");
        }
        other => panic!("expected a date-styled number, got {other:?}"),
    }
}

#[test]
fn calamine_missing_sheet_is_a_backend_error() {
    let (_dir, path) = build_workbook(|_| {});
    let mut grid = CalamineGrid::open_path(&path).unwrap();
    assert!(grid.read_sheet("absent").is_err());
}
