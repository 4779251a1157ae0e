use std::path::{Path, PathBuf};

use ledgerlift::{extract, ExtractError, ExtractorConfig, SourceFormat, StatementExtractor};
use tempfile::TempDir;

fn build_workbook(dir: &Path, name: &str, f: impl FnOnce(&mut umya_spreadsheet::Spreadsheet)) -> PathBuf {
    let path = dir.join(name);
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write xlsx");
    path
}

fn set_date(sheet: &mut umya_spreadsheet::Worksheet, coord: &str, serial: f64) {
    sheet.get_cell_mut(coord).set_value_number(serial);
    let _ = sheet
        .get_style_mut(coord)
        .get_number_format_mut()
        .set_format_code(umya_spreadsheet::NumberingFormat::FORMAT_DATE_XLSX14);
}

fn statement_workbook(dir: &TempDir) -> PathBuf {
    build_workbook(dir.path(), "april.xlsx", |book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();

        sh.get_cell_mut("A1").set_value("ACME Bank");
        sh.get_cell_mut("A3").set_value("Date");
        sh.get_cell_mut("B3").set_value("Narration");
        sh.get_cell_mut("C3").set_value("Debit");
        sh.get_cell_mut("D3").set_value("Credit");

        // 2024-04-01 and 2024-04-02 in the 1900 date system
        set_date(sh, "A4", 45383.0);
        sh.get_cell_mut("B4").set_value("UPI/Coffee");
        sh.get_cell_mut("C4").set_value_number(120.5);

        set_date(sh, "A5", 45384.0);
        sh.get_cell_mut("B5").set_value("Salary");
        sh.get_cell_mut("D5").set_value("50,000.00");

        sh.get_cell_mut("A6").set_value("Total:");
        sh.get_cell_mut("B6").set_value("two transactions");
        sh.get_cell_mut("C6").set_value_number(120.5);
        sh.get_cell_mut("D6").set_value_number(50000.0);
    })
}

#[test]
fn xlsx_dates_become_iso() {
    let dir = tempfile::tempdir().unwrap();
    let path = statement_workbook(&dir);

    let records = extract(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, "2024-04-01");
    assert_eq!(records[0].withdrawal, 120.5);
    assert_eq!(records[0].deposit, 0.0);
    assert_eq!(records[1].date, "2024-04-02");
    assert_eq!(records[1].deposit, 50000.0);
}

#[test]
fn xlsx_report_uses_xml_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = statement_workbook(&dir);

    let report = StatementExtractor::new(ExtractorConfig::default())
        .extract_report(&path)
        .unwrap();
    assert_eq!(report.format, Some(SourceFormat::XmlSpreadsheet));
    assert_eq!(report.header_row, Some(2));
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn xlsx_header_with_amounts_only_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_workbook(dir.path(), "amounts.xlsx", |book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut("A1").set_value("Date");
        sh.get_cell_mut("B1").set_value("Debit");
        set_date(sh, "A2", 45383.0);
        sh.get_cell_mut("B2").set_value_number(5.0);
    });

    assert!(matches!(extract(&path), Err(ExtractError::NoHeaderFound(_))));
}

#[test]
fn text_renamed_to_xlsx_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.xlsx");
    std::fs::write(&path, "Date,Narration\n01-04-2024,Coffee\n").unwrap();

    let err = extract(&path).unwrap_err();
    assert!(matches!(err, ExtractError::FormatParse { ref strategy, .. } if strategy == "xml-spreadsheet"));
}
