//! Binary and XML workbooks via calamine.
//!
//! Only the first worksheet is read. Values are the cached results stored in
//! the file, so formula cells yield their last computed value.

use calamine::{Data, Range, Reader, Xls, Xlsx};
use chrono::NaiveDate;
use std::io::Cursor;

use crate::models::{Cell, Sheet};

/// Read a legacy `.xls` workbook.
pub fn read_xls(bytes: &[u8]) -> Result<Sheet, calamine::Error> {
    let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(calamine::Error::Msg("workbook has no worksheets"))??;
    Ok(range_to_sheet(&range))
}

/// Read an `.xlsx` workbook.
pub fn read_xlsx(bytes: &[u8]) -> Result<Sheet, calamine::Error> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(calamine::Error::Msg("workbook has no worksheets"))??;
    Ok(range_to_sheet(&range))
}

/// Convert a calamine range into a sheet anchored at A1.
///
/// calamine ranges start at the first used cell; leading rows and columns
/// are re-inserted as empty so column 0 is always the sheet's first column.
fn range_to_sheet(range: &Range<Data>) -> Sheet {
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or_default();

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut row = vec![Cell::Empty; start_col];
        row.extend(data_row.iter().map(convert_value));
        rows.push(row);
    }

    Sheet::new(rows)
}

/// Map a calamine value onto the shared cell model.
///
/// Date-typed cells carry the workbook's epoch (1900 or 1904), which
/// `as_datetime` applies.
pub fn convert_value(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => {
            if dt.is_datetime() {
                match dt.as_datetime() {
                    Some(ndt) => Cell::CalendarDate(ndt.date()),
                    None => Cell::Number(dt.as_f64()),
                }
            } else {
                Cell::Number(dt.as_f64())
            }
        }
        Data::DateTimeIso(s) => parse_iso_date(s)
            .map(Cell::CalendarDate)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.split('T').next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
