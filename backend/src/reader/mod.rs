//! Format-tolerant statement reading.
//!
//! Turns a file into a [`Sheet`] regardless of whether it is a legacy binary
//! workbook, an XML workbook, or delimited text saved with a spreadsheet
//! extension. Cell typing is resolved here so later stages never look at the
//! source format again.

pub mod delimited;
pub mod workbook;

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::models::Sheet;

/// Strategy that produced a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// `.xls` (BIFF) workbook
    LegacyBinary,
    /// `.xlsx` workbook
    XmlSpreadsheet,
    /// Delimited text carrying an `.xls` extension
    DelimitedText,
}

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::LegacyBinary => "legacy-binary",
            SourceFormat::XmlSpreadsheet => "xml-spreadsheet",
            SourceFormat::DelimitedText => "delimited-text",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spreadsheet kind declared by a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    Xls,
    Xlsx,
}

impl SpreadsheetKind {
    /// Case-insensitive extension check; anything but `xls`/`xlsx` is unsupported.
    pub fn from_path(path: &Path) -> ExtractResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    pub fn from_extension(ext: &str) -> ExtractResult<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xls" => Ok(SpreadsheetKind::Xls),
            "xlsx" => Ok(SpreadsheetKind::Xlsx),
            "" => Err(ExtractError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(ExtractError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SpreadsheetKind::Xls => "xls",
            SpreadsheetKind::Xlsx => "xlsx",
        }
    }
}

/// Read the first worksheet of `path`.
pub fn read_sheet(path: impl AsRef<Path>) -> ExtractResult<(Sheet, SourceFormat)> {
    let path = path.as_ref();
    let kind = SpreadsheetKind::from_path(path)?;
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "reading statement");
    read_bytes(&bytes, kind)
}

/// Read spreadsheet bytes whose declared kind is already known.
pub fn read_bytes(bytes: &[u8], kind: SpreadsheetKind) -> ExtractResult<(Sheet, SourceFormat)> {
    match kind {
        SpreadsheetKind::Xlsx => {
            let sheet = workbook::read_xlsx(bytes)
                .map_err(|e| ExtractError::format_parse(SourceFormat::XmlSpreadsheet.name(), e))?;
            Ok((sheet, SourceFormat::XmlSpreadsheet))
        }
        SpreadsheetKind::Xls => match workbook::read_xls(bytes) {
            Ok(sheet) => Ok((sheet, SourceFormat::LegacyBinary)),
            Err(binary_err) => {
                warn!(error = %binary_err, "not a binary workbook, retrying as delimited text");
                match delimited::parse_bytes(bytes) {
                    Ok(parsed) => {
                        debug!(
                            encoding = %parsed.encoding,
                            delimiter = %delimited::format_delimiter(parsed.delimiter),
                            "parsed as delimited text"
                        );
                        Ok((parsed.sheet, SourceFormat::DelimitedText))
                    }
                    Err(text_err) => Err(ExtractError::format_parse(
                        format!(
                            "{} or {}",
                            SourceFormat::LegacyBinary,
                            SourceFormat::DelimitedText
                        ),
                        format!(
                            "{}: {}; {}: {}",
                            SourceFormat::LegacyBinary,
                            binary_err,
                            SourceFormat::DelimitedText,
                            text_err
                        ),
                    )),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use std::io::Write;

    #[test]
    fn test_extension_detection() {
        assert_eq!(
            SpreadsheetKind::from_path(Path::new("stmt.XLS")).unwrap(),
            SpreadsheetKind::Xls
        );
        assert_eq!(
            SpreadsheetKind::from_path(Path::new("/tmp/a.b.xlsx")).unwrap(),
            SpreadsheetKind::Xlsx
        );
        assert!(matches!(
            SpreadsheetKind::from_path(Path::new("stmt.csv")),
            Err(ExtractError::UnsupportedFormat(ref e)) if e == ".csv"
        ));
        assert!(matches!(
            SpreadsheetKind::from_path(Path::new("stmt")),
            Err(ExtractError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unsupported_extension_checked_before_reading() {
        let result = read_sheet("/definitely/not/here.pdf");
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_sheet("/definitely/not/here.xls");
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[test]
    fn test_xls_extension_with_csv_content_falls_back() {
        let mut file = tempfile::Builder::new().suffix(".xls").tempfile().unwrap();
        write!(file, "Date,Narration,Debit,Credit\n01-04-2024,Coffee,120,\n").unwrap();

        let (sheet, format) = read_sheet(file.path()).unwrap();
        assert_eq!(format, SourceFormat::DelimitedText);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.cell(0, 1), &Cell::from("Narration"));
        assert_eq!(sheet.cell(1, 2), &Cell::from("120"));
    }

    #[test]
    fn test_binary_garbage_names_both_strategies() {
        let bytes = [0u8, 159, 146, 150, 0, 1, 2, 3, 0, 0];
        let err = read_bytes(&bytes, SpreadsheetKind::Xls).unwrap_err();
        match err {
            ExtractError::FormatParse { strategy, message } => {
                assert!(strategy.contains("legacy-binary"));
                assert!(strategy.contains("delimited-text"));
                assert!(message.contains("delimited-text"));
            }
            other => panic!("expected FormatParse, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_xlsx_is_format_error() {
        let err = read_bytes(b"not a zip archive", SpreadsheetKind::Xlsx).unwrap_err();
        assert!(matches!(err, ExtractError::FormatParse { ref strategy, .. } if strategy == "xml-spreadsheet"));
    }
}
