//! Delimited text read as a grid of raw strings.
//!
//! Some banks export CSV/TSV and name it `.xls`. The bytes are decoded with
//! encoding detection, the delimiter is guessed from a sample of lines, and each
//! field becomes [`Cell::Text`] without any type inference.

use crate::error::{DelimitedError, DelimitedResult};
use crate::models::{Cell, Sheet};

/// Delimiters tried by [`detect_delimiter`].
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Non-empty lines inspected by [`detect_delimiter`].
const SAMPLE_LINES: usize = 20;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct DelimitedSheet {
    pub sheet: Sheet,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Unknown labels and invalid UTF-8 degrade to lossy UTF-8 rather than failing.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };
    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter over the first non-empty lines.
///
/// A candidate scores by how many sampled lines contain it, then by its
/// widest line, so a banner line cannot decide alone. Ties keep the earlier
/// entry of [`DELIMITERS`]; falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    let mut best_sep = ',';
    let mut best_score = (0, 0);

    for &sep in &DELIMITERS {
        let mut lines = 0;
        let mut widest = 0;
        for line in &sample {
            let count = line.matches(sep).count();
            if count > 0 {
                lines += 1;
                widest = widest.max(count);
            }
        }
        if (lines, widest) > best_score {
            best_score = (lines, widest);
            best_sep = sep;
        }
    }

    best_sep
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

/// Parse already-decoded text with an explicit delimiter.
pub fn parse_str(content: &str, delimiter: char) -> DelimitedResult<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| Cell::Text(field.to_string())).collect());
    }

    Ok(Sheet::new(rows))
}

/// Parse bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes(bytes: &[u8]) -> DelimitedResult<DelimitedSheet> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);

    if content.contains('\0') {
        return Err(DelimitedError::Binary);
    }
    if content.trim().is_empty() {
        return Err(DelimitedError::EmptyFile);
    }

    let delimiter = detect_delimiter(&content);
    let sheet = parse_str(&content, delimiter)?;

    Ok(DelimitedSheet {
        sheet,
        encoding,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_rows() {
        let sheet = parse_str("Date,Narration\n01-04-2024,Coffee", ',').unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.cell(1, 1), &Cell::from("Coffee"));
    }

    #[test]
    fn test_quoted_thousands_stay_in_one_field() {
        let sheet = parse_str("a,b\n\"12,345.67\",x", ',').unwrap();
        assert_eq!(sheet.cell(1, 0), &Cell::from("12,345.67"));
        assert_eq!(sheet.cell(1, 1), &Cell::from("x"));
    }

    #[test]
    fn test_ragged_rows_allowed() {
        let sheet = parse_str("Bank banner\nDate,Narration,Debit,Credit\n", ',').unwrap();
        assert_eq!(sheet.row(0).unwrap().len(), 1);
        assert_eq!(sheet.row(1).unwrap().len(), 4);
    }

    #[test]
    fn test_values_not_typed() {
        let sheet = parse_str("120.50,2024-04-01", ',').unwrap();
        assert_eq!(sheet.cell(0, 0), &Cell::from("120.50"));
        assert_eq!(sheet.cell(0, 1), &Cell::from("2024-04-01"));
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("\n\na\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_skips_plain_banner() {
        let content = "ACME Bank Statement\nDate\tNarration\tDebit\tCredit\n01-04-2024\tCoffee\t120\t\n";
        assert_eq!(detect_delimiter(content), '\t');
    }

    #[test]
    fn test_detect_delimiter_outvotes_banner_comma() {
        let content = "ACME Bank, Mumbai Branch\nDate;Narration;Debit;Credit\n01-04-2024;Coffee;120;\n";
        assert_eq!(detect_delimiter(content), ';');
    }

    #[test]
    fn test_detect_delimiter_decimal_commas_in_semicolon_rows() {
        let content = "Date;Narration;Debit;Credit\n01-04-2024;Coffee;1,5;\n02-04-2024;Tea;2,5;\n";
        assert_eq!(detect_delimiter(content), ';');
    }

    #[test]
    fn test_detect_delimiter_default_comma() {
        assert_eq!(detect_delimiter("single column"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let parsed = parse_bytes(b"Date;Narration\n01-04-2024;Coffee").unwrap();
        assert_eq!(parsed.delimiter, ';');
        assert_eq!(parsed.sheet.len(), 2);
    }

    #[test]
    fn test_bom_stripped() {
        let parsed = parse_bytes(b"\xEF\xBB\xBFDate,Narration\n").unwrap();
        assert_eq!(parsed.sheet.cell(0, 0), &Cell::from("Date"));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_binary_rejected() {
        assert!(matches!(parse_bytes(b"\xD0\xCF\x11\xE0\0\0\0\0\x01\x02"), Err(DelimitedError::Binary)));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(parse_bytes(b"  \n "), Err(DelimitedError::EmptyFile)));
    }
}
