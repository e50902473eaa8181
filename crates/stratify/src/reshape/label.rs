//! Compound label handling: transposition, splitting and value cleanup.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructuralError};
use crate::input::DataTable;

/// Separator between entity and metric inside a column label.
pub const LABEL_DELIMITER: &str = "!!";

/// Glyphs stripped from numeric text before parsing.
///
/// `Â±` is how a UTF-8 `±` reads back after a Latin-1 round trip. It is
/// listed first so the stray `Â` goes with it.
const STRIPPED_GLYPHS: &[&str] = &["\u{00C2}\u{00B1}", "\u{00B1}", ","];

/// One original column of the wide extract, turned on its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Full column header, e.g. `Autauga County, Alabama!!Estimate`.
    pub label: String,
    /// Cell text from the single data row.
    pub value: String,
}

impl RawRecord {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Turn every column of a one-row table into a [`RawRecord`].
pub fn transpose(table: &DataTable) -> Result<Vec<RawRecord>> {
    if table.row_count() != 1 {
        return Err(StructuralError::UnexpectedShape(table.row_count()).into());
    }

    let row = &table.rows[0];
    Ok(table
        .headers
        .iter()
        .zip(row.iter())
        .map(|(label, value)| RawRecord::new(label.as_str(), value.as_str()))
        .collect())
}

/// Split a label into `(entity, metric)` on `delimiter`.
///
/// Anything other than exactly two parts is a structural error; the label
/// is never truncated or padded.
pub fn split_label<'a>(label: &'a str, delimiter: &str) -> std::result::Result<(&'a str, &'a str), StructuralError> {
    let parts: Vec<&str> = label.split(delimiter).collect();
    match parts.as_slice() {
        [entity, metric] => Ok((entity, metric)),
        _ => Err(StructuralError::MalformedLabel {
            label: label.to_string(),
            parts: parts.len(),
        }),
    }
}

/// Strip thousands separators and plus/minus glyphs, then trim.
pub fn clean_numeric_text(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    for glyph in STRIPPED_GLYPHS {
        cleaned = cleaned.replace(glyph, "");
    }
    cleaned.trim().to_string()
}

/// Parse cleaned text as a finite number.
pub fn parse_finite(cleaned: &str) -> Option<f64> {
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TextEncoding;

    #[test]
    fn test_split_two_parts() {
        let (entity, metric) =
            split_label("Autauga County, Alabama!!Estimate", LABEL_DELIMITER).unwrap();
        assert_eq!(entity, "Autauga County, Alabama");
        assert_eq!(metric, "Estimate");
    }

    #[test]
    fn test_split_rejects_three_parts() {
        let err = split_label("A!!B!!C", LABEL_DELIMITER).unwrap_err();
        assert_eq!(
            err,
            StructuralError::MalformedLabel {
                label: "A!!B!!C".to_string(),
                parts: 3
            }
        );
    }

    #[test]
    fn test_split_rejects_single_part() {
        assert!(split_label("Geography", LABEL_DELIMITER).is_err());
    }

    #[test]
    fn test_split_keeps_empty_metric() {
        let (entity, metric) = split_label("Somewhere!!", LABEL_DELIMITER).unwrap();
        assert_eq!(entity, "Somewhere");
        assert_eq!(metric, "");
    }

    #[test]
    fn test_clean_numeric_text() {
        assert_eq!(clean_numeric_text("58,786"), "58786");
        assert_eq!(clean_numeric_text("±2,345"), "2345");
        assert_eq!(clean_numeric_text("Â±2,345"), "2345");
        assert_eq!(clean_numeric_text(" 1,234,567 "), "1234567");
        assert_eq!(clean_numeric_text("N/A"), "N/A");
    }

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite("58786"), Some(58786.0));
        assert_eq!(parse_finite("12.5"), Some(12.5));
        assert_eq!(parse_finite("N/A"), None);
        assert_eq!(parse_finite(""), None);
        assert_eq!(parse_finite("inf"), None);
        assert_eq!(parse_finite("NaN"), None);
        assert_eq!(parse_finite("250000+"), None);
    }

    #[test]
    fn test_transpose_requires_single_row() {
        let table = DataTable::new(
            vec!["a!!Estimate".into()],
            vec![vec!["1".into()], vec!["2".into()]],
            b',',
            TextEncoding::Utf8,
        );
        assert!(transpose(&table).is_err());

        let table = DataTable::new(
            vec!["a!!Estimate".into(), "a!!Margin of Error".into()],
            vec![vec!["1".into(), "±2".into()]],
            b',',
            TextEncoding::Utf8,
        );
        let records = transpose(&table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], RawRecord::new("a!!Margin of Error", "±2"));
    }
}
