//! CSV line splitting and header column lookup
//!
//! Both exports are read one line at a time because their structure (item
//! headers, preambles, section markers) is positional. Each line is split with
//! the `csv` parser so quoted fields keep embedded commas.

use csv::ReaderBuilder;
use std::collections::HashMap;
use std::str::FromStr;

use crate::core::error::IngestError;

/// Split one CSV line into fields with surrounding quotes stripped.
///
/// An empty line yields no fields.
pub fn split_line(line: &str, file: &str, line_no: usize) -> Result<Vec<String>, IngestError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match rdr.records().next() {
        Some(Ok(record)) => Ok(record
            .iter()
            .map(|field| field.trim_matches('"').to_string())
            .collect()),
        Some(Err(e)) => Err(IngestError::Csv {
            file: file.to_string(),
            line: line_no,
            message: e.to_string(),
        }),
        None => Ok(Vec::new()),
    }
}

/// Parse a numeric cell; anything unparsable is fatal
pub fn parse_number<T: FromStr>(file: &str, value: &str, column: &str, line: usize) -> Result<T, IngestError> {
    value.trim().parse().map_err(|_| IngestError::InvalidNumber {
        file: file.to_string(),
        field: column.to_string(),
        value: value.to_string(),
        line,
    })
}

/// True for empty or whitespace-only text
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Map from header name to column position
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    file: String,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Build the index from a split header line. Blank names are skipped; a
    /// repeated name keeps its first position.
    pub fn from_header(fields: &[String], file: &str) -> Self {
        let mut positions = HashMap::new();
        for (i, name) in fields.iter().enumerate() {
            if !is_blank(name) {
                positions.entry(name.clone()).or_insert(i);
            }
        }
        Self {
            file: file.to_string(),
            positions,
        }
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// Fail unless every named column is present
    pub fn require(&self, columns: &[&str]) -> Result<(), IngestError> {
        for column in columns {
            self.try_position(column)?;
        }
        Ok(())
    }

    fn try_position(&self, column: &str) -> Result<usize, IngestError> {
        self.position(column)
            .ok_or_else(|| IngestError::MissingColumn {
                column: column.to_string(),
                file: self.file.clone(),
            })
    }

    /// Cell value for a column; rows shorter than the header read as blank
    pub fn cell<'a>(&self, fields: &'a [String], column: &str) -> Result<&'a str, IngestError> {
        let idx = self.try_position(column)?;
        Ok(fields.get(idx).map(String::as_str).unwrap_or(""))
    }

    pub fn parse_f64(&self, value: &str, column: &str, line: usize) -> Result<f64, IngestError> {
        parse_number(&self.file, value, column, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(line: &str) -> Vec<String> {
        split_line(line, "test", 1).unwrap()
    }

    #[test]
    fn test_split_plain_and_quoted() {
        assert_eq!(fields("P1,Beam,W12x50"), vec!["P1", "Beam", "W12x50"]);
        assert_eq!(
            fields("\"P1\",\"Beam\",\"W12x50, typ\""),
            vec!["P1", "Beam", "W12x50, typ"]
        );
    }

    #[test]
    fn test_split_keeps_empty_cells() {
        assert_eq!(fields(",,20,"), vec!["", "", "20", ""]);
    }

    #[test]
    fn test_split_blank_line() {
        assert!(fields("").is_empty());
        assert!(fields("   ").is_empty());
    }

    #[test]
    fn test_header_index_skips_blank_names() {
        let header = fields("Plan Name,Type,,Name");
        let index = ColumnIndex::from_header(&header, "test");
        assert_eq!(index.position("Plan Name"), Some(0));
        assert_eq!(index.position("Name"), Some(3));
        assert_eq!(index.position(""), None);
    }

    #[test]
    fn test_header_index_first_position_wins() {
        let header = fields("Name,Type,Name");
        let index = ColumnIndex::from_header(&header, "test");
        assert_eq!(index.position("Name"), Some(0));
    }

    #[test]
    fn test_require_reports_missing_column() {
        let index = ColumnIndex::from_header(&fields("Plan Name,Type"), "geometry");
        assert!(index.require(&["Plan Name", "Type"]).is_ok());
        match index.require(&["Plan Name", "Qty"]) {
            Err(IngestError::MissingColumn { column, file }) => {
                assert_eq!(column, "Qty");
                assert_eq!(file, "geometry");
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_cell_short_row_is_blank() {
        let index = ColumnIndex::from_header(&fields("A,B,C"), "test");
        let row = fields("1,2");
        assert_eq!(index.cell(&row, "B").unwrap(), "2");
        assert_eq!(index.cell(&row, "C").unwrap(), "");
    }

    #[test]
    fn test_parse_numbers() {
        let index = ColumnIndex::from_header(&fields("EA"), "test");
        assert_eq!(parse_number::<i64>("test", " 3 ", "EA", 2).unwrap(), 3);
        assert_eq!(index.parse_f64("20.5", "LF", 2).unwrap(), 20.5);
        assert!(matches!(
            parse_number::<i64>("test", "2.0", "EA", 7),
            Err(IngestError::InvalidNumber { line: 7, .. })
        ));
        assert!(index.parse_f64("", "SF", 2).is_err());
    }
}
