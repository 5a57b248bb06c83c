//! Fatal ingestion errors
//!
//! Both exports are trusted tool output. Anything that does not parse the
//! way the exporter writes it aborts the run instead of being guessed at.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("Failed to read {file}: {error}")]
    #[diagnostic(code(stk::ingest::io), help("Check the path and that the file is readable"))]
    Io {
        file: String,
        #[source]
        error: std::io::Error,
    },

    #[error("{file} line {line}: malformed CSV: {message}")]
    #[diagnostic(
        code(stk::ingest::csv),
        help("Re-export the file; quoted fields must be closed on the same line")
    )]
    Csv {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{file} has no header line")]
    #[diagnostic(
        code(stk::ingest::missing_header),
        help("The cost report must contain a row whose first cell is 'Material', followed by the column names")
    )]
    MissingHeader { file: String },

    #[error("Column '{column}' not found in the {file} header")]
    #[diagnostic(
        code(stk::ingest::missing_column),
        help("Check that the file is the expected export; the header row must name this column")
    )]
    MissingColumn { column: String, file: String },

    #[error("{file} line {line}: cannot parse {field} value '{value}' as a number")]
    #[diagnostic(
        code(stk::ingest::invalid_number),
        help("SF and LF must be decimal numbers and EA or Qty whole counts")
    )]
    InvalidNumber {
        file: String,
        field: String,
        value: String,
        line: usize,
    },

    #[error("{file} line {line}: description '{description}' does not start with a length")]
    #[diagnostic(
        code(stk::ingest::missing_length),
        help("Column and Diagonal detail rows carry their piece length at the start of the Description column")
    )]
    MissingLength {
        file: String,
        description: String,
        line: usize,
    },

    #[error("{file} line {line}: length detail row appears before any takeoff item")]
    #[diagnostic(
        code(stk::ingest::orphan_continuation),
        help("Every detail row must follow a summary row with a Plan Name")
    )]
    OrphanContinuation { file: String, line: usize },
}

impl IngestError {
    pub fn io(file: &str, error: std::io::Error) -> Self {
        IngestError::Io {
            file: file.to_string(),
            error,
        }
    }
}
