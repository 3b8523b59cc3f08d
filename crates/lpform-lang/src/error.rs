use std::io;

use lpform_matrix::{DumpError, DumpFormatError, UnknownMatrix};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LpError {
    #[error("Invalid arguments: {0}")]
    Argument(String),
    #[error("Given LP is empty, no data is available")]
    EmptyProblem,
    /// `detect_errors` has not been run on this parser yet
    #[error("Given LP may contain errors. Search for errors first.")]
    NotChecked,
    /// `detect_errors` ran and reported diagnostics
    #[error("Given LP contains {count} syntax error(s). Can't calculate matrices.")]
    InvalidProblem { count: usize },
    #[error("Line index {index} is out of range for {len} lines")]
    Index { index: usize, len: usize },
    #[error("Variable x{index} is outside the problem width of {width} variables")]
    VariableOutOfRange { index: usize, width: usize },
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: &'static str },
    #[error("Matrix dump is malformed: {0}")]
    DumpFormat(#[from] DumpFormatError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LpError {
    /// True for both "never checked" and "checked with errors"
    pub fn is_invalid_problem(&self) -> bool {
        matches!(self, LpError::NotChecked | LpError::InvalidProblem { .. })
    }
}

impl From<DumpError> for LpError {
    fn from(err: DumpError) -> Self {
        match err {
            DumpError::Io(err) => LpError::Io(err),
            DumpError::Format(err) => LpError::DumpFormat(err),
        }
    }
}

impl From<UnknownMatrix> for LpError {
    fn from(err: UnknownMatrix) -> Self {
        LpError::Argument(err.to_string())
    }
}
