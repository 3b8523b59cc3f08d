use std::cell::OnceCell;
use std::path::Path;

use lpform_matrix::{MatrixName, MatrixValue, Matrices, dump};

use crate::builder::{self, Dimensions};
use crate::error::LpError;
use crate::lexer::Lexer;
use crate::normalize;
use crate::validate;
use crate::variables::VariableSet;

/// Holds the normalized lines of one LP problem and everything derived
/// from them.
///
/// Matrices are only available once [`LpParser::detect_errors`] has run and
/// reported nothing. Validation truncates the lines at the `End` line, so it
/// is meant to run once per parser.
#[derive(Debug)]
pub struct LpParser {
    lines: Vec<String>,
    diagnostics: Vec<String>,
    end_index: Option<usize>,
    checked: bool,
    dimensions: OnceCell<Dimensions>,
}

impl LpParser {
    /// Reads and normalizes a problem file. I/O errors are returned as-is.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LpError> {
        Ok(Self::with_lines(normalize::read_file_lines(path)?))
    }

    /// Splits `text` on `delimiter` and normalizes each piece. An empty text
    /// is accepted; see [`LpParser::is_empty`].
    pub fn from_text(text: &str, delimiter: &str) -> Result<Self, LpError> {
        Ok(Self::with_lines(normalize::normalize_text(text, delimiter)?))
    }

    /// Exactly one of `file` and `text` must be given
    pub fn from_options(
        file: Option<&Path>,
        text: Option<&str>,
        delimiter: &str,
    ) -> Result<Self, LpError> {
        match (file, text) {
            (Some(file), None) => Self::from_file(file),
            (None, Some(text)) => Self::from_text(text, delimiter),
            (None, None) => Err(LpError::Argument(
                "no 'text' or 'filename' specified".to_string(),
            )),
            (Some(_), Some(_)) => Err(LpError::Argument(
                "'text' and 'filename' are mutually exclusive".to_string(),
            )),
        }
    }

    fn with_lines(lines: Vec<String>) -> Self {
        if lines.is_empty() {
            tracing::warn!(
                component = "parser",
                operation = "normalize",
                status = "warning",
                "LP lines are empty, no data is available"
            );
        }
        Self {
            lines,
            diagnostics: Vec::new(),
            end_index: None,
            checked: false,
            dimensions: OnceCell::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when normalization left no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Diagnostics of the last [`LpParser::detect_errors`] run
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Position of the `End` line found by the most recent run that found one
    pub fn end_index(&self) -> Option<usize> {
        self.end_index
    }

    /// Runs every syntax check and returns the diagnostics. A non-empty
    /// result is logged as a warning; it is not an error.
    ///
    /// A second call sees the lines already truncated and reports a missing
    /// `End` line.
    pub fn detect_errors(&mut self) -> Result<Vec<String>, LpError> {
        self.diagnostics.clear();
        self.dimensions = OnceCell::new();

        let validation = validate::validate(&mut self.lines)?;
        self.checked = true;
        self.diagnostics = validation.diagnostics;
        if validation.end_index.is_some() {
            self.end_index = validation.end_index;
        }

        if !self.diagnostics.is_empty() {
            tracing::warn!(
                component = "parser",
                operation = "detect_errors",
                status = "warning",
                errors = self.diagnostics.len(),
                "Given LP contains syntax problems"
            );
        }

        Ok(self.diagnostics.clone())
    }

    /// Variables of the line at `line`
    pub fn variables(&self, line: usize) -> Result<VariableSet, LpError> {
        let text = self.lines.get(line).ok_or(LpError::Index {
            index: line,
            len: self.lines.len(),
        })?;
        VariableSet::from_tokens(&Lexer::tokenize(text))
    }

    /// The widest extended variable set over all lines, e.g. `x1..x6` for
    /// `min 3x1+2x4-x6 | st 3x1+2x2<=4 | 5x3-4x6>=3`
    pub fn all_variables(&self) -> Result<Vec<String>, LpError> {
        Ok(builder::widest_variables(&self.lines)?.extended)
    }

    fn ensure_valid(&self) -> Result<(), LpError> {
        if self.lines.is_empty() {
            return Err(LpError::EmptyProblem);
        }
        if !self.checked {
            return Err(LpError::NotChecked);
        }
        if !self.diagnostics.is_empty() {
            return Err(LpError::InvalidProblem {
                count: self.diagnostics.len(),
            });
        }
        Ok(())
    }

    pub fn dimensions(&self) -> Result<Dimensions, LpError> {
        self.ensure_valid()?;
        if let Some(dims) = self.dimensions.get() {
            return Ok(*dims);
        }
        let dims = builder::dimensions(&self.lines)?;
        tracing::debug!(
            component = "parser",
            operation = "dimensions",
            m = dims.m,
            n = dims.n,
            "computed problem dimensions"
        );
        Ok(*self.dimensions.get_or_init(|| dims))
    }

    /// One primal matrix by case-insensitive name (`A`, `b`, `c`, `Eqin`,
    /// `MinMax`)
    pub fn matrix(&self, name: &str) -> Result<MatrixValue, LpError> {
        let name = parse_name(name)?;
        let dims = self.dimensions()?;
        builder::build_one(&self.lines, dims, name)
    }

    pub fn matrices(&self) -> Result<Matrices, LpError> {
        let dims = self.dimensions()?;
        builder::build(&self.lines, dims)
    }

    /// One dual matrix by case-insensitive name; `VarConstr` (or
    /// `var_constr`) is available here as well
    pub fn dual_matrix(&self, name: &str) -> Result<MatrixValue, LpError> {
        let name = parse_name(name)?;
        let dual = self.dual_matrices()?;
        dual.get(name).ok_or_else(|| {
            LpError::Argument(format!("matrix '{name}' is not part of the dual problem"))
        })
    }

    pub fn dual_matrices(&self) -> Result<Matrices, LpError> {
        Ok(lpform_matrix::dual(&self.matrices()?))
    }

    /// Writes the primal (or with `dual`, the dual) matrices to `path`
    pub fn write_matrices(&self, path: impl AsRef<Path>, dual: bool) -> Result<(), LpError> {
        let matrices = if dual {
            self.dual_matrices()?
        } else {
            self.matrices()?
        };
        dump::write_file(path, &matrices)?;
        Ok(())
    }

    /// Reads a matrix dump. Independent of any parsed problem.
    pub fn read_matrices(path: impl AsRef<Path>, dual: bool) -> Result<Matrices, LpError> {
        Ok(dump::read_file(path, dual)?)
    }
}

fn parse_name(name: &str) -> Result<MatrixName, LpError> {
    if name.is_empty() {
        return Err(LpError::Argument(
            "desired matrix must be specified by name".to_string(),
        ));
    }
    Ok(name.parse()?)
}
