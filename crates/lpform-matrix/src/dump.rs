//! Flat text dump of a set of matrices.
//!
//! ```text
//! A=[1 2
//! 2 5]
//!
//! b=[9
//! 4]
//!
//! c=[3
//! 2]
//!
//! Eqin=[-1
//! -1]
//!
//! MinMax=[1]
//!
//! ```
//!
//! A dual dump continues with one `w_<k> <restriction>` line per dual
//! variable, where the restriction is `free`, `>= 0` or `<= 0`.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::problem::{Direction, MatrixName, Matrices, Relation, VarRestriction};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DumpFormatError {
    #[error("Missing section '{0}=['")]
    MissingSection(MatrixName),
    #[error("Section '{0}' is not closed with ']'")]
    UnterminatedSection(MatrixName),
    #[error("Invalid value '{value}' in section '{section}'")]
    InvalidValue { section: MatrixName, value: String },
    #[error("Expected one value per line in section '{section}', found {found}")]
    NotAVector { section: MatrixName, found: usize },
    #[error("Invalid {section} code: {code}")]
    InvalidCode { section: MatrixName, code: i64 },
    #[error("Invalid variable restriction line: {0}")]
    InvalidRestriction(String),
    #[error("Inconsistent dimensions: {0}")]
    Shape(String),
}

#[derive(Error, Debug)]
pub enum DumpError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] DumpFormatError),
}

/// Renders `matrices` in the dump layout. `VarConstr` lines are written
/// only when the matrices carry them.
pub fn write_dump(matrices: &Matrices) -> String {
    let mut out = String::new();

    let rows: Vec<String> = matrices
        .a
        .iter()
        .map(|row| join(row.iter(), " "))
        .collect();
    push_block(&mut out, MatrixName::A, &rows);
    push_block(&mut out, MatrixName::B, &lines(matrices.b.iter()));
    push_block(&mut out, MatrixName::C, &lines(matrices.c.iter()));
    push_block(&mut out, MatrixName::Eqin, &lines(matrices.eqin_codes().iter()));
    push_block(&mut out, MatrixName::MinMax, &lines(matrices.min_max().iter()));

    if let Some(var_constr) = &matrices.var_constr {
        for (i, restriction) in var_constr.iter().enumerate() {
            out += &format!("w_{} {}\n", i + 1, restriction.label());
        }
    }

    out
}

/// Parses a dump produced by [`write_dump`]. With `dual` set the
/// `w_<k>` restriction lines are required and returned as `var_constr`;
/// otherwise they are ignored.
pub fn read_dump(text: &str, dual: bool) -> Result<Matrices, DumpFormatError> {
    let a = section(text, MatrixName::A)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_row(MatrixName::A, line))
        .collect::<Result<Vec<_>, _>>()?;
    let b = parse_vector(text, MatrixName::B)?;
    let c = parse_vector(text, MatrixName::C)?;

    let eqin = parse_vector(text, MatrixName::Eqin)?
        .into_iter()
        .map(|code| {
            Relation::from_code(code).ok_or(DumpFormatError::InvalidCode {
                section: MatrixName::Eqin,
                code,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let direction = match parse_vector(text, MatrixName::MinMax)?.as_slice() {
        [code] => Direction::from_code(*code).ok_or(DumpFormatError::InvalidCode {
            section: MatrixName::MinMax,
            code: *code,
        })?,
        other => {
            return Err(DumpFormatError::Shape(format!(
                "MinMax holds {} values, expected 1",
                other.len()
            )));
        }
    };

    let var_constr = if dual {
        Some(parse_restrictions(text)?)
    } else {
        None
    };

    let matrices = Matrices {
        a,
        b,
        c,
        eqin,
        direction,
        var_constr,
    };
    check_shape(&matrices)?;
    Ok(matrices)
}

/// Writes the dump of `matrices` to `path`, replacing any existing file
pub fn write_file(path: impl AsRef<Path>, matrices: &Matrices) -> io::Result<()> {
    let path = path.as_ref();
    tracing::debug!(
        component = "dump",
        operation = "write",
        path = %path.display(),
        dual = matrices.is_dual(),
        "writing matrix dump"
    );
    fs::write(path, write_dump(matrices))
}

pub fn read_file(path: impl AsRef<Path>, dual: bool) -> Result<Matrices, DumpError> {
    let path = path.as_ref();
    tracing::debug!(
        component = "dump",
        operation = "read",
        path = %path.display(),
        dual,
        "reading matrix dump"
    );
    let text = fs::read_to_string(path)?;
    Ok(read_dump(&text, dual)?)
}

fn join<'a>(values: impl Iterator<Item = &'a i64>, sep: &str) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(sep)
}

fn lines<'a>(values: impl Iterator<Item = &'a i64>) -> Vec<String> {
    values.map(|v| v.to_string()).collect()
}

fn push_block(out: &mut String, name: MatrixName, rows: &[String]) {
    out.push_str(&format!("{}=[{}]\n\n", name, rows.join("\n")));
}

/// Offsets at which a line starts
fn line_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1))
}

/// Body of the `<name>=[ ... ]` block; the header must open a line
fn section(text: &str, name: MatrixName) -> Result<&str, DumpFormatError> {
    let header = format!("{}=[", name);
    let start = line_starts(text)
        .find(|&i| text[i..].starts_with(&header))
        .ok_or(DumpFormatError::MissingSection(name))?;
    let body = &text[start + header.len()..];
    let end = body
        .find(']')
        .ok_or(DumpFormatError::UnterminatedSection(name))?;
    Ok(&body[..end])
}

fn parse_row(section: MatrixName, line: &str) -> Result<Vec<i64>, DumpFormatError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| DumpFormatError::InvalidValue {
                section,
                value: token.to_string(),
            })
        })
        .collect()
}

fn parse_vector(text: &str, name: MatrixName) -> Result<Vec<i64>, DumpFormatError> {
    section(text, name)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match parse_row(name, line)?.as_slice() {
            [value] => Ok(*value),
            other => Err(DumpFormatError::NotAVector {
                section: name,
                found: other.len(),
            }),
        })
        .collect()
}

fn parse_restrictions(text: &str) -> Result<Vec<VarRestriction>, DumpFormatError> {
    let mut restrictions = Vec::new();
    for line in text.lines().filter(|line| line.starts_with("w_")) {
        let invalid = || DumpFormatError::InvalidRestriction(line.to_string());
        let (index, label) = line["w_".len()..].split_once(' ').ok_or_else(invalid)?;
        let index: usize = index.parse().map_err(|_| invalid())?;
        if index != restrictions.len() + 1 {
            return Err(invalid());
        }
        restrictions.push(VarRestriction::from_label(label).ok_or_else(invalid)?);
    }
    Ok(restrictions)
}

fn check_shape(m: &Matrices) -> Result<(), DumpFormatError> {
    if m.a.len() != m.b.len() {
        return Err(DumpFormatError::Shape(format!(
            "A has {} rows but b has {} entries",
            m.a.len(),
            m.b.len()
        )));
    }
    if let Some((i, row)) = m.a.iter().enumerate().find(|(_, row)| row.len() != m.c.len()) {
        return Err(DumpFormatError::Shape(format!(
            "row {} of A has {} columns but c has {} entries",
            i + 1,
            row.len(),
            m.c.len()
        )));
    }
    if m.eqin.len() != m.b.len() {
        return Err(DumpFormatError::Shape(format!(
            "Eqin has {} entries but b has {}",
            m.eqin.len(),
            m.b.len()
        )));
    }
    if let Some(var_constr) = &m.var_constr {
        if var_constr.len() != m.c.len() {
            return Err(DumpFormatError::Shape(format!(
                "{} restriction lines for {} dual variables",
                var_constr.len(),
                m.c.len()
            )));
        }
    }
    Ok(())
}
