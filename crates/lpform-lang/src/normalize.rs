//! Turns raw problem text into compact lines: every whitespace character is
//! removed and lines left empty are dropped.

use std::fs;
use std::path::Path;

use crate::error::LpError;

pub const DEFAULT_DELIMITER: &str = "\n";

pub fn normalize_text(text: &str, delimiter: &str) -> Result<Vec<String>, LpError> {
    if delimiter.is_empty() {
        return Err(LpError::Argument("delimiter must not be empty".to_string()));
    }
    Ok(normalize_lines(text.split(delimiter)))
}

/// One logical line per physical line of the file
pub fn read_file_lines(path: impl AsRef<Path>) -> Result<Vec<String>, LpError> {
    let text = fs::read_to_string(path)?;
    Ok(normalize_lines(text.lines()))
}

pub fn normalize_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    lines
        .into_iter()
        .map(compact)
        .filter(|line| !line.is_empty())
        .collect()
}

fn compact(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}
