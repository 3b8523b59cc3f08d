use crate::error::LpError;
use crate::lexer::{Token, TokenKind};

/// Variables referenced by one line
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    /// Variables in order of appearance, duplicates kept
    pub existing: Vec<String>,
    /// `x1..xK` where `K` is the index of the last variable in the line
    pub extended: Vec<String>,
}

impl VariableSet {
    /// An empty `extended` list means the line references no variable,
    /// which callers treat as a malformed line.
    pub fn from_tokens(tokens: &[Token]) -> Result<Self, LpError> {
        let refs: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Variable)
            .collect();

        let existing = refs.iter().map(|t| t.text.to_ascii_lowercase()).collect();
        let extended = match refs.last() {
            Some(last) => (1..=variable_index(last)?).map(variable_name).collect(),
            None => Vec::new(),
        };

        Ok(Self { existing, extended })
    }

    pub fn width(&self) -> usize {
        self.extended.len()
    }
}

/// 1-based index carried by a variable token (`x12` -> 12)
pub fn variable_index(token: &Token) -> Result<usize, LpError> {
    token
        .text
        .get(1..)
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| LpError::InvalidNumber(token.text.clone()))
}

pub fn variable_name(index: usize) -> String {
    format!("x{index}")
}
