use crate::error::LpError;
use crate::lexer::{Token, TokenKind};
use crate::variables::variable_index;

/// Writes the coefficient of every `<sign><int>x<int>` term of `tokens` into
/// `row`, which is either one row of A or the objective vector. A bare
/// variable has coefficient 1; positions never assigned are left untouched,
/// so callers pass a zeroed slice sized to the problem width.
pub fn fill_coefficients(tokens: &[Token], row: &mut [i64]) -> Result<(), LpError> {
    let mut negative = false;
    let mut coefficient: Option<&Token> = None;

    for token in tokens {
        match token.kind {
            TokenKind::Plus | TokenKind::Minus => {
                negative = token.kind == TokenKind::Minus;
                coefficient = None;
            }
            TokenKind::Integer => coefficient = Some(token),
            TokenKind::Variable => {
                let magnitude = match coefficient {
                    Some(integer) => parse_integer(integer)?,
                    None => 1,
                };
                let index = variable_index(token)?;
                let width = row.len();
                let slot = index
                    .checked_sub(1)
                    .and_then(|column| row.get_mut(column))
                    .ok_or(LpError::VariableOutOfRange { index, width })?;
                *slot = if negative { -magnitude } else { magnitude };

                negative = false;
                coefficient = None;
            }
            _ => {
                negative = false;
                coefficient = None;
            }
        }
    }

    Ok(())
}

pub(crate) fn parse_integer(token: &Token) -> Result<i64, LpError> {
    token
        .text
        .parse()
        .map_err(|_| LpError::InvalidNumber(token.text.clone()))
}
