//! Structural checks over the normalized lines of a problem.
//!
//! Every check runs, so one pass reports all problems. Line 0 is the
//! objective, the lines after it are constraints, and the first line equal
//! to `end` terminates the problem.

use std::fmt;

use crate::error::LpError;
use crate::lexer::{Lexer, Token, TokenKind};

pub const MISSING_DIRECTION: &str = "Min/Max is not specified for object function";
pub const AMBIGUOUS_DIRECTION: &str = "Optimization way is ambiguous. Use either min or max.";
pub const MISSING_INITIALIZER: &str = "Constraint initializer 's.t' or similar is missing";
pub const MISSING_END: &str = "No END statement found";
pub const MISSING_RELATION: &str = "Constraint type missing from some constraints";
pub const MISSING_RHS: &str = "Right side argument missing from some constraints";
pub const MISSING_SIGN: &str = "Sign missing from some factors";

/// Outcome of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub diagnostics: Vec<String>,
    /// Index the terminator line had before truncation
    pub end_index: Option<usize>,
}

/// Checks `lines` and truncates them at the terminator, which is removed
/// together with everything after it. Without a terminator the lines are
/// left as they are.
///
/// Running this again on already-truncated lines reports [`MISSING_END`],
/// since the terminator is gone.
pub fn validate(lines: &mut Vec<String>) -> Result<Validation, LpError> {
    if lines.is_empty() {
        return Err(LpError::EmptyProblem);
    }

    let mut diagnostics = Vec::new();
    let tokens: Vec<Vec<Token>> = lines.iter().map(|l| Lexer::tokenize(l)).collect();

    let objective = &tokens[0];
    let has_min = contains(objective, TokenKind::Min);
    let has_max = contains(objective, TokenKind::Max);
    if !has_min && !has_max {
        diagnostics.push(MISSING_DIRECTION.to_string());
    }
    if has_min && has_max {
        diagnostics.push(AMBIGUOUS_DIRECTION.to_string());
    }

    let has_initializer = tokens
        .get(1)
        .is_some_and(|line| contains(line, TokenKind::SubjectTo));
    if !has_initializer {
        diagnostics.push(MISSING_INITIALIZER.to_string());
    }

    let end_index = tokens.iter().skip(1).position(|line| is_terminator(line)).map(|i| i + 1);
    let constraints = match end_index {
        Some(end) => {
            lines.truncate(end);
            &tokens[1..end]
        }
        None => {
            diagnostics.push(MISSING_END.to_string());
            &tokens[1..]
        }
    };

    if constraints.iter().any(|line| !line.iter().any(|t| t.kind.is_relation())) {
        diagnostics.push(MISSING_RELATION.to_string());
    }

    if constraints.iter().any(|line| rhs_token(line).is_none()) {
        diagnostics.push(MISSING_RHS.to_string());
    }

    let checked = end_index.map_or(&tokens[..], |end| &tokens[..end]);
    if checked.iter().any(|line| !signs_match_variables(line)) {
        diagnostics.push(MISSING_SIGN.to_string());
    }

    Ok(Validation {
        diagnostics,
        end_index,
    })
}

fn contains(line: &[Token], kind: TokenKind) -> bool {
    line.iter().any(|t| t.kind == kind)
}

/// A line consisting of nothing but `end`
fn is_terminator(line: &[Token]) -> bool {
    matches!(line, [end, eof] if end.kind == TokenKind::End && eof.kind == TokenKind::Eof)
}

/// The integer right after the first relation that is followed by one
pub(crate) fn rhs_token(line: &[Token]) -> Option<&Token> {
    line.windows(2)
        .find(|pair| pair[0].kind.is_relation() && pair[1].kind == TokenKind::Integer)
        .map(|pair| &pair[1])
}

/// `signs <= variables <= signs + 1`: every term but the first needs a sign
fn signs_match_variables(line: &[Token]) -> bool {
    let signs = line.iter().filter(|t| t.kind.is_sign()).count();
    let variables = line.iter().filter(|t| t.kind == TokenKind::Variable).count();
    signs <= variables && variables <= signs + 1
}

/// Printable summary of a validation run
pub struct ValidationReport<'a>(pub &'a [String]);

impl fmt::Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] errors detected", self.0.len())?;
        for message in self.0 {
            write!(f, "\n-{message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_text;

    fn lines(text: &str) -> Vec<String> {
        normalize_text(text, "|").unwrap()
    }

    #[test]
    fn test_clean_problem() {
        let mut l = lines("Max 3x1+2x2 | s.t. x1+2x2<=9 | 2x1+5x2<=4 | End | trailing");
        let v = validate(&mut l).unwrap();
        assert!(v.diagnostics.is_empty());
        assert_eq!(v.end_index, Some(3));
        assert_eq!(l, vec!["Max3x1+2x2", "s.t.x1+2x2<=9", "2x1+5x2<=4"]);
    }

    #[test]
    fn test_empty_lines() {
        let mut l = Vec::new();
        assert!(matches!(validate(&mut l), Err(LpError::EmptyProblem)));
    }

    #[test]
    fn test_missing_direction_and_initializer() {
        let mut l = lines("3x1+2x2 | x1+2x2<=9 | End");
        let v = validate(&mut l).unwrap();
        assert_eq!(v.diagnostics, vec![MISSING_DIRECTION, MISSING_INITIALIZER]);
    }

    #[test]
    fn test_ambiguous_direction() {
        let mut l = lines("min max 3x1 | st x1<=9 | End");
        let v = validate(&mut l).unwrap();
        assert_eq!(v.diagnostics, vec![AMBIGUOUS_DIRECTION]);
    }

    #[test]
    fn test_direction_after_letters() {
        let mut l = lines("zmax = 3x1 + 2x2 | s.t. x1+2x2<=9 | End");
        assert!(validate(&mut l).unwrap().diagnostics.is_empty());

        let mut l = lines("objmax 3x1 | st x1<=4 | end");
        assert!(validate(&mut l).unwrap().diagnostics.is_empty());
    }

    #[test]
    fn test_missing_end_keeps_lines() {
        let mut l = lines("3x1+2x2 | x1+2x2 | 2x1+5x2<=4");
        let v = validate(&mut l).unwrap();
        assert_eq!(
            v.diagnostics,
            vec![
                MISSING_DIRECTION,
                MISSING_INITIALIZER,
                MISSING_END,
                MISSING_RELATION,
                MISSING_RHS,
            ]
        );
        assert_eq!(v.end_index, None);
        assert_eq!(l.len(), 3);
    }

    #[test]
    fn test_missing_rhs_only() {
        let mut l = lines("max x1 | st x1<=-4 | End");
        let v = validate(&mut l).unwrap();
        assert_eq!(v.diagnostics, vec![MISSING_RHS]);
    }

    #[test]
    fn test_missing_sign() {
        let mut l = lines("max 3x1 2x2 | st x1+x2<=4 | End");
        let v = validate(&mut l).unwrap();
        assert_eq!(v.diagnostics, vec![MISSING_SIGN]);
    }

    #[test]
    fn test_too_many_signs() {
        let mut l = lines("max 3x1 | st x1+-+x2<=4 | End");
        let v = validate(&mut l).unwrap();
        assert_eq!(v.diagnostics, vec![MISSING_SIGN]);
    }

    #[test]
    fn test_leading_sign_is_allowed() {
        let mut l = lines("min -3x1+x2 | st -x1-x2>=4 | End");
        assert!(validate(&mut l).unwrap().diagnostics.is_empty());
    }

    #[test]
    fn test_single_line_problem() {
        let mut l = lines("max 3x1");
        let v = validate(&mut l).unwrap();
        assert_eq!(v.diagnostics, vec![MISSING_INITIALIZER, MISSING_END]);
    }

    #[test]
    fn test_second_run_reports_missing_end() {
        let mut l = lines("Max 3x1+2x2 | s.t. x1+2x2<=9 | End");
        assert!(validate(&mut l).unwrap().diagnostics.is_empty());
        let again = validate(&mut l).unwrap();
        assert_eq!(again.diagnostics, vec![MISSING_END]);
        assert_eq!(again.end_index, None);
    }

    #[test]
    fn test_report_display() {
        let diagnostics = vec![MISSING_END.to_string(), MISSING_RHS.to_string()];
        assert_eq!(
            ValidationReport(&diagnostics).to_string(),
            format!("[2] errors detected\n-{MISSING_END}\n-{MISSING_RHS}")
        );
        assert_eq!(ValidationReport(&[]).to_string(), "[0] errors detected");
    }
}
