//! Builds the canonical matrices from validated lines.
//!
//! Each matrix has its own builder so single-matrix lookups do not pay for
//! the rest; [`build`] composes them.

use lpform_matrix::{Direction, MatrixName, MatrixValue, Matrices, Relation};

use crate::error::LpError;
use crate::factors::{fill_coefficients, parse_integer};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::validate::rhs_token;
use crate::variables::VariableSet;

/// Problem size: `m` constraints over `n` variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub m: usize,
    pub n: usize,
}

/// The widest extended variable set over `lines`
pub fn widest_variables(lines: &[String]) -> Result<VariableSet, LpError> {
    let mut widest = VariableSet::default();
    for line in lines {
        let set = VariableSet::from_tokens(&Lexer::tokenize(line))?;
        if set.width() > widest.width() {
            widest = set;
        }
    }
    Ok(widest)
}

/// `lines` must be truncated at the terminator: line 0 is the objective and
/// every other line a constraint. A line without variables is malformed.
pub fn dimensions(lines: &[String]) -> Result<Dimensions, LpError> {
    let mut n = 0;
    for (line, text) in lines.iter().enumerate() {
        let width = VariableSet::from_tokens(&Lexer::tokenize(text))?.width();
        if width == 0 {
            return Err(LpError::MalformedLine {
                line,
                reason: "no variables",
            });
        }
        n = n.max(width);
    }
    Ok(Dimensions {
        m: lines.len().saturating_sub(1),
        n,
    })
}

pub fn build(lines: &[String], dims: Dimensions) -> Result<Matrices, LpError> {
    let constraints = constraint_tokens(lines);
    let objective = objective_tokens(lines)?;
    Ok(Matrices {
        a: coefficient_matrix(&constraints, dims)?,
        b: rhs_vector(&constraints)?,
        c: objective_vector(&objective, dims)?,
        eqin: relations(&constraints)?,
        direction: direction(&objective)?,
        var_constr: None,
    })
}

/// Builds only the requested primal matrix
pub fn build_one(
    lines: &[String],
    dims: Dimensions,
    name: MatrixName,
) -> Result<MatrixValue, LpError> {
    let value = match name {
        MatrixName::A => MatrixValue::Matrix(coefficient_matrix(&constraint_tokens(lines), dims)?),
        MatrixName::B => MatrixValue::Vector(rhs_vector(&constraint_tokens(lines))?),
        MatrixName::C => MatrixValue::Vector(objective_vector(&objective_tokens(lines)?, dims)?),
        MatrixName::Eqin => MatrixValue::Vector(
            relations(&constraint_tokens(lines))?
                .into_iter()
                .map(Relation::code)
                .collect(),
        ),
        MatrixName::MinMax => MatrixValue::Vector(vec![direction(&objective_tokens(lines)?)?.code()]),
        MatrixName::VarConstr => {
            return Err(LpError::Argument(
                "VarConstr only exists for the dual problem".to_string(),
            ));
        }
    };
    Ok(value)
}

fn objective_tokens(lines: &[String]) -> Result<Vec<Token>, LpError> {
    lines
        .first()
        .map(|line| Lexer::tokenize(line))
        .ok_or(LpError::EmptyProblem)
}

fn constraint_tokens(lines: &[String]) -> Vec<Vec<Token>> {
    lines.iter().skip(1).map(|line| Lexer::tokenize(line)).collect()
}

fn coefficient_matrix(constraints: &[Vec<Token>], dims: Dimensions) -> Result<Vec<Vec<i64>>, LpError> {
    let mut a = vec![vec![0; dims.n]; dims.m];
    for (row, tokens) in a.iter_mut().zip(constraints) {
        fill_coefficients(tokens, row)?;
    }
    Ok(a)
}

fn rhs_vector(constraints: &[Vec<Token>]) -> Result<Vec<i64>, LpError> {
    constraints
        .iter()
        .enumerate()
        .map(|(i, tokens)| {
            let rhs = rhs_token(tokens).ok_or(LpError::MalformedLine {
                line: i + 1,
                reason: "no right-hand side",
            })?;
            parse_integer(rhs)
        })
        .collect()
}

fn objective_vector(objective: &[Token], dims: Dimensions) -> Result<Vec<i64>, LpError> {
    let mut c = vec![0; dims.n];
    fill_coefficients(objective, &mut c)?;
    Ok(c)
}

fn relations(constraints: &[Vec<Token>]) -> Result<Vec<Relation>, LpError> {
    constraints
        .iter()
        .enumerate()
        .map(|(i, tokens)| {
            tokens
                .iter()
                .find_map(|t| t.kind.relation())
                .ok_or(LpError::MalformedLine {
                    line: i + 1,
                    reason: "no constraint relation",
                })
        })
        .collect()
}

fn direction(objective: &[Token]) -> Result<Direction, LpError> {
    let has = |kind| objective.iter().any(|t: &Token| t.kind == kind);
    if has(TokenKind::Min) {
        Ok(Direction::Min)
    } else if has(TokenKind::Max) {
        Ok(Direction::Max)
    } else {
        Err(LpError::MalformedLine {
            line: 0,
            reason: "no optimization direction",
        })
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
    fn test_build_max_problem() {
        let l = lines("Max 3x1+2x2 | s.t. x1+2x2<=9 | 2x1+5x2<=4");
        let dims = dimensions(&l).unwrap();
        assert_eq!(dims, Dimensions { m: 2, n: 2 });

        let m = build(&l, dims).unwrap();
        assert_eq!(m.a, vec![vec![1, 2], vec![2, 5]]);
        assert_eq!(m.b, vec![9, 4]);
        assert_eq!(m.c, vec![3, 2]);
        assert_eq!(m.eqin_codes(), vec![-1, -1]);
        assert_eq!(m.min_max(), vec![1]);
        assert_eq!(m.var_constr, None);
    }

    #[test]
    fn test_width_spans_all_lines() {
        let l = lines("min 3x1-4x6 | st x1+x2>=2 | x3-x4=7");
        let dims = dimensions(&l).unwrap();
        assert_eq!(dims, Dimensions { m: 2, n: 6 });

        let m = build(&l, dims).unwrap();
        assert_eq!(m.c, vec![3, 0, 0, 0, 0, -4]);
        assert_eq!(m.a, vec![vec![1, 1, 0, 0, 0, 0], vec![0, 0, 1, -1, 0, 0]]);
        assert_eq!(m.eqin_codes(), vec![1, 0]);
        assert_eq!(m.min_max(), vec![-1]);
    }

    #[test]
    fn test_build_one_matches_build() {
        let l = lines("min 3x1-4x3 | st x1+x2>=2 | x3-x1<=7 | 2x2=5");
        let dims = dimensions(&l).unwrap();
        let all = build(&l, dims).unwrap();
        for name in MatrixName::PRIMAL {
            assert_eq!(build_one(&l, dims, name).ok(), all.get(name), "{name}");
        }
    }

    #[test]
    fn test_rhs_after_first_relation_with_integer() {
        let l = lines("max x1 | st x1<=x2>=12");
        let m = build(&l, dimensions(&l).unwrap()).unwrap();
        assert_eq!(m.b, vec![12]);
        assert_eq!(m.eqin, vec![Relation::Le]);
    }

    #[test]
    fn test_direction_after_letters() {
        let l = lines("zmax = 3x1 + 2x2 | s.t. x1+2x2<=9");
        let m = build(&l, dimensions(&l).unwrap()).unwrap();
        assert_eq!(m.c, vec![3, 2]);
        assert_eq!(m.direction, Direction::Max);
    }

    #[test]
    fn test_constraint_without_variables() {
        let l = lines("max 3x1 | st 5<=4");
        assert!(matches!(
            dimensions(&l),
            Err(LpError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_objective_without_variables() {
        let l = lines("max | st 3<=4");
        assert!(matches!(
            dimensions(&l),
            Err(LpError::MalformedLine { line: 0, .. })
        ));
    }

    #[test]
    fn test_var_constr_is_dual_only() {
        let l = lines("max x1 | st x1<=1");
        let dims = dimensions(&l).unwrap();
        assert!(matches!(
            build_one(&l, dims, MatrixName::VarConstr),
            Err(LpError::Argument(_))
        ));
    }
}
