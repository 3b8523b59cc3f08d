use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Relational operator of a constraint (Eqin code)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=), code -1
    Le,
    /// Equal (=), code 0
    Eq,
    /// Greater than or equal (>=), code 1
    Ge,
}

impl Relation {
    pub fn code(self) -> i64 {
        match self {
            Relation::Le => -1,
            Relation::Eq => 0,
            Relation::Ge => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Relation::Le),
            0 => Some(Relation::Eq),
            1 => Some(Relation::Ge),
            _ => None,
        }
    }
}

/// Optimization direction (MinMax code)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    pub fn code(self) -> i64 {
        match self {
            Direction::Min => -1,
            Direction::Max => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Direction::Min),
            1 => Some(Direction::Max),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Min => Direction::Max,
            Direction::Max => Direction::Min,
        }
    }
}

/// Sign restriction on a dual variable (VarConstr code)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRestriction {
    /// Unrestricted in sign, code 0
    Free,
    /// `>= 0`, code 1
    NonNegative,
    /// `<= 0`, code -1
    NonPositive,
}

impl VarRestriction {
    pub fn code(self) -> i64 {
        match self {
            VarRestriction::Free => 0,
            VarRestriction::NonNegative => 1,
            VarRestriction::NonPositive => -1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(VarRestriction::Free),
            1 => Some(VarRestriction::NonNegative),
            -1 => Some(VarRestriction::NonPositive),
            _ => None,
        }
    }

    /// Text used for the restriction in matrix dumps
    pub fn label(self) -> &'static str {
        match self {
            VarRestriction::Free => "free",
            VarRestriction::NonNegative => ">= 0",
            VarRestriction::NonPositive => "<= 0",
        }
    }

    /// Inverse of [`VarRestriction::label`], tolerant of inner whitespace (`>=0`)
    pub fn from_label(label: &str) -> Option<Self> {
        let compact: String = label.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "free" => Some(VarRestriction::Free),
            ">=0" => Some(VarRestriction::NonNegative),
            "<=0" => Some(VarRestriction::NonPositive),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown matrix: '{0}'")]
pub struct UnknownMatrix(pub String);

/// Name of one of the matrices making up a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixName {
    A,
    B,
    C,
    Eqin,
    MinMax,
    VarConstr,
}

impl MatrixName {
    /// The five matrices every problem has, in dump order
    pub const PRIMAL: [MatrixName; 5] = [
        MatrixName::A,
        MatrixName::B,
        MatrixName::C,
        MatrixName::Eqin,
        MatrixName::MinMax,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatrixName::A => "A",
            MatrixName::B => "b",
            MatrixName::C => "c",
            MatrixName::Eqin => "Eqin",
            MatrixName::MinMax => "MinMax",
            MatrixName::VarConstr => "VarConstr",
        }
    }
}

impl fmt::Display for MatrixName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatrixName {
    type Err = UnknownMatrix;

    /// Names are matched case-insensitively (`EQin`, `minMAX`, `var_constr`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(MatrixName::A),
            "b" => Ok(MatrixName::B),
            "c" => Ok(MatrixName::C),
            "eqin" => Ok(MatrixName::Eqin),
            "minmax" => Ok(MatrixName::MinMax),
            "varconstr" | "var_constr" => Ok(MatrixName::VarConstr),
            _ => Err(UnknownMatrix(s.to_string())),
        }
    }
}

/// A single matrix rendered with its canonical integer codes
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixValue {
    Matrix(Vec<Vec<i64>>),
    Vector(Vec<i64>),
}

/// The canonical matrices of an LP problem (or of its dual)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrices {
    /// Constraint coefficients, one row per constraint
    pub a: Vec<Vec<i64>>,
    /// Right-hand side of each constraint
    pub b: Vec<i64>,
    /// Objective coefficients
    pub c: Vec<i64>,
    /// Relation of each constraint
    pub eqin: Vec<Relation>,
    /// Whether to minimize or maximize
    pub direction: Direction,
    /// Sign restriction of each variable; only set for a dual problem
    pub var_constr: Option<Vec<VarRestriction>>,
}

impl Matrices {
    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    pub fn is_dual(&self) -> bool {
        self.var_constr.is_some()
    }

    pub fn eqin_codes(&self) -> Vec<i64> {
        self.eqin.iter().map(|r| r.code()).collect()
    }

    /// Single-element MinMax vector
    pub fn min_max(&self) -> Vec<i64> {
        vec![self.direction.code()]
    }

    pub fn var_constr_codes(&self) -> Option<Vec<i64>> {
        self.var_constr
            .as_ref()
            .map(|v| v.iter().map(|r| r.code()).collect())
    }

    /// Returns `None` only for `VarConstr` on a primal problem
    pub fn get(&self, name: MatrixName) -> Option<MatrixValue> {
        let value = match name {
            MatrixName::A => MatrixValue::Matrix(self.a.clone()),
            MatrixName::B => MatrixValue::Vector(self.b.clone()),
            MatrixName::C => MatrixValue::Vector(self.c.clone()),
            MatrixName::Eqin => MatrixValue::Vector(self.eqin_codes()),
            MatrixName::MinMax => MatrixValue::Vector(self.min_max()),
            MatrixName::VarConstr => MatrixValue::Vector(self.var_constr_codes()?),
        };
        Some(value)
    }

    /// Every matrix present, keyed by name, in dump order
    pub fn named(&self) -> Vec<(MatrixName, MatrixValue)> {
        MatrixName::PRIMAL
            .iter()
            .chain(self.is_dual().then_some(&MatrixName::VarConstr))
            .filter_map(|&name| self.get(name).map(|value| (name, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrices {
        Matrices {
            a: vec![vec![1, 2], vec![2, 5]],
            b: vec![9, 4],
            c: vec![3, 2],
            eqin: vec![Relation::Le, Relation::Ge],
            direction: Direction::Max,
            var_constr: None,
        }
    }

    #[test]
    fn test_codes_round_trip() {
        for r in [Relation::Le, Relation::Eq, Relation::Ge] {
            assert_eq!(Relation::from_code(r.code()), Some(r));
        }
        for v in [
            VarRestriction::Free,
            VarRestriction::NonNegative,
            VarRestriction::NonPositive,
        ] {
            assert_eq!(VarRestriction::from_code(v.code()), Some(v));
            assert_eq!(VarRestriction::from_label(v.label()), Some(v));
        }
        assert_eq!(Direction::from_code(0), None);
        assert_eq!(Direction::Min.opposite(), Direction::Max);
    }

    #[test]
    fn test_matrix_name_case_insensitive() {
        assert_eq!("EQin".parse::<MatrixName>(), Ok(MatrixName::Eqin));
        assert_eq!("minMAX".parse::<MatrixName>(), Ok(MatrixName::MinMax));
        assert_eq!("var_constr".parse::<MatrixName>(), Ok(MatrixName::VarConstr));
        assert_eq!("B".parse::<MatrixName>(), Ok(MatrixName::B));
        assert!("x".parse::<MatrixName>().is_err());
    }

    #[test]
    fn test_get_uses_integer_codes() {
        let m = sample();
        assert_eq!(m.get(MatrixName::Eqin), Some(MatrixValue::Vector(vec![-1, 1])));
        assert_eq!(m.get(MatrixName::MinMax), Some(MatrixValue::Vector(vec![1])));
        assert_eq!(m.get(MatrixName::VarConstr), None);
        assert_eq!(m.named().len(), 5);
    }

    #[test]
    fn test_named_includes_var_constr_for_dual() {
        let mut m = sample();
        m.var_constr = Some(vec![VarRestriction::Free, VarRestriction::NonPositive]);
        let named = m.named();
        assert_eq!(named.len(), 6);
        assert_eq!(
            named[5],
            (MatrixName::VarConstr, MatrixValue::Vector(vec![0, -1]))
        );
    }
}
