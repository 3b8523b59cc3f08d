//! Primal to dual transformation.
//!
//! Every primal variable is assumed non-negative, so the dual constraints all
//! share one relation picked by the primal direction. The sign restriction of
//! each dual variable follows from the relation of its primal constraint:
//!
//! | primal | `=`  | `<=`   | `>=`   |
//! |--------|------|--------|--------|
//! | max    | free | `>= 0` | `<= 0` |
//! | min    | free | `<= 0` | `>= 0` |

use crate::problem::{Direction, Matrices, Relation, VarRestriction};

/// Builds the dual of `primal`. Any `var_constr` on the input is ignored.
pub fn dual(primal: &Matrices) -> Matrices {
    let n = primal.num_variables();

    let eqin_relation = match primal.direction {
        Direction::Min => Relation::Le,
        Direction::Max => Relation::Ge,
    };

    let var_constr = primal
        .eqin
        .iter()
        .map(|&relation| restriction_for(primal.direction, relation))
        .collect();

    Matrices {
        a: transpose(&primal.a, n),
        b: primal.c.clone(),
        c: primal.b.clone(),
        eqin: vec![eqin_relation; n],
        direction: primal.direction.opposite(),
        var_constr: Some(var_constr),
    }
}

/// Sign restriction of the dual variable tied to a primal constraint
pub fn restriction_for(direction: Direction, relation: Relation) -> VarRestriction {
    match (direction, relation) {
        (_, Relation::Eq) => VarRestriction::Free,
        (Direction::Max, Relation::Le) | (Direction::Min, Relation::Ge) => {
            VarRestriction::NonNegative
        }
        (Direction::Max, Relation::Ge) | (Direction::Min, Relation::Le) => {
            VarRestriction::NonPositive
        }
    }
}

/// `cols` is passed explicitly so a problem without constraints still
/// transposes to `cols` empty rows.
fn transpose(rows: &[Vec<i64>], cols: usize) -> Vec<Vec<i64>> {
    (0..cols)
        .map(|j| rows.iter().map(|row| row.get(j).copied().unwrap_or(0)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_problem() -> Matrices {
        Matrices {
            a: vec![vec![1, 2], vec![2, 5]],
            b: vec![9, 4],
            c: vec![3, 2],
            eqin: vec![Relation::Le, Relation::Le],
            direction: Direction::Max,
            var_constr: None,
        }
    }

    #[test]
    fn test_dual_of_max_problem() {
        let d = dual(&max_problem());
        assert_eq!(d.a, vec![vec![1, 2], vec![2, 5]]);
        assert_eq!(d.b, vec![3, 2]);
        assert_eq!(d.c, vec![9, 4]);
        assert_eq!(d.eqin_codes(), vec![1, 1]);
        assert_eq!(d.min_max(), vec![-1]);
        assert_eq!(d.var_constr_codes(), Some(vec![1, 1]));
    }

    #[test]
    fn test_dual_transposes_rectangular() {
        let primal = Matrices {
            a: vec![vec![1, 0, 3], vec![-2, 4, 0]],
            b: vec![5, 6],
            c: vec![1, 1, 1],
            eqin: vec![Relation::Eq, Relation::Ge],
            direction: Direction::Min,
            var_constr: None,
        };
        let d = dual(&primal);
        assert_eq!(d.a, vec![vec![1, -2], vec![0, 4], vec![3, 0]]);
        assert_eq!(d.eqin, vec![Relation::Le; 3]);
        assert_eq!(d.direction, Direction::Max);
        assert_eq!(
            d.var_constr,
            Some(vec![VarRestriction::Free, VarRestriction::NonNegative])
        );
    }

    #[test]
    fn test_restriction_table_depends_on_direction() {
        assert_eq!(
            restriction_for(Direction::Max, Relation::Le),
            VarRestriction::NonNegative
        );
        assert_eq!(
            restriction_for(Direction::Max, Relation::Ge),
            VarRestriction::NonPositive
        );
        assert_eq!(
            restriction_for(Direction::Min, Relation::Le),
            VarRestriction::NonPositive
        );
        assert_eq!(
            restriction_for(Direction::Min, Relation::Ge),
            VarRestriction::NonNegative
        );
        assert_eq!(
            restriction_for(Direction::Min, Relation::Eq),
            VarRestriction::Free
        );
    }
}
