mod problem;

pub mod dual;
pub mod dump;

pub use dual::dual;
pub use dump::{DumpError, DumpFormatError, read_dump, write_dump};
pub use problem::{
    Direction, MatrixName, MatrixValue, Matrices, Relation, UnknownMatrix, VarRestriction,
};
