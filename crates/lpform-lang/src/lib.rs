pub mod builder;
pub mod error;
pub mod factors;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod validate;
pub mod variables;

pub use builder::Dimensions;
pub use error::LpError;
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use lpform_matrix::{Direction, MatrixName, MatrixValue, Matrices, Relation, VarRestriction};
pub use normalize::DEFAULT_DELIMITER;
pub use parser::LpParser;
pub use validate::ValidationReport;
pub use variables::VariableSet;
