//! The Pratt parser: an [`OperatorTable`] driving a rewindable
//! token-to-AST pass.

mod error;
mod operator;
mod parser;

pub use error::ParseError;
pub use operator::{default_operator_table, BraceKind, OperatorBehavior, OperatorTable, EPSILON};
pub use parser::{parse, Parser};
