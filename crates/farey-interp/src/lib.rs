//! The tree-walking interpreter: evaluates a parsed
//! [`farey_ast::Node`] against a [`farey_ops::OpTable`], threading a
//! lexical [`State`] through the walk.

mod error;
mod interpret;
mod state;

pub use error::{InterpError, TypeMismatchError};
pub use interpret::interpret;
pub use state::State;
