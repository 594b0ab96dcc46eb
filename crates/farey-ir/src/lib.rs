//! The IR translator: lowers a parsed AST into a typed,
//! scope-resolved intermediate form ahead of evaluation or any future
//! backend.

mod error;
mod ir;
mod translate;

pub use error::{TranslateError, TypeMismatchError};
pub use ir::{Ir, IrChildren, IrKind};
pub use translate::translate;
