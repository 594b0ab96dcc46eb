//! The interpreter's error type: a thin wrapper unifying the three ways
//! evaluating a node can fail.

use std::fmt;

use farey_scope::ScopeError;
use farey_types::Type;

use farey_ops::SignatureError;

/// A reassignment or typed assignment whose value's type doesn't conform
/// to what was expected.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMismatchError {
    pub got: Type,
    pub expected: Type,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type mismatch: got {}, expected {}",
            self.got.specification(),
            self.expected.specification()
        )
    }
}

impl std::error::Error for TypeMismatchError {}

#[derive(Debug, Clone, PartialEq)]
pub enum InterpError {
    Signature(SignatureError),
    Scope(ScopeError),
    TypeMismatch(TypeMismatchError),
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpError::Signature(e) => write!(f, "{e}"),
            InterpError::Scope(e) => write!(f, "{e}"),
            InterpError::TypeMismatch(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InterpError {}

impl From<SignatureError> for InterpError {
    fn from(e: SignatureError) -> Self {
        InterpError::Signature(e)
    }
}

impl From<ScopeError> for InterpError {
    fn from(e: ScopeError) -> Self {
        InterpError::Scope(e)
    }
}
