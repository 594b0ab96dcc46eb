//! Errors raised while lowering the AST into [`crate::Ir`] -- the static
//! (type-checking-time) half of the error taxonomy, as opposed to
//! `farey-interp`'s dynamic (evaluation-time) half.

use std::fmt;

use farey_scope::ScopeError;
use farey_types::Type;

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

#[derive(Debug, Clone, PartialEq)]
pub enum TranslateError {
    TypeMismatch(TypeMismatchError),
    UnknownVariable(String),
    /// No operator signature (or built-in constructor) accepts the
    /// argument types assembled for this node -- the IR-translation-time
    /// counterpart of `farey-ops::SignatureError`.
    UnknownType(String),
    /// A typed `:=` collided with an existing binding in the same scope,
    /// or tried to shadow a reserved name -- surfaced verbatim rather than
    /// folded into `UnknownVariable`.
    Scope(ScopeError),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::TypeMismatch(e) => write!(f, "{e}"),
            TranslateError::UnknownVariable(name) => write!(f, "`{name}` is not defined"),
            TranslateError::UnknownType(name) => write!(f, "no signature of `{name}` resolves to a type"),
            TranslateError::Scope(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<ScopeError> for TranslateError {
    fn from(e: ScopeError) -> Self {
        TranslateError::Scope(e)
    }
}
