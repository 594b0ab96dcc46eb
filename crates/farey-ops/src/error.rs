//! [`SignatureError`]: no registered overload of an operator matched the
//! argument types it was called with, plus suggested single-argument
//! type substitutions that would let some overload match
//! (`2 + '3'` -> try `2 + 3`).

use std::fmt;

use farey_types::Type;

/// A single suggested source edit: replace `length` chars starting at
/// `char_position` with `replacement`. Positions are filled in by the
/// caller that actually has the source spans (`farey-interp`) -- this
/// crate only knows argument types and values, not where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    pub char_position: u32,
    pub length: u32,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureError {
    pub operator: String,
    pub arg_types: Vec<Type>,
    pub deltas: Vec<Delta>,
}

impl SignatureError {
    pub fn new(operator: impl Into<String>, arg_types: Vec<Type>) -> Self {
        Self {
            operator: operator.into(),
            arg_types,
            deltas: Vec::new(),
        }
    }
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .arg_types
            .iter()
            .map(Type::specification)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "no overload of `{}` accepts ({args})", self.operator)
    }
}

impl std::error::Error for SignatureError {}
