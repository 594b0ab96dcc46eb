//! [`OpTable`]: the literal constructors and multi-dispatch operator
//! registry the interpreter and IR translator both sit on top of.
//!
//! Grounded on `farey-types::TypeIndex`'s own doc comment, which already
//! describes this exact use -- "multi-dispatch (operator tables keyed by
//! argument-tuple type, scanned in insertion order for the first matching
//! entry)" -- this module is that table.

use rustc_hash::FxHashMap;

use farey_types::{apply_mappings, match_types, Mapping, Type, TypeIndex};

use crate::error::SignatureError;
use crate::value::{Concrete, Value};

/// One overload of an operator: a signature pattern (the `Type` it's
/// registered under in the owning [`TypeIndex`]), an evaluator, and the
/// declared return type (possibly polymorphic, resolved against the
/// match's mappings by [`OpTable::dispatch`]).
pub struct OperatorFn {
    pub apply: fn(&[Value]) -> Concrete,
    pub return_signature: Type,
}

/// The registry of literal constructors and operator overloads.
#[derive(Default)]
pub struct OpTable {
    by_name: FxHashMap<String, TypeIndex<OperatorFn>>,
    literals: FxHashMap<&'static str, fn(&str) -> Value>,
}

impl OpTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register the constructor for an AST literal kind (`"Integer"`,
    /// `"Float"`, `"String"`), keyed by the same `ast_name` the parser's
    /// `Value` operator behavior tags its leaf nodes with.
    pub fn register_literal(&mut self, ast_name: &'static str, ctor: fn(&str) -> Value) {
        self.literals.insert(ast_name, ctor);
    }

    /// Register one overload of `name` under `signature` (an `And` of
    /// parameter types, possibly containing `Polymorphic`/`Spread`).
    pub fn register_op(&mut self, name: &str, signature: Type, op: OperatorFn) {
        self.by_name
            .entry(name.to_string())
            .or_insert_with(TypeIndex::new)
            .set(signature, op);
    }

    /// Build a literal value from its source text.
    pub fn literal(&self, ast_name: &str, text: &str) -> Option<Value> {
        self.literals.get(ast_name).map(|ctor| ctor(text))
    }

    fn find(&self, name: &str, arg_type: &Type) -> Option<(&OperatorFn, Vec<Mapping>)> {
        let index = self.by_name.get(name)?;
        for (key, op) in index.entries() {
            let result = match_types(key, arg_type);
            if result.matched {
                return Some((op, result.mappings));
            }
        }
        None
    }

    /// Dispatch `name` over `args`, picking the first registered overload
    /// whose signature matches the arguments' types (in registration
    /// order, mirroring [`TypeIndex::get`]'s own first-match semantics).
    pub fn dispatch(&self, name: &str, args: &[Value]) -> Result<Value, SignatureError> {
        let arg_type = Type::And(args.iter().map(|v| v.spec.clone()).collect());
        match self.find(name, &arg_type) {
            Some((op, mappings)) => {
                let concrete = (op.apply)(args);
                let spec = apply_mappings(&op.return_signature, &mappings);
                Ok(Value { spec, concrete })
            }
            None => Err(SignatureError::new(
                name,
                args.iter().map(|v| v.spec.clone()).collect(),
            )),
        }
    }

    /// Whether some overload of `name` accepts `arg_type`. Used both by
    /// `farey-ir` (to check a call is well-typed without running it) and
    /// by `farey-interp`'s substitution-suggestion logic (to check a
    /// candidate argument swap would actually resolve).
    pub fn accepts(&self, name: &str, arg_type: &Type) -> bool {
        self.find(name, arg_type).is_some()
    }

    /// The return type `name` would produce for `arg_type`, without
    /// evaluating anything.
    pub fn return_type_for(&self, name: &str, arg_type: &Type) -> Option<Type> {
        self.find(name, arg_type)
            .map(|(op, mappings)| apply_mappings(&op.return_signature, &mappings))
    }
}

/// A candidate single-argument substitution that would make an
/// otherwise-unmatched call resolve: `(position, replacement type,
/// replacement source text)`. Pure type/value inspection -- no source
/// spans, since this crate doesn't have any; `farey-interp` turns these
/// into [`crate::error::Delta`]s once it looks up the argument's token.
pub fn substitution_candidate(value: &Value) -> Option<(Type, String)> {
    match &value.concrete {
        Concrete::Int(n) => Some((Type::Atom("String".to_string()), n.to_string())),
        Concrete::Str(s) if s.parse::<i64>().is_ok() => {
            Some((Type::Atom("Int".to_string()), s.clone()))
        }
        _ => None,
    }
}
