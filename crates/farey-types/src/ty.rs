//! The `Type` enum: an algebraic type model with unions, tuples, arrays,
//! function types, spreads, and polymorphic (generic) type variables.
//!
//! Smart constructors ([`Type::or`], [`Type::array`], [`Type::function`])
//! enforce the model's normalization invariants at construction time rather
//! than via a separate pass: `Or` never directly contains `Or`, `Or`
//! members are pairwise non-equivalent, and an array's element type is the
//! minimal union of whatever element types were actually observed.

use std::fmt;

use crate::matching::equals;

/// A type in the Farey algebraic type system.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A named primitive or nominal type, e.g. `Int`, `String`.
    Atom(String),
    /// A union. Invariant: flattened (no direct `Or` child) and
    /// deduplicated (no two pairwise-equivalent members).
    Or(Vec<Type>),
    /// An ordered tuple. Unlike `Or`, members are positional and may
    /// repeat.
    And(Vec<Type>),
    /// A parenthesized wrapper, preserving the syntactic distinction
    /// between a grouped single expression and a cardinality-1 tuple.
    Group(Box<Type>),
    /// An array; the boxed type is the `Or`-reduction over every element
    /// type actually observed (or `Any` for an empty array).
    Array(Box<Type>),
    /// A function type. The first field is always `And` (possibly empty).
    Function(Box<Type>, Box<Type>),
    /// Matches an `And` of zero or more of the inner type.
    Spread(Box<Type>),
    /// A generic type variable, e.g. `A'`.
    Polymorphic(String),
    /// Matches everything.
    Any,
}

impl Type {
    /// Build a union, flattening nested `Or`s and deduplicating members
    /// by [`crate::matching::equals`]. Collapses a singleton result to
    /// its sole member.
    pub fn or(children: impl IntoIterator<Item = Type>) -> Type {
        let mut flat = Vec::new();
        for child in children {
            flatten_or_into(child, &mut flat);
        }
        let mut deduped: Vec<Type> = Vec::new();
        for ty in flat {
            if !deduped.iter().any(|seen| equals(seen, &ty)) {
                deduped.push(ty);
            }
        }
        match deduped.len() {
            1 => deduped.into_iter().next().unwrap(),
            _ => Type::Or(deduped),
        }
    }

    /// Build an array type from the element types actually observed.
    /// An empty iterator yields `Array(Any)`.
    pub fn array(observed: impl IntoIterator<Item = Type>) -> Type {
        let elements: Vec<Type> = observed.into_iter().collect();
        if elements.is_empty() {
            Type::Array(Box::new(Type::Any))
        } else {
            Type::Array(Box::new(Type::or(elements)))
        }
    }

    /// Build a function type; `args` is always wrapped in `And`.
    pub fn function(args: Vec<Type>, ret: Type) -> Type {
        Type::Function(Box::new(Type::And(args)), Box::new(ret))
    }

    /// Whether this type's own canonical rendering contains a top-level
    /// `,` or `|` -- the only two constructors that do are `Or` and `And`
    /// with more than one member.
    fn needs_parens(&self) -> bool {
        match self {
            Type::Or(cs) | Type::And(cs) => cs.len() > 1,
            _ => false,
        }
    }

    fn parenthesized_spec(&self) -> String {
        if self.needs_parens() {
            format!("({})", self.specification())
        } else {
            self.specification()
        }
    }

    /// The canonical string form of this type, per the Language's type
    /// specification grammar.
    pub fn specification(&self) -> String {
        match self {
            Type::Atom(name) => name.clone(),
            Type::Or(cs) => cs
                .iter()
                .map(Type::parenthesized_spec)
                .collect::<Vec<_>>()
                .join("|"),
            Type::And(cs) => cs
                .iter()
                .map(Type::parenthesized_spec)
                .collect::<Vec<_>>()
                .join(","),
            Type::Group(inner) => format!("({})", inner.specification()),
            Type::Array(inner) => format!("[{}]", inner.specification()),
            Type::Function(args, ret) => {
                format!("{} \u{2192} {}", args.specification(), ret.parenthesized_spec())
            }
            Type::Spread(inner) => format!("...{}", inner.specification()),
            Type::Polymorphic(name) => format!("{name}'"),
            Type::Any => "Any".to_string(),
        }
    }
}

fn flatten_or_into(ty: Type, out: &mut Vec<Type>) {
    match ty {
        Type::Or(children) => {
            for child in children {
                flatten_or_into(child, out);
            }
        }
        other => out.push(other),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.specification())
    }
}
