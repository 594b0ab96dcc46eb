//! Structural matching between two [`Type`]s, intersection, mapping
//! substitution, and function return-type resolution.
//!
//! By convention `match_types(a, b)` asks "does `b` conform to the pattern
//! `a`?" -- `a` is the side that may carry `Any`, `Polymorphic`, and
//! `Spread`; `b` is the concrete side being checked against it. A
//! successful match produces zero or more [`Mapping`]s binding each
//! polymorphic name encountered in `a` to the piece of `b` it matched.

use crate::index::TypeIndex;
use crate::ty::Type;

/// A single polymorphic-name binding produced by a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub from: String,
    pub to: Type,
}

/// The outcome of [`match_types`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    pub mappings: Vec<Mapping>,
}

impl MatchResult {
    fn ok(mappings: Vec<Mapping>) -> Self {
        Self {
            matched: true,
            mappings,
        }
    }

    fn fail() -> Self {
        Self {
            matched: false,
            mappings: Vec::new(),
        }
    }
}

/// Two types are equal, for the purposes of `Or` deduplication and
/// `TypeIndex` key lookup, iff each matches the other.
pub fn equals(a: &Type, b: &Type) -> bool {
    match_types(a, b).matched && match_types(b, a).matched
}

/// Does `b` conform to the pattern `a`? See the module docs for the
/// asymmetric `a`/`b` convention.
pub fn match_types(a: &Type, b: &Type) -> MatchResult {
    match (a, b) {
        (Type::Any, _) | (_, Type::Any) => MatchResult::ok(Vec::new()),

        (Type::Polymorphic(name), _) => MatchResult::ok(vec![Mapping {
            from: name.clone(),
            to: b.clone(),
        }]),

        (Type::Group(inner), _) => match_types(inner, b),
        (_, Type::Group(inner)) => match_types(a, inner),

        (Type::Or(members), _) => {
            for member in members {
                let result = match_types(member, b);
                if result.matched {
                    return result;
                }
            }
            MatchResult::fail()
        }

        // `a` is a single pattern, `b` is itself a union: every
        // alternative in `b` must conform, since the caller can't know
        // at compile time which alternative will actually show up.
        (_, Type::Or(members)) => {
            let mut index: TypeIndex<Type> = TypeIndex::new();
            for member in members {
                let result = match_types(a, member);
                if !result.matched {
                    return MatchResult::fail();
                }
                for mapping in result.mappings {
                    if !index.set_compete(Type::Polymorphic(mapping.from), mapping.to) {
                        return MatchResult::fail();
                    }
                }
            }
            MatchResult::ok(index.into_mappings())
        }

        (Type::Atom(na), Type::Atom(nb)) => {
            if na == nb {
                MatchResult::ok(Vec::new())
            } else {
                MatchResult::fail()
            }
        }

        (Type::Array(ia), Type::Array(ib)) => match_types(ia, ib),

        (Type::Function(a_args, a_ret), Type::Function(b_args, b_ret)) => {
            let args_result = match_types(a_args, b_args);
            if !args_result.matched {
                return MatchResult::fail();
            }
            let ret_result = match_types(a_ret, b_ret);
            if !ret_result.matched {
                return MatchResult::fail();
            }
            match combine_mappings(vec![args_result.mappings, ret_result.mappings]) {
                Some(mappings) => MatchResult::ok(mappings),
                None => MatchResult::fail(),
            }
        }

        (Type::And(a_items), Type::And(b_items)) => match_and(a_items, b_items),

        _ => MatchResult::fail(),
    }
}

/// Condense several groups of mappings into one, narrowing repeated
/// polymorphic names via [`TypeIndex::set_compete`]. `None` means two
/// groups bound the same name to types with an empty intersection --
/// a contradiction, not something to paper over.
fn combine_mappings(groups: Vec<Vec<Mapping>>) -> Option<Vec<Mapping>> {
    let mut index: TypeIndex<Type> = TypeIndex::new();
    for mapping in groups.into_iter().flatten() {
        if !index.set_compete(Type::Polymorphic(mapping.from), mapping.to) {
            return None;
        }
    }
    Some(index.into_mappings())
}

/// Match an ordered tuple pattern against an ordered tuple value, honoring
/// at most one `Spread` element in `a_items` as a zero-or-more wildcard
/// over the corresponding run of `b_items`.
fn match_and(a_items: &[Type], b_items: &[Type]) -> MatchResult {
    let spread_index = a_items.iter().position(|t| matches!(t, Type::Spread(_)));

    let Some(si) = spread_index else {
        if a_items.len() != b_items.len() {
            return MatchResult::fail();
        }
        let mut groups = Vec::new();
        for (x, y) in a_items.iter().zip(b_items) {
            let r = match_types(x, y);
            if !r.matched {
                return MatchResult::fail();
            }
            groups.push(r.mappings);
        }
        return match combine_mappings(groups) {
            Some(mappings) => MatchResult::ok(mappings),
            None => MatchResult::fail(),
        };
    };

    let before = &a_items[..si];
    let after = &a_items[si + 1..];
    if b_items.len() < before.len() + after.len() {
        return MatchResult::fail();
    }
    let spread_count = b_items.len() - before.len() - after.len();
    let inner = match &a_items[si] {
        Type::Spread(inner) => inner.as_ref(),
        _ => unreachable!("spread_index points at a Spread element"),
    };

    let mut groups = Vec::new();
    for (x, y) in before.iter().zip(&b_items[..before.len()]) {
        let r = match_types(x, y);
        if !r.matched {
            return MatchResult::fail();
        }
        groups.push(r.mappings);
    }
    for y in &b_items[before.len()..before.len() + spread_count] {
        let r = match_types(inner, y);
        if !r.matched {
            return MatchResult::fail();
        }
        groups.push(r.mappings);
    }
    for (x, y) in after.iter().zip(&b_items[before.len() + spread_count..]) {
        let r = match_types(x, y);
        if !r.matched {
            return MatchResult::fail();
        }
        groups.push(r.mappings);
    }
    match combine_mappings(groups) {
        Some(mappings) => MatchResult::ok(mappings),
        None => MatchResult::fail(),
    }
}

/// The narrowest type both `a` and `b` describe, or `None` if they
/// describe disjoint sets of values.
pub fn intersect(a: &Type, b: &Type) -> Option<Type> {
    match (a, b) {
        (Type::Any, other) | (other, Type::Any) => Some(other.clone()),
        (Type::Atom(na), Type::Atom(nb)) => {
            if na == nb {
                Some(Type::Atom(na.clone()))
            } else {
                None
            }
        }
        (Type::Or(members), other) | (other, Type::Or(members)) => {
            let narrowed: Vec<Type> = members.iter().filter_map(|m| intersect(m, other)).collect();
            if narrowed.is_empty() {
                None
            } else {
                Some(Type::or(narrowed))
            }
        }
        (Type::Array(ia), Type::Array(ib)) => intersect(ia, ib).map(|inner| Type::Array(Box::new(inner))),
        (Type::Group(ia), other) | (other, Type::Group(ia)) => intersect(ia, other),
        (Type::And(a_items), Type::And(b_items)) => {
            if a_items.len() != b_items.len() {
                return None;
            }
            let mut out = Vec::with_capacity(a_items.len());
            for (x, y) in a_items.iter().zip(b_items) {
                out.push(intersect(x, y)?);
            }
            Some(Type::And(out))
        }
        (Type::Function(a_args, a_ret), Type::Function(b_args, b_ret)) => {
            let args = intersect(a_args, b_args)?;
            let ret = intersect(a_ret, b_ret)?;
            Some(Type::Function(Box::new(args), Box::new(ret)))
        }
        (Type::Polymorphic(name), other) | (other, Type::Polymorphic(name)) => {
            let _ = name;
            Some(other.clone())
        }
        _ if equals(a, b) => Some(a.clone()),
        _ => None,
    }
}

/// Replace every `Polymorphic(name)` in `ty` with the type it was bound to
/// in `mappings`. Names with no binding are left as-is.
pub fn apply_mappings(ty: &Type, mappings: &[Mapping]) -> Type {
    match ty {
        Type::Polymorphic(name) => mappings
            .iter()
            .find(|m| &m.from == name)
            .map(|m| m.to.clone())
            .unwrap_or_else(|| ty.clone()),
        Type::Or(members) => Type::Or(members.iter().map(|m| apply_mappings(m, mappings)).collect()),
        Type::And(members) => Type::And(members.iter().map(|m| apply_mappings(m, mappings)).collect()),
        Type::Group(inner) => Type::Group(Box::new(apply_mappings(inner, mappings))),
        Type::Array(inner) => Type::Array(Box::new(apply_mappings(inner, mappings))),
        Type::Spread(inner) => Type::Spread(Box::new(apply_mappings(inner, mappings))),
        Type::Function(args, ret) => Type::Function(
            Box::new(apply_mappings(args, mappings)),
            Box::new(apply_mappings(ret, mappings)),
        ),
        Type::Atom(_) | Type::Any => ty.clone(),
    }
}

/// Resolve the return type of calling `func_ty` with argument tuple
/// `args` (an `And`), or `None` if `args` doesn't conform to any
/// callable signature in `func_ty`.
pub fn get_return_type_for_args(func_ty: &Type, args: &Type) -> Option<Type> {
    match func_ty {
        Type::Function(params, ret) => {
            let result = match_types(params, args);
            if result.matched {
                Some(apply_mappings(ret, &result.mappings))
            } else {
                None
            }
        }
        Type::Or(members) => {
            for member in members {
                match member {
                    Type::Function(..) => {
                        if let Some(ret) = get_return_type_for_args(member, args) {
                            return Some(ret);
                        }
                    }
                    // A non-function member short-circuits the whole search
                    // instead of being skipped; later members are never
                    // tried even if they'd have matched.
                    _ => return None,
                }
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Type {
        Type::Atom(name.to_string())
    }

    #[test]
    fn any_matches_anything_both_ways() {
        assert!(match_types(&Type::Any, &atom("Int")).matched);
        assert!(match_types(&atom("Int"), &Type::Any).matched);
    }

    #[test]
    fn atom_matches_only_same_name() {
        assert!(match_types(&atom("Int"), &atom("Int")).matched);
        assert!(!match_types(&atom("Int"), &atom("Float")).matched);
    }

    #[test]
    fn polymorphic_binds_to_whatever_it_sees() {
        let result = match_types(&Type::Polymorphic("A".into()), &atom("Int"));
        assert!(result.matched);
        assert_eq!(result.mappings, vec![Mapping { from: "A".into(), to: atom("Int") }]);
    }

    #[test]
    fn or_pattern_matches_if_any_member_matches() {
        let pattern = Type::or(vec![atom("Int"), atom("Float")]);
        assert!(match_types(&pattern, &atom("Float")).matched);
        assert!(!match_types(&pattern, &atom("String")).matched);
    }

    #[test]
    fn or_value_requires_every_member_to_conform() {
        let value = Type::or(vec![atom("Int"), atom("Float")]);
        assert!(match_types(&Type::Polymorphic("A".into()), &value).matched);
        assert!(!match_types(&atom("Int"), &value).matched);
    }

    #[test]
    fn match_symmetry_defines_equality() {
        let a = atom("Int");
        let b = atom("Int");
        assert!(equals(&a, &b));
        assert!(!equals(&atom("Int"), &atom("Float")));
    }

    #[test]
    fn tuple_match_binds_each_position() {
        let pattern = Type::And(vec![Type::Polymorphic("A".into()), Type::Polymorphic("B".into())]);
        let value = Type::And(vec![atom("Int"), atom("String")]);
        let result = match_types(&pattern, &value);
        assert!(result.matched);
        assert_eq!(result.mappings.len(), 2);
    }

    #[test]
    fn spread_consumes_zero_or_more() {
        let pattern = Type::And(vec![Type::Spread(Box::new(atom("Int")))]);
        assert!(match_types(&pattern, &Type::And(vec![])).matched);
        assert!(match_types(&pattern, &Type::And(vec![atom("Int"), atom("Int"), atom("Int")])).matched);
        assert!(!match_types(&pattern, &Type::And(vec![atom("Int"), atom("Float")])).matched);
    }

    #[test]
    fn spread_binding_the_same_polymorphic_name_to_conflicting_types_fails() {
        // Every element the spread consumes binds `A'`; `Int` and `String`
        // have an empty intersection, so the match must fail rather than
        // silently widening `A'` to `Any`.
        let pattern = Type::And(vec![Type::Spread(Box::new(Type::Polymorphic("A".into())))]);
        let value = Type::And(vec![atom("Int"), atom("String")]);
        assert!(!match_types(&pattern, &value).matched);
    }

    #[test]
    fn spread_with_trailing_fixed_elements() {
        let pattern = Type::And(vec![
            Type::Spread(Box::new(atom("Int"))),
            Type::Polymorphic("Last".into()),
        ]);
        let value = Type::And(vec![atom("Int"), atom("Int"), atom("String")]);
        let result = match_types(&pattern, &value);
        assert!(result.matched);
        assert_eq!(result.mappings, vec![Mapping { from: "Last".into(), to: atom("String") }]);
    }

    #[test]
    fn intersect_is_idempotent() {
        let ty = Type::or(vec![atom("Int"), atom("Float")]);
        assert_eq!(intersect(&ty, &ty), Some(ty));
    }

    #[test]
    fn intersect_disjoint_atoms_is_none() {
        assert_eq!(intersect(&atom("Int"), &atom("String")), None);
    }

    #[test]
    fn intersect_distributes_over_or() {
        let union = Type::or(vec![atom("Int"), atom("Float")]);
        assert_eq!(intersect(&union, &atom("Int")), Some(atom("Int")));
    }

    #[test]
    fn apply_mappings_substitutes_polymorphic_names() {
        let ty = Type::function(vec![Type::Polymorphic("A".into())], Type::Polymorphic("A".into()));
        let mappings = vec![Mapping { from: "A".into(), to: atom("Int") }];
        let applied = apply_mappings(&ty, &mappings);
        assert_eq!(applied, Type::function(vec![atom("Int")], atom("Int")));
    }

    #[test]
    fn get_return_type_for_args_resolves_through_mappings() {
        let func = Type::function(vec![Type::Polymorphic("A".into())], Type::Polymorphic("A".into()));
        let args = Type::And(vec![atom("Int")]);
        assert_eq!(get_return_type_for_args(&func, &args), Some(atom("Int")));
    }

    #[test]
    fn get_return_type_for_args_tries_next_function_member() {
        let overload = Type::Or(vec![
            Type::function(vec![atom("Int")], atom("Int")),
            Type::function(vec![atom("String")], atom("String")),
        ]);
        let args = Type::And(vec![atom("String")]);
        assert_eq!(get_return_type_for_args(&overload, &args), Some(atom("String")));
    }

    #[test]
    fn get_return_type_for_args_short_circuits_on_non_function_member() {
        let overload = Type::Or(vec![atom("Int"), Type::function(vec![atom("String")], atom("String"))]);
        let args = Type::And(vec![atom("String")]);
        assert_eq!(get_return_type_for_args(&overload, &args), None);
    }
}
