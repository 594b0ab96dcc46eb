//! The built-in literal constructors and operator overloads: one
//! `register_*_ops` function per built-in type, grounded on
//! `snow_typeck::builtins::register_builtins`, which registers one
//! signature per call rather than building a combinator.

use farey_fraction::Fraction;
use farey_types::Type;

use crate::table::{OpTable, OperatorFn};
use crate::value::{Concrete, Value};

fn int() -> Type {
    Type::Atom("Int".to_string())
}
fn float() -> Type {
    Type::Atom("Float".to_string())
}
fn string() -> Type {
    Type::Atom("String".to_string())
}
fn fraction() -> Type {
    Type::Atom("Fraction".to_string())
}

fn and(items: Vec<Type>) -> Type {
    Type::And(items)
}

fn register_int_ops(table: &mut OpTable) {
    table.register_literal("Integer", |text| {
        Value::int(text.parse().expect("tokenizer guarantees digits"))
    });

    table.register_op(
        "+",
        and(vec![int(), int()]),
        OperatorFn {
            apply: |a| Concrete::Int(a[0].as_int() + a[1].as_int()),
            return_signature: int(),
        },
    );
    table.register_op(
        "-",
        and(vec![int(), int()]),
        OperatorFn {
            apply: |a| Concrete::Int(a[0].as_int() - a[1].as_int()),
            return_signature: int(),
        },
    );
    table.register_op(
        "-",
        and(vec![int()]),
        OperatorFn {
            apply: |a| Concrete::Int(-a[0].as_int()),
            return_signature: int(),
        },
    );
    table.register_op(
        "*",
        and(vec![int(), int()]),
        OperatorFn {
            apply: |a| Concrete::Int(a[0].as_int() * a[1].as_int()),
            return_signature: int(),
        },
    );
    // `/` is the Language's "FractionDiv": Int divided by Int always
    // produces an exact Fraction rather than truncating.
    table.register_op(
        "/",
        and(vec![int(), int()]),
        OperatorFn {
            apply: |a| Concrete::Frac(farey_fraction::reduce(a[0].as_int(), a[1].as_int())),
            return_signature: fraction(),
        },
    );
    // `//` is floor (integer) division.
    table.register_op(
        "//",
        and(vec![int(), int()]),
        OperatorFn {
            apply: |a| Concrete::Int(a[0].as_int().div_euclid(a[1].as_int())),
            return_signature: int(),
        },
    );
}

fn register_float_ops(table: &mut OpTable) {
    table.register_literal("Float", |text| {
        Value::float(text.parse().expect("tokenizer guarantees a decimal literal"))
    });

    table.register_op(
        "+",
        and(vec![float(), float()]),
        OperatorFn {
            apply: |a| Concrete::Float(a[0].as_float() + a[1].as_float()),
            return_signature: float(),
        },
    );
    table.register_op(
        "-",
        and(vec![float(), float()]),
        OperatorFn {
            apply: |a| Concrete::Float(a[0].as_float() - a[1].as_float()),
            return_signature: float(),
        },
    );
    table.register_op(
        "-",
        and(vec![float()]),
        OperatorFn {
            apply: |a| Concrete::Float(-a[0].as_float()),
            return_signature: float(),
        },
    );
    table.register_op(
        "*",
        and(vec![float(), float()]),
        OperatorFn {
            apply: |a| Concrete::Float(a[0].as_float() * a[1].as_float()),
            return_signature: float(),
        },
    );
    table.register_op(
        "/",
        and(vec![float(), float()]),
        OperatorFn {
            apply: |a| Concrete::Float(a[0].as_float() / a[1].as_float()),
            return_signature: float(),
        },
    );
}

fn register_string_ops(table: &mut OpTable) {
    table.register_literal("String", |text| Value::string(text.to_string()));

    table.register_op(
        "+",
        and(vec![string(), string()]),
        OperatorFn {
            apply: |a| Concrete::Str(format!("{}{}", a[0].as_str(), a[1].as_str())),
            return_signature: string(),
        },
    );
    table.register_op(
        "-",
        and(vec![string()]),
        OperatorFn {
            apply: |a| Concrete::Str(a[0].as_str().chars().rev().collect()),
            return_signature: string(),
        },
    );
    // `Mul (String, Int)`: repeat. A negative count reverses the string
    // first, then repeats its absolute value -- mirroring unary `-`'s own
    // "reverse" reading of negation on a String.
    table.register_op(
        "*",
        and(vec![string(), int()]),
        OperatorFn {
            apply: |a| {
                let s = a[0].as_str();
                let n = a[1].as_int();
                if n < 0 {
                    Concrete::Str(s.chars().rev().collect::<String>().repeat(n.unsigned_abs() as usize))
                } else {
                    Concrete::Str(s.repeat(n as usize))
                }
            },
            return_signature: string(),
        },
    );
}

fn register_fraction_ops(table: &mut OpTable) {
    // No literal syntax: a Fraction value only ever arises from `/` on
    // two Ints (or from mixed Fraction/Int arithmetic below).
    table.register_op(
        "+",
        and(vec![fraction(), fraction()]),
        OperatorFn {
            apply: |a| Concrete::Frac(farey_fraction::add(a[0].as_fraction(), a[1].as_fraction())),
            return_signature: fraction(),
        },
    );
    table.register_op(
        "-",
        and(vec![fraction(), fraction()]),
        OperatorFn {
            apply: |a| Concrete::Frac(farey_fraction::sub(a[0].as_fraction(), a[1].as_fraction())),
            return_signature: fraction(),
        },
    );
    table.register_op(
        "-",
        and(vec![fraction()]),
        OperatorFn {
            apply: |a| Concrete::Frac(farey_fraction::neg(a[0].as_fraction())),
            return_signature: fraction(),
        },
    );
    table.register_op(
        "*",
        and(vec![fraction(), fraction()]),
        OperatorFn {
            apply: |a| Concrete::Frac(farey_fraction::mul(a[0].as_fraction(), a[1].as_fraction())),
            return_signature: fraction(),
        },
    );
    table.register_op(
        "/",
        and(vec![fraction(), fraction()]),
        OperatorFn {
            apply: |a| Concrete::Frac(farey_fraction::div(a[0].as_fraction(), a[1].as_fraction())),
            return_signature: fraction(),
        },
    );

    // Mixed Fraction/Int arithmetic: the Int operand is promoted to
    // `Fraction { num, den: 1 }` before the same op runs. `OperatorFn::apply`
    // is a plain `fn` pointer (no captures), so each combination gets its
    // own named function rather than a closure built inside a loop.
    table.register_op(
        "+",
        and(vec![fraction(), int()]),
        OperatorFn { apply: mixed_frac_int_add, return_signature: fraction() },
    );
    table.register_op(
        "+",
        and(vec![int(), fraction()]),
        OperatorFn { apply: mixed_int_frac_add, return_signature: fraction() },
    );
    table.register_op(
        "-",
        and(vec![fraction(), int()]),
        OperatorFn { apply: mixed_frac_int_sub, return_signature: fraction() },
    );
    table.register_op(
        "-",
        and(vec![int(), fraction()]),
        OperatorFn { apply: mixed_int_frac_sub, return_signature: fraction() },
    );
    table.register_op(
        "*",
        and(vec![fraction(), int()]),
        OperatorFn { apply: mixed_frac_int_mul, return_signature: fraction() },
    );
    table.register_op(
        "*",
        and(vec![int(), fraction()]),
        OperatorFn { apply: mixed_int_frac_mul, return_signature: fraction() },
    );
    table.register_op(
        "/",
        and(vec![fraction(), int()]),
        OperatorFn { apply: mixed_frac_int_div, return_signature: fraction() },
    );
    table.register_op(
        "/",
        and(vec![int(), fraction()]),
        OperatorFn { apply: mixed_int_frac_div, return_signature: fraction() },
    );
}

fn int_as_fraction(v: &Value) -> Fraction {
    Fraction { num: v.as_int(), den: 1 }
}

fn mixed_frac_int_add(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::add(a[0].as_fraction(), int_as_fraction(&a[1])))
}
fn mixed_int_frac_add(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::add(int_as_fraction(&a[0]), a[1].as_fraction()))
}
fn mixed_frac_int_sub(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::sub(a[0].as_fraction(), int_as_fraction(&a[1])))
}
fn mixed_int_frac_sub(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::sub(int_as_fraction(&a[0]), a[1].as_fraction()))
}
fn mixed_frac_int_mul(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::mul(a[0].as_fraction(), int_as_fraction(&a[1])))
}
fn mixed_int_frac_mul(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::mul(int_as_fraction(&a[0]), a[1].as_fraction()))
}
fn mixed_frac_int_div(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::div(a[0].as_fraction(), int_as_fraction(&a[1])))
}
fn mixed_int_frac_div(a: &[Value]) -> Concrete {
    Concrete::Frac(farey_fraction::div(int_as_fraction(&a[0]), a[1].as_fraction()))
}

/// The operator table pre-loaded with every built-in literal and
/// operator overload. Both `farey-interp` and `farey-ir` build one of
/// these and hold it for the lifetime of a run/check.
pub fn with_builtins() -> OpTable {
    let mut table = OpTable::empty();
    register_int_ops(&mut table);
    register_float_ops(&mut table);
    register_string_ops(&mut table);
    register_fraction_ops(&mut table);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_literal_parses() {
        let table = with_builtins();
        let v = table.literal("Integer", "42").unwrap();
        assert_eq!(v, Value::int(42));
    }

    #[test]
    fn int_division_produces_fraction() {
        let table = with_builtins();
        let result = table.dispatch("/", &[Value::int(3), Value::int(4)]).unwrap();
        assert_eq!(result, Value::fraction(farey_fraction::reduce(3, 4)));
    }

    #[test]
    fn fraction_addition_reduces_to_lowest_terms() {
        let table = with_builtins();
        let lhs = table.dispatch("/", &[Value::int(3), Value::int(4)]).unwrap();
        let rhs = table.dispatch("/", &[Value::int(2), Value::int(3)]).unwrap();
        let sum = table.dispatch("+", &[lhs, rhs]).unwrap();
        assert_eq!(sum, Value::fraction(farey_fraction::reduce(17, 12)));
    }

    #[test]
    fn string_times_negative_int_reverses_then_repeats() {
        let table = with_builtins();
        let result = table.dispatch("*", &[Value::string("ab"), Value::int(-2)]).unwrap();
        assert_eq!(result, Value::string("baba"));
    }

    #[test]
    fn string_plus_string_concatenates() {
        let table = with_builtins();
        let result = table.dispatch("+", &[Value::string("foo"), Value::string("bar")]).unwrap();
        assert_eq!(result, Value::string("foobar"));
    }

    #[test]
    fn unary_minus_on_string_reverses() {
        let table = with_builtins();
        let result = table.dispatch("-", &[Value::string("abc")]).unwrap();
        assert_eq!(result, Value::string("cba"));
    }

    #[test]
    fn int_and_string_have_no_common_add_overload() {
        let table = with_builtins();
        let err = table.dispatch("+", &[Value::int(2), Value::string("3")]).unwrap_err();
        assert_eq!(err.operator, "+");
    }

    #[test]
    fn fraction_and_int_mix_promotes_the_int() {
        let table = with_builtins();
        let frac = table.dispatch("/", &[Value::int(1), Value::int(2)]).unwrap();
        let result = table.dispatch("+", &[frac, Value::int(1)]).unwrap();
        assert_eq!(result, Value::fraction(farey_fraction::reduce(3, 2)));
    }
}
