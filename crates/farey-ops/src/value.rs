//! The runtime value type: a [`Type`] tag carried alongside its
//! [`Concrete`] payload, since the interpreter keeps values typed all the
//! way through evaluation rather than re-deriving their type on demand.

use std::fmt;

use farey_fraction::Fraction;
use farey_types::Type;

/// The untyped payload half of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Concrete {
    Int(i64),
    Float(f64),
    Str(String),
    Frac(Fraction),
    /// Backs both array and tuple values; which one a [`Value`] is is
    /// determined by its `spec` (`Type::Array` vs `Type::And`).
    List(Vec<Value>),
}

/// A typed runtime value.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub spec: Type,
    pub concrete: Concrete,
}

impl Value {
    pub fn int(n: i64) -> Value {
        Value {
            spec: Type::Atom("Int".to_string()),
            concrete: Concrete::Int(n),
        }
    }

    pub fn float(x: f64) -> Value {
        Value {
            spec: Type::Atom("Float".to_string()),
            concrete: Concrete::Float(x),
        }
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value {
            spec: Type::Atom("String".to_string()),
            concrete: Concrete::Str(s.into()),
        }
    }

    pub fn fraction(f: Fraction) -> Value {
        Value {
            spec: Type::Atom("Fraction".to_string()),
            concrete: Concrete::Frac(f),
        }
    }

    /// An `Array` value: element type is the `Or`-reduction over the
    /// items actually present, per [`Type::array`].
    pub fn array(items: Vec<Value>) -> Value {
        let elem = Type::array(items.iter().map(|v| v.spec.clone()));
        Value {
            spec: elem,
            concrete: Concrete::List(items),
        }
    }

    /// A `Tuple` value: an `And` of the items' own types, positional.
    pub fn tuple(items: Vec<Value>) -> Value {
        let spec = Type::And(items.iter().map(|v| v.spec.clone()).collect());
        Value {
            spec,
            concrete: Concrete::List(items),
        }
    }

    pub fn as_int(&self) -> i64 {
        match self.concrete {
            Concrete::Int(n) => n,
            _ => unreachable!("as_int called on a non-Int value"),
        }
    }

    pub fn as_float(&self) -> f64 {
        match self.concrete {
            Concrete::Float(x) => x,
            _ => unreachable!("as_float called on a non-Float value"),
        }
    }

    pub fn as_str(&self) -> &str {
        match &self.concrete {
            Concrete::Str(s) => s,
            _ => unreachable!("as_str called on a non-String value"),
        }
    }

    pub fn as_fraction(&self) -> Fraction {
        match self.concrete {
            Concrete::Frac(f) => f,
            _ => unreachable!("as_fraction called on a non-Fraction value"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.concrete {
            Concrete::Int(n) => write!(f, "{n}"),
            Concrete::Float(x) => write!(f, "{x}"),
            Concrete::Str(s) => write!(f, "'{s}'"),
            Concrete::Frac(frac) => write!(f, "{}/{}", frac.num, frac.den),
            Concrete::List(items) => {
                let (open, close) = match self.spec {
                    Type::Array(_) => ("[", "]"),
                    _ => ("(", ")"),
                };
                write!(f, "{open}")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "{close}")
            }
        }
    }
}
