//! The operator table: a registry mapping a bound token to its parsing
//! *behavior* (precedence, associativity, prefix/infix role, brace
//! pairing), looked up first by exact token text (`+`, `:=`, `(`, ...)
//! and falling back to token kind (`Integer`, `Variable`, ...) for
//! lexemes whose text varies.
//!
//! Behaviors are data, not closures -- `Parser::prefix`/`Parser::infix` match on
//! [`OperatorBehavior`] directly rather than invoking a boxed `dyn Fn`.

use rustc_hash::FxHashMap;

use farey_common::TokenKind;

/// `epsilon`: subtracted from a right-associative
/// operator's own precedence before the recursive right-hand parse, so
/// an operator of equal precedence reassociates to the right instead of
/// the left.
pub const EPSILON: f64 = 1e-5;

/// Which shape of tuple/grouping construct a [`OperatorBehavior::Brace`]
/// produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceKind {
    /// `(...)`: zero expressions is an empty tuple, one expression with
    /// no trailing comma is a `Group`, anything else (including a single
    /// expression with a trailing comma) is a `Tuple`.
    GroupOrTuple,
    /// `[...]`: always an `Array`, regardless of arity.
    Array,
    /// `{...}`: a statement block that introduces its own scope.
    Block,
}

/// A parsed token's role in the Pratt algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorBehavior {
    /// Prefix-only: emits a literal/variable/type-literal leaf carrying
    /// the token's text. `ast_name` is the AST constructor name -- for
    /// literals this is the *kind* name (`"Integer"`, not the digits),
    /// since the literal-operator table (`farey-ops`) dispatches on it.
    Value { ast_name: &'static str },
    /// An operator with a binary infix precedence and, optionally, a
    /// separate unary-prefix precedence and AST name.
    Simple {
        lbp: f64,
        ast_name: &'static str,
        unary: Option<(f64, &'static str)>,
        right_associative: bool,
    },
    /// A brace pair: `close` is the exact text of the matching closing
    /// token.
    Brace { close: &'static str, kind: BraceKind },
    /// Occupies the table so closing braces, commas, and newlines have
    /// *some* bound behavior (lbp 0, no prefix/infix role) rather than
    /// failing table lookup entirely.
    Dummy,
    /// Synthetic, injected once the token stream is exhausted. lbp 0.
    End,
}

impl OperatorBehavior {
    /// The binding power used by `Parser::expression`'s `rbp < lbp` loop
    /// condition, for this operator appearing in infix position.
    pub fn left_binding_power(&self) -> f64 {
        match self {
            OperatorBehavior::Simple { lbp, .. } => *lbp,
            _ => 0.0,
        }
    }
}

/// `(exact text, token kind) -> behavior` registry. Binding a token tries
/// the text map first (covers fixed-spelling operators and braces), then
/// falls back to the kind map (covers lexemes whose text varies, like
/// `Integer`/`Variable`).
pub struct OperatorTable {
    by_text: FxHashMap<&'static str, OperatorBehavior>,
    by_kind: FxHashMap<TokenKind, OperatorBehavior>,
}

impl OperatorTable {
    /// Look up the behavior bound to a token, preferring an exact-text
    /// match over a kind match.
    pub fn behavior_for(&self, text: &str, kind: TokenKind) -> Option<&OperatorBehavior> {
        self.by_text.get(text).or_else(|| self.by_kind.get(&kind))
    }
}

/// The language's operator table, built once per parse from the
/// precedence/associativity/grouping rules.
pub fn default_operator_table() -> OperatorTable {
    let mut by_text = FxHashMap::default();
    let mut by_kind = FxHashMap::default();

    by_kind.insert(TokenKind::Integer, OperatorBehavior::Value { ast_name: "Integer" });
    by_kind.insert(TokenKind::Float, OperatorBehavior::Value { ast_name: "Float" });
    by_kind.insert(TokenKind::String, OperatorBehavior::Value { ast_name: "String" });
    by_kind.insert(TokenKind::Variable, OperatorBehavior::Value { ast_name: "Variable" });
    by_kind.insert(TokenKind::Type, OperatorBehavior::Value { ast_name: "Type" });
    by_kind.insert(TokenKind::Newline, OperatorBehavior::Dummy);

    by_text.insert(
        "+",
        OperatorBehavior::Simple {
            lbp: 10.0,
            ast_name: "+",
            unary: None,
            right_associative: false,
        },
    );
    by_text.insert(
        "-",
        OperatorBehavior::Simple {
            lbp: 10.0,
            ast_name: "-",
            unary: Some((100.0, "-")),
            right_associative: false,
        },
    );
    by_text.insert(
        "*",
        OperatorBehavior::Simple {
            lbp: 20.0,
            ast_name: "*",
            unary: None,
            right_associative: false,
        },
    );
    by_text.insert(
        "/",
        OperatorBehavior::Simple {
            lbp: 20.0,
            ast_name: "/",
            unary: None,
            right_associative: false,
        },
    );
    by_text.insert(
        "//",
        OperatorBehavior::Simple {
            lbp: 20.0,
            ast_name: "//",
            unary: None,
            right_associative: false,
        },
    );
    by_text.insert(
        "**",
        OperatorBehavior::Simple {
            lbp: 30.0,
            ast_name: "**",
            unary: None,
            right_associative: true,
        },
    );
    by_text.insert(
        "..",
        OperatorBehavior::Simple {
            lbp: 5.0,
            ast_name: "..",
            unary: None,
            right_associative: false,
        },
    );
    by_text.insert(
        "=",
        OperatorBehavior::Simple {
            lbp: 4.0,
            ast_name: "=",
            unary: None,
            right_associative: false,
        },
    );
    by_text.insert(
        ":=",
        OperatorBehavior::Simple {
            lbp: 3.0,
            ast_name: ":=",
            unary: None,
            right_associative: false,
        },
    );

    by_text.insert(
        "(",
        OperatorBehavior::Brace {
            close: ")",
            kind: BraceKind::GroupOrTuple,
        },
    );
    by_text.insert(
        "[",
        OperatorBehavior::Brace {
            close: "]",
            kind: BraceKind::Array,
        },
    );
    by_text.insert(
        "{",
        OperatorBehavior::Brace {
            close: "}",
            kind: BraceKind::Block,
        },
    );
    by_text.insert(")", OperatorBehavior::Dummy);
    by_text.insert("]", OperatorBehavior::Dummy);
    by_text.insert("}", OperatorBehavior::Dummy);
    by_text.insert(",", OperatorBehavior::Dummy);

    OperatorTable { by_text, by_kind }
}
