//! The Language's abstract syntax tree: a small tagged tree produced by
//! the parser and consumed independently by the tree-walking interpreter
//! and the IR translator.
//!
//! Unlike a lossless concrete syntax tree, [`Node`] keeps only what later
//! stages need: an operator/operand name, the originating [`Token`] (for
//! diagnostics), positional and named children, and a set of [`Flag`]s
//! describing what shape of construct it is.

use std::rc::Rc;

use farey_common::Token;

/// What kind of construct a [`Node`] represents. A node can carry more
/// than one flag (e.g. a destructuring assignment is both `Assign` and
/// `Group`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// A literal value: an integer, float, string, or fraction.
    Literal,
    /// A parenthesized expression.
    Group,
    /// A curly-brace block introducing its own scope.
    Block,
    /// A sequence of statements (newline- or `;`-separated).
    Statements,
    /// A variable reference.
    Variable,
    /// A type-literal reference (an uppercase identifier used as a
    /// value, e.g. naming a type in a match expression).
    TypeLiteral,
    /// A first binding, `:=`.
    Assign,
    /// A reassignment of an already-bound name, `=`.
    Reassign,
}

/// One node of the AST.
#[derive(Debug, Clone)]
pub struct Node {
    /// The operator, function, literal text, or identifier this node
    /// names.
    pub name: String,
    /// The token this node was produced from, when it corresponds to a
    /// single token (absent for synthetic nodes such as an implicit
    /// statement list).
    pub token: Option<Token>,
    pub params: Vec<Rc<Node>>,
    pub named_params: Vec<(String, Rc<Node>)>,
    pub flags: Vec<Flag>,
}

impl Node {
    pub fn new(name: impl Into<String>, token: Option<Token>) -> Self {
        Self {
            name: name.into(),
            token,
            params: Vec::new(),
            named_params: Vec::new(),
            flags: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_param(mut self, param: Rc<Node>) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = Rc<Node>>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn with_named_param(mut self, name: impl Into<String>, value: Rc<Node>) -> Self {
        self.named_params.push((name.into(), value));
        self
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn named_param(&self, name: &str) -> Option<&Rc<Node>> {
        self.named_params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Render this node back into Language syntax, as close to what a
    /// user would have written as the tree still records. Not guaranteed
    /// to round-trip whitespace or comments -- only used for diagnostics
    /// and snapshot tests.
    pub fn to_canonical_string(&self) -> String {
        if self.has_flag(Flag::Literal) || self.has_flag(Flag::Variable) || self.has_flag(Flag::TypeLiteral) {
            return self.name.clone();
        }

        if self.has_flag(Flag::Statements) {
            return self
                .params
                .iter()
                .map(|p| p.to_canonical_string())
                .collect::<Vec<_>>()
                .join("; ");
        }

        if self.has_flag(Flag::Block) {
            let inner = self
                .params
                .iter()
                .map(|p| p.to_canonical_string())
                .collect::<Vec<_>>()
                .join("; ");
            return format!("{{ {inner} }}");
        }

        if self.has_flag(Flag::Group) {
            let inner = self
                .params
                .iter()
                .map(|p| p.to_canonical_string())
                .collect::<Vec<_>>()
                .join(", ");
            return format!("({inner})");
        }

        if self.has_flag(Flag::Assign) || self.has_flag(Flag::Reassign) {
            let op = if self.has_flag(Flag::Assign) { ":=" } else { "=" };
            let target = self.params.first().map(|p| p.to_canonical_string()).unwrap_or_default();
            let value = self.params.get(1).map(|p| p.to_canonical_string()).unwrap_or_default();
            return format!("{target} {op} {value}");
        }

        match self.params.len() {
            2 => format!(
                "{} {} {}",
                self.params[0].to_canonical_string(),
                self.name,
                self.params[1].to_canonical_string()
            ),
            1 => format!("{}{}", self.name, self.params[0].to_canonical_string()),
            _ => {
                let args = self
                    .params
                    .iter()
                    .map(|p| p.to_canonical_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({args})", self.name)
            }
        }
    }
}
