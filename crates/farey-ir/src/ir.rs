//! The [`Ir`] node shape: a typed, scope-resolved intermediate form
//! sitting between the AST and whatever a future backend would consume.

use std::rc::Weak;

use farey_ast::Node;
use farey_types::Type;

/// What an [`Ir`] node represents. `Op` folds binary/unary operator
/// calls *and* the `Array`/`Tuple` constructors into one variant tagged
/// by name, mirroring how `farey-ops::OpTable` itself keys everything by
/// a bare operator name string.
#[derive(Debug, Clone, PartialEq)]
pub enum IrKind {
    Literal,
    Variable,
    Assign,
    /// A statement list; also used for a block (distinguishable, if it
    /// matters to a consumer, via `ast_ref`'s `Flag::Block`).
    Statements,
    Op(String),
}

/// The node-kind-specific payload. Which variant is populated is
/// determined entirely by the owning `Ir`'s `kind`.
#[derive(Debug, Clone, PartialEq)]
pub enum IrChildren {
    /// A literal's or type-literal's own source text.
    Value(String),
    /// A variable reference: the counter of the binding it resolved to,
    /// unique across the whole scope chain (`farey_scope::Item::counter`).
    Counter(u64),
    /// An assign/reassign: the bound name's counter, plus the lowered
    /// value expression.
    AssignPair(u64, Box<Ir>),
    /// An ordered list of child nodes (statements, operator arguments,
    /// array/tuple elements).
    List(Vec<Ir>),
}

/// One node of the IR.
#[derive(Debug, Clone)]
pub struct Ir {
    pub kind: IrKind,
    pub ty: Option<Type>,
    pub children: IrChildren,
    /// A non-owning backlink to the AST node this was lowered from, for
    /// diagnostics that want to report back against source spans. `Weak`
    /// because the AST's `Rc<Node>` ownership stays with whoever holds
    /// the parse result -- this avoids a reference cycle between the
    /// two trees.
    pub ast_ref: Weak<Node>,
}

impl Ir {
    pub fn new(kind: IrKind, ty: Option<Type>, children: IrChildren, ast_ref: Weak<Node>) -> Self {
        Self { kind, ty, children, ast_ref }
    }

    /// A structural, indentation-based rendering used for both
    /// diagnostics and snapshot comparison.
    pub fn to_indented_string(&self) -> String {
        let mut out = String::new();
        self.write_indented(&mut out, 0);
        out
    }

    fn write_indented(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let ty = self.ty.as_ref().map(Type::specification).unwrap_or_else(|| "?".to_string());
        match &self.kind {
            IrKind::Literal => {
                let text = match &self.children {
                    IrChildren::Value(v) => v.as_str(),
                    _ => unreachable!("Literal always carries an IrChildren::Value"),
                };
                out.push_str(&format!("{indent}Literal({text}): {ty}\n"));
            }
            IrKind::Variable => {
                let counter = match &self.children {
                    IrChildren::Counter(c) => *c,
                    _ => unreachable!("Variable always carries an IrChildren::Counter"),
                };
                out.push_str(&format!("{indent}Variable(#{counter}): {ty}\n"));
            }
            IrKind::Assign => {
                let (counter, value) = match &self.children {
                    IrChildren::AssignPair(c, v) => (*c, v.as_ref()),
                    _ => unreachable!("Assign always carries an IrChildren::AssignPair"),
                };
                out.push_str(&format!("{indent}Assign(#{counter}): {ty}\n"));
                value.write_indented(out, depth + 1);
            }
            IrKind::Statements => {
                out.push_str(&format!("{indent}Statements: {ty}\n"));
                let children = match &self.children {
                    IrChildren::List(items) => items,
                    _ => unreachable!("Statements always carries an IrChildren::List"),
                };
                for child in children {
                    child.write_indented(out, depth + 1);
                }
            }
            IrKind::Op(name) => {
                out.push_str(&format!("{indent}{name}: {ty}\n"));
                let children = match &self.children {
                    IrChildren::List(items) => items,
                    _ => unreachable!("Op always carries an IrChildren::List"),
                };
                for child in children {
                    child.write_indented(out, depth + 1);
                }
            }
        }
    }
}
