//! [`translate`]: lowers a parsed [`Node`] into [`Ir`], resolving every
//! variable reference and operator call against a [`Type`]-valued scope
//! chain as it goes.
//!
//! Grounded on `snow_typeck::env::TypeEnv`'s "fresh-env-pre-populated-
//! with-builtins" shape (itself populated by `builtins::register_builtins`),
//! generalized from a name→`Scheme` environment to this workspace's
//! `Scope<Type>`.

use std::rc::Rc;

use farey_ast::{Flag, Node};
use farey_ops::OpTable;
use farey_scope::{Scope, SharedScope};
use farey_types::{match_types, Type};

use crate::error::{TranslateError, TypeMismatchError};
use crate::ir::{Ir, IrChildren, IrKind};

fn prepopulated_scope() -> SharedScope<Type> {
    let scope = Scope::root();
    for name in ["Int", "Float", "String", "Fraction"] {
        scope
            .borrow_mut()
            .initialize(name, Type::Atom(name.to_string()), true, true, true)
            .expect("a fresh scope has no prior binding to collide with");
    }
    scope
}

/// Lower `ast` into `Ir`, creating and pre-populating a fresh type scope
/// when `scope` is `None`; reusing (and mutating) the one given
/// otherwise, so a caller can translate a program incrementally.
///
/// Takes `&Rc<Node>` rather than `&Node` so every `Ir` node's `ast_ref`
/// can hold a genuine `Weak` back into the tree the caller owns.
pub fn translate(ast: &Rc<Node>, scope: Option<SharedScope<Type>>, ops: &OpTable) -> Result<(SharedScope<Type>, Ir), TranslateError> {
    let scope = scope.unwrap_or_else(prepopulated_scope);
    let ir = translate_node(ast, &scope, ops)?;
    Ok((scope, ir))
}

fn translate_node(ast: &Rc<Node>, scope: &SharedScope<Type>, ops: &OpTable) -> Result<Ir, TranslateError> {
    let ast_ref = Rc::downgrade(ast);

    if ast.has_flag(Flag::Literal) {
        let token = ast.token.as_ref().expect("a Literal node always carries its token");
        let value = ops
            .literal(&ast.name, &token.text)
            .expect("the parser only emits literal kinds the operator table registers a constructor for");
        return Ok(Ir::new(IrKind::Literal, Some(value.spec), IrChildren::Value(token.text.clone()), ast_ref));
    }

    if ast.has_flag(Flag::TypeLiteral) {
        return Ok(Ir::new(
            IrKind::Literal,
            Some(Type::Atom("Type".to_string())),
            IrChildren::Value(ast.name.clone()),
            ast_ref,
        ));
    }

    if ast.has_flag(Flag::Variable) {
        let item = farey_scope::get_variable_full(scope, &ast.name)
            .ok_or_else(|| TranslateError::UnknownVariable(ast.name.clone()))?;
        return Ok(Ir::new(IrKind::Variable, Some(item.value), IrChildren::Counter(item.counter), ast_ref));
    }

    if ast.has_flag(Flag::Assign) || ast.has_flag(Flag::Reassign) {
        return translate_assign(ast, scope, ops, ast_ref);
    }

    if ast.has_flag(Flag::Block) {
        let inner = Scope::child(scope);
        let stmts = translate_statements(ast, &inner, ops)?;
        let ty = stmts.last().and_then(|ir| ir.ty.clone());
        return Ok(Ir::new(IrKind::Statements, ty, IrChildren::List(stmts), ast_ref));
    }

    if ast.has_flag(Flag::Statements) {
        let stmts = translate_statements(ast, scope, ops)?;
        let ty = stmts.last().and_then(|ir| ir.ty.clone());
        return Ok(Ir::new(IrKind::Statements, ty, IrChildren::List(stmts), ast_ref));
    }

    if ast.has_flag(Flag::Group) {
        let child = ast.params.first().expect("a Group node always has one child");
        return translate_node(child, scope, ops);
    }

    match ast.name.as_str() {
        "Array" => {
            let children = translate_each(&ast.params, scope, ops)?;
            let ty = Type::array(children.iter().filter_map(|ir| ir.ty.clone()));
            Ok(Ir::new(IrKind::Op("Array".to_string()), Some(ty), IrChildren::List(children), ast_ref))
        }
        "Tuple" => {
            let children = translate_each(&ast.params, scope, ops)?;
            let ty = Type::And(children.iter().map(|ir| ir.ty.clone().unwrap_or(Type::Any)).collect());
            Ok(Ir::new(IrKind::Op("Tuple".to_string()), Some(ty), IrChildren::List(children), ast_ref))
        }
        name => {
            let children = translate_each(&ast.params, scope, ops)?;
            let arg_type = Type::And(children.iter().map(|ir| ir.ty.clone().unwrap_or(Type::Any)).collect());
            // Resolved via the operator table's registered return type,
            // not a first-child-type fallback.
            let ty = ops
                .return_type_for(name, &arg_type)
                .ok_or_else(|| TranslateError::UnknownType(name.to_string()))?;
            Ok(Ir::new(IrKind::Op(name.to_string()), Some(ty), IrChildren::List(children), ast_ref))
        }
    }
}

fn translate_each(nodes: &[Rc<Node>], scope: &SharedScope<Type>, ops: &OpTable) -> Result<Vec<Ir>, TranslateError> {
    nodes.iter().map(|n| translate_node(n, scope, ops)).collect()
}

fn translate_statements(ast: &Rc<Node>, scope: &SharedScope<Type>, ops: &OpTable) -> Result<Vec<Ir>, TranslateError> {
    translate_each(&ast.params, scope, ops)
}

fn translate_assign(
    ast: &Rc<Node>,
    scope: &SharedScope<Type>,
    ops: &OpTable,
    ast_ref: std::rc::Weak<Node>,
) -> Result<Ir, TranslateError> {
    let value_node = ast
        .named_param("value")
        .expect("an Assign/Reassign node always carries a `value` named param");
    let variable_node = ast
        .named_param("variable")
        .expect("an Assign/Reassign node always carries a `variable` named param");

    let value_ir = translate_node(value_node, scope, ops)?;
    let value_ty = value_ir.ty.clone().unwrap_or(Type::Any);

    if let Some(type_node) = ast.named_param("type") {
        let declared = Type::Atom(type_node.name.clone());
        if !match_types(&declared, &value_ty).matched {
            return Err(TranslateError::TypeMismatch(TypeMismatchError {
                got: value_ty,
                expected: declared,
            }));
        }
    }

    let name = variable_node.name.clone();
    let counter = if ast.has_flag(Flag::Assign) {
        scope
            .borrow_mut()
            .initialize(name.clone(), value_ty.clone(), false, false, false)?;
        farey_scope::get_variable_full(scope, &name).expect("just initialized").counter
    } else {
        let existing = farey_scope::get_variable_full(scope, &name)
            .ok_or_else(|| TranslateError::UnknownVariable(name.clone()))?;
        if !match_types(&existing.value, &value_ty).matched {
            return Err(TranslateError::TypeMismatch(TypeMismatchError {
                got: value_ty,
                expected: existing.value,
            }));
        }
        existing.counter
    };

    Ok(Ir::new(
        IrKind::Assign,
        Some(value_ty),
        IrChildren::AssignPair(counter, Box::new(value_ir)),
        ast_ref,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use farey_ops::with_builtins;
    use farey_types::Type;

    fn translate_src(src: &str) -> Ir {
        let ast = farey_parser::parse(src).unwrap_or_else(|e| panic!("parse of {src:?} failed: {e}"));
        let ops = with_builtins();
        let (_scope, ir) = translate(&ast, None, &ops).unwrap_or_else(|e| panic!("translate of {src:?} failed: {e}"));
        ir
    }

    fn translate_err(src: &str) -> TranslateError {
        let ast = farey_parser::parse(src).unwrap_or_else(|e| panic!("parse of {src:?} failed: {e}"));
        let ops = with_builtins();
        translate(&ast, None, &ops).expect_err("expected translate to fail")
    }

    #[test]
    fn integer_addition_types_as_int() {
        let ir = translate_src("2 + 3");
        assert_eq!(ir.ty, Some(Type::Atom("Int".to_string())));
    }

    #[test]
    fn fraction_addition_types_as_fraction() {
        let ir = translate_src("3/4 + 2/3");
        assert_eq!(ir.ty, Some(Type::Atom("Fraction".to_string())));
    }

    #[test]
    fn assign_then_reference_resolves_to_same_counter() {
        let ir = translate_src("x := 2\nx");
        let stmts = match ir.children {
            IrChildren::List(items) => items,
            _ => panic!("expected a statement list"),
        };
        let assign_counter = match &stmts[0].children {
            IrChildren::AssignPair(counter, _) => *counter,
            _ => panic!("expected an assign node"),
        };
        let variable_counter = match &stmts[1].children {
            IrChildren::Counter(counter) => *counter,
            _ => panic!("expected a variable node"),
        };
        assert_eq!(assign_counter, variable_counter);
    }

    #[test]
    fn block_binding_does_not_leak_into_outer_scope() {
        let err = translate_err("{ y := 1 }\ny");
        assert_eq!(err, TranslateError::UnknownVariable("y".to_string()));
    }

    #[test]
    fn typed_assign_mismatch_is_rejected() {
        let err = translate_err("a Float := 2");
        match err {
            TranslateError::TypeMismatch(e) => {
                assert_eq!(e.got, Type::Atom("Int".to_string()));
                assert_eq!(e.expected, Type::Atom("Float".to_string()));
            }
            other => panic!("expected a type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn reassign_with_a_different_type_is_rejected() {
        let err = translate_err("a := 1\na = 'two'");
        assert!(matches!(err, TranslateError::TypeMismatch(_)));
    }

    #[test]
    fn redeclaring_a_name_already_bound_in_the_same_scope_is_a_scope_error() {
        let err = translate_err("x := 1\nx := 2");
        assert_eq!(err, TranslateError::Scope(farey_scope::ScopeError::AlreadyDefined("x".to_string())));
    }

    #[test]
    fn unknown_variable_reference_errors() {
        let err = translate_err("missing");
        assert_eq!(err, TranslateError::UnknownVariable("missing".to_string()));
    }

    #[test]
    fn array_literal_types_as_array_of_int() {
        let ir = translate_src("[1, 2, 3]");
        let stmts = match ir.children {
            IrChildren::List(items) => items,
            _ => panic!("expected a statement list"),
        };
        assert_eq!(stmts[0].ty, Some(Type::array([Type::Atom("Int".to_string())])));
    }

    #[test]
    fn indented_rendering_includes_operator_name_and_type() {
        let ir = translate_src("2 + 3");
        let rendered = ir.to_indented_string();
        assert!(rendered.contains("+: Int"));
    }
}
