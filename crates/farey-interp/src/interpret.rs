//! The tree-walking evaluator: recurse on the AST, dispatch
//! by the node's flags, thread the scope chain through.
//!
//! Grounded on the "recurse-on-AST-then-dispatch-by-constructor-name"
//! shape of `snow_typeck::infer` (a type-inference walk over the same
//! kind of tagged tree), generalized here from inferring a type to
//! producing a runtime [`Value`].

use farey_ast::{Flag, Node};
use farey_ops::{substitution_candidate, Delta, OpTable, Value};
use farey_types::{equals, match_types, Type};

use crate::error::{InterpError, TypeMismatchError};
use crate::state::State;

/// Evaluate `ast` under `state`, returning the resulting value and the
/// (possibly mutated) state to use for whatever comes next in sequence.
pub fn interpret(ast: &Node, state: &State, ops: &OpTable) -> Result<(Value, State), InterpError> {
    if ast.has_flag(Flag::Literal) {
        let token = ast.token.as_ref().expect("a Literal node always carries its token");
        let value = ops
            .literal(&ast.name, &token.text)
            .expect("the parser only emits literal kinds the operator table registers a constructor for");
        return Ok((value, state.clone()));
    }

    if ast.has_flag(Flag::Variable) {
        let value = farey_scope::get(&state.scope, &ast.name)
            .ok_or_else(|| InterpError::Scope(farey_scope::ScopeError::NotFound(ast.name.clone())))?;
        return Ok((value, state.clone()));
    }

    if ast.has_flag(Flag::TypeLiteral) {
        // A type name used as a value (e.g. `x := Int`): not a built-in
        // operator signature, so it carries its own nominal `Type` tag
        // rather than flowing through `OpTable`.
        let value = Value {
            spec: Type::Atom("Type".to_string()),
            concrete: farey_ops::Concrete::Str(ast.name.clone()),
        };
        return Ok((value, state.clone()));
    }

    if ast.has_flag(Flag::Assign) || ast.has_flag(Flag::Reassign) {
        return interpret_assign(ast, state, ops);
    }

    if ast.has_flag(Flag::Block) {
        let inner_state = state.child();
        let (value, _discarded) = interpret_statements(ast, &inner_state, ops)?;
        // The block's own bindings never escape; the caller keeps using
        // the state it already had.
        return Ok((value, state.clone()));
    }

    if ast.has_flag(Flag::Statements) {
        return interpret_statements(ast, state, ops);
    }

    if ast.has_flag(Flag::Group) {
        let child = ast.params.first().expect("a Group node always has one child");
        return interpret(child, state, ops);
    }

    match ast.name.as_str() {
        "Array" => {
            let (items, next) = interpret_each(&ast.params, state, ops)?;
            Ok((Value::array(items), next))
        }
        "Tuple" => {
            let (items, next) = interpret_each(&ast.params, state, ops)?;
            Ok((Value::tuple(items), next))
        }
        _ => {
            let (args, next) = interpret_each(&ast.params, state, ops)?;
            match ops.dispatch(&ast.name, &args) {
                Ok(result) => Ok((result, next)),
                Err(mut sig_err) => {
                    sig_err.deltas = suggest_substitutions(&ast.name, &ast.params, &args, ops);
                    Err(InterpError::Signature(sig_err))
                }
            }
        }
    }
}

/// For each argument position, try the
/// single known unary substitution for its runtime type (`Int -> String`
/// by quoting, `String -> Int` when the text parses as digits) and see
/// whether swapping it in alone would make some overload resolve. Each
/// surviving candidate becomes its own, independent [`Delta`] -- no
/// attempt to combine substitutions across positions.
fn suggest_substitutions(name: &str, param_nodes: &[std::rc::Rc<Node>], args: &[Value], ops: &OpTable) -> Vec<Delta> {
    let arg_types: Vec<Type> = args.iter().map(|v| v.spec.clone()).collect();
    let mut deltas = Vec::new();
    for (i, (node, arg)) in param_nodes.iter().zip(args).enumerate() {
        let Some(token) = node.token.as_ref() else { continue };
        let Some((candidate_ty, replacement)) = substitution_candidate(arg) else { continue };
        let mut candidate_types = arg_types.clone();
        candidate_types[i] = candidate_ty;
        if ops.accepts(name, &Type::And(candidate_types)) {
            deltas.push(Delta {
                char_position: token.char_position,
                length: token.text.chars().count() as u32,
                replacement,
            });
        }
    }
    deltas
}

/// Evaluate each of `nodes` in order, threading the state through so a
/// `:=`/`=` earlier in the list is visible to later siblings.
fn interpret_each(nodes: &[std::rc::Rc<Node>], state: &State, ops: &OpTable) -> Result<(Vec<Value>, State), InterpError> {
    let mut current = state.clone();
    let mut values = Vec::with_capacity(nodes.len());
    for node in nodes {
        let (value, next) = interpret(node, &current, ops)?;
        values.push(value);
        current = next;
    }
    Ok((values, current))
}

fn interpret_statements(ast: &Node, state: &State, ops: &OpTable) -> Result<(Value, State), InterpError> {
    let mut current = state.clone();
    let mut last = Value::tuple(Vec::new());
    for stmt in &ast.params {
        let (value, next) = interpret(stmt, &current, ops)?;
        last = value;
        current = next;
    }
    Ok((last, current))
}

fn interpret_assign(ast: &Node, state: &State, ops: &OpTable) -> Result<(Value, State), InterpError> {
    let value_node = ast
        .named_param("value")
        .expect("an Assign/Reassign node always carries a `value` named param");
    let variable_node = ast
        .named_param("variable")
        .expect("an Assign/Reassign node always carries a `variable` named param");

    let (value, next_state) = interpret(value_node, state, ops)?;

    if let Some(type_node) = ast.named_param("type") {
        let declared = Type::Atom(type_node.name.clone());
        if !match_types(&declared, &value.spec).matched {
            return Err(InterpError::TypeMismatch(TypeMismatchError {
                got: value.spec.clone(),
                expected: declared,
            }));
        }
    }

    let name = variable_node.name.clone();
    if ast.has_flag(Flag::Assign) {
        next_state.scope.borrow_mut().initialize(name, value.clone(), false, false, false)?;
    } else {
        if let Some(existing) = farey_scope::get(&next_state.scope, &name) {
            if !equals(&existing.spec, &value.spec) {
                return Err(InterpError::TypeMismatch(TypeMismatchError {
                    got: value.spec.clone(),
                    expected: existing.spec.clone(),
                }));
            }
        }
        farey_scope::set(&next_state.scope, &name, value.clone())?;
    }

    Ok((value, next_state))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use farey_common::{Token, TokenKind};
    use farey_ops::with_builtins;

    use super::*;

    fn lit(kind: &'static str, kw: TokenKind, text: &str) -> Rc<Node> {
        Rc::new(Node::new(kind, Some(Token::new(text, kw, 0, 0, 0))).with_flag(Flag::Literal))
    }

    fn int_lit(text: &str) -> Rc<Node> {
        lit("Integer", TokenKind::Integer, text)
    }

    fn var(name: &str) -> Rc<Node> {
        Rc::new(Node::new(name, Some(Token::new(name, TokenKind::Variable, 0, 0, 0))).with_flag(Flag::Variable))
    }

    fn assign_node(flag: Flag, variable: Rc<Node>, value: Rc<Node>) -> Rc<Node> {
        let name = if flag == Flag::Assign { ":=" } else { "=" };
        Rc::new(
            Node::new(name, None)
                .with_flag(flag)
                .with_param(variable.clone())
                .with_param(value.clone())
                .with_named_param("variable", variable)
                .with_named_param("value", value),
        )
    }

    fn block(stmts: Vec<Rc<Node>>) -> Rc<Node> {
        Rc::new(Node::new("", None).with_flag(Flag::Statements).with_flag(Flag::Block).with_params(stmts))
    }

    fn statements(stmts: Vec<Rc<Node>>) -> Rc<Node> {
        Rc::new(Node::new("", None).with_flag(Flag::Statements).with_params(stmts))
    }

    #[test]
    fn integer_addition_evaluates() {
        let ops = with_builtins();
        let ast = Node::new("+", None).with_params(vec![int_lit("2"), int_lit("3")]);
        let (value, _) = interpret(&ast, &State::root(), &ops).unwrap();
        assert_eq!(value, Value::int(5));
    }

    #[test]
    fn string_repeat_with_negative_count_evaluates() {
        let ops = with_builtins();
        let ast = Node::new("*", None).with_params(vec![
            lit("String", TokenKind::String, "ab"),
            Rc::new(Node::new("-", None).with_param(int_lit("3"))),
        ]);
        let (value, _) = interpret(&ast, &State::root(), &ops).unwrap();
        assert_eq!(value, Value::string("bababa"));
    }

    #[test]
    fn nested_block_assign_does_not_leak_outward() {
        let ops = with_builtins();
        let ast = statements(vec![
            assign_node(Flag::Assign, var("a"), int_lit("2")),
            block(vec![assign_node(Flag::Assign, var("a"), int_lit("3"))]),
        ]);
        let (_, final_state) = interpret(&ast, &State::root(), &ops).unwrap();
        assert_eq!(farey_scope::get(&final_state.scope, "a"), Some(Value::int(2)));
    }

    #[test]
    fn nested_block_reassign_mutates_outer_scope() {
        let ops = with_builtins();
        let ast = statements(vec![
            assign_node(Flag::Assign, var("a"), int_lit("2")),
            block(vec![assign_node(Flag::Reassign, var("a"), int_lit("3"))]),
        ]);
        let (_, final_state) = interpret(&ast, &State::root(), &ops).unwrap();
        assert_eq!(farey_scope::get(&final_state.scope, "a"), Some(Value::int(3)));
    }

    #[test]
    fn typed_assign_mismatch_raises_type_mismatch_error() {
        let ops = with_builtins();
        let variable = var("a");
        let value = int_lit("2");
        let type_node = Rc::new(Node::new("Float", None).with_flag(Flag::TypeLiteral));
        let ast = Node::new(":=", None)
            .with_flag(Flag::Assign)
            .with_param(variable.clone())
            .with_param(value.clone())
            .with_named_param("variable", variable)
            .with_named_param("value", value)
            .with_named_param("type", type_node);
        let err = interpret(&ast, &State::root(), &ops).unwrap_err();
        match err {
            InterpError::TypeMismatch(e) => {
                assert_eq!(e.got, Type::Atom("Int".into()));
                assert_eq!(e.expected, Type::Atom("Float".into()));
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_variable_is_a_scope_error() {
        let ops = with_builtins();
        let ast = Node::new("missing", Some(Token::new("missing", TokenKind::Variable, 0, 0, 0))).with_flag(Flag::Variable);
        let err = interpret(&ast, &State::root(), &ops).unwrap_err();
        assert!(matches!(err, InterpError::Scope(farey_scope::ScopeError::NotFound(_))));
    }

    #[test]
    fn signature_mismatch_propagates_as_signature_error() {
        let ops = with_builtins();
        let ast = Node::new("+", None).with_params(vec![int_lit("2"), lit("String", TokenKind::String, "3")]);
        let err = interpret(&ast, &State::root(), &ops).unwrap_err();
        assert!(matches!(err, InterpError::Signature(_)));
    }

    #[test]
    fn signature_error_suggests_unquoting_a_digit_string() {
        // `2 + '3'`: quoting the Int side (`Add(String, String)`) also
        // dispatches, so both positions independently surface a Delta --
        // this only asserts the unquoting one, "replace '3' with 3", is
        // among them.
        let ops = with_builtins();
        let string_arg = Rc::new(
            Node::new("String", Some(Token::new("3", TokenKind::String, 1, 4, 4))).with_flag(Flag::Literal),
        );
        let ast = Node::new("+", None).with_params(vec![int_lit("2"), string_arg]);
        let err = interpret(&ast, &State::root(), &ops).unwrap_err();
        match err {
            InterpError::Signature(sig) => {
                let unquote = sig
                    .deltas
                    .iter()
                    .find(|d| d.char_position == 4)
                    .expect("expected a delta at the string literal's position");
                assert_eq!(unquote.replacement, "3");
            }
            other => panic!("expected a SignatureError, got {other:?}"),
        }
    }

    #[test]
    fn group_unwraps_to_its_sole_child() {
        let ops = with_builtins();
        let ast = Node::new("Group", None).with_flag(Flag::Group).with_param(int_lit("5"));
        let (value, _) = interpret(&ast, &State::root(), &ops).unwrap();
        assert_eq!(value, Value::int(5));
    }

    #[test]
    fn empty_statements_evaluate_to_the_empty_tuple() {
        let ops = with_builtins();
        let ast = statements(vec![]);
        let (value, _) = interpret(&ast, &State::root(), &ops).unwrap();
        assert_eq!(value, Value::tuple(Vec::new()));
    }
}
