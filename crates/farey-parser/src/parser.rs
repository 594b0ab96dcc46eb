//! The Top-Down Operator Precedence (Pratt) parser: consumes a lazy token
//! stream and emits [`Node`]s, driven entirely by the [`OperatorTable`].

use std::rc::Rc;

use farey_ast::{Flag, Node};
use farey_common::{Span, Token, TokenKind};
use farey_lexer::Tokenizer;

use crate::error::ParseError;
use crate::operator::{default_operator_table, BraceKind, OperatorBehavior, OperatorTable, EPSILON};

fn span_of(token: &Token) -> Span {
    let len = token.text.chars().count() as u32;
    Span::new(token.char_position, token.char_position + len)
}

/// A token bound to the behavior the operator table assigns it. This is
/// the unit the parser's rewind buffer stores -- re-deriving it from a
/// raw `Token` would mean threading the table through every call site.
#[derive(Debug, Clone)]
struct BoundOperator {
    token: Token,
    behavior: OperatorBehavior,
}

impl BoundOperator {
    fn is_end(&self) -> bool {
        matches!(self.behavior, OperatorBehavior::End)
    }

    fn is_newline(&self) -> bool {
        matches!(self.behavior, OperatorBehavior::Dummy) && self.token.kind == TokenKind::Newline
    }

    fn text_is(&self, text: &str) -> bool {
        self.token.text == text
    }
}

/// The brace-scanning state machine: `Leading` before
/// an element has been parsed, `AfterExpression` once one has.
enum CommaState {
    Leading,
    AfterExpression,
}

pub struct Parser {
    tokenizer: Tokenizer,
    table: OperatorTable,
    /// The rewind buffer: every operator produced so far, plus a cursor
    /// into it. `next_operator` either replays from here or binds a
    /// fresh token and appends; `rewind` only moves the cursor back.
    produced: Vec<BoundOperator>,
    cursor: usize,
    /// Position of the last real token seen, used as the synthetic
    /// `End` operator's span once the tokenizer is exhausted.
    tail_pos: u32,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            table: default_operator_table(),
            produced: Vec::new(),
            cursor: 0,
            tail_pos: 0,
        }
    }

    /// Parse the entire input as a top-level statement list.
    pub fn parse(&mut self) -> Result<Rc<Node>, ParseError> {
        let stmts = self.statements(None)?;
        Ok(Rc::new(stmts))
    }

    fn bind_next(&mut self) -> Result<BoundOperator, ParseError> {
        match self
            .tokenizer
            .next_token()
            .map_err(|e| ParseError::new(format!("{e}"), Span::new(e.position, e.position + 1)))?
        {
            Some(token) => {
                self.tail_pos = token.char_position + token.text.chars().count() as u32;
                match self.table.behavior_for(&token.text, token.kind) {
                    Some(behavior) => Ok(BoundOperator {
                        behavior: behavior.clone(),
                        token,
                    }),
                    None => Err(ParseError::new(format!("unexpected token `{}`", token.text), span_of(&token))),
                }
            }
            None => Ok(BoundOperator {
                token: Token::new("", TokenKind::Newline, 0, 0, self.tail_pos),
                behavior: OperatorBehavior::End,
            }),
        }
    }

    fn next_operator(&mut self) -> Result<BoundOperator, ParseError> {
        if self.cursor < self.produced.len() {
            let op = self.produced[self.cursor].clone();
            self.cursor += 1;
            return Ok(op);
        }
        let op = self.bind_next()?;
        self.produced.push(op.clone());
        self.cursor += 1;
        Ok(op)
    }

    fn rewind(&mut self) {
        self.cursor -= 1;
    }

    fn peek(&mut self) -> Result<BoundOperator, ParseError> {
        let op = self.next_operator()?;
        self.rewind();
        Ok(op)
    }

    /// `expression(rbp)`: prefix, then climb while the
    /// next operator binds tighter than `rbp`.
    fn expression(&mut self, rbp: f64) -> Result<Node, ParseError> {
        let op = self.next_operator()?;
        let mut left = self.prefix(op)?;
        loop {
            let cur = self.peek()?;
            if rbp >= cur.behavior.left_binding_power() {
                break;
            }
            let cur = self.next_operator()?;
            left = self.infix(cur, left)?;
        }
        Ok(left)
    }

    fn prefix(&mut self, op: BoundOperator) -> Result<Node, ParseError> {
        match op.behavior.clone() {
            OperatorBehavior::Value { ast_name } => self.prefix_value(op, ast_name),
            OperatorBehavior::Simple {
                unary: Some((ulbp, uname)),
                ..
            } => {
                let operand = self.expression(ulbp)?;
                Ok(Node::new(uname, Some(op.token)).with_param(Rc::new(operand)))
            }
            OperatorBehavior::Simple { ast_name, .. } => {
                Err(ParseError::new(format!("`{ast_name}` has no prefix use"), span_of(&op.token)))
            }
            OperatorBehavior::Brace { close, kind } => self.parse_brace(op, close, kind),
            OperatorBehavior::Dummy => Err(ParseError::new(format!("unexpected `{}`", op.token.text), span_of(&op.token))),
            OperatorBehavior::End => Err(ParseError::new("unexpected end of input, expected an expression", span_of(&op.token))),
        }
    }

    fn prefix_value(&mut self, op: BoundOperator, ast_name: &'static str) -> Result<Node, ParseError> {
        match ast_name {
            "Integer" | "Float" | "String" => Ok(Node::new(ast_name, Some(op.token)).with_flag(Flag::Literal)),
            "Type" => Ok(Node::new(op.token.text.clone(), Some(op.token)).with_flag(Flag::TypeLiteral)),
            "Variable" => {
                let mut node = Node::new(op.token.text.clone(), Some(op.token)).with_flag(Flag::Variable);
                let next = self.peek()?;
                if next.token.kind == TokenKind::Type {
                    let type_op = self.next_operator()?;
                    let type_node = Rc::new(Node::new(type_op.token.text.clone(), Some(type_op.token)).with_flag(Flag::TypeLiteral));
                    node = node.with_named_param("type", type_node);
                }
                Ok(node)
            }
            other => unreachable!("operator table registered an unknown Value ast_name: {other}"),
        }
    }

    fn infix(&mut self, op: BoundOperator, left: Node) -> Result<Node, ParseError> {
        match op.behavior.clone() {
            OperatorBehavior::Simple {
                lbp,
                ast_name,
                right_associative,
                ..
            } => {
                let rhs_rbp = if right_associative { lbp - EPSILON } else { lbp };
                let rhs = self.expression(rhs_rbp)?;
                match ast_name {
                    ":=" => Ok(build_assign(op.token, left, rhs, Flag::Assign)),
                    "=" => Ok(build_assign(op.token, left, rhs, Flag::Reassign)),
                    name => Ok(Node::new(name, Some(op.token)).with_params(vec![Rc::new(left), Rc::new(rhs)])),
                }
            }
            _ => Err(ParseError::new(format!("`{}` is not an infix operator here", op.token.text), span_of(&op.token))),
        }
    }

    fn parse_brace(&mut self, open: BoundOperator, close: &'static str, kind: BraceKind) -> Result<Node, ParseError> {
        match kind {
            BraceKind::Block => {
                let mut node = self.statements(Some(close))?;
                self.expect_close(close, &open)?;
                node.flags.push(Flag::Block);
                node.token = Some(open.token);
                Ok(node)
            }
            BraceKind::Array => {
                let (_, params) = self.consume_commas_until(close, &open)?;
                Ok(Node::new("Array", Some(open.token)).with_params(params.into_iter().map(Rc::new)))
            }
            BraceKind::GroupOrTuple => {
                let (commas, mut params) = self.consume_commas_until(close, &open)?;
                if commas == 0 && params.len() <= 1 {
                    if let Some(single) = params.pop() {
                        Ok(Node::new("Group", Some(open.token)).with_flag(Flag::Group).with_param(Rc::new(single)))
                    } else {
                        Ok(Node::new("Tuple", Some(open.token)))
                    }
                } else {
                    Ok(Node::new("Tuple", Some(open.token)).with_params(params.into_iter().map(Rc::new)))
                }
            }
        }
    }

    fn expect_close(&mut self, close: &str, open: &BoundOperator) -> Result<(), ParseError> {
        let cur = self.next_operator()?;
        if cur.text_is(close) {
            return Ok(());
        }
        if cur.is_end() {
            return Err(ParseError::new(format!("unmatched `{}`", open.token.text), span_of(&cur.token))
                .with_related(span_of(&open.token)));
        }
        Err(ParseError::new(format!("expected `{close}`, found `{}`", cur.token.text), span_of(&cur.token))
            .with_related(span_of(&open.token)))
    }

    /// The brace-scanning state machine: returns the
    /// number of commas seen and the parsed elements, leaving the
    /// closing token consumed.
    fn consume_commas_until(&mut self, close: &str, open: &BoundOperator) -> Result<(u32, Vec<Node>), ParseError> {
        let mut state = CommaState::Leading;
        let mut commas = 0u32;
        let mut params = Vec::new();
        loop {
            match state {
                CommaState::Leading => {
                    let cur = self.peek()?;
                    if cur.text_is(close) {
                        self.next_operator()?;
                        break;
                    }
                    if cur.is_end() {
                        return Err(ParseError::new(format!("unmatched `{}`", open.token.text), span_of(&cur.token))
                            .with_related(span_of(&open.token)));
                    }
                    params.push(self.expression(0.0)?);
                    state = CommaState::AfterExpression;
                }
                CommaState::AfterExpression => {
                    let cur = self.peek()?;
                    if cur.text_is(close) {
                        self.next_operator()?;
                        break;
                    }
                    if cur.text_is(",") {
                        self.next_operator()?;
                        commas += 1;
                        state = CommaState::Leading;
                        continue;
                    }
                    if cur.is_end() {
                        return Err(ParseError::new(format!("unmatched `{}`", open.token.text), span_of(&cur.token))
                            .with_related(span_of(&open.token)));
                    }
                    return Err(ParseError::new(
                        format!("expected `,` or `{close}`, found `{}`", cur.token.text),
                        span_of(&cur.token),
                    )
                    .with_related(span_of(&open.token)));
                }
            }
        }
        Ok((commas, params))
    }

    fn skip_newlines(&mut self) -> Result<(), ParseError> {
        loop {
            let cur = self.peek()?;
            if cur.is_newline() {
                self.next_operator()?;
            } else {
                return Ok(());
            }
        }
    }

    /// One statement: an expression followed by a newline or end of
    /// input, with any further blank newlines discarded.
    fn statement(&mut self) -> Result<Node, ParseError> {
        let expr = self.expression(0.0)?;
        let terminator = self.peek()?;
        if terminator.is_end() {
            return Ok(expr);
        }
        if !terminator.is_newline() {
            return Err(ParseError::new(
                format!("expected a newline after the statement, found `{}`", terminator.token.text),
                span_of(&terminator.token),
            ));
        }
        self.next_operator()?;
        self.skip_newlines()?;
        Ok(expr)
    }

    /// A sequence of statements, stopping at `close` (if given, text
    /// compared against the current token without consuming it) or at
    /// end of input.
    fn statements(&mut self, close: Option<&str>) -> Result<Node, ParseError> {
        let mut params = Vec::new();
        self.skip_newlines()?;
        loop {
            let cur = self.peek()?;
            if cur.is_end() {
                break;
            }
            if let Some(close) = close {
                if cur.text_is(close) {
                    break;
                }
            }
            params.push(Rc::new(self.statement()?));
            self.skip_newlines()?;
        }
        Ok(Node::new("", None).with_flag(Flag::Statements).with_params(params))
    }
}

fn build_assign(token: Token, left: Node, rhs: Node, flag: Flag) -> Node {
    let type_annotation = left.named_param("type").cloned();
    let left_rc = Rc::new(left);
    let rhs_rc = Rc::new(rhs);
    let mut node = Node::new(if flag == Flag::Assign { ":=" } else { "=" }, Some(token))
        .with_flag(flag)
        .with_param(Rc::clone(&left_rc))
        .with_param(Rc::clone(&rhs_rc))
        .with_named_param("variable", left_rc)
        .with_named_param("value", rhs_rc);
    if let Some(type_node) = type_annotation {
        node = node.with_named_param("type", type_node);
    }
    node
}

/// Parse `source` as a complete program: a top-level statement list.
pub fn parse(source: &str) -> Result<Rc<Node>, ParseError> {
    Parser::new(source).parse()
}
