//! A pattern-table tokenizer: whitespace and token patterns are ordered
//! lists tried top to bottom at the cursor's current position, rather
//! than a single hand-written `match` over the next character. This
//! keeps the lexical grammar declarative and lets the Language's small
//! vocabulary (no comments, no string interpolation, two keywords) read
//! as a short table instead of a sprawling state machine.

mod cursor;
mod pattern;

pub use pattern::{Matcher, Pattern};

use std::fmt;

use farey_common::{Token, TokenKind};

use cursor::Cursor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerError {
    pub position: u32,
    pub snippet: String,
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized input at position {}: {:?}",
            self.position, self.snippet
        )
    }
}

impl std::error::Error for TokenizerError {}

/// A saved cursor/line position, returned by [`Tokenizer::checkpoint`]
/// and restored by [`Tokenizer::restore`]. The parser uses this to
/// backtrack when a speculative parse fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: u32,
    line_number: u32,
    line_start: u32,
}

/// Produces [`Token`]s from source text by repeatedly trying the
/// whitespace table, then the token table, at the cursor's current
/// position.
pub struct Tokenizer {
    cursor: Cursor,
    whitespace_patterns: Vec<Matcher>,
    token_patterns: Vec<Pattern>,
    line_number: u32,
    line_start: u32,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            cursor: Cursor::new(source),
            whitespace_patterns: pattern::whitespace_patterns(),
            token_patterns: pattern::token_patterns(),
            line_number: 1,
            line_start: 0,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.cursor.pos(),
            line_number: self.line_number,
            line_start: self.line_start,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor.set_pos(checkpoint.pos);
        self.line_number = checkpoint.line_number;
        self.line_start = checkpoint.line_start;
    }

    /// Skip every leading whitespace pattern (but never a newline, which
    /// is a real token).
    fn skip_whitespace(&mut self) {
        loop {
            let remaining = self.cursor.remaining();
            let Some(matched_len) = self.whitespace_patterns.iter().find_map(|m| m.match_len(&remaining)) else {
                return;
            };
            if matched_len == 0 {
                return;
            }
            let start = self.cursor.pos();
            let raw: Vec<char> = remaining.chars().take(matched_len).collect();
            for _ in 0..matched_len {
                self.cursor.advance();
            }
            if let Some(last_newline_idx) = raw.iter().rposition(|&c| c == '\n') {
                self.line_number += raw.iter().filter(|&&c| c == '\n').count() as u32;
                self.line_start = start + last_newline_idx as u32 + 1;
            }
        }
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizerError> {
        self.skip_whitespace();
        if self.cursor.is_eof() {
            return Ok(None);
        }

        let start = self.cursor.pos();
        let remaining = self.cursor.remaining();

        for pattern in &self.token_patterns {
            let Some(matched_len) = pattern.match_len(&remaining) else {
                continue;
            };
            if matched_len == 0 {
                continue;
            }
            let raw: String = remaining.chars().take(matched_len).collect();
            for _ in 0..matched_len {
                self.cursor.advance();
            }

            let line_number = self.line_number;
            let line_position = start - self.line_start;
            let kind = (pattern.kind_fn)(&raw);
            let text = (pattern.text_fn)(&raw);

            let raw_chars: Vec<char> = raw.chars().collect();
            if let Some(last_newline_idx) = raw_chars.iter().rposition(|&c| c == '\n') {
                self.line_number += raw_chars.iter().filter(|&&c| c == '\n').count() as u32;
                self.line_start = start + last_newline_idx as u32 + 1;
            }

            return Ok(Some(Token::new(text, kind, line_number, line_position, start)));
        }

        Err(TokenizerError {
            position: start,
            snippet: remaining.chars().take(16).collect(),
        })
    }

    /// Tokenize the entire remaining input.
    pub fn tokenize_all(mut self) -> Result<Vec<Token>, TokenizerError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Tokenizer::new(src).tokenize_all().unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(src: &str) -> Vec<String> {
        Tokenizer::new(src).tokenize_all().unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert_eq!(kinds(""), Vec::<TokenKind>::new());
    }

    #[test]
    fn integer_and_float_are_distinguished() {
        assert_eq!(kinds("42"), vec![TokenKind::Integer]);
        assert_eq!(kinds("4.2"), vec![TokenKind::Float]);
    }

    #[test]
    fn string_literal_strips_quotes() {
        assert_eq!(texts("'hi'"), vec!["hi".to_string()]);
        assert_eq!(kinds("'hi'"), vec![TokenKind::String]);
    }

    #[test]
    fn line_continuation_is_absorbed_as_whitespace() {
        let toks = Tokenizer::new("x + \\\ny").tokenize_all().unwrap();
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[2].line_number, 2);
    }

    #[test]
    fn variable_vs_type_by_case() {
        assert_eq!(kinds("x"), vec![TokenKind::Variable]);
        assert_eq!(kinds("Int"), vec![TokenKind::Type]);
    }

    #[test]
    fn keywords_are_not_variables() {
        assert_eq!(kinds("for"), vec![TokenKind::For]);
        assert_eq!(kinds("in"), vec![TokenKind::In]);
        assert_eq!(kinds("format"), vec![TokenKind::Variable]);
    }

    #[test]
    fn operators_prefer_longest_match() {
        assert_eq!(texts("** // := = + - * /"), vec!["**", "//", ":=", "=", "+", "-", "*", "/"]);
    }

    #[test]
    fn range_is_its_own_token_not_two_dots() {
        assert_eq!(kinds("1..5"), vec![TokenKind::Integer, TokenKind::Range, TokenKind::Integer]);
    }

    #[test]
    fn newline_token_absorbs_trailing_horizontal_whitespace() {
        let toks = Tokenizer::new("x\n  y").tokenize_all().unwrap();
        assert_eq!(toks[1].kind, TokenKind::Newline);
        assert_eq!(toks[2].line_number, 2);
        assert_eq!(toks[2].line_position, 2);
    }

    #[test]
    fn semicolon_is_a_newline_token() {
        assert_eq!(kinds("x;y"), vec![TokenKind::Variable, TokenKind::Newline, TokenKind::Variable]);
    }

    #[test]
    fn whitespace_between_tokens_is_skipped_but_not_counted() {
        let toks = Tokenizer::new("x   +   y").tokenize_all().unwrap();
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[1].char_position, 4);
    }

    #[test]
    fn brackets_and_punctuation() {
        assert_eq!(
            kinds("(){}[],"),
            vec![
                TokenKind::Parenthesis,
                TokenKind::Parenthesis,
                TokenKind::CurlyBrace,
                TokenKind::CurlyBrace,
                TokenKind::SquareBracket,
                TokenKind::SquareBracket,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn unrecognized_input_errors_with_position() {
        let err = Tokenizer::new("x @ y").tokenize_all().unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn checkpoint_and_restore_rewind_line_tracking() {
        let mut tz = Tokenizer::new("x\ny");
        let first = tz.next_token().unwrap().unwrap();
        assert_eq!(first.kind, TokenKind::Variable);
        let cp = tz.checkpoint();
        let _newline = tz.next_token().unwrap().unwrap();
        let y = tz.next_token().unwrap().unwrap();
        assert_eq!(y.line_number, 2);
        tz.restore(cp);
        let replay = tz.next_token().unwrap().unwrap();
        assert_eq!(replay.kind, TokenKind::Newline);
    }
}
