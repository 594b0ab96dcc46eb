use regex::Regex;

use farey_common::TokenKind;

/// How a [`Pattern`] recognizes text at the cursor.
pub enum Matcher {
    /// Matched via a regex anchored to the start of the remaining input.
    Regex(Regex),
    /// Matched via an exact prefix comparison.
    Literal(&'static str),
}

/// One entry of the tokenizer's pattern table: how to recognize a lexeme,
/// what [`TokenKind`] it produces (which may depend on the matched text,
/// e.g. to distinguish a keyword from an ordinary identifier), and how to
/// turn the raw match into the token's stored text (e.g. stripping a
/// string literal's quotes).
pub struct Pattern {
    matcher: Matcher,
    pub kind_fn: Box<dyn Fn(&str) -> TokenKind>,
    pub text_fn: fn(&str) -> String,
}

impl Matcher {
    /// The number of chars this matcher recognizes at the start of
    /// `remaining`, or `None` if it doesn't match there at all.
    pub fn match_len(&self, remaining: &str) -> Option<usize> {
        match self {
            Matcher::Regex(re) => re.find(remaining).map(|m| remaining[..m.end()].chars().count()),
            Matcher::Literal(lit) => {
                if remaining.starts_with(lit) {
                    Some(lit.chars().count())
                } else {
                    None
                }
            }
        }
    }
}

impl Pattern {
    fn regex(pattern: &str, kind_fn: fn(&str) -> TokenKind, text_fn: fn(&str) -> String) -> Self {
        let anchored = format!("^(?:{pattern})");
        Self {
            matcher: Matcher::Regex(Regex::new(&anchored).expect("pattern table regex is valid")),
            kind_fn: Box::new(kind_fn),
            text_fn,
        }
    }

    fn literal(text: &'static str, kind: TokenKind) -> Self {
        Self {
            matcher: Matcher::Literal(text),
            kind_fn: Box::new(move |_| kind),
            text_fn: identity_text,
        }
    }

    /// The number of chars this pattern matches at the start of
    /// `remaining`, or `None` if it doesn't match there at all.
    pub fn match_len(&self, remaining: &str) -> Option<usize> {
        self.matcher.match_len(remaining)
    }
}

fn identity_text(raw: &str) -> String {
    raw.to_string()
}

fn strip_quotes(raw: &str) -> String {
    raw.chars().skip(1).take(raw.chars().count().saturating_sub(2)).collect()
}

fn variable_or_keyword(raw: &str) -> TokenKind {
    match raw {
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        _ => TokenKind::Variable,
    }
}

/// Horizontal whitespace the tokenizer skips without producing a token.
/// A literal newline is *not* whitespace here -- it's a significant
/// [`TokenKind::Newline`] token, handled in [`token_patterns`]. A
/// backslash immediately before a newline is a line continuation: it and
/// the newline it escapes are absorbed here instead of becoming the
/// `Newline` token a bare newline would.
pub fn whitespace_patterns() -> Vec<Matcher> {
    vec![
        Matcher::Regex(Regex::new(r"^[ \t]+").expect("whitespace regex is valid")),
        Matcher::Regex(Regex::new(r"^\\\n").expect("line continuation regex is valid")),
    ]
}

/// The ordered token table. Entries earlier in the list win ties, so
/// longer operators are listed before the single-char operators they
/// prefix, and `Float` is listed before `Integer` so `4.2` isn't lexed as
/// `4` followed by a stray `.2`.
pub fn token_patterns() -> Vec<Pattern> {
    vec![
        Pattern::regex(r"[0-9]+\.[0-9]+", |_| TokenKind::Float, identity_text),
        Pattern::regex(r"[0-9]+", |_| TokenKind::Integer, identity_text),
        Pattern::regex(r"'[^']*'", |_| TokenKind::String, strip_quotes),
        Pattern::literal("..", TokenKind::Range),
        Pattern::regex(r"\*\*|//|:=|[+\-*/=]", |_| TokenKind::Operation, identity_text),
        Pattern::regex(r"\n[ \t]*|;", |_| TokenKind::Newline, identity_text),
        Pattern::regex("[a-z_][a-zA-Z0-9_]*", variable_or_keyword, identity_text),
        Pattern::regex("[A-Z][a-zA-Z0-9_]*", |_| TokenKind::Type, identity_text),
        Pattern::regex(r"[()]", |_| TokenKind::Parenthesis, identity_text),
        Pattern::regex(r"[{}]", |_| TokenKind::CurlyBrace, identity_text),
        Pattern::regex(r"[\[\]]", |_| TokenKind::SquareBracket, identity_text),
        Pattern::literal(",", TokenKind::Comma),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_pattern_beats_integer_on_a_dotted_number() {
        let patterns = token_patterns();
        let float_pattern = &patterns[0];
        assert_eq!(float_pattern.match_len("4.2"), Some(3));
    }

    #[test]
    fn strip_quotes_removes_only_the_outer_pair() {
        assert_eq!(strip_quotes("'ab'"), "ab");
    }

    #[test]
    fn keyword_detection() {
        assert_eq!(variable_or_keyword("for"), TokenKind::For);
        assert_eq!(variable_or_keyword("in"), TokenKind::In);
        assert_eq!(variable_or_keyword("info"), TokenKind::Variable);
    }
}
