use std::fmt;

use farey_common::Span;

/// A failure to parse: an unexpected token, a missing closing brace, or an
/// operator used in a position it has no handler for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// A second span for "opened here"-style context, e.g. the `(` an
    /// unmatched `)` was supposed to close.
    pub related: Option<Span>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            related: None,
        }
    }

    pub fn with_related(mut self, related: Span) -> Self {
        self.related = Some(related);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {}..{})", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}
