//! Renders every error kind the pipeline can produce through `ariadne`:
//! one `Report` per error, labeled at the span it came from when one is
//! available.

use ariadne::{Label, Report, ReportKind, Source};

use farey_ir::TranslateError;
use farey_interp::InterpError;
use farey_lexer::TokenizerError;
use farey_ops::SignatureError;
use farey_parser::ParseError;

pub fn report_tokenizer_error(source: &str, error: &TokenizerError) {
    let start = error.position as usize;
    let end = start + error.snippet.chars().count().max(1);
    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
        .with_message("unrecognized input")
        .with_label(Label::new(start..end).with_message(error.to_string()))
        .finish()
        .eprint(Source::from(source));
}

pub fn report_parse_error(source: &str, error: &ParseError) {
    let start = error.span.start as usize;
    let end = (error.span.end as usize).max(start + 1);
    let mut report = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
        .with_message("parse error")
        .with_label(Label::new(start..end).with_message(&error.message));
    if let Some(related) = error.related {
        let rstart = related.start as usize;
        let rend = (related.end as usize).max(rstart + 1);
        report = report.with_label(Label::new(rstart..rend).with_message("related to this"));
    }
    let _ = report.finish().eprint(Source::from(source));
}

/// `TypeMismatchError` and the other `farey-ir` translation errors don't
/// carry a source span -- they're raised deep in the type-indexed
/// dispatch and translation logic, far from the token that introduced
/// the offending value -- so these render as a plain message rather
/// than a labeled report.
pub fn report_translate_error(error: &TranslateError) {
    eprintln!("error: {error}");
}

pub fn report_interp_error(source: &str, error: &InterpError) {
    match error {
        InterpError::Signature(e) => report_signature_error(source, e),
        InterpError::Scope(e) => eprintln!("error: {e}"),
        InterpError::TypeMismatch(e) => eprintln!("error: {e}"),
    }
}

/// A [`SignatureError`] carries zero or more [`farey_ops::Delta`]
/// substitution suggestions, each already located against the source by
/// `farey-interp`. When present they're rendered as a report note
/// ("consider: ...") rather than auto-applied; with none, this falls
/// back to the plain message.
fn report_signature_error(source: &str, error: &SignatureError) {
    if error.deltas.is_empty() {
        eprintln!("error: {error}");
        return;
    }
    let start = error.deltas[0].char_position as usize;
    let end = start + error.deltas[0].length.max(1) as usize;
    let note = error
        .deltas
        .iter()
        .map(|d| format!("replace with `{}`", d.replacement))
        .collect::<Vec<_>>()
        .join("; ");
    let mut report = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
        .with_message(error.to_string())
        .with_label(Label::new(start..end).with_message("no matching overload"));
    report = report.with_note(format!("consider: {note}"));
    let _ = report.finish().eprint(Source::from(source));
}
