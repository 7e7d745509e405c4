//! Placeholder substitution
//!
//! Rewrites a text by replacing each accepted span with `<LABEL>`. Everything
//! outside the spans is copied through byte for byte, in order.

use crate::anonymization::models::{CandidateSpan, EntityCategory};

/// Placeholder token for a category, e.g. `<PERSON>`
pub fn placeholder(category: EntityCategory) -> String {
    format!("<{}>", category.label())
}

/// Byte length of the output [`substitute`] will produce
pub fn substituted_len(text: &str, spans: &[CandidateSpan]) -> usize {
    let removed: usize = spans.iter().map(CandidateSpan::len).sum();
    let added: usize = spans.iter().map(|s| s.category.label().len() + 2).sum();
    text.len() + added - removed
}

/// Replace each span in `text` with its placeholder
///
/// # Panics
///
/// Panics if `spans` are not sorted by start, overlap, fall outside `text`,
/// or split a UTF-8 character. Spans produced by
/// [`resolve_in`](crate::anonymization::resolver::resolve_in) always satisfy
/// this.
pub fn substitute(text: &str, spans: &[CandidateSpan]) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for span in spans {
        assert!(
            span.start >= cursor,
            "substitution spans must be sorted and non-overlapping: span {}..{} starts before offset {}",
            span.start,
            span.end,
            cursor
        );
        assert!(
            span.fits(text),
            "substitution span {}..{} is not addressable in a text of {} bytes",
            span.start,
            span.end,
            text.len()
        );

        output.push_str(&text[cursor..span.start]);
        output.push('<');
        output.push_str(span.category.label());
        output.push('>');
        cursor = span.end;
    }

    output.push_str(&text[cursor..]);
    output
}
