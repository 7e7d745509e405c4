//! Span resolution
//!
//! Turns the union of every detector's candidates into one non-overlapping
//! selection by greedy interval scheduling in priority order:
//!
//! 1. drop malformed candidates (`start >= end`, non-finite score, and for
//!    [`resolve_in`] anything outside the text or off a char boundary);
//! 2. order by descending score, then descending length, then ascending
//!    start, then category label. Length is counted in characters when the
//!    text is known ([`resolve_in`]) and in bytes otherwise ([`resolve`]);
//! 3. accept a candidate iff it overlaps nothing accepted so far, never
//!    revisiting a decision;
//! 4. return the accepted spans in textual order.
//!
//! Greedy selection is not guaranteed to maximize total accepted score or
//! count; a weighted interval scheduling pass would dominate it if that ever
//! matters.
//!
//! Accepted spans are the input values moved through unchanged: nothing is
//! split, merged, or re-offset.

use crate::anonymization::models::CandidateSpan;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Why a candidate did not make it into the accepted set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Empty, inverted, non-finite score, or not addressable in the text
    Malformed,
    /// Lost to a higher-priority overlapping span
    Overlap,
}

/// Full result of a resolution pass
#[derive(Debug, Clone, Default)]
pub struct ResolutionOutcome {
    /// Non-overlapping spans sorted by start
    pub accepted: Vec<CandidateSpan>,
    /// Rejected candidates with the reason, in priority order for overlaps
    pub dropped: Vec<(CandidateSpan, DropReason)>,
}

impl ResolutionOutcome {
    pub fn dropped_count(&self, reason: DropReason) -> usize {
        self.dropped.iter().filter(|(_, r)| *r == reason).count()
    }
}

/// Resolve candidates without reference to a text
///
/// Only structural malformation is filtered and span length is measured in
/// bytes. Use [`resolve_in`] when the spans will be applied to a text.
pub fn resolve(candidates: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    resolve_with_outcome(candidates, CandidateSpan::is_well_formed).accepted
}

/// Resolve candidates for substitution into `text`
pub fn resolve_in(text: &str, candidates: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    resolve_outcome_in(text, candidates).accepted
}

/// Like [`resolve_in`], also reporting what was dropped and why
pub fn resolve_outcome_in(text: &str, candidates: Vec<CandidateSpan>) -> ResolutionOutcome {
    resolve_ranked(
        candidates,
        |span| span.fits(text),
        |span| text[span.start..span.end].chars().count(),
    )
}

/// Resolve using `is_valid` as the malformed-span filter, ranking length in bytes
pub fn resolve_with_outcome<F>(candidates: Vec<CandidateSpan>, is_valid: F) -> ResolutionOutcome
where
    F: Fn(&CandidateSpan) -> bool,
{
    resolve_ranked(candidates, is_valid, CandidateSpan::len)
}

/// Priority order: score desc, length desc, start asc, category asc
fn priority(a: &(usize, CandidateSpan), b: &(usize, CandidateSpan)) -> Ordering {
    let ((a_len, a), (b_len, b)) = (a, b);
    b.score
        .total_cmp(&a.score)
        .then_with(|| b_len.cmp(a_len))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.category.label().cmp(b.category.label()))
}

/// `length` is only called on spans that passed `is_valid`
fn resolve_ranked<F, L>(candidates: Vec<CandidateSpan>, is_valid: F, length: L) -> ResolutionOutcome
where
    F: Fn(&CandidateSpan) -> bool,
    L: Fn(&CandidateSpan) -> usize,
{
    let mut dropped = Vec::new();
    let mut ranked = Vec::with_capacity(candidates.len());
    for span in candidates {
        if is_valid(&span) {
            ranked.push((length(&span), span));
        } else {
            tracing::debug!(
                start = span.start,
                end = span.end,
                category = %span.category,
                recognizer = %span.recognizer,
                "Dropping malformed candidate span"
            );
            dropped.push((span, DropReason::Malformed));
        }
    }

    // Stable: fully identical candidates keep input order and the first wins
    ranked.sort_by(priority);

    // Accepted spans keyed by start. They are disjoint, so ends increase with
    // starts and only the last span starting before `end` can reach past `start`.
    let mut accepted: BTreeMap<usize, CandidateSpan> = BTreeMap::new();
    for (_, span) in ranked {
        let blocked = accepted
            .range(..span.end)
            .next_back()
            .is_some_and(|(_, kept)| kept.overlaps(&span));

        if blocked {
            dropped.push((span, DropReason::Overlap));
        } else {
            accepted.insert(span.start, span);
        }
    }

    ResolutionOutcome {
        accepted: accepted.into_values().collect(),
        dropped,
    }
}
