//! Span conflict resolution: longest candidate wins, overlaps are rejected.

use serde::Serialize;
use tracing::{debug, warn};

use mailveil_core::Span;

pub const REASON_OVERLAP: &str = "overlaps accepted span";
pub const REASON_PROTECTED: &str = "protected phrase";
pub const REASON_INVALID: &str = "invalid span";

/// A candidate the resolver skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub span: Span,
    pub reason: &'static str,
}

/// Overlap-free selection ordered by start offset, plus what was skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub accepted: Vec<Span>,
    pub rejected: Vec<Rejection>,
}

/// Resolve `candidates` (in detection order) against `document`.
///
/// Invalid spans are dropped with a warning. Candidates whose text equals a
/// protected phrase are discarded. The rest are taken longest first, ties in
/// detection order, and kept only when they overlap nothing already kept.
pub fn resolve(candidates: Vec<Span>, protected: &[String], document: &str) -> Resolution {
    let mut rejected = Vec::new();
    let mut eligible = Vec::with_capacity(candidates.len());

    for span in candidates {
        if let Err(e) = span.validate(document) {
            warn!("Dropping span from {}: {}", span.source, e);
            rejected.push(Rejection {
                span,
                reason: REASON_INVALID,
            });
            continue;
        }
        if protected.iter().any(|p| *p == span.text) {
            rejected.push(Rejection {
                span,
                reason: REASON_PROTECTED,
            });
            continue;
        }
        eligible.push(span);
    }

    // stable: equal lengths keep detection order
    eligible.sort_by(|a, b| b.char_len().cmp(&a.char_len()));

    let mut accepted: Vec<Span> = Vec::with_capacity(eligible.len());
    for span in eligible {
        if accepted.iter().any(|a| a.overlaps(&span)) {
            debug!(
                "Rejected {} [{}, {}) from {}: overlap",
                span.label, span.start, span.end, span.source
            );
            rejected.push(Rejection {
                span,
                reason: REASON_OVERLAP,
            });
        } else {
            accepted.push(span);
        }
    }
    accepted.sort_by_key(|s| s.start);

    debug!("Resolved {} spans, rejected {}", accepted.len(), rejected.len());
    Resolution { accepted, rejected }
}
