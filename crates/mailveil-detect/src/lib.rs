//! Candidate detectors.
//!
//! Every detector scans the original document and reports spans against
//! it; none of them sees another's output. `DetectorSet` runs them (in
//! sequence or over the rayon pool) and merges their candidates and
//! protected phrases for the resolver.

pub mod heuristic;
pub mod patterns;
pub mod recognizer;
pub mod salutation;
pub mod set;
pub mod signature;

pub use heuristic::HeuristicRecognizer;
pub use patterns::{AttachmentDetector, EmailDetector, PhoneDetector, UrlDetector};
pub use recognizer::{EntityRecognizer, RecognizedEntity, RecognizerDetector};
pub use salutation::SalutationDetector;
pub use set::{Candidates, DetectorSet, SupplementKey};
pub use signature::SignatureDetector;

use mailveil_core::{DetectorId, EntityLabel, Result, Span};

/// Output of one detector run.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub spans: Vec<Span>,
    /// Literal phrases that must never be masked.
    pub protected: Vec<String>,
}

impl Detection {
    pub fn from_spans(spans: Vec<Span>) -> Self {
        Self {
            spans,
            protected: Vec::new(),
        }
    }
}

/// A producer of candidate spans.
pub trait Detector: Send + Sync {
    fn id(&self) -> DetectorId;

    /// Scan `text` and report candidates with offsets into it.
    fn detect(&self, text: &str) -> Result<Detection>;

    /// Supplemental detectors only contribute spans no primary detector
    /// already found.
    fn is_supplemental(&self) -> bool {
        false
    }
}

/// Span for a regex match. Offsets come straight from the match, so the
/// span is valid unless the match was empty; the resolver drops those.
pub(crate) fn span_from_match(m: regex::Match<'_>, label: EntityLabel, source: DetectorId) -> Span {
    Span {
        text: m.as_str().to_string(),
        start: m.start(),
        end: m.end(),
        label,
        source,
        variant: None,
    }
}
