//! Candidate and resolved sensitive regions.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::label::EntityLabel;

/// Name of the detector that produced a span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectorId(Cow<'static, str>);

impl DetectorId {
    pub const RECOGNIZER: DetectorId = DetectorId(Cow::Borrowed("recognizer"));
    pub const EMAIL: DetectorId = DetectorId(Cow::Borrowed("email"));
    pub const PHONE: DetectorId = DetectorId(Cow::Borrowed("phone"));
    pub const URL: DetectorId = DetectorId(Cow::Borrowed("url"));
    pub const ATTACHMENT: DetectorId = DetectorId(Cow::Borrowed("attachment"));
    pub const SALUTATION: DetectorId = DetectorId(Cow::Borrowed("salutation"));
    pub const SIGNATURE: DetectorId = DetectorId(Cow::Borrowed("signature"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DetectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sensitive region of one document.
///
/// Offsets are UTF-8 byte offsets into the original document, `end`
/// exclusive. Every detector reports against the same unmodified text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub label: EntityLabel,
    pub source: DetectorId,
    /// Detector sub-variant (e.g. which phone pattern matched). Spans with a
    /// variant get `[LABEL_variant_n]` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<u32>,
}

impl Span {
    /// Build a span from offsets, slicing its text out of `document`.
    pub fn from_offsets(
        document: &str,
        start: usize,
        end: usize,
        label: EntityLabel,
        source: DetectorId,
    ) -> Result<Self> {
        let text = document
            .get(start..end)
            .ok_or(Error::InvalidSpan {
                start,
                end,
                len: document.len(),
                reason: "offsets out of bounds or not on a char boundary",
            })?
            .to_string();
        let span = Self {
            text,
            start,
            end,
            label,
            source,
            variant: None,
        };
        span.validate(document)?;
        Ok(span)
    }

    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Length of the surface text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Half-open interval overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Check `0 <= start < end <= len` and that the text matches the document.
    pub fn validate(&self, document: &str) -> Result<()> {
        let invalid = |reason| Error::InvalidSpan {
            start: self.start,
            end: self.end,
            len: document.len(),
            reason,
        };
        if self.start >= self.end {
            return Err(invalid("zero-length or inverted span"));
        }
        match document.get(self.start..self.end) {
            None => Err(invalid("offsets out of bounds or not on a char boundary")),
            Some(slice) if slice != self.text => Err(invalid("surface text does not match document")),
            Some(_) => Ok(()),
        }
    }
}
