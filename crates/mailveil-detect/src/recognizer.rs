//! Entity recognizer contract and the detector that wraps it.
//!
//! The statistical recognizer itself lives outside this crate. Anything
//! implementing `EntityRecognizer` can be plugged in; `HeuristicRecognizer`
//! is the built-in fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Detection, Detector};
use mailveil_core::{DetectorId, Error, LabelRegistry, Result, Span};

/// Part-of-speech tags that disqualify an entity when they head it.
/// Universal tags plus their Penn Treebank counterparts.
const REJECTED_HEAD_TAGS: &[&str] = &["VERB", "AUX", "PRON", "MD", "PRP", "PRP$", "WP", "WP$"];

/// One entity reported by a recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    /// Byte offset into the document.
    pub start: usize,
    /// Byte offset, exclusive.
    pub end: usize,
    /// Recognizer's own tag, e.g. `ORG` or `GPE`.
    pub label: String,
    /// Per-token POS tags, if the recognizer exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_tags: Option<Vec<String>>,
}

impl RecognizedEntity {
    /// Build from code-point offsets, for recognizers that count characters
    /// rather than bytes. Returns `None` when the offsets fall outside the
    /// document.
    pub fn from_char_offsets(
        document: &str,
        char_start: usize,
        char_end: usize,
        label: impl Into<String>,
    ) -> Option<Self> {
        let byte_at = |idx: usize| {
            if idx == document.chars().count() {
                Some(document.len())
            } else {
                document.char_indices().nth(idx).map(|(b, _)| b)
            }
        };
        let start = byte_at(char_start)?;
        let end = byte_at(char_end)?;
        Some(Self {
            text: document.get(start..end)?.to_string(),
            start,
            end,
            label: label.into(),
            pos_tags: None,
        })
    }

    fn has_rejected_head(&self) -> bool {
        self.pos_tags
            .as_ref()
            .and_then(|tags| tags.first())
            .map(|head| {
                let head = head.to_ascii_uppercase();
                REJECTED_HEAD_TAGS.contains(&head.as_str()) || head.starts_with("VB")
            })
            .unwrap_or(false)
    }
}

/// A named-entity recognizer.
pub trait EntityRecognizer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Recognize entities in `document`. Offsets are UTF-8 byte offsets.
    fn recognize(&self, document: &str) -> Result<Vec<RecognizedEntity>>;
}

/// Detector that delegates to an `EntityRecognizer`.
///
/// Keeps only enabled labels and drops entities headed by a verb,
/// auxiliary or pronoun when POS tags are available.
pub struct RecognizerDetector {
    recognizer: Arc<dyn EntityRecognizer>,
    registry: Arc<LabelRegistry>,
}

impl RecognizerDetector {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, registry: Arc<LabelRegistry>) -> Self {
        Self {
            recognizer,
            registry,
        }
    }
}

impl Detector for RecognizerDetector {
    fn id(&self) -> DetectorId {
        DetectorId::RECOGNIZER
    }

    fn detect(&self, text: &str) -> Result<Detection> {
        let entities = self.recognizer.recognize(text).map_err(|e| match e {
            Error::RecognizerFailure(msg) => Error::RecognizerFailure(msg),
            other => Error::RecognizerFailure(format!("{}: {}", self.recognizer.name(), other)),
        })?;

        let mut spans = Vec::with_capacity(entities.len());
        for entity in entities {
            let label = self.registry.normalize(&entity.label);
            if !self.registry.is_enabled(&label) {
                continue;
            }
            if entity.has_rejected_head() {
                debug!(
                    "Dropping {} candidate at {}..{}: verb/pronoun head",
                    label, entity.start, entity.end
                );
                continue;
            }
            spans.push(Span {
                text: entity.text,
                start: entity.start,
                end: entity.end,
                label,
                source: DetectorId::RECOGNIZER,
                variant: None,
            });
        }
        Ok(Detection::from_spans(spans))
    }
}
