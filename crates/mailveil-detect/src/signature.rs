//! Signature blocks: closing markers are protected, capitalised words
//! after them become PERSON candidates.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Detection, Detector};
use mailveil_core::{DetectorId, EntityLabel, Result, Span};

/// Closing markers at the start of a line. Longer forms come first so
/// "Best regards" wins over "Best".
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*(thanks[ \t]*&[ \t]*regards|best[ \t]+regards|kind[ \t]+regards|warm[ \t]+regards|yours[ \t]+sincerely|yours[ \t]+truly|regards|sincerely|thanks|cheers|best)\b",
    )
    .unwrap()
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());
static NAME_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lu}\p{Ll}*$").unwrap());

/// Lines after a marker that count as the signature block.
const DEFAULT_BLOCK_LINES: usize = 6;

#[derive(Debug)]
pub struct SignatureDetector {
    block_lines: usize,
}

impl SignatureDetector {
    pub fn new() -> Self {
        Self {
            block_lines: DEFAULT_BLOCK_LINES,
        }
    }

    /// Scan at most `lines` lines after each marker (the marker's own line included).
    pub fn with_block_lines(lines: usize) -> Self {
        Self { block_lines: lines }
    }

    /// End offset of the signature block starting at `from`.
    fn block_end(&self, text: &str, from: usize) -> usize {
        text[from..]
            .match_indices('\n')
            .nth(self.block_lines.saturating_sub(1))
            .map_or(text.len(), |(i, _)| from + i)
    }
}

impl Default for SignatureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SignatureDetector {
    fn id(&self) -> DetectorId {
        DetectorId::SIGNATURE
    }

    fn detect(&self, text: &str) -> Result<Detection> {
        let mut detection = Detection::default();

        for caps in MARKER_RE.captures_iter(text) {
            let Some(marker) = caps.get(1) else { continue };
            if !detection.protected.iter().any(|p| p == marker.as_str()) {
                detection.protected.push(marker.as_str().to_string());
            }

            let block_start = marker.end();
            let block_end = self.block_end(text, block_start);
            for word in WORD_RE.find_iter(&text[block_start..block_end]) {
                if !NAME_WORD_RE.is_match(word.as_str()) {
                    continue;
                }
                let start = block_start + word.start();
                let end = block_start + word.end();
                if detection.spans.iter().any(|s: &Span| s.start == start) {
                    continue;
                }
                detection.spans.push(Span {
                    text: word.as_str().to_string(),
                    start,
                    end,
                    label: EntityLabel::PERSON,
                    source: DetectorId::SIGNATURE,
                    variant: None,
                });
            }
        }

        detection.spans.sort_by_key(|s| s.start);
        Ok(detection)
    }

    fn is_supplemental(&self) -> bool {
        true
    }
}
