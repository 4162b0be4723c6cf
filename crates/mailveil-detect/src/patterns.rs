//! Regex detectors for email addresses, phone/fax numbers, web links and
//! attachment references.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{span_from_match, Detection, Detector};
use mailveil_core::{DetectorId, EntityLabel, Result, Span};

// Compiled regex patterns (compiled once, reused).
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// Phone patterns; the index is the placeholder variant.
static PHONE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // +XX (XXX) XXX-XXXX and friends
        r"(?:\+\d{1,3}[-. ]?)?\(?\d{3,4}\)?[-. ]?\d{3,4}[-. ]?\d{3,4}",
        // +XXXXXXXXXXX
        r"\+\d{10,15}",
        // XXX-XXX-XXXX
        r"\d{3,4}[-. ]?\d{3,4}[-. ]?\d{3,4}",
        // any of the above with an extension
        r"(?:\+\d{1,3}[-. ]?)?\(?\d{3,4}\)?[-. ]?\d{3,4}[-. ]?\d{3,4}[ ]*(?i:ext\.?|x|extension)[ ]*\d{1,5}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(?:https?://|www\.)[^\s<>"']+"#).unwrap());

/// Attachment patterns; the index is the placeholder variant.
static ATTACHMENT_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\battached (?:file|document|spreadsheet|presentation|pdf)\b",
        r"(?i)\battachments?\b",
        r"(?i)[\w-]*\.pdf\b",
        r"(?i)[\w-]*\.docx?\b",
        r"(?i)[\w-]*\.xlsx?\b",
        r"(?i)[\w-]*\.pptx?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// How much leading context to search for the word "fax".
const FAX_CONTEXT_CHARS: usize = 24;

/// Email addresses.
#[derive(Debug, Default)]
pub struct EmailDetector;

impl Detector for EmailDetector {
    fn id(&self) -> DetectorId {
        DetectorId::EMAIL
    }

    fn detect(&self, text: &str) -> Result<Detection> {
        let spans = EMAIL_RE
            .find_iter(text)
            .map(|m| span_from_match(m, EntityLabel::EMAIL_ADDRESS, DetectorId::EMAIL))
            .collect();
        Ok(Detection::from_spans(spans))
    }
}

/// Telephone and fax numbers. Every pattern reports independently; the
/// resolver keeps the longest of any overlapping matches.
#[derive(Debug, Default)]
pub struct PhoneDetector;

impl PhoneDetector {
    /// A number is a fax number when "fax" appears shortly before it on the
    /// same line, directly after it (`555-0100 (fax)`), or at the end of the
    /// previous line when the number opens its own line (`Fax:\n555-0100`).
    fn is_fax(text: &str, start: usize, end: usize) -> bool {
        let before = &text[..start];
        let (line, previous) = match before.rfind('\n') {
            Some(i) => (&before[i + 1..], Some(&before[..i])),
            None => (before, None),
        };
        if mentions_fax(tail_chars(line, FAX_CONTEXT_CHARS)) {
            return true;
        }

        let rest_of_line = text[end..].split('\n').next().unwrap_or_default();
        if has_trailing_fax_marker(rest_of_line) {
            return true;
        }

        match previous {
            Some(prev) if line.trim().is_empty() => {
                let prev = prev.rsplit('\n').next().unwrap_or(prev);
                // only what follows the last number on that line labels this one
                let heading = match prev.rfind(|c: char| c.is_ascii_digit()) {
                    Some(i) => &prev[i + 1..],
                    None => prev,
                };
                mentions_fax(tail_chars(heading, FAX_CONTEXT_CHARS))
            }
            _ => false,
        }
    }
}

fn mentions_fax(context: &str) -> bool {
    context.to_lowercase().contains("fax")
}

/// `(fax)`, ` fax`, ` - Fax`. A `fax:` heading introduces the next number.
fn has_trailing_fax_marker(after: &str) -> bool {
    let rest = after.trim_start_matches(|c: char| c.is_whitespace() || "([-".contains(c));
    let word_end = rest
        .find(|c: char| !c.is_alphabetic())
        .unwrap_or(rest.len());
    rest[..word_end].eq_ignore_ascii_case("fax") && !rest[word_end..].starts_with(':')
}

/// The last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> &str {
    let skip = s.chars().count().saturating_sub(n);
    match s.char_indices().nth(skip) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}

impl Detector for PhoneDetector {
    fn id(&self) -> DetectorId {
        DetectorId::PHONE
    }

    fn detect(&self, text: &str) -> Result<Detection> {
        let mut spans = Vec::new();
        for (variant, re) in PHONE_RES.iter().enumerate() {
            for m in re.find_iter(text) {
                let label = if Self::is_fax(text, m.start(), m.end()) {
                    EntityLabel::FAX_NUMBER
                } else {
                    EntityLabel::PHONE_NUMBER
                };
                spans.push(span_from_match(m, label, DetectorId::PHONE).with_variant(variant as u32));
            }
        }
        Ok(Detection::from_spans(spans))
    }
}

/// Web links, with trailing sentence punctuation trimmed off.
#[derive(Debug, Default)]
pub struct UrlDetector;

impl Detector for UrlDetector {
    fn id(&self) -> DetectorId {
        DetectorId::URL
    }

    fn detect(&self, text: &str) -> Result<Detection> {
        let mut spans = Vec::new();
        for m in URL_RE.find_iter(text) {
            let trimmed = m.as_str().trim_end_matches(|c| ".,;:!?)]".contains(c));
            if trimmed.is_empty() {
                continue;
            }
            let end = m.start() + trimmed.len();
            spans.push(Span {
                text: trimmed.to_string(),
                start: m.start(),
                end,
                label: EntityLabel::URL,
                source: DetectorId::URL,
                variant: None,
            });
        }
        Ok(Detection::from_spans(spans))
    }
}

/// Phrases referring to attached files and common document file names.
#[derive(Debug, Default)]
pub struct AttachmentDetector;

impl Detector for AttachmentDetector {
    fn id(&self) -> DetectorId {
        DetectorId::ATTACHMENT
    }

    fn detect(&self, text: &str) -> Result<Detection> {
        let mut spans = Vec::new();
        for (variant, re) in ATTACHMENT_RES.iter().enumerate() {
            for m in re.find_iter(text) {
                spans.push(
                    span_from_match(m, EntityLabel::ATTACHMENT_REFERENCE, DetectorId::ATTACHMENT)
                        .with_variant(variant as u32),
                );
            }
        }
        Ok(Detection::from_spans(spans))
    }
}
