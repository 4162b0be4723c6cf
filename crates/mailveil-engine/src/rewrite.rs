//! Text rewriting: masking by substring identity or by offset splice, and
//! the inverse placeholder substitution.

use mailveil_core::{EntityMap, Span};

enum Segment<'a> {
    Plain(&'a str),
    Token(&'a str),
}

/// Replace every occurrence of each map value with its placeholder, entries
/// in insertion order.
///
/// Text already turned into a placeholder is never scanned again, so a later
/// value cannot match inside an earlier token. A value whose occurrences were
/// all consumed by an earlier entry leaves no token in the output.
pub fn mask_substring(document: &str, map: &EntityMap) -> String {
    let mut segments = vec![Segment::Plain(document)];

    for (placeholder, original) in map.iter() {
        if original.is_empty() {
            continue;
        }
        let mut next = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Plain(text) => {
                    let mut last = 0;
                    for (i, _) in text.match_indices(original) {
                        if i > last {
                            next.push(Segment::Plain(&text[last..i]));
                        }
                        next.push(Segment::Token(placeholder));
                        last = i + original.len();
                    }
                    if last < text.len() {
                        next.push(Segment::Plain(&text[last..]));
                    }
                }
                token => next.push(token),
            }
        }
        segments = next;
    }

    segments
        .iter()
        .map(|s| match s {
            Segment::Plain(t) | Segment::Token(t) => *t,
        })
        .collect()
}

/// Splice one placeholder per span at its original offsets.
///
/// `spans` must be overlap-free, sorted by start, and paired one-to-one with
/// the map entries in insertion order (as produced by the assigner).
pub fn mask_splice(document: &str, spans: &[Span], map: &EntityMap) -> String {
    let mut out = String::with_capacity(document.len());
    let mut last = 0;
    for (span, placeholder) in spans.iter().zip(map.keys()) {
        out.push_str(&document[last..span.start]);
        out.push_str(placeholder);
        last = span.end;
    }
    out.push_str(&document[last..]);
    out
}

/// Restore original text, longest placeholder first.
pub fn unmask(masked: &str, map: &EntityMap) -> String {
    let mut text = masked.to_string();
    for placeholder in map.keys_by_length_desc() {
        if let Some(original) = map.get(placeholder) {
            if text.contains(placeholder) {
                text = text.replace(placeholder, original);
            }
        }
    }
    text
}
