//! Heuristic entity recognizer: capitalised names, titled names,
//! company suffixes, dates, amounts and quantities.
//!
//! Used when no statistical recognizer is plugged in. It never reports
//! POS tags, so the head-token filter in `RecognizerDetector` is skipped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::recognizer::{EntityRecognizer, RecognizedEntity};
use mailveil_core::Result;

static TITLED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.[ \t]+\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+)?").unwrap()
});

/// Two or more capitalised words on one line.
static NAME_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+)+\b").unwrap());

static ORG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\p{Lu}[\p{L}&]*\.?(?:[ \t]+\p{Lu}[\p{L}&]*\.?)*[ \t]+(?:Inc\.|Corp\.|Co\.|LLC\b|Ltd\.|GmbH\b)")
        .unwrap()
});

static DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s*\d{4}\b",
        r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b",
        r"\b\d{4}[-/.]\d{1,2}[-/.]\d{1,2}\b",
        r"\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static MONEY_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[$€£]\d[\d,]*(?:\.\d{2})?(?:\s*(?:million|billion|M|B|K)\b)?",
        r"\b\d[\d,]*(?:\.\d+)?\s*(?:USD|EUR|GBP|dollars|euros|pounds)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\s*(?:(?:kg|g|mg|tons?|tonnes?|liters?|litres?|ml|units|pieces|boxes|GB|MB|TB|km|miles|percent)\b|%)")
        .unwrap()
});

/// Capitalised words that start a name run without being part of the name.
const LEADING_NON_NAMES: &[&str] = &[
    "A", "An", "And", "Ask", "Attention", "Attn", "Best", "But", "Call", "Cc", "Cheers", "Contact",
    "Dear", "Email", "For", "From", "Hello", "Hi", "If", "Kind", "Meet", "My", "Our", "Please",
    "Regards", "Sincerely", "Subject", "Tell", "Thank", "Thanks", "That", "The", "These", "This",
    "Those", "To", "We", "When", "With", "Your", "Yours",
];

/// Regex-driven stand-in for a statistical recognizer.
#[derive(Debug, Default)]
pub struct HeuristicRecognizer;

impl HeuristicRecognizer {
    pub fn new() -> Self {
        Self
    }

    fn name_runs(text: &str, out: &mut Vec<RecognizedEntity>) {
        for m in NAME_RUN_RE.find_iter(text) {
            let mut start = m.start();
            let mut rest = m.as_str();
            // strip leading sentence words ("Contact John Smith" -> "John Smith")
            loop {
                let first = rest.split([' ', '\t']).next().unwrap_or("");
                if !LEADING_NON_NAMES.contains(&first) {
                    break;
                }
                let skip = first.len();
                let trimmed = rest[skip..].trim_start_matches([' ', '\t']);
                start += rest.len() - trimmed.len();
                rest = trimmed;
            }
            if rest.split([' ', '\t']).filter(|w| !w.is_empty()).count() < 2 {
                continue;
            }
            out.push(entity(rest, start, "PERSON"));
        }
    }
}

fn entity(text: &str, start: usize, label: &str) -> RecognizedEntity {
    RecognizedEntity {
        text: text.to_string(),
        start,
        end: start + text.len(),
        label: label.to_string(),
        pos_tags: None,
    }
}

fn push_matches(re: &Regex, text: &str, label: &str, out: &mut Vec<RecognizedEntity>) {
    out.extend(re.find_iter(text).map(|m| entity(m.as_str(), m.start(), label)));
}

impl EntityRecognizer for HeuristicRecognizer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn recognize(&self, document: &str) -> Result<Vec<RecognizedEntity>> {
        let mut out = Vec::new();
        push_matches(&TITLED_NAME_RE, document, "PERSON", &mut out);
        Self::name_runs(document, &mut out);
        push_matches(&ORG_RE, document, "ORG", &mut out);
        for re in DATE_RES.iter() {
            push_matches(re, document, "DATE", &mut out);
        }
        for re in MONEY_RES.iter() {
            push_matches(re, document, "MONEY", &mut out);
        }
        push_matches(&QUANTITY_RE, document, "QUANTITY", &mut out);
        out.sort_by_key(|e| e.start);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(text: &str) -> Vec<(String, String)> {
        HeuristicRecognizer
            .recognize(text)
            .unwrap()
            .into_iter()
            .map(|e| (e.text, e.label))
            .collect()
    }

    #[test]
    fn test_name_runs_strip_sentence_words() {
        let doc = "Contact John Smith at the office.";
        let entities = HeuristicRecognizer.recognize(doc).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "John Smith");
        assert_eq!(&doc[entities[0].start..entities[0].end], "John Smith");
    }

    #[test]
    fn test_single_words_and_closings_ignored() {
        assert!(found("Dear Naveen,\nBest Regards,\nThanks").is_empty());
    }

    #[test]
    fn test_titled_name_and_org() {
        let entities = found("Please ask Dr. Maryam Ghasemi at Mahan Pharmed Chem. Co. today.");
        assert!(entities.contains(&("Dr. Maryam Ghasemi".into(), "PERSON".into())));
        assert!(entities.contains(&("Mahan Pharmed Chem. Co.".into(), "ORG".into())));
    }

    #[test]
    fn test_dates_money_quantities() {
        let entities = found("Sent on Sunday (2024.11.24): $1,200.50 for 25 kg, due March 3, 2025.");
        assert!(entities.contains(&("Sunday".into(), "DATE".into())));
        assert!(entities.contains(&("2024.11.24".into(), "DATE".into())));
        assert!(entities.contains(&("$1,200.50".into(), "MONEY".into())));
        assert!(entities.contains(&("25 kg".into(), "QUANTITY".into())));
        assert!(entities.contains(&("March 3, 2025".into(), "DATE".into())));
    }

    #[test]
    fn test_offsets_line_up_with_document() {
        let doc = "Ramona Salamat Pars is waiting.\nMaryam Ghasemi";
        for e in HeuristicRecognizer.recognize(doc).unwrap() {
            assert_eq!(&doc[e.start..e.end], e.text);
        }
    }
}
