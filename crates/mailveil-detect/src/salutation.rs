//! Names following a greeting ("Dear Manisha", "Dear Mr. Smith").

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Detection, Detector};
use mailveil_core::{DetectorId, EntityLabel, Result, Span};

static SALUTATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bDear[ \t]+((?:(?:Mr|Mrs|Ms|Dr)\.|Miss)[ \t]+)?(\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+)*)")
        .unwrap()
});

/// Addressee words that are not names.
const GENERIC_ADDRESSEES: &[&str] = &[
    "All", "Colleagues", "Customer", "Customers", "Friends", "Madam", "Partner", "Partners", "Sir",
    "Sirs", "Team", "Valued",
];

/// PERSON candidates for the name after "Dear", title included.
#[derive(Debug, Default)]
pub struct SalutationDetector;

impl Detector for SalutationDetector {
    fn id(&self) -> DetectorId {
        DetectorId::SALUTATION
    }

    fn detect(&self, text: &str) -> Result<Detection> {
        let mut spans = Vec::new();
        for caps in SALUTATION_RE.captures_iter(text) {
            let Some(name) = caps.get(2) else { continue };
            let first_word = name.as_str().split([' ', '\t']).next().unwrap_or("");
            if caps.get(1).is_none() && GENERIC_ADDRESSEES.contains(&first_word) {
                continue;
            }
            let start = caps.get(1).map_or(name.start(), |title| title.start());
            spans.push(Span {
                text: text[start..name.end()].to_string(),
                start,
                end: name.end(),
                label: EntityLabel::PERSON,
                source: DetectorId::SALUTATION,
                variant: None,
            });
        }
        Ok(Detection::from_spans(spans))
    }

    fn is_supplemental(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        SalutationDetector
            .detect(text)
            .unwrap()
            .spans
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn test_plain_salutation() {
        let doc = "Dear Manisha,\n\nI sent you the file.";
        let spans = SalutationDetector.detect(doc).unwrap().spans;
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Manisha");
        assert_eq!(spans[0].start, 5);
        assert_eq!(spans[0].label, EntityLabel::PERSON);
    }

    #[test]
    fn test_titled_salutation() {
        assert_eq!(names("Dear Mrs. Jane Roe,"), vec!["Mrs. Jane Roe"]);
        assert_eq!(names("Dear Miss Kim"), vec!["Miss Kim"]);
    }

    #[test]
    fn test_generic_addressees_skipped() {
        assert!(names("Dear All,\nDear Team").is_empty());
        assert!(names("dear naveen").is_empty());
    }
}
