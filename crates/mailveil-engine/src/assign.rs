//! Placeholder assignment for resolved spans.

use std::collections::HashMap;

use mailveil_core::{EntityLabel, EntityMap, Error, Placeholder, Result, Span};

/// Build the entity map for `spans` (sorted by start offset).
///
/// Plain spans are numbered by one counter shared across all labels, which
/// advances for every span. Spans carrying a detector variant are numbered
/// per `(label, variant)` instead. Fails with `PlaceholderCollision` when a
/// generated token already occurs in `document`.
pub fn assign_placeholders(spans: &[Span], document: &str) -> Result<EntityMap> {
    let mut map = EntityMap::new();
    let mut variant_counters: HashMap<(EntityLabel, u32), u32> = HashMap::new();

    for (i, span) in spans.iter().enumerate() {
        let placeholder = match span.variant {
            Some(variant) => {
                let n = variant_counters
                    .entry((span.label.clone(), variant))
                    .or_insert(0);
                *n += 1;
                Placeholder::with_variant(span.label.clone(), variant, *n)
            }
            None => Placeholder::new(span.label.clone(), i as u32 + 1),
        };
        let token = placeholder.token();
        if document.contains(&token) {
            return Err(Error::PlaceholderCollision(token));
        }
        map.insert(token, span.text.clone())?;
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailveil_core::DetectorId;

    fn at(doc: &str, needle: &str, label: EntityLabel) -> Span {
        let start = doc.find(needle).unwrap();
        Span::from_offsets(doc, start, start + needle.len(), label, DetectorId::RECOGNIZER).unwrap()
    }

    #[test]
    fn test_global_counter_across_labels() {
        let doc = "Ana met Bob at Acme Inc. on Monday";
        let spans = vec![
            at(doc, "Ana", EntityLabel::PERSON),
            at(doc, "Bob", EntityLabel::PERSON),
            at(doc, "Acme Inc.", EntityLabel::ORGANIZATION),
            at(doc, "Monday", EntityLabel::DATE),
        ];
        let map = assign_placeholders(&spans, doc).unwrap();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["[PERSON_1]", "[PERSON_2]", "[ORGANIZATION_3]", "[DATE_4]"]);
    }

    #[test]
    fn test_variant_counters() {
        let doc = "Tel +98 2144382191, Ana, fax +98 2144382192, cell 0919 7689076";
        let spans = vec![
            at(doc, "+98 2144382191", EntityLabel::PHONE_NUMBER).with_variant(0),
            at(doc, "Ana", EntityLabel::PERSON),
            at(doc, "+98 2144382192", EntityLabel::FAX_NUMBER).with_variant(0),
            at(doc, "0919 7689076", EntityLabel::PHONE_NUMBER).with_variant(0),
        ];
        let map = assign_placeholders(&spans, doc).unwrap();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(
            keys,
            vec!["[PHONE_NUMBER_0_1]", "[PERSON_2]", "[FAX_NUMBER_0_1]", "[PHONE_NUMBER_0_2]"]
        );
    }

    #[test]
    fn test_repeated_text_gets_new_placeholder() {
        let doc = "Ana and Ana";
        let spans = vec![
            Span::from_offsets(doc, 0, 3, EntityLabel::PERSON, DetectorId::RECOGNIZER).unwrap(),
            Span::from_offsets(doc, 8, 11, EntityLabel::PERSON, DetectorId::RECOGNIZER).unwrap(),
        ];
        let map = assign_placeholders(&spans, doc).unwrap();
        assert_eq!(map.get("[PERSON_1]"), Some("Ana"));
        assert_eq!(map.get("[PERSON_2]"), Some("Ana"));
    }

    #[test]
    fn test_collision_with_document_text() {
        let doc = "Ana wrote [PERSON_1] literally";
        let spans = vec![at(doc, "Ana", EntityLabel::PERSON)];
        let err = assign_placeholders(&spans, doc).unwrap_err();
        assert!(matches!(err, Error::PlaceholderCollision(t) if t == "[PERSON_1]"));
    }
}
