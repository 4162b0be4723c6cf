use std::collections::HashSet;
use std::sync::Arc;

use mailveil_core::{LabelRegistry, RewriteMode};
use mailveil_detect::{DetectorSet, SupplementKey};
use mailveil_engine::{resolve, MaskingEngine};
use mailveil_store::MemoryStore;
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "Ana Lopez",
    "Maryam Ghasemi",
    "Dear Naveen,",
    "Regards\n",
    "a.b@c.io",
    "+1 415 555 0100",
    "fax 021 4438 2191",
    "https://x.org/a",
    "report.pdf",
    "on Monday",
    "2024.11.24",
    "$1,200",
    "Mahan Pharmed Chem. Co.",
    "said",
    "and",
    "the",
    ", ",
    ". ",
    "\n",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24).prop_map(|parts| parts.join(" "))
}

fn engine(mode: RewriteMode, parallel: bool) -> MaskingEngine {
    let key = match mode {
        RewriteMode::SubstringIdentity => SupplementKey::SurfaceText,
        RewriteMode::OffsetSplice => SupplementKey::Position,
    };
    let detectors = DetectorSet::with_heuristics(Arc::new(LabelRegistry::new()))
        .parallel(parallel)
        .supplement_key(key);
    MaskingEngine::new(detectors, Arc::new(MemoryStore::new()), mode)
}

proptest! {
    #[test]
    fn test_accepted_spans_never_overlap(doc in document()) {
        let set = DetectorSet::with_heuristics(Arc::new(LabelRegistry::new()));
        let candidates = set.detect(&doc).unwrap();
        let resolution = resolve(candidates.spans, &candidates.protected, &doc);
        for (i, a) in resolution.accepted.iter().enumerate() {
            for b in &resolution.accepted[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
            prop_assert_eq!(&doc[a.start..a.end], a.text.as_str());
        }
        for w in resolution.accepted.windows(2) {
            prop_assert!(w[0].start < w[1].start);
        }
    }

    #[test]
    fn test_placeholders_are_unique(doc in document()) {
        let out = engine(RewriteMode::SubstringIdentity, false).mask(&doc, None).unwrap();
        let keys: HashSet<&str> = out.entity_map.keys().collect();
        prop_assert_eq!(keys.len(), out.entity_map.len());
    }

    #[test]
    fn test_masking_is_deterministic(doc in document()) {
        let a = engine(RewriteMode::SubstringIdentity, false).mask(&doc, None).unwrap();
        let b = engine(RewriteMode::SubstringIdentity, true).mask(&doc, None).unwrap();
        prop_assert_eq!(&a.masked_text, &b.masked_text);
        prop_assert_eq!(&a.entity_map, &b.entity_map);
        prop_assert_eq!(a.document_id, b.document_id);
    }

    #[test]
    fn test_round_trip_restores_document(doc in document()) {
        for mode in [RewriteMode::SubstringIdentity, RewriteMode::OffsetSplice] {
            let e = engine(mode, false);
            let out = e.mask(&doc, None).unwrap();
            let restored = e.unmask(&out.masked_text, None, Some(out.entity_map)).unwrap();
            prop_assert_eq!(&restored.original_text, &doc);
        }
    }
}
