//! Running a collection of detectors and merging their output.

use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::heuristic::HeuristicRecognizer;
use crate::patterns::{AttachmentDetector, EmailDetector, PhoneDetector, UrlDetector};
use crate::recognizer::{EntityRecognizer, RecognizerDetector};
use crate::salutation::SalutationDetector;
use crate::signature::SignatureDetector;
use crate::{Detection, Detector};
use mailveil_core::{LabelRegistry, Result, Span};

/// What makes a supplemental candidate a duplicate of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplementKey {
    /// Same surface text anywhere in the document.
    SurfaceText,
    /// Same offsets.
    Position,
}

/// Merged output of all detectors, in detection order.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    /// Detector registration order, then left-to-right within a detector.
    pub spans: Vec<Span>,
    pub protected: Vec<String>,
}

/// An ordered set of detectors.
pub struct DetectorSet {
    detectors: Vec<Arc<dyn Detector>>,
    registry: Arc<LabelRegistry>,
    parallel: bool,
    supplement_key: SupplementKey,
}

impl DetectorSet {
    pub fn new(registry: Arc<LabelRegistry>) -> Self {
        Self {
            detectors: Vec::new(),
            registry,
            parallel: false,
            supplement_key: SupplementKey::SurfaceText,
        }
    }

    /// Recognizer, email, phone, URL, attachment, salutation, signature.
    pub fn standard(recognizer: Arc<dyn EntityRecognizer>, registry: Arc<LabelRegistry>) -> Self {
        let mut set = Self::new(registry.clone());
        set.push(RecognizerDetector::new(recognizer, registry));
        set.push(EmailDetector);
        set.push(PhoneDetector);
        set.push(UrlDetector);
        set.push(AttachmentDetector);
        set.push(SalutationDetector);
        set.push(SignatureDetector::new());
        set
    }

    /// `standard` with the built-in heuristic recognizer.
    pub fn with_heuristics(registry: Arc<LabelRegistry>) -> Self {
        Self::standard(Arc::new(HeuristicRecognizer::new()), registry)
    }

    pub fn push(&mut self, detector: impl Detector + 'static) {
        self.detectors.push(Arc::new(detector));
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn supplement_key(mut self, key: SupplementKey) -> Self {
        self.supplement_key = key;
        self
    }

    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector against `text` and merge the results.
    ///
    /// The first detector error aborts the run. Output order does not depend
    /// on whether the detectors ran in parallel.
    pub fn detect(&self, text: &str) -> Result<Candidates> {
        let run = |d: &Arc<dyn Detector>| -> Result<(bool, Detection)> {
            let mut detection = d.detect(text)?;
            detection.spans.sort_by_key(|s| s.start);
            debug!("Detector {} produced {} candidates", d.id(), detection.spans.len());
            Ok((d.is_supplemental(), detection))
        };

        let results: Vec<Result<(bool, Detection)>> = if self.parallel {
            self.detectors.par_iter().map(run).collect()
        } else {
            self.detectors.iter().map(run).collect()
        };
        let detections = results.into_iter().collect::<Result<Vec<_>>>()?;

        let key = |s: &Span| match self.supplement_key {
            SupplementKey::SurfaceText => (s.text.clone(), 0, 0),
            SupplementKey::Position => (String::new(), s.start, s.end),
        };
        let mut seen: HashSet<(String, usize, usize)> = detections
            .iter()
            .filter(|(supplemental, _)| !supplemental)
            .flat_map(|(_, d)| d.spans.iter().map(key))
            .collect();

        let mut candidates = Candidates::default();
        for (supplemental, detection) in detections {
            for span in detection.spans {
                if !self.registry.is_enabled(&span.label) {
                    continue;
                }
                if supplemental && !seen.insert(key(&span)) {
                    continue;
                }
                candidates.spans.push(span);
            }
            for phrase in detection.protected {
                if !candidates.protected.contains(&phrase) {
                    candidates.protected.push(phrase);
                }
            }
        }
        Ok(candidates)
    }
}
