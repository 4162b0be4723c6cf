//! The masking API: mask, unmask, batch verification and preview.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::assign::assign_placeholders;
use crate::resolver::{resolve, Rejection};
use crate::rewrite::{mask_splice, mask_substring, unmask};
use crate::stats::MaskingStats;
use mailveil_core::{
    DocumentId, EntityMap, Error, LabelRegistry, MailveilConfig, Result, RewriteMode, Span,
};
use mailveil_detect::{DetectorSet, SupplementKey};
use mailveil_store::MappingStore;

/// Result of one masking run.
#[derive(Debug, Clone, Serialize)]
pub struct MaskOutcome {
    pub masked_text: String,
    pub document_id: DocumentId,
    pub entity_map: EntityMap,
    pub stats: MaskingStats,
    /// Candidates the resolver skipped, for diagnostics.
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnmaskOutcome {
    pub original_text: String,
    pub entity_map: EntityMap,
}

/// One document of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub document_id: DocumentId,
    pub masked_text: String,
    pub original_text: String,
    pub round_trip_ok: bool,
    pub stats: MaskingStats,
}

/// Detection and resolution without assignment or persistence.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub accepted: Vec<Span>,
    pub rejected: Vec<Rejection>,
    pub protected: Vec<String>,
}

pub struct MaskingEngine {
    detectors: DetectorSet,
    store: Arc<dyn MappingStore>,
    rewrite_mode: RewriteMode,
    batch_prefix: String,
}

impl MaskingEngine {
    pub fn new(detectors: DetectorSet, store: Arc<dyn MappingStore>, rewrite_mode: RewriteMode) -> Self {
        Self {
            detectors,
            store,
            rewrite_mode,
            batch_prefix: "email".into(),
        }
    }

    /// Heuristic detectors configured from `config`, persisting to `store`.
    pub fn from_config(config: &MailveilConfig, store: Arc<dyn MappingStore>) -> Self {
        let mut registry = LabelRegistry::new();
        for label in &config.disabled_labels {
            registry.disable(label.clone());
        }
        let supplement_key = match config.rewrite_mode {
            RewriteMode::SubstringIdentity => SupplementKey::SurfaceText,
            RewriteMode::OffsetSplice => SupplementKey::Position,
        };
        let detectors = DetectorSet::with_heuristics(Arc::new(registry))
            .parallel(config.parallel_detection)
            .supplement_key(supplement_key);

        Self::new(detectors, store, config.rewrite_mode).with_batch_prefix(&config.batch_prefix)
    }

    pub fn with_batch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.batch_prefix = prefix.into();
        self
    }

    pub fn rewrite_mode(&self) -> RewriteMode {
        self.rewrite_mode
    }

    pub fn registry(&self) -> &LabelRegistry {
        self.detectors.registry()
    }

    pub fn store(&self) -> &Arc<dyn MappingStore> {
        &self.store
    }

    /// Run detectors and the resolver only.
    pub fn preview(&self, document: &str) -> Result<Preview> {
        let candidates = self.detectors.detect(document)?;
        let resolution = resolve(candidates.spans, &candidates.protected, document);
        Ok(Preview {
            accepted: resolution.accepted,
            rejected: resolution.rejected,
            protected: candidates.protected,
        })
    }

    /// Mask `document` and save its entity map under `id` (or the content id).
    pub fn mask(&self, document: &str, id: Option<&str>) -> Result<MaskOutcome> {
        let started = Instant::now();
        let document_id = DocumentId::resolve(id, document)?;

        let candidates = self.detectors.detect(document)?;
        let resolution = resolve(candidates.spans, &candidates.protected, document);
        let entity_map = assign_placeholders(&resolution.accepted, document)?;

        let masked_text = match self.rewrite_mode {
            RewriteMode::SubstringIdentity => mask_substring(document, &entity_map),
            RewriteMode::OffsetSplice => mask_splice(document, &resolution.accepted, &entity_map),
        };

        self.store.save(&document_id, &entity_map)?;

        let stats = MaskingStats::collect(
            document_id.as_str(),
            document,
            &masked_text,
            &resolution.accepted,
            started.elapsed(),
        );
        info!(
            "Masked {}: {} entities, {} rate, {:.3}s",
            document_id,
            entity_map.len(),
            stats.masking_rate(),
            stats.processing_time_seconds
        );

        Ok(MaskOutcome {
            masked_text,
            document_id,
            entity_map,
            stats,
            rejected: resolution.rejected,
        })
    }

    /// Restore `masked` using `entity_map` if given, else the map stored
    /// under `id`.
    pub fn unmask(
        &self,
        masked: &str,
        id: Option<&str>,
        entity_map: Option<EntityMap>,
    ) -> Result<UnmaskOutcome> {
        let entity_map = match (entity_map, id.map(str::trim).filter(|s| !s.is_empty())) {
            (Some(map), _) => {
                debug!("Unmasking with caller-supplied map ({} entries)", map.len());
                map
            }
            (None, Some(id)) => self.store.load(&DocumentId::new(id)?)?,
            (None, None) => return Err(Error::MissingMapping),
        };

        let original_text = unmask(masked, &entity_map);
        info!("Unmasked {} placeholders", entity_map.len());
        Ok(UnmaskOutcome {
            original_text,
            entity_map,
        })
    }

    /// Mask each document as `<prefix>_<n>`, unmask it from the store and
    /// report whether the round trip reproduced the input.
    pub fn batch_mask_unmask(&self, documents: &[String]) -> Result<Vec<BatchItem>> {
        let mut items = Vec::with_capacity(documents.len());
        for (i, document) in documents.iter().enumerate() {
            let id = format!("{}_{}", self.batch_prefix, i + 1);
            let masked = self.mask(document, Some(&id))?;
            let restored = self.unmask(&masked.masked_text, Some(&id), None)?;
            let round_trip_ok = restored.original_text == *document;
            if !round_trip_ok {
                info!("Round trip mismatch for {}", id);
            }
            items.push(BatchItem {
                document_id: masked.document_id,
                masked_text: masked.masked_text,
                original_text: restored.original_text,
                round_trip_ok,
                stats: masked.stats,
            });
        }
        Ok(items)
    }
}
