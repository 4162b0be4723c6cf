//! Masking statistics. Observational only.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mailveil_core::Span;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskingStats {
    pub document_id: String,
    pub processing_time_seconds: f64,
    /// Lengths in characters.
    pub original_length: usize,
    pub masked_length: usize,
    /// Share of character positions that differ between original and
    /// masked text, compared position by position.
    pub masking_percentage: f64,
    /// Accepted spans per label.
    pub entity_counts: BTreeMap<String, usize>,
    pub total_entities_masked: usize,
    /// Unix timestamp (milliseconds).
    pub masked_at: i64,
}

impl MaskingStats {
    pub fn collect(
        document_id: &str,
        original: &str,
        masked: &str,
        accepted: &[Span],
        elapsed: Duration,
    ) -> Self {
        let mut entity_counts = BTreeMap::new();
        for span in accepted {
            *entity_counts.entry(span.label.to_string()).or_insert(0) += 1;
        }
        let original_length = original.chars().count();
        Self {
            document_id: document_id.to_string(),
            processing_time_seconds: elapsed.as_secs_f64(),
            original_length,
            masked_length: masked.chars().count(),
            masking_percentage: changed_percentage(original, masked, original_length),
            entity_counts,
            total_entities_masked: accepted.len(),
            masked_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Percentage formatted to one decimal, e.g. `"42.5%"`.
    pub fn masking_rate(&self) -> String {
        format!("{:.1}%", self.masking_percentage)
    }
}

fn changed_percentage(original: &str, masked: &str, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let changed = original
        .chars()
        .zip(masked.chars())
        .filter(|(a, b)| a != b)
        .count();
    changed as f64 / total as f64 * 100.0
}
