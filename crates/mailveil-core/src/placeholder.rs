//! Placeholder tokens: `[LABEL_n]` or `[LABEL_variant_n]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::label::EntityLabel;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([A-Z][A-Z0-9_]*?)(?:_(\d+))?_(\d+)\]$").unwrap());

/// Structured form of a placeholder token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder {
    pub label: EntityLabel,
    /// Detector sub-variant, rendered between label and sequence.
    pub variant: Option<u32>,
    /// 1-based occurrence number.
    pub sequence: u32,
}

impl Placeholder {
    pub fn new(label: EntityLabel, sequence: u32) -> Self {
        Self {
            label,
            variant: None,
            sequence,
        }
    }

    pub fn with_variant(label: EntityLabel, variant: u32, sequence: u32) -> Self {
        Self {
            label,
            variant: Some(variant),
            sequence,
        }
    }

    /// Render the token string.
    pub fn token(&self) -> String {
        match self.variant {
            Some(v) => format!("[{}_{}_{}]", self.label, v, self.sequence),
            None => format!("[{}_{}]", self.label, self.sequence),
        }
    }

    /// Best-effort parse of a rendered token.
    ///
    /// `[A_1_2]` is ambiguous between label `A` with variant 1 and label
    /// `A_1`; the variant reading wins.
    pub fn parse(token: &str) -> Option<Self> {
        let caps = TOKEN_RE.captures(token)?;
        let label = EntityLabel::new(caps.get(1)?.as_str());
        let sequence = caps.get(3)?.as_str().parse().ok()?;
        let variant = match caps.get(2) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some(Self {
            label,
            variant,
            sequence,
        })
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}
