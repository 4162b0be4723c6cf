//! Entity labels: an open set of string tags with a registry of well-known ones.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

/// A label such as `PERSON` or `EMAIL_ADDRESS`.
///
/// Labels are plain strings so plug-in detectors can introduce their own;
/// the constants below cover the tags the built-in detectors emit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityLabel(Cow<'static, str>);

impl EntityLabel {
    pub const PERSON: EntityLabel = EntityLabel(Cow::Borrowed("PERSON"));
    pub const ORGANIZATION: EntityLabel = EntityLabel(Cow::Borrowed("ORGANIZATION"));
    pub const LOCATION: EntityLabel = EntityLabel(Cow::Borrowed("LOCATION"));
    pub const FACILITY: EntityLabel = EntityLabel(Cow::Borrowed("FACILITY"));
    pub const PRODUCT: EntityLabel = EntityLabel(Cow::Borrowed("PRODUCT"));
    pub const DATE: EntityLabel = EntityLabel(Cow::Borrowed("DATE"));
    pub const MONEY: EntityLabel = EntityLabel(Cow::Borrowed("MONEY"));
    pub const QUANTITY: EntityLabel = EntityLabel(Cow::Borrowed("QUANTITY"));
    pub const CARDINAL: EntityLabel = EntityLabel(Cow::Borrowed("CARDINAL"));
    pub const ORDINAL: EntityLabel = EntityLabel(Cow::Borrowed("ORDINAL"));
    pub const EMAIL_ADDRESS: EntityLabel = EntityLabel(Cow::Borrowed("EMAIL_ADDRESS"));
    pub const PHONE_NUMBER: EntityLabel = EntityLabel(Cow::Borrowed("PHONE_NUMBER"));
    pub const FAX_NUMBER: EntityLabel = EntityLabel(Cow::Borrowed("FAX_NUMBER"));
    pub const URL: EntityLabel = EntityLabel(Cow::Borrowed("URL"));
    pub const ATTACHMENT_REFERENCE: EntityLabel =
        EntityLabel(Cow::Borrowed("ATTACHMENT_REFERENCE"));

    /// Build a label from free text, upper-casing and folding separators to `_`.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized: String = raw
            .as_ref()
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        Self(Cow::Owned(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label is usable inside a placeholder token.
    pub fn is_valid(&self) -> bool {
        LABEL_RE.is_match(&self.0)
    }

    /// All labels the built-in detectors can produce.
    pub fn well_known() -> &'static [EntityLabel] {
        &[
            Self::PERSON,
            Self::ORGANIZATION,
            Self::LOCATION,
            Self::FACILITY,
            Self::PRODUCT,
            Self::DATE,
            Self::MONEY,
            Self::QUANTITY,
            Self::CARDINAL,
            Self::ORDINAL,
            Self::EMAIL_ADDRESS,
            Self::PHONE_NUMBER,
            Self::FAX_NUMBER,
            Self::URL,
            Self::ATTACHMENT_REFERENCE,
        ]
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Capability for detectors that introduce labels beyond the well-known set.
pub trait LabelProvider {
    /// Labels this provider may emit.
    fn labels(&self) -> Vec<EntityLabel>;

    /// Foreign tag → label pairs, e.g. `("GPE", LOCATION)`.
    fn aliases(&self) -> Vec<(String, EntityLabel)> {
        Vec::new()
    }
}

/// Known labels, recognizer aliases and the enabled subset.
#[derive(Debug, Clone)]
pub struct LabelRegistry {
    known: Vec<EntityLabel>,
    aliases: HashMap<String, EntityLabel>,
    disabled: HashSet<EntityLabel>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        let aliases = [
            ("ORG", EntityLabel::ORGANIZATION),
            ("GPE", EntityLabel::LOCATION),
            ("LOC", EntityLabel::LOCATION),
            ("FAC", EntityLabel::FACILITY),
            ("PER", EntityLabel::PERSON),
            ("EMAIL", EntityLabel::EMAIL_ADDRESS),
            ("PHONE", EntityLabel::PHONE_NUMBER),
            ("FAX", EntityLabel::FAX_NUMBER),
            ("ATTACHMENT", EntityLabel::ATTACHMENT_REFERENCE),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            known: EntityLabel::well_known().to_vec(),
            aliases,
            disabled: HashSet::new(),
        }
    }

    /// Add the labels and aliases of a plug-in provider.
    pub fn register(&mut self, provider: &dyn LabelProvider) {
        for label in provider.labels() {
            if !self.known.contains(&label) {
                self.known.push(label);
            }
        }
        for (alias, label) in provider.aliases() {
            self.aliases.insert(alias.to_ascii_uppercase(), label);
        }
    }

    /// Map a raw recognizer tag onto a registry label.
    pub fn normalize(&self, raw: &str) -> EntityLabel {
        let label = EntityLabel::new(raw);
        self.aliases.get(label.as_str()).cloned().unwrap_or(label)
    }

    pub fn disable(&mut self, label: EntityLabel) {
        self.disabled.insert(label);
    }

    pub fn enable(&mut self, label: &EntityLabel) {
        self.disabled.remove(label);
    }

    /// Known, valid and not switched off.
    pub fn is_enabled(&self, label: &EntityLabel) -> bool {
        label.is_valid() && self.known.contains(label) && !self.disabled.contains(label)
    }

    pub fn labels(&self) -> &[EntityLabel] {
        &self.known
    }

    pub fn enabled_labels(&self) -> Vec<EntityLabel> {
        self.known
            .iter()
            .filter(|l| !self.disabled.contains(*l))
            .cloned()
            .collect()
    }
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
