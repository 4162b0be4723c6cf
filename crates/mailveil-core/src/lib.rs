//! Mailveil Core: spans, labels, placeholders, entity maps, configuration.

pub mod config;
pub mod document_id;
pub mod entity_map;
pub mod error;
pub mod label;
pub mod placeholder;
pub mod span;

pub use config::{DataPaths, MailveilConfig, RewriteMode, StoreBackend};
pub use document_id::DocumentId;
pub use entity_map::{EntityMap, MappingRow};
pub use error::{Error, Result};
pub use label::{EntityLabel, LabelProvider, LabelRegistry};
pub use placeholder::Placeholder;
pub use span::{DetectorId, Span};
