//! Mailveil Engine: resolves candidate spans, assigns placeholders,
//! rewrites text and reverses the rewrite.

pub mod assign;
pub mod engine;
pub mod resolver;
pub mod rewrite;
pub mod stats;

pub use assign::assign_placeholders;
pub use engine::{BatchItem, MaskOutcome, MaskingEngine, Preview, UnmaskOutcome};
pub use resolver::{resolve, Rejection, Resolution};
pub use rewrite::{mask_splice, mask_substring, unmask};
pub use stats::MaskingStats;
