//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::label::EntityLabel;

/// Paths to all Mailveil data locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// One JSON file per document mapping (`data/mappings/`).
    pub mappings: PathBuf,
    /// SQLite mapping database (`data/mailveil.db`).
    pub database: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            mappings: root.join("mappings"),
            database: root.join("mailveil.db"),
            root,
        };
        std::fs::create_dir_all(&paths.mappings)?;
        Ok(paths)
    }
}

/// Which mapping store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Json,
    Sqlite,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(Error::Config(format!("unknown store backend: {}", other))),
        }
    }
}

/// How masked text is produced from the resolved spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    /// Every verbatim occurrence of a masked surface text is replaced.
    #[default]
    SubstringIdentity,
    /// Each accepted span is replaced at its own offsets, nothing else.
    OffsetSplice,
}

impl std::str::FromStr for RewriteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" | "substring_identity" => Ok(Self::SubstringIdentity),
            "splice" | "offset_splice" => Ok(Self::OffsetSplice),
            other => Err(Error::Config(format!("unknown rewrite mode: {}", other))),
        }
    }
}

/// Top-level Mailveil configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailveilConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    pub store_backend: StoreBackend,
    pub rewrite_mode: RewriteMode,
    /// Labels excluded from masking even if a detector reports them.
    pub disabled_labels: Vec<EntityLabel>,
    /// Fan detectors out over the rayon pool.
    pub parallel_detection: bool,
    /// Prefix for ids generated by batch runs (`<prefix>_<n>`).
    pub batch_prefix: String,
}

impl MailveilConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3004);

        let store_backend = match std::env::var("MAILVEIL_STORE") {
            Ok(v) => v.parse()?,
            Err(_) => StoreBackend::Json,
        };
        let rewrite_mode = match std::env::var("MAILVEIL_REWRITE") {
            Ok(v) => v.parse()?,
            Err(_) => RewriteMode::default(),
        };

        let mut disabled_labels: Vec<EntityLabel> = std::env::var("MAILVEIL_DISABLED_LABELS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(EntityLabel::new)
                    .collect()
            })
            .unwrap_or_default();
        if !env_flag("MAILVEIL_MASK_DATES", true) {
            disabled_labels.push(EntityLabel::DATE);
        }
        if !env_flag("MAILVEIL_MASK_LOCATIONS", true) {
            disabled_labels.push(EntityLabel::LOCATION);
        }

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            store_backend,
            rewrite_mode,
            disabled_labels,
            parallel_detection: env_flag("MAILVEIL_PARALLEL_DETECTION", false),
            batch_prefix: std::env::var("MAILVEIL_BATCH_PREFIX").unwrap_or_else(|_| "email".into()),
        })
    }

    /// Defaults rooted at `data_dir`, ignoring the environment.
    pub fn with_defaults(data_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            port: 3004,
            data_paths: DataPaths::new(data_dir)?,
            store_backend: StoreBackend::Json,
            rewrite_mode: RewriteMode::default(),
            disabled_labels: Vec::new(),
            parallel_detection: false,
            batch_prefix: "email".into(),
        })
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
