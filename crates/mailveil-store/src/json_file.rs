//! One pretty-printed JSON file per document: `entity_mapping_<id>.json`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::locks::KeyedLocks;
use crate::MappingStore;
use mailveil_core::{DocumentId, EntityMap, Error, Result};

const FILE_PREFIX: &str = "entity_mapping_";
const FILE_SUFFIX: &str = ".json";

pub struct JsonFileStore {
    dir: PathBuf,
    locks: KeyedLocks,
}

impl JsonFileStore {
    /// Open (and create) the mapping directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| Error::Storage(e.to_string()))?;
        info!("JsonFileStore initialized at {}", dir.display());
        Ok(Self {
            dir,
            locks: KeyedLocks::new(),
        })
    }

    /// File holding the mapping for `id`.
    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        self.dir.join(format!("{}{}{}", FILE_PREFIX, id, FILE_SUFFIX))
    }
}

impl MappingStore for JsonFileStore {
    fn save(&self, id: &DocumentId, map: &EntityMap) -> Result<()> {
        let json = map.to_json_pretty()?;
        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        self.locks.with_lock(id, || -> Result<()> {
            std::fs::write(&tmp, json.as_bytes())?;
            std::fs::rename(&tmp, &path)?;
            Ok(())
        })?;
        debug!("Saved {} entries to {}", map.len(), path.display());
        Ok(())
    }

    fn load(&self, id: &DocumentId) -> Result<EntityMap> {
        let path = self.path_for(id);
        match std::fs::read_to_string(&path) {
            Ok(json) => EntityMap::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::MappingNotFound(id.to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn delete(&self, id: &DocumentId) -> Result<bool> {
        let path = self.path_for(id);
        self.locks.with_lock(id, || match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Io(e)),
        })
    }

    fn list_ids(&self) -> Result<Vec<DocumentId>> {
        let mut ids: Vec<DocumentId> = std::fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().into_string().ok()?;
                let id = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
                DocumentId::new(id).ok()
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}
