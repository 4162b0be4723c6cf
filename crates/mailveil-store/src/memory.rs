//! In-process mapping store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::MappingStore;
use mailveil_core::{DocumentId, EntityMap, Error, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    maps: RwLock<HashMap<DocumentId, EntityMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappingStore for MemoryStore {
    fn save(&self, id: &DocumentId, map: &EntityMap) -> Result<()> {
        self.maps.write().insert(id.clone(), map.clone());
        Ok(())
    }

    fn load(&self, id: &DocumentId) -> Result<EntityMap> {
        self.maps
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::MappingNotFound(id.to_string()))
    }

    fn delete(&self, id: &DocumentId) -> Result<bool> {
        Ok(self.maps.write().remove(id).is_some())
    }

    fn list_ids(&self) -> Result<Vec<DocumentId>> {
        let mut ids: Vec<DocumentId> = self.maps.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        let id = DocumentId::from_content("hello");
        assert!(matches!(store.load(&id), Err(Error::MappingNotFound(_))));

        let mut map = EntityMap::new();
        map.insert("[PERSON_1]", "Ana").unwrap();
        store.save(&id, &map).unwrap();
        assert_eq!(store.load(&id).unwrap(), map);
        assert_eq!(store.list_ids().unwrap(), vec![id.clone()]);
        assert!(store.delete(&id).unwrap());
        assert!(store.list_ids().unwrap().is_empty());
    }
}
