//! SQLite-backed mapping store: one row per document id.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::schema::SCHEMA_SQL;
use crate::MappingStore;
use mailveil_core::{DocumentId, EntityMap, Error, Result};

pub struct SqliteMappingStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteMappingStore {
    /// Open or create the database file.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }
        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };
        info!(
            "SqliteMappingStore initialized: {} mappings, path={}",
            store.count()?,
            store.db_path.display()
        );
        Ok(store)
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Database(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM entity_mappings", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }
}

impl MappingStore for SqliteMappingStore {
    fn save(&self, id: &DocumentId, map: &EntityMap) -> Result<()> {
        let json = serde_json::to_string(map)?;
        let now = chrono::Utc::now().timestamp_millis();
        // the connection mutex serializes all writers, per id included
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO entity_mappings (document_id, mapping_json, entry_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(document_id) DO UPDATE SET
                mapping_json = excluded.mapping_json,
                entry_count = excluded.entry_count,
                updated_at = excluded.updated_at",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![id.as_str(), json, map.len() as i64, now])
        .map_err(|e| Error::Database(e.to_string()))?;
        debug!("Saved {} entries for {}", map.len(), id);
        Ok(())
    }

    fn load(&self, id: &DocumentId) -> Result<EntityMap> {
        let conn = self.conn.lock();
        let json: Option<String> = conn
            .prepare_cached("SELECT mapping_json FROM entity_mappings WHERE document_id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id.as_str()], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        match json {
            Some(json) => EntityMap::from_json(&json),
            None => Err(Error::MappingNotFound(id.to_string())),
        }
    }

    fn delete(&self, id: &DocumentId) -> Result<bool> {
        let conn = self.conn.lock();
        let removed = conn
            .execute(
                "DELETE FROM entity_mappings WHERE document_id = ?1",
                params![id.as_str()],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(removed > 0)
    }

    fn list_ids(&self) -> Result<Vec<DocumentId>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT document_id FROM entity_mappings ORDER BY document_id")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        let mut ids = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| Error::Database(e.to_string()))?;
            ids.push(DocumentId::new(raw)?);
        }
        Ok(ids)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> EntityMap {
        let mut map = EntityMap::new();
        map.insert("[ORGANIZATION_1]", "Mahan Pharmed Chem. Co.").unwrap();
        map.insert("[DATE_2]", "2024.11.24").unwrap();
        map
    }

    #[test]
    fn test_save_load_roundtrip_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mailveil.db");
        let id = DocumentId::new("email_2").unwrap();
        {
            let store = SqliteMappingStore::open(&path).unwrap();
            store.save(&id, &sample()).unwrap();
        }
        let reopened = SqliteMappingStore::open(&path).unwrap();
        assert_eq!(reopened.load(&id).unwrap(), sample());
        assert_eq!(reopened.count().unwrap(), 1);
    }

    #[test]
    fn test_overwrite_and_delete() {
        let store = SqliteMappingStore::open_in_memory().unwrap();
        let id = DocumentId::new("x").unwrap();
        store.save(&id, &sample()).unwrap();

        let mut replacement = EntityMap::new();
        replacement.insert("[PERSON_1]", "Naveen").unwrap();
        store.save(&id, &replacement).unwrap();
        assert_eq!(store.load(&id).unwrap(), replacement);
        assert_eq!(store.count().unwrap(), 1);

        assert_eq!(store.list_ids().unwrap(), vec![id.clone()]);
        assert!(store.delete(&id).unwrap());
        assert!(matches!(store.load(&id), Err(Error::MappingNotFound(_))));
    }
}
