//! JSON-file metadata store.

use crate::error::{PastezError, Result};
use crate::meta::MetadataStore;
use crate::model::Paste;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

const METADATA_FILENAME: &str = "pastes.json";

/// Persists the paste index as pretty-printed JSON under the storage
/// root.
///
/// Writes go to a uniquely named temp file first and are renamed into
/// place, so readers never see a partial index. A mutex serializes the
/// load-modify-save cycle of mutations; plain reads skip it because the
/// rename keeps the file consistent at all times.
pub struct JsonMetadataStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonMetadataStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Mutex::new(()),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(METADATA_FILENAME)
    }

    fn load(&self) -> Result<HashMap<Uuid, Paste>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path).map_err(PastezError::Io)?;
        let index: HashMap<Uuid, Paste> =
            serde_json::from_str(&content).map_err(PastezError::Serialization)?;
        Ok(index)
    }

    fn save(&self, index: &HashMap<Uuid, Paste>) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PastezError::Io)?;
        }
        let content = serde_json::to_string_pretty(index).map_err(PastezError::Serialization)?;

        // Atomic write
        let tmp_file = self.root.join(format!(".pastes-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(PastezError::Io)?;
        fs::rename(&tmp_file, self.index_path()).map_err(PastezError::Io)?;

        Ok(())
    }

    fn require_id(paste: &Paste) -> Result<Uuid> {
        paste
            .id
            .ok_or_else(|| PastezError::InvalidInput("paste has no id".to_string()))
    }
}

impl MetadataStore for JsonMetadataStore {
    fn insert(&self, paste: &Paste) -> Result<()> {
        let id = Self::require_id(paste)?;
        let _guard = self.write_lock.lock();

        let mut index = self.load()?;
        index.insert(id, paste.clone());
        self.save(&index)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Paste>> {
        let index = self.load()?;
        Ok(index.get(id).cloned())
    }

    fn update(&self, paste: &Paste) -> Result<()> {
        let id = Self::require_id(paste)?;
        let _guard = self.write_lock.lock();

        let mut index = self.load()?;
        if !index.contains_key(&id) {
            return Err(PastezError::NotFound(id.to_string()));
        }
        index.insert(id, paste.clone());
        self.save(&index)
    }

    fn list(&self) -> Result<Vec<Paste>> {
        let index = self.load()?;
        Ok(index.into_values().collect())
    }

    fn record_view(&self, id: &Uuid) -> Result<u64> {
        let _guard = self.write_lock.lock();

        let mut index = self.load()?;
        let paste = index
            .get_mut(id)
            .ok_or_else(|| PastezError::NotFound(id.to_string()))?;
        paste.views += 1;
        let views = paste.views;
        self.save(&index)?;
        Ok(views)
    }
}
