//! In-memory metadata store for testing.

use crate::error::{PastezError, Result};
use crate::meta::MetadataStore;
use crate::model::Paste;
use dashmap::DashMap;
use uuid::Uuid;

/// Metadata store backed by a `DashMap`, for tests that do not care
/// about persistence.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    pastes: DashMap<Uuid, Paste>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn require_id(paste: &Paste) -> Result<Uuid> {
        paste
            .id
            .ok_or_else(|| PastezError::InvalidInput("paste has no id".to_string()))
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn insert(&self, paste: &Paste) -> Result<()> {
        let id = Self::require_id(paste)?;
        self.pastes.insert(id, paste.clone());
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<Paste>> {
        Ok(self.pastes.get(id).map(|entry| entry.value().clone()))
    }

    fn update(&self, paste: &Paste) -> Result<()> {
        let id = Self::require_id(paste)?;
        match self.pastes.get_mut(&id) {
            Some(mut entry) => {
                *entry = paste.clone();
                Ok(())
            }
            None => Err(PastezError::NotFound(id.to_string())),
        }
    }

    fn list(&self) -> Result<Vec<Paste>> {
        Ok(self
            .pastes
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn record_view(&self, id: &Uuid) -> Result<u64> {
        match self.pastes.get_mut(id) {
            Some(mut entry) => {
                entry.views += 1;
                Ok(entry.views)
            }
            None => Err(PastezError::NotFound(id.to_string())),
        }
    }
}
