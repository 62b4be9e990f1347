//! # Paste Registry
//!
//! The registry is the write path and the read path of the whole engine:
//! it creates pastes, routes file operations to the right storage unit,
//! keeps the read cache honest, and persists metadata through the
//! injected [`MetadataStore`].
//!
//! ## Lifecycle
//!
//! `create_paste` is the only place identity is born: it creates the
//! storage unit, allocates the id, generates the private key when asked,
//! and persists the record. Before that, a paste is a draft and every
//! registry operation on it fails with `NotFound`.
//!
//! ## Units and locking
//!
//! Live units are interned in a concurrent map so all threads share one
//! `StorageUnit` (and thus one lock) per paste. Mutations invalidate the
//! read cache synchronously after their commit; listings populate it
//! while still holding the unit's read lock, which is what makes a
//! stale entry impossible to pin.

use crate::cache::ReadCache;
use crate::error::{PastezError, Result};
use crate::history::HistoryBackend;
use crate::ident;
use crate::meta::MetadataStore;
use crate::model::{FileRecord, Paste, Revision, MAX_DESCRIPTION_LEN};
use crate::unit::StorageUnit;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Directory segment used when a paste has no owner.
pub const ANONYMOUS_SEGMENT: &str = "anonymous";

/// Coordinates pastes, their storage units, metadata, and the read
/// cache. Generic over the history backend and the metadata store so
/// tests can swap either.
pub struct PasteRegistry<B, M> {
    base: PathBuf,
    backend: Arc<B>,
    meta: M,
    units: DashMap<Uuid, Arc<StorageUnit<B>>>,
    cache: ReadCache,
}

impl<B: HistoryBackend, M: MetadataStore> PasteRegistry<B, M> {
    /// `base` is the directory all storage units live under.
    pub fn new(base: PathBuf, backend: B, meta: M) -> Self {
        Self {
            base,
            backend: Arc::new(backend),
            meta,
            units: DashMap::new(),
            cache: ReadCache::new(),
        }
    }

    /// Creates and persists a new paste: storage unit, id, private key
    /// (iff `private`), metadata record. Identical owner and description
    /// always produce a distinct storage path.
    pub fn create_paste(
        &self,
        owner: Option<&str>,
        description: &str,
        private: bool,
    ) -> Result<Paste> {
        validate_owner(owner)?;
        validate_description(description)?;

        let segment = owner.unwrap_or(ANONYMOUS_SEGMENT);
        let unit = StorageUnit::create(
            Arc::clone(&self.backend),
            &self.base,
            segment,
            description,
        )?;

        let id = Uuid::new_v4();
        let mut paste = Paste::draft(owner, description, private);
        paste.id = Some(id);
        paste.storage_path = Some(unit.root().to_path_buf());
        if private {
            paste.private_key = ident::private_key();
        }

        self.meta.insert(&paste)?;
        self.units.insert(id, Arc::new(unit));

        info!(id = %id, owner = segment, private, "created paste");
        Ok(paste)
    }

    /// Fetches a persisted paste by id.
    pub fn get_paste(&self, id: &Uuid) -> Result<Paste> {
        self.meta
            .get(id)?
            .ok_or_else(|| PastezError::NotFound(id.to_string()))
    }

    /// Resolves a full or unique-prefix id, hyphens optional. Fails with
    /// `NotFound` for no match and `InvalidInput` for an ambiguous one.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Paste> {
        let needle = prefix.replace('-', "").to_lowercase();
        if needle.is_empty() {
            return Err(PastezError::InvalidInput("empty paste id".to_string()));
        }

        let mut matches: Vec<Paste> = self
            .meta
            .list()?
            .into_iter()
            .filter(|paste| match paste.id {
                Some(id) => id.simple().to_string().starts_with(&needle),
                None => false,
            })
            .collect();

        if matches.is_empty() {
            return Err(PastezError::NotFound(prefix.to_string()));
        }
        if matches.len() > 1 {
            return Err(PastezError::InvalidInput(format!(
                "ambiguous paste id '{}' ({} matches)",
                prefix,
                matches.len()
            )));
        }
        Ok(matches.remove(0))
    }

    /// All pastes, newest first.
    pub fn list_pastes(&self) -> Result<Vec<Paste>> {
        let mut pastes = self.meta.list()?;
        pastes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pastes)
    }

    /// Bumps and returns the paste's view counter.
    pub fn record_view(&self, id: &Uuid) -> Result<u64> {
        self.meta.record_view(id)
    }

    /// Writes a file into the paste and records the revision. The read
    /// cache entry is dropped before this returns, on failure as well:
    /// the write may have reached the tree even when the commit did not.
    pub fn add_file(&self, paste: &Paste, filename: &str, content: &str) -> Result<Revision> {
        let (id, root) = require_persisted(paste)?;
        let unit = self.unit(id, root)?;

        let result = unit.write_file(filename, content);
        self.cache.invalidate(&id);
        let revision = result?;

        debug!(id = %id, filename, action = ?revision.action, "recorded write");
        Ok(revision)
    }

    /// Deletes a file from the paste and records the removal. Fails with
    /// `FileNotFound` when the file is not in the working tree.
    pub fn remove_file(&self, paste: &Paste, filename: &str) -> Result<Revision> {
        let (id, root) = require_persisted(paste)?;
        let unit = self.unit(id, root)?;

        let result = unit.delete_file(filename);
        self.cache.invalidate(&id);
        let revision = result?;

        debug!(id = %id, filename, "recorded removal");
        Ok(revision)
    }

    /// Current files of the paste, sorted by filename. Served from the
    /// read cache when warm; a miss recomputes under the unit's read
    /// lock and repopulates the cache before the lock is released.
    pub fn list_files(&self, paste: &Paste) -> Result<Vec<FileRecord>> {
        let (id, root) = require_persisted(paste)?;

        if let Some(records) = self.cache.get(&id) {
            debug!(id = %id, "listing served from cache");
            return Ok(records);
        }

        let unit = self.unit(id, root)?;
        let guard = unit.read_scope();
        let records = self.cache.put(id, unit.list_files_locked()?);
        drop(guard);
        Ok(records)
    }

    /// Working-tree state as reported by the history tool.
    pub fn status(&self, paste: &Paste) -> Result<String> {
        let (id, root) = require_persisted(paste)?;
        self.unit(id, root)?.status()
    }

    /// Recorded revisions, newest first, as reported by the history
    /// tool.
    pub fn history(&self, paste: &Paste) -> Result<String> {
        let (id, root) = require_persisted(paste)?;
        self.unit(id, root)?.history()
    }

    /// Forks `source` for `new_owner`: fresh unit, fresh id, the source's
    /// current files recorded as a single `Forks {source-id}` revision.
    /// A private source stays private but the fork gets its own key.
    pub fn fork(&self, source: &Paste, new_owner: Option<&str>) -> Result<Paste> {
        validate_owner(new_owner)?;
        let (source_id, source_root) = require_persisted(source)?;
        let source_unit = self.unit(source_id, source_root)?;

        let segment = new_owner.unwrap_or(ANONYMOUS_SEGMENT);
        let fork_unit = StorageUnit::create(
            Arc::clone(&self.backend),
            &self.base,
            segment,
            &source.description,
        )?;

        // Snapshot under the source's read lock so no writer can slip a
        // half-recorded change into the copy.
        let snapshot = {
            let _guard = source_unit.read_scope();
            source_unit.list_files_locked()?
        };
        fork_unit.import_snapshot(&snapshot, &format!("Forks {}", source_id))?;

        let id = Uuid::new_v4();
        let mut paste = Paste::draft(new_owner, &source.description, source.private);
        paste.id = Some(id);
        paste.storage_path = Some(fork_unit.root().to_path_buf());
        paste.fork_of = Some(source_id);
        if paste.private {
            paste.private_key = ident::private_key();
        }

        self.meta.insert(&paste)?;
        self.units.insert(id, Arc::new(fork_unit));

        info!(source = %source_id, fork = %id, "forked paste");
        Ok(paste)
    }

    /// Canonical unit for `id`, opening it on first use. All callers get
    /// the same instance, so the per-unit lock actually serializes.
    fn unit(&self, id: Uuid, root: &Path) -> Result<Arc<StorageUnit<B>>> {
        if let Some(unit) = self.units.get(&id) {
            return Ok(Arc::clone(&unit));
        }
        let opened = Arc::new(StorageUnit::open(
            Arc::clone(&self.backend),
            root.to_path_buf(),
        )?);
        let entry = self.units.entry(id).or_insert(opened);
        Ok(Arc::clone(&entry))
    }
}

/// Drafts have no id and no storage path; every registry operation on
/// one is a `NotFound`.
fn require_persisted(paste: &Paste) -> Result<(Uuid, &Path)> {
    match (paste.id, paste.storage_path.as_deref()) {
        (Some(id), Some(root)) => Ok((id, root)),
        _ => Err(PastezError::NotFound("unsaved paste".to_string())),
    }
}

fn validate_owner(owner: Option<&str>) -> Result<()> {
    let Some(owner) = owner else {
        return Ok(());
    };
    if owner.is_empty() {
        return Err(PastezError::InvalidInput("owner cannot be empty".to_string()));
    }
    if owner.contains('/') || owner.contains('\\') || owner == ".." {
        return Err(PastezError::InvalidInput(format!(
            "owner is not a valid path segment: {}",
            owner
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(PastezError::InvalidInput(format!(
            "description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}
