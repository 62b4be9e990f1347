//! # Storage Unit
//!
//! One paste, one directory, one history. A [`StorageUnit`] owns the
//! versioned directory of a single paste and is the only code that
//! touches its working tree.
//!
//! Every mutation runs under the unit's write lock across the whole
//! check-write-stage-commit sequence, so two writers to the same paste
//! serialize and the history records both changes as separate revisions.
//! Reads take the read lock: they run concurrently with each other but
//! never observe a half-committed mutation.
//!
//! Dot-prefixed directory entries are reserved for the history tool's
//! metadata and are invisible to listings; filenames that would collide
//! with that convention are rejected up front.

use crate::error::{PastezError, Result};
use crate::history::HistoryBackend;
use crate::ident;
use crate::model::{FileRecord, Revision, RevisionAction};
use parking_lot::{RwLock, RwLockReadGuard};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A paste's isolated, versioned directory.
///
/// Constructed bound: there is no unit without a directory and an
/// initialized history, so operations never have to check for one.
pub struct StorageUnit<B> {
    root: PathBuf,
    backend: Arc<B>,
    lock: RwLock<()>,
}

impl<B: HistoryBackend> StorageUnit<B> {
    /// Creates a fresh unit under `base/owner_segment/`, naming the
    /// directory after the description slug plus a random suffix. The
    /// suffix is what makes the path unique; identical inputs always get
    /// distinct directories.
    pub fn create(
        backend: Arc<B>,
        base: &Path,
        owner_segment: &str,
        description: &str,
    ) -> Result<Self> {
        let dirname = ident::storage_dirname(description, &ident::storage_suffix());
        let root = base.join(owner_segment).join(dirname);

        fs::create_dir_all(&root)
            .map_err(|e| PastezError::StorageInit(format!("{}: {}", root.display(), e)))?;
        backend.init(&root).map_err(|e| match e {
            PastezError::Backend(msg) => PastezError::StorageInit(msg),
            other => other,
        })?;

        Ok(Self {
            root,
            backend,
            lock: RwLock::new(()),
        })
    }

    /// Rebinds an existing unit directory, e.g. after a restart.
    pub fn open(backend: Arc<B>, root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(PastezError::NotFound(root.display().to_string()));
        }
        Ok(Self {
            root,
            backend,
            lock: RwLock::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `filename` and records the change as one
    /// revision. A new file is recorded as `Adds`, an overwrite as
    /// `Updates`; overwriting with identical content still records a
    /// revision.
    pub fn write_file(&self, filename: &str, content: &str) -> Result<Revision> {
        validate_filename(filename)?;
        let _guard = self.lock.write();

        let path = self.root.join(filename);
        let action = if path.exists() {
            RevisionAction::Updated
        } else {
            RevisionAction::Added
        };

        fs::write(&path, content)?;
        self.backend.add(&self.root, filename)?;

        let revision = Revision::new(action, filename);
        self.backend.commit(&self.root, &revision.message)?;
        Ok(revision)
    }

    /// Deletes `filename` from the working tree and records the removal.
    /// Deleting a file that is not present fails with `FileNotFound` and
    /// records nothing.
    pub fn delete_file(&self, filename: &str) -> Result<Revision> {
        validate_filename(filename)?;
        let _guard = self.lock.write();

        let path = self.root.join(filename);
        if !path.is_file() {
            return Err(PastezError::FileNotFound(filename.to_string()));
        }

        self.backend.remove(&self.root, filename)?;

        let revision = Revision::new(RevisionAction::Removed, filename);
        self.backend.commit(&self.root, &revision.message)?;
        Ok(revision)
    }

    /// Current files of the paste, sorted by filename.
    pub fn list_files(&self) -> Result<Vec<FileRecord>> {
        let _guard = self.lock.read();
        self.list_files_locked()
    }

    /// Working-tree state as reported by the history tool.
    pub fn status(&self) -> Result<String> {
        let _guard = self.lock.read();
        self.backend.status(&self.root)
    }

    /// Recorded revisions, newest first.
    pub fn history(&self) -> Result<String> {
        let _guard = self.lock.read();
        self.backend.log(&self.root)
    }

    /// Takes the unit's read lock. The registry holds this guard while
    /// populating the read cache, so a listing computed here can never
    /// be installed after a later mutation's invalidation.
    pub(crate) fn read_scope(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read()
    }

    /// Reads the working tree into records. Caller must hold the unit
    /// lock.
    pub(crate) fn list_files_locked(&self) -> Result<Vec<FileRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let filename = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            // History metadata lives in dot-prefixed entries.
            if filename.starts_with('.') {
                continue;
            }
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let content = fs::read_to_string(&path)?;
            records.push(FileRecord {
                filename,
                path,
                content,
            });
        }
        records.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(records)
    }

    /// Copies `records` into this unit's tree and records them as a
    /// single revision. Used by fork: the whole snapshot arrives as one
    /// commit, even when the source had no files.
    pub(crate) fn import_snapshot(&self, records: &[FileRecord], message: &str) -> Result<()> {
        let _guard = self.lock.write();
        for record in records {
            validate_filename(&record.filename)?;
            let path = self.root.join(&record.filename);
            fs::write(&path, &record.content)?;
            self.backend.add(&self.root, &record.filename)?;
        }
        self.backend.commit(&self.root, message)?;
        Ok(())
    }
}

/// Filenames live flat inside the unit directory: no separators, no
/// traversal, and no dot prefix (reserved for history metadata).
fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(PastezError::InvalidInput("filename cannot be empty".to_string()));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(PastezError::InvalidInput(format!(
            "filename cannot contain path separators: {}",
            filename
        )));
    }
    if filename.starts_with('.') {
        return Err(PastezError::InvalidInput(format!(
            "filename cannot start with a dot: {}",
            filename
        )));
    }
    Ok(())
}
