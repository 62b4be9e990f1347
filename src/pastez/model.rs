//! # Domain Model: Pastes, Files, and Revisions
//!
//! A [`Paste`] is a named collection of text files. The files themselves
//! live in the paste's versioned storage directory; the `Paste` struct is
//! the metadata record around it (owner, description, privacy, views,
//! fork lineage).
//!
//! ## Draft vs. persisted
//!
//! A paste starts as a *draft*: no identifier, no storage path. Only the
//! registry can persist it, which binds both fields at once. Every file
//! operation on a draft fails with `NotFound`, since the storage unit
//! does not exist until creation completes.
//!
//! ## Privacy
//!
//! Private pastes carry a short `private_key` that gates access alongside
//! ownership. The key is deliberately small (5 alphanumeric characters,
//! see [`crate::ident`]): it is URL obscurity for casual sharing, not a
//! security boundary, and downstream code depends on the short-token URL
//! format.
//!
//! ## Revisions
//!
//! Every committed file mutation produces a [`Revision`] with the commit
//! message the history backend recorded: `Adds {file}`, `Updates {file}`
//! or `Removes {file}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Longest accepted paste description. Descriptions only feed the
/// storage-path slug and listings, so the cap is generous.
pub const MAX_DESCRIPTION_LEN: usize = 120;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paste {
    /// Set when the registry persists the paste; `None` marks a draft.
    pub id: Option<Uuid>,
    /// Reference to an external identity. `None` means anonymous.
    pub owner: Option<String>,
    pub description: String,
    /// Absolute path of the paste's versioned directory. Bound exactly
    /// once, at creation, together with `id`.
    pub storage_path: Option<PathBuf>,
    pub private: bool,
    /// Non-empty iff `private` is set.
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
    /// Source paste for forks, `None` for originals.
    pub fork_of: Option<Uuid>,
}

impl Paste {
    /// Creates an unsaved paste. Drafts reject all file operations until
    /// the registry persists them and binds a storage path.
    pub fn draft(owner: Option<&str>, description: &str, private: bool) -> Self {
        Self {
            id: None,
            owner: owner.map(|o| o.to_string()),
            description: description.to_string(),
            storage_path: None,
            private,
            private_key: String::new(),
            views: 0,
            created_at: Utc::now(),
            fork_of: None,
        }
    }

    /// Whether `viewer` (an owner reference) or a presented `key` may read
    /// this paste.
    ///
    /// Public pastes are readable by anyone. Private pastes are readable
    /// by their owner or by anyone presenting the private key. This is
    /// best-effort obfuscation: the key is guessable by a determined
    /// attacker and callers must not treat it as access control.
    pub fn grants_access(&self, viewer: Option<&str>, key: Option<&str>) -> bool {
        if !self.private {
            return true;
        }
        if let (Some(viewer), Some(owner)) = (viewer, self.owner.as_deref()) {
            if viewer == owner {
                return true;
            }
        }
        match key {
            Some(key) => !self.private_key.is_empty() && key == self.private_key,
            None => false,
        }
    }
}

/// One file of a paste, reconstructed from the storage unit's working
/// tree. Never persisted on its own: always recomputed or served from
/// the read cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub filename: String,
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionAction {
    Added,
    Updated,
    Removed,
}

impl RevisionAction {
    /// Commit message for this action, matching the recorded history.
    pub fn message(&self, filename: &str) -> String {
        match self {
            RevisionAction::Added => format!("Adds {}", filename),
            RevisionAction::Updated => format!("Updates {}", filename),
            RevisionAction::Removed => format!("Removes {}", filename),
        }
    }
}

/// One atomic, committed change to a paste's file set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub action: RevisionAction,
    pub filename: String,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

impl Revision {
    pub fn new(action: RevisionAction, filename: &str) -> Self {
        Self {
            action,
            filename: filename.to_string(),
            message: action.message(filename),
            recorded_at: Utc::now(),
        }
    }
}
