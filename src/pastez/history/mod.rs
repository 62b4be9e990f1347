//! # Version History Layer
//!
//! This module defines the narrow seam between the paste engine and the
//! underlying version-control tool. The engine never reimplements
//! version-control mechanics; it drives them through exactly six
//! operations and treats `status`/`log` output as opaque text.
//!
//! History is linear per storage unit: one branch, no merges. Every file
//! mutation becomes one revision, recorded by `commit` immediately after
//! the staging call.
//!
//! ## Implementations
//!
//! - [`git::GitBackend`]: production adapter shelling out to the `git`
//!   binary, one process per operation.
//! - [`memory::MemoryBackend`]: in-memory journal for tests, no external
//!   tool required.

use crate::error::Result;
use std::path::Path;

pub mod git;
pub mod memory;

pub use git::GitBackend;
pub use memory::MemoryBackend;

/// Abstract interface for recording paste history.
///
/// Implementations are stateless adapters: every call names the storage
/// root it operates on, so a single backend instance serves all units.
/// Callers serialize mutations per root (the storage unit's write lock);
/// implementations only need to tolerate concurrent calls for distinct
/// roots.
pub trait HistoryBackend: Send + Sync {
    /// Initialize an empty history in `root`. Idempotent: re-initializing
    /// an existing history is not an error.
    fn init(&self, root: &Path) -> Result<()>;

    /// Stage `filename` (relative to `root`) for the next revision. The
    /// file must already exist in the working tree.
    fn add(&self, root: &Path, filename: &str) -> Result<()>;

    /// Delete `filename` from the working tree and stage the removal.
    fn remove(&self, root: &Path, filename: &str) -> Result<()>;

    /// Record everything staged as one revision carrying `message`.
    /// Never retried by callers: a retry could record the change twice.
    fn commit(&self, root: &Path, message: &str) -> Result<()>;

    /// Human-readable working-tree state, including any divergence
    /// between the tree and the recorded history.
    fn status(&self, root: &Path) -> Result<String>;

    /// Recorded revisions as text, newest first. Empty string when
    /// nothing has been committed yet.
    fn log(&self, root: &Path) -> Result<String>;
}
