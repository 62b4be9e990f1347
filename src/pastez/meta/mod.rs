//! # Metadata Layer
//!
//! Paste records (owner, description, privacy, views, fork lineage) live
//! outside the storage units, behind the [`MetadataStore`] trait. The
//! engine never assumes how they are persisted: the shipped store is a
//! JSON index file, a server deployment would put a database here.
//!
//! ## Implementations
//!
//! - [`json::JsonMetadataStore`]: `pastes.json` under the storage root,
//!   written atomically.
//! - [`memory::MemoryMetadataStore`]: for testing logic without
//!   filesystem I/O.

use crate::error::Result;
use crate::model::Paste;
use uuid::Uuid;

pub mod json;
pub mod memory;

pub use json::JsonMetadataStore;
pub use memory::MemoryMetadataStore;

/// Abstract interface for paste metadata persistence.
///
/// Callers only hand over pastes that already carry an id; the registry
/// binds identity before anything is persisted.
pub trait MetadataStore: Send + Sync {
    /// Persist a new paste record (or overwrite an existing one).
    fn insert(&self, paste: &Paste) -> Result<()>;

    /// Fetch a paste by id. `Ok(None)` when unknown.
    fn get(&self, id: &Uuid) -> Result<Option<Paste>>;

    /// Overwrite an existing record. `NotFound` when the id is unknown.
    fn update(&self, paste: &Paste) -> Result<()>;

    /// All pastes, in no particular order.
    fn list(&self) -> Result<Vec<Paste>>;

    /// Atomically bump the view counter and return the new value.
    /// `NotFound` when the id is unknown.
    fn record_view(&self, id: &Uuid) -> Result<u64>;
}
