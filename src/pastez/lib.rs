//! # Pastez Architecture
//!
//! Pastez is a **versioned paste store library** with a thin CLI client
//! on top. Everything the binary does goes through the public library
//! API, so the same engine can sit behind a web service unchanged.
//!
//! A paste is a named collection of text files with full version history:
//! every add, update, and removal becomes an attributed revision, pastes
//! can be forked, marked private behind a short key, and counted by
//! views.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs + args.rs)                              │
//! │  - Parses arguments, resolves ids, formats output           │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry Layer (registry.rs)                               │
//! │  - Paste lifecycle: create, fork, views, metadata           │
//! │  - Routes file operations, keeps the read cache honest      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (unit.rs + cache.rs)                         │
//! │  - One locked, versioned directory per paste                │
//! │  - Concurrent listing cache, invalidated on every mutation  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pluggable Edges (history/ + meta/)                         │
//! │  - HistoryBackend: six operations over the version tool     │
//! │  - MetadataStore: paste records, JSON file or test double   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: History Behind Six Operations
//!
//! The engine never reimplements version control. Everything it needs
//! from the underlying tool fits in `init`, `add`, `remove`, `commit`,
//! `status`, and `log`; `status` and `log` output stays opaque text all
//! the way to the caller. Swapping git out means writing one small
//! adapter, not touching the engine.
//!
//! ## Concurrency
//!
//! Mutations to the same paste serialize on a per-unit write lock held
//! across the whole write-stage-commit sequence. Reads share a read
//! lock. Different pastes never contend. The read cache is safe because
//! it is only populated inside the read lock and dropped synchronously
//! after every mutation attempt.
//!
//! ## Module Overview
//!
//! - [`registry`]: Paste lifecycle and operation routing, the entry point
//! - [`unit`]: A paste's isolated, versioned directory
//! - [`cache`]: Concurrent file-listing cache
//! - [`history`]: The version-tool seam (git adapter, memory double)
//! - [`meta`]: Metadata persistence seam (JSON store, memory double)
//! - [`model`]: Core data types (`Paste`, `FileRecord`, `Revision`)
//! - [`ident`]: Suffix, private-key, and slug generation
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod ident;
pub mod meta;
pub mod model;
pub mod registry;
pub mod unit;
