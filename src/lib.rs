//! # Takeout Consolidator
//!
//! Turns the flat, duplicated file pool of a photo-service export archive
//! into a single de-duplicated, album-aware library on disk.
//!
//! ## Core Philosophy
//! - **Never lose a file** - every entity yields at least one placement,
//!   even when its only physical copy lives inside an album folder
//! - **Per-operation failure** - one bad file never aborts the run
//! - **Deterministic merging** - duplicate resolution follows a documented
//!   quality ordering, not whichever file happened to be hashed first
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation layers:
//! - `core` - grouping, album merging and the moving-strategy engine
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - error types for every pipeline phase

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{ConsolidatorError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
