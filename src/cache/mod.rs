//! Fetch-on-demand cache for remote entity documents.
//!
//! Each entity is backed by a [`LazyObject`] that:
//! - Serves fields from its last fetched JSON document while it is fresh
//! - Refetches the whole document on a miss or after invalidation
//! - Replaces the cached document wholesale, never merging fields
//! - Surfaces fetch failures to the caller instead of masking them

mod layer;
mod storage;
mod traits;

pub use layer::LazyObject;
pub use storage::{Document, Freshness, RemoteState};
pub use traits::{FieldRead, ReadSource, RemoteEntity};
