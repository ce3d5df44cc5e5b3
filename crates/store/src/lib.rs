//! Entity Store for STACKS: typed, in-memory document collections.
//!
//! Each [`Collection`] owns one kind of document behind an async `RwLock`, so
//! a store call is the only suspension point a request sees. Writes are
//! last-write-wins; there is no optimistic concurrency token.

use thiserror::Error;
use uuid::Uuid;

pub mod collection;

pub use collection::Collection;

/// Errors surfaced by store operations.
///
/// `NotFound` is returned by operations that require the id to resolve
/// (`replace`, `delete_by_id`); lookups report absence through `Option`
/// instead. Store errors are never classified or retried by callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no {collection} document with id {id}")]
    NotFound { collection: &'static str, id: Uuid },

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// A document that can live in a [`Collection`].
///
/// The store owns id assignment: `insert` stamps a fresh UUID onto the
/// document before storing it.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
}
