use std::collections::BTreeMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Document, StoreError};

/// A typed document collection.
///
/// Mirrors the abstract store contract the catalog handlers consume:
/// find-by-id, find-by-filter, insert, full-document replace, delete-by-id.
pub struct Collection<T> {
    name: &'static str,
    docs: RwLock<BTreeMap<Uuid, T>>,
}

impl<T: Document> Collection<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a single document by id. Absence is not an error here; the
    /// caller decides whether a missing document is a 404 or a redirect.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.get(&id).cloned())
    }

    /// Return the first document matching `filter`, in id order.
    pub async fn find_one<F>(&self, filter: F) -> Result<Option<T>, StoreError>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.docs.read().await;
        Ok(docs.values().find(|doc| filter(doc)).cloned())
    }

    /// Return every document matching `filter`.
    pub async fn find_many<F>(&self, filter: F) -> Result<Vec<T>, StoreError>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.docs.read().await;
        Ok(docs.values().filter(|doc| filter(doc)).cloned().collect())
    }

    /// Insert a document, stamping a fresh id onto it first.
    pub async fn insert(&self, mut doc: T) -> Result<T, StoreError> {
        let id = Uuid::now_v7();
        doc.set_id(id);

        let mut docs = self.docs.write().await;
        docs.insert(id, doc.clone());

        tracing::debug!(collection = self.name, %id, "document inserted");
        Ok(doc)
    }

    /// Replace the full document at `id`. Fails with `NotFound` when the id
    /// does not resolve; never upserts.
    pub async fn replace(&self, id: Uuid, mut doc: T) -> Result<T, StoreError> {
        let mut docs = self.docs.write().await;
        if !docs.contains_key(&id) {
            return Err(StoreError::NotFound {
                collection: self.name,
                id,
            });
        }

        doc.set_id(id);
        docs.insert(id, doc.clone());

        tracing::debug!(collection = self.name, %id, "document replaced");
        Ok(doc)
    }

    /// Delete the document at `id`, failing with `NotFound` when absent.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        if docs.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                collection: self.name,
                id,
            });
        }

        tracing::debug!(collection = self.name, %id, "document deleted");
        Ok(())
    }
}
