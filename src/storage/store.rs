//! Slab persistence contract and the in-memory ledger

use super::id::StorageId;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Anything that can be written to a slab store: named by a storage id,
/// sized, and encodable to its self-describing wire form.
pub trait Slab {
    /// The id this slab is stored under
    fn id(&self) -> StorageId;

    /// Exact length of the encoded form, in bytes
    fn byte_size(&self) -> u32;

    /// Encode to the self-describing wire form
    fn encode(&self) -> Vec<u8>;
}

/// Slab store contract.
///
/// `retrieve` hands back the encoded bytes; the caller picks the decode
/// entry point since the slab kind is known wherever the id came from.
pub trait SlabStore {
    /// Store a slab under its own id, replacing any previous version
    fn store(&self, slab: &dyn Slab) -> Result<()>;

    /// Fetch the encoded bytes for `id`, if present
    fn retrieve(&self, id: StorageId) -> Result<Option<Vec<u8>>>;

    /// Drop the slab stored under `id`
    fn remove(&self, id: StorageId);

    /// Whether `id` is present
    fn contains(&self, id: StorageId) -> bool;
}

/// In-memory slab store.
///
/// Think of it as a ledger: every stored slab is kept, keyed by id,
/// until removed. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemorySlabStore {
    slabs: Arc<Mutex<HashMap<StorageId, Vec<u8>>>>,
}

impl MemorySlabStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slabs held
    pub fn len(&self) -> usize {
        self.slabs.lock().unwrap().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.slabs.lock().unwrap().is_empty()
    }

    /// Drop all slabs
    pub fn clear(&self) {
        self.slabs.lock().unwrap().clear();
    }
}

impl SlabStore for MemorySlabStore {
    fn store(&self, slab: &dyn Slab) -> Result<()> {
        self.slabs.lock().unwrap().insert(slab.id(), slab.encode());
        Ok(())
    }

    fn retrieve(&self, id: StorageId) -> Result<Option<Vec<u8>>> {
        Ok(self.slabs.lock().unwrap().get(&id).cloned())
    }

    fn remove(&self, id: StorageId) {
        self.slabs.lock().unwrap().remove(&id);
    }

    fn contains(&self, id: StorageId) -> bool {
        self.slabs.lock().unwrap().contains_key(&id)
    }
}
