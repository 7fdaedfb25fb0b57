//! Storage identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Unique name for a slab within one logical array's lifetime.
///
/// Identifiers are assigned on slab creation and survive every mutation
/// of the slab they name; a split mints one new identifier for the
/// right half. Uniqueness across processes is the storage backend's
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StorageId(u32);

impl StorageId {
    /// Create a storage id from its raw wire value
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw 32-bit value, as written on the wire
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slab({})", self.0)
    }
}

/// Monotonic storage id source.
///
/// Injected into the structures that mint ids rather than being process
/// global state, so tests can pin identifiers deterministically. Safe to
/// share across threads; ids never repeat within one generator.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU32,
}

impl IdGenerator {
    /// Create a generator starting at id 0
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a generator whose first minted id is `first`.
    ///
    /// Useful for resuming past identifiers already present in a store,
    /// and for pinning ids in tests.
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    /// Mint the next id
    pub fn next(&self) -> StorageId {
        StorageId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next(), StorageId::new(0));
        assert_eq!(ids.next(), StorageId::new(1));
        assert_eq!(ids.next(), StorageId::new(2));
    }

    #[test]
    fn test_starting_at_pins_ids() {
        let ids = IdGenerator::starting_at(100);
        assert_eq!(ids.next(), StorageId::new(100));
        assert_eq!(ids.next(), StorageId::new(101));
    }

    #[test]
    fn test_display() {
        assert_eq!(StorageId::new(5).to_string(), "Slab(5)");
    }
}
