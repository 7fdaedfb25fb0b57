//! User-facing array value
//!
//! [`Array`] is a thin facade over the meta slab: every sequence
//! operation forwards verbatim, and callers work with [`Value`]s rather
//! than raw elements. Two arrays compare equal when they hold the same
//! logical sequence, regardless of slab layout or identifiers.

use crate::element::Value;
use crate::error::Result;
use crate::slab::{MetaSlab, Thresholds};
use crate::storage::{IdGenerator, Slab, StorageId};
use std::sync::Arc;
use tracing::debug;

/// A segmented, persistable array of values.
///
/// Arbitrarily large logical arrays stay splittable into bounded-size
/// slabs suitable for a content-addressed key-value store; encoding and
/// decoding round-trip the full structure.
#[derive(Debug)]
pub struct Array {
    meta: MetaSlab,
}

impl Array {
    /// Create an empty array with default thresholds
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self::with_thresholds(Thresholds::default(), ids)
    }

    /// Create an empty array with custom slab-size thresholds
    pub fn with_thresholds(thresholds: Thresholds, ids: Arc<IdGenerator>) -> Self {
        Self {
            meta: MetaSlab::new(thresholds, ids),
        }
    }

    /// Build an array by appending each value in order
    pub fn from_values(values: &[Value], ids: Arc<IdGenerator>) -> Self {
        let mut array = Self::new(ids);
        for v in values {
            array.append(*v);
        }
        array
    }

    /// Reconstruct an array from its encoded form.
    ///
    /// A failed decode returns no partial array.
    pub fn from_encoded(data: &[u8], ids: Arc<IdGenerator>) -> Result<Self> {
        let meta = MetaSlab::decode(data, Thresholds::default(), ids)?;
        debug!(id = %meta.id(), elements = meta.count(), "reconstructed array from encoded data");
        Ok(Self { meta })
    }

    /// The storage id of the underlying meta slab
    pub fn id(&self) -> StorageId {
        self.meta.id()
    }

    /// Number of elements in the array
    pub fn len(&self) -> u32 {
        self.meta.count()
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`
    pub fn get(&self, index: u32) -> Result<Value> {
        Ok(self.meta.get(index)?.value())
    }

    /// Append a value to the end of the array
    pub fn append(&mut self, value: Value) {
        self.meta.append(value.element());
    }

    /// Insert a value before `index`; `index == len()` appends
    pub fn insert(&mut self, index: u32, value: Value) -> Result<()> {
        self.meta.insert(index, value.element())
    }

    /// Remove and return the value at `index`
    pub fn remove(&mut self, index: u32) -> Result<Value> {
        Ok(self.meta.remove(index)?.value())
    }

    /// Replace the value at `index`, returning the previous one
    pub fn set(&mut self, index: u32, value: Value) -> Result<Value> {
        Ok(self.meta.set(index, value.element())?.value())
    }

    /// Encode the whole array to its self-describing wire form
    pub fn encode(&self) -> Vec<u8> {
        self.meta.encode()
    }

    /// Exact length of the encoded form, in bytes
    pub fn byte_size(&self) -> u32 {
        self.meta.byte_size()
    }

    /// Values in logical order
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.meta
            .leaves()
            .iter()
            .flat_map(|leaf| leaf.elements().iter())
            .map(|e| e.value())
    }

    /// Layout introspection: element count, slab count, encoded size
    pub fn stats(&self) -> ArrayStats {
        ArrayStats {
            element_count: self.meta.count(),
            slab_count: self.meta.leaves().len(),
            byte_size: self.meta.byte_size(),
        }
    }
}

impl Slab for Array {
    fn id(&self) -> StorageId {
        self.id()
    }

    fn byte_size(&self) -> u32 {
        self.byte_size()
    }

    fn encode(&self) -> Vec<u8> {
        self.encode()
    }
}

impl PartialEq for Array {
    /// Logical equality: same values in the same order
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

/// Snapshot of an array's physical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayStats {
    pub element_count: u32,
    pub slab_count: usize,
    pub byte_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn u32_values(range: std::ops::Range<u32>) -> Vec<Value> {
        range.map(Value::U32).collect()
    }

    #[test]
    fn test_from_values_and_get() -> Result<()> {
        let array = Array::from_values(&u32_values(0..10), Arc::new(IdGenerator::new()));

        assert_eq!(array.len(), 10);
        assert!(!array.is_empty());
        for i in 0..10 {
            assert_eq!(array.get(i)?, Value::U32(i));
        }
        assert_eq!(
            array.get(10).unwrap_err(),
            Error::OutOfBounds { index: 10, len: 10 }
        );
        Ok(())
    }

    #[test]
    fn test_iter_matches_gets() {
        let array = Array::from_values(&u32_values(0..20), Arc::new(IdGenerator::new()));
        let collected: Vec<Value> = array.iter().collect();
        assert_eq!(collected, u32_values(0..20));
    }

    #[test]
    fn test_logical_equality_ignores_layout() -> Result<()> {
        // Same sequence, different construction path and ids
        let a = Array::from_values(&u32_values(0..12), Arc::new(IdGenerator::new()));

        let mut b = Array::new(Arc::new(IdGenerator::starting_at(500)));
        for v in (0..12).rev() {
            b.insert(0, Value::U32(v))?;
        }

        assert_eq!(a, b);

        b.append(Value::U32(99));
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_stats_reflect_layout() {
        let ids = Arc::new(IdGenerator::new());
        let array = Array::from_values(&u32_values(0..8), ids);

        let stats = array.stats();
        assert_eq!(stats.element_count, 8);
        assert_eq!(stats.slab_count, 2);
        assert_eq!(stats.byte_size, array.encode().len() as u32);
    }

    #[test]
    fn test_remove_and_set_return_previous_values() -> Result<()> {
        let mut array = Array::from_values(&u32_values(0..3), Arc::new(IdGenerator::new()));

        assert_eq!(array.set(1, Value::U32(9))?, Value::U32(1));
        assert_eq!(array.remove(0)?, Value::U32(0));
        assert_eq!(array.iter().collect::<Vec<_>>(), vec![Value::U32(9), Value::U32(2)]);
        Ok(())
    }
}
