//! Meta slab: the directory of leaf slabs composing one logical array
//!
//! All user operations route through here. The meta slab locates the
//! leaf holding a logical index by walking cumulative counts, delegates
//! the mutation, then repairs any threshold violation: a leaf pushed
//! above the maximum is split, a leaf dropped below the minimum is
//! merged into a neighbour. A merge is followed by at most one split,
//! so every operation performs O(1) structural changes.

use super::leaf::LeafSlab;
use super::{Thresholds, HEADER_ENTRY_SIZE, META_FRAMING_SIZE};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::storage::{IdGenerator, Slab, StorageId};
use std::sync::Arc;
use tracing::debug;

/// Ordered sequence of leaf slabs forming one logical array.
///
/// Owns its leaves exclusively; leaf headers are read for routing and
/// rebalancing decisions, bodies only for element access.
#[derive(Debug)]
pub struct MetaSlab {
    id: StorageId,
    leaves: Vec<LeafSlab>,
    thresholds: Thresholds,
    ids: Arc<IdGenerator>,
}

impl MetaSlab {
    /// Create an empty meta slab with a freshly minted id
    pub fn new(thresholds: Thresholds, ids: Arc<IdGenerator>) -> Self {
        Self {
            id: ids.next(),
            leaves: Vec::new(),
            thresholds,
            ids,
        }
    }

    pub(crate) fn leaves(&self) -> &[LeafSlab] {
        &self.leaves
    }

    /// Total number of elements across all leaves
    pub fn count(&self) -> u32 {
        self.leaves.iter().map(|l| l.header().count).sum()
    }

    /// Leaf index and leaf-local position holding logical `index`
    fn locate(&self, index: u32) -> Option<(usize, u32)> {
        let mut start = 0u32;
        for (i, leaf) in self.leaves.iter().enumerate() {
            let count = leaf.header().count;
            if index < start + count {
                return Some((i, index - start));
            }
            start += count;
        }
        None
    }

    /// Element at logical `index`
    pub fn get(&self, index: u32) -> Result<&Element> {
        let (i, local) = self.locate(index).ok_or_else(|| Error::OutOfBounds {
            index,
            len: self.count(),
        })?;
        self.leaves[i].get(local)
    }

    /// Append an element to the end of the array.
    ///
    /// Opens a fresh leaf when there is none, or when the element would
    /// push the last leaf past the maximum threshold; by construction
    /// the last leaf never needs a split check.
    pub fn append(&mut self, v: Element) {
        if let Some(last) = self.leaves.last_mut() {
            if last.header().size + v.byte_size() <= self.thresholds.max() {
                last.append(v);
                return;
            }
        }

        let mut leaf = LeafSlab::new(self.ids.next());
        debug!(slab = %leaf.header().id, "opened fresh leaf for append");
        leaf.append(v);
        self.leaves.push(leaf);
    }

    /// Insert an element before logical `index`.
    ///
    /// `index == count()` grows the array the same way `append` does.
    pub fn insert(&mut self, index: u32, v: Element) -> Result<()> {
        if index == self.count() {
            self.append(v);
            return Ok(());
        }

        let (i, local) = self.locate(index).ok_or_else(|| Error::OutOfBounds {
            index,
            len: self.count(),
        })?;
        self.leaves[i].insert(local, v)?;

        if self.leaves[i].header().size > self.thresholds.max() {
            self.split(i);
        }
        Ok(())
    }

    /// Replace the element at logical `index`, returning the previous
    /// one
    pub fn set(&mut self, index: u32, v: Element) -> Result<Element> {
        let (i, local) = self.locate(index).ok_or_else(|| Error::OutOfBounds {
            index,
            len: self.count(),
        })?;
        let old = self.leaves[i].set(local, v)?;

        let size = self.leaves[i].header().size;
        if size > self.thresholds.max() {
            self.split(i);
        } else if size < self.thresholds.min() {
            self.merge(i);
        }
        Ok(old)
    }

    /// Remove and return the element at logical `index`
    pub fn remove(&mut self, index: u32) -> Result<Element> {
        let (i, local) = self.locate(index).ok_or_else(|| Error::OutOfBounds {
            index,
            len: self.count(),
        })?;
        let removed = self.leaves[i].remove(local)?;

        if self.leaves[i].header().size < self.thresholds.min() {
            self.merge(i);
        }
        Ok(removed)
    }

    /// Split the overflowing leaf at position `i`, placing the new
    /// right half immediately after it
    fn split(&mut self, i: usize) {
        if let Some(right) = self.leaves[i].split(&self.ids) {
            debug!(
                left = %self.leaves[i].header().id,
                right = %right.header().id,
                "split overflowing leaf"
            );
            self.leaves.insert(i + 1, right);
        }
    }

    /// Merge the underfull leaf at position `i` into a neighbour.
    ///
    /// A lone leaf stays as it is. The first leaf absorbs its
    /// successor, the last folds into its predecessor; in the middle
    /// the smaller neighbour wins. The combined leaf gets at most one
    /// follow-up split and no further rebalancing.
    fn merge(&mut self, i: usize) {
        if self.leaves.len() == 1 {
            return;
        }

        let (target, absorbed) = if i == 0 {
            let next = self.leaves.remove(1);
            let absorbed = next.header().id;
            self.leaves[0].merge(next);
            (0, absorbed)
        } else if i == self.leaves.len() - 1 {
            let last = self.leaves.remove(i);
            let absorbed = last.header().id;
            self.leaves[i - 1].merge(last);
            (i - 1, absorbed)
        } else if self.leaves[i - 1].header().size <= self.leaves[i + 1].header().size {
            let mid = self.leaves.remove(i);
            let absorbed = mid.header().id;
            self.leaves[i - 1].merge(mid);
            (i - 1, absorbed)
        } else {
            let next = self.leaves.remove(i + 1);
            let absorbed = next.header().id;
            self.leaves[i].merge(next);
            (i, absorbed)
        };

        debug!(
            into = %self.leaves[target].header().id,
            %absorbed,
            "merged underfull leaf"
        );

        if self.leaves[target].header().size > self.thresholds.max() {
            self.split(target);
        }
    }

    /// Reconstruct a meta slab and all its leaves from encoded bytes.
    ///
    /// The meta id and every leaf id come from the wire; `thresholds`
    /// and `ids` govern subsequent mutations.
    pub fn decode(data: &[u8], thresholds: Thresholds, ids: Arc<IdGenerator>) -> Result<Self> {
        if data.len() < META_FRAMING_SIZE as usize {
            return Err(Error::ShortInput {
                expected: META_FRAMING_SIZE as usize,
                actual: data.len(),
            });
        }

        let id = StorageId::new(u32::from_be_bytes([data[0], data[1], data[2], data[3]]));
        let slab_count = u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize;

        let mut meta = Self {
            id,
            leaves: Vec::new(),
            thresholds,
            ids,
        };
        if slab_count == 0 {
            return Ok(meta);
        }

        let table_end = (META_FRAMING_SIZE as usize) + slab_count * (HEADER_ENTRY_SIZE as usize);
        if data.len() < table_end {
            return Err(Error::ShortInput {
                expected: table_end,
                actual: data.len(),
            });
        }

        let mut offset = table_end;
        for n in 0..slab_count {
            let entry = (META_FRAMING_SIZE as usize) + n * (HEADER_ENTRY_SIZE as usize);
            let leaf_id = u32::from_be_bytes([
                data[entry],
                data[entry + 1],
                data[entry + 2],
                data[entry + 3],
            ]);
            let leaf_size = u32::from_be_bytes([
                data[entry + 4],
                data[entry + 5],
                data[entry + 6],
                data[entry + 7],
            ]) as usize;

            let end = offset + leaf_size;
            if data.len() < end {
                return Err(Error::ShortInput {
                    expected: end,
                    actual: data.len(),
                });
            }

            let leaf = LeafSlab::decode(StorageId::new(leaf_id), &data[offset..end])?;
            meta.leaves.push(leaf);
            offset = end;
        }

        debug!(slabs = slab_count, elements = meta.count(), "decoded meta slab");
        Ok(meta)
    }
}

impl Slab for MetaSlab {
    fn id(&self) -> StorageId {
        self.id
    }

    fn byte_size(&self) -> u32 {
        META_FRAMING_SIZE
            + HEADER_ENTRY_SIZE * self.leaves.len() as u32
            + self.leaves.iter().map(|l| l.header().size).sum::<u32>()
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_size() as usize);

        buf.extend_from_slice(&self.id.as_u32().to_be_bytes());
        buf.extend_from_slice(&(self.leaves.len() as u32).to_be_bytes());

        for leaf in &self.leaves {
            buf.extend_from_slice(&leaf.header().id.as_u32().to_be_bytes());
            buf.extend_from_slice(&leaf.header().size.to_be_bytes());
        }
        for leaf in &self.leaves {
            leaf.encode_into(&mut buf);
        }

        buf
    }
}
