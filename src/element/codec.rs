//! Element wire codec
//!
//! Each element encodes to a self-delimited tagged record. The reference
//! element is a 32-bit unsigned integer:
//!
//! ```text
//! byte 0:     0xd8   tagged-item prefix
//! byte 1:     0xa3   assigned tag number (163)
//! byte 2:     0x1a   32-bit unsigned integer head
//! bytes 3..7: big-endian u32 value
//! ```

use super::value::Value;
use crate::error::{Error, Result};

/// Tagged-item prefix byte
const TAGGED_ITEM_PREFIX: u8 = 0xd8;

/// Assigned tag number for the u32 element
const TAG_U32: u8 = 163;

/// Head byte for a 32-bit unsigned integer argument
const HEAD_U32: u8 = 26;

const U32_ENCODED_SIZE: u32 = 7;

/// One storable element.
///
/// Adding an element kind means a new variant here, an arm in
/// [`decode_element`], and the matching [`Value`](super::Value) variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    U32(u32),
}

impl Element {
    /// The typed view of this element
    pub fn value(&self) -> Value {
        match self {
            Element::U32(v) => Value::U32(*v),
        }
    }

    /// Exact length of this element's encoded form, in bytes.
    ///
    /// Slab headers cache sums of these, so the value must match what
    /// [`encode`](Self::encode) produces byte for byte.
    pub fn byte_size(&self) -> u32 {
        match self {
            Element::U32(_) => U32_ENCODED_SIZE,
        }
    }

    /// Encode to a freshly allocated buffer
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_size() as usize);
        self.encode_into(&mut buf);
        buf
    }

    /// Append this element's encoded form to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            Element::U32(v) => {
                buf.push(TAGGED_ITEM_PREFIX);
                buf.push(TAG_U32);
                buf.push(HEAD_U32);
                buf.extend_from_slice(&v.to_be_bytes());
            }
        }
    }

    fn decode_u32(data: &[u8]) -> Result<Self> {
        if data.len() < U32_ENCODED_SIZE as usize {
            return Err(Error::ShortInput {
                expected: U32_ENCODED_SIZE as usize,
                actual: data.len(),
            });
        }

        for (i, &expected) in [TAGGED_ITEM_PREFIX, TAG_U32, HEAD_U32].iter().enumerate() {
            if data[i] != expected {
                return Err(Error::TagMismatch {
                    expected,
                    actual: data[i],
                });
            }
        }

        let v = u32::from_be_bytes([data[3], data[4], data[5], data[6]]);
        Ok(Element::U32(v))
    }
}

/// Decode one element from the front of `data`.
///
/// Dispatches on the two-byte tag pair and returns the element together
/// with the unconsumed remainder of the input.
pub fn decode_element(data: &[u8]) -> Result<(Element, &[u8])> {
    if data.len() < 2 {
        return Err(Error::ShortInput {
            expected: 2,
            actual: data.len(),
        });
    }

    match [data[0], data[1]] {
        [TAGGED_ITEM_PREFIX, TAG_U32] => {
            let element = Element::decode_u32(data)?;
            Ok((element, &data[element.byte_size() as usize..]))
        }
        tag => Err(Error::UnknownElementTag(tag)),
    }
}
