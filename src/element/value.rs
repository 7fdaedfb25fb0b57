//! Typed views over stored elements

use super::codec::Element;

/// A caller-facing view of one stored element.
///
/// The slab layer only ever sees [`Element`]s; `Value` is what the
/// surrounding interpreter works with. Converting between the two is
/// lossless in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    U32(u32),
}

impl Value {
    /// Get as u32
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(v) => Some(*v),
        }
    }

    /// The encodable element form of this value
    pub fn element(&self) -> Element {
        match self {
            Value::U32(v) => Element::U32(*v),
        }
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}
