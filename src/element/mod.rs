//! Element layer
//!
//! Elements are the unit of storage inside leaf slabs. Each element kind
//! has a self-delimited tagged wire form, an exact byte-size accessor
//! the slab layer uses for split/merge accounting, and a typed [`Value`]
//! view handed to callers.
//!
//! The wire format borrows CBOR's tagged-item framing: a `0xd8` prefix
//! byte, the assigned tag number, then the content. Only the byte layout
//! is reproduced here; there is no dependency on a CBOR library.

pub mod codec;
pub mod value;

pub use codec::{decode_element, Element};
pub use value::Value;
