//! Wire primitives.
//!
//! All integers and floats are little-endian and fixed width, `usize` and
//! `isize` travel as 64-bit values. Strings are a LEB128 `u32` byte length
//! followed by UTF-8 bytes. Null markers are one byte, collection lengths
//! are `i32`.

// -----------------------------------------------------------------------------
// Modules

mod kind;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use kind::WireKind;

pub(crate) use reader::Reader;
pub(crate) use writer::Writer;

// -----------------------------------------------------------------------------
// Constants

pub(crate) const MARKER_PRESENT: u8 = 0x00;
pub(crate) const MARKER_NULL: u8 = 0x01;

/// Longest LEB128 encoding of a `u32`.
pub(crate) const VARINT_MAX_LEN: usize = 5;

// -----------------------------------------------------------------------------
// Tag

/// A member tag as read from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag<'a> {
    /// The end-of-object sentinel.
    End,
    Index(u32),
    Name(&'a str),
}
