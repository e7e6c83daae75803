#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod converter;
mod error;
mod options;
mod shape;
mod state;
mod wire;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-level exports

pub use codec::Codec;
pub use converter::{Binding, Converter, ConverterCache, ConverterKey};
pub use error::{CodecError, ErrorContext};
pub use options::{CodecConfig, CodecOptions};
pub use shape::TypeShape;
pub use state::{ReadOutcome, ReadState, WriteOutcome, WriteState, try_read, try_write};
pub use wire::WireKind;
