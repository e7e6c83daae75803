//! Resumable read and write states.
//!
//! A state owns an explicit stack of frames, one per value being processed.
//! The drivers run the converter of the top frame until the value is done or
//! the fragment runs out; running out leaves the stack ready to continue.

// -----------------------------------------------------------------------------
// Modules

mod frame;
mod read;
mod write;

// -----------------------------------------------------------------------------
// Exports

pub use read::{ReadOutcome, ReadState, try_read};
pub use write::{WriteOutcome, WriteState, try_write};

pub(crate) use frame::{Level, Phase, ReadFrame, WriteFrame};
