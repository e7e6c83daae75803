use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_reflect::Reflect;
use vc_reflect::info::{EntryIter, ReflectIter, TypeInfo};

use crate::converter::{Converter, Outcome};
use crate::error::CodecError;

/// Sub-phase of a frame that reads or writes in several steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Phase {
    #[default]
    Start,
    /// Object: next is a member tag.
    Tag,
    /// Object: next is the wire-kind descriptor of the current member.
    Descriptor,
    /// Object: the member value is being processed by a child frame.
    Member,
    /// Map: next is the null marker of a key.
    KeyMarker,
    Key,
    /// Map: next is the null marker of a value.
    ValueMarker,
    Value,
}

// -----------------------------------------------------------------------------
// ReadFrame

/// Resumable progress of one value being decoded.
///
/// Every byte a converter consumes is recorded here before the next read,
/// so a step halted for lack of bytes resumes exactly where it stopped.
#[derive(Default)]
pub(crate) struct ReadFrame {
    /// The type path prefix was read or is not expected.
    pub type_checked: bool,
    /// The null marker of the current value or element was read.
    pub null_checked: bool,
    pub started: bool,
    pub length: usize,
    pub position: usize,
    pub phase: Phase,
    /// The value under construction.
    pub value: Option<Box<dyn Reflect>>,
    /// Array items, assembled once complete.
    pub items: Vec<Box<dyn Reflect>>,
    /// Map key waiting for its value.
    pub key: Option<Box<dyn Reflect>>,
    /// Object member being read, `None` while draining.
    pub slot: Option<usize>,
    /// Concrete type named by a polymorphic type path.
    pub resolved: Option<&'static TypeInfo>,
    /// Type path that could not be resolved.
    pub unresolved: Option<String>,
    /// Outcome of the child frame, set when the child is popped.
    pub child: Option<Outcome>,
}

impl ReadFrame {
    #[inline]
    pub fn new(type_checked: bool) -> Self {
        Self {
            type_checked,
            ..Self::default()
        }
    }

    pub fn value_mut(&mut self, type_path: &'static str) -> Result<&mut dyn Reflect, CodecError> {
        match self.value.as_deref_mut() {
            Some(value) => Ok(value),
            None => Err(CodecError::mismatch(type_path, "no value")),
        }
    }

    pub fn take_value(&mut self, type_path: &'static str) -> Result<Box<dyn Reflect>, CodecError> {
        self.value
            .take()
            .ok_or_else(|| CodecError::mismatch(type_path, "no value"))
    }
}

// -----------------------------------------------------------------------------
// WriteFrame

/// Resumable progress of one value being encoded.
pub(crate) struct WriteFrame<'v> {
    pub value: &'v dyn Reflect,
    pub type_written: bool,
    pub null_written: bool,
    pub started: bool,
    pub length: usize,
    pub position: usize,
    pub phase: Phase,
    pub items: Option<ReflectIter<'v>>,
    pub entries: Option<EntryIter<'v>>,
    /// Element taken from the iterator but not written yet.
    pub item: Option<&'v dyn Reflect>,
    pub entry: Option<(&'v dyn Reflect, &'v dyn Reflect)>,
    /// The child frame finished, set when the child is popped.
    pub child_done: bool,
}

impl<'v> WriteFrame<'v> {
    pub fn new(value: &'v dyn Reflect, type_written: bool) -> Self {
        Self {
            value,
            type_written,
            null_written: false,
            started: false,
            length: 0,
            position: 0,
            phase: Phase::Start,
            items: None,
            entries: None,
            item: None,
            entry: None,
            child_done: false,
        }
    }
}

// -----------------------------------------------------------------------------
// Level

/// One entry of a frame stack.
pub(crate) struct Level<F> {
    pub converter: Arc<Converter>,
    pub frame: F,
}
