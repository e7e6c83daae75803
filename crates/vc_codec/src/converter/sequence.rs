use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use vc_reflect::Reflect;
use vc_reflect::info::ReflectIter;

use super::{
    Converter, ElementSlot, Outcome, ReadContext, ReadStep, SequenceAccess, WriteStep, push,
    push_value,
};
use crate::error::{CodecError, ErrorContext, Halt, Progress};
use crate::options::CodecOptions;
use crate::state::{ReadFrame, WriteFrame};
use crate::wire::{Reader, Writer};

/// Upper bound of the capacity reserved from a length read off the wire.
const MAX_PREALLOC: usize = 4096;

// Layout: `[type-path]? length:i32 { null-marker element }*length`.

// -----------------------------------------------------------------------------
// Read

pub(super) fn read(
    converter: &Converter,
    access: SequenceAccess,
    element: &ElementSlot,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    let type_path = converter.type_path();
    if let SequenceAccess::Enumerable(_) = access {
        return Err(CodecError::WriteOnlyShape {
            type_path,
            path: String::from(type_path),
        }
        .into());
    }

    converter.read_type_path(frame, reader, cx)?;
    if !frame.started {
        let length = reader.try_read_len()?;
        frame.length = length;
        frame.started = true;
        open(access, frame, length)?;
    }

    if let Some(outcome) = frame.child.take() {
        let item = element.value(outcome)?;
        add(access, element, frame, item, type_path)?;
    }

    while frame.position < frame.length {
        if !frame.null_checked {
            let is_null = reader.try_read_marker()?;
            frame.null_checked = true;
            if is_null {
                let item = element.null()?;
                add(access, element, frame, item, type_path)?;
                continue;
            }
        }
        return Ok(push(element.converter()?));
    }

    let value = match access {
        SequenceAccess::Array(info) => {
            let items = mem::take(&mut frame.items);
            info.assemble(items).ok_or(CodecError::ArrayLength {
                context: ErrorContext::default(),
                expected: info.fixed_len().unwrap_or(frame.length),
                found: frame.length,
            })?
        }
        _ => frame.take_value(type_path)?,
    };
    Ok(ReadStep::Done(Outcome::Value(value)))
}

/// Prepares the container once the length is known.
fn open(access: SequenceAccess, frame: &mut ReadFrame, length: usize) -> Result<(), CodecError> {
    let capacity = length.min(MAX_PREALLOC);
    match access {
        SequenceAccess::Array(info) => {
            if let Some(expected) = info.fixed_len()
                && expected != length
            {
                return Err(CodecError::ArrayLength {
                    context: ErrorContext::default(),
                    expected,
                    found: length,
                });
            }
            frame.items = Vec::with_capacity(capacity);
        }
        SequenceAccess::List(info) => frame.value = Some(info.with_capacity(capacity)),
        SequenceAccess::Set(info) => frame.value = Some(info.with_capacity(capacity)),
        SequenceAccess::Collection(info) => frame.value = Some(info.empty()),
        SequenceAccess::Enumerable(info) => {
            return Err(CodecError::WriteOnlyShape {
                type_path: info.ty().path(),
                path: String::from(info.ty().path()),
            });
        }
    }
    Ok(())
}

/// Stores a finished element and moves to the next one.
fn add(
    access: SequenceAccess,
    element: &ElementSlot,
    frame: &mut ReadFrame,
    item: Box<dyn Reflect>,
    type_path: &'static str,
) -> Result<(), CodecError> {
    let rejected = match access {
        SequenceAccess::Array(_) => {
            frame.items.push(item);
            Ok(())
        }
        SequenceAccess::List(info) => info.push(frame.value_mut(type_path)?, item),
        SequenceAccess::Set(info) => info.insert(frame.value_mut(type_path)?, item),
        SequenceAccess::Collection(info) => info.add(frame.value_mut(type_path)?, item),
        SequenceAccess::Enumerable(_) => Err(item),
    };
    rejected.map_err(|item| {
        CodecError::mismatch(element.declared().type_path(), item.reflect_type_path())
    })?;
    frame.position += 1;
    frame.null_checked = false;
    Ok(())
}

// -----------------------------------------------------------------------------
// Write

pub(super) fn write<'v>(
    converter: &Converter,
    access: SequenceAccess,
    element: &ElementSlot,
    frame: &mut WriteFrame<'v>,
    writer: &mut Writer<'_>,
    options: CodecOptions,
) -> Progress<WriteStep<'v>> {
    converter.write_type_path(frame, writer, options)?;
    if !frame.started {
        let (length, items) = iterate(access, frame.value).ok_or_else(|| {
            CodecError::mismatch(converter.type_path(), frame.value.reflect_type_path())
        })?;
        writer.try_write_len(length)?;
        frame.length = length;
        frame.items = Some(items);
        frame.started = true;
    }

    if frame.child_done {
        frame.child_done = false;
        next_item(frame);
    }

    loop {
        let item = match frame.item {
            Some(item) => item,
            None => {
                let next = frame.items.as_mut().and_then(|items| items.next());
                match (next, frame.position < frame.length) {
                    (Some(item), true) => {
                        frame.item = Some(item);
                        item
                    }
                    (None, false) => return Ok(WriteStep::Done),
                    (None, true) => return Err(length_changed(frame.length, frame.position)),
                    (Some(_), false) => return Err(length_changed(frame.length, frame.length + 1)),
                }
            }
        };

        let inner = element.split(item)?;
        if !frame.null_written {
            writer.try_write_marker(inner.is_none())?;
            frame.null_written = true;
        }
        match inner {
            Some(inner) => return Ok(push_value(element.converter()?, inner)),
            None => next_item(frame),
        }
    }
}

/// Returns the length and the items of a sequence value.
fn iterate<'v>(access: SequenceAccess, value: &'v dyn Reflect) -> Option<(usize, ReflectIter<'v>)> {
    match access {
        SequenceAccess::Array(info) => Some((info.len(value)?, info.iter(value)?)),
        SequenceAccess::List(info) => Some((info.len(value)?, info.iter(value)?)),
        SequenceAccess::Set(info) => Some((info.len(value)?, info.iter(value)?)),
        SequenceAccess::Collection(info) => Some((info.len(value)?, info.iter(value)?)),
        // Counted by a first pass.
        SequenceAccess::Enumerable(info) => Some((info.iter(value)?.count(), info.iter(value)?)),
    }
}

#[inline]
fn next_item(frame: &mut WriteFrame<'_>) {
    frame.item = None;
    frame.null_written = false;
    frame.position += 1;
}

#[inline]
fn length_changed(expected: usize, found: usize) -> Halt {
    CodecError::LengthChanged {
        context: ErrorContext::default(),
        expected,
        found,
    }
    .into()
}
