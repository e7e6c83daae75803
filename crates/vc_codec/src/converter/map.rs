use alloc::boxed::Box;

use vc_reflect::Reflect;
use vc_reflect::info::MapInfo;

use super::{Converter, ElementSlot, Outcome, ReadContext, ReadStep, WriteStep, push, push_value};
use crate::error::{CodecError, ErrorContext, Halt, Progress};
use crate::options::CodecOptions;
use crate::state::{Phase, ReadFrame, WriteFrame};
use crate::wire::{Reader, Writer};

/// Upper bound of the capacity reserved from a length read off the wire.
const MAX_PREALLOC: usize = 1024;

// Layout: `[type-path]? length:i32 { null-marker key null-marker value }*length`.
// The frame phase tracks which half of the current entry comes next.

// -----------------------------------------------------------------------------
// Read

pub(super) fn read(
    converter: &Converter,
    info: &'static MapInfo,
    key: &ElementSlot,
    value: &ElementSlot,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    let type_path = converter.type_path();
    converter.read_type_path(frame, reader, cx)?;
    if !frame.started {
        let length = reader.try_read_len()?;
        frame.length = length;
        frame.started = true;
        frame.value = Some(info.with_capacity(length.min(MAX_PREALLOC)));
        frame.phase = Phase::KeyMarker;
    }

    if let Some(outcome) = frame.child.take() {
        match frame.phase {
            Phase::Key => {
                frame.key = Some(key.value(outcome)?);
                frame.phase = Phase::ValueMarker;
            }
            _ => {
                let item = value.value(outcome)?;
                insert(info, key, value, frame, item, type_path)?;
            }
        }
    }

    while frame.position < frame.length {
        match frame.phase {
            Phase::ValueMarker => {
                if reader.try_read_marker()? {
                    let item = value.null()?;
                    insert(info, key, value, frame, item, type_path)?;
                } else {
                    frame.phase = Phase::Value;
                    return Ok(push(value.converter()?));
                }
            }
            _ => {
                if reader.try_read_marker()? {
                    frame.key = Some(key.null()?);
                    frame.phase = Phase::ValueMarker;
                } else {
                    frame.phase = Phase::Key;
                    return Ok(push(key.converter()?));
                }
            }
        }
    }

    let map = frame.take_value(type_path)?;
    Ok(ReadStep::Done(Outcome::Value(map)))
}

fn insert(
    info: &'static MapInfo,
    key: &ElementSlot,
    value: &ElementSlot,
    frame: &mut ReadFrame,
    item: Box<dyn Reflect>,
    type_path: &'static str,
) -> Result<(), CodecError> {
    let entry_key = frame
        .key
        .take()
        .ok_or_else(|| CodecError::mismatch(key.declared().type_path(), "no key"))?;
    info.insert(frame.value_mut(type_path)?, entry_key, item)
        .map_err(|(entry_key, item)| {
            if entry_key.ty_id() == key.declared().type_id() {
                CodecError::mismatch(value.declared().type_path(), item.reflect_type_path())
            } else {
                CodecError::mismatch(key.declared().type_path(), entry_key.reflect_type_path())
            }
        })?;
    frame.position += 1;
    frame.phase = Phase::KeyMarker;
    Ok(())
}

// -----------------------------------------------------------------------------
// Write

pub(super) fn write<'v>(
    converter: &Converter,
    info: &'static MapInfo,
    key: &ElementSlot,
    value: &ElementSlot,
    frame: &mut WriteFrame<'v>,
    writer: &mut Writer<'_>,
    options: CodecOptions,
) -> Progress<WriteStep<'v>> {
    converter.write_type_path(frame, writer, options)?;
    if !frame.started {
        let mismatch =
            || CodecError::mismatch(converter.type_path(), frame.value.reflect_type_path());
        let length = info.len(frame.value).ok_or_else(mismatch)?;
        let entries = info.iter(frame.value).ok_or_else(mismatch)?;
        writer.try_write_len(length)?;
        frame.length = length;
        frame.entries = Some(entries);
        frame.started = true;
    }

    if frame.child_done {
        frame.child_done = false;
        match frame.phase {
            Phase::Key => frame.phase = Phase::ValueMarker,
            _ => next_entry(frame),
        }
    }

    loop {
        let (entry_key, entry_value) = match frame.entry {
            Some(entry) => entry,
            None => {
                let next = frame.entries.as_mut().and_then(|entries| entries.next());
                match (next, frame.position < frame.length) {
                    (Some(entry), true) => {
                        frame.entry = Some(entry);
                        frame.phase = Phase::KeyMarker;
                        entry
                    }
                    (None, false) => return Ok(WriteStep::Done),
                    (None, true) => return Err(length_changed(frame.length, frame.position)),
                    (Some(_), false) => {
                        return Err(length_changed(frame.length, frame.length + 1));
                    }
                }
            }
        };

        match frame.phase {
            Phase::ValueMarker => {
                let inner = value.split(entry_value)?;
                writer.try_write_marker(inner.is_none())?;
                match inner {
                    Some(inner) => {
                        frame.phase = Phase::Value;
                        return Ok(push_value(value.converter()?, inner));
                    }
                    None => next_entry(frame),
                }
            }
            _ => {
                let inner = key.split(entry_key)?;
                writer.try_write_marker(inner.is_none())?;
                match inner {
                    Some(inner) => {
                        frame.phase = Phase::Key;
                        return Ok(push_value(key.converter()?, inner));
                    }
                    None => frame.phase = Phase::ValueMarker,
                }
            }
        }
    }
}

#[inline]
fn next_entry(frame: &mut WriteFrame<'_>) {
    frame.entry = None;
    frame.phase = Phase::KeyMarker;
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
