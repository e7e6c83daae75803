use vc_reflect::info::NullableInfo;

use super::{LazyConverter, Outcome, ReadStep, WriteStep};
use crate::error::{CodecError, Progress};
use crate::state::{ReadFrame, WriteFrame};
use crate::wire::{Reader, Writer};

// `Option` of a non-primitive: `null-marker [inner]`. The inner converter
// handles the type path prefix, it is the inner type's path.

pub(super) fn read(
    info: &'static NullableInfo,
    inner: &LazyConverter,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
) -> Progress<ReadStep> {
    if let Some(outcome) = frame.child.take() {
        let value = match outcome {
            Outcome::Value(value) => info.some(value).map_err(|value| {
                CodecError::mismatch(info.ty().path(), value.reflect_type_path())
            })?,
            // An unresolved inner value leaves the slot empty.
            Outcome::Skipped | Outcome::Unresolved(_) => info.none(),
        };
        return Ok(ReadStep::Done(Outcome::Value(value)));
    }

    if !frame.null_checked {
        let is_null = reader.try_read_marker()?;
        frame.null_checked = true;
        if is_null {
            return Ok(ReadStep::Done(Outcome::Value(info.none())));
        }
    }
    Ok(ReadStep::Push {
        converter: inner.get()?,
        type_checked: frame.type_checked,
    })
}

pub(super) fn write<'v>(
    info: &'static NullableInfo,
    inner: &LazyConverter,
    frame: &mut WriteFrame<'v>,
    writer: &mut Writer<'_>,
) -> Progress<WriteStep<'v>> {
    if frame.child_done {
        return Ok(WriteStep::Done);
    }
    let value = info
        .get(frame.value)
        .ok_or_else(|| CodecError::mismatch(info.ty().path(), frame.value.reflect_type_path()))?;
    if !frame.null_written {
        writer.try_write_marker(value.is_none())?;
        frame.null_written = true;
    }
    match value {
        Some(value) => Ok(WriteStep::Push {
            converter: inner.get()?,
            value,
            type_written: frame.type_written,
        }),
        None => Ok(WriteStep::Done),
    }
}
