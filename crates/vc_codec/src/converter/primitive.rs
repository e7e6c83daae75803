use vc_reflect::info::{EnumInfo, NullableInfo, PrimitiveKind};

use super::{
    Converter, Outcome, ReadContext, ReadStep, WriteStep, read_type_path_of, write_type_path_of,
};
use crate::error::{CodecError, ErrorContext, Progress};
use crate::options::CodecOptions;
use crate::state::{ReadFrame, WriteFrame};
use crate::wire::{Reader, Writer};

// -----------------------------------------------------------------------------
// Core primitives

pub(super) fn read(
    converter: &Converter,
    kind: PrimitiveKind,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    converter.read_type_path(frame, reader, cx)?;
    let value = reader.try_read_primitive(kind)?;
    Ok(ReadStep::Done(Outcome::Value(value)))
}

pub(super) fn write<'v>(
    converter: &Converter,
    kind: PrimitiveKind,
    frame: &mut WriteFrame<'v>,
    writer: &mut Writer<'_>,
    options: CodecOptions,
) -> Progress<WriteStep<'v>> {
    converter.write_type_path(frame, writer, options)?;
    writer.try_write_primitive(kind, frame.value)?;
    Ok(WriteStep::Done)
}

// -----------------------------------------------------------------------------
// Nullable core primitives

/// `Option` of a primitive: `null-marker [type-path]? [value]`.
///
/// The type path is the wrapped primitive's.
pub(super) fn read_nullable(
    kind: PrimitiveKind,
    info: &'static NullableInfo,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    if !frame.null_checked {
        let is_null = reader.try_read_marker()?;
        frame.null_checked = true;
        if is_null {
            return Ok(ReadStep::Done(Outcome::Value(info.none())));
        }
    }
    read_type_path_of(info.inner_info().type_path(), frame, reader, cx)?;
    let inner = reader.try_read_primitive(kind)?;
    let value = info
        .some(inner)
        .map_err(|inner| CodecError::mismatch(info.ty().path(), inner.reflect_type_path()))?;
    Ok(ReadStep::Done(Outcome::Value(value)))
}

pub(super) fn write_nullable<'v>(
    kind: PrimitiveKind,
    info: &'static NullableInfo,
    frame: &mut WriteFrame<'v>,
    writer: &mut Writer<'_>,
    options: CodecOptions,
) -> Progress<WriteStep<'v>> {
    let inner = info
        .get(frame.value)
        .ok_or_else(|| CodecError::mismatch(info.ty().path(), frame.value.reflect_type_path()))?;
    if !frame.null_written {
        writer.try_write_marker(inner.is_none())?;
        frame.null_written = true;
    }
    let Some(inner) = inner else {
        return Ok(WriteStep::Done);
    };
    write_type_path_of(info.inner_info().type_path(), frame, writer, options)?;
    writer.try_write_primitive(kind, inner)?;
    Ok(WriteStep::Done)
}

// -----------------------------------------------------------------------------
// Enums

/// Fieldless enums travel as their discriminant, in the enum's repr width.
pub(super) fn read_enum(
    converter: &Converter,
    info: &'static EnumInfo,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    converter.read_type_path(frame, reader, cx)?;
    let discriminant = reader.try_read_int(info.repr())?;
    match info.from_discriminant(discriminant) {
        Some(value) => Ok(ReadStep::Done(Outcome::Value(value))),
        None => Err(CodecError::InvalidEnumValue {
            context: ErrorContext::default(),
            value: discriminant,
        }
        .into()),
    }
}

pub(super) fn write_enum<'v>(
    converter: &Converter,
    info: &'static EnumInfo,
    frame: &mut WriteFrame<'v>,
    writer: &mut Writer<'_>,
    options: CodecOptions,
) -> Progress<WriteStep<'v>> {
    let discriminant = info
        .discriminant(frame.value)
        .ok_or_else(|| CodecError::mismatch(info.ty().path(), frame.value.reflect_type_path()))?;
    converter.write_type_path(frame, writer, options)?;
    writer.try_write_int(info.repr(), discriminant)?;
    Ok(WriteStep::Done)
}
