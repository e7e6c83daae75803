use alloc::string::String;
use alloc::sync::Arc;

use vc_reflect::info::InterfaceInfo;

use super::{Converter, ConverterCache, Outcome, ReadContext, ReadStep, WriteStep};
use crate::error::{CodecError, Progress};
use crate::state::{ReadFrame, WriteFrame};
use crate::wire::{Reader, WireKind, Writer};

// Interface values: `type-path wire-kind concrete-value`. The concrete type
// path doubles as the type path prefix, the concrete value never repeats it.
// The descriptor lets a reader that cannot resolve the path skip the value.

pub(super) fn read(
    converter: &Converter,
    info: &'static InterfaceInfo,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    if let Some(outcome) = frame.child.take() {
        return finish(info, frame, outcome, cx);
    }

    let (path, kind) = reader.try_read_typed()?;
    frame.started = true;

    let Some(concrete) = cx.registry.get_with_type_path(path) else {
        log::warn!(
            "`{}` names an unregistered type `{}`, skipping the value",
            converter.type_path(),
            path,
        );
        return Ok(skip(frame, path, kind));
    };

    if cx.registry.implementation(info.ty().id(), concrete.type_id()).is_none() {
        return Err(CodecError::mismatch(info.ty().path(), path).into());
    }
    if WireKind::of(concrete) != kind {
        log::debug!(
            "`{}` arrived as {:?}, expected {:?}, skipping the value",
            path,
            kind,
            WireKind::of(concrete),
        );
        return Ok(skip(frame, path, kind));
    }
    frame.resolved = Some(concrete);

    let binding = converter
        .binding()
        .map(|binding| binding.with_value(concrete))
        .ok_or_else(|| CodecError::unresolved(String::from(path)))?;
    Ok(ReadStep::Push {
        converter: ConverterCache::global().get_or_build(binding)?,
        type_checked: true,
    })
}

fn skip(frame: &mut ReadFrame, path: &str, kind: WireKind) -> ReadStep {
    frame.unresolved = Some(String::from(path));
    ReadStep::Push {
        converter: Arc::new(Converter::drain(kind)),
        type_checked: true,
    }
}

fn finish(
    info: &'static InterfaceInfo,
    frame: &mut ReadFrame,
    outcome: Outcome,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    let interface = info.ty().id();
    match (frame.resolved, outcome) {
        (Some(concrete), Outcome::Value(value)) => {
            let implementation = cx
                .registry
                .implementation(interface, concrete.type_id())
                .ok_or_else(|| CodecError::mismatch(info.ty().path(), concrete.type_path()))?;
            let wrapped = implementation.wrap(value).map_err(|value| {
                CodecError::mismatch(concrete.type_path(), value.reflect_type_path())
            })?;
            Ok(ReadStep::Done(Outcome::Value(wrapped)))
        }
        (_, Outcome::Unresolved(path)) => Ok(ReadStep::Done(Outcome::Unresolved(path))),
        (_, outcome) => {
            let path = frame
                .unresolved
                .take()
                .unwrap_or_else(|| String::from(info.ty().path()));
            if let (Outcome::Skipped, Some(fallback)) = (outcome, cx.registry.fallback(interface)) {
                log::debug!(
                    "standing in for `{}` with `{}`",
                    path,
                    fallback.concrete().type_path(),
                );
                return Ok(ReadStep::Done(Outcome::Value(fallback.instantiate())));
            }
            Ok(ReadStep::Done(Outcome::Unresolved(path)))
        }
    }
}

pub(super) fn write<'v>(
    converter: &Converter,
    info: &'static InterfaceInfo,
    frame: &mut WriteFrame<'v>,
    writer: &mut Writer<'_>,
) -> Progress<WriteStep<'v>> {
    if frame.child_done {
        return Ok(WriteStep::Done);
    }
    let concrete = info
        .concrete(frame.value)
        .ok_or_else(|| CodecError::mismatch(info.ty().path(), frame.value.reflect_type_path()))?;
    let binding = converter
        .binding()
        .map(|binding| binding.with_value(concrete.reflect_type_info()))
        .ok_or_else(|| CodecError::mismatch(info.ty().path(), concrete.reflect_type_path()))?;
    let child = ConverterCache::global().get_or_build(binding)?;
    let kind = WireKind::of(concrete.reflect_type_info());
    if kind.depth() > WireKind::MAX_NESTING {
        return Err(CodecError::WireKindTooDeep {
            context: binding.context(),
        }
        .into());
    }

    writer.try_write_typed(concrete.reflect_type_path(), &kind.to_bytes())?;
    Ok(WriteStep::Push {
        converter: child,
        value: concrete,
        type_written: true,
    })
}
