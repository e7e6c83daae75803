use alloc::sync::Arc;

use super::{Converter, Outcome, ReadContext, ReadStep};
use crate::error::Progress;
use crate::options::CodecOptions;
use crate::state::{Phase, ReadFrame};
use crate::wire::{Reader, Tag, WireKind};

// Drains walk the layout a wire-kind descriptor announces and discard every
// byte. Type path prefixes are consumed without being checked.

pub(super) fn read(
    kind: &WireKind,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    match kind {
        WireKind::Primitive(primitive) => {
            skip_type_path(frame, reader, cx)?;
            reader.try_skip_primitive(*primitive)?;
            Ok(ReadStep::Done(Outcome::Skipped))
        }
        WireKind::Nullable(inner) => nullable(inner, frame, reader),
        WireKind::Sequence(element) => sequence(element, frame, reader, cx),
        WireKind::Map(key, value) => map(key, value, frame, reader, cx),
        WireKind::Object => object(frame, reader, cx),
        WireKind::Typed => typed(frame, reader),
    }
}

#[inline]
fn drain(kind: &WireKind) -> Arc<Converter> {
    Arc::new(Converter::drain(kind.clone()))
}

fn skip_type_path(
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<()> {
    if frame.type_checked {
        return Ok(());
    }
    if cx.options.contains(CodecOptions::INCLUDE_PROPERTY_TYPES) {
        reader.try_read_str()?;
    }
    frame.type_checked = true;
    Ok(())
}

fn nullable(
    inner: &WireKind,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
) -> Progress<ReadStep> {
    if frame.child.take().is_some() {
        return Ok(ReadStep::Done(Outcome::Skipped));
    }
    if !frame.null_checked {
        let is_null = reader.try_read_marker()?;
        frame.null_checked = true;
        if is_null {
            return Ok(ReadStep::Done(Outcome::Skipped));
        }
    }
    Ok(ReadStep::Push {
        converter: drain(inner),
        type_checked: frame.type_checked,
    })
}

fn sequence(
    element: &WireKind,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    skip_type_path(frame, reader, cx)?;
    if !frame.started {
        frame.length = reader.try_read_len()?;
        frame.started = true;
    }
    if frame.child.take().is_some() {
        frame.position += 1;
        frame.null_checked = false;
    }

    while frame.position < frame.length {
        if !frame.null_checked {
            let is_null = reader.try_read_marker()?;
            frame.null_checked = true;
            if is_null {
                frame.position += 1;
                frame.null_checked = false;
                continue;
            }
        }
        return Ok(ReadStep::Push {
            converter: drain(element),
            type_checked: false,
        });
    }
    Ok(ReadStep::Done(Outcome::Skipped))
}

fn map(
    key: &WireKind,
    value: &WireKind,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    skip_type_path(frame, reader, cx)?;
    if !frame.started {
        frame.length = reader.try_read_len()?;
        frame.started = true;
        frame.phase = Phase::KeyMarker;
    }
    if frame.child.take().is_some() {
        match frame.phase {
            Phase::Key => frame.phase = Phase::ValueMarker,
            _ => {
                frame.position += 1;
                frame.phase = Phase::KeyMarker;
            }
        }
    }

    while frame.position < frame.length {
        let (next, kind) = match frame.phase {
            Phase::ValueMarker => (Phase::Value, value),
            _ => (Phase::Key, key),
        };
        if reader.try_read_marker()? {
            match next {
                Phase::Value => {
                    frame.position += 1;
                    frame.phase = Phase::KeyMarker;
                }
                _ => frame.phase = Phase::ValueMarker,
            }
            continue;
        }
        frame.phase = next;
        return Ok(ReadStep::Push {
            converter: drain(kind),
            type_checked: false,
        });
    }
    Ok(ReadStep::Done(Outcome::Skipped))
}

fn object(
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<ReadStep> {
    skip_type_path(frame, reader, cx)?;
    if frame.child.take().is_some() {
        frame.phase = Phase::Tag;
    }

    loop {
        match frame.phase {
            Phase::Descriptor => {
                let kind = reader.try_read_wire_kind()?;
                frame.phase = Phase::Member;
                return Ok(ReadStep::Push {
                    converter: Arc::new(Converter::drain(kind)),
                    type_checked: false,
                });
            }
            _ => {
                if reader.try_read_tag(cx.options)? == Tag::End {
                    return Ok(ReadStep::Done(Outcome::Skipped));
                }
                frame.phase = Phase::Descriptor;
            }
        }
    }
}

fn typed(frame: &mut ReadFrame, reader: &mut Reader<'_>) -> Progress<ReadStep> {
    if frame.child.take().is_some() {
        return Ok(ReadStep::Done(Outcome::Skipped));
    }
    // The concrete type path stands in for the prefix, never checked here.
    let (_, kind) = reader.try_read_typed()?;
    Ok(ReadStep::Push {
        converter: drain(&kind),
        type_checked: true,
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use vc_reflect::info::PrimitiveKind;
    use vc_reflect::registry::TypeRegistry;

    use super::*;
    use crate::converter::Converter;

    /// Drains `bytes` one byte at a time through a hand-driven frame stack.
    fn drain_all(kind: WireKind, bytes: &[u8], options: CodecOptions) -> usize {
        let registry = TypeRegistry::new();
        let cx = ReadContext {
            options,
            registry: &registry,
        };
        let mut stack: Vec<(Arc<Converter>, ReadFrame)> =
            vec![(Arc::new(Converter::drain(kind)), ReadFrame::new(false))];
        let mut consumed = 0;
        let mut available = 0;
        loop {
            let (converter, frame) = stack.last_mut().unwrap();
            let converter = converter.clone();
            let mut reader = Reader::new(&bytes[consumed..available]);
            let step = converter.read_step(frame, &mut reader, &cx);
            consumed += reader.position();
            match step {
                Ok(ReadStep::Push {
                    converter,
                    type_checked,
                }) => stack.push((converter, ReadFrame::new(type_checked))),
                Ok(ReadStep::Done(outcome)) => {
                    stack.pop();
                    match stack.last_mut() {
                        Some((_, parent)) => parent.child = Some(outcome),
                        None => return consumed,
                    }
                }
                Err(crate::error::Halt::NeedMore(_)) => {
                    assert!(available < bytes.len(), "drain wants more than the input");
                    available += 1;
                }
                Err(crate::error::Halt::Fail(err)) => panic!("{err}"),
            }
        }
    }

    #[test]
    fn nested_object_is_drained_to_its_sentinel() {
        // { 1: u16 = 7, 2: seq<string> = ["ab", null], 3: map<u8, nullable u8> = {9: null} }, end
        let bytes = [
            0x01, 0x04, 0x07, 0x00, //
            0x02, 0x21, 0x11, 0x02, 0x00, 0x00, 0x00, 0x00, 0x02, b'a', b'b', 0x01, //
            0x03, 0x22, 0x02, 0x30, 0x02, 0x01, 0x00, 0x00, 0x00, 0x00, 0x09, 0x00, 0x01, //
            0x00, 0xEE,
        ];
        let used = drain_all(WireKind::Object, &bytes, CodecOptions::empty());
        assert_eq!(used, bytes.len() - 1);
    }

    #[test]
    fn prefixed_primitives_skip_their_path() {
        let bytes = [0x03, b'u', b'3', b'2', 0x01, 0x02, 0x03, 0x04];
        let used = drain_all(
            WireKind::Primitive(PrimitiveKind::U32),
            &bytes,
            CodecOptions::INCLUDE_PROPERTY_TYPES,
        );
        assert_eq!(used, bytes.len());
    }

    #[test]
    fn typed_values_drain_by_their_descriptor() {
        // path "x::Gone" announcing an object, one i8 member in name mode.
        let mut bytes = vec![0x07];
        bytes.extend_from_slice(b"x::Gone");
        bytes.extend_from_slice(&[0x20, 0x01, b'a', 0x03, 0x05, 0x00]);
        let used = drain_all(WireKind::Typed, &bytes, CodecOptions::USE_PROPERTY_NAMES);
        assert_eq!(used, bytes.len());

        // path "x::Tiny" announcing a u16, followed by an unrelated byte.
        let mut bytes = vec![0x07];
        bytes.extend_from_slice(b"x::Tiny");
        bytes.extend_from_slice(&[0x04, 0x2A, 0x00, 0xEE]);
        let used = drain_all(WireKind::Typed, &bytes, CodecOptions::INCLUDE_PROPERTY_TYPES);
        assert_eq!(used, bytes.len() - 1);
    }
}
