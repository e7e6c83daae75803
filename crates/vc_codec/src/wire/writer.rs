use alloc::string::String;
use core::time::Duration;

use vc_reflect::Reflect;
use vc_reflect::info::PrimitiveKind;

use crate::error::{CodecError, ErrorContext, Halt, Progress};
use crate::options::CodecOptions;
use crate::wire::{MARKER_NULL, MARKER_PRESENT, VARINT_MAX_LEN};

// -----------------------------------------------------------------------------
// Writer

/// A cursor over a caller-owned output chunk.
///
/// Every `try_write_*` method writes a complete unit or nothing. On
/// shortage it returns [`Halt::NeedMore`] with the size of the whole unit,
/// which is the free space a later chunk must offer.
pub(crate) struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

/// LEB128 encoding of a `u32`, returns the buffer and the used length.
fn varint(mut value: u32) -> ([u8; VARINT_MAX_LEN], usize) {
    let mut out = [0; VARINT_MAX_LEN];
    let mut len = 0;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out[len] = byte;
            return (out, len + 1);
        }
        out[len] = byte | 0x80;
        len += 1;
    }
}

impl<'a> Writer<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Writes all parts or none of them.
    pub fn try_put_parts(&mut self, parts: &[&[u8]]) -> Progress<()> {
        let total: usize = parts.iter().map(|part| part.len()).sum();
        if self.buf.len() - self.pos < total {
            return Err(Halt::NeedMore(total));
        }
        for part in parts {
            self.buf[self.pos..self.pos + part.len()].copy_from_slice(part);
            self.pos += part.len();
        }
        Ok(())
    }

    #[inline]
    fn try_put(&mut self, bytes: &[u8]) -> Progress<()> {
        self.try_put_parts(&[bytes])
    }

    // -------------------------------------------------------------------------
    // Structural values

    pub fn try_write_str(&mut self, text: &str) -> Progress<()> {
        let len = u32::try_from(text.len()).map_err(|_| invalid_length(text.len()))?;
        let (prefix, used) = varint(len);
        self.try_put_parts(&[&prefix[..used], text.as_bytes()])
    }

    #[inline]
    pub fn try_write_marker(&mut self, is_null: bool) -> Progress<()> {
        self.try_put(&[if is_null { MARKER_NULL } else { MARKER_PRESENT }])
    }

    pub fn try_write_len(&mut self, len: usize) -> Progress<()> {
        let len = i32::try_from(len).map_err(|_| invalid_length(len))?;
        self.try_put(&len.to_le_bytes())
    }

    /// Writes a member tag followed by its wire-kind descriptor.
    ///
    /// `tag` is ignored in name mode. `type_path` names the owner in the
    /// error raised when the tag does not fit the configured width.
    pub fn try_write_member(
        &mut self,
        options: CodecOptions,
        type_path: &'static str,
        name: &str,
        tag: u32,
        kind: &[u8],
    ) -> Progress<()> {
        if options.contains(CodecOptions::USE_PROPERTY_NAMES) {
            let len = u32::try_from(name.len()).map_err(|_| invalid_length(name.len()))?;
            let (prefix, used) = varint(len);
            return self.try_put_parts(&[&prefix[..used], name.as_bytes(), kind]);
        }
        let too_many = || CodecError::TooManyMembers {
            type_path,
            tag,
            max: options.max_tag(),
        };
        if options.contains(CodecOptions::INDEX_SIZE_UINT16) {
            let tag = u16::try_from(tag).map_err(|_| too_many())?;
            self.try_put_parts(&[&tag.to_le_bytes(), kind])
        } else {
            let tag = u8::try_from(tag).map_err(|_| too_many())?;
            self.try_put_parts(&[&[tag], kind])
        }
    }

    /// Writes the header of a polymorphic value, its concrete type path
    /// followed by the wire-kind descriptor of the concrete value.
    pub fn try_write_typed(&mut self, type_path: &str, kind: &[u8]) -> Progress<()> {
        let len = u32::try_from(type_path.len()).map_err(|_| invalid_length(type_path.len()))?;
        let (prefix, used) = varint(len);
        self.try_put_parts(&[&prefix[..used], type_path.as_bytes(), kind])
    }

    /// Writes the end-of-object sentinel.
    pub fn try_write_end(&mut self, options: CodecOptions) -> Progress<()> {
        // An empty name and a zero `u8` index share the same byte.
        let wide = options.contains(CodecOptions::INDEX_SIZE_UINT16)
            && !options.contains(CodecOptions::USE_PROPERTY_NAMES);
        if wide {
            self.try_put(&[0, 0])
        } else {
            self.try_put(&[0])
        }
    }

    // -------------------------------------------------------------------------
    // Primitives

    /// Writes a primitive value of the given kind.
    pub fn try_write_primitive(
        &mut self,
        kind: PrimitiveKind,
        value: &dyn Reflect,
    ) -> Progress<()> {
        macro_rules! put {
            ($ty:ty) => {
                match value.downcast_ref::<$ty>() {
                    Some(value) => self.try_put(&value.to_le_bytes()),
                    None => Err(mismatch(kind, value)),
                }
            };
        }

        match kind {
            PrimitiveKind::Bool => match value.downcast_ref::<bool>() {
                Some(value) => self.try_put(&[u8::from(*value)]),
                None => Err(mismatch(kind, value)),
            },
            PrimitiveKind::U8 => put!(u8),
            PrimitiveKind::I8 => put!(i8),
            PrimitiveKind::U16 => put!(u16),
            PrimitiveKind::I16 => put!(i16),
            PrimitiveKind::U32 => put!(u32),
            PrimitiveKind::I32 => put!(i32),
            PrimitiveKind::U64 => put!(u64),
            PrimitiveKind::I64 => put!(i64),
            PrimitiveKind::U128 => put!(u128),
            PrimitiveKind::I128 => put!(i128),
            PrimitiveKind::Usize => match value.downcast_ref::<usize>() {
                Some(value) => self.try_put(&(*value as u64).to_le_bytes()),
                None => Err(mismatch(kind, value)),
            },
            PrimitiveKind::Isize => match value.downcast_ref::<isize>() {
                Some(value) => self.try_put(&(*value as i64).to_le_bytes()),
                None => Err(mismatch(kind, value)),
            },
            PrimitiveKind::F32 => put!(f32),
            PrimitiveKind::F64 => put!(f64),
            PrimitiveKind::Char => match value.downcast_ref::<char>() {
                Some(value) => self.try_put(&u32::from(*value).to_le_bytes()),
                None => Err(mismatch(kind, value)),
            },
            PrimitiveKind::String => match value.downcast_ref::<String>() {
                Some(value) => self.try_write_str(value),
                None => Err(mismatch(kind, value)),
            },
            PrimitiveKind::Duration => match value.downcast_ref::<Duration>() {
                Some(value) => self.try_put_parts(&[
                    &value.as_secs().to_le_bytes(),
                    &value.subsec_nanos().to_le_bytes(),
                ]),
                None => Err(mismatch(kind, value)),
            },
        }
    }

    /// Writes an `i64` narrowed to the given integer kind.
    ///
    /// The inverse of `Reader::try_read_int`.
    pub fn try_write_int(&mut self, kind: PrimitiveKind, value: i64) -> Progress<()> {
        match kind {
            PrimitiveKind::U8 => self.try_put(&(value as u8).to_le_bytes()),
            PrimitiveKind::I8 => self.try_put(&(value as i8).to_le_bytes()),
            PrimitiveKind::U16 => self.try_put(&(value as u16).to_le_bytes()),
            PrimitiveKind::I16 => self.try_put(&(value as i16).to_le_bytes()),
            PrimitiveKind::U32 => self.try_put(&(value as u32).to_le_bytes()),
            PrimitiveKind::I32 => self.try_put(&(value as i32).to_le_bytes()),
            PrimitiveKind::U64 | PrimitiveKind::Usize => {
                self.try_put(&(value as u64).to_le_bytes())
            }
            PrimitiveKind::I64 | PrimitiveKind::Isize => self.try_put(&value.to_le_bytes()),
            other => Err(Halt::Fail(CodecError::mismatch("integer", other.as_str()))),
        }
    }
}

#[inline]
fn mismatch(kind: PrimitiveKind, value: &dyn Reflect) -> Halt {
    Halt::Fail(CodecError::mismatch(kind.as_str(), value.reflect_type_path()))
}

#[inline]
fn invalid_length(length: usize) -> Halt {
    Halt::Fail(CodecError::InvalidLength {
        context: ErrorContext::default(),
        length: i64::try_from(length).unwrap_or(i64::MAX),
    })
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::time::Duration;

    use vc_reflect::info::PrimitiveKind;

    use super::{Writer, varint};
    use crate::error::{CodecError, Halt};
    use crate::options::CodecOptions;
    use crate::wire::Reader;

    #[test]
    fn varint_lengths() {
        assert_eq!(varint(0), ([0, 0, 0, 0, 0], 1));
        assert_eq!(varint(200).0[..2], [0xC8, 0x01]);
        assert_eq!(varint(u32::MAX), ([0xFF, 0xFF, 0xFF, 0xFF, 0x0F], 5));
    }

    #[test]
    fn full_chunk_reports_whole_unit() {
        let mut buf = [0_u8; 8];
        let mut writer = Writer::new(&mut buf);
        writer.try_write_marker(false).unwrap();

        let text = String::from("hello world");
        match writer.try_write_primitive(PrimitiveKind::String, &text) {
            Err(Halt::NeedMore(n)) => assert_eq!(n, 12),
            _ => panic!("expected a shortage"),
        }
        assert_eq!(writer.position(), 1);

        assert!(matches!(
            writer.try_write_primitive(PrimitiveKind::U8, &1_u16),
            Err(Halt::Fail(CodecError::TypeMismatch { .. }))
        ));
        writer.try_write_len(3).unwrap();
        assert_eq!(writer.position(), 5);

        // Three bytes left, the length does not fit and nothing is written.
        assert!(matches!(writer.try_write_len(4), Err(Halt::NeedMore(4))));
        assert_eq!(writer.position(), 5);
        assert_eq!(buf, [0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn typed_headers_are_one_unit() {
        let mut buf = [0_u8; 6];
        let mut writer = Writer::new(&mut buf);
        assert!(matches!(
            writer.try_write_typed("a::Dot", &[0x02]),
            Err(Halt::NeedMore(8))
        ));
        assert_eq!(writer.position(), 0);

        let mut buf = [0_u8; 8];
        let mut writer = Writer::new(&mut buf);
        writer.try_write_typed("a::Dot", &[0x02]).unwrap();
        assert_eq!(buf, [0x06, b'a', b':', b':', b'D', b'o', b't', 0x02]);
    }

    #[test]
    fn member_headers_follow_options() {
        let kind = [0x07];
        let mut buf = [0_u8; 16];
        let mut writer = Writer::new(&mut buf);
        writer
            .try_write_member(CodecOptions::USE_PROPERTY_NAMES, "demo::A", "id", 1, &kind)
            .unwrap();
        writer
            .try_write_member(CodecOptions::INDEX_SIZE_UINT16, "demo::A", "id", 0x102, &kind)
            .unwrap();
        writer.try_write_end(CodecOptions::INDEX_SIZE_UINT16).unwrap();
        let written = writer.position();
        assert_eq!(&buf[..written], &[0x02, b'i', b'd', 0x07, 0x02, 0x01, 0x07, 0x00, 0x00]);

        let mut buf = [0_u8; 4];
        let mut writer = Writer::new(&mut buf);
        assert!(matches!(
            writer.try_write_member(CodecOptions::empty(), "demo::A", "id", 256, &kind),
            Err(Halt::Fail(CodecError::TooManyMembers { tag: 256, max: 255, .. }))
        ));
    }

    #[test]
    fn primitives_read_back() {
        let mut buf = [0_u8; 64];
        let mut writer = Writer::new(&mut buf);
        writer.try_write_primitive(PrimitiveKind::Char, &'λ').unwrap();
        writer.try_write_primitive(PrimitiveKind::Isize, &-9_isize).unwrap();
        writer
            .try_write_primitive(PrimitiveKind::Duration, &Duration::from_millis(1500))
            .unwrap();
        writer.try_write_int(PrimitiveKind::U16, 513).unwrap();
        let written = writer.position();
        assert_eq!(written, 4 + 8 + 12 + 2);

        let mut reader = Reader::new(&buf[..written]);
        let c = reader.try_read_primitive(PrimitiveKind::Char).unwrap();
        assert_eq!(c.downcast_ref::<char>(), Some(&'λ'));
        let i = reader.try_read_primitive(PrimitiveKind::Isize).unwrap();
        assert_eq!(i.downcast_ref::<isize>(), Some(&-9));
        let d = reader.try_read_primitive(PrimitiveKind::Duration).unwrap();
        assert_eq!(d.downcast_ref::<Duration>(), Some(&Duration::from_millis(1500)));
        assert_eq!(reader.try_read_int(PrimitiveKind::U16).unwrap(), 513);
    }
}
