use alloc::boxed::Box;
use alloc::string::String;
use core::time::Duration;

use vc_reflect::Reflect;
use vc_reflect::info::PrimitiveKind;

use crate::error::{CodecError, ErrorContext, Halt, Progress};
use crate::options::CodecOptions;
use crate::wire::{MARKER_NULL, MARKER_PRESENT, Tag, VARINT_MAX_LEN, WireKind};

// -----------------------------------------------------------------------------
// Reader

/// A cursor over an input fragment.
///
/// Every `try_read_*` method either consumes a complete value or nothing.
/// On shortage it returns [`Halt::NeedMore`] with the number of missing
/// bytes and leaves the cursor where it was.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

macro_rules! read_le {
    ($reader:ident, $ty:ty) => {
        <$ty>::from_le_bytes($reader.take_array::<{ size_of::<$ty>() }>()?)
    };
}

impl<'a> Reader<'a> {
    #[inline]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    fn ensure(&self, n: usize) -> Progress<()> {
        let remaining = self.remaining();
        if remaining < n {
            Err(Halt::NeedMore(n - remaining))
        } else {
            Ok(())
        }
    }

    fn take(&mut self, n: usize) -> Progress<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Progress<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Decodes a LEB128 `u32` without consuming it.
    ///
    /// Returns the value and the number of bytes it occupies.
    fn peek_varint(&self) -> Progress<(u32, usize)> {
        let rest = &self.buf[self.pos..];
        let mut value: u64 = 0;
        for (i, &byte) in rest.iter().take(VARINT_MAX_LEN).enumerate() {
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return match u32::try_from(value) {
                    Ok(value) => Ok((value, i + 1)),
                    Err(_) => Err(invalid_length(value as i64)),
                };
            }
        }
        if rest.len() >= VARINT_MAX_LEN {
            // Continuation bit on the last permitted byte.
            return Err(invalid_length(value as i64));
        }
        Err(Halt::NeedMore(1))
    }

    // -------------------------------------------------------------------------
    // Structural values

    /// Reads a length-prefixed UTF-8 string.
    pub fn try_read_str(&mut self) -> Progress<&'a str> {
        let (len, prefix) = self.peek_varint()?;
        let total = prefix + len as usize;
        self.ensure(total)?;
        let bytes = &self.buf[self.pos + prefix..self.pos + total];
        let text = core::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 {
            context: ErrorContext::default(),
        })?;
        self.pos += total;
        Ok(text)
    }

    /// Reads a null marker, returns `true` if the value is null.
    pub fn try_read_marker(&mut self) -> Progress<bool> {
        let [byte] = self.take_array::<1>()?;
        match byte {
            MARKER_PRESENT => Ok(false),
            MARKER_NULL => Ok(true),
            _ => {
                self.pos -= 1;
                Err(invalid_marker(byte))
            }
        }
    }

    /// Reads a collection length.
    pub fn try_read_len(&mut self) -> Progress<usize> {
        let len = read_le!(self, i32);
        usize::try_from(len).map_err(|_| invalid_length(i64::from(len)))
    }

    /// Reads a member tag in the layout selected by `options`.
    pub fn try_read_tag(&mut self, options: CodecOptions) -> Progress<Tag<'a>> {
        if options.contains(CodecOptions::USE_PROPERTY_NAMES) {
            let name = self.try_read_str()?;
            return Ok(if name.is_empty() { Tag::End } else { Tag::Name(name) });
        }
        let index = if options.contains(CodecOptions::INDEX_SIZE_UINT16) {
            u32::from(read_le!(self, u16))
        } else {
            u32::from(read_le!(self, u8))
        };
        Ok(if index == 0 { Tag::End } else { Tag::Index(index) })
    }

    /// Reads a member's wire-kind descriptor.
    pub fn try_read_wire_kind(&mut self) -> Progress<WireKind> {
        match WireKind::decode(&self.buf[self.pos..])? {
            Some((kind, used)) => {
                self.pos += used;
                Ok(kind)
            }
            None => Err(Halt::NeedMore(1)),
        }
    }

    /// Reads the header of a polymorphic value, its concrete type path and
    /// the wire-kind descriptor of the concrete value.
    ///
    /// Consumes both or neither.
    pub fn try_read_typed(&mut self) -> Progress<(&'a str, WireKind)> {
        let start = self.pos;
        let path = self.try_read_str()?;
        match self.try_read_wire_kind() {
            Ok(kind) => Ok((path, kind)),
            Err(halt) => {
                self.pos = start;
                Err(halt)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Primitives

    /// Reads a primitive value of the given kind.
    pub fn try_read_primitive(&mut self, kind: PrimitiveKind) -> Progress<Box<dyn Reflect>> {
        let start = self.pos;
        let value: Box<dyn Reflect> = match kind {
            PrimitiveKind::Bool => {
                let [byte] = self.take_array::<1>()?;
                match byte {
                    0 => Box::new(false),
                    1 => Box::new(true),
                    _ => {
                        self.pos = start;
                        return Err(invalid_marker(byte));
                    }
                }
            }
            PrimitiveKind::U8 => Box::new(read_le!(self, u8)),
            PrimitiveKind::I8 => Box::new(read_le!(self, i8)),
            PrimitiveKind::U16 => Box::new(read_le!(self, u16)),
            PrimitiveKind::I16 => Box::new(read_le!(self, i16)),
            PrimitiveKind::U32 => Box::new(read_le!(self, u32)),
            PrimitiveKind::I32 => Box::new(read_le!(self, i32)),
            PrimitiveKind::U64 => Box::new(read_le!(self, u64)),
            PrimitiveKind::I64 => Box::new(read_le!(self, i64)),
            PrimitiveKind::U128 => Box::new(read_le!(self, u128)),
            PrimitiveKind::I128 => Box::new(read_le!(self, i128)),
            PrimitiveKind::Usize => {
                let value = read_le!(self, u64);
                match usize::try_from(value) {
                    Ok(value) => Box::new(value),
                    Err(_) => {
                        self.pos = start;
                        return Err(invalid_length(value as i64));
                    }
                }
            }
            PrimitiveKind::Isize => {
                let value = read_le!(self, i64);
                match isize::try_from(value) {
                    Ok(value) => Box::new(value),
                    Err(_) => {
                        self.pos = start;
                        return Err(invalid_length(value));
                    }
                }
            }
            PrimitiveKind::F32 => Box::new(read_le!(self, f32)),
            PrimitiveKind::F64 => Box::new(read_le!(self, f64)),
            PrimitiveKind::Char => {
                let value = read_le!(self, u32);
                match char::from_u32(value) {
                    Some(value) => Box::new(value),
                    None => {
                        self.pos = start;
                        return Err(Halt::Fail(CodecError::InvalidChar {
                            context: ErrorContext::default(),
                            value,
                        }));
                    }
                }
            }
            PrimitiveKind::String => Box::new(String::from(self.try_read_str()?)),
            PrimitiveKind::Duration => {
                let bytes = self.take_array::<12>()?;
                let [s0, s1, s2, s3, s4, s5, s6, s7, n0, n1, n2, n3] = bytes;
                let secs = u64::from_le_bytes([s0, s1, s2, s3, s4, s5, s6, s7]);
                let nanos = u32::from_le_bytes([n0, n1, n2, n3]);
                if nanos >= 1_000_000_000 {
                    self.pos = start;
                    return Err(Halt::Fail(CodecError::InvalidDuration {
                        context: ErrorContext::default(),
                        nanos,
                    }));
                }
                Box::new(Duration::new(secs, nanos))
            }
        };
        Ok(value)
    }

    /// Reads an integer of the given kind, widened to `i64`.
    ///
    /// Used for enum discriminants, `kind` must be [an integer kind].
    ///
    /// [an integer kind]: PrimitiveKind::is_integer
    pub fn try_read_int(&mut self, kind: PrimitiveKind) -> Progress<i64> {
        let value = match kind {
            PrimitiveKind::U8 => i64::from(read_le!(self, u8)),
            PrimitiveKind::I8 => i64::from(read_le!(self, i8)),
            PrimitiveKind::U16 => i64::from(read_le!(self, u16)),
            PrimitiveKind::I16 => i64::from(read_le!(self, i16)),
            PrimitiveKind::U32 => i64::from(read_le!(self, u32)),
            PrimitiveKind::I32 => i64::from(read_le!(self, i32)),
            PrimitiveKind::U64 | PrimitiveKind::Usize => read_le!(self, u64) as i64,
            PrimitiveKind::I64 | PrimitiveKind::Isize => read_le!(self, i64),
            other => {
                return Err(Halt::Fail(CodecError::mismatch("integer", other.as_str())));
            }
        };
        Ok(value)
    }

    /// Skips a primitive value of the given kind.
    ///
    /// The bytes are not validated, only their extent matters.
    pub fn try_skip_primitive(&mut self, kind: PrimitiveKind) -> Progress<()> {
        let width = match kind {
            PrimitiveKind::String => {
                let (len, prefix) = self.peek_varint()?;
                prefix + len as usize
            }
            other => fixed_width(other),
        };
        self.take(width).map(|_| ())
    }
}

/// Size of a fixed-width primitive on the wire, `0` for strings.
pub(crate) const fn fixed_width(kind: PrimitiveKind) -> usize {
    match kind {
        PrimitiveKind::Bool | PrimitiveKind::U8 | PrimitiveKind::I8 => 1,
        PrimitiveKind::U16 | PrimitiveKind::I16 => 2,
        PrimitiveKind::U32 | PrimitiveKind::I32 | PrimitiveKind::F32 | PrimitiveKind::Char => 4,
        PrimitiveKind::U64
        | PrimitiveKind::I64
        | PrimitiveKind::Usize
        | PrimitiveKind::Isize
        | PrimitiveKind::F64 => 8,
        PrimitiveKind::Duration => 12,
        PrimitiveKind::U128 | PrimitiveKind::I128 => 16,
        PrimitiveKind::String => 0,
    }
}

#[inline]
fn invalid_length(length: i64) -> Halt {
    Halt::Fail(CodecError::InvalidLength {
        context: ErrorContext::default(),
        length,
    })
}

#[inline]
fn invalid_marker(byte: u8) -> Halt {
    Halt::Fail(CodecError::InvalidMarker {
        context: ErrorContext::default(),
        byte,
    })
}
