use alloc::boxed::Box;
use alloc::vec::Vec;

use vc_reflect::info::{PrimitiveKind, TypeInfo};

use crate::error::{CodecError, ErrorContext};

// -----------------------------------------------------------------------------
// WireKind

/// The layout descriptor written after every member tag and after the type
/// path of every polymorphic value.
///
/// It describes how the member's value is laid out, enough to skip the value
/// without knowing its type. One byte per node:
///
/// | node | bytes |
/// |---|---|
/// | primitive | `0x01..=0x12`, in [`PrimitiveKind::ALL`] order |
/// | object | `0x20` |
/// | sequence | `0x21 <element>` |
/// | map | `0x22 <key> <value>` |
/// | typed | `0x23` |
/// | nullable | `0x30 <inner>` |
///
/// Objects describe their own members and typed values carry the
/// descriptor of their concrete value, so neither needs child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireKind {
    Primitive(PrimitiveKind),
    Object,
    Sequence(Box<WireKind>),
    Map(Box<WireKind>, Box<WireKind>),
    Typed,
    Nullable(Box<WireKind>),
}

const OBJECT: u8 = 0x20;
const SEQUENCE: u8 = 0x21;
const MAP: u8 = 0x22;
const TYPED: u8 = 0x23;
const NULLABLE: u8 = 0x30;

impl WireKind {
    /// Maximum nesting of a descriptor, the root node counts as one.
    pub const MAX_NESTING: usize = 32;

    /// Returns the descriptor of values of the given type.
    pub fn of(info: &TypeInfo) -> Self {
        match info {
            TypeInfo::Primitive(info) => Self::Primitive(info.kind()),
            TypeInfo::Enum(info) => Self::Primitive(info.repr()),
            TypeInfo::Nullable(info) => Self::Nullable(Box::new(Self::of(info.inner_info()))),
            TypeInfo::Array(info) => Self::sequence(info.item_info()),
            TypeInfo::List(info) => Self::sequence(info.item_info()),
            TypeInfo::Set(info) => Self::sequence(info.item_info()),
            TypeInfo::Collection(info) => Self::sequence(info.item_info()),
            TypeInfo::Enumerable(info) => Self::sequence(info.item_info()),
            TypeInfo::Map(info) => Self::Map(
                Box::new(Self::of_element(info.key_info())),
                Box::new(Self::of_element(info.value_info())),
            ),
            TypeInfo::Struct(_) => Self::Object,
            TypeInfo::Interface(_) => Self::Typed,
        }
    }

    #[inline]
    fn sequence(item: &TypeInfo) -> Self {
        Self::Sequence(Box::new(Self::of_element(item)))
    }

    // Elements always carry a null marker, a nullable element maps onto it.
    fn of_element(info: &TypeInfo) -> Self {
        match info {
            TypeInfo::Nullable(info) => Self::of(info.inner_info()),
            _ => Self::of(info),
        }
    }

    /// Returns the nesting depth of the descriptor.
    pub fn depth(&self) -> usize {
        match self {
            Self::Primitive(_) | Self::Object | Self::Typed => 1,
            Self::Sequence(inner) | Self::Nullable(inner) => 1 + inner.depth(),
            Self::Map(key, value) => 1 + key.depth().max(value.depth()),
        }
    }

    /// Appends the encoded descriptor to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::Primitive(kind) => out.push(primitive_byte(*kind)),
            Self::Object => out.push(OBJECT),
            Self::Typed => out.push(TYPED),
            Self::Sequence(inner) => {
                out.push(SEQUENCE);
                inner.encode(out);
            }
            Self::Nullable(inner) => {
                out.push(NULLABLE);
                inner.encode(out);
            }
            Self::Map(key, value) => {
                out.push(MAP);
                key.encode(out);
                value.encode(out);
            }
        }
    }

    /// Returns the encoded descriptor.
    pub fn to_bytes(&self) -> Box<[u8]> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out.into_boxed_slice()
    }

    /// Decodes a descriptor from the start of `bytes`.
    ///
    /// Returns `Ok(None)` if `bytes` ends before the descriptor does,
    /// otherwise the descriptor and the number of bytes it occupies.
    pub fn decode(bytes: &[u8]) -> Result<Option<(Self, usize)>, CodecError> {
        let mut cursor = 0;
        match Self::decode_node(bytes, &mut cursor, 1)? {
            Some(kind) => Ok(Some((kind, cursor))),
            None => Ok(None),
        }
    }

    fn decode_node(
        bytes: &[u8],
        cursor: &mut usize,
        depth: usize,
    ) -> Result<Option<Self>, CodecError> {
        if depth > Self::MAX_NESTING {
            return Err(CodecError::WireKindTooDeep {
                context: ErrorContext::default(),
            });
        }
        let Some(&byte) = bytes.get(*cursor) else {
            return Ok(None);
        };
        *cursor += 1;

        let kind = match byte {
            OBJECT => Self::Object,
            TYPED => Self::Typed,
            SEQUENCE | NULLABLE => {
                let Some(inner) = Self::decode_node(bytes, cursor, depth + 1)? else {
                    return Ok(None);
                };
                if byte == SEQUENCE {
                    Self::Sequence(Box::new(inner))
                } else {
                    Self::Nullable(Box::new(inner))
                }
            }
            MAP => {
                let Some(key) = Self::decode_node(bytes, cursor, depth + 1)? else {
                    return Ok(None);
                };
                let Some(value) = Self::decode_node(bytes, cursor, depth + 1)? else {
                    return Ok(None);
                };
                Self::Map(Box::new(key), Box::new(value))
            }
            _ => match primitive_from_byte(byte) {
                Some(kind) => Self::Primitive(kind),
                None => {
                    return Err(CodecError::InvalidWireKind {
                        context: ErrorContext::default(),
                        byte,
                    });
                }
            },
        };
        Ok(Some(kind))
    }
}

#[inline]
fn primitive_byte(kind: PrimitiveKind) -> u8 {
    // `ALL` has 18 entries, the position always fits.
    let index = PrimitiveKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
    index as u8 + 1
}

#[inline]
fn primitive_from_byte(byte: u8) -> Option<PrimitiveKind> {
    let index = usize::from(byte).checked_sub(1)?;
    PrimitiveKind::ALL.get(index).copied()
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use vc_reflect::info::{PrimitiveKind, Typed};

    use super::WireKind;
    use crate::CodecError;

    #[test]
    fn kinds_of_containers_strip_element_nullability() {
        let kind = WireKind::of(<Vec<Option<u8>> as Typed>::type_info());
        assert_eq!(kind, WireKind::Sequence(Box::new(WireKind::Primitive(PrimitiveKind::U8))));

        let kind = WireKind::of(<Option<BTreeMap<String, Vec<i64>>> as Typed>::type_info());
        assert_eq!(kind.to_bytes().as_ref(), &[0x30, 0x22, 0x11, 0x21, 0x09]);
        assert_eq!(kind.depth(), 4);
    }

    #[test]
    fn decode_reports_incomplete_and_invalid_bytes() {
        let bytes = [0x22, 0x11, 0x21, 0x09, 0xFF];
        let (kind, used) = WireKind::decode(&bytes).unwrap().unwrap();
        assert_eq!(used, 4);
        assert_eq!(kind.to_bytes().as_ref(), &bytes[..4]);

        for end in 0..4 {
            assert!(WireKind::decode(&bytes[..end]).unwrap().is_none());
        }
        assert!(matches!(
            WireKind::decode(&[0x21, 0x13]),
            Err(CodecError::InvalidWireKind { byte: 0x13, .. })
        ));

        let deep = vec![0x30; WireKind::MAX_NESTING + 1];
        assert!(matches!(
            WireKind::decode(&deep),
            Err(CodecError::WireKindTooDeep { .. })
        ));
    }
}
