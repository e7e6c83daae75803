use core::fmt;

use crate::info::{Type, Typed};

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The core primitive types, values with a fixed wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    U128,
    I128,
    Usize,
    Isize,
    F32,
    F64,
    Char,
    String,
    Duration,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 18] = [
        Self::Bool,
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::U64,
        Self::I64,
        Self::U128,
        Self::I128,
        Self::Usize,
        Self::Isize,
        Self::F32,
        Self::F64,
        Self::Char,
        Self::String,
        Self::Duration,
    ];

    /// Returns `true` for the integer kinds that can back an enum.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::U8
                | Self::I8
                | Self::U16
                | Self::I16
                | Self::U32
                | Self::I32
                | Self::U64
                | Self::I64
                | Self::Usize
                | Self::Isize
        )
    }

    /// Returns the primitive's name as written in Rust source.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::U128 => "u128",
            Self::I128 => "i128",
            Self::Usize => "usize",
            Self::Isize => "isize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "String",
            Self::Duration => "Duration",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Links a Rust type to its [`PrimitiveKind`].
///
/// Only implemented for the built-in primitives.
pub trait Primitive: Typed {
    const KIND: PrimitiveKind;
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// A container for compile-time primitive info.
#[derive(Clone, Debug)]
pub struct PrimitiveInfo {
    ty: Type,
    kind: PrimitiveKind,
}

impl PrimitiveInfo {
    /// Creates a new [`PrimitiveInfo`].
    #[inline]
    pub fn new<T: Primitive>() -> Self {
        Self {
            ty: Type::of::<T>(),
            kind: T::KIND,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}
