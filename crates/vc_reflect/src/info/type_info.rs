use core::any::TypeId;
use core::fmt;

use crate::info::{ArrayInfo, CollectionInfo, EnumInfo, EnumerableInfo, InterfaceInfo};
use crate::info::{ListInfo, MapInfo, NullableInfo, PrimitiveInfo, SetInfo, StructInfo, Type};

// -----------------------------------------------------------------------------
// ReflectKind

/// An enumeration of the "kinds" of a reflected type.
///
/// Each kind corresponds to one [`TypeInfo`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Primitive,
    Enum,
    Nullable,
    Array,
    List,
    Set,
    Map,
    Collection,
    Enumerable,
    Struct,
    Interface,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Primitive => "Primitive",
            Self::Enum => "Enum",
            Self::Nullable => "Nullable",
            Self::Array => "Array",
            Self::List => "List",
            Self::Set => "Set",
            Self::Map => "Map",
            Self::Collection => "Collection",
            Self::Enumerable => "Enumerable",
            Self::Struct => "Struct",
            Self::Interface => "Interface",
        })
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time type information for reflected types.
///
/// A `TypeInfo` describes the *shape* of a type and carries the accessor
/// functions needed to read and build values of that shape.
///
/// Obtained from [`Typed::type_info`](crate::info::Typed::type_info)
/// or [`Reflect::reflect_type_info`](crate::Reflect::reflect_type_info),
/// always as a `&'static` reference.
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Enum(EnumInfo),
    Nullable(NullableInfo),
    Array(ArrayInfo),
    List(ListInfo),
    Set(SetInfo),
    Map(MapInfo),
    Collection(CollectionInfo),
    Enumerable(EnumerableInfo),
    Struct(StructInfo),
    Interface(InterfaceInfo),
}

macro_rules! impl_cast_fn {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the inner [`", stringify!($info), "`] if this is a `", stringify!($kind), "`.")]
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                Self::$kind(info) => Some(info),
                _ => None,
            }
        }
    };
}

impl TypeInfo {
    /// Returns the underlying [`Type`].
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Nullable(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Set(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Collection(info) => info.ty(),
            Self::Enumerable(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::Interface(info) => info.ty(),
        }
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Returns the [`ReflectKind`] of this info.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Nullable(_) => ReflectKind::Nullable,
            Self::Array(_) => ReflectKind::Array,
            Self::List(_) => ReflectKind::List,
            Self::Set(_) => ReflectKind::Set,
            Self::Map(_) => ReflectKind::Map,
            Self::Collection(_) => ReflectKind::Collection,
            Self::Enumerable(_) => ReflectKind::Enumerable,
            Self::Struct(_) => ReflectKind::Struct,
            Self::Interface(_) => ReflectKind::Interface,
        }
    }

    impl_cast_fn!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_fn!(as_enum: Enum => EnumInfo);
    impl_cast_fn!(as_nullable: Nullable => NullableInfo);
    impl_cast_fn!(as_array: Array => ArrayInfo);
    impl_cast_fn!(as_list: List => ListInfo);
    impl_cast_fn!(as_set: Set => SetInfo);
    impl_cast_fn!(as_map: Map => MapInfo);
    impl_cast_fn!(as_collection: Collection => CollectionInfo);
    impl_cast_fn!(as_enumerable: Enumerable => EnumerableInfo);
    impl_cast_fn!(as_struct: Struct => StructInfo);
    impl_cast_fn!(as_interface: Interface => InterfaceInfo);
}
