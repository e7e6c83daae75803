use core::fmt;

use vc_reflect::info::{PrimitiveKind, TypeInfo};

// -----------------------------------------------------------------------------
// TypeShape

/// The wire strategy chosen for a type.
///
/// Computed once from the type's [`TypeInfo`] and stored with its converter.
/// Containers carry the infos of their type arguments.
#[derive(Clone, Copy)]
pub enum TypeShape {
    CorePrimitive(PrimitiveKind),
    /// `Option` of a core primitive.
    CorePrimitiveNullable(PrimitiveKind),
    /// A fieldless enum, stored as its integer representation.
    Enum(PrimitiveKind),
    /// `Option` of anything that is not a core primitive.
    Nullable {
        inner: &'static TypeInfo,
    },
    /// Fixed or boxed arrays, rebuilt by index.
    Array {
        item: &'static TypeInfo,
        len: Option<usize>,
    },
    ListLike {
        item: &'static TypeInfo,
    },
    SetLike {
        item: &'static TypeInfo,
    },
    DictionaryLike {
        key: &'static TypeInfo,
        value: &'static TypeInfo,
    },
    /// Collections that can only be added to and counted.
    CollectionLike {
        item: &'static TypeInfo,
    },
    /// Types that can only be iterated, they are never decoded.
    EnumerableOnly {
        item: &'static TypeInfo,
    },
    /// Trait-object values, always written with their concrete type path.
    Interface,
    Object,
}

impl TypeShape {
    /// Selects the shape of a type.
    ///
    /// The checks run in a fixed order: core primitives, enums, arrays,
    /// lists, sets, dictionaries, collections, enumerables, interfaces and
    /// finally objects. A nullable wrapper is classified by what it wraps.
    pub fn of(info: &'static TypeInfo) -> Self {
        match info {
            TypeInfo::Primitive(info) => Self::CorePrimitive(info.kind()),
            TypeInfo::Nullable(nullable) => match nullable.inner_info() {
                TypeInfo::Primitive(inner) => Self::CorePrimitiveNullable(inner.kind()),
                inner => Self::Nullable { inner },
            },
            TypeInfo::Enum(info) => Self::Enum(info.repr()),
            TypeInfo::Array(info) => Self::Array {
                item: info.item_info(),
                len: info.fixed_len(),
            },
            TypeInfo::List(info) => Self::ListLike {
                item: info.item_info(),
            },
            TypeInfo::Set(info) => Self::SetLike {
                item: info.item_info(),
            },
            TypeInfo::Map(info) => Self::DictionaryLike {
                key: info.key_info(),
                value: info.value_info(),
            },
            TypeInfo::Collection(info) => Self::CollectionLike {
                item: info.item_info(),
            },
            TypeInfo::Enumerable(info) => Self::EnumerableOnly {
                item: info.item_info(),
            },
            TypeInfo::Interface(_) => Self::Interface,
            TypeInfo::Struct(_) => Self::Object,
        }
    }

    /// Returns `true` if values of this shape cannot be decoded.
    #[inline]
    pub const fn is_write_only(&self) -> bool {
        matches!(self, Self::EnumerableOnly { .. })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::CorePrimitive(_) => "CorePrimitive",
            Self::CorePrimitiveNullable(_) => "CorePrimitiveNullable",
            Self::Enum(_) => "Enum",
            Self::Nullable { .. } => "Nullable",
            Self::Array { .. } => "Array",
            Self::ListLike { .. } => "ListLike",
            Self::SetLike { .. } => "SetLike",
            Self::DictionaryLike { .. } => "DictionaryLike",
            Self::CollectionLike { .. } => "CollectionLike",
            Self::EnumerableOnly { .. } => "EnumerableOnly",
            Self::Interface => "Interface",
            Self::Object => "Object",
        }
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple(self.name());
        match self {
            Self::CorePrimitive(kind) | Self::CorePrimitiveNullable(kind) | Self::Enum(kind) => {
                tuple.field(kind);
            }
            Self::Nullable { inner: item }
            | Self::Array { item, .. }
            | Self::ListLike { item }
            | Self::SetLike { item }
            | Self::CollectionLike { item }
            | Self::EnumerableOnly { item } => {
                tuple.field(&item.type_path());
            }
            Self::DictionaryLike { key, value } => {
                tuple.field(&key.type_path()).field(&value.type_path());
            }
            Self::Interface | Self::Object => {}
        }
        tuple.finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::{BTreeMap, LinkedList};
    use alloc::string::String;
    use alloc::vec::Vec;

    use vc_reflect::info::{PrimitiveKind, Typed};
    use vc_reflect::{impl_reflect_enum, impl_reflect_enumerable, impl_reflect_struct};

    use super::TypeShape;

    #[derive(Default)]
    struct Leaf {
        id: u32,
    }

    impl_reflect_struct!(Leaf { id: u32 });

    enum Color {
        Red,
        Blue,
    }

    impl_reflect_enum!(Color: u8 { Red, Blue });

    struct Ring(Vec<u8>);

    impl<'a> IntoIterator for &'a Ring {
        type Item = &'a u8;
        type IntoIter = core::slice::Iter<'a, u8>;
        fn into_iter(self) -> Self::IntoIter {
            self.0.iter()
        }
    }

    impl_reflect_enumerable!(Ring => u8);

    fn shape<T: Typed>() -> TypeShape {
        TypeShape::of(T::type_info())
    }

    #[test]
    fn selection_follows_the_type_info() {
        assert!(matches!(shape::<i64>(), TypeShape::CorePrimitive(PrimitiveKind::I64)));
        assert!(matches!(
            shape::<Option<String>>(),
            TypeShape::CorePrimitiveNullable(PrimitiveKind::String)
        ));
        assert!(matches!(shape::<Option<Leaf>>(), TypeShape::Nullable { .. }));
        assert!(matches!(shape::<Color>(), TypeShape::Enum(PrimitiveKind::U8)));
        assert!(matches!(shape::<[u8; 4]>(), TypeShape::Array { len: Some(4), .. }));
        assert!(matches!(shape::<Box<[u8]>>(), TypeShape::Array { len: None, .. }));
        assert!(matches!(shape::<Vec<Leaf>>(), TypeShape::ListLike { .. }));
        assert!(matches!(shape::<BTreeMap<u8, Leaf>>(), TypeShape::DictionaryLike { .. }));
        assert!(matches!(shape::<LinkedList<u8>>(), TypeShape::CollectionLike { .. }));
        assert!(matches!(shape::<Leaf>(), TypeShape::Object));

        let ring = shape::<Ring>();
        assert!(ring.is_write_only());
        assert_eq!(alloc::format!("{ring:?}"), "EnumerableOnly(\"u8\")");
    }
}
