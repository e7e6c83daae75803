use alloc::boxed::Box;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{ReflectIter, Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// CollectionInfo

/// A container for compile-time info of collections that only support
/// "add" and "count", such as `LinkedList<T>`.
#[derive(Clone, Debug)]
pub struct CollectionInfo {
    ty: Type,
    item_id: TypeId,
    item_info: fn() -> &'static TypeInfo,
    new: fn() -> Box<dyn Reflect>,
    add: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
    len: fn(&dyn Reflect) -> Option<usize>,
    iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
}

impl CollectionInfo {
    /// Creates a new [`CollectionInfo`].
    pub fn new<T: Typed, TItem: Typed>(
        new: fn() -> Box<dyn Reflect>,
        add: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
        len: fn(&dyn Reflect) -> Option<usize>,
        iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            item_id: TypeId::of::<TItem>(),
            item_info: TItem::type_info,
            new,
            add,
            len,
            iter,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn item_id(&self) -> TypeId {
        self.item_id
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// Builds an empty collection.
    #[inline]
    pub fn empty(&self) -> Box<dyn Reflect> {
        (self.new)()
    }

    #[inline]
    pub fn add(
        &self,
        collection: &mut dyn Reflect,
        item: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        (self.add)(collection, item)
    }

    #[inline]
    pub fn len(&self, value: &dyn Reflect) -> Option<usize> {
        (self.len)(value)
    }

    #[inline]
    pub fn iter<'a>(&self, value: &'a dyn Reflect) -> Option<ReflectIter<'a>> {
        (self.iter)(value)
    }
}

// -----------------------------------------------------------------------------
// EnumerableInfo

/// A container for compile-time info of types that can only be iterated.
///
/// Such types can be written but never rebuilt from the wire.
#[derive(Clone, Debug)]
pub struct EnumerableInfo {
    ty: Type,
    item_id: TypeId,
    item_info: fn() -> &'static TypeInfo,
    iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
}

impl EnumerableInfo {
    /// Creates a new [`EnumerableInfo`].
    pub fn new<T: Typed, TItem: Typed>(iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>) -> Self {
        Self {
            ty: Type::of::<T>(),
            item_id: TypeId::of::<TItem>(),
            item_info: TItem::type_info,
            iter,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn item_id(&self) -> TypeId {
        self.item_id
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    #[inline]
    pub fn iter<'a>(&self, value: &'a dyn Reflect) -> Option<ReflectIter<'a>> {
        (self.iter)(value)
    }
}
