use alloc::boxed::Box;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{ReflectIter, Type, TypeInfo, Typed};

/// A container for compile-time set-like info.
///
/// Duplicate items collapse on insertion, the iteration order is the
/// order of the underlying set.
#[derive(Clone, Debug)]
pub struct SetInfo {
    ty: Type,
    item_id: TypeId,
    // `TypeInfo` is created on the first visit, use function pointers to delay it.
    item_info: fn() -> &'static TypeInfo,
    with_capacity: fn(usize) -> Box<dyn Reflect>,
    insert: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
    len: fn(&dyn Reflect) -> Option<usize>,
    iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
}

impl SetInfo {
    /// Creates a new [`SetInfo`].
    pub fn new<T: Typed, TItem: Typed>(
        with_capacity: fn(usize) -> Box<dyn Reflect>,
        insert: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
        len: fn(&dyn Reflect) -> Option<usize>,
        iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            item_id: TypeId::of::<TItem>(),
            item_info: TItem::type_info,
            with_capacity,
            insert,
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

    #[inline]
    pub fn with_capacity(&self, capacity: usize) -> Box<dyn Reflect> {
        (self.with_capacity)(capacity)
    }

    /// Inserts `item`, giving it back on a type mismatch.
    #[inline]
    pub fn insert(
        &self,
        set: &mut dyn Reflect,
        item: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        (self.insert)(set, item)
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
