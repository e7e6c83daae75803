use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{ReflectIter, Type, TypeInfo, Typed};

/// A container for compile-time info of arrays, `[T; N]` and `Box<[T]>`.
///
/// Arrays cannot grow, so a decoded array is assembled at once from
/// its items in index order.
///
/// # Examples
///
/// ```
/// use vc_reflect::info::Typed;
///
/// let info = <[u8; 3] as Typed>::type_info().as_array().unwrap();
/// assert_eq!(info.fixed_len(), Some(3));
///
/// let value = info.assemble(vec![Box::new(1_u8), Box::new(2_u8), Box::new(3_u8)]).unwrap();
/// assert_eq!(value.downcast_ref::<[u8; 3]>(), Some(&[1, 2, 3]));
/// assert!(info.assemble(vec![Box::new(1_u8)]).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ArrayInfo {
    ty: Type,
    item_id: TypeId,
    // `TypeInfo` is created on the first visit, use function pointers to delay it.
    item_info: fn() -> &'static TypeInfo,
    fixed_len: Option<usize>,
    len: fn(&dyn Reflect) -> Option<usize>,
    iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
    assemble: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
}

impl ArrayInfo {
    /// Creates a new [`ArrayInfo`].
    ///
    /// `fixed_len` is `Some(N)` for arrays whose length is part of the type.
    pub fn new<T: Typed, TItem: Typed>(
        fixed_len: Option<usize>,
        len: fn(&dyn Reflect) -> Option<usize>,
        iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
        assemble: fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            item_id: TypeId::of::<TItem>(),
            item_info: TItem::type_info,
            fixed_len,
            len,
            iter,
            assemble,
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

    #[inline(always)]
    pub const fn fixed_len(&self) -> Option<usize> {
        self.fixed_len
    }

    #[inline]
    pub fn len(&self, value: &dyn Reflect) -> Option<usize> {
        (self.len)(value)
    }

    #[inline]
    pub fn iter<'a>(&self, value: &'a dyn Reflect) -> Option<ReflectIter<'a>> {
        (self.iter)(value)
    }

    /// Builds the array from its items.
    ///
    /// Returns `None` if an item has the wrong type or the count does not
    /// match [`fixed_len`](Self::fixed_len).
    #[inline]
    pub fn assemble(&self, items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
        (self.assemble)(items)
    }
}
