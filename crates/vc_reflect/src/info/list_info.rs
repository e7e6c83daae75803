use alloc::boxed::Box;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{ReflectIter, Type, TypeInfo, Typed};

/// A container for compile-time list-like info, `Vec<T>` and `VecDeque<T>`.
///
/// # Examples
///
/// ```
/// # use core::any::TypeId;
/// use vc_reflect::info::Typed;
///
/// let info = <Vec<i32> as Typed>::type_info().as_list().unwrap();
/// assert_eq!(info.item_id(), TypeId::of::<i32>());
///
/// let mut list = info.with_capacity(2);
/// info.push(list.as_mut(), Box::new(4_i32)).unwrap();
/// assert_eq!(info.len(list.as_ref()), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct ListInfo {
    ty: Type,
    item_id: TypeId,
    // `TypeInfo` is created on the first visit, use function pointers to delay it.
    item_info: fn() -> &'static TypeInfo,
    with_capacity: fn(usize) -> Box<dyn Reflect>,
    push: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
    len: fn(&dyn Reflect) -> Option<usize>,
    iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
}

impl ListInfo {
    /// Creates a new [`ListInfo`].
    pub fn new<T: Typed, TItem: Typed>(
        with_capacity: fn(usize) -> Box<dyn Reflect>,
        push: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
        len: fn(&dyn Reflect) -> Option<usize>,
        iter: fn(&dyn Reflect) -> Option<ReflectIter<'_>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            item_id: TypeId::of::<TItem>(),
            item_info: TItem::type_info,
            with_capacity,
            push,
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

    /// Builds an empty list with room for `capacity` items.
    #[inline]
    pub fn with_capacity(&self, capacity: usize) -> Box<dyn Reflect> {
        (self.with_capacity)(capacity)
    }

    /// Appends `item`, giving it back on a type mismatch.
    #[inline]
    pub fn push(
        &self,
        list: &mut dyn Reflect,
        item: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        (self.push)(list, item)
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
