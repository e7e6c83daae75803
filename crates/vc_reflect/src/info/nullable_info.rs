use alloc::boxed::Box;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

/// A container for compile-time info of nullable values, such as `Option<T>`.
///
/// # Examples
///
/// ```
/// use vc_reflect::info::Typed;
///
/// let info = <Option<u16> as Typed>::type_info().as_nullable().unwrap();
/// assert!(info.inner_info().as_primitive().is_some());
///
/// let value = info.some(Box::new(7_u16)).unwrap();
/// let inner = info.get(value.as_ref()).unwrap().unwrap();
/// assert_eq!(inner.downcast_ref::<u16>(), Some(&7));
/// assert_eq!(info.get(info.none().as_ref()).unwrap().is_none(), true);
/// ```
#[derive(Clone, Debug)]
pub struct NullableInfo {
    ty: Type,
    inner_id: TypeId,
    // `TypeInfo` is created on the first visit, use function pointers to delay it.
    inner_info: fn() -> &'static TypeInfo,
    get: fn(&dyn Reflect) -> Option<Option<&dyn Reflect>>,
    none: fn() -> Box<dyn Reflect>,
    some: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl NullableInfo {
    /// Creates a new [`NullableInfo`].
    pub fn new<T: Typed, TInner: Typed>(
        get: fn(&dyn Reflect) -> Option<Option<&dyn Reflect>>,
        none: fn() -> Box<dyn Reflect>,
        some: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner_id: TypeId::of::<TInner>(),
            inner_info: TInner::type_info,
            get,
            none,
            some,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the [`TypeId`] of the wrapped type.
    #[inline(always)]
    pub const fn inner_id(&self) -> TypeId {
        self.inner_id
    }

    /// Returns the [`TypeInfo`] of the wrapped type.
    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }

    /// Returns `Some(None)` for a null value, `Some(Some(inner))` otherwise.
    ///
    /// Returns `None` if `value` is not of this type.
    #[inline]
    pub fn get<'a>(&self, value: &'a dyn Reflect) -> Option<Option<&'a dyn Reflect>> {
        (self.get)(value)
    }

    /// Builds the null value.
    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }

    /// Wraps `inner`, giving it back if it is not of the wrapped type.
    #[inline]
    pub fn some(&self, inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.some)(inner)
    }
}
