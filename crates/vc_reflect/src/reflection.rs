use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// Reflect

/// The object-safe value trait of the type model.
///
/// `Reflect` is implemented for every [`Typed`] type, it should not be
/// implemented manually. Use the declaration macros (for example
/// [`impl_reflect_struct!`](crate::impl_reflect_struct)) to make a type
/// reflectable.
///
/// Values are inspected and built through the accessor functions stored in
/// their [`TypeInfo`], the trait itself only carries identity and casts.
///
/// # Examples
///
/// ```
/// use vc_reflect::Reflect;
///
/// let value: Box<dyn Reflect> = Box::new(5_u32);
/// assert!(value.is::<u32>());
/// assert_eq!(value.reflect_type_path(), "u32");
/// assert_eq!(value.take::<u32>().unwrap(), 5);
/// ```
pub trait Reflect: Any + Send + Sync {
    /// Returns the [`TypeInfo`] of the underlying type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// Returns the type path of the underlying type.
    fn reflect_type_path(&self) -> &'static str;

    /// Casts this value to a reflected value.
    fn as_reflect(&self) -> &dyn Reflect;

    /// Casts this value to a mutable reflected value.
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    /// Casts this boxed value to a boxed reflected value.
    fn into_boxed_reflect(self: Box<Self>) -> Box<dyn Reflect>;
}

impl<T: Typed> Reflect for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        <T as TypePath>::type_path()
    }

    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        self
    }

    #[inline(always)]
    fn into_boxed_reflect(self: Box<Self>) -> Box<dyn Reflect> {
        self
    }
}

impl dyn Reflect {
    /// Returns the [`TypeId`] of the underlying value.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        <dyn Any>::type_id(self)
    }

    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, keeping it boxed.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("dyn Reflect")
            .field(&self.reflect_type_path())
            .finish()
    }
}
