//! Containers for static storage of type information.
//!
//! For non generic types, [`NonGenericTypeInfoCell`] stores the [`TypeInfo`]
//! in a [`OnceLock`]. There is no path cell for them, a string literal does.
//!
//! For generic types, the `static CELL` inside a function is shared by every
//! instantiation, so [`GenericTypeInfoCell`] and [`GenericTypePathCell`] key
//! their content by [`TypeId`] behind a [`RwLock`].

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait TypedProperty: Send + Sync + 'static {}

    impl TypedProperty for String {}
    impl TypedProperty for TypeInfo {}
}

use sealed::TypedProperty;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Container for static storage of non-generic type information.
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// Container for static storage of non-generic [`TypeInfo`].
///
/// ```ignore
/// impl Typed for Foo {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(StructInfo::new::<Self>(members)))
///     }
/// }
/// ```
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored value, initializing it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Container for static storage of type information with generics.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// Container for static storage of generic [`TypeInfo`].
///
/// ```ignore
/// impl<T: Typed> Typed for Wrapper<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>(/* .. */)))
///     }
/// }
/// ```
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Container for static storage of generic type paths.
///
/// ```ignore
/// impl<T: TypePath> TypePath for Wrapper<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| impls::concat(&["demo::Wrapper<", T::type_path(), ">"]))
///     }
///     // ..
/// }
/// ```
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value stored for `G`, inserting the result of `f` first if absent.
    ///
    /// Values are leaked, they live for the rest of the process.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &'static T {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &'static T {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            // `f` may recurse into other cells, so it runs outside the lock.
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &'static T {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}
