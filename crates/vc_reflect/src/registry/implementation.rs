use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::info::{ImplementedBy, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Implementation

/// A registered implementation of an interface by a concrete type.
///
/// Holds the concrete type's info and the function wrapping a boxed
/// concrete value into a boxed interface value.
#[derive(Clone, Copy)]
pub struct Implementation {
    concrete: &'static TypeInfo,
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl Implementation {
    /// Creates the implementation of interface `I` by `T`.
    pub fn of<I: ImplementedBy<T>, T: Typed>() -> Self {
        fn wrap<I: ImplementedBy<T>, T: Typed>(
            value: Box<dyn Reflect>,
        ) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
            Ok(Box::new(I::wrap(value.take::<T>()?)))
        }

        Self {
            concrete: T::type_info(),
            wrap: wrap::<I, T>,
        }
    }

    /// Returns the [`TypeInfo`] of the concrete type.
    #[inline(always)]
    pub const fn concrete(&self) -> &'static TypeInfo {
        self.concrete
    }

    /// Wraps a concrete value into the interface value.
    ///
    /// Gives the value back if it is not of the concrete type.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("concrete", &self.concrete.type_path())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Fallback

/// The stand-in of an interface for values whose concrete type is unknown.
///
/// Instantiating it yields the default value of the fallback type, already
/// wrapped into the interface.
#[derive(Clone, Copy)]
pub struct Fallback {
    concrete: &'static TypeInfo,
    make: fn() -> Box<dyn Reflect>,
}

impl Fallback {
    /// Creates the fallback of interface `I`, standing in with `T::default()`.
    pub fn of<I: ImplementedBy<T>, T: Typed + Default>() -> Self {
        fn make<I: ImplementedBy<T>, T: Typed + Default>() -> Box<dyn Reflect> {
            Box::new(I::wrap(T::default()))
        }

        Self {
            concrete: T::type_info(),
            make: make::<I, T>,
        }
    }

    /// Returns the [`TypeInfo`] of the stand-in type.
    #[inline(always)]
    pub const fn concrete(&self) -> &'static TypeInfo {
        self.concrete
    }

    /// Returns a fresh interface value holding the stand-in.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Reflect> {
        (self.make)()
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallback")
            .field("concrete", &self.concrete.type_path())
            .finish_non_exhaustive()
    }
}
