use crate::Reflect;
use crate::info::{Type, Typed};

/// A container for compile-time info of interface-typed values,
/// boxed trait objects such as `Box<dyn Shape>`.
///
/// The concrete type of an interface value is only known at run time,
/// [`concrete`](InterfaceInfo::concrete) exposes it.
#[derive(Clone, Debug)]
pub struct InterfaceInfo {
    ty: Type,
    concrete: fn(&dyn Reflect) -> Option<&dyn Reflect>,
}

impl InterfaceInfo {
    /// Creates a new [`InterfaceInfo`].
    pub fn new<T: Typed>(concrete: fn(&dyn Reflect) -> Option<&dyn Reflect>) -> Self {
        Self {
            ty: Type::of::<T>(),
            concrete,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the concrete value behind an interface value.
    #[inline]
    pub fn concrete<'a>(&self, value: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        (self.concrete)(value)
    }
}

// -----------------------------------------------------------------------------
// ImplementedBy

/// Wraps a concrete value into an interface value.
///
/// Implemented by [`impl_reflect_interface!`](crate::impl_reflect_interface)
/// for every type implementing the trait, registered per pair with
/// [`TypeRegistry::register_implementation`].
///
/// [`TypeRegistry::register_implementation`]: crate::registry::TypeRegistry::register_implementation
pub trait ImplementedBy<T: Typed>: Typed {
    fn wrap(value: T) -> Self;
}
