use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// MemberInfo

/// A named member of a struct, with its accessors.
///
/// `index` is the optional explicit wire index of the member. Members
/// without an index are numbered after the highest explicit one.
#[derive(Clone, Debug)]
pub struct MemberInfo {
    name: &'static str,
    index: Option<u16>,
    type_id: TypeId,
    // `TypeInfo` is created on the first visit, use function pointers to delay it.
    type_info: fn() -> &'static TypeInfo,
    get: fn(&dyn Reflect) -> Option<&dyn Reflect>,
    set: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
}

impl MemberInfo {
    /// Creates a new [`MemberInfo`] for a member of type `T`.
    pub fn new<T: Typed>(
        name: &'static str,
        get: fn(&dyn Reflect) -> Option<&dyn Reflect>,
        set: fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
    ) -> Self {
        Self {
            name,
            index: None,
            type_id: TypeId::of::<T>(),
            type_info: T::type_info,
            get,
            set,
        }
    }

    /// Sets the explicit wire index.
    #[inline]
    pub const fn with_index(mut self, index: u16) -> Self {
        self.index = Some(index);
        self
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn index(&self) -> Option<u16> {
        self.index
    }

    #[inline(always)]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    /// Returns the member of `owner`, or `None` if `owner` has the wrong type.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        (self.get)(owner)
    }

    /// Replaces the member of `owner`, giving `value` back on a type mismatch.
    #[inline]
    pub fn set(
        &self,
        owner: &mut dyn Reflect,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        (self.set)(owner, value)
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// A container for compile-time struct info.
///
/// Structs are rebuilt by starting from their [`Default`] value and
/// setting members one at a time.
///
/// # Examples
///
/// ```
/// use vc_reflect::{impl_reflect_struct, info::Typed};
///
/// #[derive(Default)]
/// struct Pair { left: u8, right: u8 }
///
/// impl_reflect_struct!(Pair { #[index = 4] left: u8, right: u8 });
///
/// let info = Pair::type_info().as_struct().unwrap();
/// assert_eq!(info.member("left").unwrap().index(), Some(4));
/// assert_eq!(info.member("right").unwrap().index(), None);
///
/// let mut pair = info.construct();
/// info.member("right").unwrap().set(pair.as_mut(), Box::new(9_u8)).unwrap();
/// assert_eq!(pair.downcast_ref::<Pair>().unwrap().right, 9);
/// ```
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty: Type,
    members: Box<[MemberInfo]>,
    construct: fn() -> Box<dyn Reflect>,
}

impl StructInfo {
    /// Creates a new [`StructInfo`].
    pub fn new<T: Typed + Default>(members: Vec<MemberInfo>) -> Self {
        fn construct<T: Typed + Default>() -> Box<dyn Reflect> {
            Box::new(T::default())
        }

        Self {
            ty: Type::of::<T>(),
            members: members.into_boxed_slice(),
            construct: construct::<T>,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the members in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Returns the member with the given name.
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Builds the default value of the struct.
    #[inline]
    pub fn construct(&self) -> Box<dyn Reflect> {
        (self.construct)()
    }
}
