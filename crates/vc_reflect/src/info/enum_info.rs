use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::{PrimitiveKind, Type, Typed};

/// A fieldless enum variant and its discriminant.
#[derive(Clone, Debug)]
pub struct VariantInfo {
    name: &'static str,
    discriminant: i64,
}

impl VariantInfo {
    #[inline]
    pub const fn new(name: &'static str, discriminant: i64) -> Self {
        Self { name, discriminant }
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn discriminant(&self) -> i64 {
        self.discriminant
    }
}

/// A container for compile-time info of fieldless enums.
///
/// The enum is stored as its discriminant, encoded with the `repr` integer.
///
/// # Examples
///
/// ```
/// use vc_reflect::{impl_reflect_enum, info::{PrimitiveKind, Typed}};
///
/// #[derive(Clone, Copy)]
/// #[repr(u8)]
/// enum Color { Red = 1, Blue = 4 }
///
/// impl_reflect_enum!(Color: u8 { Red, Blue });
///
/// let info = Color::type_info().as_enum().unwrap();
/// assert_eq!(info.repr(), PrimitiveKind::U8);
/// assert_eq!(info.discriminant(&Color::Blue), Some(4));
/// assert!(info.from_discriminant(2).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct EnumInfo {
    ty: Type,
    repr: PrimitiveKind,
    variants: Box<[VariantInfo]>,
    discriminant: fn(&dyn Reflect) -> Option<i64>,
    from_discriminant: fn(i64) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    /// Creates a new [`EnumInfo`].
    ///
    /// `repr` must be an integer kind.
    pub fn new<T: Typed>(
        repr: PrimitiveKind,
        variants: Vec<VariantInfo>,
        discriminant: fn(&dyn Reflect) -> Option<i64>,
        from_discriminant: fn(i64) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        debug_assert!(repr.is_integer(), "enum repr must be an integer");
        Self {
            ty: Type::of::<T>(),
            repr,
            variants: variants.into_boxed_slice(),
            discriminant,
            from_discriminant,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the integer kind the discriminant is stored as.
    #[inline(always)]
    pub const fn repr(&self) -> PrimitiveKind {
        self.repr
    }

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    /// Returns the variant with the given name.
    pub fn variant(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Returns the discriminant of `value`, or `None` if it is not this enum.
    #[inline]
    pub fn discriminant(&self, value: &dyn Reflect) -> Option<i64> {
        (self.discriminant)(value)
    }

    /// Builds the variant with the given discriminant.
    #[inline]
    pub fn from_discriminant(&self, discriminant: i64) -> Option<Box<dyn Reflect>> {
        (self.from_discriminant)(discriminant)
    }
}
