// -----------------------------------------------------------------------------
// impl_reflect_struct

/// Implements `TypePath` and `Typed` for a struct with named members.
///
/// The struct must implement [`Default`], decoding starts from the default
/// value and sets members one at a time. Every member type must be `Typed`.
///
/// A member can carry an explicit wire index with `#[index = N]`.
///
/// # Examples
///
/// ```
/// use vc_reflect::{impl_reflect_struct, info::Typed};
///
/// #[derive(Default)]
/// struct Account {
///     id: u64,
///     name: String,
///     tags: Vec<String>,
/// }
///
/// impl_reflect_struct!(Account {
///     #[index = 0]
///     id: u64,
///     name: String,
///     tags: Vec<String>,
/// });
///
/// let info = Account::type_info().as_struct().unwrap();
/// assert_eq!(info.members()[0].index(), Some(0));
/// assert_eq!(info.ty().name(), "Account");
/// ```
#[macro_export]
macro_rules! impl_reflect_struct {
    ($name:ident { $( $(#[index = $index:literal])? $member:ident : $ty:ty ),* $(,)? }) => {
        impl $crate::info::TypePath for $name {
            #[inline(always)]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($name))
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                ::core::stringify!($name)
            }
        }

        impl $crate::info::Typed for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Struct($crate::info::StructInfo::new::<Self>(
                        $crate::__macro_exports::vec![$(
                            $crate::info::MemberInfo::new::<$ty>(
                                ::core::stringify!($member),
                                |owner| {
                                    owner
                                        .downcast_ref::<Self>()
                                        .map(|owner| &owner.$member as &dyn $crate::Reflect)
                                },
                                |owner, value| {
                                    let ::core::option::Option::Some(owner) = owner.downcast_mut::<Self>() else {
                                        return ::core::result::Result::Err(value);
                                    };
                                    owner.$member = value.take::<$ty>()?;
                                    ::core::result::Result::Ok(())
                                },
                            )$(.with_index($index))?
                        ),*],
                    ))
                })
            }
        }
    };
}

// -----------------------------------------------------------------------------
// impl_reflect_enum

/// Implements `TypePath` and `Typed` for a fieldless enum.
///
/// `repr` is the integer type the discriminant is stored as, every
/// variant must be listed.
///
/// # Examples
///
/// ```
/// use vc_reflect::{impl_reflect_enum, info::Typed};
///
/// enum Level { Low, High = 10 }
///
/// impl_reflect_enum!(Level: i32 { Low, High });
///
/// let info = Level::type_info().as_enum().unwrap();
/// assert_eq!(info.variant("High").unwrap().discriminant(), 10);
/// let low = info.from_discriminant(0).unwrap();
/// assert!(matches!(low.downcast_ref::<Level>(), Some(Level::Low)));
/// ```
#[macro_export]
macro_rules! impl_reflect_enum {
    ($name:ident : $repr:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::info::TypePath for $name {
            #[inline(always)]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($name))
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                ::core::stringify!($name)
            }
        }

        impl $crate::info::Typed for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Enum($crate::info::EnumInfo::new::<Self>(
                        <$repr as $crate::info::Primitive>::KIND,
                        $crate::__macro_exports::vec![$(
                            $crate::info::VariantInfo::new(
                                ::core::stringify!($variant),
                                $name::$variant as $repr as i64,
                            )
                        ),*],
                        |value| {
                            value.downcast_ref::<Self>().map(|value| match value {
                                $( $name::$variant => $name::$variant as $repr as i64, )*
                            })
                        },
                        |discriminant| {
                            $(
                                if discriminant == $name::$variant as $repr as i64 {
                                    return ::core::option::Option::Some(
                                        $crate::__macro_exports::Box::new($name::$variant),
                                    );
                                }
                            )*
                            ::core::option::Option::None
                        },
                    ))
                })
            }
        }
    };
}

// -----------------------------------------------------------------------------
// impl_reflect_interface

/// Makes `Box<dyn Trait>` an interface-typed value.
///
/// The trait must have `Reflect` as a supertrait. Every `Typed` type
/// implementing the trait can be wrapped, concrete types still have to be
/// registered with [`TypeRegistry::register_implementation`].
///
/// # Examples
///
/// ```
/// use vc_reflect::{Reflect, impl_reflect_interface, impl_reflect_struct};
/// use vc_reflect::info::{ImplementedBy, Typed};
///
/// trait Shape: Reflect {
///     fn area(&self) -> f64;
/// }
///
/// impl_reflect_interface!(Shape);
///
/// #[derive(Default)]
/// struct Square { side: f64 }
///
/// impl_reflect_struct!(Square { side: f64 });
///
/// impl Shape for Square {
///     fn area(&self) -> f64 { self.side * self.side }
/// }
///
/// let shape = <Box<dyn Shape>>::wrap(Square { side: 2.0 });
/// assert_eq!(shape.area(), 4.0);
///
/// let info = <Box<dyn Shape>>::type_info().as_interface().unwrap();
/// let concrete = info.concrete(&shape).unwrap();
/// assert!(concrete.is::<Square>());
/// ```
///
/// [`TypeRegistry::register_implementation`]: crate::registry::TypeRegistry::register_implementation
#[macro_export]
macro_rules! impl_reflect_interface {
    ($trait:ident) => {
        impl $crate::info::TypePath for $crate::__macro_exports::Box<dyn $trait> {
            #[inline(always)]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($trait))
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                ::core::stringify!($trait)
            }
        }

        impl $crate::info::Typed for $crate::__macro_exports::Box<dyn $trait> {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Interface($crate::info::InterfaceInfo::new::<Self>(
                        |value| {
                            value
                                .downcast_ref::<Self>()
                                .map(|value| $crate::Reflect::as_reflect(&**value))
                        },
                    ))
                })
            }
        }

        impl<T: $trait + $crate::info::Typed> $crate::info::ImplementedBy<T>
            for $crate::__macro_exports::Box<dyn $trait>
        {
            #[inline]
            fn wrap(value: T) -> Self {
                $crate::__macro_exports::Box::new(value)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// impl_reflect_enumerable

/// Implements `TypePath` and `Typed` for a type that can only be iterated.
///
/// `&Type` must implement `IntoIterator<Item = &Item>`. Such types can be
/// encoded but never decoded.
///
/// # Examples
///
/// ```
/// use vc_reflect::{impl_reflect_enumerable, info::Typed};
///
/// struct Window(Vec<u16>);
///
/// impl<'a> IntoIterator for &'a Window {
///     type Item = &'a u16;
///     type IntoIter = core::slice::Iter<'a, u16>;
///     fn into_iter(self) -> Self::IntoIter { self.0.iter() }
/// }
///
/// impl_reflect_enumerable!(Window => u16);
///
/// let info = Window::type_info().as_enumerable().unwrap();
/// assert_eq!(info.iter(&Window(vec![1, 2])).unwrap().count(), 2);
/// ```
#[macro_export]
macro_rules! impl_reflect_enumerable {
    ($name:ident => $item:ty) => {
        impl $crate::info::TypePath for $name {
            #[inline(always)]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($name))
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                ::core::stringify!($name)
            }
        }

        impl $crate::info::Typed for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Enumerable($crate::info::EnumerableInfo::new::<Self, $item>(
                        |value| {
                            value.downcast_ref::<Self>().map(|value| {
                                $crate::__macro_exports::Box::new(
                                    ::core::iter::IntoIterator::into_iter(value)
                                        .map(|item: &$item| item as &dyn $crate::Reflect),
                                ) as $crate::info::ReflectIter<'_>
                            })
                        },
                    ))
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::info::{ImplementedBy, PrimitiveKind, TypePath, Typed};
    use crate::{Reflect, impl_reflect_enum, impl_reflect_interface, impl_reflect_struct};

    #[derive(Default)]
    struct Profile {
        name: String,
        level: u8,
        scores: Vec<u32>,
    }

    impl_reflect_struct!(Profile {
        name: String,
        #[index = 7]
        level: u8,
        scores: Vec<u32>,
    });

    #[derive(Debug, PartialEq)]
    #[repr(i16)]
    enum Mode {
        Off = -1,
        On = 1,
    }

    impl_reflect_enum!(Mode: i16 { Off, On });

    trait Named: Reflect {
        fn label(&self) -> &str;
    }

    impl_reflect_interface!(Named);

    impl Named for Profile {
        fn label(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn struct_members_and_paths() {
        assert_eq!(
            <Profile as TypePath>::type_path(),
            concat!(module_path!(), "::Profile")
        );

        let info = Profile::type_info().as_struct().unwrap();
        let names: Vec<_> = info.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["name", "level", "scores"]);
        assert_eq!(info.member("level").unwrap().index(), Some(7));

        let mut value = info.construct();
        let level = info.member("level").unwrap();
        assert!(level.set(value.as_mut(), Box::new(1_u16)).is_err());
        level.set(value.as_mut(), Box::new(3_u8)).unwrap();

        let got = level.get(value.as_ref()).unwrap();
        assert_eq!(got.downcast_ref::<u8>(), Some(&3));
        assert!(level.get(&0_u8).is_none());
    }

    #[test]
    fn enum_discriminants() {
        let info = Mode::type_info().as_enum().unwrap();
        assert_eq!(info.repr(), PrimitiveKind::I16);
        assert_eq!(info.discriminant(&Mode::Off), Some(-1));
        assert_eq!(info.discriminant(&1_i16), None);

        let on = info.from_discriminant(1).unwrap();
        assert_eq!(on.take::<Mode>().unwrap(), Mode::On);
        assert!(info.from_discriminant(0).is_none());
    }

    #[test]
    fn interface_exposes_concrete_value() {
        let value = <Box<dyn Named>>::wrap(Profile {
            name: String::from("ada"),
            ..Profile::default()
        });
        assert_eq!(value.label(), "ada");

        let info = <Box<dyn Named>>::type_info().as_interface().unwrap();
        let concrete = info.concrete(&value).unwrap();
        assert_eq!(concrete.reflect_type_path(), <Profile as TypePath>::type_path());
    }
}
