use alloc::string::String;
use core::time::Duration;

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{Primitive, PrimitiveInfo, PrimitiveKind, TypeInfo, TypePath, Typed};

macro_rules! impl_reflect_primitive {
    ($ty:ident, $kind:ident) => {
        impl_reflect_primitive!($ty, $kind, stringify!($ty), stringify!($ty));
    };
    ($ty:ty, $kind:ident, $path:expr, $name:expr) => {
        impl TypePath for $ty {
            #[inline(always)]
            fn type_path() -> &'static str {
                $path
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                $name
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Primitive(PrimitiveInfo::new::<Self>()))
            }
        }

        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;
        }
    };
}

impl_reflect_primitive!(bool, Bool);
impl_reflect_primitive!(u8, U8);
impl_reflect_primitive!(i8, I8);
impl_reflect_primitive!(u16, U16);
impl_reflect_primitive!(i16, I16);
impl_reflect_primitive!(u32, U32);
impl_reflect_primitive!(i32, I32);
impl_reflect_primitive!(u64, U64);
impl_reflect_primitive!(i64, I64);
impl_reflect_primitive!(u128, U128);
impl_reflect_primitive!(i128, I128);
impl_reflect_primitive!(usize, Usize);
impl_reflect_primitive!(isize, Isize);
impl_reflect_primitive!(f32, F32);
impl_reflect_primitive!(f64, F64);
impl_reflect_primitive!(char, Char);
impl_reflect_primitive!(String, String, "alloc::string::String", "String");
impl_reflect_primitive!(Duration, Duration, "core::time::Duration", "Duration");
