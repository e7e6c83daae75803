//! Built-in reflection impls and the utilities used to write them.
//!
//! - [`concat`]: An efficient string concatenation function.
//! - [`NonGenericTypeInfoCell`]: Used to implement [`Typed`] for non-generic types.
//! - [`GenericTypePathCell`]: Used to implement [`TypePath`] for generic types.
//! - [`GenericTypeInfoCell`]: Used to implement [`Typed`] for generic types.
//!
//! ## Implemented Menu
//!
//! - primitives: `bool`, `char`, `u8`-`u128`, `i8`-`i128`, `usize`, `isize`,
//!   `f32`, `f64`, `String`, `core::time::Duration`
//! - nullable: `Option<T>`
//! - arrays: `[T; N]`, `Box<[T]>`
//! - lists: `Vec<T>`, `VecDeque<T>`
//! - collections: `LinkedList<T>`
//! - sets: `BTreeSet<T>`, `std::collections::HashSet<T>`, `vc_utils::hash::HashSet<T>`
//! - maps: `BTreeMap<K, V>`, `std::collections::HashMap<K, V>`, `vc_utils::hash::HashMap<K, V>`
//!
//! [`TypePath`]: crate::info::TypePath
//! [`Typed`]: crate::info::Typed

// -----------------------------------------------------------------------------
// Modules

mod cell;

mod collections;
mod maps;
mod option;
mod primitives;
mod sequences;
mod sets;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};

/// An efficient string concatenation function.
///
/// This is usually used for the implementation of `TypePath`.
///
/// # Example
///
/// ```
/// use vc_reflect::impls;
///
/// let s = impls::concat(&["module", "::", "name", "<", "T" , ">"]);
///
/// assert_eq!(s.capacity(), 15);
/// ```
///
/// Inline is prohibited here to reduce compilation time.
#[inline(never)]
pub fn concat(arr: &[&str]) -> ::alloc::string::String {
    let mut len = 0usize;
    for &item in arr {
        len += item.len();
    }
    let mut res = ::alloc::string::String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}

/// Implements `TypePath` for a generic type from its path and name prefixes.
///
/// The generic arguments are appended from the argument types' own paths.
macro_rules! impl_generic_type_path {
    ($ty:ty where [$($bounds:tt)*], $path:expr, $name:expr, <$($arg:ident),+>) => {
        impl<$($bounds)*> $crate::info::TypePath for $ty {
            fn type_path() -> &'static str {
                static CELL: $crate::impls::GenericTypePathCell = $crate::impls::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    $crate::impls::concat(&[
                        $path, "<",
                        $crate::impls::join_args!(type_path; $($arg),+),
                        ">",
                    ])
                })
            }

            fn type_name() -> &'static str {
                static CELL: $crate::impls::GenericTypePathCell = $crate::impls::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    $crate::impls::concat(&[
                        $name, "<",
                        $crate::impls::join_args!(type_name; $($arg),+),
                        ">",
                    ])
                })
            }
        }
    };
}

macro_rules! join_args {
    ($f:ident; $first:ident) => {
        <$first as $crate::info::TypePath>::$f()
    };
    ($f:ident; $first:ident, $second:ident) => {
        &$crate::impls::concat(&[
            <$first as $crate::info::TypePath>::$f(),
            ", ",
            <$second as $crate::info::TypePath>::$f(),
        ])
    };
}

pub(crate) use {impl_generic_type_path, join_args};
