//! Compile-time type information.
//!
//! - [`TypePath`] and [`Typed`]: static accessors implemented per type.
//! - [`TypeInfo`]: the shape of a type, one variant per [`ReflectKind`].
//! - `XxxInfo`: the per-shape containers with their accessor functions.

// -----------------------------------------------------------------------------
// Modules

mod array_info;
mod collection_info;
mod enum_info;
mod interface_info;
mod list_info;
mod map_info;
mod nullable_info;
mod primitive_info;
mod set_info;
mod struct_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use array_info::ArrayInfo;
pub use collection_info::{CollectionInfo, EnumerableInfo};
pub use enum_info::{EnumInfo, VariantInfo};
pub use interface_info::{ImplementedBy, InterfaceInfo};
pub use list_info::ListInfo;
pub use map_info::MapInfo;
pub use nullable_info::NullableInfo;
pub use primitive_info::{Primitive, PrimitiveInfo, PrimitiveKind};
pub use set_info::SetInfo;
pub use struct_info::{MemberInfo, StructInfo};
pub use type_info::{ReflectKind, TypeInfo};
pub use type_path::{Type, TypePath};
pub use typed::Typed;

use crate::Reflect;
use alloc::boxed::Box;

/// A type-erased iterator over borrowed items.
pub type ReflectIter<'a> = Box<dyn Iterator<Item = &'a dyn Reflect> + 'a>;

/// A type-erased iterator over borrowed map entries.
pub type EntryIter<'a> = Box<dyn Iterator<Item = (&'a dyn Reflect, &'a dyn Reflect)> + 'a>;
