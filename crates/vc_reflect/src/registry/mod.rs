//! The curated table of known types.
//!
//! A [`TypeRegistry`] maps [`TypeId`]s and type paths to [`TypeInfo`], and
//! records which concrete types implement each interface. There is no
//! dynamic loading: a type is known only if it was registered.
//!
//! [`TypeId`]: core::any::TypeId
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod implementation;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use implementation::{Fallback, Implementation};
pub use type_registry::TypeRegistry;
