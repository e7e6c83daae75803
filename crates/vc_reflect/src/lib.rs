#![doc = include_str!("../README.md")]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Lets the declaration macros name `vc_reflect` inside this crate's own tests.
extern crate self as vc_reflect;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod macros;
mod reflection;

pub mod impls;
pub mod info;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use reflection::Reflect;

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;
    pub use alloc::vec;
}
