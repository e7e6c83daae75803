use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Implemented by the declaration macros and by the built-in impls,
/// allowing access to type information without an instance of the type.
///
/// # Manually Impl
///
/// It is not recommended to implement manually. But we provided
/// [`NonGenericTypeInfoCell`] and [`GenericTypeInfoCell`] to simplify it,
/// if it's necessary.
///
/// ```
/// use vc_reflect::{
///     impls::NonGenericTypeInfoCell,
///     info::{StructInfo, TypeInfo, TypePath, Typed},
/// };
///
/// #[derive(Default)]
/// struct Marker;
///
/// impl TypePath for Marker {
///     fn type_path() -> &'static str { "demo::Marker" }
///     fn type_name() -> &'static str { "Marker" }
/// }
///
/// impl Typed for Marker {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(StructInfo::new::<Self>(Vec::new())))
///     }
/// }
///
/// assert_eq!(Marker::type_info().type_path(), "demo::Marker");
/// ```
///
/// The shape must describe `Self`: every accessor stored in the info
/// downcasts to `Self`, a mismatched shape makes them return `None`.
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: TypePath + Send + Sync {
    /// Returns the compile-time [info] for the underlying type.
    ///
    /// [info]: TypeInfo
    fn type_info() -> &'static TypeInfo;
}
