use core::any::TypeId;
use core::fmt;

// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// Provide a stable alternative to [`core::any::type_name`], the type path
/// is what the codec writes on the wire when a value carries its type.
///
/// - [`type_path`](TypePath::type_path): The unique identifier of the type,
///   cannot be duplicated within one registry.
/// - [`type_name`](TypePath::type_name): Type name without module path,
///   may be duplicated.
///
/// We guarantee that these names do not have the prefix `::`.
/// Users should also ensure this when manually implementing it.
///
/// # Examples
///
/// ```
/// use vc_reflect::info::TypePath;
///
/// assert_eq!(<Vec<u8> as TypePath>::type_path(), "alloc::vec::Vec<u8>");
/// assert_eq!(<Vec<u8> as TypePath>::type_name(), "Vec<u8>");
/// ```
pub trait TypePath: 'static {
    /// Returns the fully qualified path of the underlying type.
    fn type_path() -> &'static str;

    /// Returns the type name without the module path.
    fn type_name() -> &'static str;
}

// -----------------------------------------------------------------------------
// Type

/// The identity of a reflected type: its [`TypeId`] and paths.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Type {
    /// Creates a new [`Type`] from a type that implements [`TypePath`].
    ///
    /// # Example
    ///
    /// ```
    /// # use core::any::TypeId;
    /// # use vc_reflect::info::Type;
    /// let ty = Type::of::<String>();
    /// assert_eq!(ty.id(), TypeId::of::<String>());
    /// assert_eq!(ty.name(), "String");
    /// ```
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
            name: T::type_name(),
        }
    }

    /// Returns the [`TypeId`] of the type.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified path of the type.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the type name without the module path.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Check if the given type matches this one.
    ///
    /// This only compares the [`TypeId`] of the types.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
