use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::time::Duration;

use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap};

use crate::info::{ImplementedBy, TypeInfo, Typed};
use crate::registry::{Fallback, Implementation};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of [reflected] types.
///
/// This struct is the central store for type information. It is consulted
/// when a value carries its type path on the wire, a path that is not
/// registered cannot be resolved.
///
/// # Example
///
/// ```
/// use vc_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<Option<u8>>>();
///
/// // The main type and its dependencies.
/// assert!(registry.get_with_type_path("alloc::vec::Vec<core::option::Option<u8>>").is_some());
/// assert!(registry.get_with_type_path("core::option::Option<u8>").is_some());
/// assert!(registry.get_with_type_path("u8").is_some());
/// ```
///
/// [reflected]: crate
pub struct TypeRegistry {
    type_info_table: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    // interface -> concrete -> implementation
    implementations: TypeIdMap<TypeIdMap<Implementation>>,
    fallbacks: TypeIdMap<Fallback>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_info_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            implementations: TypeIdMap::new(),
            fallbacks: TypeIdMap::new(),
        }
    }

    /// Create a type registry with default registrations for primitive types.
    ///
    /// - `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String` `Duration`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Duration>();
        registry
    }

    /// Registers the type `T` and, recursively, the types it is built from.
    ///
    /// Registering a type twice does nothing.
    #[inline]
    pub fn register<T: Typed>(&mut self) {
        self.register_info(T::type_info());
    }

    /// Registers a type by its info, see [`register`](Self::register).
    ///
    /// Returns `false` if the type was already registered.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        let inserted = self.type_info_table.try_insert(info.type_id(), || info);
        if !inserted {
            return false;
        }
        // For new type, assuming that the full path cannot be duplicated.
        self.type_path_to_id.insert(info.type_path(), info.type_id());

        match info {
            TypeInfo::Primitive(_) | TypeInfo::Enum(_) | TypeInfo::Interface(_) => {}
            TypeInfo::Nullable(info) => {
                self.register_info(info.inner_info());
            }
            TypeInfo::Array(info) => {
                self.register_info(info.item_info());
            }
            TypeInfo::List(info) => {
                self.register_info(info.item_info());
            }
            TypeInfo::Set(info) => {
                self.register_info(info.item_info());
            }
            TypeInfo::Collection(info) => {
                self.register_info(info.item_info());
            }
            TypeInfo::Enumerable(info) => {
                self.register_info(info.item_info());
            }
            TypeInfo::Map(info) => {
                self.register_info(info.key_info());
                self.register_info(info.value_info());
            }
            TypeInfo::Struct(info) => {
                for member in info.members() {
                    self.register_info(member.type_info());
                }
            }
        }
        true
    }

    /// Registers `T` as an implementation of the interface `I`.
    ///
    /// Both types are registered as well.
    pub fn register_implementation<I: ImplementedBy<T>, T: Typed>(&mut self) {
        self.register::<I>();
        self.register::<T>();
        self.implementations
            .get_or_insert(TypeId::of::<I>(), TypeIdMap::new)
            .insert(TypeId::of::<T>(), Implementation::of::<I, T>());
    }

    /// Registers `T` as the fallback of the interface `I`.
    ///
    /// The default value of `T` stands in for interface values whose
    /// concrete type cannot be resolved. `T` is also registered as a regular
    /// implementation. A later call replaces the fallback.
    pub fn register_fallback<I: ImplementedBy<T>, T: Typed + Default>(&mut self) {
        self.register_implementation::<I, T>();
        self.fallbacks.insert(TypeId::of::<I>(), Fallback::of::<I, T>());
    }

    /// Returns `true` if the type is registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_info_table.contains(&type_id)
    }

    /// Returns the [`TypeInfo`] of a registered type.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.type_info_table.get(&type_id).copied()
    }

    /// Returns the [`TypeInfo`] of the registered type with the given path.
    #[inline]
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        let id = self.type_path_to_id.get(type_path)?;
        self.get(*id)
    }

    /// Returns the implementation of `interface` by `concrete`, if registered.
    pub fn implementation(&self, interface: TypeId, concrete: TypeId) -> Option<&Implementation> {
        self.implementations.get(&interface)?.get(&concrete)
    }

    /// Returns the fallback of `interface`, if registered.
    #[inline]
    pub fn fallback(&self, interface: TypeId) -> Option<&Fallback> {
        self.fallbacks.get(&interface)
    }

    /// Returns every registered implementation of `interface`, in arbitrary order.
    pub fn implementations_of(&self, interface: TypeId) -> impl Iterator<Item = &Implementation> {
        self.implementations
            .get(&interface)
            .into_iter()
            .flat_map(TypeIdMap::values)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_info_table.len()
    }

    /// Iterates over all registered types in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.type_info_table.values().copied()
    }

    /// Returns the paths of all registered types, sorted.
    pub fn type_paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.type_path_to_id.keys().copied().collect();
        paths.sort_unstable();
        paths
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::{Reflect, impl_reflect_interface, impl_reflect_struct};

    trait Event: Reflect {}

    impl_reflect_interface!(Event);

    #[derive(Default)]
    struct Click {
        x: i32,
    }

    impl_reflect_struct!(Click { x: i32 });
    impl Event for Click {}

    #[derive(Default)]
    struct Unknown;

    impl_reflect_struct!(Unknown {});
    impl Event for Unknown {}

    #[test]
    fn register_walks_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<BTreeMap<String, Option<u16>>>();

        assert!(registry.contains(TypeId::of::<String>()));
        assert!(registry.contains(TypeId::of::<Option<u16>>()));
        assert!(registry.contains(TypeId::of::<u16>()));
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.type_paths()[0],
            "alloc::collections::BTreeMap<alloc::string::String, core::option::Option<u16>>"
        );
    }

    #[test]
    fn implementations_and_fallback() {
        let mut registry = TypeRegistry::new();
        registry.register_implementation::<Box<dyn Event>, Click>();
        registry.register_fallback::<Box<dyn Event>, Unknown>();

        let iface = TypeId::of::<Box<dyn Event>>();
        assert_eq!(registry.implementations_of(iface).count(), 2);
        assert!(registry.implementation(iface, TypeId::of::<u8>()).is_none());

        let click = registry
            .implementation(iface, TypeId::of::<Click>())
            .unwrap();
        let path = click.concrete().type_path();
        assert_eq!(registry.get_with_type_path(path).unwrap().type_id(), TypeId::of::<Click>());

        let wrapped = click.wrap(Box::new(Click { x: 3 })).unwrap();
        assert!(wrapped.is::<Box<dyn Event>>());
        assert!(click.wrap(Box::new(7_u8)).is_err());

        let fallback = registry.fallback(iface).unwrap();
        assert!(fallback.concrete().ty().is::<Unknown>());
        let stand_in = fallback.instantiate();
        let stand_in: &dyn Event = &**stand_in.downcast_ref::<Box<dyn Event>>().unwrap();
        assert!(stand_in.as_reflect().is::<Unknown>());
    }
}
