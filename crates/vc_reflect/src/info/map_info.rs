use alloc::boxed::Box;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{EntryIter, Type, TypeInfo, Typed};

type BoxedEntry = (Box<dyn Reflect>, Box<dyn Reflect>);
type InsertFn = fn(&mut dyn Reflect, Box<dyn Reflect>, Box<dyn Reflect>) -> Result<(), BoxedEntry>;

/// A container for compile-time map-like info.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use vc_reflect::info::Typed;
///
/// let info = <BTreeMap<u8, String> as Typed>::type_info().as_map().unwrap();
/// let mut map = info.with_capacity(0);
/// info.insert(map.as_mut(), Box::new(1_u8), Box::new(String::from("a"))).unwrap();
///
/// let (key, value) = info.iter(map.as_ref()).unwrap().next().unwrap();
/// assert_eq!(key.downcast_ref::<u8>(), Some(&1));
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "a");
/// ```
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    key_id: TypeId,
    key_info: fn() -> &'static TypeInfo,
    value_id: TypeId,
    value_info: fn() -> &'static TypeInfo,
    with_capacity: fn(usize) -> Box<dyn Reflect>,
    insert: InsertFn,
    len: fn(&dyn Reflect) -> Option<usize>,
    iter: fn(&dyn Reflect) -> Option<EntryIter<'_>>,
}

impl MapInfo {
    /// Creates a new [`MapInfo`].
    pub fn new<T: Typed, TKey: Typed, TValue: Typed>(
        with_capacity: fn(usize) -> Box<dyn Reflect>,
        insert: InsertFn,
        len: fn(&dyn Reflect) -> Option<usize>,
        iter: fn(&dyn Reflect) -> Option<EntryIter<'_>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            key_id: TypeId::of::<TKey>(),
            key_info: TKey::type_info,
            value_id: TypeId::of::<TValue>(),
            value_info: TValue::type_info,
            with_capacity,
            insert,
            len,
            iter,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn key_id(&self) -> TypeId {
        self.key_id
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key_info)()
    }

    #[inline(always)]
    pub const fn value_id(&self) -> TypeId {
        self.value_id
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    #[inline]
    pub fn with_capacity(&self, capacity: usize) -> Box<dyn Reflect> {
        (self.with_capacity)(capacity)
    }

    /// Inserts an entry, a later entry with an equal key replaces the earlier one.
    ///
    /// Gives both halves back on a type mismatch.
    #[inline]
    pub fn insert(
        &self,
        map: &mut dyn Reflect,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), BoxedEntry> {
        (self.insert)(map, key, value)
    }

    #[inline]
    pub fn len(&self, value: &dyn Reflect) -> Option<usize> {
        (self.len)(value)
    }

    #[inline]
    pub fn iter<'a>(&self, value: &'a dyn Reflect) -> Option<EntryIter<'a>> {
        (self.iter)(value)
    }
}
