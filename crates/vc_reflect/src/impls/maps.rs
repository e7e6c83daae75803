use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::hash::Hash;
use std::collections::HashMap;

use vc_utils::hash::{FixedHashState, HashMap as FixedHashMap};

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, impl_generic_type_path};
use crate::info::{EntryIter, MapInfo, TypeInfo, Typed};

macro_rules! impl_reflect_map {
    ($map:ident, $path:literal, $name:literal, [$($bound:tt)*], |$capacity:ident| $new:expr) => {
        impl_generic_type_path!($map<K, V> where [K: Typed + $($bound)*, V: Typed], $path, $name, <K, V>);

        impl<K: Typed + $($bound)*, V: Typed> Typed for $map<K, V> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>(
                        |$capacity| {
                            let map: $map<K, V> = $new;
                            Box::new(map)
                        },
                        |map, key, value| {
                            let Some(map) = map.downcast_mut::<$map<K, V>>() else {
                                return Err((key, value));
                            };
                            let key = match key.take::<K>() {
                                Ok(key) => key,
                                Err(key) => return Err((key, value)),
                            };
                            let value = match value.take::<V>() {
                                Ok(value) => value,
                                Err(value) => return Err((Box::new(key) as Box<dyn Reflect>, value)),
                            };
                            map.insert(key, value);
                            Ok(())
                        },
                        |map| map.downcast_ref::<$map<K, V>>().map(|map| map.len()),
                        |map| {
                            map.downcast_ref::<$map<K, V>>().map(|map| {
                                Box::new(map.iter().map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
                                    as EntryIter<'_>
                            })
                        },
                    ))
                })
            }
        }
    };
}

impl_reflect_map!(
    BTreeMap,
    "alloc::collections::BTreeMap",
    "BTreeMap",
    [Ord],
    |_capacity| BTreeMap::new()
);
impl_reflect_map!(
    HashMap,
    "std::collections::HashMap",
    "HashMap",
    [Eq + Hash],
    |capacity| HashMap::with_capacity(capacity)
);
impl_reflect_map!(
    FixedHashMap,
    "vc_utils::hash::HashMap",
    "HashMap",
    [Eq + Hash],
    |capacity| FixedHashMap::with_capacity_and_hasher(capacity, FixedHashState)
);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use vc_utils::hash::HashMap;

    use crate::info::{TypePath, Typed};

    #[test]
    fn map_accessors() {
        assert_eq!(
            <HashMap<String, u8> as TypePath>::type_path(),
            "vc_utils::hash::HashMap<alloc::string::String, u8>"
        );

        let info = <HashMap<String, u8> as Typed>::type_info().as_map().unwrap();
        let mut map = info.with_capacity(1);
        info.insert(map.as_mut(), Box::new(String::from("k")), Box::new(1_u8))
            .unwrap();
        info.insert(map.as_mut(), Box::new(String::from("k")), Box::new(2_u8))
            .unwrap();
        assert!(
            info.insert(map.as_mut(), Box::new(1_u8), Box::new(2_u8))
                .is_err()
        );

        assert_eq!(info.len(map.as_ref()), Some(1));
        let map = map.downcast_ref::<HashMap<String, u8>>().unwrap();
        assert_eq!(map.get("k"), Some(&2));
    }
}
