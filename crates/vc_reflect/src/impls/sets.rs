use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use core::hash::Hash;
use std::collections::HashSet;

use vc_utils::hash::{FixedHashState, HashSet as FixedHashSet};

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, impl_generic_type_path};
use crate::info::{ReflectIter, SetInfo, TypeInfo, Typed};

macro_rules! impl_reflect_set {
    ($set:ident, $path:literal, $name:literal, [$($bound:tt)*], |$capacity:ident| $new:expr) => {
        impl_generic_type_path!($set<T> where [T: Typed + $($bound)*], $path, $name, <T>);

        impl<T: Typed + $($bound)*> Typed for $set<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Set(SetInfo::new::<Self, T>(
                        |$capacity| {
                            let set: $set<T> = $new;
                            Box::new(set)
                        },
                        |set, item| {
                            let Some(set) = set.downcast_mut::<$set<T>>() else {
                                return Err(item);
                            };
                            set.insert(item.take::<T>()?);
                            Ok(())
                        },
                        |set| set.downcast_ref::<$set<T>>().map(|set| set.len()),
                        |set| {
                            set.downcast_ref::<$set<T>>()
                                .map(|set| Box::new(set.iter().map(|item| item as &dyn Reflect)) as ReflectIter<'_>)
                        },
                    ))
                })
            }
        }
    };
}

impl_reflect_set!(
    BTreeSet,
    "alloc::collections::BTreeSet",
    "BTreeSet",
    [Ord],
    |_capacity| BTreeSet::new()
);
impl_reflect_set!(
    HashSet,
    "std::collections::HashSet",
    "HashSet",
    [Eq + Hash],
    |capacity| HashSet::with_capacity(capacity)
);
impl_reflect_set!(
    FixedHashSet,
    "vc_utils::hash::HashSet",
    "HashSet",
    [Eq + Hash],
    |capacity| FixedHashSet::with_capacity_and_hasher(capacity, FixedHashState)
);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;

    use vc_utils::hash::HashSet as FixedHashSet;

    use crate::info::{TypePath, Typed};

    #[test]
    fn set_insert_collapses_duplicates() {
        let info = <BTreeSet<u8> as Typed>::type_info().as_set().unwrap();
        let mut set = info.with_capacity(3);
        for item in [3_u8, 1, 3] {
            info.insert(set.as_mut(), Box::new(item)).unwrap();
        }
        assert_eq!(info.len(set.as_ref()), Some(2));

        let first = info.iter(set.as_ref()).unwrap().next().unwrap();
        assert_eq!(first.downcast_ref::<u8>(), Some(&1));
    }

    #[test]
    fn hash_set_paths_are_distinct() {
        assert_eq!(
            <std::collections::HashSet<u8> as TypePath>::type_path(),
            "std::collections::HashSet<u8>"
        );
        assert_eq!(<FixedHashSet<u8> as TypePath>::type_path(), "vc_utils::hash::HashSet<u8>");
    }
}
