use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, impl_generic_type_path};
use crate::info::{ArrayInfo, ListInfo, ReflectIter, TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// Lists

macro_rules! impl_reflect_list {
    ($list:ident, $path:literal, $push:ident) => {
        impl_generic_type_path!($list<T> where [T: Typed], $path, stringify!($list), <T>);

        impl<T: Typed> Typed for $list<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::List(ListInfo::new::<Self, T>(
                        |capacity| Box::new(<$list<T>>::with_capacity(capacity)),
                        |list, item| {
                            let Some(list) = list.downcast_mut::<$list<T>>() else {
                                return Err(item);
                            };
                            list.$push(item.take::<T>()?);
                            Ok(())
                        },
                        |list| list.downcast_ref::<$list<T>>().map($list::len),
                        |list| {
                            list.downcast_ref::<$list<T>>()
                                .map(|list| Box::new(list.iter().map(|item| item as &dyn Reflect)) as ReflectIter<'_>)
                        },
                    ))
                })
            }
        }
    };
}

impl_reflect_list!(Vec, "alloc::vec::Vec", push);
impl_reflect_list!(VecDeque, "alloc::collections::VecDeque", push_back);

// -----------------------------------------------------------------------------
// Arrays

impl<T: Typed, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            let len = N.to_string();
            crate::impls::concat(&["[", T::type_path(), "; ", &len, "]"])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            let len = N.to_string();
            crate::impls::concat(&["[", T::type_name(), "; ", &len, "]"])
        })
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(
                Some(N),
                |array| array.downcast_ref::<[T; N]>().map(|_| N),
                slice_iter::<[T; N], T>,
                |items| {
                    let array: [T; N] = collect::<T>(items)?.try_into().ok()?;
                    Some(Box::new(array) as Box<dyn Reflect>)
                },
            ))
        })
    }
}

impl<T: Typed> TypePath for Box<[T]> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            crate::impls::concat(&["alloc::boxed::Box<[", T::type_path(), "]>"])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| crate::impls::concat(&["Box<[", T::type_name(), "]>"]))
    }
}

impl<T: Typed> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(
                None,
                |array| array.downcast_ref::<Box<[T]>>().map(|array| array.len()),
                slice_iter::<Box<[T]>, T>,
                |items| Some(Box::new(collect::<T>(items)?.into_boxed_slice()) as Box<dyn Reflect>),
            ))
        })
    }
}

fn slice_iter<A: Typed + AsRef<[T]>, T: Typed>(array: &dyn Reflect) -> Option<ReflectIter<'_>> {
    let array = array.downcast_ref::<A>()?;
    Some(Box::new(array.as_ref().iter().map(|item| item as &dyn Reflect)))
}

fn collect<T: Typed>(items: Vec<Box<dyn Reflect>>) -> Option<Vec<T>> {
    items.into_iter().map(|item| item.take::<T>().ok()).collect()
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::info::{TypePath, Typed};

    #[test]
    fn list_accessors() {
        let info = <VecDeque<u32> as Typed>::type_info().as_list().unwrap();
        let mut list = info.with_capacity(4);
        info.push(list.as_mut(), Box::new(1_u32)).unwrap();
        info.push(list.as_mut(), Box::new(2_u32)).unwrap();
        assert!(info.push(list.as_mut(), Box::new(3_u64)).is_err());

        let items: Vec<u32> = info
            .iter(list.as_ref())
            .unwrap()
            .map(|item| *item.downcast_ref::<u32>().unwrap())
            .collect();
        assert_eq!(items, [1, 2]);
    }

    #[test]
    fn array_paths_and_assembly() {
        assert_eq!(<[u8; 4] as TypePath>::type_path(), "[u8; 4]");
        assert_eq!(<Box<[i16]> as TypePath>::type_name(), "Box<[i16]>");

        let info = <Box<[u8]> as Typed>::type_info().as_array().unwrap();
        assert_eq!(info.fixed_len(), None);
        let value = info.assemble(vec![Box::new(5_u8), Box::new(6_u8)]).unwrap();
        assert_eq!(info.len(value.as_ref()), Some(2));
        assert_eq!(&**value.downcast_ref::<Box<[u8]>>().unwrap(), &[5, 6]);

        let fixed = <[u8; 2] as Typed>::type_info().as_array().unwrap();
        assert!(fixed.assemble(vec![Box::new(5_u8)]).is_none());
    }
}
