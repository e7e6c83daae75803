use alloc::boxed::Box;
use alloc::collections::LinkedList;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, impl_generic_type_path};
use crate::info::{CollectionInfo, ReflectIter, TypeInfo, Typed};

impl_generic_type_path!(LinkedList<T> where [T: Typed], "alloc::collections::LinkedList", "LinkedList", <T>);

impl<T: Typed> Typed for LinkedList<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Collection(CollectionInfo::new::<Self, T>(
                || Box::new(LinkedList::<T>::new()),
                |list, item| {
                    let Some(list) = list.downcast_mut::<LinkedList<T>>() else {
                        return Err(item);
                    };
                    list.push_back(item.take::<T>()?);
                    Ok(())
                },
                |list| list.downcast_ref::<LinkedList<T>>().map(LinkedList::len),
                |list| {
                    list.downcast_ref::<LinkedList<T>>()
                        .map(|list| Box::new(list.iter().map(|item| item as &dyn Reflect)) as ReflectIter<'_>)
                },
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::LinkedList;

    use crate::info::Typed;

    #[test]
    fn collection_add_and_count() {
        let info = <LinkedList<i8> as Typed>::type_info().as_collection().unwrap();
        let mut list = info.empty();
        info.add(list.as_mut(), Box::new(-1_i8)).unwrap();
        info.add(list.as_mut(), Box::new(2_i8)).unwrap();
        assert_eq!(info.len(list.as_ref()), Some(2));
        assert_eq!(
            list.downcast_ref::<LinkedList<i8>>().unwrap().back(),
            Some(&2)
        );
    }
}
