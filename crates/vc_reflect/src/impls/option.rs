use alloc::boxed::Box;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, impl_generic_type_path};
use crate::info::{NullableInfo, TypeInfo, Typed};

impl_generic_type_path!(Option<T> where [T: Typed], "core::option::Option", "Option", <T>);

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Nullable(NullableInfo::new::<Self, T>(get::<T>, none::<T>, some::<T>))
        })
    }
}

fn get<T: Typed>(value: &dyn Reflect) -> Option<Option<&dyn Reflect>> {
    value
        .downcast_ref::<Option<T>>()
        .map(|value| value.as_ref().map(|inner| inner as &dyn Reflect))
}

fn none<T: Typed>() -> Box<dyn Reflect> {
    Box::new(None::<T>)
}

fn some<T: Typed>(inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    Ok(Box::new(Some(inner.take::<T>()?)))
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::info::{TypePath, Typed};

    #[test]
    fn option_paths_and_accessors() {
        assert_eq!(
            <Option<String> as TypePath>::type_path(),
            "core::option::Option<alloc::string::String>"
        );
        assert_eq!(<Option<u8> as TypePath>::type_name(), "Option<u8>");

        let info = <Option<u8> as Typed>::type_info().as_nullable().unwrap();
        assert!(info.some(Box::new(1_u16)).is_err());

        let value = info.some(Box::new(3_u8)).unwrap();
        assert_eq!(value.downcast_ref::<Option<u8>>(), Some(&Some(3)));
    }
}
