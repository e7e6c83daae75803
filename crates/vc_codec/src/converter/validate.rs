use alloc::format;
use alloc::string::String;
use alloc::vec;
use core::any::TypeId;

use vc_reflect::info::TypeInfo;
use vc_reflect::registry::TypeRegistry;
use vc_utils::hash::HashSet;

use super::object::{indexed_tags, max_tag};
use crate::error::CodecError;
use crate::options::CodecOptions;
use crate::shape::TypeShape;
use crate::wire::WireKind;

/// Checks every type reachable from `root` before a state moves any byte.
///
/// Rejects write-only shapes on the read side, duplicate member indices,
/// member tags the index width cannot express and descriptors nested too
/// deep. Interfaces are followed into the implementations `registry` knows.
pub(crate) fn validate(
    root: &'static TypeInfo,
    options: CodecOptions,
    registry: Option<&TypeRegistry>,
    reading: bool,
) -> Result<(), CodecError> {
    let mut visited: HashSet<TypeId> = HashSet::default();
    let mut stack = vec![(root, String::from(root.type_path()))];

    while let Some((info, path)) = stack.pop() {
        if !visited.insert(info.type_id()) {
            continue;
        }
        if reading && TypeShape::of(info).is_write_only() {
            return Err(CodecError::WriteOnlyShape {
                type_path: info.type_path(),
                path,
            });
        }
        match info {
            TypeInfo::Primitive(_) | TypeInfo::Enum(_) => {}
            TypeInfo::Nullable(info) => stack.push((info.inner_info(), path)),
            TypeInfo::Array(info) => stack.push((info.item_info(), format!("{path}[]"))),
            TypeInfo::List(info) => stack.push((info.item_info(), format!("{path}[]"))),
            TypeInfo::Set(info) => stack.push((info.item_info(), format!("{path}[]"))),
            TypeInfo::Collection(info) => stack.push((info.item_info(), format!("{path}[]"))),
            TypeInfo::Enumerable(info) => stack.push((info.item_info(), format!("{path}[]"))),
            TypeInfo::Map(info) => {
                stack.push((info.value_info(), format!("{path}[value]")));
                stack.push((info.key_info(), format!("{path}[key]")));
            }
            TypeInfo::Struct(object) => {
                let type_path = info.type_path();
                let members = object.members();
                let tags = indexed_tags(type_path, members)?;
                let max = options.max_tag();
                let needed = max_tag(&tags, options);
                if !options.contains(CodecOptions::USE_PROPERTY_NAMES) && needed > max {
                    return Err(CodecError::TooManyMembers {
                        type_path,
                        tag: needed,
                        max,
                    });
                }
                for member in members.iter().rev() {
                    if WireKind::of(member.type_info()).depth() > WireKind::MAX_NESTING {
                        return Err(CodecError::WireKindTooDeep {
                            context: super::Binding::of_member(info, member).context(),
                        });
                    }
                    stack.push((member.type_info(), format!("{path}.{}", member.name())));
                }
            }
            TypeInfo::Interface(interface) => {
                let Some(registry) = registry else {
                    continue;
                };
                let id = interface.ty().id();
                let fallback = registry.fallback(id).map(|fallback| fallback.concrete());
                for concrete in registry
                    .implementations_of(id)
                    .map(|implementation| implementation.concrete())
                    .chain(fallback)
                {
                    stack.push((concrete, format!("{path}<{}>", concrete.type_path())));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use vc_reflect::impl_reflect_struct;
    use vc_reflect::info::Typed;

    use super::validate;
    use crate::error::CodecError;
    use crate::options::CodecOptions;

    #[derive(Default)]
    struct Wide {
        first: u8,
        last: u8,
    }

    impl_reflect_struct!(Wide {
        first: u8,
        #[index = 300]
        last: u8,
    });

    #[derive(Default)]
    struct Holder {
        items: Vec<Option<Wide>>,
        names: BTreeMap<String, u32>,
    }

    impl_reflect_struct!(Holder {
        items: Vec<Option<Wide>>,
        names: BTreeMap<String, u32>,
    });

    #[test]
    fn explicit_index_beyond_u8_needs_wide_tags() {
        let info = Holder::type_info();
        assert_eq!(
            validate(info, CodecOptions::empty(), None, true),
            Err(CodecError::TooManyMembers {
                type_path: Wide::type_info().type_path(),
                tag: 302,
                max: 255,
            })
        );
        assert!(validate(info, CodecOptions::INDEX_SIZE_UINT16, None, true).is_ok());
        assert!(validate(info, CodecOptions::IGNORE_INDEX_ATTRIBUTE, None, true).is_ok());
        assert!(validate(info, CodecOptions::USE_PROPERTY_NAMES, None, true).is_ok());
    }
}
