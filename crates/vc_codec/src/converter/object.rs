use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_reflect::info::{MemberInfo, StructInfo, TypeInfo};
use vc_utils::hash::HashMap;

use super::{
    Binding, Converter, LazyConverter, Outcome, ReadContext, ReadStep, WriteStep, push, push_value,
};
use crate::error::{CodecError, ErrorContext, Progress};
use crate::options::CodecOptions;
use crate::state::{Phase, ReadFrame, WriteFrame};
use crate::wire::{Reader, Tag, WireKind, Writer};

// -----------------------------------------------------------------------------
// Tags

/// Computes the tag of every member when explicit indices are honored.
///
/// A member with `#[index = N]` gets tag `N + 1`. Members without an index
/// follow the highest explicit tag, in declaration order. Without any
/// explicit index this is the declaration order, starting at `1`.
pub(crate) fn indexed_tags(
    type_path: &'static str,
    members: &'static [MemberInfo],
) -> Result<Vec<u32>, CodecError> {
    let mut seen = HashMap::<u16, &'static str>::default();
    let mut max = 0_u32;
    for member in members {
        if let Some(index) = member.index() {
            if seen.insert(index, member.name()).is_some() {
                return Err(CodecError::DuplicateIndex {
                    type_path,
                    member: member.name(),
                    index,
                });
            }
            max = max.max(u32::from(index) + 1);
        }
    }

    let mut next = max;
    let tags = members
        .iter()
        .map(|member| match member.index() {
            Some(index) => u32::from(index) + 1,
            None => {
                next += 1;
                next
            }
        })
        .collect();
    Ok(tags)
}

/// The largest tag an object writes under the given options.
pub(crate) fn max_tag(tags: &[u32], options: CodecOptions) -> u32 {
    if options.contains(CodecOptions::IGNORE_INDEX_ATTRIBUTE) {
        tags.len() as u32
    } else {
        tags.iter().copied().max().unwrap_or(0)
    }
}

// -----------------------------------------------------------------------------
// ObjectConverter

pub(crate) struct MemberSlot {
    member: &'static MemberInfo,
    converter: LazyConverter,
    kind: WireKind,
    kind_bytes: Box<[u8]>,
    declared_tag: u32,
    indexed_tag: u32,
}

impl MemberSlot {
    #[inline]
    pub fn converter(&self) -> Result<Arc<Converter>, CodecError> {
        self.converter.get()
    }

    #[inline]
    fn tag(&self, options: CodecOptions) -> u32 {
        if options.contains(CodecOptions::IGNORE_INDEX_ATTRIBUTE) {
            self.declared_tag
        } else {
            self.indexed_tag
        }
    }
}

/// Converter of objects with named members.
///
/// Wire layout: `( tag wire-kind value )* end-sentinel`, members in
/// declaration order. Both tag layouts are kept so the same converter
/// serves every option set.
pub(crate) struct ObjectConverter {
    info: &'static StructInfo,
    type_path: &'static str,
    slots: Box<[MemberSlot]>,
    by_name: HashMap<&'static str, usize>,
    by_indexed_tag: HashMap<u32, usize>,
}

impl ObjectConverter {
    pub fn build(owner: &'static TypeInfo, info: &'static StructInfo) -> Result<Self, CodecError> {
        let type_path = owner.type_path();
        let members = info.members();
        let tags = indexed_tags(type_path, members)?;

        let mut slots = Vec::with_capacity(members.len());
        let mut by_name = HashMap::default();
        let mut by_indexed_tag = HashMap::default();
        for (position, (member, indexed_tag)) in members.iter().zip(tags).enumerate() {
            let binding = Binding::of_member(owner, member);
            let kind = WireKind::of(member.type_info());
            if kind.depth() > WireKind::MAX_NESTING {
                return Err(CodecError::WireKindTooDeep {
                    context: binding.context(),
                });
            }
            by_name.insert(member.name(), position);
            by_indexed_tag.insert(indexed_tag, position);
            slots.push(MemberSlot {
                member,
                converter: LazyConverter::new(binding),
                kind_bytes: kind.to_bytes(),
                kind,
                declared_tag: position as u32 + 1,
                indexed_tag,
            });
        }

        Ok(Self {
            info,
            type_path,
            slots: slots.into_boxed_slice(),
            by_name,
            by_indexed_tag,
        })
    }

    #[cfg(test)]
    pub fn slots(&self) -> &[MemberSlot] {
        &self.slots
    }

    fn find(&self, tag: Tag<'_>, options: CodecOptions) -> Option<usize> {
        match tag {
            Tag::End => None,
            Tag::Name(name) => self.by_name.get(name).copied(),
            Tag::Index(index) if options.contains(CodecOptions::IGNORE_INDEX_ATTRIBUTE) => {
                let position = index as usize - 1;
                (position < self.slots.len()).then_some(position)
            }
            Tag::Index(index) => self.by_indexed_tag.get(&index).copied(),
        }
    }

    pub fn read(
        &self,
        converter: &Converter,
        frame: &mut ReadFrame,
        reader: &mut Reader<'_>,
        cx: &ReadContext<'_>,
    ) -> Progress<ReadStep> {
        converter.read_type_path(frame, reader, cx)?;
        if !frame.started {
            frame.value = Some(self.info.construct());
            frame.started = true;
            frame.phase = Phase::Tag;
        }

        if let Some(outcome) = frame.child.take() {
            // Skipped and unresolved members keep their default value.
            if let (Some(position), Outcome::Value(value)) = (frame.slot.take(), outcome) {
                let member = self.slots[position].member;
                let owner = frame.value_mut(self.type_path)?;
                member.set(owner, value).map_err(|value| {
                    CodecError::mismatch(member.type_info().type_path(), value.reflect_type_path())
                })?;
            }
            frame.phase = Phase::Tag;
        }

        loop {
            match frame.phase {
                Phase::Descriptor => {
                    let kind = reader.try_read_wire_kind()?;
                    frame.phase = Phase::Member;
                    if let Some(position) = frame.slot {
                        let slot = &self.slots[position];
                        if slot.kind == kind {
                            return Ok(push(slot.converter()?));
                        }
                        log::debug!(
                            "member `{}` of `{}` arrived as {:?}, expected {:?}, keeping default",
                            slot.member.name(),
                            self.type_path,
                            kind,
                            slot.kind,
                        );
                        frame.slot = None;
                    }
                    return Ok(push(Arc::new(Converter::drain(kind))));
                }
                _ => {
                    let tag = reader.try_read_tag(cx.options)?;
                    if tag == Tag::End {
                        let value = frame.take_value(self.type_path)?;
                        return Ok(ReadStep::Done(Outcome::Value(value)));
                    }
                    frame.slot = self.find(tag, cx.options);
                    if frame.slot.is_none() {
                        log::debug!("skipping unknown member {:?} of `{}`", tag, self.type_path);
                    }
                    frame.phase = Phase::Descriptor;
                }
            }
        }
    }

    pub fn write<'v>(
        &self,
        converter: &Converter,
        frame: &mut WriteFrame<'v>,
        writer: &mut Writer<'_>,
        options: CodecOptions,
    ) -> Progress<WriteStep<'v>> {
        converter.write_type_path(frame, writer, options)?;
        if frame.child_done {
            frame.child_done = false;
            frame.position += 1;
        }

        let Some(slot) = self.slots.get(frame.position) else {
            writer.try_write_end(options)?;
            return Ok(WriteStep::Done);
        };
        let value = slot.member.get(frame.value).ok_or_else(|| CodecError::TypeMismatch {
            context: ErrorContext::default(),
            expected: self.type_path.into(),
            found: frame.value.reflect_type_path().into(),
        })?;
        let child = slot.converter()?;
        writer.try_write_member(
            options,
            self.type_path,
            slot.member.name(),
            slot.tag(options),
            &slot.kind_bytes,
        )?;
        Ok(push_value(child, value))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use vc_reflect::impl_reflect_struct;
    use vc_reflect::info::Typed;

    use super::{indexed_tags, max_tag};
    use crate::error::CodecError;
    use crate::options::CodecOptions;

    #[derive(Default)]
    struct Mixed {
        a: u8,
        b: u8,
        c: u8,
        d: u8,
    }

    impl_reflect_struct!(Mixed {
        a: u8,
        #[index = 4]
        b: u8,
        c: u8,
        #[index = 0]
        d: u8,
    });

    #[derive(Default)]
    struct Clash {
        a: u8,
        b: u8,
    }

    impl_reflect_struct!(Clash {
        #[index = 2]
        a: u8,
        #[index = 2]
        b: u8,
    });

    #[test]
    fn unindexed_members_follow_the_highest_index() {
        let members = Mixed::type_info().as_struct().unwrap().members();
        let tags = indexed_tags("Mixed", members).unwrap();
        assert_eq!(tags, vec![6, 5, 7, 1]);
        assert_eq!(max_tag(&tags, CodecOptions::empty()), 7);
        assert_eq!(max_tag(&tags, CodecOptions::IGNORE_INDEX_ATTRIBUTE), 4);
    }

    #[test]
    fn duplicate_indices_are_rejected() {
        let members = Clash::type_info().as_struct().unwrap().members();
        assert_eq!(
            indexed_tags("Clash", members),
            Err(CodecError::DuplicateIndex {
                type_path: "Clash",
                member: "b",
                index: 2,
            })
        );
    }
}
