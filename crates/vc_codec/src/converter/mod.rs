//! Converters: one per bound type, shared read-only by every state.
//!
//! A converter never recurses into nested values. Its step functions look at
//! the frame on top of the stack, consume or produce as many bytes as they
//! can and then either ask the driver to push a child frame or report the
//! frame as done. Running out of bytes halts the step without side effects
//! beyond what the frame already recorded.

// -----------------------------------------------------------------------------
// Modules

mod drain;
mod factory;
mod map;
mod nullable;
mod object;
mod polymorphic;
mod primitive;
mod sequence;
mod validate;

// -----------------------------------------------------------------------------
// Exports

pub use factory::ConverterCache;

pub(crate) use factory::LazyConverter;
pub(crate) use validate::validate;

// -----------------------------------------------------------------------------
// Imports

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use vc_reflect::Reflect;
use vc_reflect::info::{
    ArrayInfo, CollectionInfo, EnumInfo, EnumerableInfo, InterfaceInfo, ListInfo, MapInfo,
    MemberInfo, NullableInfo, PrimitiveKind, SetInfo, TypeInfo,
};
use vc_reflect::registry::TypeRegistry;

use crate::error::{CodecError, ErrorContext, Progress};
use crate::options::CodecOptions;
use crate::shape::TypeShape;
use crate::state::{ReadFrame, WriteFrame};
use crate::wire::{Reader, WireKind, Writer};

use object::ObjectConverter;

// -----------------------------------------------------------------------------
// Binding

/// What a converter is bound to: the value type, and where it lives.
///
/// The same value type gets a distinct converter per owning type and member.
#[derive(Clone, Copy)]
pub struct Binding {
    parent: Option<&'static TypeInfo>,
    value: &'static TypeInfo,
    member: Option<&'static MemberInfo>,
}

impl Binding {
    /// A value that is not owned by anything, the root of a state.
    #[inline]
    pub const fn root(value: &'static TypeInfo) -> Self {
        Self {
            parent: None,
            value,
            member: None,
        }
    }

    /// A member of an object.
    #[inline]
    pub fn of_member(parent: &'static TypeInfo, member: &'static MemberInfo) -> Self {
        Self {
            parent: Some(parent),
            value: member.type_info(),
            member: Some(member),
        }
    }

    /// An element, key or value of a container.
    #[inline]
    pub const fn element(parent: &'static TypeInfo, value: &'static TypeInfo) -> Self {
        Self {
            parent: Some(parent),
            value,
            member: None,
        }
    }

    /// Keeps the owner and member, replaces the value type.
    #[inline]
    pub const fn with_value(self, value: &'static TypeInfo) -> Self {
        Self { value, ..self }
    }

    #[inline]
    pub const fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent
    }

    #[inline]
    pub const fn value(&self) -> &'static TypeInfo {
        self.value
    }

    #[inline]
    pub const fn member(&self) -> Option<&'static MemberInfo> {
        self.member
    }

    /// Returns the cache key of this binding.
    pub fn key(&self) -> ConverterKey {
        ConverterKey {
            parent: self.parent.map(TypeInfo::type_id),
            value: self.value.type_id(),
            member: self.member.map(MemberInfo::name),
        }
    }

    pub(crate) fn context(&self) -> ErrorContext {
        ErrorContext {
            type_path: Some(self.value.type_path()),
            parent: self.parent.map(TypeInfo::type_path),
            member: self.member.map(MemberInfo::name),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("parent", &self.parent.map(TypeInfo::type_path))
            .field("value", &self.value.type_path())
            .field("member", &self.member.map(MemberInfo::name))
            .finish()
    }
}

/// Identity of a cached converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConverterKey {
    pub parent: Option<TypeId>,
    pub value: TypeId,
    pub member: Option<&'static str>,
}

// -----------------------------------------------------------------------------
// Converter

/// The conversion strategy of one bound type.
///
/// Converters are built once per [`Binding`] by the [`ConverterCache`] and
/// never change afterwards. Nested converters are resolved lazily, so
/// recursive types are built without recursion.
pub struct Converter {
    // Both are `None` only for drain converters.
    binding: Option<Binding>,
    shape: Option<TypeShape>,
    kind: ConverterKind,
}

pub(crate) enum ConverterKind {
    Primitive(PrimitiveKind),
    NullablePrimitive {
        kind: PrimitiveKind,
        info: &'static NullableInfo,
    },
    Enum(&'static EnumInfo),
    Nullable {
        info: &'static NullableInfo,
        inner: LazyConverter,
    },
    Sequence {
        access: SequenceAccess,
        element: ElementSlot,
    },
    Map {
        info: &'static MapInfo,
        key: ElementSlot,
        value: ElementSlot,
    },
    Object(ObjectConverter),
    Polymorphic(&'static InterfaceInfo),
    /// Consumes a value of unknown type and discards it.
    Drain(WireKind),
}

#[derive(Clone, Copy)]
pub(crate) enum SequenceAccess {
    Array(&'static ArrayInfo),
    List(&'static ListInfo),
    Set(&'static SetInfo),
    Collection(&'static CollectionInfo),
    Enumerable(&'static EnumerableInfo),
}

impl Converter {
    #[inline]
    pub(crate) const fn drain(kind: WireKind) -> Self {
        Self {
            binding: None,
            shape: None,
            kind: ConverterKind::Drain(kind),
        }
    }

    /// Returns the binding, `None` for converters that skip unknown values.
    #[inline]
    pub const fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    #[inline]
    pub const fn shape(&self) -> Option<TypeShape> {
        self.shape
    }

    #[inline]
    pub fn type_info(&self) -> Option<&'static TypeInfo> {
        self.binding.map(|binding| binding.value)
    }

    /// Returns the path of the bound value type.
    pub fn type_path(&self) -> &'static str {
        match self.binding {
            Some(binding) => binding.value.type_path(),
            None => "<unknown>",
        }
    }

    #[inline]
    pub(crate) const fn kind(&self) -> &ConverterKind {
        &self.kind
    }

    #[inline]
    pub(crate) fn context(&self) -> Option<ErrorContext> {
        self.binding.map(|binding| binding.context())
    }

    // -------------------------------------------------------------------------
    // Steps

    /// Advances the frame of this converter on the read side.
    pub(crate) fn read_step(
        &self,
        frame: &mut ReadFrame,
        reader: &mut Reader<'_>,
        cx: &ReadContext<'_>,
    ) -> Progress<ReadStep> {
        match &self.kind {
            ConverterKind::Primitive(kind) => primitive::read(self, *kind, frame, reader, cx),
            ConverterKind::NullablePrimitive { kind, info } => {
                primitive::read_nullable(*kind, info, frame, reader, cx)
            }
            ConverterKind::Enum(info) => primitive::read_enum(self, info, frame, reader, cx),
            ConverterKind::Nullable { info, inner } => nullable::read(info, inner, frame, reader),
            ConverterKind::Sequence { access, element } => {
                sequence::read(self, *access, element, frame, reader, cx)
            }
            ConverterKind::Map { info, key, value } => {
                map::read(self, info, key, value, frame, reader, cx)
            }
            ConverterKind::Object(object) => object.read(self, frame, reader, cx),
            ConverterKind::Polymorphic(info) => polymorphic::read(self, info, frame, reader, cx),
            ConverterKind::Drain(kind) => drain::read(kind, frame, reader, cx),
        }
    }

    /// Advances the frame of this converter on the write side.
    pub(crate) fn write_step<'v>(
        &self,
        frame: &mut WriteFrame<'v>,
        writer: &mut Writer<'_>,
        options: CodecOptions,
    ) -> Progress<WriteStep<'v>> {
        match &self.kind {
            ConverterKind::Primitive(kind) => primitive::write(self, *kind, frame, writer, options),
            ConverterKind::NullablePrimitive { kind, info } => {
                primitive::write_nullable(*kind, info, frame, writer, options)
            }
            ConverterKind::Enum(info) => primitive::write_enum(self, info, frame, writer, options),
            ConverterKind::Nullable { info, inner } => nullable::write(info, inner, frame, writer),
            ConverterKind::Sequence { access, element } => {
                sequence::write(self, *access, element, frame, writer, options)
            }
            ConverterKind::Map { info, key, value } => {
                map::write(self, info, key, value, frame, writer, options)
            }
            ConverterKind::Object(object) => object.write(self, frame, writer, options),
            ConverterKind::Polymorphic(info) => polymorphic::write(self, info, frame, writer),
            ConverterKind::Drain(_) => Err(CodecError::mismatch(
                "a typed value",
                frame.value.reflect_type_path(),
            )
            .into()),
        }
    }

    // -------------------------------------------------------------------------
    // Type path prefix

    /// Reads and verifies the type path prefix, once per frame.
    fn read_type_path(
        &self,
        frame: &mut ReadFrame,
        reader: &mut Reader<'_>,
        cx: &ReadContext<'_>,
    ) -> Progress<()> {
        read_type_path_of(self.type_path(), frame, reader, cx)
    }

    /// Writes the type path prefix, once per frame.
    fn write_type_path(
        &self,
        frame: &mut WriteFrame<'_>,
        writer: &mut Writer<'_>,
        options: CodecOptions,
    ) -> Progress<()> {
        write_type_path_of(self.type_path(), frame, writer, options)
    }
}

fn read_type_path_of(
    expected: &'static str,
    frame: &mut ReadFrame,
    reader: &mut Reader<'_>,
    cx: &ReadContext<'_>,
) -> Progress<()> {
    if frame.type_checked {
        return Ok(());
    }
    if cx.options.contains(CodecOptions::INCLUDE_PROPERTY_TYPES) {
        let found = reader.try_read_str()?;
        if found != expected {
            return Err(CodecError::mismatch(expected, found).into());
        }
    }
    frame.type_checked = true;
    Ok(())
}

fn write_type_path_of(
    path: &'static str,
    frame: &mut WriteFrame<'_>,
    writer: &mut Writer<'_>,
    options: CodecOptions,
) -> Progress<()> {
    if frame.type_written {
        return Ok(());
    }
    if options.contains(CodecOptions::INCLUDE_PROPERTY_TYPES) {
        writer.try_write_str(path)?;
    }
    frame.type_written = true;
    Ok(())
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Converter");
        match (&self.binding, &self.kind) {
            (Some(binding), _) => debug.field("binding", binding).field("shape", &self.shape),
            (None, ConverterKind::Drain(kind)) => debug.field("drain", kind),
            (None, _) => &mut debug,
        };
        debug.finish()
    }
}

// -----------------------------------------------------------------------------
// ElementSlot

/// The element, key or value type of a container.
///
/// A nullable element maps onto the element's null marker, the converter is
/// then bound to the wrapped type.
pub(crate) struct ElementSlot {
    declared: &'static TypeInfo,
    nullable: Option<&'static NullableInfo>,
    converter: LazyConverter,
}

impl ElementSlot {
    pub fn new(parent: &'static TypeInfo, declared: &'static TypeInfo) -> Self {
        let (nullable, value) = match declared {
            TypeInfo::Nullable(info) => (Some(info), info.inner_info()),
            _ => (None, declared),
        };
        Self {
            declared,
            nullable,
            converter: LazyConverter::new(Binding::element(parent, value)),
        }
    }

    #[inline]
    pub fn declared(&self) -> &'static TypeInfo {
        self.declared
    }

    #[inline]
    pub fn converter(&self) -> Result<Arc<Converter>, CodecError> {
        self.converter.get()
    }

    /// The value of a null element.
    pub fn null(&self) -> Result<Box<dyn Reflect>, CodecError> {
        match self.nullable {
            Some(info) => Ok(info.none()),
            None => Err(CodecError::UnexpectedNull {
                context: ErrorContext::default(),
            }),
        }
    }

    /// Turns a child outcome into the element value.
    pub fn value(&self, outcome: Outcome) -> Result<Box<dyn Reflect>, CodecError> {
        match (outcome, self.nullable) {
            (Outcome::Value(value), None) => Ok(value),
            (Outcome::Value(value), Some(info)) => info.some(value).map_err(|value| {
                CodecError::mismatch(self.declared.type_path(), value.reflect_type_path())
            }),
            (Outcome::Skipped | Outcome::Unresolved(_), Some(info)) => Ok(info.none()),
            (Outcome::Unresolved(path), None) => Err(CodecError::unresolved(path)),
            (Outcome::Skipped, None) => Err(CodecError::unresolved(String::from(
                self.declared.type_path(),
            ))),
        }
    }

    /// Splits an element into its null marker and the value to write.
    pub fn split<'v>(&self, item: &'v dyn Reflect) -> Result<Option<&'v dyn Reflect>, CodecError> {
        match self.nullable {
            Some(info) => info.get(item).ok_or_else(|| {
                CodecError::mismatch(self.declared.type_path(), item.reflect_type_path())
            }),
            None => Ok(Some(item)),
        }
    }
}

// -----------------------------------------------------------------------------
// Steps

/// The result of a finished frame.
pub(crate) enum Outcome {
    Value(Box<dyn Reflect>),
    /// The bytes were consumed and discarded.
    Skipped,
    /// A type path named a type the registry does not know.
    Unresolved(String),
}

pub(crate) enum ReadStep {
    Push {
        converter: Arc<Converter>,
        /// The type path prefix was already handled by the parent.
        type_checked: bool,
    },
    Done(Outcome),
}

pub(crate) enum WriteStep<'v> {
    Push {
        converter: Arc<Converter>,
        value: &'v dyn Reflect,
        /// The type path prefix was already written by the parent.
        type_written: bool,
    },
    Done,
}

pub(crate) struct ReadContext<'r> {
    pub options: CodecOptions,
    pub registry: &'r TypeRegistry,
}

#[inline]
fn push(converter: Arc<Converter>) -> ReadStep {
    ReadStep::Push {
        converter,
        type_checked: false,
    }
}

#[inline]
fn push_value<'v>(converter: Arc<Converter>, value: &'v dyn Reflect) -> WriteStep<'v> {
    WriteStep::Push {
        converter,
        value,
        type_written: false,
    }
}
