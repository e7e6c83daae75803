use alloc::sync::Arc;
use std::sync::{OnceLock, PoisonError, RwLock};

use vc_reflect::info::{TypeInfo, Typed};
use vc_utils::hash::hashbrown::hash_map::Entry;
use vc_utils::hash::{FixedHashState, HashMap};

use super::object::ObjectConverter;
use super::{Binding, Converter, ConverterKey, ConverterKind, ElementSlot, SequenceAccess};
use crate::error::CodecError;
use crate::shape::TypeShape;

// -----------------------------------------------------------------------------
// Build

impl Converter {
    /// Builds the converter of a binding.
    ///
    /// Nested converters are not built here, they are resolved through the
    /// cache on first use.
    pub(crate) fn build(binding: Binding) -> Result<Self, CodecError> {
        let value = binding.value();
        let shape = TypeShape::of(value);
        let kind = match (shape, value) {
            (TypeShape::CorePrimitive(kind), _) => ConverterKind::Primitive(kind),
            (TypeShape::CorePrimitiveNullable(kind), TypeInfo::Nullable(info)) => {
                ConverterKind::NullablePrimitive { kind, info }
            }
            (TypeShape::Enum(_), TypeInfo::Enum(info)) => ConverterKind::Enum(info),
            (TypeShape::Nullable { inner }, TypeInfo::Nullable(info)) => ConverterKind::Nullable {
                info,
                inner: LazyConverter::new(binding.with_value(inner)),
            },
            (TypeShape::Array { item, .. }, TypeInfo::Array(info)) => ConverterKind::Sequence {
                access: SequenceAccess::Array(info),
                element: ElementSlot::new(value, item),
            },
            (TypeShape::ListLike { item }, TypeInfo::List(info)) => ConverterKind::Sequence {
                access: SequenceAccess::List(info),
                element: ElementSlot::new(value, item),
            },
            (TypeShape::SetLike { item }, TypeInfo::Set(info)) => ConverterKind::Sequence {
                access: SequenceAccess::Set(info),
                element: ElementSlot::new(value, item),
            },
            (TypeShape::CollectionLike { item }, TypeInfo::Collection(info)) => {
                ConverterKind::Sequence {
                    access: SequenceAccess::Collection(info),
                    element: ElementSlot::new(value, item),
                }
            }
            (TypeShape::EnumerableOnly { item }, TypeInfo::Enumerable(info)) => {
                ConverterKind::Sequence {
                    access: SequenceAccess::Enumerable(info),
                    element: ElementSlot::new(value, item),
                }
            }
            (TypeShape::DictionaryLike { key, value: item }, TypeInfo::Map(info)) => {
                ConverterKind::Map {
                    info,
                    key: ElementSlot::new(value, key),
                    value: ElementSlot::new(value, item),
                }
            }
            (TypeShape::Interface, TypeInfo::Interface(info)) => ConverterKind::Polymorphic(info),
            (TypeShape::Object, TypeInfo::Struct(info)) => {
                ConverterKind::Object(ObjectConverter::build(value, info)?)
            }
            // `TypeShape::of` never disagrees with the info it was computed from.
            (shape, _) => {
                return Err(CodecError::mismatch(shape.name(), value.type_path()));
            }
        };

        log::trace!("built {} converter for {:?}", shape.name(), binding);

        Ok(Self {
            binding: Some(binding),
            shape: Some(shape),
            kind,
        })
    }
}

// -----------------------------------------------------------------------------
// LazyConverter

/// A nested converter, resolved through the global cache on first use.
pub(crate) struct LazyConverter {
    binding: Binding,
    cell: OnceLock<Arc<Converter>>,
}

impl LazyConverter {
    #[inline]
    pub const fn new(binding: Binding) -> Self {
        Self {
            binding,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<Arc<Converter>, CodecError> {
        if let Some(converter) = self.cell.get() {
            return Ok(Arc::clone(converter));
        }
        let built = ConverterCache::global().get_or_build(self.binding)?;
        Ok(Arc::clone(self.cell.get_or_init(|| built)))
    }
}

// -----------------------------------------------------------------------------
// ConverterCache

/// The process-wide converter cache.
///
/// Keyed by owning type, value type and member name. Lookups take the read
/// lock. A miss takes the write lock, checks again and builds the converter
/// there, so every key is built once. Building never re-enters the cache,
/// nested converters are resolved on first use.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_codec::ConverterCache;
///
/// let cache = ConverterCache::global();
/// let a = cache.get::<Vec<u32>>().unwrap();
/// let b = cache.get::<Vec<u32>>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct ConverterCache {
    converters: RwLock<HashMap<ConverterKey, Arc<Converter>>>,
}

static GLOBAL: ConverterCache = ConverterCache::new();

impl ConverterCache {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            converters: RwLock::new(HashMap::with_hasher(FixedHashState)),
        }
    }

    /// Returns the cache shared by every codec of the process.
    #[inline]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the root converter of `T`.
    #[inline]
    pub fn get<T: Typed>(&self) -> Result<Arc<Converter>, CodecError> {
        self.get_or_build(Binding::root(T::type_info()))
    }

    /// Returns the converter of a binding, building it on a miss.
    pub fn get_or_build(&self, binding: Binding) -> Result<Arc<Converter>, CodecError> {
        let key = binding.key();
        {
            let converters = self.converters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(converter) = converters.get(&key) {
                return Ok(Arc::clone(converter));
            }
        }

        let mut converters = self.converters.write().unwrap_or_else(PoisonError::into_inner);
        match converters.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let built = Arc::new(Converter::build(binding)?);
                Ok(Arc::clone(entry.insert(built)))
            }
        }
    }

    /// Returns the number of cached converters.
    pub fn len(&self) -> usize {
        self.converters.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
