use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vc_reflect::Reflect;
use vc_reflect::info::{TypeInfo, Typed};
use vc_reflect::registry::TypeRegistry;

use crate::error::CodecError;
use crate::options::CodecConfig;
use crate::state::{ReadOutcome, ReadState, WriteOutcome, WriteState};

// -----------------------------------------------------------------------------
// Codec

/// A registry and a configuration, with whole-buffer helpers.
///
/// The helpers drive a fresh state over a complete input or into a growing
/// output buffer. Streams that arrive in fragments use [`Codec::read_state`]
/// and [`Codec::write_state`] directly.
///
/// # Examples
///
/// ```
/// use vc_codec::{Codec, CodecConfig, CodecOptions};
///
/// let codec = Codec::default()
///     .with_config(CodecConfig::default().with_options(CodecOptions::INCLUDE_PROPERTY_TYPES));
///
/// let bytes = codec.encode(&vec![Some(1_u8), None]).unwrap();
/// let back: Vec<Option<u8>> = codec.decode(&bytes).unwrap();
/// assert_eq!(back, [Some(1), None]);
/// ```
#[derive(Clone)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
    config: CodecConfig,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("registered", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Codec {
    /// A codec over [`TypeRegistry::new`] with the default configuration.
    fn default() -> Self {
        Self::new(TypeRegistry::new())
    }
}

impl Codec {
    #[inline]
    pub fn new(registry: impl Into<Arc<TypeRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            config: CodecConfig::default(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Creates a state decoding values of type `T` from fragments.
    pub fn read_state<T: Typed>(&self) -> Result<ReadState, CodecError> {
        ReadState::new::<T>(Arc::clone(&self.registry), self.config)
    }

    /// Creates a state encoding `value` into chunks.
    pub fn write_state<'v, T: Typed>(&self, value: &'v T) -> Result<WriteState<'v>, CodecError> {
        WriteState::new(value, self.config)
    }

    /// Encodes `value` into a new buffer.
    #[inline]
    pub fn encode<T: Typed>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        self.encode_reflect(value)
    }

    /// Encodes a reflected value as its concrete type.
    ///
    /// The buffer grows by `chunk_size`, or by the size of a unit that does
    /// not fit a chunk.
    pub fn encode_reflect(&self, value: &dyn Reflect) -> Result<Vec<u8>, CodecError> {
        let mut state = WriteState::from_reflect(value, self.config)?;
        let mut chunk = self.config.chunk_size.max(1);
        let mut out = Vec::new();
        loop {
            let start = out.len();
            out.resize(start + chunk, 0);
            match state.try_write(&mut out[start..])? {
                WriteOutcome::Complete { written } => {
                    out.truncate(start + written);
                    log::trace!("encoded `{}` into {} bytes", value.reflect_type_path(), out.len());
                    return Ok(out);
                }
                WriteOutcome::BufferFull { written, needed } => {
                    out.truncate(start + written);
                    chunk = chunk.max(needed);
                }
            }
        }
    }

    /// Decodes a value of type `T` from the start of `bytes`.
    ///
    /// Bytes after the value are ignored.
    pub fn decode<T: Typed>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let info = T::type_info();
        self.decode_boxed(info, bytes)?
            .take::<T>()
            .map_err(|value| CodecError::mismatch(info.type_path(), value.reflect_type_path()))
    }

    /// Decodes a value of the given type from the start of `bytes`.
    ///
    /// Fails with [`CodecError::Truncated`] if `bytes` ends inside the value.
    pub fn decode_boxed(
        &self,
        root: &'static TypeInfo,
        bytes: &[u8],
    ) -> Result<Box<dyn Reflect>, CodecError> {
        let mut state = ReadState::for_type(root, Arc::clone(&self.registry), self.config)?;
        match state.try_read(bytes)? {
            ReadOutcome::Complete { value, .. } => Ok(value),
            ReadOutcome::NeedMoreBytes { needed, .. } => Err(CodecError::Truncated { needed }),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Codec;
    use crate::error::CodecError;
    use crate::options::CodecConfig;

    #[test]
    fn tiny_chunks_grow_to_fit_a_unit() {
        let codec = Codec::default().with_config(CodecConfig::default().with_chunk_size(1));
        let text = String::from("a string longer than one chunk");
        let bytes = codec.encode(&text).unwrap();
        assert_eq!(bytes.len(), text.len() + 1);
        assert_eq!(codec.decode::<String>(&bytes).unwrap(), text);
    }

    #[test]
    fn truncated_input_is_an_error() {
        let codec = Codec::default();
        let bytes = codec.encode(&(1_u64 << 40)).unwrap();
        assert_eq!(
            codec.decode::<u64>(&bytes[..5]),
            Err(CodecError::Truncated { needed: 3 })
        );
    }
}
