use bitflags::bitflags;

// -----------------------------------------------------------------------------
// CodecOptions

bitflags! {
    /// Wire layout switches.
    ///
    /// Both ends of a stream must agree on the options, they are not
    /// written to the wire.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CodecOptions: u8 {
        /// Tag members by their name instead of a numeric index.
        const USE_PROPERTY_NAMES     = 1 << 0;
        /// Prefix every value with its type path, checked on decode.
        const INCLUDE_PROPERTY_TYPES = 1 << 1;
        /// Number members by declaration order, ignoring explicit indices.
        const IGNORE_INDEX_ATTRIBUTE = 1 << 2;
        /// Write numeric member tags as `u16` instead of `u8`.
        const INDEX_SIZE_UINT16      = 1 << 3;
    }
}

impl CodecOptions {
    /// The largest numeric member tag the options can express.
    #[inline]
    pub const fn max_tag(self) -> u32 {
        if self.contains(Self::INDEX_SIZE_UINT16) {
            u16::MAX as u32
        } else {
            u8::MAX as u32
        }
    }
}

// -----------------------------------------------------------------------------
// CodecConfig

/// Configuration of a codec or of a single read/write state.
///
/// # Examples
///
/// ```
/// use vc_codec::{CodecConfig, CodecOptions};
///
/// let config = CodecConfig::default()
///     .with_options(CodecOptions::USE_PROPERTY_NAMES)
///     .with_max_depth(16);
///
/// assert_eq!(config.max_depth, 16);
/// assert_eq!(config.chunk_size, CodecConfig::DEFAULT_CHUNK_SIZE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// Wire layout switches.
    pub options: CodecOptions,
    /// Maximum number of nested frames, the root value counts as one.
    pub max_depth: usize,
    /// Size of the chunks the whole-buffer helpers write into.
    pub chunk_size: usize,
}

impl CodecConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_CHUNK_SIZE: usize = 4096;

    #[inline]
    pub const fn new() -> Self {
        Self {
            options: CodecOptions::empty(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        }
    }

    #[inline]
    pub const fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the chunk size, clamped to at least one byte.
    #[inline]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 { 1 } else { chunk_size };
        self
    }
}

impl Default for CodecConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
