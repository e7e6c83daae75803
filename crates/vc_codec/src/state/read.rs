use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vc_reflect::Reflect;
use vc_reflect::info::{TypeInfo, Typed};
use vc_reflect::registry::TypeRegistry;

use super::{Level, ReadFrame};
use crate::converter::{
    Binding, Converter, ConverterCache, Outcome, ReadContext, ReadStep, validate,
};
use crate::error::{CodecError, ErrorContext, Halt};
use crate::options::CodecConfig;
use crate::wire::Reader;

// -----------------------------------------------------------------------------
// ReadOutcome

/// The result of feeding one fragment to a [`ReadState`].
#[derive(Debug)]
pub enum ReadOutcome {
    /// The root value is complete.
    ///
    /// `consumed` counts the bytes of this fragment that belong to the
    /// value, the rest of the fragment was not looked at.
    Complete {
        value: Box<dyn Reflect>,
        consumed: usize,
    },
    /// The fragment is exhausted.
    ///
    /// All `consumed` bytes are recorded in the state. The next fragment
    /// must start with the bytes that follow them and hold at least `needed`
    /// more bytes for the state to make progress.
    NeedMoreBytes { consumed: usize, needed: usize },
}

// -----------------------------------------------------------------------------
// ReadState

/// Decodes one root value at a time from fragments of any size.
///
/// The state keeps the partially built value and its position between calls.
/// Once a value completes the state is ready for the next value of the same
/// type. A fatal error poisons the state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vc_codec::{CodecConfig, ReadOutcome, ReadState};
/// use vc_reflect::registry::TypeRegistry;
///
/// let registry = Arc::new(TypeRegistry::new());
/// let mut state = ReadState::new::<u32>(registry, CodecConfig::default()).unwrap();
///
/// let bytes = 7_u32.to_le_bytes();
/// assert!(matches!(
///     state.try_read(&bytes[..1]).unwrap(),
///     ReadOutcome::NeedMoreBytes { consumed: 0, needed: 3 },
/// ));
/// match state.try_read(&bytes).unwrap() {
///     ReadOutcome::Complete { value, consumed } => {
///         assert_eq!(consumed, 4);
///         assert_eq!(value.take::<u32>().unwrap(), 7);
///     }
///     other => panic!("{other:?}"),
/// }
/// ```
pub struct ReadState {
    root: &'static TypeInfo,
    converter: Arc<Converter>,
    config: CodecConfig,
    registry: Arc<TypeRegistry>,
    stack: Vec<Level<ReadFrame>>,
    poisoned: bool,
}

impl ReadState {
    /// Creates a state decoding values of type `T`.
    #[inline]
    pub fn new<T: Typed>(
        registry: Arc<TypeRegistry>,
        config: CodecConfig,
    ) -> Result<Self, CodecError> {
        Self::for_type(T::type_info(), registry, config)
    }

    /// Creates a state decoding values of the given type.
    ///
    /// Every type reachable from `root` is checked first, so configuration
    /// errors surface here rather than in the middle of a stream.
    pub fn for_type(
        root: &'static TypeInfo,
        registry: Arc<TypeRegistry>,
        config: CodecConfig,
    ) -> Result<Self, CodecError> {
        validate(root, config.options, Some(&*registry), true)?;
        let converter = ConverterCache::global().get_or_build(Binding::root(root))?;
        Ok(Self {
            root,
            converter,
            config,
            registry,
            stack: Vec::new(),
            poisoned: false,
        })
    }

    #[inline]
    pub fn root(&self) -> &'static TypeInfo {
        self.root
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the number of open frames, `0` between values.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Drops any partial value and clears the poisoned flag.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.poisoned = false;
    }

    /// Feeds the next fragment of the stream.
    pub fn try_read(&mut self, buf: &[u8]) -> Result<ReadOutcome, CodecError> {
        if self.poisoned {
            return Err(CodecError::Poisoned);
        }
        self.drive(buf).map_err(|err| {
            let context = self.context();
            self.poisoned = true;
            self.stack.clear();
            err.in_context(|| context)
        })
    }

    fn drive(&mut self, buf: &[u8]) -> Result<ReadOutcome, CodecError> {
        let max_depth = self.config.max_depth;
        let cx = ReadContext {
            options: self.config.options,
            registry: &self.registry,
        };
        let mut reader = Reader::new(buf);

        if self.stack.is_empty() {
            enter(&mut self.stack, max_depth, Arc::clone(&self.converter), false)?;
        }

        loop {
            let Some(Level { converter, frame }) = self.stack.last_mut() else {
                return Err(CodecError::unresolved(String::from(self.root.type_path())));
            };
            match converter.read_step(frame, &mut reader, &cx) {
                Ok(ReadStep::Push {
                    converter,
                    type_checked,
                }) => enter(&mut self.stack, max_depth, converter, type_checked)?,
                Ok(ReadStep::Done(outcome)) => {
                    self.stack.pop();
                    match self.stack.last_mut() {
                        Some(parent) => parent.frame.child = Some(outcome),
                        None => return complete(self.root, outcome, reader.position()),
                    }
                }
                Err(Halt::NeedMore(needed)) => {
                    return Ok(ReadOutcome::NeedMoreBytes {
                        consumed: reader.position(),
                        needed,
                    });
                }
                Err(Halt::Fail(err)) => return Err(err),
            }
        }
    }

    /// The context of the innermost frame bound to a known type.
    fn context(&self) -> ErrorContext {
        self.stack
            .iter()
            .rev()
            .find_map(|level| level.converter.context())
            .unwrap_or_default()
    }
}

fn enter(
    stack: &mut Vec<Level<ReadFrame>>,
    max_depth: usize,
    converter: Arc<Converter>,
    type_checked: bool,
) -> Result<(), CodecError> {
    if stack.len() >= max_depth {
        return Err(CodecError::DepthExceeded {
            context: converter.context().unwrap_or_default(),
            max_depth,
        });
    }
    stack.push(Level {
        converter,
        frame: ReadFrame::new(type_checked),
    });
    Ok(())
}

fn complete(
    root: &'static TypeInfo,
    outcome: Outcome,
    consumed: usize,
) -> Result<ReadOutcome, CodecError> {
    match outcome {
        Outcome::Value(value) => Ok(ReadOutcome::Complete { value, consumed }),
        Outcome::Unresolved(path) => Err(CodecError::unresolved(path)),
        Outcome::Skipped => Err(CodecError::unresolved(String::from(root.type_path()))),
    }
}

impl fmt::Debug for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadState")
            .field("root", &self.root.type_path())
            .field("config", &self.config)
            .field("depth", &self.stack.len())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

/// Feeds `buf` to `state`, see [`ReadState::try_read`].
#[inline]
pub fn try_read(buf: &[u8], state: &mut ReadState) -> Result<ReadOutcome, CodecError> {
    state.try_read(buf)
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use vc_reflect::registry::TypeRegistry;

    use super::{ReadOutcome, ReadState};
    use crate::error::CodecError;
    use crate::options::CodecConfig;

    fn state<T: vc_reflect::info::Typed>(config: CodecConfig) -> ReadState {
        ReadState::new::<T>(Arc::new(TypeRegistry::new()), config).unwrap()
    }

    #[test]
    fn consumed_bytes_are_never_offered_again() {
        let mut state = state::<Vec<String>>(CodecConfig::default());
        // ["hi", "yo"]
        let bytes = [2, 0, 0, 0, 0, 2, b'h', b'i', 0, 2, b'y', b'o'];

        let ReadOutcome::NeedMoreBytes { consumed, .. } = state.try_read(&bytes[..7]).unwrap()
        else {
            panic!("value completed early");
        };
        assert_eq!(consumed, 5);
        // Offering the same partial fragment again changes nothing.
        let again = state.try_read(&bytes[consumed..7]).unwrap();
        assert!(matches!(again, ReadOutcome::NeedMoreBytes { consumed: 0, needed: 1 }));

        match state.try_read(&bytes[consumed..]).unwrap() {
            ReadOutcome::Complete { value, consumed: rest } => {
                assert_eq!(consumed + rest, bytes.len());
                assert_eq!(value.take::<Vec<String>>().unwrap(), ["hi", "yo"]);
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn completed_state_reads_the_next_value() {
        let mut state = state::<u16>(CodecConfig::default());
        let bytes = [1, 0, 2, 0];
        let mut offset = 0;
        let mut values = Vec::new();
        while offset < bytes.len() {
            match state.try_read(&bytes[offset..]).unwrap() {
                ReadOutcome::Complete { value, consumed } => {
                    offset += consumed;
                    values.push(value.take::<u16>().unwrap());
                }
                other => panic!("{other:?}"),
            }
        }
        assert_eq!(values, [1, 2]);
    }

    #[test]
    fn failures_poison_until_reset() {
        let mut state = state::<Option<String>>(CodecConfig::default());
        let err = state.try_read(&[7]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidMarker { byte: 7, .. }));
        assert_eq!(err.context().and_then(|context| context.type_path), Some(
            <Option<String> as vc_reflect::info::TypePath>::type_path()
        ));
        assert!(state.is_poisoned());
        assert_eq!(state.try_read(&[1]).unwrap_err(), CodecError::Poisoned);

        state.reset();
        match state.try_read(&[1]).unwrap() {
            ReadOutcome::Complete { value, consumed: 1 } => {
                assert_eq!(value.take::<Option<String>>().unwrap(), None);
            }
            other => panic!("{other:?}"),
        }
    }
}
