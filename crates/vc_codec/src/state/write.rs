use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vc_reflect::Reflect;
use vc_reflect::info::Typed;

use super::{Level, WriteFrame};
use crate::converter::{Binding, Converter, ConverterCache, WriteStep, validate};
use crate::error::{CodecError, ErrorContext, Halt};
use crate::options::CodecConfig;
use crate::wire::Writer;

// -----------------------------------------------------------------------------
// WriteOutcome

/// The result of offering one output chunk to a [`WriteState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The whole value is written, the last `written` bytes are in this chunk.
    Complete { written: usize },
    /// The chunk is full after `written` bytes.
    ///
    /// The next chunk must offer at least `needed` bytes, the size of the
    /// unit that did not fit.
    BufferFull { written: usize, needed: usize },
}

// -----------------------------------------------------------------------------
// WriteState

/// Encodes one borrowed value into chunks of any size.
///
/// # Examples
///
/// ```
/// use vc_codec::{CodecConfig, WriteOutcome, WriteState};
///
/// let value = String::from("hello");
/// let mut state = WriteState::new(&value, CodecConfig::default()).unwrap();
///
/// let mut chunk = [0_u8; 4];
/// assert_eq!(
///     state.try_write(&mut chunk).unwrap(),
///     WriteOutcome::BufferFull { written: 0, needed: 6 },
/// );
///
/// let mut chunk = [0_u8; 8];
/// assert_eq!(state.try_write(&mut chunk).unwrap(), WriteOutcome::Complete { written: 6 });
/// assert_eq!(&chunk[..6], b"\x05hello");
/// ```
pub struct WriteState<'v> {
    value: &'v dyn Reflect,
    converter: Arc<Converter>,
    config: CodecConfig,
    stack: Vec<Level<WriteFrame<'v>>>,
    finished: bool,
    poisoned: bool,
}

impl<'v> WriteState<'v> {
    /// Creates a state writing `value`.
    #[inline]
    pub fn new<T: Typed>(value: &'v T, config: CodecConfig) -> Result<Self, CodecError> {
        Self::from_reflect(value, config)
    }

    /// Creates a state writing a reflected value, as its concrete type.
    pub fn from_reflect(value: &'v dyn Reflect, config: CodecConfig) -> Result<Self, CodecError> {
        let root = value.reflect_type_info();
        validate(root, config.options, None, false)?;
        let converter = ConverterCache::global().get_or_build(Binding::root(root))?;
        Ok(Self {
            value,
            converter,
            config,
            stack: Vec::new(),
            finished: false,
            poisoned: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Returns `true` once the whole value is written.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Starts over, the next chunk receives the value from its first byte.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.finished = false;
        self.poisoned = false;
    }

    /// Writes as much of the value as fits into `buf`.
    ///
    /// A finished state writes nothing and reports completion.
    pub fn try_write(&mut self, buf: &mut [u8]) -> Result<WriteOutcome, CodecError> {
        if self.poisoned {
            return Err(CodecError::Poisoned);
        }
        if self.finished {
            return Ok(WriteOutcome::Complete { written: 0 });
        }
        self.drive(buf).map_err(|err| {
            let context = self.context();
            self.poisoned = true;
            self.stack.clear();
            err.in_context(|| context)
        })
    }

    fn drive(&mut self, buf: &mut [u8]) -> Result<WriteOutcome, CodecError> {
        let max_depth = self.config.max_depth;
        let options = self.config.options;
        let mut writer = Writer::new(buf);

        if self.stack.is_empty() {
            enter(&mut self.stack, max_depth, Arc::clone(&self.converter), self.value, false)?;
        }

        while let Some(Level { converter, frame }) = self.stack.last_mut() {
            match converter.write_step(frame, &mut writer, options) {
                Ok(WriteStep::Push {
                    converter,
                    value,
                    type_written,
                }) => enter(&mut self.stack, max_depth, converter, value, type_written)?,
                Ok(WriteStep::Done) => {
                    self.stack.pop();
                    if let Some(parent) = self.stack.last_mut() {
                        parent.frame.child_done = true;
                    }
                }
                Err(Halt::NeedMore(needed)) => {
                    return Ok(WriteOutcome::BufferFull {
                        written: writer.position(),
                        needed,
                    });
                }
                Err(Halt::Fail(err)) => return Err(err),
            }
        }

        self.finished = true;
        Ok(WriteOutcome::Complete {
            written: writer.position(),
        })
    }

    fn context(&self) -> ErrorContext {
        self.stack
            .iter()
            .rev()
            .find_map(|level| level.converter.context())
            .unwrap_or_default()
    }
}

fn enter<'v>(
    stack: &mut Vec<Level<WriteFrame<'v>>>,
    max_depth: usize,
    converter: Arc<Converter>,
    value: &'v dyn Reflect,
    type_written: bool,
) -> Result<(), CodecError> {
    if stack.len() >= max_depth {
        return Err(CodecError::DepthExceeded {
            context: converter.context().unwrap_or_default(),
            max_depth,
        });
    }
    stack.push(Level {
        converter,
        frame: WriteFrame::new(value, type_written),
    });
    Ok(())
}

impl fmt::Debug for WriteState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteState")
            .field("value", &self.value.reflect_type_path())
            .field("config", &self.config)
            .field("depth", &self.stack.len())
            .field("finished", &self.finished)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

/// Writes the next part of `state` into `buf`, see [`WriteState::try_write`].
#[inline]
pub fn try_write(buf: &mut [u8], state: &mut WriteState<'_>) -> Result<WriteOutcome, CodecError> {
    state.try_write(buf)
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{WriteOutcome, WriteState};
    use crate::error::CodecError;
    use crate::options::CodecConfig;

    #[test]
    fn full_chunks_report_the_pending_unit() {
        let value = vec![1_u32, 2];
        let mut state = WriteState::new(&value, CodecConfig::default()).unwrap();

        // length (4) + marker (1) fit, the first element does not.
        let mut chunk = [0_u8; 7];
        assert_eq!(
            state.try_write(&mut chunk).unwrap(),
            WriteOutcome::BufferFull { written: 5, needed: 4 }
        );
        assert_eq!(chunk[..5], [2, 0, 0, 0, 0]);

        let mut rest = [0_u8; 16];
        assert_eq!(
            state.try_write(&mut rest).unwrap(),
            WriteOutcome::Complete { written: 9 }
        );
        assert_eq!(rest[..9], [1, 0, 0, 0, 0, 2, 0, 0, 0]);
        assert!(state.is_finished());
        assert_eq!(
            state.try_write(&mut rest).unwrap(),
            WriteOutcome::Complete { written: 0 }
        );
    }

    #[test]
    fn reset_writes_again_from_the_start() {
        let mut value = BTreeMap::new();
        value.insert(String::from("a"), Some(3_u8));
        let mut state = WriteState::new(&value, CodecConfig::default()).unwrap();

        let mut first = [0_u8; 32];
        let WriteOutcome::Complete { written } = state.try_write(&mut first).unwrap() else {
            panic!("chunk too small");
        };
        state.reset();
        let mut second = [0_u8; 32];
        assert_eq!(
            state.try_write(&mut second).unwrap(),
            WriteOutcome::Complete { written }
        );
        assert_eq!(first[..written], second[..written]);
        // length, key marker, "a", value marker, 3
        assert_eq!(first[..written], [1, 0, 0, 0, 0, 1, b'a', 0, 3]);
    }

    #[test]
    fn depth_is_limited_on_write() {
        let value: Vec<Vec<u8>> = vec![vec![1]];
        let config = CodecConfig::default().with_max_depth(2);
        let mut state = WriteState::new(&value, config).unwrap();
        let err = state.try_write(&mut [0_u8; 32]).unwrap_err();
        assert!(matches!(err, CodecError::DepthExceeded { max_depth: 2, .. }));
        assert!(state.is_poisoned());
    }
}
