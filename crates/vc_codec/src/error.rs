use alloc::string::String;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ErrorContext

/// Where in the object graph an error was raised.
///
/// Filled by the driver from the converter on top of the frame stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Path of the value type being processed.
    pub type_path: Option<&'static str>,
    /// Path of the type owning the value, if any.
    pub parent: Option<&'static str>,
    /// Member of `parent` holding the value, if any.
    pub member: Option<&'static str>,
}

impl ErrorContext {
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.type_path.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_path {
            Some(path) => write!(f, "`{path}`")?,
            None => f.write_str("unknown location")?,
        }
        match (self.parent, self.member) {
            (Some(parent), Some(member)) => write!(f, " (member `{member}` of `{parent}`)"),
            (Some(parent), None) => write!(f, " (inside `{parent}`)"),
            _ => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// CodecError

/// Fatal errors of the codec.
///
/// Running out of input or output space is not an error, drivers report it
/// as a suspension outcome. Build errors are raised before any byte moves.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CodecError {
    #[error("type mismatch at {context}: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        context: ErrorContext,
        expected: String,
        found: String,
    },

    #[error("type `{type_path}` cannot be resolved at {context}")]
    UnresolvedType {
        context: ErrorContext,
        type_path: String,
    },

    #[error("maximum depth {max_depth} exceeded at {context}")]
    DepthExceeded {
        context: ErrorContext,
        max_depth: usize,
    },

    #[error("`{type_path}` can only be written, reached through `{path}`")]
    WriteOnlyShape {
        type_path: &'static str,
        path: String,
    },

    #[error("`{type_path}` needs member tag {tag}, the configured index width allows {max}")]
    TooManyMembers {
        type_path: &'static str,
        tag: u32,
        max: u32,
    },

    #[error("duplicate index {index} on member `{member}` of `{type_path}`")]
    DuplicateIndex {
        type_path: &'static str,
        member: &'static str,
        index: u16,
    },

    #[error("unexpected null at {context}")]
    UnexpectedNull { context: ErrorContext },

    #[error("invalid marker byte {byte:#04x} at {context}")]
    InvalidMarker { context: ErrorContext, byte: u8 },

    #[error("invalid enum value {value} at {context}")]
    InvalidEnumValue { context: ErrorContext, value: i64 },

    #[error("invalid UTF-8 string at {context}")]
    InvalidUtf8 { context: ErrorContext },

    #[error("invalid char scalar {value:#x} at {context}")]
    InvalidChar { context: ErrorContext, value: u32 },

    #[error("invalid duration nanoseconds {nanos} at {context}")]
    InvalidDuration { context: ErrorContext, nanos: u32 },

    #[error("invalid length {length} at {context}")]
    InvalidLength { context: ErrorContext, length: i64 },

    #[error("invalid wire kind byte {byte:#04x} at {context}")]
    InvalidWireKind { context: ErrorContext, byte: u8 },

    #[error("wire kind descriptor nested too deep at {context}")]
    WireKindTooDeep { context: ErrorContext },

    #[error("array length mismatch at {context}: expected {expected}, found {found}")]
    ArrayLength {
        context: ErrorContext,
        expected: usize,
        found: usize,
    },

    #[error("collection length changed during write at {context}: announced {expected}, found {found}")]
    LengthChanged {
        context: ErrorContext,
        expected: usize,
        found: usize,
    },

    #[error("input ended early, {needed} more bytes needed")]
    Truncated { needed: usize },

    #[error("the state failed earlier and cannot be resumed")]
    Poisoned,
}

impl CodecError {
    #[inline]
    pub(crate) fn mismatch(expected: &str, found: &str) -> Self {
        Self::TypeMismatch {
            context: ErrorContext::default(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    #[inline]
    pub(crate) fn unresolved(type_path: String) -> Self {
        Self::UnresolvedType {
            context: ErrorContext::default(),
            type_path,
        }
    }

    /// Returns the context of the error, if the variant carries one.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::TypeMismatch { context, .. }
            | Self::UnresolvedType { context, .. }
            | Self::DepthExceeded { context, .. }
            | Self::UnexpectedNull { context }
            | Self::InvalidMarker { context, .. }
            | Self::InvalidEnumValue { context, .. }
            | Self::InvalidUtf8 { context }
            | Self::InvalidChar { context, .. }
            | Self::InvalidDuration { context, .. }
            | Self::InvalidLength { context, .. }
            | Self::InvalidWireKind { context, .. }
            | Self::WireKindTooDeep { context }
            | Self::ArrayLength { context, .. }
            | Self::LengthChanged { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Fills the context if the variant carries one and it is still empty.
    pub(crate) fn in_context(mut self, with: impl FnOnce() -> ErrorContext) -> Self {
        let slot = match &mut self {
            Self::TypeMismatch { context, .. }
            | Self::UnresolvedType { context, .. }
            | Self::DepthExceeded { context, .. }
            | Self::UnexpectedNull { context }
            | Self::InvalidMarker { context, .. }
            | Self::InvalidEnumValue { context, .. }
            | Self::InvalidUtf8 { context }
            | Self::InvalidChar { context, .. }
            | Self::InvalidDuration { context, .. }
            | Self::InvalidLength { context, .. }
            | Self::InvalidWireKind { context, .. }
            | Self::WireKindTooDeep { context }
            | Self::ArrayLength { context, .. }
            | Self::LengthChanged { context, .. } => context,
            _ => return self,
        };
        if slot.is_empty() {
            *slot = with();
        }
        self
    }
}

// -----------------------------------------------------------------------------
// Halt

/// Why a step stopped before finishing.
#[derive(Debug)]
pub(crate) enum Halt {
    /// The buffer is exhausted, `n` more bytes are required.
    ///
    /// Nothing of the pending value has been consumed or written.
    NeedMore(usize),
    /// A fatal error.
    Fail(CodecError),
}

impl From<CodecError> for Halt {
    #[inline]
    fn from(value: CodecError) -> Self {
        Self::Fail(value)
    }
}

/// The result of a resumable step.
pub(crate) type Progress<T> = Result<T, Halt>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{CodecError, ErrorContext};

    #[test]
    fn context_is_filled_once() {
        let first = ErrorContext {
            type_path: Some("u8"),
            parent: Some("demo::Point"),
            member: Some("x"),
        };
        let err = CodecError::UnexpectedNull {
            context: ErrorContext::default(),
        }
        .in_context(|| first)
        .in_context(ErrorContext::default);

        assert_eq!(err.context(), Some(&first));
        assert_eq!(
            err.to_string(),
            "unexpected null at `u8` (member `x` of `demo::Point`)"
        );
        assert!(CodecError::Poisoned.in_context(|| first).context().is_none());
    }
}
