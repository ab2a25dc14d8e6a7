use alloc::string::String;

use thiserror::Error;

use crate::parser::{State, TokenKind};

/// Error returned by a parse run, with the line and nesting depth at which
/// the run stopped.
#[derive(Error, Debug, PartialEq)]
#[error("{kind} at line {line}, depth {depth}")]
pub struct ParseError<E> {
    pub(crate) kind: ErrorSource<E>,
    /// Line of the input being read when the run stopped, starting at 1.
    pub line: usize,
    /// Number of structures open when the run stopped.
    pub depth: usize,
}

impl<E> ParseError<E> {
    pub(crate) fn new(kind: ErrorSource<E>, line: usize, depth: usize) -> Self {
        Self { kind, line, depth }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ErrorSource<E> {
        &self.kind
    }

    /// Consumes the error, returning what went wrong.
    #[must_use]
    pub fn into_kind(self) -> ErrorSource<E> {
        self.kind
    }

    /// `true` if a configured capacity was exceeded.
    #[must_use]
    pub fn is_capacity(&self) -> bool {
        matches!(self.kind, ErrorSource::Capacity(_))
    }

    /// `true` if the input is malformed.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, ErrorSource::Syntax(_))
    }

    /// `true` if a handler asked to unwind more levels than were open.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self.kind, ErrorSource::Abort(_))
    }

    /// Returns the handler's own error, if that is what ended the run.
    #[must_use]
    pub fn into_handler_error(self) -> Option<E> {
        match self.kind {
            ErrorSource::Handler(err) => Some(err),
            _ => None,
        }
    }
}

/// The cause of a [`ParseError`].
#[derive(Error, Debug, PartialEq)]
pub enum ErrorSource<E> {
    /// A fixed capacity was exceeded. Fatal to the run; only a different
    /// configuration can accept the input.
    #[error("capacity exceeded: {0}")]
    Capacity(#[from] CapacityError),
    /// The input is malformed.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// A handler misused [`Abort`](crate::Abort).
    #[error("abort error: {0}")]
    Abort(#[from] AbortError),
    /// The byte source failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    /// A handler callback failed and its `recover` hook declined to continue.
    #[error("handler error: {0}")]
    Handler(E),
}

/// A configured bound was exceeded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// A string token is longer than `max_string_len`.
    #[error("string longer than {max} bytes")]
    StringTooLong {
        /// The configured maximum.
        max: usize,
    },
    /// Structures nest deeper than `max_depth`.
    #[error("nesting deeper than {max} levels")]
    DepthExceeded {
        /// The configured maximum.
        max: usize,
    },
}

/// The input does not follow the grammar.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// No transition exists for this token in this state.
    #[error("unexpected {token} while {state}")]
    IllegalTransition {
        /// Grammar state the driver was in.
        state: State,
        /// Token that arrived.
        token: TokenKind,
    },
    /// A close with no open structure.
    #[error("close without a matching open")]
    UnbalancedClose,
    /// A quoted run reached a newline or the end of input.
    #[error("unterminated quoted string")]
    UnterminatedString,
    /// End of input with structures still open.
    #[error("unclosed structure at end of input")]
    UnclosedStructure,
}

/// A handler asked for an impossible unwind.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AbortError {
    /// More enclosing levels requested than are open.
    #[error("cannot unwind {requested} enclosing levels, {open} open")]
    IllegalAbort {
        /// Enclosing levels requested, beyond the innermost one.
        requested: usize,
        /// Levels open below the root when the abort was issued.
        open: usize,
    },
}

/// A byte source failed to produce input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    /// Creates a source error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        use alloc::string::ToString;
        Self::new(err.to_string())
    }
}

/// Invalid [`NotationOptions`](crate::NotationOptions).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_string_len` is zero.
    #[error("max_string_len must be greater than zero")]
    ZeroStringCapacity,
    /// `max_depth` is zero.
    #[error("max_depth must be greater than zero")]
    ZeroDepth,
    /// Two punctuation roles share one byte.
    #[error("{first} and {second} both use {byte:?}")]
    Collision {
        /// Role declared first.
        first: &'static str,
        /// Role declared second.
        second: &'static str,
        /// The shared character.
        byte: char,
    },
    /// A punctuation role is not an ASCII byte.
    #[error("{role} uses non-ASCII byte {byte:#04x}")]
    NonAscii {
        /// The offending role.
        role: &'static str,
        /// The byte.
        byte: u8,
    },
    /// A punctuation role is assigned to newline, which counts lines.
    #[error("{role} cannot be the newline character")]
    Newline {
        /// The offending role.
        role: &'static str,
    },
}
