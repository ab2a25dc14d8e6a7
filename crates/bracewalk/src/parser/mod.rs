//! The grammar driver.
//!
//! Overview
//! - The [`Lexer`] reads one token at a time from the byte source. String
//!   content lands in a bounded buffer; structural tokens carry no payload.
//! - The driver holds one of seven [`State`]s and dispatches on
//!   `(state, token)`, firing at most a few callbacks per token. Nothing is
//!   retained between tokens except the previous string, which the
//!   list-versus-struct decision after an open needs.
//! - Nesting is a stack of resumption markers (`Resume`), one per open
//!   structure. A close pops the marker and resumes either field parsing or
//!   array-element parsing. Lists, arrays and structures all close through
//!   the same path: list items and array elements are fields with an empty
//!   name.
//! - A callback may return [`Abort`]. The driver then leaves the grammar and
//!   scans raw tokens (see `skip.rs`), tracking only brace balance, until the
//!   requested level is closed.
//!
//! Grammar
//!
//! | state         | string               | equal         | open                     | close          | end          |
//! |---------------|----------------------|---------------|--------------------------|----------------|--------------|
//! | `ExpectField` | enter(name)          |               |                          | pop, exit      | done at root |
//! | `ExpectEqual` |                      | `ExpectValue` |                          |                |              |
//! | `ExpectValue` | leaf(value)          |               | push field, `AfterOpen`  |                |              |
//! | `AfterOpen`   | remember, `OneString`|               | as `ArrayItems`          | pop, exit      |              |
//! | `OneString`   | two entries, list    | enter(name)   |                          | one entry, exit|              |
//! | `ListItems`   | entry                |               |                          | pop, exit      |              |
//! | `ArrayItems`  |                      |               | enter(""), push array    | pop, exit      |              |

mod buffer;
mod frames;
mod lexer;
mod skip;

use core::fmt;

use bstr::BStr;
use thiserror::Error;

use self::{
    buffer::StringBuffer,
    frames::{FrameStack, Resume},
    lexer::Lexer,
};
use crate::{
    error::{AbortError, CapacityError, ErrorSource, ParseError, SourceError, SyntaxError},
    handler::{Flow, Handler, Position},
    notation::Notation,
    source::ByteSource,
};

/// Grammar state of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// A field name or the close of the current structure.
    ExpectField,
    /// The equal sign after a field name.
    ExpectEqual,
    /// A leaf value or an open.
    ExpectValue,
    /// First token after an open: decides empty, list, struct or array.
    AfterOpen,
    /// One string after an open: a field name if an equal follows, else the
    /// first list item.
    OneString,
    /// Items of an anonymous list.
    ListItems,
    /// Elements of an anonymous array of structures.
    ArrayItems,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::ExpectField => "expecting a field name or close",
            State::ExpectEqual => "expecting an equal sign",
            State::ExpectValue => "expecting a value",
            State::AfterOpen => "reading the first entry after an open",
            State::OneString => "deciding between list and structure",
            State::ListItems => "reading list items",
            State::ArrayItems => "reading array elements",
        })
    }
}

/// Kind of a token produced by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unquoted run or quoted text.
    String,
    /// Open punctuation.
    Open,
    /// Close punctuation.
    Close,
    /// Equal punctuation.
    Equal,
    /// End of input.
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::String => "string",
            TokenKind::Open => "open",
            TokenKind::Close => "close",
            TokenKind::Equal => "equal",
            TokenKind::End => "end of input",
        })
    }
}

/// An engine failure, before line and depth are attached.
#[derive(Debug, Error)]
pub(crate) enum Fault {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Abort(#[from] AbortError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl<E> From<Fault> for ErrorSource<E> {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Capacity(err) => ErrorSource::Capacity(err),
            Fault::Syntax(err) => ErrorSource::Syntax(err),
            Fault::Abort(err) => ErrorSource::Abort(err),
            Fault::Source(err) => ErrorSource::Source(err),
        }
    }
}

/// Why a run stopped early.
pub(crate) enum Stop<E> {
    Fault(Fault),
    Handler(E),
}

macro_rules! stop_from {
    ($($err:ty),*) => {$(
        impl<E> From<$err> for Stop<E> {
            fn from(err: $err) -> Self {
                Stop::Fault(err.into())
            }
        }
    )*};
}

stop_from!(Fault, CapacityError, SyntaxError, AbortError, SourceError);

/// Whether the run goes on after a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Next {
    Continue,
    Finished,
}

/// What became of a callback's [`Flow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// No abort: the transition carries on.
    Proceed,
    /// The pending leaf of an anonymous list item was dropped; the
    /// transition carries on with the next item.
    Dropped,
    /// An abort was served and the driver state moved; the transition ends.
    Diverted(Next),
}

impl Outcome {
    #[inline(always)]
    fn next(self) -> Next {
        match self {
            Outcome::Proceed | Outcome::Dropped => Next::Continue,
            Outcome::Diverted(next) => next,
        }
    }
}

/// Which buffer holds the text of a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Current,
    Previous,
}

/// Drives parse runs for one [`Notation`].
///
/// The parser owns the run state: the current and previous string buffers,
/// the frame stack and the line counter. Every call to
/// [`parse`](Self::parse) resets that state, so one parser can run over any
/// number of inputs, reusing its storage. It is not meant to be shared:
/// concurrent runs each need their own parser.
///
/// # Examples
///
/// ```rust
/// use bracewalk::{EventRecorder, Notation, SliceSource};
///
/// let notation = Notation::default();
/// let mut parser = notation.parser();
/// let mut recorder = EventRecorder::new();
/// parser
///     .parse(&mut SliceSource::new(b"t={z=9;r=7}"), &mut recorder)
///     .unwrap();
/// assert_eq!(recorder.events().len(), 6);
/// ```
#[derive(Debug)]
pub struct Parser<'n> {
    notation: &'n Notation,
    current: StringBuffer,
    previous: StringBuffer,
    frames: FrameStack,
    last: Position,
}

impl<'n> Parser<'n> {
    /// Creates a parser with buffers sized for `notation`.
    #[must_use]
    pub fn new(notation: &'n Notation) -> Self {
        let options = notation.options();
        Self {
            notation,
            current: StringBuffer::new(options.max_string_len),
            previous: StringBuffer::new(options.max_string_len),
            frames: FrameStack::new(options.max_depth),
            last: Position::default(),
        }
    }

    /// The notation this parser reads.
    #[must_use]
    pub fn notation(&self) -> &'n Notation {
        self.notation
    }

    /// Line and depth where the most recent run ended.
    #[must_use]
    pub fn position(&self) -> Position {
        self.last
    }

    /// Reads `source` to the end, dispatching callbacks to `handler` in
    /// document order.
    ///
    /// # Errors
    ///
    /// Fails on malformed input, exceeded capacities, an impossible
    /// [`Abort`](crate::Abort), a failing source, or a handler error that
    /// [`Handler::recover`] does not absorb. Engine failures are reported to
    /// [`Handler::on_error`] before they are returned.
    pub fn parse<S, H>(&mut self, source: S, handler: &mut H) -> Result<(), ParseError<H::Error>>
    where
        S: ByteSource,
        H: Handler,
    {
        self.frames.clear();
        let mut run = Run {
            lexer: Lexer::new(self.notation.table(), source),
            current: &mut self.current,
            previous: &mut self.previous,
            frames: &mut self.frames,
            handler: &mut *handler,
            state: State::ExpectField,
            closed: false,
        };
        let result = run.drive();
        let position = run.position();
        drop(run);
        self.last = position;

        result.map_err(|stop| match stop {
            Stop::Handler(err) => {
                log::debug!("handler ended the run at line {}", position.line);
                ParseError::new(ErrorSource::Handler(err), position.line, position.depth)
            }
            Stop::Fault(fault) => {
                log::debug!("run failed at line {}: {fault}", position.line);
                let err = ParseError::new(fault.into(), position.line, position.depth);
                handler.on_error(&err);
                err
            }
        })
    }
}

/// State of one in-flight run, borrowed from its [`Parser`].
pub(crate) struct Run<'r, S, H> {
    lexer: Lexer<'r, S>,
    current: &'r mut StringBuffer,
    previous: &'r mut StringBuffer,
    frames: &'r mut FrameStack,
    handler: &'r mut H,
    state: State,
    /// The close of the innermost frame was read but not yet applied.
    closed: bool,
}

impl<S: ByteSource, H: Handler> Run<'_, S, H> {
    fn position(&self) -> Position {
        Position {
            line: self.lexer.line,
            depth: self.frames.depth(),
        }
    }

    fn drive(&mut self) -> Result<(), Stop<H::Error>> {
        loop {
            let token = self.lexer.token(&mut *self.current)?;
            if self.step(token)? == Next::Finished {
                return Ok(());
            }
            #[cfg(any(test, feature = "fuzzing"))]
            self.check_invariants();
        }
    }

    #[inline(always)]
    fn step(&mut self, token: TokenKind) -> Result<Next, Stop<H::Error>> {
        use State::*;
        use TokenKind as T;

        match (self.state, token) {
            (ExpectField, T::String) => {
                self.state = ExpectEqual;
                let flow = self.call_enter(Some(Slot::Current))?;
                Ok(self.resolve(flow, Level::Field(Pending::Stream))?.next())
            }
            (ExpectField | AfterOpen | ListItems | ArrayItems, T::Close) => self.close(),
            (ExpectField, T::End) if self.frames.depth() == 0 => Ok(Next::Finished),

            (ExpectEqual, T::Equal) => {
                self.state = ExpectValue;
                Ok(Next::Continue)
            }

            (ExpectValue, T::String) => {
                self.state = ExpectField;
                let flow = self.leaf(Slot::Current)?;
                Ok(self.resolve(flow, Level::Struct)?.next())
            }
            (ExpectValue, T::Open) => {
                self.frames.push(Resume::Field)?;
                self.state = AfterOpen;
                Ok(Next::Continue)
            }

            (AfterOpen, T::String) => {
                core::mem::swap(self.current, self.previous);
                self.state = OneString;
                Ok(Next::Continue)
            }
            (AfterOpen | ArrayItems, T::Open) => self.array_element(),

            (OneString, T::String) => {
                self.state = ListItems;
                match self.list_item(Slot::Previous)? {
                    Outcome::Diverted(next) => Ok(next),
                    Outcome::Proceed | Outcome::Dropped => {
                        Ok(self.list_item(Slot::Current)?.next())
                    }
                }
            }
            (OneString, T::Equal) => {
                self.state = ExpectValue;
                let flow = self.call_enter(Some(Slot::Previous))?;
                Ok(self.resolve(flow, Level::Field(Pending::Stream))?.next())
            }
            (OneString, T::Close) => {
                // The item is reported before its list closes; a skip started
                // from it must not look for this close again.
                self.state = ListItems;
                self.closed = true;
                match self.list_item(Slot::Previous)? {
                    Outcome::Diverted(next) => Ok(next),
                    Outcome::Proceed | Outcome::Dropped => {
                        self.closed = false;
                        self.close()
                    }
                }
            }

            (ListItems, T::String) => Ok(self.list_item(Slot::Current)?.next()),

            (_, T::End) if self.frames.depth() > 0 => Err(SyntaxError::UnclosedStructure.into()),
            (state, token) => Err(SyntaxError::IllegalTransition { state, token }.into()),
        }
    }

    /// Pops the innermost frame and reports its close.
    fn close(&mut self) -> Result<Next, Stop<H::Error>> {
        let resume = self.frames.pop()?;
        self.state = resume.state();
        let flow = self.exit()?;
        Ok(self.resolve(flow, Level::Struct)?.next())
    }

    /// One anonymous list item: an unnamed field and its leaf.
    fn list_item(&mut self, slot: Slot) -> Result<Outcome, Stop<H::Error>> {
        let flow = self.call_enter(None)?;
        match self.resolve(flow, Level::Field(Pending::InHand))? {
            Outcome::Proceed => {}
            outcome => return Ok(outcome),
        }
        let flow = self.leaf(slot)?;
        self.resolve(flow, Level::Struct)
    }

    /// One element of an anonymous array; its open is already consumed.
    fn array_element(&mut self) -> Result<Next, Stop<H::Error>> {
        let flow = self.call_enter(None)?;
        match self.resolve(flow, Level::Field(Pending::Opened))? {
            Outcome::Proceed => {
                self.frames.push(Resume::Array)?;
                self.state = State::ExpectField;
                Ok(Next::Continue)
            }
            outcome => Ok(outcome.next()),
        }
    }

    /// States that only exist inside a structure must have a frame.
    #[cfg(any(test, feature = "fuzzing"))]
    fn check_invariants(&self) {
        use State::*;
        let nested = matches!(self.state, AfterOpen | OneString | ListItems | ArrayItems);
        assert!(
            !nested || self.frames.depth() > 0,
            "{} at depth 0",
            self.state
        );
        assert!(!self.closed, "close left pending after {}", self.state);
    }

    // --------------------------------------------------------------------------------------------
    // Callbacks
    // --------------------------------------------------------------------------------------------

    fn call_enter(&mut self, slot: Option<Slot>) -> Result<Flow, Stop<H::Error>> {
        let position = self.position();
        let name = match slot {
            Some(Slot::Current) => self.current.as_bstr(),
            Some(Slot::Previous) => self.previous.as_bstr(),
            None => BStr::new(b""),
        };
        let result = self.handler.enter_field(name, position);
        self.absorb(result, position)
    }

    fn leaf(&mut self, slot: Slot) -> Result<Flow, Stop<H::Error>> {
        let position = self.position();
        let text = match slot {
            Slot::Current => self.current.as_bstr(),
            Slot::Previous => self.previous.as_bstr(),
        };
        let result = self.handler.leaf_value(text, position);
        self.absorb(result, position)
    }

    fn exit(&mut self) -> Result<Flow, Stop<H::Error>> {
        let position = self.position();
        let result = self.handler.exit_struct(position);
        self.absorb(result, position)
    }

    /// Routes a callback failure through [`Handler::recover`].
    #[inline(always)]
    fn absorb(
        &mut self,
        result: Result<Flow, H::Error>,
        position: Position,
    ) -> Result<Flow, Stop<H::Error>> {
        match result {
            Ok(flow) => Ok(flow),
            Err(err) => match self.handler.recover(err, position) {
                Ok(()) => Ok(crate::handler::CONTINUE),
                Err(err) => Err(Stop::Handler(err)),
            },
        }
    }
}

/// The innermost consumer-visible level when a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    /// Inside `enter_field`: the field just entered, whose value is still
    /// pending.
    Field(Pending),
    /// Inside `leaf_value` or `exit_struct`: the structure at the current
    /// depth.
    Struct,
}

/// Where the value of a just-entered field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pending {
    /// Still in the input, after an optional equal sign.
    Stream,
    /// Already read: the item of an anonymous list.
    InHand,
    /// A structure whose open was already consumed: an array element.
    Opened,
}
