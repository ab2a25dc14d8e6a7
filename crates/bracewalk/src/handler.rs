//! The callback contract between the parser and its consumer.

use core::ops::ControlFlow;

use bstr::BStr;

use crate::error::ParseError;

/// What a callback tells the parser to do next.
pub type Flow = ControlFlow<Abort>;

/// Keep parsing.
pub const CONTINUE: Flow = ControlFlow::Continue(());

/// Request to abandon the rest of one or more enclosing levels.
///
/// Levels are counted the way the consumer sees them: `enter_field` opens a
/// level and `leaf_value` or `exit_struct` closes it, so inside `enter_field`
/// the innermost open level is the field just entered, and inside
/// `leaf_value`/`exit_struct` it is the structure that contains the value.
///
/// Skipped content is scanned without invoking any callback. When the
/// outermost abandoned level is a structure, exactly one `exit_struct` is
/// delivered for it once the skip completes; abandoned levels inside it close
/// silently. An abandoned leaf field gets no closing callback. Abandoning the
/// implicit root skips to the end of input and ends the run successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Abort {
    /// Abandon the innermost open level and `n` levels enclosing it.
    Frames(usize),
    /// Abandon everything up to the end of input.
    Document,
}

/// Where the parser is: readable from any callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Current input line, starting at 1.
    pub line: usize,
    /// Number of structures open around the callback. `0` is the implicit
    /// root.
    pub depth: usize,
}

/// Receives the structural callbacks of a parse run, in document order.
///
/// Anonymous list and array entries arrive as fields with an empty name.
///
/// Each callback returns a [`Flow`]; returning `Break` issues an [`Abort`].
/// A callback may also fail with `Self::Error`, which is routed through
/// [`recover`](Self::recover).
pub trait Handler {
    /// Error raised by the callbacks.
    type Error;

    /// A named field, or an anonymous entry when `name` is empty. Followed by
    /// either a [`leaf_value`](Self::leaf_value) or the field's structure
    /// contents and its [`exit_struct`](Self::exit_struct).
    ///
    /// # Errors
    ///
    /// Implementation-defined; see [`recover`](Self::recover).
    fn enter_field(&mut self, name: &BStr, position: Position) -> Result<Flow, Self::Error>;

    /// The terminal value of the field just entered.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see [`recover`](Self::recover).
    fn leaf_value(&mut self, text: &BStr, position: Position) -> Result<Flow, Self::Error>;

    /// Closes the structure, list or array of the innermost unmatched field.
    /// `position.depth` is the depth after the close.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see [`recover`](Self::recover).
    fn exit_struct(&mut self, position: Position) -> Result<Flow, Self::Error>;

    /// Called once when the parser itself fails (grammar, capacity, abort or
    /// source errors). The run ends with `error` right after this returns;
    /// there is no way to resume.
    fn on_error(&mut self, error: &ParseError<Self::Error>) {
        let _ = error;
    }

    /// Decides what happens when a callback fails. `Ok(())` carries on as if
    /// the callback had returned [`CONTINUE`]; `Err` ends the run with that
    /// error. The default ends the run.
    ///
    /// # Errors
    ///
    /// Returns the error that should end the run.
    fn recover(&mut self, error: Self::Error, position: Position) -> Result<(), Self::Error> {
        let _ = position;
        Err(error)
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    type Error = H::Error;

    fn enter_field(&mut self, name: &BStr, position: Position) -> Result<Flow, Self::Error> {
        (**self).enter_field(name, position)
    }

    fn leaf_value(&mut self, text: &BStr, position: Position) -> Result<Flow, Self::Error> {
        (**self).leaf_value(text, position)
    }

    fn exit_struct(&mut self, position: Position) -> Result<Flow, Self::Error> {
        (**self).exit_struct(position)
    }

    fn on_error(&mut self, error: &ParseError<Self::Error>) {
        (**self).on_error(error);
    }

    fn recover(&mut self, error: Self::Error, position: Position) -> Result<(), Self::Error> {
        (**self).recover(error, position)
    }
}
