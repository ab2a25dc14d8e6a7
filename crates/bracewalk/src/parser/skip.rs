//! Abort handling: leaving the grammar and scanning raw tokens until the
//! requested level is closed.
//!
//! While skipping, only brace balance is tracked and no callback fires. Frames
//! opened before the abort are popped by their matching close; braces opened
//! during the skip are only counted.

use core::ops::ControlFlow;

use super::{
    Fault, Level, Next, Outcome, Pending, Run, State, Stop, TokenKind, buffer::Discard,
    frames::Resume,
};
use crate::{
    error::{AbortError, SyntaxError},
    handler::{Abort, Flow, Handler},
    source::ByteSource,
};

impl<S: ByteSource, H: Handler> Run<'_, S, H> {
    /// Serves the abort in `flow`, if any. An `exit_struct` delivered while
    /// serving it may abort again; that is served in turn.
    pub(crate) fn resolve(
        &mut self,
        mut flow: Flow,
        mut level: Level,
    ) -> Result<Outcome, Stop<H::Error>> {
        let mut served = false;
        loop {
            let ControlFlow::Break(abort) = flow else {
                return Ok(if served {
                    Outcome::Diverted(Next::Continue)
                } else {
                    Outcome::Proceed
                });
            };
            served = true;

            let depth = self.frames.depth();
            let open = match level {
                Level::Field(_) => depth + 1,
                Level::Struct => depth,
            };
            // Level `target` is the outermost one abandoned; level 0 is the root.
            let target = match abort {
                Abort::Document => 0,
                Abort::Frames(n) => open
                    .checked_sub(n)
                    .ok_or(AbortError::IllegalAbort { requested: n, open })?,
            };
            log::debug!("abort {abort:?} at depth {depth}, abandoning from level {target}");

            // An array element's open is already consumed; its frame must
            // exist before any scan meets the matching close.
            if level == Level::Field(Pending::Opened) {
                self.frames.push(Resume::Array)?;
            }
            if target == 0 {
                return self.skip_to_end().map(Outcome::Diverted);
            }

            flow = match level {
                Level::Field(Pending::InHand) if target == open => return Ok(Outcome::Dropped),
                Level::Field(Pending::Stream) if target == open => match self.skip_value()? {
                    Some(flow) => flow,
                    None => return Ok(Outcome::Diverted(Next::Continue)),
                },
                _ => self.close_through(target)?,
            };
            level = Level::Struct;
        }
    }

    /// Skips the value of the field just entered. A structure value is
    /// reported closed once; a leaf value gets no callback, so `None` comes
    /// back.
    fn skip_value(&mut self) -> Result<Option<Flow>, Stop<H::Error>> {
        if self.state == State::ExpectEqual {
            match self.lexer.token(&mut Discard)? {
                TokenKind::Equal => {}
                token => return Err(self.unexpected(State::ExpectEqual, token).into()),
            }
        }
        self.state = State::ExpectField;

        match self.lexer.token(&mut Discard)? {
            TokenKind::String => {
                log::trace!("skipped leaf value");
                Ok(None)
            }
            TokenKind::Open => {
                self.skip_balanced()?;
                log::trace!("skipped structure value");
                Ok(Some(self.exit()?))
            }
            token => Err(self.unexpected(State::ExpectValue, token).into()),
        }
    }

    /// Consumes tokens up to the close matching an open already read.
    fn skip_balanced(&mut self) -> Result<(), Fault> {
        let mut balance = 1_usize;
        loop {
            match self.lexer.token(&mut Discard)? {
                TokenKind::Open => balance += 1,
                TokenKind::Close => {
                    balance -= 1;
                    if balance == 0 {
                        return Ok(());
                    }
                }
                TokenKind::End => return Err(SyntaxError::UnclosedStructure.into()),
                TokenKind::String | TokenKind::Equal => {}
            }
        }
    }

    /// Pops frames until the one at level `target` closes, then reports that
    /// close.
    fn close_through(&mut self, target: usize) -> Result<Flow, Stop<H::Error>> {
        debug_assert!(target >= 1 && target <= self.frames.depth());
        let mut balance = 0_usize;
        loop {
            match self.scan_token()? {
                TokenKind::Open => balance += 1,
                TokenKind::Close if balance > 0 => balance -= 1,
                TokenKind::Close => {
                    let resume = self.frames.pop()?;
                    if self.frames.depth() < target {
                        self.state = resume.state();
                        log::trace!("skip done, resuming at depth {}", self.frames.depth());
                        return self.exit();
                    }
                }
                TokenKind::End => return Err(SyntaxError::UnclosedStructure.into()),
                TokenKind::String | TokenKind::Equal => {}
            }
        }
    }

    /// Consumes the rest of the input, still requiring it to balance.
    fn skip_to_end(&mut self) -> Result<Next, Stop<H::Error>> {
        let mut balance = 0_usize;
        loop {
            match self.scan_token()? {
                TokenKind::Open => balance += 1,
                TokenKind::Close if balance > 0 => balance -= 1,
                TokenKind::Close => {
                    self.frames.pop()?;
                }
                TokenKind::End if balance == 0 && self.frames.depth() == 0 => {
                    log::trace!("skipped to end of input");
                    return Ok(Next::Finished);
                }
                TokenKind::End => return Err(SyntaxError::UnclosedStructure.into()),
                TokenKind::String | TokenKind::Equal => {}
            }
        }
    }

    /// The next raw token, starting with a close already read by the driver.
    fn scan_token(&mut self) -> Result<TokenKind, Fault> {
        if core::mem::take(&mut self.closed) {
            return Ok(TokenKind::Close);
        }
        self.lexer.token(&mut Discard)
    }

    fn unexpected(&self, state: State, token: TokenKind) -> SyntaxError {
        if token == TokenKind::End && self.frames.depth() > 0 {
            SyntaxError::UnclosedStructure
        } else {
            SyntaxError::IllegalTransition { state, token }
        }
    }
}
