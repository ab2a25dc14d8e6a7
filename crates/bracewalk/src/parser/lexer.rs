//! Token reader: turns bytes into string and structural tokens.

use super::{Fault, TokenKind, buffer::Sink};
use crate::{
    class::{CharClass, CharTable},
    error::SyntaxError,
    source::ByteSource,
};

pub(crate) struct Lexer<'r, S> {
    table: &'r CharTable,
    source: S,
    /// Current line, starting at 1.
    pub(crate) line: usize,
}

impl<'r, S: ByteSource> Lexer<'r, S> {
    pub(crate) fn new(table: &'r CharTable, source: S) -> Self {
        Self {
            table,
            source,
            line: 1,
        }
    }

    /// Reads the next token. String content goes to `sink`; whitespace,
    /// separators, newlines and comments are consumed and dropped.
    #[inline]
    pub(crate) fn token<K: Sink>(&mut self, sink: &mut K) -> Result<TokenKind, Fault> {
        use CharClass::*;
        loop {
            let Some(byte) = self.source.next_byte()? else {
                return Ok(TokenKind::End);
            };
            match self.table.class(byte) {
                Space | Separator => {}
                Newline => self.line += 1,
                Comment => self.skip_comment()?,
                Open => return Ok(TokenKind::Open),
                Close => return Ok(TokenKind::Close),
                Equal => return Ok(TokenKind::Equal),
                Normal => {
                    sink.begin();
                    sink.push(byte)?;
                    self.unquoted(sink)?;
                    return Ok(TokenKind::String);
                }
                Quote => {
                    sink.begin();
                    self.quoted(sink)?;
                    return Ok(TokenKind::String);
                }
            }
        }
    }

    /// Runs to the end of the line. End of input ends the comment too.
    fn skip_comment(&mut self) -> Result<(), Fault> {
        while let Some(byte) = self.source.next_byte()? {
            if self.table.class(byte) == CharClass::Newline {
                self.line += 1;
                break;
            }
        }
        Ok(())
    }

    /// Continues an unquoted run until the first byte that is not `Normal`,
    /// which is pushed back.
    #[inline(always)]
    fn unquoted<K: Sink>(&mut self, sink: &mut K) -> Result<(), Fault> {
        while let Some(byte) = self.source.next_byte()? {
            if self.table.class(byte) != CharClass::Normal {
                self.source.reject();
                break;
            }
            sink.push(byte)?;
        }
        Ok(())
    }

    /// Reads quoted text after the opening quote. A doubled quote stands for
    /// one literal quote; the run must close on the line it opened.
    fn quoted<K: Sink>(&mut self, sink: &mut K) -> Result<(), Fault> {
        loop {
            let Some(byte) = self.source.next_byte()? else {
                return Err(SyntaxError::UnterminatedString.into());
            };
            match self.table.class(byte) {
                CharClass::Newline => return Err(SyntaxError::UnterminatedString.into()),
                CharClass::Quote => match self.source.next_byte()? {
                    Some(next) if self.table.class(next) == CharClass::Quote => sink.push(byte)?,
                    Some(_) => {
                        self.source.reject();
                        return Ok(());
                    }
                    None => return Ok(()),
                },
                _ => sink.push(byte)?,
            }
        }
    }
}
