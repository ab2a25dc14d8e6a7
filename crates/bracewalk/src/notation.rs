use crate::{
    class::CharTable,
    error::{ConfigError, ParseError},
    handler::Handler,
    options::NotationOptions,
    parser::Parser,
    source::SliceSource,
};

/// A validated, immutable notation: punctuation, capacities and the
/// character table built from them.
///
/// A `Notation` holds no per-run state. It can drive any number of parse
/// runs, sequentially through one [`Parser`] or concurrently from several
/// threads, each with its own `Parser`.
///
/// # Examples
///
/// ```rust
/// use bracewalk::{EventRecorder, Notation};
///
/// let notation = Notation::default();
/// for input in [&b"a=1"[..], b"b={c=2}"] {
///     let mut recorder = EventRecorder::new();
///     notation.parse(input, &mut recorder).unwrap();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notation {
    options: NotationOptions,
    table: CharTable,
}

impl Default for Notation {
    fn default() -> Self {
        let options = NotationOptions::default();
        Self {
            table: CharTable::new(&options).unwrap_or_else(|err| {
                unreachable!("default notation options are valid: {err}")
            }),
            options,
        }
    }
}

impl Notation {
    /// Validates `options` and builds the character table.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a capacity is zero or the punctuation is
    /// unusable.
    pub fn new(options: NotationOptions) -> Result<Self, ConfigError> {
        if options.max_string_len == 0 {
            return Err(ConfigError::ZeroStringCapacity);
        }
        if options.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        let table = CharTable::new(&options)?;
        Ok(Self { options, table })
    }

    /// The options this notation was built from.
    #[must_use]
    pub fn options(&self) -> &NotationOptions {
        &self.options
    }

    /// The character table.
    #[must_use]
    pub fn table(&self) -> &CharTable {
        &self.table
    }

    /// Creates a parser for this notation. Reuse it across runs to keep its
    /// buffers.
    #[must_use]
    pub fn parser(&self) -> Parser<'_> {
        Parser::new(self)
    }

    /// Parses `input` in one run, dispatching to `handler`.
    ///
    /// # Errors
    ///
    /// Returns the first error of the run; see [`Parser::parse`].
    pub fn parse<H: Handler>(
        &self,
        input: &[u8],
        handler: &mut H,
    ) -> Result<(), ParseError<H::Error>> {
        self.parser().parse(&mut SliceSource::new(input), handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_capacities() {
        let err = Notation::new(NotationOptions {
            max_string_len: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroStringCapacity);

        let err = Notation::new(NotationOptions {
            max_depth: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroDepth);
    }

    #[test]
    fn notation_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Notation>();
    }
}
