//! An owned tree built from the callback stream.
//!
//! The parser itself never builds a tree. [`ValueBuilder`] is an ordinary
//! [`Handler`] that does, for callers who want the whole document in memory.
use alloc::{borrow::ToOwned, vec::Vec};
use core::{convert::Infallible, fmt};

use bstr::{BStr, BString};

use crate::{
    error::ParseError,
    handler::{CONTINUE, Flow, Handler, Position},
    notation::Notation,
    write::write_text,
};

/// One named entry of a structure. Anonymous list items and array elements
/// have an empty name.
pub type Entry = (BString, Value);

/// A parsed value: a leaf string or a structure of entries in document order.
///
/// # Examples
///
/// ```
/// use bracewalk::{Notation, Value, parse_value};
///
/// let doc = parse_value(&Notation::default(), b"t={z=9;r=7} vv={2;3}").unwrap();
/// assert_eq!(doc.get("t").and_then(|t| t.get("r")), Some(&Value::leaf("7")));
/// assert_eq!(doc.to_string(), "t={z=9;r=7};vv={2;3}");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// Terminal text.
    Leaf(BString),
    /// A structure, list or array.
    Struct(Vec<Entry>),
}

impl Default for Value {
    fn default() -> Self {
        Self::Struct(Vec::new())
    }
}

impl Value {
    /// A [`Value::Leaf`] holding `text`.
    #[must_use]
    pub fn leaf(text: impl AsRef<[u8]>) -> Self {
        Self::Leaf(BString::from(text.as_ref()))
    }

    /// Returns `true` for [`Value::Leaf`].
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The text of a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&BStr> {
        match self {
            Self::Leaf(text) => Some(BStr::new(text)),
            Self::Struct(_) => None,
        }
    }

    /// The entries of a structure.
    #[must_use]
    pub fn entries(&self) -> Option<&[Entry]> {
        match self {
            Self::Leaf(_) => None,
            Self::Struct(entries) => Some(entries.as_slice()),
        }
    }

    /// The first entry named `name`.
    #[must_use]
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&Value> {
        let name = name.as_ref();
        self.entries()?
            .iter()
            .find(|(key, _)| key.as_slice() == name)
            .map(|(_, value)| value)
    }

    /// Writes the value as `notation` text. A structure is written as a
    /// document (its entries without enclosing braces), a leaf as a single
    /// string.
    ///
    /// Entries are separated with the notation's separator. Strings are bare
    /// where they would read back as one unquoted run and quoted otherwise.
    ///
    /// # Errors
    ///
    /// Fails only if `out` does.
    pub fn write_notation<W: fmt::Write + ?Sized>(
        &self,
        notation: &Notation,
        out: &mut W,
    ) -> fmt::Result {
        let writer = Writer { notation };
        match self {
            Self::Leaf(text) => writer.text(text, out),
            Self::Struct(entries) => writer.entries(entries, out),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_notation(&Notation::default(), f)
    }
}

struct Writer<'a> {
    notation: &'a Notation,
}

impl Writer<'_> {
    fn text<W: fmt::Write + ?Sized>(&self, text: &[u8], out: &mut W) -> fmt::Result {
        write_text(
            text,
            self.notation.table(),
            self.notation.options().quote,
            out,
        )
    }

    fn entries<W: fmt::Write + ?Sized>(&self, entries: &[Entry], out: &mut W) -> fmt::Result {
        let options = self.notation.options();
        for (i, (name, value)) in entries.iter().enumerate() {
            if i > 0 {
                out.write_char(char::from(options.separator))?;
            }
            if !name.is_empty() {
                self.text(name, out)?;
                out.write_char(char::from(options.equal))?;
            }
            match value {
                Value::Leaf(text) => self.text(text, out)?,
                Value::Struct(inner) => {
                    out.write_char(char::from(options.open))?;
                    self.entries(inner, out)?;
                    out.write_char(char::from(options.close))?;
                }
            }
        }
        Ok(())
    }
}

/// A [`Handler`] that assembles the callback stream into a [`Value`].
///
/// Fields are collected into the innermost open structure; a field whose
/// next callback is not a leaf opened a structure of its own.
#[derive(Debug, Default)]
pub struct ValueBuilder {
    /// Structures still open, with the name of the field that opened them.
    open: Vec<(BString, Vec<Entry>)>,
    root: Vec<Entry>,
    /// Field entered but not yet resolved to a leaf or a structure.
    pending: Option<BString>,
}

impl ValueBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document built so far as a [`Value::Struct`] and resets
    /// the builder. Structures left open by an aborted or failed run are
    /// closed.
    pub fn finish(&mut self) -> Value {
        if let Some(name) = self.pending.take() {
            self.push((name, Value::Struct(Vec::new())));
        }
        while let Some((name, entries)) = self.open.pop() {
            self.push((name, Value::Struct(entries)));
        }
        Value::Struct(core::mem::take(&mut self.root))
    }

    fn innermost(&mut self) -> &mut Vec<Entry> {
        match self.open.last_mut() {
            Some((_, entries)) => entries,
            None => &mut self.root,
        }
    }

    fn push(&mut self, entry: Entry) {
        self.innermost().push(entry);
    }
}

impl Handler for ValueBuilder {
    type Error = Infallible;

    fn enter_field(&mut self, name: &BStr, _: Position) -> Result<Flow, Infallible> {
        if let Some(parent) = self.pending.replace(name.to_owned()) {
            self.open.push((parent, Vec::new()));
        }
        Ok(CONTINUE)
    }

    fn leaf_value(&mut self, text: &BStr, _: Position) -> Result<Flow, Infallible> {
        let name = self.pending.take().unwrap_or_default();
        self.push((name, Value::Leaf(text.to_owned())));
        Ok(CONTINUE)
    }

    fn exit_struct(&mut self, _: Position) -> Result<Flow, Infallible> {
        let entry = match self.pending.take() {
            // The field was entered and closed with nothing inside.
            Some(name) => (name, Value::Struct(Vec::new())),
            None => match self.open.pop() {
                Some((name, entries)) => (name, Value::Struct(entries)),
                None => return Ok(CONTINUE),
            },
        };
        self.push(entry);
        Ok(CONTINUE)
    }
}

/// Parses `input` into a [`Value::Struct`] holding the top-level fields.
///
/// # Errors
///
/// Fails on the same inputs [`Notation::parse`] fails on.
pub fn parse_value(notation: &Notation, input: &[u8]) -> Result<Value, ParseError<Infallible>> {
    let mut builder = ValueBuilder::new();
    notation.parse(input, &mut builder)?;
    Ok(builder.finish())
}
