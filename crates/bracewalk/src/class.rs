//! Byte classification.
//!
//! Every input byte maps to exactly one [`CharClass`] through a 256-entry
//! table built once per [`Notation`](crate::Notation). The reader consults
//! the table for each byte and never matches on punctuation directly, so the
//! punctuation set is free to change between notations.

use crate::{error::ConfigError, options::NotationOptions};

/// Highest byte treated as whitespace when no role claims it.
const SPACE: u8 = b' ';

/// The class of a single input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Part of an unquoted string.
    Normal,
    /// Insignificant whitespace.
    Space,
    /// Opens a structure.
    Open,
    /// Closes a structure.
    Close,
    /// Separates a field name from its value.
    Equal,
    /// Insignificant separator between entries.
    Separator,
    /// Delimits quoted text.
    Quote,
    /// Starts a line comment.
    Comment,
    /// Ends a line.
    Newline,
}

/// Immutable byte-to-class lookup table.
#[derive(Clone, PartialEq, Eq)]
pub struct CharTable {
    classes: [CharClass; 256],
}

impl core::fmt::Debug for CharTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Only the bytes that differ from `Normal` are interesting.
        let mut map = f.debug_map();
        for (byte, class) in (0u8..=255).zip(self.classes.iter()) {
            if *class != CharClass::Normal {
                map.entry(&char::from(byte), class);
            }
        }
        map.finish()
    }
}

impl CharTable {
    /// Builds the table for `options`, rejecting colliding or unusable
    /// punctuation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if two roles share a byte, a role is not
    /// ASCII, or a role is the newline character.
    pub fn new(options: &NotationOptions) -> Result<Self, ConfigError> {
        let roles = options.roles();
        for (i, &(role, byte)) in roles.iter().enumerate() {
            if !byte.is_ascii() {
                return Err(ConfigError::NonAscii { role, byte });
            }
            if byte == b'\n' {
                return Err(ConfigError::Newline { role });
            }
            if let Some(&(first, _)) = roles[..i].iter().find(|(_, b)| *b == byte) {
                return Err(ConfigError::Collision {
                    first,
                    second: role,
                    byte: char::from(byte),
                });
            }
        }

        let mut classes = [CharClass::Normal; 256];
        for class in &mut classes[..=usize::from(SPACE)] {
            *class = CharClass::Space;
        }
        classes[usize::from(b'\n')] = CharClass::Newline;
        classes[usize::from(options.open)] = CharClass::Open;
        classes[usize::from(options.close)] = CharClass::Close;
        classes[usize::from(options.equal)] = CharClass::Equal;
        classes[usize::from(options.separator)] = CharClass::Separator;
        classes[usize::from(options.quote)] = CharClass::Quote;
        classes[usize::from(options.comment)] = CharClass::Comment;

        Ok(Self { classes })
    }

    /// The class of `byte`.
    #[inline(always)]
    #[must_use]
    pub fn class(&self, byte: u8) -> CharClass {
        self.classes[usize::from(byte)]
    }
}
