/// Configuration for a [`Notation`](crate::Notation).
///
/// Every punctuation role is a single ASCII byte. The two capacities bound the
/// memory a parse run may use: exceeding either one fails the run instead of
/// truncating or growing.
///
/// # Examples
///
/// ```rust
/// use bracewalk::{Notation, NotationOptions};
///
/// let notation = Notation::new(NotationOptions {
///     open: b'(',
///     close: b')',
///     separator: b',',
///     ..Default::default()
/// })
/// .unwrap();
/// ```
///
/// # Default
///
/// `{` `}` `=` `;` `"` `#`, strings up to 4096 bytes, nesting up to 128
/// levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotationOptions {
    /// Opens a structure, list or array.
    pub open: u8,

    /// Closes the innermost open structure.
    pub close: u8,

    /// Separates a field name from its value.
    pub equal: u8,

    /// Insignificant separator between entries, read like whitespace.
    pub separator: u8,

    /// Delimits quoted text. Doubling it inside quoted text yields one
    /// literal quote.
    pub quote: u8,

    /// Starts a comment that runs to the end of the line.
    pub comment: u8,

    /// Largest string token, in bytes, a run may buffer.
    ///
    /// # Default
    ///
    /// `4096`
    pub max_string_len: usize,

    /// Deepest nesting a run accepts. The implicit root is depth 0.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl Default for NotationOptions {
    fn default() -> Self {
        Self {
            open: b'{',
            close: b'}',
            equal: b'=',
            separator: b';',
            quote: b'"',
            comment: b'#',
            max_string_len: 4096,
            max_depth: 128,
        }
    }
}

impl NotationOptions {
    /// The six punctuation roles with their names, in a fixed order.
    pub(crate) fn roles(&self) -> [(&'static str, u8); 6] {
        [
            ("open", self.open),
            ("close", self.close),
            ("equal", self.equal),
            ("separator", self.separator),
            ("quote", self.quote),
            ("comment", self.comment),
        ]
    }
}
