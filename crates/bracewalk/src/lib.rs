//! A single-pass, callback-driven parser for compact brace notation.
//!
//! The notation nests named fields inside braces, with anonymous lists and
//! arrays of sub-structures, quoted strings and line comments:
//!
//! ```text
//! a={u=2 v={x=4 z={j=0}};w=6};b="""5""";vv={2;3;4};w={{a=3}{a=4}}
//! ```
//!
//! No tree is built. Every token is classified, buffered in a fixed-capacity
//! buffer and immediately dispatched to a [`Handler`]. A handler can abandon
//! the rest of a structure by returning [`Abort`] from any callback; skipped
//! content is scanned without invoking callbacks.
//!
//! ```rust
//! use bracewalk::{Event, EventRecorder, Notation};
//!
//! let notation = Notation::default();
//! let mut recorder = EventRecorder::new();
//! notation.parse(b"vv={2;3}", &mut recorder).unwrap();
//! assert_eq!(
//!     recorder.into_events(),
//!     vec![
//!         Event::enter("vv"),
//!         Event::enter(""),
//!         Event::leaf("2"),
//!         Event::enter(""),
//!         Event::leaf("3"),
//!         Event::ExitStruct,
//!     ]
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod class;
mod error;
mod event;
mod handler;
mod notation;
mod options;
mod parser;
mod source;
#[cfg(feature = "values")]
mod value;
mod write;

#[cfg(test)]
mod tests;

pub use bstr::{BStr, BString};
pub use class::{CharClass, CharTable};
pub use error::{
    AbortError, CapacityError, ConfigError, ErrorSource, ParseError, SourceError, SyntaxError,
};
pub use event::{Event, EventRecorder, NeverAbort};
pub use handler::{Abort, CONTINUE, Flow, Handler, Position};
pub use notation::Notation;
pub use options::NotationOptions;
pub use parser::{Parser, State, TokenKind};
#[cfg(feature = "std")]
pub use source::ReaderSource;
pub use source::{ByteSource, SliceSource};
#[cfg(feature = "values")]
pub use value::{Entry, Value, ValueBuilder, parse_value};
pub use write::write_quoted;
