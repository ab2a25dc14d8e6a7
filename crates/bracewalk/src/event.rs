//! A recorded form of the callback stream.
//!
//! [`EventRecorder`] is a [`Handler`] that stores every callback as an
//! [`Event`]. It is the quickest way to look at what the parser does with an
//! input, and what the test suites snapshot.
//!
//! # Examples
//!
//! Skipping a field's structure from inside `enter_field`:
//!
//! ```
//! use bracewalk::{Abort, CONTINUE, Event, EventRecorder, Notation};
//! use core::ops::ControlFlow;
//!
//! let mut recorder = EventRecorder::with_abort(|event, _| match event {
//!     Event::EnterField(name) if name == "skip" => ControlFlow::Break(Abort::Frames(0)),
//!     _ => CONTINUE,
//! });
//! Notation::default()
//!     .parse(b"skip={a=1 b={c=2}} keep=3", &mut recorder)
//!     .unwrap();
//! assert_eq!(
//!     recorder.into_events(),
//!     vec![
//!         Event::enter("skip"),
//!         Event::ExitStruct,
//!         Event::enter("keep"),
//!         Event::leaf("3"),
//!     ]
//! );
//! ```
use alloc::vec::Vec;
use core::{convert::Infallible, fmt};

use bstr::{BStr, BString};

use crate::handler::{CONTINUE, Flow, Handler, Position};

/// One structural callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "text"))]
pub enum Event {
    /// `enter_field`; anonymous entries carry an empty name.
    EnterField(BString),
    /// `leaf_value`.
    LeafValue(BString),
    /// `exit_struct`.
    ExitStruct,
}

impl Event {
    /// An [`Event::EnterField`] for `name`.
    #[must_use]
    pub fn enter(name: impl AsRef<[u8]>) -> Self {
        Event::EnterField(BString::from(name.as_ref()))
    }

    /// An [`Event::LeafValue`] for `text`.
    #[must_use]
    pub fn leaf(text: impl AsRef<[u8]>) -> Self {
        Event::LeafValue(BString::from(text.as_ref()))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::EnterField(name) => write!(f, "enter {name:?}"),
            Event::LeafValue(text) => write!(f, "leaf {text:?}"),
            Event::ExitStruct => f.write_str("exit"),
        }
    }
}

/// Default abort hook of [`EventRecorder`]: never aborts.
pub type NeverAbort = fn(&Event, Position) -> Flow;

/// A [`Handler`] that records the callback stream.
///
/// The hook passed to [`with_abort`](EventRecorder::with_abort) sees each
/// event as it is recorded and decides the [`Flow`] returned to the
/// parser.
pub struct EventRecorder<F = NeverAbort> {
    events: Vec<Event>,
    abort: F,
}

impl EventRecorder {
    /// A recorder that never aborts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            abort: |_, _| CONTINUE,
        }
    }

    /// A recorder that asks `abort` what to do after each event.
    pub fn with_abort<F>(abort: F) -> EventRecorder<F>
    where
        F: FnMut(&Event, Position) -> Flow,
    {
        EventRecorder {
            events: Vec::new(),
            abort,
        }
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> EventRecorder<F> {
    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the recorder, returning its events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Forgets the recorded events, keeping the hook.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<F: FnMut(&Event, Position) -> Flow> EventRecorder<F> {
    fn record(&mut self, event: Event, position: Position) -> Flow {
        let flow = (self.abort)(&event, position);
        self.events.push(event);
        flow
    }
}

impl<F> fmt::Debug for EventRecorder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecorder")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut(&Event, Position) -> Flow> Handler for EventRecorder<F> {
    type Error = Infallible;

    fn enter_field(&mut self, name: &BStr, position: Position) -> Result<Flow, Infallible> {
        Ok(self.record(Event::enter(name), position))
    }

    fn leaf_value(&mut self, text: &BStr, position: Position) -> Result<Flow, Infallible> {
        Ok(self.record(Event::leaf(text), position))
    }

    fn exit_struct(&mut self, position: Position) -> Result<Flow, Infallible> {
        Ok(self.record(Event::ExitStruct, position))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn display_quotes_text() {
        assert_eq!(Event::enter("a b").to_string(), r#"enter "a b""#);
        assert_eq!(Event::leaf("").to_string(), r#"leaf """#);
        assert_eq!(Event::ExitStruct.to_string(), "exit");
    }

    #[test]
    fn hook_sees_event_and_position() {
        let mut seen = vec![];
        let mut recorder = EventRecorder::with_abort(|event: &Event, position: Position| {
            seen.push((event.clone(), position.depth));
            CONTINUE
        });
        let at = |depth| Position { line: 1, depth };
        recorder.enter_field(BStr::new("x"), at(0)).unwrap();
        recorder.exit_struct(at(0)).unwrap();
        assert_eq!(recorder.events(), [Event::enter("x"), Event::ExitStruct]);
        drop(recorder);
        assert_eq!(seen, [(Event::enter("x"), 0), (Event::ExitStruct, 0)]);
    }
}
