#![no_main]
use std::ops::ControlFlow;

use arbitrary::Arbitrary;
use bracewalk::{Abort, CONTINUE, Event, EventRecorder, Notation, NotationOptions, ReaderSource};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    max_depth: u8,
    max_string_len: u8,
    /// Abort on every `abort_every`-th event; never when zero.
    abort_every: u8,
    /// `Frames(n)` for `n < 4`, `Document` otherwise.
    abort_kind: u8,
    read_ahead: u8,
    data: Vec<u8>,
}

/// Returns the number of fields left open, failing if any callback closes
/// more than was entered.
fn open_fields(events: &[Event]) -> usize {
    let mut open = 0usize;
    for event in events {
        match event {
            Event::EnterField(_) => open += 1,
            Event::LeafValue(_) | Event::ExitStruct => {
                open = open.checked_sub(1).expect("close without a field");
            }
        }
    }
    open
}

fuzz_target!(|input: Input| {
    let notation = Notation::new(NotationOptions {
        max_depth: usize::from(input.max_depth % 16) + 1,
        max_string_len: usize::from(input.max_string_len % 64) + 1,
        ..NotationOptions::default()
    })
    .expect("valid options");

    // Plain run: any success must be a balanced traversal.
    let mut recorder = EventRecorder::new();
    let plain = notation.parse(&input.data, &mut recorder);
    if plain.is_ok() {
        assert_eq!(open_fields(recorder.events()), 0, "fields left open");
    }

    // The same run through a reader must agree exactly.
    let mut from_reader = EventRecorder::new();
    let read = notation.parser().parse(
        ReaderSource::with_capacity(usize::from(input.read_ahead), input.data.as_slice()),
        &mut from_reader,
    );
    assert_eq!(plain.is_ok(), read.is_ok());
    assert_eq!(recorder.events(), from_reader.events());

    // Aborting a well-formed run can only fail by asking for too many levels.
    // Skipped leaves and abandoned levels close silently, so fields may stay
    // open, but no callback closes one that was never entered.
    if input.abort_every > 0 {
        let mut seen = 0usize;
        let abort = match input.abort_kind {
            n @ 0..4 => Abort::Frames(usize::from(n)),
            _ => Abort::Document,
        };
        let mut aborting = EventRecorder::with_abort(|_, _| {
            seen += 1;
            if seen % usize::from(input.abort_every) == 0 {
                ControlFlow::Break(abort)
            } else {
                CONTINUE
            }
        });
        let result = notation.parse(&input.data, &mut aborting);
        if let (Ok(()), Err(err)) = (&plain, &result) {
            assert!(err.is_abort(), "{err}");
        }
        open_fields(aborting.events());
    }
});
