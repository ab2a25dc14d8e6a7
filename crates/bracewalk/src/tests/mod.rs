use alloc::{string::String, vec::Vec};
use core::convert::Infallible;

use crate::{Event, EventRecorder, Notation, NotationOptions, ParseError};

mod arbitrary;

/// Records the callback stream of `input` under the default notation.
fn events(input: &str) -> Result<Vec<Event>, ParseError<Infallible>> {
    events_with(NotationOptions::default(), input)
}

fn events_with(
    options: NotationOptions,
    input: &str,
) -> Result<Vec<Event>, ParseError<Infallible>> {
    let notation = Notation::new(options).unwrap();
    let mut recorder = EventRecorder::new();
    notation.parse(input.as_bytes(), &mut recorder)?;
    Ok(recorder.into_events())
}

/// Renders events one per line, indented by the nesting they open.
fn transcript(events: &[Event]) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    let mut depth = 0_usize;
    for event in events {
        if *event == Event::ExitStruct {
            depth = depth.saturating_sub(1);
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        writeln!(out, "{event}").unwrap();
        if let Event::EnterField(_) = event {
            depth += 1;
        }
        if let Event::LeafValue(_) = event {
            depth = depth.saturating_sub(1);
        }
    }
    out
}
