#![expect(missing_docs)]

use std::io::{self, Read};

use bracewalk::{ErrorSource, Event, EventRecorder, Notation, ReaderSource, SliceSource};
use quickcheck::QuickCheck;

const DOCUMENT: &str = concat!(
    "a={u=2 v={x=4 z={j=0}};w=6};\n",
    "# a comment with { and }\n",
    "b=\"\"\"5\"\"\";t={z=9;r=7};vv={2;3;4};\n",
    "w={{a=3;b={x;y}}{a=3;b={x;y}}}\n",
);

/// Hands out its bytes in reads of the given sizes, interrupting now and then.
struct Trickle<'a> {
    bytes: &'a [u8],
    sizes: Vec<usize>,
    calls: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls % 5 == 0 {
            return Err(io::ErrorKind::Interrupted.into());
        }
        let want = self
            .sizes
            .get(self.calls % self.sizes.len().max(1))
            .copied()
            .unwrap_or(1)
            .max(1);
        let n = want.min(buf.len()).min(self.bytes.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

fn slice_events(input: &[u8]) -> Vec<Event> {
    let mut recorder = EventRecorder::new();
    Notation::default()
        .parser()
        .parse(&mut SliceSource::new(input), &mut recorder)
        .unwrap();
    recorder.into_events()
}

#[test]
fn reader_matches_slice() {
    let notation = Notation::default();
    let mut recorder = EventRecorder::new();
    notation
        .parser()
        .parse(ReaderSource::new(DOCUMENT.as_bytes()), &mut recorder)
        .unwrap();
    assert_eq!(recorder.into_events(), slice_events(DOCUMENT.as_bytes()));
}

/// Property: events do not depend on how the reader splits its input.
#[test]
fn chunking_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(capacity: u8, sizes: Vec<usize>) -> bool {
        let expected = slice_events(DOCUMENT.as_bytes());
        let trickle = Trickle {
            bytes: DOCUMENT.as_bytes(),
            sizes: sizes.into_iter().map(|s| s % 17).collect(),
            calls: 0,
        };
        let mut recorder = EventRecorder::new();
        let source = ReaderSource::with_capacity(usize::from(capacity % 32), trickle);
        Notation::default()
            .parser()
            .parse(source, &mut recorder)
            .is_ok_and(|()| recorder.events() == expected)
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 2_000 } else { 200 };
    #[cfg(miri)]
    let tests = 5;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(u8, Vec<usize>) -> bool);
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

#[test]
fn io_failures_end_the_run() {
    let mut recorder = EventRecorder::new();
    let err = Notation::default()
        .parser()
        .parse(ReaderSource::new(Broken), &mut recorder)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorSource::Source(_)));
    assert_eq!(err.to_string(), "source error: disk on fire at line 1, depth 0");
}
