#![expect(missing_docs)]

use core::{fmt::Write, ops::ControlFlow};

use bracewalk::{Abort, CONTINUE, Event, EventRecorder, Flow, Notation, NotationOptions, Position};

/// Renders the callback stream of `input`, one event per line, followed by
/// the outcome of the run.
fn render(
    notation: &Notation,
    input: &str,
    recorder: &mut EventRecorder<impl FnMut(&Event, Position) -> Flow>,
) -> String {
    let result = notation.parse(input.as_bytes(), &mut *recorder);
    let mut out = String::new();
    for event in recorder.events() {
        writeln!(out, "{event}").unwrap();
    }
    match result {
        Ok(()) => out.push_str("ok"),
        Err(err) => write!(out, "error: {err}").unwrap(),
    }
    out
}

fn render_default(input: &str) -> String {
    render(&Notation::default(), input, &mut EventRecorder::new())
}

#[test]
fn snapshot_nested_fields() {
    insta::assert_snapshot!(render_default("a={u=2 v={x=4 z={j=0}};w=6}"), @r#"
    enter "a"
    enter "u"
    leaf "2"
    enter "v"
    enter "x"
    leaf "4"
    enter "z"
    enter "j"
    leaf "0"
    exit
    exit
    enter "w"
    leaf "6"
    exit
    ok
    "#);
}

#[test]
fn snapshot_array_of_structures() {
    insta::assert_snapshot!(render_default("w={{a=3;b={x;y}}{a=3;b={x;y}}}"), @r#"
    enter "w"
    enter ""
    enter "a"
    leaf "3"
    enter "b"
    enter ""
    leaf "x"
    enter ""
    leaf "y"
    exit
    exit
    enter ""
    enter "a"
    leaf "3"
    enter "b"
    enter ""
    leaf "x"
    enter ""
    leaf "y"
    exit
    exit
    exit
    ok
    "#);
}

#[test]
fn snapshot_errors_keep_the_prefix() {
    insta::assert_snapshot!(render_default("cfg={\n  name=\"box\"\n  size={1 2}\n  size=3="), @r#"
    enter "cfg"
    enter "name"
    leaf "box"
    enter "size"
    enter ""
    leaf "1"
    enter ""
    leaf "2"
    exit
    enter "size"
    leaf "3"
    error: syntax error: unexpected equal while expecting a field name or close at line 4, depth 1
    "#);
}

#[test]
fn snapshot_capacity_error() {
    let notation = Notation::new(NotationOptions {
        max_string_len: 4,
        ..NotationOptions::default()
    })
    .unwrap();
    insta::assert_snapshot!(render(&notation, "k=abcd\nl=abcde", &mut EventRecorder::new()), @r#"
    enter "k"
    leaf "abcd"
    enter "l"
    error: capacity exceeded: string longer than 4 bytes at line 2, depth 0
    "#);
}

#[test]
fn snapshot_skip_then_resume() {
    let mut recorder = EventRecorder::with_abort(|event, _| match event {
        Event::EnterField(name) if name == "secret" => ControlFlow::Break(Abort::Frames(0)),
        _ => CONTINUE,
    });
    let input = "user={name=ann secret={key=\"}}}\" salt={1 2}} role=admin} next=1";
    insta::assert_snapshot!(render(&Notation::default(), input, &mut recorder), @r#"
    enter "user"
    enter "name"
    leaf "ann"
    enter "secret"
    exit
    enter "role"
    leaf "admin"
    exit
    enter "next"
    leaf "1"
    ok
    "#);
}

#[test]
fn snapshot_illegal_abort() {
    let mut recorder = EventRecorder::with_abort(|event, _| match event {
        Event::LeafValue(_) => ControlFlow::Break(Abort::Frames(2)),
        _ => CONTINUE,
    });
    insta::assert_snapshot!(render(&Notation::default(), "a={b=1}", &mut recorder), @r#"
    enter "a"
    enter "b"
    leaf "1"
    error: abort error: cannot unwind 2 enclosing levels, 1 open at line 1, depth 1
    "#);
}
