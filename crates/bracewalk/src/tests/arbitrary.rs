use alloc::string::String;
#[cfg(feature = "values")]
use alloc::vec::Vec;

#[cfg(feature = "values")]
use bstr::BString;
use quickcheck::{Arbitrary, Gen};

#[cfg(feature = "values")]
use crate::Value;

/// Text that a quoted run can carry: anything but a newline. Punctuation is
/// drawn often so quoting and bare output both get exercised.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Text(pub(crate) String);

impl Arbitrary for Text {
    fn arbitrary(g: &mut Gen) -> Self {
        const PIECES: &[&str] = &[
            "a", "z9", "_", "\"", "\"\"", "{", "}", "=", ";", "#", " ", "\t", "é", "日本",
        ];
        let len = usize::arbitrary(g) % 6;
        let mut text = String::new();
        for _ in 0..len {
            if bool::arbitrary(g) {
                text.push_str(g.choose(PIECES).copied().unwrap_or("a"));
            } else {
                let ch = char::arbitrary(g);
                if ch != '\n' {
                    text.push(ch);
                }
            }
        }
        Self(text)
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        alloc::boxed::Box::new(
            self.0
                .shrink()
                .filter(|s| !s.contains('\n'))
                .map(Text),
        )
    }
}

#[cfg(feature = "values")]
/// A document in the shapes the parser produces: named fields at the root
/// and in structures, anonymous leaves in lists, and anonymous field
/// structures in arrays.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Doc(pub(crate) Value);

#[cfg(feature = "values")]
fn name(g: &mut Gen) -> BString {
    let Text(mut text) = Text::arbitrary(g);
    if text.is_empty() {
        text.push('k');
    }
    BString::from(text)
}

#[cfg(feature = "values")]
fn fields(g: &mut Gen, depth: usize) -> Vec<(BString, Value)> {
    let len = usize::arbitrary(g) % 4;
    (0..len).map(|_| (name(g), value(g, depth))).collect()
}

#[cfg(feature = "values")]
fn value(g: &mut Gen, depth: usize) -> Value {
    let choice = if depth == 0 { 0 } else { usize::arbitrary(g) % 4 };
    match choice {
        0 => Value::Leaf(BString::from(Text::arbitrary(g).0)),
        1 => Value::Struct(fields(g, depth - 1)),
        2 => {
            let len = 1 + usize::arbitrary(g) % 3;
            Value::Struct(
                (0..len)
                    .map(|_| (BString::default(), Value::Leaf(BString::from(Text::arbitrary(g).0))))
                    .collect(),
            )
        }
        _ => {
            let len = 1 + usize::arbitrary(g) % 3;
            Value::Struct(
                (0..len)
                    .map(|_| (BString::default(), Value::Struct(fields(g, depth - 1))))
                    .collect(),
            )
        }
    }
}

#[cfg(feature = "values")]
impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        Doc(Value::Struct(fields(g, depth)))
    }
}
