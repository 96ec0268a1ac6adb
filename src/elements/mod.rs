//! Fragment element kinds and the protocol they share.
//!
//! Every element kind implements the same contract: a tolerant streaming
//! parse off the shared token stream, and a deterministic re-serialization
//! into a fragment string. The concrete kinds shipped here cover each
//! shape the protocol has to handle: pure attribute bags (`color`), fixed
//! child sets (`border`), exclusive choice children (`fill`), and text
//! content under a hardcoded namespace prefix (`a:r`).

pub mod border;
pub mod fill;
pub mod run;

pub use border::{Border, BorderSide};
pub use fill::{Fill, FillContext, GradientStop};
pub use run::{RunProperties, TextRun};

use quick_xml::events::{BytesStart, Event};

use crate::error::{FragError, Result};
use crate::stream::{FragmentReader, local_part};

/// Shared contract for every fragment element kind.
///
/// Cloning an element is a deep structural copy; two clones never share
/// children. Equality is structural.
pub trait Element: Clone + Sized {
    /// Serialized tag name, including its hardcoded namespace prefix
    /// (`a:r` for drawing kinds, plain `border` for style kinds).
    const TAG: &'static str;

    /// Parse one element whose start tag has just been read.
    ///
    /// Consumes tokens up to and including the matching close tag (or end
    /// of input, which counts as an implicit close). Never fails:
    /// malformed markup is logged and whatever was accumulated is
    /// returned, so callers must tolerate partially populated values.
    fn parse(stream: &mut FragmentReader<'_>, start: &BytesStart<'_>, empty: bool) -> Self;

    /// Append this element's markup to `out`.
    ///
    /// Self-closing when there are no children or text, otherwise open
    /// tag, attributes, child serializations, close tag. No
    /// pretty-printing; attribute values and text are escaped.
    fn write_xml(&self, out: &mut String);

    /// Serialize to a standalone fragment string.
    fn to_xml(&self) -> String {
        let mut out = String::with_capacity(128);
        self.write_xml(&mut out);
        out
    }
}

/// Parse a fragment whose root element is `E`.
///
/// This is the one place parsing can fail: empty input or a root tag of a
/// different kind are caller errors. Inside the root element the usual
/// tolerant rules apply.
pub fn parse_fragment<E: Element>(xml: &str) -> Result<E> {
    let mut stream = FragmentReader::new(xml);
    loop {
        match stream.read_event() {
            Event::Start(e) => {
                return if e.local_name().as_ref() == local_part(E::TAG).as_bytes() {
                    Ok(E::parse(&mut stream, &e, false))
                } else {
                    Err(unexpected_root::<E>(&e))
                };
            },
            Event::Empty(e) => {
                return if e.local_name().as_ref() == local_part(E::TAG).as_bytes() {
                    Ok(E::parse(&mut stream, &e, true))
                } else {
                    Err(unexpected_root::<E>(&e))
                };
            },
            Event::Eof => return Err(FragError::EmptyFragment),
            _ => {},
        }
    }
}

fn unexpected_root<E: Element>(start: &BytesStart<'_>) -> FragError {
    FragError::UnexpectedRoot {
        expected: E::TAG.to_string(),
        got: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
    }
}

/// OOXML boolean attribute: "1"/"true" are true, everything else false.
#[inline]
pub(crate) fn is_true(value: &str) -> bool {
    value == "1" || value == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_rejects_wrong_root() {
        let err = parse_fragment::<Border>("<fill/>").unwrap_err();
        assert!(matches!(err, FragError::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_parse_fragment_rejects_empty_input() {
        let err = parse_fragment::<Border>("   ").unwrap_err();
        assert!(matches!(err, FragError::EmptyFragment));
    }

    #[test]
    fn test_parse_fragment_skips_declaration() {
        let border: Border =
            parse_fragment("<?xml version=\"1.0\" encoding=\"UTF-8\"?><border/>").unwrap();
        assert!(!border.has_sides());
    }
}
