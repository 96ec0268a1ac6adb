//! Shared streaming token source and tag-stack bookkeeping.
//!
//! One [`FragmentReader`] is created per top-level parse and threaded by
//! mutable reference through the whole element tree: every element consumes
//! tokens from the same forward-only stream. The reader owns a [`TagStack`]
//! that tracks currently-open tag names so a nested tag with the same name
//! as its ancestor cannot end the ancestor's scope early.
//!
//! Parsing at this layer is tolerant by contract. Stream-level read errors
//! are logged and reported as end of input, which terminates the current
//! scope; callers receive whatever was accumulated so far instead of an
//! error. A whole document is never aborted because one element is
//! malformed.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::escape::{expand_entity, unescape_xml};

/// Stack of currently-open tag names during one parse.
///
/// Pushed on scope entry, popped on the matching close. The shared token
/// stream has no nesting awareness of its own; this stack is what decides
/// which closing tag terminates which scope.
#[derive(Debug, Default)]
pub struct TagStack {
    names: Vec<String>,
}

impl TagStack {
    /// Number of currently open tags.
    #[inline]
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    #[inline]
    fn push(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    #[inline]
    fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Unwind to `depth`, discarding deeper entries.
    ///
    /// Used on premature end of input so every scope still pops.
    #[inline]
    fn unwind_to(&mut self, depth: usize) {
        self.names.truncate(depth);
    }
}

/// An event handed to a scope's visitor.
pub enum ScopeEvent<'xml> {
    /// An immediate child tag. `empty` marks a self-closing tag.
    Child {
        start: BytesStart<'xml>,
        empty: bool,
    },
    /// Text content directly inside the current element, unescaped.
    Text(String),
}

/// Forward-only token stream shared by one element tree parse.
pub struct FragmentReader<'xml> {
    reader: Reader<&'xml [u8]>,
    tags: TagStack,
}

impl<'xml> FragmentReader<'xml> {
    /// Create a reader over one XML fragment.
    ///
    /// Text is delivered verbatim, not trimmed: entity references split
    /// text into multiple events, and surrounding whitespace belongs to
    /// the content.
    pub fn new(xml: &'xml str) -> Self {
        Self {
            reader: Reader::from_str(xml),
            tags: TagStack::default(),
        }
    }

    /// Pull the next event.
    ///
    /// Read errors are logged and mapped to `Event::Eof`, so a malformed
    /// stream terminates the current scope instead of failing the document.
    pub fn read_event(&mut self) -> Event<'xml> {
        match self.reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                log::warn!(
                    "malformed XML at offset {}: {}",
                    self.reader.buffer_position(),
                    e
                );
                Event::Eof
            },
        }
    }

    /// Decode all attributes of a start tag into an ordered name/value bag.
    ///
    /// Attribute names are reduced to their local part. Undecodable
    /// attributes are skipped with a warning; unrecognized names are the
    /// caller's to ignore (forward-compatible).
    pub fn attributes(&self, start: &BytesStart<'_>) -> Vec<(String, String)> {
        let mut bag = Vec::new();
        for attr in start.attributes() {
            match attr {
                Ok(attr) => {
                    let name =
                        String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                    match attr.decode_and_unescape_value(self.reader.decoder()) {
                        Ok(value) => bag.push((name, value.into_owned())),
                        Err(e) => log::warn!("undecodable attribute {}: {}", name, e),
                    }
                },
                Err(e) => log::warn!("malformed attribute: {}", e),
            }
        }
        bag
    }

    /// Look up a single attribute by local name.
    pub fn attribute(&self, start: &BytesStart<'_>, name: &[u8]) -> Option<String> {
        for attr in start.attributes().flatten() {
            if attr.key.local_name().as_ref() == name {
                return attr
                    .decode_and_unescape_value(self.reader.decoder())
                    .map(|v| v.into_owned())
                    .ok();
            }
        }
        None
    }

    /// Current tag-stack depth. Exposed for tests and diagnostics.
    #[inline]
    pub fn open_tags(&self) -> usize {
        self.tags.depth()
    }
}

/// Local part of a possibly prefixed tag name.
#[inline]
pub(crate) fn local_part(tag: &str) -> &str {
    match tag.split_once(':') {
        Some((_, local)) => local,
        None => tag,
    }
}

/// Drive one element's parse loop over the shared stream.
///
/// `tag` is the serialized name that opened this scope (its start tag has
/// already been consumed by the caller). Each immediate child tag and text
/// node is handed to `visit`. For child start tags the visitor returns
/// whether it consumed the child's subtree by recursing into that child's
/// own parse; unconsumed children are tracked on the tag stack so that
/// their closing tags (including same-named nested tags) pop instead of
/// ending this scope.
///
/// The scope ends on the matching close tag or at end of input (implicit
/// close, not an error). The tag stack is restored to its entry depth on
/// every exit path.
pub fn parse_scope<'xml, F>(stream: &mut FragmentReader<'xml>, tag: &str, mut visit: F)
where
    F: FnMut(&mut FragmentReader<'xml>, ScopeEvent<'xml>) -> bool,
{
    let entry = stream.tags.depth();
    stream.tags.push(tag);

    loop {
        match stream.read_event() {
            Event::Start(e) => {
                let consumed = visit(
                    stream,
                    ScopeEvent::Child {
                        start: e.clone(),
                        empty: false,
                    },
                );
                if !consumed {
                    // Skipped child: keep its name on the stack so the
                    // matching close unwinds it, not this scope.
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    stream.tags.push(&name);
                }
            },
            Event::Empty(e) => {
                visit(stream, ScopeEvent::Child { start: e, empty: true });
            },
            Event::Text(t) => {
                let text = unescape_xml(&String::from_utf8_lossy(t.as_ref()));
                visit(stream, ScopeEvent::Text(text));
            },
            Event::GeneralRef(e) => {
                // Entity and character references arrive as their own
                // events, splitting the surrounding text.
                let name = String::from_utf8_lossy(e.as_ref());
                match expand_entity(&name) {
                    Some(text) => {
                        visit(stream, ScopeEvent::Text(text));
                    },
                    None => log::warn!("unresolvable entity reference &{};", name),
                }
            },
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                visit(stream, ScopeEvent::Text(text));
            },
            Event::End(e) => {
                if stream.tags.depth() == entry + 1 {
                    if e.local_name().as_ref() != local_part(tag).as_bytes() {
                        log::warn!(
                            "mismatched close tag </{}> inside <{}>",
                            String::from_utf8_lossy(e.name().as_ref()),
                            tag
                        );
                    }
                    stream.tags.pop();
                    return;
                }
                // Close of a skipped child.
                stream.tags.pop();
            },
            Event::Eof => {
                // Premature end of input is an implicit close.
                stream.tags.unwind_to(entry);
                return;
            },
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_start<'a>(stream: &mut FragmentReader<'a>) -> BytesStart<'a> {
        loop {
            match stream.read_event() {
                Event::Start(e) => return e,
                Event::Eof => panic!("no start tag in input"),
                _ => {},
            }
        }
    }

    #[test]
    fn test_scope_sees_immediate_children_only() {
        let xml = "<fills><fill/><fill><patternFill/></fill></fills>";
        let mut stream = FragmentReader::new(xml);
        let _root = first_start(&mut stream);

        let mut seen = Vec::new();
        parse_scope(&mut stream, "fills", |stream, event| {
            if let ScopeEvent::Child { start, empty } = event {
                seen.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                if !empty {
                    // Consume the subtree so grandchildren stay invisible.
                    parse_scope(stream, "fill", |_, _| false);
                    return true;
                }
            }
            false
        });

        assert_eq!(seen, vec!["fill", "fill"]);
        assert_eq!(stream.open_tags(), 0);
    }

    #[test]
    fn test_nested_same_named_tag_does_not_close_scope() {
        // The inner <row> is skipped, not consumed; its close tag must pop
        // the inner entry instead of terminating the outer scope.
        let xml = "<row><extLst><row></row></extLst><c/></row>";
        let mut stream = FragmentReader::new(xml);
        let _root = first_start(&mut stream);

        let mut cells = 0;
        parse_scope(&mut stream, "row", |_, event| {
            if let ScopeEvent::Child { start, .. } = event
                && start.local_name().as_ref() == b"c"
            {
                cells += 1;
            }
            false
        });

        assert_eq!(cells, 1);
        assert_eq!(stream.open_tags(), 0);
    }

    #[test]
    fn test_premature_eof_is_implicit_close() {
        let xml = "<border><left style=\"thin\">";
        let mut stream = FragmentReader::new(xml);
        let _root = first_start(&mut stream);

        let mut children = 0;
        parse_scope(&mut stream, "border", |_, event| {
            if let ScopeEvent::Child { .. } = event {
                children += 1;
            }
            false
        });

        assert_eq!(children, 1);
        // Every scope must still have popped.
        assert_eq!(stream.open_tags(), 0);
    }

    #[test]
    fn test_text_content_is_unescaped() {
        let xml = "<t>a &amp; b &lt; c</t>";
        let mut stream = FragmentReader::new(xml);
        let _root = first_start(&mut stream);

        let mut text = String::new();
        parse_scope(&mut stream, "t", |_, event| {
            if let ScopeEvent::Text(t) = event {
                text.push_str(&t);
            }
            false
        });

        assert_eq!(text, "a & b < c");
    }

    #[test]
    fn test_character_references_are_expanded() {
        let xml = "<t>caf&#233; &#x2014; R&amp;D</t>";
        let mut stream = FragmentReader::new(xml);
        let _root = first_start(&mut stream);

        let mut text = String::new();
        parse_scope(&mut stream, "t", |_, event| {
            if let ScopeEvent::Text(t) = event {
                text.push_str(&t);
            }
            false
        });

        assert_eq!(text, "café — R&D");
    }

    #[test]
    fn test_cdata_is_passed_through_verbatim() {
        let xml = "<t><![CDATA[a < b & c]]></t>";
        let mut stream = FragmentReader::new(xml);
        let _root = first_start(&mut stream);

        let mut text = String::new();
        parse_scope(&mut stream, "t", |_, event| {
            if let ScopeEvent::Text(t) = event {
                text.push_str(&t);
            }
            false
        });

        assert_eq!(text, "a < b & c");
    }

    #[test]
    fn test_attribute_bag_preserves_order() {
        let xml = r#"<xf numFmtId="0" fontId="2" applyFont="1"/>"#;
        let mut stream = FragmentReader::new(xml);
        let start = match stream.read_event() {
            Event::Empty(e) => e,
            other => panic!("unexpected event: {:?}", other),
        };

        let attrs = stream.attributes(&start);
        let names: Vec<&str> = attrs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["numFmtId", "fontId", "applyFont"]);
        assert_eq!(attrs[1].1, "2");
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("a:rPr"), "rPr");
        assert_eq!(local_part("border"), "border");
    }
}
