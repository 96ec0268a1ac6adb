//! Cell border element (`border`) and its per-side children.

use quick_xml::events::BytesStart;

use super::{Element, is_true};
use crate::color::ColorSpec;
use crate::escape::push_attr;
use crate::stream::{FragmentReader, ScopeEvent, parse_scope};

/// A single border side (`left`, `right`, `top`, `bottom`, `diagonal`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderSide {
    /// Line style keyword, e.g. "thin", "medium", "double"
    pub style: Option<String>,
    /// Line color
    pub color: Option<ColorSpec>,
}

impl BorderSide {
    /// Legacy line-style index for this side's style keyword.
    ///
    /// The mapping comes from the pre-OOXML binary format and is still
    /// what palette-era consumers expect.
    pub fn legacy_style_index(&self) -> u32 {
        match self.style.as_deref() {
            None | Some("none") => 0,
            Some("thin") => 1,
            Some("medium") => 2,
            Some("dashed") => 3,
            Some("dotted") => 4,
            Some("thick") => 5,
            Some("double") => 6,
            Some("hair") => 7,
            Some("mediumDashed") => 8,
            Some("dashDot") => 9,
            Some("mediumDashDot") => 10,
            Some("dashDotDot") => 11,
            Some("mediumDashDotDot") => 12,
            Some("slantDashDot") => 13,
            Some(other) => {
                log::warn!("unknown border style {:?}", other);
                0
            },
        }
    }

    fn parse(stream: &mut FragmentReader<'_>, start: &BytesStart<'_>, empty: bool) -> Self {
        let mut side = BorderSide::default();

        for (name, value) in stream.attributes(start) {
            if name == "style" {
                side.style = Some(value);
            }
        }

        if !empty {
            let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
            parse_scope(stream, &tag, |stream, event| {
                let ScopeEvent::Child { start, empty } = event else {
                    return false;
                };
                if start.local_name().as_ref() == b"color" {
                    side.color = Some(ColorSpec::parse(stream, &start, empty));
                    !empty
                } else {
                    false
                }
            });
        }

        side
    }

    fn write_xml_as(&self, tag: &str, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        if let Some(ref style) = self.style {
            push_attr(out, "style", style);
        }
        match self.color {
            Some(ref color) => {
                out.push('>');
                color.write_xml("color", out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            },
            None => out.push_str("/>"),
        }
    }
}

/// Cell border element: up to five named sides plus diagonal flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Border {
    pub left: Option<BorderSide>,
    pub right: Option<BorderSide>,
    pub top: Option<BorderSide>,
    pub bottom: Option<BorderSide>,
    pub diagonal: Option<BorderSide>,
    /// Diagonal line runs bottom-left to top-right
    pub diagonal_up: bool,
    /// Diagonal line runs top-left to bottom-right
    pub diagonal_down: bool,
}

impl Border {
    /// Check whether any side is present.
    #[inline]
    pub fn has_sides(&self) -> bool {
        self.left.is_some()
            || self.right.is_some()
            || self.top.is_some()
            || self.bottom.is_some()
            || self.diagonal.is_some()
    }
}

impl Element for Border {
    const TAG: &'static str = "border";

    fn parse(stream: &mut FragmentReader<'_>, start: &BytesStart<'_>, empty: bool) -> Self {
        let mut border = Border::default();

        for (name, value) in stream.attributes(start) {
            match name.as_str() {
                "diagonalUp" => border.diagonal_up = is_true(&value),
                "diagonalDown" => border.diagonal_down = is_true(&value),
                _ => {},
            }
        }

        if empty {
            return border;
        }

        parse_scope(stream, Self::TAG, |stream, event| {
            let ScopeEvent::Child { start, empty } = event else {
                return false;
            };
            let slot = match start.local_name().as_ref() {
                b"left" => &mut border.left,
                b"right" => &mut border.right,
                b"top" => &mut border.top,
                b"bottom" => &mut border.bottom,
                b"diagonal" => &mut border.diagonal,
                _ => return false,
            };
            *slot = Some(BorderSide::parse(stream, &start, empty));
            !empty
        });

        border
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<border");
        if self.diagonal_up {
            out.push_str(" diagonalUp=\"1\"");
        }
        if self.diagonal_down {
            out.push_str(" diagonalDown=\"1\"");
        }

        if !self.has_sides() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        for (tag, side) in [
            ("left", &self.left),
            ("right", &self.right),
            ("top", &self.top),
            ("bottom", &self.bottom),
            ("diagonal", &self.diagonal),
        ] {
            if let Some(side) = side {
                side.write_xml_as(tag, out);
            }
        }

        out.push_str("</border>");
    }
}
