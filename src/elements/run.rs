//! Drawing text run (`a:r`): run properties plus literal text.
//!
//! Drawing and chart rich text lives in the DrawingML namespace; every
//! tag of these kinds serializes with the hardcoded `a:` prefix.

use std::fmt::Write as _;

use quick_xml::events::BytesStart;

use super::{Element, is_true};
use crate::color::ColorSpec;
use crate::escape::{escape_xml, push_attr};
use crate::stream::{FragmentReader, ScopeEvent, parse_scope};

/// Run properties (`a:rPr`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    /// Font size in hundredths of a point (`sz` attribute)
    pub size: Option<i32>,
    pub bold: bool,
    pub italic: bool,
    /// Underline keyword (`u` attribute), e.g. "sng"
    pub underline: Option<String>,
    /// Solid fill color (`a:solidFill`/`a:srgbClr`)
    pub color: Option<ColorSpec>,
}

impl RunProperties {
    fn is_default(&self) -> bool {
        *self == RunProperties::default()
    }

    fn parse(stream: &mut FragmentReader<'_>, start: &BytesStart<'_>, empty: bool) -> Self {
        let mut props = RunProperties::default();

        for (name, value) in stream.attributes(start) {
            match name.as_str() {
                "sz" => props.size = value.parse::<i32>().ok(),
                "b" => props.bold = is_true(&value),
                "i" => props.italic = is_true(&value),
                "u" => props.underline = Some(value),
                _ => {},
            }
        }

        if !empty {
            parse_scope(stream, "a:rPr", |stream, event| {
                let ScopeEvent::Child { start, empty } = event else {
                    return false;
                };
                if start.local_name().as_ref() != b"solidFill" {
                    return false;
                }
                if empty {
                    return false;
                }
                parse_scope(stream, "a:solidFill", |stream, event| {
                    let ScopeEvent::Child { start, empty } = event else {
                        return false;
                    };
                    if start.local_name().as_ref() == b"srgbClr" {
                        if let Some(val) = stream.attribute(&start, b"val") {
                            props.color = Some(ColorSpec::Rgb(val));
                        }
                        if !empty {
                            parse_scope(stream, "a:srgbClr", |_, _| false);
                            return true;
                        }
                    }
                    false
                });
                true
            });
        }

        props
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<a:rPr");
        if let Some(size) = self.size {
            let _ = write!(out, " sz=\"{}\"", size);
        }
        if self.bold {
            out.push_str(" b=\"1\"");
        }
        if self.italic {
            out.push_str(" i=\"1\"");
        }
        if let Some(ref u) = self.underline {
            push_attr(out, "u", u);
        }
        match self.color {
            Some(ref color) => {
                out.push_str("><a:solidFill>");
                // srgbClr carries a bare 6-digit value; strip the alpha
                // byte from 8-digit specs. Non-ASCII values (8 bytes is
                // not 8 digits) are written back untouched.
                let hex = match color {
                    ColorSpec::Rgb(hex) if hex.len() == 8 => {
                        hex.get(2..).unwrap_or(hex.as_str())
                    },
                    ColorSpec::Rgb(hex) => hex.as_str(),
                    _ => "000000",
                };
                let _ = write!(out, "<a:srgbClr val=\"{}\"/>", escape_xml(hex));
                out.push_str("</a:solidFill></a:rPr>");
            },
            None => out.push_str("/>"),
        }
    }
}

/// A text run inside drawing or chart rich text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub properties: Option<RunProperties>,
    pub text: String,
}

impl Element for TextRun {
    const TAG: &'static str = "a:r";

    fn parse(stream: &mut FragmentReader<'_>, _start: &BytesStart<'_>, empty: bool) -> Self {
        let mut run = TextRun::default();

        if empty {
            return run;
        }

        parse_scope(stream, Self::TAG, |stream, event| {
            let ScopeEvent::Child { start, empty } = event else {
                return false;
            };
            match start.local_name().as_ref() {
                b"rPr" => {
                    run.properties = Some(RunProperties::parse(stream, &start, empty));
                    !empty
                },
                b"t" => {
                    if !empty {
                        parse_scope(stream, "a:t", |_, event| {
                            if let ScopeEvent::Text(text) = event {
                                run.text.push_str(&text);
                            }
                            false
                        });
                    }
                    !empty
                },
                _ => false,
            }
        });

        run
    }

    fn write_xml(&self, out: &mut String) {
        let no_props = match self.properties {
            Some(ref p) => p.is_default(),
            None => true,
        };
        if no_props && self.text.is_empty() {
            out.push_str("<a:r/>");
            return;
        }

        out.push_str("<a:r>");
        if let Some(ref props) = self.properties
            && !props.is_default()
        {
            props.write_xml(out);
        }
        out.push_str("<a:t>");
        out.push_str(&escape_xml(&self.text));
        out.push_str("</a:t></a:r>");
    }
}
