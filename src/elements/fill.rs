//! Cell fill element (`fill`) and its exclusive pattern/gradient choice.
//!
//! A `fill` owns exactly one of `patternFill` or `gradientFill`. The
//! choice is modeled as an enum rather than two nullable fields, so there
//! is no "which one is set" ambiguity.

use std::fmt::Write as _;

use quick_xml::events::BytesStart;

use super::Element;
use crate::color::ColorSpec;
use crate::escape::push_attr;
use crate::stream::{FragmentReader, ScopeEvent, parse_scope};

/// Where a fill appears.
///
/// Differential-format (`dxf`) fills store the pattern color in `bgColor`
/// and the background in `fgColor`, inverted relative to regular style
/// fills. The inversion is a quirk of real-world writers and is kept
/// as observed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillContext {
    Styles,
    Dxf,
}

/// One stop of a gradient fill.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0.0 to 1.0
    pub position: f64,
    pub color: Option<ColorSpec>,
}

/// The pattern/gradient choice inside a `fill` element.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Empty `fill` element with neither choice present
    None,
    Pattern {
        /// Raw `patternType` keyword, kept exactly as written. A missing
        /// patternType on a fill that still carries a bgColor means
        /// solid-with-background-color; see
        /// [`effective_pattern_type`](Fill::effective_pattern_type).
        pattern_type: Option<String>,
        fg_color: Option<ColorSpec>,
        bg_color: Option<ColorSpec>,
    },
    Gradient {
        gradient_type: Option<String>,
        degree: Option<f64>,
        stops: Vec<GradientStop>,
    },
}

impl Fill {
    /// Pattern type after the legacy writer quirks are applied.
    ///
    /// A pattern fill without a patternType but with a background color is
    /// treated as "solid"; downstream consumers depend on this reading.
    pub fn effective_pattern_type(&self) -> Option<&str> {
        match self {
            Fill::Pattern {
                pattern_type: Some(t),
                ..
            } => Some(t.as_str()),
            Fill::Pattern {
                pattern_type: None,
                bg_color: Some(_),
                ..
            } => Some("solid"),
            _ => None,
        }
    }

    /// Parse a fill in the given context.
    ///
    /// In [`FillContext::Dxf`] the fg/bg colors are swapped on the way in
    /// so that `fg_color` always means the pattern color in memory.
    pub fn parse_with(
        stream: &mut FragmentReader<'_>,
        _start: &BytesStart<'_>,
        empty: bool,
        context: FillContext,
    ) -> Self {
        let mut fill = Fill::None;

        if empty {
            return fill;
        }

        parse_scope(stream, Self::TAG, |stream, event| {
            let ScopeEvent::Child { start, empty } = event else {
                return false;
            };
            match start.local_name().as_ref() {
                b"patternFill" => {
                    fill = parse_pattern_fill(stream, &start, empty, context);
                    !empty
                },
                b"gradientFill" => {
                    fill = parse_gradient_fill(stream, &start, empty);
                    !empty
                },
                _ => false,
            }
        });

        fill
    }

    /// Serialize in the given context, swapping fg/bg back for dxf fills.
    pub fn write_xml_with(&self, out: &mut String, context: FillContext) {
        match self {
            Fill::None => out.push_str("<fill/>"),
            Fill::Pattern {
                pattern_type,
                fg_color,
                bg_color,
            } => {
                let (fg, bg) = match context {
                    FillContext::Styles => (fg_color, bg_color),
                    FillContext::Dxf => (bg_color, fg_color),
                };
                out.push_str("<fill><patternFill");
                if let Some(t) = pattern_type {
                    push_attr(out, "patternType", t);
                }
                if fg.is_none() && bg.is_none() {
                    out.push_str("/></fill>");
                    return;
                }
                out.push('>');
                if let Some(color) = fg {
                    color.write_xml("fgColor", out);
                }
                if let Some(color) = bg {
                    color.write_xml("bgColor", out);
                }
                out.push_str("</patternFill></fill>");
            },
            Fill::Gradient {
                gradient_type,
                degree,
                stops,
            } => {
                out.push_str("<fill><gradientFill");
                if let Some(t) = gradient_type {
                    push_attr(out, "type", t);
                }
                if let Some(degree) = degree {
                    let _ = write!(out, " degree=\"{}\"", degree);
                }
                if stops.is_empty() {
                    out.push_str("/></fill>");
                    return;
                }
                out.push('>');
                for stop in stops {
                    let _ = write!(out, "<stop position=\"{}\">", stop.position);
                    if let Some(ref color) = stop.color {
                        color.write_xml("color", out);
                    }
                    out.push_str("</stop>");
                }
                out.push_str("</gradientFill></fill>");
            },
        }
    }
}

impl Element for Fill {
    const TAG: &'static str = "fill";

    fn parse(stream: &mut FragmentReader<'_>, start: &BytesStart<'_>, empty: bool) -> Self {
        Self::parse_with(stream, start, empty, FillContext::Styles)
    }

    fn write_xml(&self, out: &mut String) {
        self.write_xml_with(out, FillContext::Styles);
    }
}

fn parse_pattern_fill(
    stream: &mut FragmentReader<'_>,
    start: &BytesStart<'_>,
    empty: bool,
    context: FillContext,
) -> Fill {
    let pattern_type = stream.attribute(start, b"patternType");
    let mut fg_color = None;
    let mut bg_color = None;

    if !empty {
        parse_scope(stream, "patternFill", |stream, event| {
            let ScopeEvent::Child { start, empty } = event else {
                return false;
            };
            match start.local_name().as_ref() {
                b"fgColor" => {
                    fg_color = Some(ColorSpec::parse(stream, &start, empty));
                    !empty
                },
                b"bgColor" => {
                    bg_color = Some(ColorSpec::parse(stream, &start, empty));
                    !empty
                },
                _ => false,
            }
        });
    }

    // dxf fills carry their colors inverted; normalize so fg_color is
    // always the pattern color in memory.
    let (fg_color, bg_color) = match context {
        FillContext::Styles => (fg_color, bg_color),
        FillContext::Dxf => (bg_color, fg_color),
    };

    Fill::Pattern {
        pattern_type,
        fg_color,
        bg_color,
    }
}

fn parse_gradient_fill(stream: &mut FragmentReader<'_>, start: &BytesStart<'_>, empty: bool) -> Fill {
    let gradient_type = stream.attribute(start, b"type");
    let degree = stream
        .attribute(start, b"degree")
        .and_then(|v| v.parse::<f64>().ok());
    let mut stops = Vec::new();

    if !empty {
        parse_scope(stream, "gradientFill", |stream, event| {
            let ScopeEvent::Child { start, empty } = event else {
                return false;
            };
            if start.local_name().as_ref() != b"stop" {
                return false;
            }
            let position = stream
                .attribute(&start, b"position")
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.0);
            let mut color = None;
            if !empty {
                parse_scope(stream, "stop", |stream, event| {
                    let ScopeEvent::Child { start, empty } = event else {
                        return false;
                    };
                    if start.local_name().as_ref() == b"color" {
                        color = Some(ColorSpec::parse(stream, &start, empty));
                        !empty
                    } else {
                        false
                    }
                });
            }
            stops.push(GradientStop { position, color });
            !empty
        });
    }

    Fill::Gradient {
        gradient_type,
        degree,
        stops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::parse_fragment;

    #[test]
    fn test_pattern_fill_round_trip() {
        let xml = concat!(
            r#"<fill><patternFill patternType="darkGray">"#,
            r#"<fgColor rgb="FFFF0000"/><bgColor indexed="64"/>"#,
            "</patternFill></fill>",
        );
        let fill: Fill = parse_fragment(xml).unwrap();
        assert_eq!(fill.effective_pattern_type(), Some("darkGray"));
        assert_eq!(fill.to_xml(), xml);
    }

    #[test]
    fn test_missing_pattern_type_means_solid_with_background() {
        let fill: Fill = parse_fragment(
            r#"<fill><patternFill><bgColor theme="6"/></patternFill></fill>"#,
        )
        .unwrap();
        assert_eq!(fill.effective_pattern_type(), Some("solid"));
        // The raw field stays None; only the interpretation changes.
        assert!(matches!(
            fill,
            Fill::Pattern {
                pattern_type: None,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_pattern_type_without_background_is_not_solid() {
        let fill: Fill = parse_fragment("<fill><patternFill/></fill>").unwrap();
        assert_eq!(fill.effective_pattern_type(), None);
    }

    #[test]
    fn test_dxf_fill_colors_are_swapped() {
        let xml = concat!(
            r#"<fill><patternFill patternType="solid">"#,
            r#"<fgColor rgb="FF111111"/><bgColor rgb="FF222222"/>"#,
            "</patternFill></fill>",
        );
        let mut stream = crate::stream::FragmentReader::new(xml);
        let start = match stream.read_event() {
            quick_xml::events::Event::Start(e) => e,
            other => panic!("unexpected event: {:?}", other),
        };
        let fill = Fill::parse_with(&mut stream, &start, false, FillContext::Dxf);

        let Fill::Pattern {
            fg_color, bg_color, ..
        } = &fill
        else {
            panic!("expected pattern fill");
        };
        assert_eq!(fg_color, &Some(ColorSpec::Rgb("FF222222".to_string())));
        assert_eq!(bg_color, &Some(ColorSpec::Rgb("FF111111".to_string())));

        // Serializing back in dxf context restores the written order.
        let mut out = String::new();
        fill.write_xml_with(&mut out, FillContext::Dxf);
        assert_eq!(out, xml);
    }

    #[test]
    fn test_gradient_fill_round_trip() {
        let xml = concat!(
            r#"<fill><gradientFill type="path" degree="90">"#,
            r#"<stop position="0"><color theme="0"/></stop>"#,
            r#"<stop position="1"><color rgb="FF4F81BD"/></stop>"#,
            "</gradientFill></fill>",
        );
        let fill: Fill = parse_fragment(xml).unwrap();
        let Fill::Gradient { stops, .. } = &fill else {
            panic!("expected gradient fill");
        };
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[1].position, 1.0);
        assert_eq!(fill.to_xml(), xml);
    }

    #[test]
    fn test_empty_fill() {
        let fill: Fill = parse_fragment("<fill/>").unwrap();
        assert_eq!(fill, Fill::None);
        assert_eq!(fill.to_xml(), "<fill/>");
    }
}
