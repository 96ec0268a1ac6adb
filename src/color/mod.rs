//! Color specifications and their resolution to concrete RGB values.
//!
//! Markup carries colors in one of four shapes: an explicit ARGB hex
//! string, a legacy palette index, a theme slot with an optional tint, or
//! "auto". [`resolve`] turns any of them into a displayable RGB triple
//! plus a nearest legacy palette slot. Resolution never fails: bad hex
//! strings and out-of-range indices are logged and substituted with a
//! best-effort default so one broken color cannot sink a document.

mod hsl;
mod palette;
mod theme;

pub use hsl::{apply_tint, hsl_to_rgb, rgb_to_hsl};
pub use palette::{
    INDEXED_PALETTE, SYSTEM_BACKGROUND_INDEX, SYSTEM_FOREGROUND_INDEX, nearest_palette_index,
};
pub use theme::{THEME_SLOT_COUNT, THEME_SLOT_NAMES, Theme};

use quick_xml::events::BytesStart;

use crate::escape::push_attr;
use crate::stream::{FragmentReader, parse_scope};
use std::fmt::Write as _;

/// Tints smaller than this are treated as no tint at all.
const TINT_EPSILON: f64 = 0.005;

/// How a color reference is being used.
///
/// A handful of legacy rules differ between the two: palette slot 64 and
/// "auto" both resolve differently for fonts and fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorUsage {
    Font,
    Fill,
}

/// A color as written in markup. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    /// Reference into the legacy indexed palette
    Indexed(u32),
    /// 8-hex-digit ARGB string; the alpha byte is conventionally "FF"
    Rgb(String),
    /// Theme slot plus a tint in [-1.0, 1.0]
    Theme { slot: u32, tint: f64 },
    /// Context-dependent automatic color
    Auto,
}

/// A concrete displayable color, produced only by [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColor {
    /// Red, green, blue
    pub rgb: [u8; 3],
    /// Nearest legacy palette slot, for consumers that still index the
    /// old palette
    pub palette_index: u32,
}

impl ColorSpec {
    /// Read a color element (`color`, `fgColor`, `bgColor`, ...) from its
    /// start tag.
    ///
    /// Recognized attributes: `rgb`, `indexed`, `theme`, `tint`, `auto`.
    /// The first matching attribute wins; anything else is ignored. An
    /// attribute-free color element comes back as `Auto`.
    pub fn parse(stream: &mut FragmentReader<'_>, start: &BytesStart<'_>, empty: bool) -> Self {
        let mut spec = None;
        let mut tint = 0.0f64;

        for (name, value) in stream.attributes(start) {
            match name.as_str() {
                "rgb" if spec.is_none() => spec = Some(ColorSpec::Rgb(value)),
                "indexed" if spec.is_none() => match value.parse::<u32>() {
                    Ok(i) => spec = Some(ColorSpec::Indexed(i)),
                    Err(_) => log::warn!("bad indexed color value {:?}", value),
                },
                "theme" if spec.is_none() => match value.parse::<u32>() {
                    Ok(slot) => spec = Some(ColorSpec::Theme { slot, tint: 0.0 }),
                    Err(_) => log::warn!("bad theme color value {:?}", value),
                },
                "tint" => match value.parse::<f64>() {
                    Ok(t) => tint = t,
                    Err(_) => log::warn!("bad tint value {:?}", value),
                },
                "auto" if spec.is_none() => {
                    if value == "1" || value == "true" {
                        spec = Some(ColorSpec::Auto);
                    }
                },
                _ => {},
            }
        }

        if !empty {
            // Color elements have no schema children; drain anything odd.
            let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
            parse_scope(stream, &tag, |_, _| false);
        }

        match spec {
            Some(ColorSpec::Theme { slot, .. }) => ColorSpec::Theme { slot, tint },
            Some(spec) => spec,
            None => ColorSpec::Auto,
        }
    }

    /// Serialize under the given tag name, always self-closing.
    pub fn write_xml(&self, tag: &str, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        match self {
            ColorSpec::Indexed(i) => {
                let _ = write!(out, " indexed=\"{}\"", i);
            },
            ColorSpec::Rgb(hex) => push_attr(out, "rgb", hex),
            ColorSpec::Theme { slot, tint } => {
                let _ = write!(out, " theme=\"{}\"", slot);
                if tint.abs() > TINT_EPSILON {
                    let _ = write!(out, " tint=\"{}\"", tint);
                }
            },
            ColorSpec::Auto => out.push_str(" auto=\"1\""),
        }
        out.push_str("/>");
    }
}

/// Parse a 6- or 8-hex-digit color string into an RGB triple.
///
/// 8-digit input is ARGB; the leading alpha byte is dropped. A leading
/// `#` is tolerated.
pub(crate) fn parse_hex_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    // Byte lengths; non-ASCII input must bail out before slicing.
    if !digits.is_ascii() {
        return None;
    }
    let rgb = match digits.len() {
        8 => digits.get(2..)?,
        6 => digits,
        _ => return None,
    };
    let r = u8::from_str_radix(rgb.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(rgb.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(rgb.get(4..6)?, 16).ok()?;
    Some([r, g, b])
}

/// Resolve a color specification to a concrete color.
///
/// Returns `None` only for `Auto` under fill usage, where no automatic
/// color exists and the caller decides. Every other path yields a color,
/// substituting black (with a warning) for unparseable or out-of-range
/// input.
pub fn resolve(spec: &ColorSpec, usage: ColorUsage, theme: &Theme) -> Option<ResolvedColor> {
    match spec {
        ColorSpec::Indexed(i) => Some(resolve_indexed(*i, usage)),
        ColorSpec::Rgb(hex) => Some(resolve_rgb(hex)),
        ColorSpec::Theme { slot, tint } => Some(resolve_theme(*slot, *tint, theme)),
        ColorSpec::Auto => match usage {
            ColorUsage::Font => Some(ResolvedColor {
                rgb: [0x00, 0x00, 0x00],
                palette_index: SYSTEM_FOREGROUND_INDEX,
            }),
            ColorUsage::Fill => None,
        },
    }
}

fn resolve_indexed(index: u32, usage: ColorUsage) -> ResolvedColor {
    // Slot 64 under font usage is the system window-text color, not a
    // palette entry; fills use 64/65 for the system background.
    match (index, usage) {
        (SYSTEM_FOREGROUND_INDEX, ColorUsage::Font) => ResolvedColor {
            rgb: [0x00, 0x00, 0x00],
            palette_index: SYSTEM_FOREGROUND_INDEX,
        },
        (SYSTEM_FOREGROUND_INDEX, ColorUsage::Fill) | (SYSTEM_BACKGROUND_INDEX, _) => {
            ResolvedColor {
                rgb: [0xFF, 0xFF, 0xFF],
                palette_index: index,
            }
        },
        _ => match INDEXED_PALETTE.get(index as usize) {
            Some(&rgb) => ResolvedColor {
                rgb,
                palette_index: index,
            },
            None => {
                log::warn!("indexed color {} out of range", index);
                ResolvedColor {
                    rgb: [0x00, 0x00, 0x00],
                    palette_index: 0,
                }
            },
        },
    }
}

fn resolve_rgb(hex: &str) -> ResolvedColor {
    let rgb = match parse_hex_rgb(hex) {
        Some(rgb) => rgb,
        None => {
            log::warn!("unparseable rgb color {:?}", hex);
            [0x00, 0x00, 0x00]
        },
    };
    ResolvedColor {
        rgb,
        palette_index: nearest_palette_index(rgb),
    }
}

fn resolve_theme(slot: u32, tint: f64, theme: &Theme) -> ResolvedColor {
    let base = match theme.color(slot) {
        Some(rgb) => rgb,
        None => {
            log::warn!("theme slot {} out of range", slot);
            [0x00, 0x00, 0x00]
        },
    };
    let rgb = if tint.abs() > TINT_EPSILON {
        apply_tint(base, tint)
    } else {
        base
    };
    ResolvedColor {
        rgb,
        palette_index: nearest_palette_index(rgb),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_boundaries() {
        let theme = Theme::new();
        let black = resolve(
            &ColorSpec::Rgb("FF000000".to_string()),
            ColorUsage::Font,
            &theme,
        )
        .unwrap();
        assert_eq!(black.rgb, [0, 0, 0]);
        assert_eq!(black.palette_index, 0);

        let white = resolve(
            &ColorSpec::Rgb("FFFFFFFF".to_string()),
            ColorUsage::Fill,
            &theme,
        )
        .unwrap();
        assert_eq!(white.rgb, [255, 255, 255]);
        assert_eq!(white.palette_index, 1);
    }

    #[test]
    fn test_rgb_accepts_bare_six_digits() {
        let theme = Theme::new();
        let c = resolve(
            &ColorSpec::Rgb("4F81BD".to_string()),
            ColorUsage::Fill,
            &theme,
        )
        .unwrap();
        assert_eq!(c.rgb, [0x4F, 0x81, 0xBD]);
    }

    #[test]
    fn test_bad_rgb_falls_back_to_black() {
        let theme = Theme::new();
        let c = resolve(
            &ColorSpec::Rgb("not-a-color".to_string()),
            ColorUsage::Font,
            &theme,
        )
        .unwrap();
        assert_eq!(c.rgb, [0, 0, 0]);
    }

    #[test]
    fn test_non_ascii_rgb_falls_back_to_black() {
        let theme = Theme::new();
        // Multibyte characters land these on the 6- and 8-byte paths.
        for hex in ["aébcd", "aébcdef", "#aébcd", "ｆｆ00AA00"] {
            let c = resolve(&ColorSpec::Rgb(hex.to_string()), ColorUsage::Font, &theme).unwrap();
            assert_eq!(c.rgb, [0, 0, 0], "input {:?}", hex);
        }
    }

    #[test]
    fn test_indexed_64_font_is_system_foreground() {
        let theme = Theme::new();
        let c = resolve(&ColorSpec::Indexed(64), ColorUsage::Font, &theme).unwrap();
        assert_eq!(c.rgb, [0, 0, 0]);
        assert_eq!(c.palette_index, 64);
    }

    #[test]
    fn test_indexed_64_fill_is_system_background() {
        let theme = Theme::new();
        let c = resolve(&ColorSpec::Indexed(64), ColorUsage::Fill, &theme).unwrap();
        assert_eq!(c.rgb, [255, 255, 255]);
    }

    #[test]
    fn test_indexed_palette_lookup() {
        let theme = Theme::new();
        let c = resolve(&ColorSpec::Indexed(16), ColorUsage::Fill, &theme).unwrap();
        assert_eq!(c.rgb, [0x80, 0x00, 0x00]);
        assert_eq!(c.palette_index, 16);
    }

    #[test]
    fn test_indexed_out_of_range_is_tolerated() {
        let theme = Theme::new();
        let c = resolve(&ColorSpec::Indexed(200), ColorUsage::Font, &theme).unwrap();
        assert_eq!(c.rgb, [0, 0, 0]);
    }

    #[test]
    fn test_theme_zero_tint_is_raw_base_color() {
        let theme = Theme::new();
        let c = resolve(
            &ColorSpec::Theme { slot: 4, tint: 0.0 },
            ColorUsage::Font,
            &theme,
        )
        .unwrap();
        // No HSL round trip for a zero tint, so no rounding drift at all.
        assert_eq!(c.rgb, [0x4F, 0x81, 0xBD]);
    }

    #[test]
    fn test_theme_tiny_tint_is_ignored() {
        let theme = Theme::new();
        let c = resolve(
            &ColorSpec::Theme {
                slot: 4,
                tint: 0.004,
            },
            ColorUsage::Font,
            &theme,
        )
        .unwrap();
        assert_eq!(c.rgb, [0x4F, 0x81, 0xBD]);
    }

    #[test]
    fn test_theme_tint_extremes() {
        let theme = Theme::new();
        let white = resolve(
            &ColorSpec::Theme { slot: 4, tint: 1.0 },
            ColorUsage::Font,
            &theme,
        )
        .unwrap();
        assert_eq!(white.rgb, [255, 255, 255]);

        let black = resolve(
            &ColorSpec::Theme {
                slot: 4,
                tint: -1.0,
            },
            ColorUsage::Font,
            &theme,
        )
        .unwrap();
        assert_eq!(black.rgb, [0, 0, 0]);
    }

    #[test]
    fn test_auto_differs_by_usage() {
        let theme = Theme::new();
        let font = resolve(&ColorSpec::Auto, ColorUsage::Font, &theme).unwrap();
        assert_eq!(font.rgb, [0, 0, 0]);
        assert!(resolve(&ColorSpec::Auto, ColorUsage::Fill, &theme).is_none());
    }

    #[test]
    fn test_write_xml_variants() {
        let mut out = String::new();
        ColorSpec::Rgb("FF00AA00".to_string()).write_xml("color", &mut out);
        assert_eq!(out, r#"<color rgb="FF00AA00"/>"#);

        out.clear();
        ColorSpec::Theme {
            slot: 3,
            tint: -0.25,
        }
        .write_xml("fgColor", &mut out);
        assert_eq!(out, r#"<fgColor theme="3" tint="-0.25"/>"#);

        out.clear();
        ColorSpec::Theme { slot: 1, tint: 0.0 }.write_xml("color", &mut out);
        assert_eq!(out, r#"<color theme="1"/>"#);

        out.clear();
        ColorSpec::Indexed(64).write_xml("bgColor", &mut out);
        assert_eq!(out, r#"<bgColor indexed="64"/>"#);

        out.clear();
        ColorSpec::Auto.write_xml("color", &mut out);
        assert_eq!(out, r#"<color auto="1"/>"#);
    }
}
