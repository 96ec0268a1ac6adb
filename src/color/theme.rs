//! Document theme color table.
//!
//! A theme is loaded once per document and read-only afterwards; every
//! theme color reference in that document resolves against the same table.
//! Slots missing from the document's table fall back to the built-in
//! Office default scheme, because workbooks written without a real theme
//! part still reference theme slots.

use quick_xml::events::Event;

use super::parse_hex_rgb;
use crate::error::{FragError, Result};
use crate::stream::{FragmentReader, ScopeEvent, parse_scope};

/// Number of theme color slots.
pub const THEME_SLOT_COUNT: usize = 12;

/// Ordered slot names, matching the index space of the `theme` attribute.
pub const THEME_SLOT_NAMES: [&str; THEME_SLOT_COUNT] = [
    "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

/// Built-in Office default theme colors, slot for slot.
const DEFAULT_THEME: [[u8; 3]; THEME_SLOT_COUNT] = [
    [0x00, 0x00, 0x00], // dk1
    [0xFF, 0xFF, 0xFF], // lt1
    [0x1F, 0x49, 0x7D], // dk2
    [0xEE, 0xEC, 0xE1], // lt2
    [0x4F, 0x81, 0xBD], // accent1
    [0xC0, 0x50, 0x4D], // accent2
    [0x9B, 0xBB, 0x59], // accent3
    [0x80, 0x64, 0xA2], // accent4
    [0x4B, 0xAC, 0xC6], // accent5
    [0xF7, 0x96, 0x46], // accent6
    [0x00, 0x00, 0xFF], // hlink
    [0x80, 0x00, 0x80], // folHlink
];

/// Theme color table for one document.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    slots: [Option<[u8; 3]>; THEME_SLOT_COUNT],
}

impl Theme {
    /// Create an empty theme; every slot falls back to the default scheme.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Base RGB for a slot, falling back to the built-in default table.
    ///
    /// Returns `None` only for out-of-range slot indices.
    pub fn color(&self, slot: u32) -> Option<[u8; 3]> {
        let i = slot as usize;
        if i >= THEME_SLOT_COUNT {
            return None;
        }
        Some(self.slots[i].unwrap_or(DEFAULT_THEME[i]))
    }

    /// Set the base RGB for a slot. Out-of-range slots are ignored with a
    /// warning.
    pub fn set_color(&mut self, slot: u32, rgb: [u8; 3]) {
        match self.slots.get_mut(slot as usize) {
            Some(entry) => *entry = Some(rgb),
            None => log::warn!("theme slot {} out of range", slot),
        }
    }

    /// Parse a `clrScheme` fragment, e.g. cut from `xl/theme/theme1.xml`.
    ///
    /// Each slot child carries either an `srgbClr val="RRGGBB"` or a
    /// `sysClr` whose `lastClr` attribute holds the rendered value.
    /// Unknown children and undecodable values are skipped.
    pub fn from_clr_scheme(xml: &str) -> Result<Self> {
        let mut stream = FragmentReader::new(xml);
        loop {
            match stream.read_event() {
                Event::Start(e) => {
                    if e.local_name().as_ref() != b"clrScheme" {
                        return Err(FragError::UnexpectedRoot {
                            expected: "clrScheme".to_string(),
                            got: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        });
                    }
                    let mut theme = Theme::new();
                    parse_scope(&mut stream, "clrScheme", |stream, event| {
                        let ScopeEvent::Child { start, empty } = event else {
                            return false;
                        };
                        let local = start.local_name();
                        let Some(slot) = THEME_SLOT_NAMES
                            .iter()
                            .position(|n| n.as_bytes() == local.as_ref())
                        else {
                            return false;
                        };
                        if empty {
                            return false;
                        }
                        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                        parse_scope(stream, &tag, |stream, event| {
                            let ScopeEvent::Child { start, empty } = event else {
                                return false;
                            };
                            let rgb = match start.local_name().as_ref() {
                                b"srgbClr" => stream.attribute(&start, b"val"),
                                b"sysClr" => stream.attribute(&start, b"lastClr"),
                                _ => None,
                            };
                            if let Some(hex) = rgb {
                                match parse_hex_rgb(&hex) {
                                    Some(rgb) => theme.set_color(slot as u32, rgb),
                                    None => log::warn!("bad theme color value {:?}", hex),
                                }
                            }
                            if empty {
                                false
                            } else {
                                // srgbClr may carry transform children; drain them.
                                let inner =
                                    String::from_utf8_lossy(start.name().as_ref()).into_owned();
                                parse_scope(stream, &inner, |_, _| false);
                                true
                            }
                        });
                        true
                    });
                    return Ok(theme);
                },
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"clrScheme" {
                        return Ok(Theme::new());
                    }
                    return Err(FragError::UnexpectedRoot {
                        expected: "clrScheme".to_string(),
                        got: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    });
                },
                Event::Eof => return Err(FragError::EmptyFragment),
                _ => {},
            }
        }
    }
}
