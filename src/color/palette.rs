//! Legacy indexed color palette.
//!
//! The 64-entry default palette from the pre-OOXML binary format. Indexed
//! color references in OOXML markup still point into this table; resolved
//! colors also carry a nearest-palette index for consumers that only
//! understand palette slots.

/// Default legacy palette, slots 0 through 63.
///
/// Slots 0-7 duplicate slots 8-15; the duplication is part of the format.
pub const INDEXED_PALETTE: [[u8; 3]; 64] = [
    [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF],
    [0xFF, 0x00, 0x00],
    [0x00, 0xFF, 0x00],
    [0x00, 0x00, 0xFF],
    [0xFF, 0xFF, 0x00],
    [0xFF, 0x00, 0xFF],
    [0x00, 0xFF, 0xFF],
    [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF],
    [0xFF, 0x00, 0x00],
    [0x00, 0xFF, 0x00],
    [0x00, 0x00, 0xFF],
    [0xFF, 0xFF, 0x00],
    [0xFF, 0x00, 0xFF],
    [0x00, 0xFF, 0xFF],
    [0x80, 0x00, 0x00],
    [0x00, 0x80, 0x00],
    [0x00, 0x00, 0x80],
    [0x80, 0x80, 0x00],
    [0x80, 0x00, 0x80],
    [0x00, 0x80, 0x80],
    [0xC0, 0xC0, 0xC0],
    [0x80, 0x80, 0x80],
    [0x99, 0x99, 0xFF],
    [0x99, 0x33, 0x66],
    [0xFF, 0xFF, 0xCC],
    [0xCC, 0xFF, 0xFF],
    [0x66, 0x00, 0x66],
    [0xFF, 0x80, 0x80],
    [0x00, 0x66, 0xCC],
    [0xCC, 0xCC, 0xFF],
    [0x00, 0x00, 0x80],
    [0xFF, 0x00, 0xFF],
    [0xFF, 0xFF, 0x00],
    [0x00, 0xFF, 0xFF],
    [0x80, 0x00, 0x80],
    [0x80, 0x00, 0x00],
    [0x00, 0x80, 0x80],
    [0x00, 0x00, 0xFF],
    [0x00, 0xCC, 0xFF],
    [0xCC, 0xFF, 0xFF],
    [0xCC, 0xFF, 0xCC],
    [0xFF, 0xFF, 0x99],
    [0x99, 0xCC, 0xFF],
    [0xFF, 0x99, 0xCC],
    [0xCC, 0x99, 0xFF],
    [0xFF, 0xCC, 0x99],
    [0x33, 0x66, 0xFF],
    [0x33, 0xCC, 0xCC],
    [0x99, 0xCC, 0x00],
    [0xFF, 0xCC, 0x00],
    [0xFF, 0x99, 0x00],
    [0xFF, 0x66, 0x00],
    [0x66, 0x66, 0x99],
    [0x96, 0x96, 0x96],
    [0x00, 0x33, 0x66],
    [0x33, 0x99, 0x66],
    [0x00, 0x33, 0x00],
    [0x33, 0x33, 0x00],
    [0x99, 0x33, 0x00],
    [0x99, 0x33, 0x66],
    [0x33, 0x33, 0x99],
    [0x33, 0x33, 0x33],
];

/// Palette slot meaning "system window text" (foreground).
pub const SYSTEM_FOREGROUND_INDEX: u32 = 64;

/// Palette slot meaning "system window background".
pub const SYSTEM_BACKGROUND_INDEX: u32 = 65;

/// Nearest palette slot to `rgb` by squared channel distance.
///
/// Ties keep the lowest index, which also prefers the canonical 0-7 EGA
/// slots over their 8-15 duplicates.
pub fn nearest_palette_index(rgb: [u8; 3]) -> u32 {
    let mut best = 0u32;
    let mut best_dist = u32::MAX;
    for (i, entry) in INDEXED_PALETTE.iter().enumerate() {
        let dist: u32 = entry
            .iter()
            .zip(rgb.iter())
            .map(|(&a, &b)| {
                let d = a.abs_diff(b) as u32;
                d * d
            })
            .sum();
        if dist < best_dist {
            best = i as u32;
            best_dist = dist;
            if dist == 0 {
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_prefers_lowest_slot() {
        assert_eq!(nearest_palette_index([0x00, 0x00, 0x00]), 0);
        assert_eq!(nearest_palette_index([0xFF, 0xFF, 0xFF]), 1);
        assert_eq!(nearest_palette_index([0xFF, 0x00, 0x00]), 2);
    }

    #[test]
    fn test_near_match() {
        // One off from pure red still lands on slot 2.
        assert_eq!(nearest_palette_index([0xFE, 0x01, 0x00]), 2);
        // A mid gray is closest to 0x808080 (slot 23).
        assert_eq!(nearest_palette_index([0x7F, 0x7F, 0x7F]), 23);
    }
}
