//! Integer HSL conversion and tint application.
//!
//! H, S and L all live in [0, 255] (`HSLMAX` = `RGBMAX` = 255), not the
//! conventional [0,360]/[0,100] scales, and every intermediate step uses
//! integer division. This fixed-point behavior is load-bearing: legacy
//! consumers compare resolved colors bit-for-bit, so the math must not be
//! replaced with floating-point equivalents. The one exception is the
//! luminance adjustment in [`apply_tint`], which rounds to nearest.

const HSLMAX: i32 = 255;
const RGBMAX: i32 = 255;

/// Hue reported for achromatic colors, where hue is undefined.
const UNDEFINED_HUE: i32 = HSLMAX * 2 / 3;

/// Convert an RGB triple to integer HSL.
pub fn rgb_to_hsl(rgb: [u8; 3]) -> (i32, i32, i32) {
    let (r, g, b) = (rgb[0] as i32, rgb[1] as i32, rgb[2] as i32);
    let c_max = r.max(g).max(b);
    let c_min = r.min(g).min(b);

    let l = ((c_max + c_min) * HSLMAX + RGBMAX) / (2 * RGBMAX);

    if c_max == c_min {
        return (UNDEFINED_HUE, 0, l);
    }

    let delta = c_max - c_min;
    let sum = c_max + c_min;
    let s = if l <= HSLMAX / 2 {
        (delta * HSLMAX + sum / 2) / sum
    } else {
        (delta * HSLMAX + (2 * RGBMAX - sum) / 2) / (2 * RGBMAX - sum)
    };

    let r_delta = ((c_max - r) * (HSLMAX / 6) + delta / 2) / delta;
    let g_delta = ((c_max - g) * (HSLMAX / 6) + delta / 2) / delta;
    let b_delta = ((c_max - b) * (HSLMAX / 6) + delta / 2) / delta;

    let mut h = if r == c_max {
        b_delta - g_delta
    } else if g == c_max {
        HSLMAX / 3 + r_delta - b_delta
    } else {
        2 * HSLMAX / 3 + g_delta - r_delta
    };
    if h < 0 {
        h += HSLMAX;
    }
    if h > HSLMAX {
        h -= HSLMAX;
    }

    (h, s, l)
}

/// Hue helper for the two-magic-number HSL to RGB conversion.
fn hue_to_channel(n1: i32, n2: i32, mut hue: i32) -> i32 {
    if hue < 0 {
        hue += HSLMAX;
    }
    if hue > HSLMAX {
        hue -= HSLMAX;
    }

    if hue < HSLMAX / 6 {
        n1 + ((n2 - n1) * hue + HSLMAX / 12) / (HSLMAX / 6)
    } else if hue < HSLMAX / 2 {
        n2
    } else if hue < HSLMAX * 2 / 3 {
        n1 + ((n2 - n1) * (HSLMAX * 2 / 3 - hue) + HSLMAX / 12) / (HSLMAX / 6)
    } else {
        n1
    }
}

/// Convert integer HSL back to an RGB triple.
///
/// Each channel is scaled into [0, 255] and clamped at 255.
pub fn hsl_to_rgb(h: i32, s: i32, l: i32) -> [u8; 3] {
    if s == 0 {
        let v = (l * RGBMAX / HSLMAX).clamp(0, 255) as u8;
        return [v, v, v];
    }

    let magic2 = if l <= HSLMAX / 2 {
        (l * (HSLMAX + s) + HSLMAX / 2) / HSLMAX
    } else {
        l + s - (l * s + HSLMAX / 2) / HSLMAX
    };
    let magic1 = 2 * l - magic2;

    let channel = |offset: i32| -> u8 {
        let v = (hue_to_channel(magic1, magic2, h + offset) * RGBMAX + HSLMAX / 2) / HSLMAX;
        v.clamp(0, 255) as u8
    };

    [channel(HSLMAX / 3), channel(0), channel(-(HSLMAX / 3))]
}

/// Apply a tint/shade adjustment to a base color.
///
/// Negative tints darken toward black, positive tints lighten toward
/// white. Only the luminance channel is adjusted; hue and saturation pass
/// through unchanged.
pub fn apply_tint(rgb: [u8; 3], tint: f64) -> [u8; 3] {
    let (h, s, l) = rgb_to_hsl(rgb);

    let l = l as f64;
    let adjusted = if tint < 0.0 {
        l * (1.0 + tint)
    } else {
        l * (1.0 - tint) + (255.0 - 255.0 * (1.0 - tint))
    };

    // Luminance rounds to nearest; everything downstream stays integer.
    hsl_to_rgb(h, s, adjusted.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_tint_reaches_white() {
        assert_eq!(apply_tint([0x4F, 0x81, 0xBD], 1.0), [255, 255, 255]);
        assert_eq!(apply_tint([0, 0, 0], 1.0), [255, 255, 255]);
    }

    #[test]
    fn test_full_shade_reaches_black() {
        assert_eq!(apply_tint([0x4F, 0x81, 0xBD], -1.0), [0, 0, 0]);
        assert_eq!(apply_tint([255, 255, 255], -1.0), [0, 0, 0]);
    }

    #[test]
    fn test_zero_tint_keeps_luminance() {
        // A zero tint must not drift luminance through the HSL round trip.
        for rgb in [[0x4F, 0x81, 0xBD], [0xC0, 0x50, 0x4D], [0x1F, 0x49, 0x7D]] {
            let (_, _, l) = rgb_to_hsl(rgb);
            let (_, _, l2) = rgb_to_hsl(apply_tint(rgb, 0.0));
            assert_eq!(l, l2, "luminance drift for {:?}", rgb);
        }
    }

    #[test]
    fn test_achromatic_round_trip() {
        for v in [0u8, 64, 128, 200, 255] {
            let (h, s, l) = rgb_to_hsl([v, v, v]);
            assert_eq!(s, 0);
            assert_eq!(h, 170);
            let back = hsl_to_rgb(h, s, l);
            assert!(back[0].abs_diff(v) <= 1, "gray {} came back as {:?}", v, back);
        }
    }

    #[test]
    fn test_primary_hues() {
        let (h_red, ..) = rgb_to_hsl([255, 0, 0]);
        let (h_green, ..) = rgb_to_hsl([0, 255, 0]);
        let (h_blue, ..) = rgb_to_hsl([0, 0, 255]);
        assert_eq!(h_red, 0);
        assert_eq!(h_green, 85);
        assert_eq!(h_blue, 170);
    }

    fn channel_sum(rgb: [u8; 3]) -> u32 {
        rgb.iter().map(|&c| c as u32).sum()
    }

    proptest! {
        #[test]
        fn test_tint_is_monotone_in_luminance(
            r in 0u8..=255,
            g in 0u8..=255,
            b in 0u8..=255,
            t1 in -1.0f64..=1.0,
            t2 in -1.0f64..=1.0,
        ) {
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let dark = channel_sum(apply_tint([r, g, b], lo));
            let light = channel_sum(apply_tint([r, g, b], hi));
            prop_assert!(dark <= light,
                "tint {} produced brighter color than tint {}", lo, hi);
        }
    }
}
