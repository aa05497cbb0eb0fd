//! Node colors and the HLS-space color adjustments carried by transforms.
//!
//! A transform's color adjustment is a 4x4 affine map over the vector
//! `(hue, lightness, saturation, 1)`. Hue is in degrees, lightness and
//! saturation in 0..1. The last component is the homogeneous coordinate, so
//! the fourth column holds the translation; alpha is carried over unchanged.

use glam::{DMat4, DVec4};

/// RGBA color with components in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to `(hue, lightness, saturation, 1)`.
    pub fn to_hls(&self) -> DVec4 {
        let (r, g, b) = (self.r.clamp(0.0, 1.0), self.g.clamp(0.0, 1.0), self.b.clamp(0.0, 1.0));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d <= f64::EPSILON {
            return DVec4::new(0.0, l, 0.0, 1.0);
        }

        let s = if l < 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        let h = if max == r {
            60.0 * (g - b) / d
        } else if max == g {
            120.0 + 60.0 * (b - r) / d
        } else {
            240.0 + 60.0 * (r - g) / d
        };

        DVec4::new(h.rem_euclid(360.0), l, s, 1.0)
    }

    /// Build from `(hue, lightness, saturation, _)`, keeping `alpha`.
    ///
    /// Hue wraps into [0, 360); lightness and saturation are clamped, since
    /// repeated color sinks can push them outside 0..1.
    pub fn from_hls(hls: DVec4, alpha: f64) -> Self {
        let h = if hls.x.is_finite() { hls.x.rem_euclid(360.0) } else { 0.0 };
        let l = finite_or_zero(hls.y).clamp(0.0, 1.0);
        let s = finite_or_zero(hls.z).clamp(0.0, 1.0);

        if s <= f64::EPSILON {
            return Color::rgba(l, l, l, alpha);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hk = h / 360.0;

        Color::rgba(
            hue_to_channel(p, q, hk + 1.0 / 3.0),
            hue_to_channel(p, q, hk),
            hue_to_channel(p, q, hk - 1.0 / 3.0),
            alpha,
        )
    }

    /// Hue in degrees, saturation and value in 0..1.
    pub fn from_hsv(hue: f64, s: f64, v: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Color::rgb(r + m, g + m, b + m)
    }

    /// Apply an HLS-space adjustment.
    pub fn adjusted(&self, color_adjust: &DMat4) -> Color {
        Color::from_hls(*color_adjust * self.to_hls(), self.a)
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = [self.r, self.g, self.b, self.a].map(to_byte);
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(|v| v as f64 / 255.0);
        let a = if hex.len() == 8 { byte(6)? } else { 1.0 };
        Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// 8-bit RGBA, for raster output.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(to_byte)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn to_byte(v: f64) -> u8 {
    (finite_or_zero(v).clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Adjustment pulling an HLS color toward `(hue, lightness, saturation)` by
/// `weight` (0 = no change, 1 = jump to the target).
pub fn color_sink(hue: f64, lightness: f64, saturation: f64, weight: f64) -> DMat4 {
    let keep = 1.0 - weight;
    DMat4::from_cols(
        DVec4::new(keep, 0.0, 0.0, 0.0),
        DVec4::new(0.0, keep, 0.0, 0.0),
        DVec4::new(0.0, 0.0, keep, 0.0),
        DVec4::new(weight * hue, weight * lightness, weight * saturation, 1.0),
    )
}

/// [`color_sink`] toward an RGB color.
pub fn color_sink_toward(target: Color, weight: f64) -> DMat4 {
    let hls = target.to_hls();
    color_sink(hls.x, hls.y, hls.z, weight)
}

/// Adjustment that scales lightness and saturation, leaving hue alone.
pub fn fade(lightness: f64, saturation: f64) -> DMat4 {
    DMat4::from_diagonal(DVec4::new(1.0, lightness, saturation, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-9 && (a.g - b.g).abs() < 1e-9 && (a.b - b.b).abs() < 1e-9
    }

    #[test]
    fn hls_round_trip() {
        for c in [
            Color::rgb(1.0, 0.0, 0.0),
            Color::rgb(0.2, 0.5, 0.0),
            Color::rgb(0.0, 1.0, 1.0),
            Color::rgb(0.3, 0.3, 0.3),
            Color::rgb(0.9, 0.4, 0.7),
        ] {
            let back = Color::from_hls(c.to_hls(), c.a);
            assert!(close(c, back), "{:?} came back as {:?}", c, back);
        }
    }

    #[test]
    fn pure_red_hls() {
        let hls = Color::rgb(1.0, 0.0, 0.0).to_hls();
        assert_eq!(hls.x, 0.0);
        assert_eq!(hls.y, 0.5);
        assert_eq!(hls.z, 1.0);
    }

    #[test]
    fn identity_adjustment_keeps_color() {
        let c = Color::rgb(0.1, 0.6, 0.8);
        assert!(close(c.adjusted(&DMat4::IDENTITY), c));
    }

    #[test]
    fn full_sink_reaches_target() {
        let target = Color::rgb(0.0, 0.0, 1.0);
        let sunk = Color::rgb(1.0, 1.0, 0.0).adjusted(&color_sink_toward(target, 1.0));
        assert!(close(sunk, target), "got {:?}", sunk);
    }

    #[test]
    fn hue_wraps() {
        let a = Color::from_hls(DVec4::new(-120.0, 0.5, 1.0, 1.0), 1.0);
        let b = Color::from_hls(DVec4::new(240.0, 0.5, 1.0, 1.0), 1.0);
        assert!(close(a, b));
    }

    #[test]
    fn hsv_primaries() {
        assert!(close(Color::from_hsv(0.0, 1.0, 1.0), Color::rgb(1.0, 0.0, 0.0)));
        assert!(close(Color::from_hsv(120.0, 1.0, 1.0), Color::rgb(0.0, 1.0, 0.0)));
        assert!(close(Color::from_hsv(240.0, 1.0, 0.5), Color::rgb(0.0, 0.0, 0.5)));
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.0).to_hex(), "#ff0000");
        assert_eq!(Color::rgba(0.0, 0.0, 0.0, 0.0).to_hex(), "#00000000");
        let c = Color::from_hex("#336699").unwrap();
        assert_eq!(c.to_hex(), "#336699");
        let c = Color::from_hex("#33669980").unwrap();
        assert_eq!(c.to_hex(), "#33669980");
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }
}
