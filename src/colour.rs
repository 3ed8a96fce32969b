//! Hex colours as used by the page stylesheet.
//!
//! Surfaces are sRGB, so shaders work in linear space and colours are
//! converted once when a tint or light is built.

pub const ACCENT: u32 = 0xE63946;
pub const WHITE: u32 = 0xFFFFFF;

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` to linear RGB in [0, 1].
pub fn linear_rgb(hex: u32) -> [f32; 3] {
    [16, 8, 0].map(|shift| srgb_to_linear(((hex >> shift) & 0xFF) as f32 / 255.0))
}

/// Linear RGB plus opacity.
pub fn tint(hex: u32, opacity: f32) -> [f32; 4] {
    let [r, g, b] = linear_rgb(hex);
    [r, g, b, opacity.clamp(0.0, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_survive_conversion() {
        assert_eq!(linear_rgb(0x000000), [0.0, 0.0, 0.0]);
        let white = linear_rgb(WHITE);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }

    #[test]
    fn channels_are_read_in_order() {
        let accent = linear_rgb(ACCENT);
        // red dominates the accent colour
        assert!(accent[0] > accent[1] && accent[0] > accent[2]);
        assert!(accent[2] > accent[1]);
    }

    #[test]
    fn tint_clamps_opacity() {
        assert_eq!(tint(WHITE, 1.5)[3], 1.0);
        assert_eq!(tint(WHITE, 0.2)[3], 0.2);
    }
}
