/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    /// Opaque colour from linear components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Debug-only validation: asserts that RGB channels do not exceed alpha,
    /// which would indicate a straight-alpha color was passed where premul was expected.
    ///
    /// No-op in release builds.
    #[inline]
    pub fn debug_assert_premul(self) {
        debug_assert!(
            self.r <= self.a + f32::EPSILON,
            "Color::debug_assert_premul: r ({}) > a ({}), looks like straight-alpha was passed as premul",
            self.r, self.a
        );
        debug_assert!(
            self.g <= self.a + f32::EPSILON,
            "Color::debug_assert_premul: g ({}) > a ({}), looks like straight-alpha was passed as premul",
            self.g, self.a
        );
        debug_assert!(
            self.b <= self.a + f32::EPSILON,
            "Color::debug_assert_premul: b ({}) > a ({}), looks like straight-alpha was passed as premul",
            self.b, self.a
        );
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Opaque colour from sRGB-encoded components, decoded to linear.
    ///
    /// Use this for colours picked for a non-sRGB framebuffer (e.g. a
    /// `glClearColor` value) so they look the same on an sRGB surface.
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
    }

    /// Returns `[r, g, b, a]` for upload into vertex or uniform data.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to a `wgpu` clear colour.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_straight_premultiplies() {
        let c = Color::from_straight(1.0, 1.0, 0.0, 0.5);
        assert_eq!(c.to_array(), [0.5, 0.5, 0.0, 0.5]);
    }

    #[test]
    fn srgb_endpoints_are_unchanged() {
        let c = Color::from_srgb(0.0, 1.0, 0.0);
        assert_eq!(c.r, 0.0);
        assert!((c.g - 1.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn srgb_mid_blue_decodes_darker() {
        let c = Color::from_srgb(0.0, 0.0, 0.4);
        assert!((c.b - 0.1329).abs() < 1e-3, "b = {}", c.b);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn srgb_low_segment_is_linear() {
        let c = Color::from_srgb(0.02, 0.0, 0.0);
        assert!((c.r - 0.02 / 12.92).abs() < 1e-7);
    }

    #[test]
    fn to_wgpu_widens_channels() {
        let w = Color::from_straight(1.0, 0.0, 0.0, 0.5).to_wgpu();
        assert_eq!((w.r, w.g, w.b, w.a), (0.5, 0.0, 0.0, 0.5));
    }
}
