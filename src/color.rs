// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rgb::RGBA8;

/// A color with linear (gamma-expanded) channels in the 0..1 range.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    pub a: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Creates a new color from linear channels.
    ///
    /// Channels are clamped to the 0..1 range.
    #[inline]
    pub fn from_linear(a: f32, r: f32, g: f32, b: f32) -> Self {
        Color {
            a: crate::f32_bound(0.0, a, 1.0),
            r: crate::f32_bound(0.0, r, 1.0),
            g: crate::f32_bound(0.0, g, 1.0),
            b: crate::f32_bound(0.0, b, 1.0),
        }
    }

    /// Returns an opaque black color.
    #[inline]
    pub fn black() -> Self {
        Color::from_linear(1.0, 0.0, 0.0, 0.0)
    }

    /// Creates a color from sRGB encoded components.
    pub fn from_rgba8(c: RGBA8) -> Self {
        Color {
            a: c.a as f32 / 255.0,
            r: srgb_to_linear(c.r),
            g: srgb_to_linear(c.g),
            b: srgb_to_linear(c.b),
        }
    }

    /// Converts the color back into sRGB encoded components.
    pub fn to_rgba8(&self) -> RGBA8 {
        RGBA8 {
            r: linear_to_srgb(self.r),
            g: linear_to_srgb(self.g),
            b: linear_to_srgb(self.b),
            a: (self.a * 255.0).round() as u8,
        }
    }

    /// Multiplies alpha by `opacity`.
    #[inline]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.a = crate::f32_bound(0.0, self.a * opacity, 1.0);
        self
    }

    /// Converts the color into a luminance-derived grayscale.
    ///
    /// Uses the mean of the smallest and the largest channel.
    /// Alpha is preserved. Converting an already converted color is a no-op.
    pub fn to_luminance(&self) -> Self {
        let min = self.r.min(self.g).min(self.b);
        let max = self.r.max(self.g).max(self.b);
        let l = (min + max) / 2.0;
        Color {
            a: self.a,
            r: l,
            g: l,
            b: l,
        }
    }
}

impl From<svgtypes::Color> for Color {
    #[inline]
    fn from(c: svgtypes::Color) -> Self {
        Color::from_rgba8(RGBA8::new(c.red, c.green, c.blue, c.alpha))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let c = self.to_rgba8();
        if c.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> u8 {
    let c = crate::f32_bound(0.0, c, 1.0);
    let c = if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };

    (c * 255.0).round() as u8
}
