//! Global colour filters.
//!
//! The three modes match the CSS `filter` functions at 100% strength, so the
//! on-screen texture and the exported raster use the same pixel maths.

use image::{Rgba, RgbaImage};

/// Row-major 3x3 colour matrix applied to (r, g, b).
type ColorMatrix = [[f32; 3]; 3];

const GRAYSCALE: ColorMatrix = [
    [0.2126, 0.7152, 0.0722],
    [0.2126, 0.7152, 0.0722],
    [0.2126, 0.7152, 0.0722],
];

const SEPIA: ColorMatrix = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// The filter applied to every tile in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    #[default]
    Normal,
    Grayscale,
    Sepia,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::Normal, FilterMode::Grayscale, FilterMode::Sepia];

    /// Button caption.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Normal => "Normal",
            FilterMode::Grayscale => "Blanco y Negro",
            FilterMode::Sepia => "Sepia",
        }
    }

    fn matrix(self) -> Option<&'static ColorMatrix> {
        match self {
            FilterMode::Normal => None,
            FilterMode::Grayscale => Some(&GRAYSCALE),
            FilterMode::Sepia => Some(&SEPIA),
        }
    }

    /// Filters a single pixel. Alpha is preserved.
    #[must_use]
    pub fn apply_pixel(self, pixel: Rgba<u8>) -> Rgba<u8> {
        let Some(m) = self.matrix() else {
            return pixel;
        };
        let [r, g, b, a] = pixel.0;
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
        let channel = |row: &[f32; 3]| {
            (row[0] * r + row[1] * g + row[2] * b)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgba([channel(&m[0]), channel(&m[1]), channel(&m[2]), a])
    }

    /// Returns a filtered copy of `image`.
    #[must_use]
    pub fn apply(self, image: &RgbaImage) -> RgbaImage {
        let mut out = image.clone();
        if self != FilterMode::Normal {
            for pixel in out.pixels_mut() {
                *pixel = self.apply_pixel(*pixel);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(4, 3, |x, y| Rgba([(x * 60) as u8, (y * 90) as u8, 200, 128 + x as u8]))
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(FilterMode::default(), FilterMode::Normal);
    }

    #[test]
    fn normal_is_identity() {
        let img = sample();
        assert_eq!(FilterMode::Normal.apply(&img), img);
    }

    #[test]
    fn grayscale_has_no_saturation() {
        let out = FilterMode::Grayscale.apply(&sample());
        for p in out.pixels() {
            assert_eq!(p[0], p[1]);
            assert_eq!(p[1], p[2]);
        }
    }

    #[test]
    fn filters_keep_alpha() {
        let img = sample();
        for mode in FilterMode::ALL {
            let out = mode.apply(&img);
            for (a, b) in img.pixels().zip(out.pixels()) {
                assert_eq!(a[3], b[3]);
            }
        }
    }

    #[test]
    fn sepia_white_saturates_red_and_green() {
        let p = FilterMode::Sepia.apply_pixel(Rgba([255, 255, 255, 255]));
        assert_eq!(p, Rgba([255, 255, 239, 255]));
    }

    #[test]
    fn sepia_black_stays_black() {
        let p = FilterMode::Sepia.apply_pixel(Rgba([0, 0, 0, 10]));
        assert_eq!(p, Rgba([0, 0, 0, 10]));
    }
}
