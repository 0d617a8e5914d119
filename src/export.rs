//! Rasterizes a tile's visible view into a PNG.
//!
//! The output keeps the image's natural size. The filter is applied first,
//! then the same scale/offset transform the tile uses on screen, about the
//! raster centre.

use crate::error::{Error, Result};
use crate::filter::FilterMode;
use crate::view::ViewTransform;
use eframe::egui::Vec2;
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp, Interpolation, Projection};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "imagen-editada.png";

/// Screen-pixel to natural-pixel ratio for offsets.
///
/// `display_size` is the on-screen size of the unzoomed image; `None` when
/// the tile has not been laid out yet.
fn offset_ratio(natural_width: u32, display_size: Option<Vec2>) -> f32 {
    match display_size {
        Some(size) if size.x > 0.0 => natural_width as f32 / size.x,
        _ => 1.0,
    }
}

/// Builds the source-to-raster projection for `transform`.
#[must_use]
pub fn projection(
    dimensions: (u32, u32),
    transform: ViewTransform,
    display_size: Option<Vec2>,
) -> Projection {
    let cx = dimensions.0 as f32 / 2.0;
    let cy = dimensions.1 as f32 / 2.0;
    let k = offset_ratio(dimensions.0, display_size);
    let s = transform.scale;
    let t = transform.translation() * k;

    // scale(s) then translate(offset / s), about the centre
    Projection::translate(-cx, -cy)
        .and_then(Projection::translate(t.x, t.y))
        .and_then(Projection::scale(s, s))
        .and_then(Projection::translate(cx, cy))
}

/// Renders the filtered, transformed view at natural resolution.
#[must_use]
pub fn render_view(
    source: &RgbaImage,
    filter: FilterMode,
    transform: ViewTransform,
    display_size: Option<Vec2>,
) -> RgbaImage {
    let filtered = filter.apply(source);
    if transform.is_identity() {
        return filtered;
    }
    let proj = projection(source.dimensions(), transform, display_size);
    warp(&filtered, &proj, Interpolation::Bilinear, Rgba([0, 0, 0, 0]))
}

pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    raster.write_to(&mut out, ImageFormat::Png).map_err(Error::Encode)?;
    Ok(out.into_inner())
}

/// Encodes `raster` and writes it to `dir/file_name`, replacing any existing file.
pub fn save_png(raster: &RgbaImage, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let bytes = encode_png(raster)?;
    std::fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "exported view"
    );
    Ok(path)
}
