//! Uploaded image handles.

use crate::error::{Error, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Extensions offered by the file picker and used when expanding directories.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Reference to one uploaded file's raw bytes.
///
/// Cloning is cheap; the bytes are freed when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    name: String,
    bytes: Arc<[u8]>,
}

impl ImageHandle {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file into a handle.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(display_name(path), bytes))
    }

    /// Like [`from_path`](Self::from_path) but never fails: an unreadable
    /// file yields an empty handle that will fail to decode.
    pub fn from_path_lossy(path: &Path) -> Self {
        Self::from_path(path).unwrap_or_else(|e| {
            tracing::warn!("{e}");
            Self::from_bytes(display_name(path), Vec::new())
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the bytes into RGBA pixels at natural resolution.
    pub fn decode(&self) -> Result<Arc<RgbaImage>> {
        let img = image::load_from_memory(&self.bytes).map_err(|source| Error::Decode {
            name: self.name.clone(),
            source,
        })?;
        Ok(Arc::new(img.to_rgba8()))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Expands an upload selection into file paths.
///
/// Files are kept in order as given, without filtering or deduplication.
/// Directories contribute their image files (one level deep), sorted.
#[must_use]
pub fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && has_image_extension(p))
            .collect();
        found.sort();
        files.extend(found);
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png() {
        let handle = ImageHandle::from_bytes("a.png", png_bytes(3, 2));
        let img = handle.decode().unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(1, 1), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn len_counts_raw_bytes() {
        let handle = ImageHandle::from_bytes("a.png", png_bytes(3, 2));
        assert_eq!(handle.len(), png_bytes(3, 2).len());
        assert!(!handle.is_empty());
    }

    #[test]
    fn garbage_fails_to_decode() {
        let handle = ImageHandle::from_bytes("notes.txt", b"hello".to_vec());
        assert!(matches!(handle.decode(), Err(Error::Decode { .. })));
    }

    #[test]
    fn unreadable_path_gives_empty_handle() {
        let handle = ImageHandle::from_path_lossy(Path::new("/definitely/not/here.png"));
        assert_eq!(handle.name(), "here.png");
        assert!(handle.is_empty());
        assert!(handle.decode().is_err());
    }

    #[test]
    fn expand_keeps_files_and_sorts_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "readme.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let loose = PathBuf::from("z.txt");
        let out = expand_paths(&[loose.clone(), dir.path().to_path_buf(), loose.clone()]);
        assert_eq!(
            out,
            vec![
                loose.clone(),
                dir.path().join("a.JPG"),
                dir.path().join("b.png"),
                loose,
            ]
        );
    }
}
